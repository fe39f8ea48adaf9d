//! JSON output formatting
//!
//! Every JSON document has the same shape: `{"data": ..., "meta": {...}}`.
//! List output also reports how many items `data` holds.

use chrono::Utc;
use serde::Serialize;

/// Wrapper for JSON output with metadata
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub data: T,
    pub meta: Metadata,
}

/// Metadata included in JSON output
#[derive(Debug, Serialize)]
pub struct Metadata {
    /// When the document was produced (RFC 3339)
    pub timestamp: String,

    /// CLI version
    pub version: &'static str,

    /// Number of items, for list output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T> JsonOutput<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            meta: Metadata {
                timestamp: Utc::now().to_rfc3339(),
                version: env!("CARGO_PKG_VERSION"),
                count: None,
            },
        }
    }

    fn with_count(mut self, count: usize) -> Self {
        self.meta.count = Some(count);
        self
    }
}

/// Format a single value as pretty-printed JSON
pub fn format_json<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonOutput::new(data))
}

/// Format a list as pretty-printed JSON, with its length in `meta.count`
pub fn format_json_list<T: Serialize>(items: &[T]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonOutput::new(items).with_count(items.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[derive(Debug, Serialize)]
    struct TaskRow {
        id: &'static str,
        title: &'static str,
    }

    fn parse(output: &str) -> Value {
        serde_json::from_str(output).unwrap()
    }

    #[test]
    fn test_single_value_has_no_count() {
        let value = parse(
            &format_json(&TaskRow {
                id: "t1",
                title: "Write report",
            })
            .unwrap(),
        );

        assert_eq!(value["data"]["title"], "Write report");
        assert_eq!(value["meta"]["version"], env!("CARGO_PKG_VERSION"));
        assert!(value["meta"]["timestamp"].is_string());
        assert!(value["meta"].get("count").is_none());
    }

    #[test]
    fn test_list_reports_count() {
        let rows = [
            TaskRow {
                id: "t1",
                title: "First",
            },
            TaskRow {
                id: "t2",
                title: "Second",
            },
        ];

        let value = parse(&format_json_list(&rows).unwrap());
        assert_eq!(value["meta"]["count"], 2);
        assert_eq!(value["data"][1]["id"], "t2");
    }

    #[test]
    fn test_empty_list() {
        let rows: Vec<TaskRow> = Vec::new();
        let value = parse(&format_json_list(&rows).unwrap());

        assert_eq!(value["data"], Value::Array(Vec::new()));
        assert_eq!(value["meta"]["count"], 0);
    }
}
