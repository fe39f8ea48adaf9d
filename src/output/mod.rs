//! Output formatting for CLI results

use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::error::Result;

pub mod formatters;
pub mod json;
pub mod table;

/// Trait for types that can be formatted for output
pub trait Formattable {
    /// Format the data according to the specified format
    fn format(&self, format: OutputFormat) -> Result<String>;

    /// Format and print to stdout
    fn print(&self, format: OutputFormat) -> Result<()> {
        println!("{}", self.format(format)?);
        Ok(())
    }
}

impl<T: Tabled + Serialize> Formattable for Vec<T> {
    fn format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Table => Ok(table::format_table(self)),
            OutputFormat::Json => Ok(json::format_json_list(self)?),
        }
    }
}

/// A single record, shown vertically in table mode
pub struct Record<T>(pub T);

impl<T: Tabled + Serialize> Formattable for Record<T> {
    fn format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Table => Ok(table::format_record(&self.0)),
            OutputFormat::Json => Ok(json::format_json(&self.0)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Tabled, Serialize)]
    struct Row {
        #[tabled(rename = "ID")]
        id: String,
    }

    #[test]
    fn test_vec_formats_by_output_format() {
        let rows = vec![Row {
            id: "t1".to_string(),
        }];

        let table = rows.format(OutputFormat::Table).unwrap();
        assert!(table.contains("ID"));
        assert!(table.contains("t1"));

        let json = rows.format(OutputFormat::Json).unwrap();
        assert!(json.contains("\"id\": \"t1\""));
    }

    #[test]
    fn test_record_json_is_an_object() {
        let json = Record(Row {
            id: "t1".to_string(),
        })
        .format(OutputFormat::Json)
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["data"]["id"], "t1");
    }
}
