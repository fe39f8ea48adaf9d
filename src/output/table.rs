//! Table output formatting

use tabled::{
    Table, Tabled,
    builder::Builder,
    settings::{Alignment, Modify, Style, object::Rows},
};

/// Printed instead of an empty table
pub const EMPTY_MESSAGE: &str = "No results found.";

/// Format rows as a table with a centered header
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    if data.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }

    let mut table = Table::new(data);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

/// Format one item as a two-column field/value table
pub fn format_record<T: Tabled>(item: &T) -> String {
    let mut builder = Builder::default();
    for (header, value) in T::headers().into_iter().zip(item.fields()) {
        builder.push_record([header.into_owned(), value.into_owned()]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());

    table.to_string()
}
