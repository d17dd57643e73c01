use super::{HeaderStyle, MetricRecord};

/// Render the record as an aligned console table with a leading row index.
pub fn format_table(record: &MetricRecord, style: HeaderStyle) -> String {
    let headers = style.headers();
    let values = record.values();
    let index = "0";

    let mut header_line = " ".repeat(index.len());
    let mut value_line = index.to_string();
    for (header, value) in headers.iter().zip(values.iter()) {
        let width = header.chars().count().max(value.chars().count());
        header_line.push_str(&format!("  {:>width$}", header, width = width));
        value_line.push_str(&format!("  {:>width$}", value, width = width));
    }

    format!("{}\n{}", header_line, value_line)
}

pub fn print_table(record: &MetricRecord, style: HeaderStyle) {
    println!("{}", format_table(record, style));
}
