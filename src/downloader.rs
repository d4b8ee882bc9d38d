use crate::table::{Row, Schema};

/// Convert a set of rows to CSV format
///
/// This function exports rows (typically the filtered view) to CSV text where:
/// - The first line holds the column names in schema order
/// - Values are comma-separated
/// - Fields containing commas, quotes or line breaks are quoted, with inner quotes doubled
///
/// # Arguments
/// * `schema` - Columns to write, in order
/// * `rows` - Rows to write, aligned with `schema`
///
/// # Returns
/// * `String` - CSV content
///
/// # Examples
/// ```
/// use tableview::downloader::to_csv;
/// use tableview::loader::from_csv_str;
///
/// let data = from_csv_str("name,note\nApple,\"red, sweet\"\n").unwrap();
/// let rows: Vec<_> = data.rows().iter().collect();
/// assert_eq!(to_csv(data.schema(), &rows), "name,note\nApple,\"red, sweet\"\n");
/// ```
pub fn to_csv(schema: &Schema, rows: &[&Row]) -> String {
    let mut csv_content = String::new();

    push_line(&mut csv_content, schema.columns().iter().map(String::as_str));
    for row in rows {
        push_line(&mut csv_content, row.values().iter().map(String::as_str));
    }

    csv_content
}

fn push_line<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    for (i, value) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_field(value));
    }
    out.push('\n');
}

/// Quote a field if it contains a comma, quote or line break.
///
/// # Examples
/// ```
/// use tableview::downloader::escape_field;
///
/// assert_eq!(escape_field("plain"), "plain");
/// assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
/// ```
pub fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
