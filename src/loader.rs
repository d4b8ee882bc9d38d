use crate::error::ParseError;
use crate::table::{Dataset, Schema};
use std::collections::HashSet;
use std::path::Path;

/// Parse comma-separated text into a dataset
///
/// The first non-empty line is the header and defines the column names.
/// Every following non-empty line is one row and must have exactly as many
/// fields as the header. Quoted fields may contain delimiters, doubled quotes
/// and line breaks.
///
/// # Arguments
/// * `text` - The full file contents
///
/// # Returns
/// * `Result<Dataset, ParseError>` - The parsed dataset or the first problem found
///
/// # Examples
/// ```
/// use tableview::loader::from_csv_str;
///
/// let data = from_csv_str("name,price\nApple,1\n\nBanana,2\n").unwrap();
/// assert_eq!(data.columns(), ["name", "price"]);
/// assert_eq!(data.len(), 2);
/// ```
pub fn from_csv_str(text: &str) -> Result<Dataset, ParseError> {
    from_delimited_str(text, ',')
}

/// Parse tab-separated text into a dataset
///
/// Same rules as [`from_csv_str`] with a tab as the field separator.
pub fn from_tsv_str(text: &str) -> Result<Dataset, ParseError> {
    from_delimited_str(text, '\t')
}

/// Parse an uploaded file, picking the delimiter from its name
///
/// `.tsv` and `.tab` files are tab-separated; `.csv`, `.txt` and files
/// without a name or extension are comma-separated.
///
/// # Arguments
/// * `file_name` - Name the browser reported for the upload, if any
/// * `bytes` - Raw file contents, which must be UTF-8
///
/// # Returns
/// * `Result<Dataset, ParseError>` - The parsed dataset or an error
///
/// # Examples
/// ```
/// use tableview::loader::parse_upload;
///
/// let data = parse_upload(Some("deals.tsv"), b"name\tprice\nApple\t1\n").unwrap();
/// assert_eq!(data.columns(), ["name", "price"]);
/// ```
pub fn parse_upload(file_name: Option<&str>, bytes: &[u8]) -> Result<Dataset, ParseError> {
    let text = std::str::from_utf8(bytes).map_err(|_| ParseError::Encoding)?;
    // Excel likes to prepend a byte order mark
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let extension = file_name
        .map(Path::new)
        .and_then(|path| path.extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    match extension.as_deref() {
        Some("tsv") | Some("tab") => from_tsv_str(text),
        Some("csv") | Some("txt") | None => from_csv_str(text),
        Some(ext) => Err(ParseError::UnsupportedExtension(ext.to_string())),
    }
}

fn from_delimited_str(text: &str, delimiter: char) -> Result<Dataset, ParseError> {
    let mut records = parse_records(text, delimiter)?.into_iter();

    let (_, header) = records.next().ok_or(ParseError::EmptyInput)?;
    let schema = parse_header(header)?;
    let mut dataset = Dataset::new(schema);

    for (line, fields) in records {
        dataset
            .push_row(fields)
            .map_err(|e| ParseError::FieldCount {
                line,
                expected: e.expected,
                found: e.found,
            })?;
    }

    Ok(dataset)
}

fn parse_header(fields: Vec<String>) -> Result<Schema, ParseError> {
    let mut seen = HashSet::new();
    for (position, name) in fields.iter().enumerate() {
        if name.is_empty() {
            return Err(ParseError::EmptyColumnName {
                position: position + 1,
            });
        }
        if !seen.insert(name.as_str()) {
            return Err(ParseError::DuplicateColumn(name.clone()));
        }
    }
    Ok(Schema::new(fields))
}

// Split text into records of fields, tagged with the line each record starts on.
// Empty lines are skipped.
fn parse_records(text: &str, delimiter: char) -> Result<Vec<(usize, Vec<String>)>, ParseError> {
    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut current_field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        // Doubled quote inside quoted field
                        current_field.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                }
                '\n' => {
                    line += 1;
                    current_field.push(c);
                }
                _ => current_field.push(c),
            }
            continue;
        }

        match c {
            '"' if current_field.is_empty() => in_quotes = true,
            c if c == delimiter => fields.push(std::mem::take(&mut current_field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                fields.push(std::mem::take(&mut current_field));
                push_record(&mut records, record_line, std::mem::take(&mut fields));
                line += 1;
                record_line = line;
            }
            _ => current_field.push(c),
        }
    }

    if in_quotes {
        return Err(ParseError::UnterminatedQuote { line: record_line });
    }

    // Last record without a trailing newline
    if !fields.is_empty() || !current_field.is_empty() {
        fields.push(current_field);
        push_record(&mut records, record_line, fields);
    }

    Ok(records)
}

fn push_record(records: &mut Vec<(usize, Vec<String>)>, line: usize, fields: Vec<String>) {
    let is_empty_line = fields.len() == 1 && fields[0].is_empty();
    if !is_empty_line {
        records.push((line, fields));
    }
}
