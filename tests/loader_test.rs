use tableview::ParseError;
use tableview::downloader::to_csv;
use tableview::loader::{from_csv_str, from_tsv_str, parse_upload};

// Helper to read a whole column as owned strings
fn column(data: &tableview::Dataset, name: &str) -> Vec<String> {
    data.rows()
        .iter()
        .map(|row| data.value(row, name).unwrap().to_string())
        .collect()
}

#[test]
fn test_header_defines_columns() {
    let data = from_csv_str("name,price,stock\nApple,1,10\nBanana,2,0\n").unwrap();

    assert_eq!(data.columns(), ["name", "price", "stock"]);
    assert_eq!(data.len(), 2);
    assert_eq!(column(&data, "stock"), ["10", "0"]);
    println!("✓ Header and rows parsed correctly");
}

#[test]
fn test_empty_lines_are_skipped() {
    let data = from_csv_str("\nname,price\n\nApple,1\n\n\nBanana,2\n\n").unwrap();
    assert_eq!(column(&data, "name"), ["Apple", "Banana"]);
}

#[test]
fn test_crlf_and_missing_trailing_newline() {
    let data = from_csv_str("name,price\r\nApple,1\r\nBanana,2").unwrap();
    assert_eq!(column(&data, "price"), ["1", "2"]);
}

#[test]
fn test_quoted_fields() {
    let data = from_csv_str(
        "name,note\n\"Apple, Inc\",\"said \"\"hi\"\"\"\nBanana,\"two\nlines\"\nCherry,\n",
    )
    .unwrap();

    assert_eq!(column(&data, "name"), ["Apple, Inc", "Banana", "Cherry"]);
    assert_eq!(column(&data, "note"), ["said \"hi\"", "two\nlines", ""]);
}

#[test]
fn test_tab_separated() {
    let data = from_tsv_str("name\tnote\nApple\tred, sweet\n").unwrap();
    assert_eq!(column(&data, "note"), ["red, sweet"]);
}

#[test]
fn test_parse_failures() {
    assert_eq!(from_csv_str(""), Err(ParseError::EmptyInput));
    assert_eq!(from_csv_str("\n\n"), Err(ParseError::EmptyInput));
    assert_eq!(
        from_csv_str("name,,price\n"),
        Err(ParseError::EmptyColumnName { position: 2 })
    );
    assert_eq!(
        from_csv_str("name,name\n"),
        Err(ParseError::DuplicateColumn("name".to_string()))
    );
    assert_eq!(
        from_csv_str("name,price\nApple,1\n\nBanana\n"),
        Err(ParseError::FieldCount {
            line: 4,
            expected: 2,
            found: 1
        })
    );
    assert_eq!(
        from_csv_str("name,price\nApple,1,extra\n"),
        Err(ParseError::FieldCount {
            line: 2,
            expected: 2,
            found: 3
        })
    );
    assert_eq!(
        from_csv_str("name,price\nApple,\"1\nBanana,2\n"),
        Err(ParseError::UnterminatedQuote { line: 2 })
    );
    println!("✓ Malformed inputs rejected with the right reason");
}

#[test]
fn test_header_only_file_has_no_rows() {
    let data = from_csv_str("name,price\n").unwrap();
    assert_eq!(data.columns(), ["name", "price"]);
    assert!(data.is_empty());
}

#[test]
fn test_parse_upload_dispatch() {
    let data = parse_upload(Some("deals.CSV"), b"a,b\n1,2\n").unwrap();
    assert_eq!(data.columns(), ["a", "b"]);

    let data = parse_upload(None, b"a,b\n1,2\n").unwrap();
    assert_eq!(data.len(), 1);

    let data = parse_upload(Some("deals.tsv"), b"a\tb\n1\t2\n").unwrap();
    assert_eq!(data.columns(), ["a", "b"]);

    let data = parse_upload(Some("bom.csv"), "\u{feff}a,b\n1,2\n".as_bytes()).unwrap();
    assert_eq!(data.columns(), ["a", "b"]);

    assert_eq!(
        parse_upload(Some("deals.xlsx"), b"a,b\n"),
        Err(ParseError::UnsupportedExtension("xlsx".to_string()))
    );
    assert_eq!(
        parse_upload(Some("deals.csv"), &[0xff, 0xfe, 0x00]),
        Err(ParseError::Encoding)
    );
}

#[test]
fn test_export_reparses_to_same_rows() {
    let source = "name,note\n\"Apple, Inc\",\"said \"\"hi\"\"\"\nBanana,\"two\nlines\"\n";
    let data = from_csv_str(source).unwrap();
    let rows: Vec<_> = data.rows().iter().collect();

    let exported = to_csv(data.schema(), &rows);
    assert_eq!(exported, source);
    assert_eq!(from_csv_str(&exported).unwrap(), data);
}
