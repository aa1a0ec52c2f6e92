//! CSV row codec for dataset stores
//!
//! Writing is deliberately narrow: every field is wrapped in double quotes and
//! internal quotes are doubled, nothing else is escaped. Reading accepts any
//! RFC 4180 input, including multi-line quoted fields and unquoted fields.

/// Quote one field.
pub fn encode_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Encode a full row, terminated by `\n`.
pub fn encode_row(fields: &[&str]) -> String {
    let mut row = fields
        .iter()
        .map(|f| encode_field(f))
        .collect::<Vec<_>>()
        .join(",");
    row.push('\n');
    row
}

/// Parse CSV text into records. Blank lines are skipped.
pub fn parse_records(text: &str) -> Vec<Vec<String>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut field_started = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            '"' if !field_started || field.is_empty() => {
                in_quotes = true;
                field_started = true;
            }
            ',' => {
                record.push(std::mem::take(&mut field));
                field_started = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                end_record(&mut records, &mut record, &mut field, field_started);
                field_started = false;
            }
            _ => {
                field.push(c);
                field_started = true;
            }
        }
    }
    end_record(&mut records, &mut record, &mut field, field_started);
    records
}

fn end_record(
    records: &mut Vec<Vec<String>>,
    record: &mut Vec<String>,
    field: &mut String,
    field_started: bool,
) {
    if record.is_empty() && field.is_empty() && !field_started {
        return;
    }
    record.push(std::mem::take(field));
    records.push(std::mem::take(record));
}

/// Whether `text` begins with the given header line.
pub fn starts_with_header(text: &str, header: &str) -> bool {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    match text.strip_prefix(header) {
        Some(rest) => rest.is_empty() || rest.starts_with('\n') || rest.starts_with("\r\n"),
        None => false,
    }
}

/// Number of data records in `text`, excluding a leading header line.
///
/// Only the literal `header` line counts as a header, the same test the
/// logger applies before appending. A quoted `"input","output"` record is
/// data.
pub fn count_data_rows(text: &str, header: &str) -> usize {
    let records = parse_records(text).len();
    if starts_with_header(text, header) {
        records.saturating_sub(1)
    } else {
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_doubles_quotes_only() {
        assert_eq!(encode_field(r#"say "hi", ok"#), r#""say ""hi"", ok""#);
        assert_eq!(encode_field("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn test_comma_and_quote_survive_a_round_trip() {
        let value = r#"a "quoted", comma-laden value"#;
        let row = encode_row(&["in", value]);
        let records = parse_records(&row);
        assert_eq!(records, vec![vec!["in".to_string(), value.to_string()]]);
    }

    #[test]
    fn test_encoded_rows_decode_with_csv_crate() {
        let value = "a \"quoted\", comma-laden\nvalue";
        let text = format!("input,output\n{}", encode_row(&["in", value]));
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "in");
        assert_eq!(&rows[0][1], value);
    }

    #[test]
    fn test_multiline_field() {
        let text = "input,output\n\"a\nb\",\"c\"\n";
        let records = parse_records(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1][0], "a\nb");
    }

    #[test]
    fn test_unquoted_and_crlf() {
        let records = parse_records("x,y\r\n1,2\r\n");
        assert_eq!(records, vec![vec!["x", "y"], vec!["1", "2"]]);
    }

    #[test]
    fn test_count_excludes_header() {
        let text = format!("input,output\n{}{}", encode_row(&["a", "b"]), encode_row(&["c", "d"]));
        assert_eq!(count_data_rows(&text, "input,output"), 2);
    }

    #[test]
    fn test_count_without_header() {
        let text = format!("{}{}", encode_row(&["a", "b"]), encode_row(&["c", "d"]));
        assert_eq!(count_data_rows(&text, "input,output"), 2);
        assert_eq!(count_data_rows("", "input,output"), 0);
    }

    #[test]
    fn test_quoted_row_is_not_a_header_line() {
        let text = encode_row(&["input", "output"]);
        assert!(!starts_with_header(&text, "input,output"));
        let with_data = format!("{}{}", text, encode_row(&["a", "b"]));
        assert_eq!(count_data_rows(&with_data, "input,output"), 2);
    }

    #[test]
    fn test_starts_with_header() {
        assert!(starts_with_header("input,output\n\"a\",\"b\"\n", "input,output"));
        assert!(starts_with_header("input,output", "input,output"));
        assert!(!starts_with_header("input,outputs\n", "input,output"));
        assert!(!starts_with_header("\"a\",\"b\"\n", "input,output"));
    }
}
