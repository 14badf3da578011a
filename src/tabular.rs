//! Flat-table interchange helpers.
//!
//! The pipeline boundary is plain delimited files, read and written by hand
//! the same way the rest of the codebase handles line-oriented sources. The
//! splitter understands double-quoted fields with embedded commas and `""`
//! escapes; the writer quotes only when a field needs it.

/// Split one CSV line into fields, honoring double-quoted fields.
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
            }
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

/// Escape one field for CSV output, quoting only when required.
pub fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Join fields into one CSV line.
pub fn join_line(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| escape_field(f))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_plain_fields() {
        assert_eq!(split_line("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(split_line("a,,c"), vec!["a", "", "c"]);
    }

    #[test]
    fn split_quoted_fields() {
        assert_eq!(
            split_line(r#"1,"hello, world",3"#),
            vec!["1", "hello, world", "3"]
        );
        assert_eq!(split_line(r#""say ""hi""",x"#), vec![r#"say "hi""#, "x"]);
    }

    #[test]
    fn escape_round_trip() {
        let fields = vec![
            "plain".to_string(),
            "with, comma".to_string(),
            "with \"quote\"".to_string(),
        ];
        let line = join_line(&fields);
        assert_eq!(split_line(&line), fields);
    }
}
