use serde::de::DeserializeOwned;

use crate::error::ApiwatchError;

#[derive(Debug, Clone)]
pub struct JsonlParseOutcome<T> {
    pub items: Vec<T>,
    pub skipped_lines: usize,
    pub first_error: Option<(usize, String)>,
}

/// Parses one JSON value per line; invalid lines are counted, not fatal.
pub fn parse_jsonl_tolerant<T>(raw: &str) -> JsonlParseOutcome<T>
where
    T: DeserializeOwned,
{
    let mut items = Vec::new();
    let mut skipped_lines = 0usize;
    let mut first_error = None::<(usize, String)>;

    for (line_no, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(line) {
            Ok(value) => items.push(value),
            Err(err) => {
                skipped_lines += 1;
                first_error.get_or_insert_with(|| (line_no + 1, err.to_string()));
            }
        }
    }

    JsonlParseOutcome {
        items,
        skipped_lines,
        first_error,
    }
}

pub fn jsonl_all_lines_invalid(
    label: &str,
    skipped_lines: usize,
    first_error: Option<&(usize, String)>,
) -> ApiwatchError {
    match first_error {
        Some((line_no, message)) => ApiwatchError::Validation(format!(
            "{label} parse failed: skipped {skipped_lines} invalid lines (first at line {line_no}: {message})"
        )),
        None => ApiwatchError::Validation(format!(
            "{label} parse failed: skipped {skipped_lines} invalid lines"
        )),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: u32,
    }

    #[test]
    fn invalid_lines_are_skipped_and_located() {
        let parsed = parse_jsonl_tolerant::<Row>("{\"id\":1}\n\nnot json\n{\"id\":2}\n{}\n");
        assert_eq!(parsed.items, vec![Row { id: 1 }, Row { id: 2 }]);
        assert_eq!(parsed.skipped_lines, 2);
        assert_eq!(parsed.first_error.map(|(line, _)| line), Some(3));
    }

    #[test]
    fn all_invalid_error_names_label_and_line() {
        let err = jsonl_all_lines_invalid("request log", 3, Some(&(1, "eof".to_string())));
        assert_eq!(err.code(), "VALIDATION_FAILED");
        assert!(err.to_string().contains("request log parse failed"));
        assert!(err.to_string().contains("line 1"));
    }
}
