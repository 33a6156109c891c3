//! Row tokenization
//!
//! Report-log rows are whitespace-delimited; column meaning is positional and
//! resolved later, per event kind, by the extractor. A couple of fields are
//! themselves composite (`MM/DD/YYYY` dates, `HH:MM` times) and get split a
//! second time with [`split_on`].

/// Split a raw line into whitespace-delimited fields.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_owned).collect()
}

/// Tokenize every line of the input, preserving file order. Blank lines
/// become empty rows so that row indices stay aligned with line numbers.
pub fn tokenize_lines(lines: &[String]) -> Vec<Vec<String>> {
    lines.iter().map(|line| tokenize(line)).collect()
}

/// Split a single field on a delimiter character. Empty input yields an
/// empty sequence.
pub fn split_on(delimiter: char, field: &str) -> Vec<String> {
    if field.is_empty() {
        return Vec::new();
    }
    field.split(delimiter).map(str::to_owned).collect()
}
