use std::borrow::Cow;
use std::mem::take;

use crate::models::ParseError;
use crate::parsers::Row;

/// Streams data rows out of a CSV buffer, one line at a time.
///
/// The first line is the header and is skipped, blank lines are ignored and every field is
/// trimmed. A double quote toggles an inside-quotes state wherever it appears in a field,
/// commas inside quotes are kept and the quote characters themselves are dropped. The state
/// resets on every line, so an unbalanced quote only ever affects its own row.
pub struct CsvRows<'a> {
    text: Cow<'a, str>,
    position: usize,
    total_rows: usize
}

impl<'a> CsvRows<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        //NOTE: Exports from older desktop tools are not always valid UTF-8, lossy decoding keeps the row usable
        let text = String::from_utf8_lossy(bytes);
        let position = text.find('\n').map_or(text.len(), |end| end + 1);

        Self {
            text,
            position,
            total_rows: count_data_lines(bytes)
        }
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }
}

impl Iterator for CsvRows<'_> {
    type Item = Result<Row, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.position < self.text.len() {
            let rest = &self.text[self.position..];
            let (line, consumed) = match rest.find('\n') {
                Some(end) => (&rest[..end], end + 1),
                None => (rest, rest.len())
            };

            self.position += consumed;

            if !line.trim().is_empty() {
                return Some(Ok(split_line(line)));
            }
        }

        None
    }
}

/// Splits one line on the commas that sit outside quotes.
fn split_line(line: &str) -> Row {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(take(&mut field).trim().to_string()),
            _ => field.push(ch)
        }
    }

    fields.push(field.trim().to_string());

    fields
}

fn count_data_lines(bytes: &[u8]) -> usize {
    bytes.split(|byte| *byte == b'\n')
        .skip(1)
        .filter(|line| !line.trim_ascii().is_empty())
        .count()
}
