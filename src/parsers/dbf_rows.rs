use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::ParseError;
use crate::parsers::Row;

const PREAMBLE_LENGTH: usize = 32;
const DESCRIPTOR_LENGTH: usize = 32;
const FIELD_NAME_LENGTH: usize = 11;
const FIELD_TYPE_OFFSET: usize = 11;
const FIELD_LENGTH_OFFSET: usize = 16;
const DESCRIPTOR_TERMINATOR: u8 = 0x0D;
const DELETED_FLAG: u8 = 0x2A;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DbfFieldType {
    Character,
    Numeric,
    Float,
    Date,
    Other(u8)
}

impl From<u8> for DbfFieldType {
    fn from(code: u8) -> Self {
        match code {
            b'C' => Self::Character,
            b'N' => Self::Numeric,
            b'F' => Self::Float,
            b'D' => Self::Date,
            other => Self::Other(other)
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DbfField {
    pub name: String,
    pub field_type: DbfFieldType,
    pub length: usize
}

/// Fixed part of a dBase III/IV header.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct DbfHeader {
    pub record_count: u32,
    pub header_length: usize,
    pub record_length: usize
}

/// Decodes dBase records straight out of the raw buffer, one record per call.
///
/// Records flagged as deleted are skipped entirely. `N`/`F` fields are rendered through a
/// decimal parse (falling back to the trimmed text), `D` fields are rewritten from
/// `YYYYMMDD` to `dd/mm/yyyy`, everything else is trimmed text.
pub struct DbfRows<'a> {
    bytes: &'a [u8],
    header: DbfHeader,
    fields: Vec<DbfField>,
    next_record: u32
}

impl<'a> DbfRows<'a> {
    pub fn new(bytes: &'a [u8]) -> Result<Self, ParseError> {
        let header = read_header(bytes)?;
        let fields = read_field_descriptors(bytes, header.header_length);

        let data_length: usize = fields.iter().map(|field| field.length).sum();

        if 1 + data_length > header.record_length {
            return Err(ParseError::malformed_header(format!(
                "Field lengths sum to {data_length} bytes but records are only {} bytes long",
                header.record_length
            )));
        }

        debug!(
            "DBF header: {} records, {} fields, header {} bytes, record {} bytes",
            header.record_count, fields.len(), header.header_length, header.record_length
        );

        Ok(Self {
            bytes,
            header,
            fields,
            next_record: 0
        })
    }

    pub fn header(&self) -> DbfHeader {
        self.header
    }

    pub fn fields(&self) -> &[DbfField] {
        &self.fields
    }

    pub fn total_rows(&self) -> usize {
        self.header.record_count as usize
    }

    fn decode_record(&self, record: &[u8]) -> Row {
        let mut offset = 1;

        self.fields.iter()
            .map(|field| {
                let value = decode_field(&record[offset..offset + field.length], field.field_type);
                offset += field.length;
                value
            })
            .collect()
    }
}

impl Iterator for DbfRows<'_> {
    type Item = Result<Row, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let DbfHeader { record_count, header_length, record_length } = self.header;

        while self.next_record < record_count {
            let index = self.next_record;
            self.next_record += 1;

            let start = header_length + index as usize * record_length;
            let Some(record) = self.bytes.get(start..start + record_length) else {
                self.next_record = record_count;
                return Some(Err(ParseError::truncated_record(index, start)));
            };

            if record[0] == DELETED_FLAG {
                continue;
            }

            return Some(Ok(self.decode_record(record)));
        }

        None
    }
}

fn read_header(bytes: &[u8]) -> Result<DbfHeader, ParseError> {
    if bytes.len() < PREAMBLE_LENGTH {
        return Err(ParseError::malformed_header(format!(
            "DBF header needs {PREAMBLE_LENGTH} bytes, file has {}",
            bytes.len()
        )));
    }

    let record_count = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    let header_length = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
    let record_length = u16::from_le_bytes([bytes[10], bytes[11]]) as usize;

    if header_length < PREAMBLE_LENGTH || header_length > bytes.len() {
        return Err(ParseError::malformed_header(format!(
            "DBF header length {header_length} is outside the file ({} bytes)",
            bytes.len()
        )));
    }

    if record_length == 0 {
        return Err(ParseError::malformed_header("DBF record length is zero"));
    }

    Ok(DbfHeader {
        record_count,
        header_length,
        record_length
    })
}

fn read_field_descriptors(bytes: &[u8], header_length: usize) -> Vec<DbfField> {
    let mut fields = Vec::new();
    let mut offset = PREAMBLE_LENGTH;

    while offset + DESCRIPTOR_LENGTH <= header_length {
        let descriptor = &bytes[offset..offset + DESCRIPTOR_LENGTH];

        if descriptor[0] == DESCRIPTOR_TERMINATOR {
            break;
        }

        let name: String = latin1(&descriptor[..FIELD_NAME_LENGTH])
            .replace('\0', "")
            .trim()
            .to_string();

        if name.is_empty() {
            break;
        }

        fields.push(DbfField {
            name,
            field_type: DbfFieldType::from(descriptor[FIELD_TYPE_OFFSET]),
            length: descriptor[FIELD_LENGTH_OFFSET] as usize
        });

        offset += DESCRIPTOR_LENGTH;
    }

    fields
}

fn decode_field(bytes: &[u8], field_type: DbfFieldType) -> String {
    let text = latin1(bytes);
    let text = text.trim_matches(|c: char| c.is_whitespace() || c == '\0');

    match field_type {
        DbfFieldType::Numeric | DbfFieldType::Float => Decimal::from_str(text)
            .map(|number| number.normalize().to_string())
            .unwrap_or_else(|_| text.to_string()),
        DbfFieldType::Date if text.len() == 8 && text.is_ascii() => {
            format!("{}/{}/{}", &text[6..8], &text[4..6], &text[0..4])
        }
        _ => text.to_string()
    }
}

//NOTE: dBase has no reliable encoding marker in the files we receive, bytes map one-to-one onto chars
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| *byte as char).collect()
}
