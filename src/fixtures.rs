//! Builders for the same logical collection rows encoded as CSV, DBF and XLSX.

use anyhow::Result;
use rust_xlsxwriter::Workbook;

use crate::models::CollectionRecord;

pub fn collection_row(serial: u32, bs_date: &str, member_code: &str) -> Vec<String> {
    let serial = serial.to_string();

    [
        serial.as_str(), "31/10/2025", bs_date, "M", "06:30", member_code, "COW", "12.5",
        "4.2", "28", "8.5", "3.1", "0.53", "1.06", "52.5", "0", "0", "1.5", "656.25", ""
    ]
    .iter()
    .map(|value| value.to_string())
    .collect()
}

pub fn csv_bytes(rows: &[Vec<String>]) -> Vec<u8> {
    let mut text = CollectionRecord::COLUMN_NAMES.join(",");
    text.push('\n');

    for row in rows {
        let line: Vec<String> = row.iter()
            .map(|value| if value.contains(',') { format!("\"{value}\"") } else { value.clone() })
            .collect();

        text.push_str(&line.join(","));
        text.push('\n');
    }

    text.into_bytes()
}

pub fn xlsx_bytes(rows: &[Vec<String>]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    {
        let worksheet = workbook.add_worksheet();

        for (column, name) in CollectionRecord::COLUMN_NAMES.iter().enumerate() {
            worksheet.write_string(0, column as u16, *name)?;
        }

        for (index, row) in rows.iter().enumerate() {
            for (column, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    worksheet.write_string(index as u32 + 1, column as u16, value.as_str())?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// (name, type, length) for the 20 collection columns.
const DBF_LAYOUT: [(&str, u8, u8); 20] = [
    ("SR_NO", b'N', 6), ("COLL_DATE", b'D', 8), ("NE_DATE", b'C', 10), ("SES_CODE", b'C', 1),
    ("COLL_TIME", b'C', 5), ("MEM_CODE", b'C', 6), ("CATEGORY", b'C', 5), ("VOLUME_LT", b'N', 10),
    ("FAT_PER", b'N', 10), ("CLR", b'N', 10), ("SNF", b'N', 10), ("PROTIEN", b'N', 10),
    ("KG_FAT", b'N', 10), ("KG_SNF", b'N', 10), ("RATE", b'N', 10), ("KG_RATE", b'N', 10),
    ("SNF_RATE", b'N', 10), ("TS_COMM", b'F', 10), ("AMOUNT", b'N', 12), ("REMARK", b'C', 20)
];

/// Encodes rows as a dBase III file. Rows whose index is in `deleted` carry the deletion flag.
pub fn dbf_bytes(rows: &[Vec<String>], deleted: &[usize]) -> Vec<u8> {
    let header_length = 32 + DBF_LAYOUT.len() * 32 + 1;
    let record_length = 1 + DBF_LAYOUT.iter().map(|(_, _, length)| *length as usize).sum::<usize>();

    let mut bytes = vec![0u8; 32];
    bytes[0] = 0x03;
    bytes[4..8].copy_from_slice(&(rows.len() as u32).to_le_bytes());
    bytes[8..10].copy_from_slice(&(header_length as u16).to_le_bytes());
    bytes[10..12].copy_from_slice(&(record_length as u16).to_le_bytes());

    for (name, field_type, length) in DBF_LAYOUT {
        let mut descriptor = [0u8; 32];
        descriptor[..name.len()].copy_from_slice(name.as_bytes());
        descriptor[11] = field_type;
        descriptor[16] = length;
        bytes.extend_from_slice(&descriptor);
    }

    bytes.push(0x0D);

    for (index, row) in rows.iter().enumerate() {
        bytes.push(if deleted.contains(&index) { 0x2A } else { b' ' });

        for ((_, field_type, length), value) in DBF_LAYOUT.iter().zip(row) {
            let length = *length as usize;
            let encoded = match *field_type {
                b'D' => dbf_date(value),
                b'N' | b'F' => format!("{value:>length$}"),
                _ => format!("{value:<length$}")
            };

            bytes.extend_from_slice(&encoded.as_bytes()[..length]);
        }
    }

    bytes.push(0x1A);
    bytes
}

fn dbf_date(value: &str) -> String {
    match value.split('/').collect::<Vec<_>>().as_slice() {
        [day, month, year] => format!("{year}{month}{day}"),
        _ => format!("{value:<8}")
    }
}
