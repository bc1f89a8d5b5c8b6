use serde::Serialize;

use crate::types::MemberCode;

/// Number of positional columns in a collection export.
pub const RECORD_WIDTH: usize = 20;
/// Rows with fewer populated columns than this are treated as malformed or trailing rows.
pub const MIN_FIELDS: usize = 19;
/// Position of the BS collection date, the column every filter and statistic keys on.
pub const BS_DATE_COLUMN: usize = 2;
/// Position of the member code, the only column rewritten after decoding.
pub const MEMBER_CODE_COLUMN: usize = 5;

/// One milk collection entry with the fixed 20-column layout shared by every export format.
///
/// Every value is kept as the text found in the source file; numeric interpretation is left
/// to downstream consumers. Fields are private so a record cannot change once built.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct CollectionRecord {
    #[serde(rename = "Sr_no")]
    serial_number: String,
    #[serde(rename = "Coll_Date")]
    collection_date: String,
    #[serde(rename = "Ne_date")]
    bs_date: String,
    #[serde(rename = "Ses_code")]
    session_code: String,
    #[serde(rename = "Coll_time")]
    collection_time: String,
    #[serde(rename = "Mem_code")]
    member_code: MemberCode,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Volume_lt")]
    volume_litres: String,
    #[serde(rename = "Fat_per")]
    fat_percent: String,
    #[serde(rename = "Clr")]
    density: String,
    #[serde(rename = "Snf")]
    snf_percent: String,
    #[serde(rename = "Protien")]
    protein_percent: String,
    #[serde(rename = "Kg_fat")]
    fat_kg: String,
    #[serde(rename = "Kg_snf")]
    snf_kg: String,
    #[serde(rename = "Rate")]
    rate: String,
    #[serde(rename = "Kg_rate")]
    kg_rate: String,
    #[serde(rename = "Snf_rate")]
    snf_rate: String,
    #[serde(rename = "Ts_comm")]
    total_commission: String,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Remark")]
    remark: String
}

impl CollectionRecord {
    /// Column headers used when records are written back out, in positional order.
    pub const COLUMN_NAMES: [&'static str; RECORD_WIDTH] = [
        "Sr_no", "Coll_Date", "Ne_date", "Ses_code", "Coll_time", "Mem_code", "Category",
        "Volume_lt", "Fat_per", "Clr", "Snf", "Protien", "Kg_fat", "Kg_snf", "Rate",
        "Kg_rate", "Snf_rate", "Ts_comm", "Amount", "Remark"
    ];

    /// Builds a record from positional cells.
    ///
    /// Missing trailing cells become empty strings and cells past the twentieth are ignored.
    /// When `normalize` is set the member code has its leading zeros stripped; every other
    /// value passes through verbatim.
    pub fn from_fields(fields: Vec<String>, normalize: bool) -> Self {
        let mut cells = fields.into_iter();
        let mut next = || cells.next().unwrap_or_default();

        let serial_number = next();
        let collection_date = next();
        let bs_date = next();
        let session_code = next();
        let collection_time = next();
        let raw_member_code = next();
        let member_code = if normalize {
            MemberCode::normalized(&raw_member_code)
        } else {
            MemberCode::verbatim(raw_member_code)
        };

        Self {
            serial_number,
            collection_date,
            bs_date,
            session_code,
            collection_time,
            member_code,
            category: next(),
            volume_litres: next(),
            fat_percent: next(),
            density: next(),
            snf_percent: next(),
            protein_percent: next(),
            fat_kg: next(),
            snf_kg: next(),
            rate: next(),
            kg_rate: next(),
            snf_rate: next(),
            total_commission: next(),
            amount: next(),
            remark: next()
        }
    }

    /// All values in positional order.
    pub fn fields(&self) -> [&str; RECORD_WIDTH] {
        [
            &self.serial_number,
            &self.collection_date,
            &self.bs_date,
            &self.session_code,
            &self.collection_time,
            self.member_code.as_str(),
            &self.category,
            &self.volume_litres,
            &self.fat_percent,
            &self.density,
            &self.snf_percent,
            &self.protein_percent,
            &self.fat_kg,
            &self.snf_kg,
            &self.rate,
            &self.kg_rate,
            &self.snf_rate,
            &self.total_commission,
            &self.amount,
            &self.remark
        ]
    }

    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    /// Gregorian collection date.
    pub fn collection_date(&self) -> &str {
        &self.collection_date
    }

    pub fn bs_date(&self) -> &str {
        &self.bs_date
    }

    pub fn session_code(&self) -> &str {
        &self.session_code
    }

    pub fn collection_time(&self) -> &str {
        &self.collection_time
    }

    pub fn member_code(&self) -> &MemberCode {
        &self.member_code
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn volume_litres(&self) -> &str {
        &self.volume_litres
    }

    pub fn fat_percent(&self) -> &str {
        &self.fat_percent
    }

    pub fn snf_percent(&self) -> &str {
        &self.snf_percent
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn remark(&self) -> &str {
        &self.remark
    }
}
