use serde::{Serialize, Serializer};
use std::fmt;
use std::fmt::{Display, Formatter};

/// Farmer/member secondary key as carried by a collection record.
///
/// Source systems pad member codes with leading zeros inconsistently (`"0003"` in one
/// export, `"3"` in another), so codes are normalized before they leave the engine.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct MemberCode(String);

impl MemberCode {
    /// Strips leading zeros, keeping a single `"0"` when the code is all zeros.
    /// An empty code stays empty.
    pub fn normalized(raw: &str) -> Self {
        if raw.is_empty() {
            return MemberCode(String::new());
        }

        match raw.trim_start_matches('0') {
            "" => MemberCode("0".to_string()),
            stripped => MemberCode(stripped.to_string()),
        }
    }

    /// Keeps the code exactly as read.
    pub fn verbatim(raw: impl Into<String>) -> Self {
        MemberCode(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for MemberCode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl Serialize for MemberCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}
