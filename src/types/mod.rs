mod member_code;
mod phase;
#[cfg(test)]
mod tests;

pub use member_code::MemberCode;
pub use phase::Phase;

/// Bikram Sambat date exactly as it appears in the source file (`dd/mm/yyyy`).
pub type BsDate = String;
