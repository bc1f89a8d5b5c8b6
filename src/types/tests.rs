use super::{MemberCode, Phase};

#[test]
fn test_member_code_strips_leading_zeros() {
    let test_cases = vec![
        ("0003", "3"),
        ("0007", "7"),
        ("0125", "125"),
        ("42", "42"),
        ("100", "100"),
        ("000", "0"),
        ("0000", "0"),
        ("0", "0"),
        ("", ""),
    ];

    for (raw, expected) in test_cases {
        assert_eq!(MemberCode::normalized(raw).as_str(), expected, "normalizing {raw:?}");
    }
}

#[test]
fn test_member_code_keeps_non_numeric_codes_after_the_zeros() {
    assert_eq!(MemberCode::normalized("00A12").as_str(), "A12");
    assert_eq!(MemberCode::normalized("A0012").as_str(), "A0012");
}

#[test]
fn test_verbatim_member_code_is_untouched() {
    assert_eq!(MemberCode::verbatim("0003").to_string(), "0003");
}

#[test]
fn test_phase_displays_as_lowercase_label() {
    assert_eq!(Phase::Reading.to_string(), "reading");
    assert_eq!(Phase::Parsing.to_string(), "parsing");
    assert_eq!(Phase::Filtering.to_string(), "filtering");
    assert_eq!(Phase::Complete.to_string(), "complete");
}
