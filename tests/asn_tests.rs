use bgpsec_filter::asn::Asn;
use bgpsec_filter::error::AppError;
use bgpsec_filter::ski::Ski;

#[test]
fn textual_forms_parse_to_the_same_number() {
    let forms = ["AS64500", "64500", "0.64500", "as64500", " AS64500 "];
    for form in forms {
        let asn = Asn::parse(form).unwrap_or_else(|e| panic!("failed to parse {form}: {e}"));
        assert_eq!(asn, Asn::from_u32(64500), "form {form}");
    }
}

#[test]
fn four_byte_asns_above_2_31_stay_unsigned() {
    let asn: Asn = "4200000000".parse().unwrap_or_else(|e| panic!("parse: {e}"));
    assert_eq!(asn.into_u32(), 4_200_000_000);
    assert_eq!(Asn::parse("AS4294967295").ok(), Some(Asn::from_u32(u32::MAX)));
    assert_eq!(Asn::parse("65535.65535").ok(), Some(Asn::from_u32(u32::MAX)));
    assert!(Asn::from_u32(4_200_000_000) > Asn::from_u32(1));
}

#[test]
fn rejects_out_of_range_and_garbage() {
    let bad = [
        "", "AS", "4294967296", "AS-1", "+5", "65536.0", "1.65536", "1.", ".1", "1.2.3", "ASX",
        "99999999999999999999999",
    ];
    for text in bad {
        match Asn::parse(text) {
            Err(AppError::InvalidAsn(_)) => {}
            other => panic!("expected InvalidAsn for {text:?}, got {other:?}"),
        }
    }
}

#[test]
fn display_uses_as_prefix() {
    assert_eq!(Asn::from_u32(65001).to_string(), "AS65001");
}

#[test]
fn ski_hex_is_case_insensitive() {
    let lower = Ski::parse_hex("abcdef0123").unwrap_or_else(|e| panic!("parse: {e}"));
    let upper = Ski::parse_hex("ABCDEF0123").unwrap_or_else(|e| panic!("parse: {e}"));
    assert_eq!(lower, upper);
    assert_eq!(lower.as_bytes(), &[0xab, 0xcd, 0xef, 0x01, 0x23]);
    assert_eq!(lower.to_string(), "ABCDEF0123");
}

#[test]
fn ski_rejects_invalid_hex() {
    for text in ["", "   ", "ABC", "zz"] {
        assert!(
            matches!(Ski::parse_hex(text), Err(AppError::InvalidSki(_))),
            "expected InvalidSki for {text:?}"
        );
    }
}
