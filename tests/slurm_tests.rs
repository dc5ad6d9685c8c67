use bgpsec_filter::asn::Asn;
use bgpsec_filter::error::AppError;
use bgpsec_filter::filter::BgpsecFilter;
use bgpsec_filter::slurm::{SlurmBgpsecFilter, SlurmFile};

// RFC 8416 §3.5 の例をもとにしたSLURMファイル
const RFC_EXAMPLE: &str = r#"{
  "slurmVersion": 1,
  "validationOutputFilters": {
    "prefixFilters": [
      { "prefix": "192.0.2.0/24", "comment": "All VRPs encompassed by prefix" },
      { "asn": 64496, "comment": "All VRPs matching ASN" }
    ],
    "bgpsecFilters": [
      { "asn": 64496, "comment": "All keys for ASN" },
      { "SKI": "0123456789abcdef0123456789abcdef01234567", "comment": "Key matching Router SKI" },
      { "asn": 64497, "SKI": "FEDCBA9876543210FEDCBA9876543210FEDCBA98", "comment": "Key for ASN 64497 matching Router SKI" }
    ]
  },
  "locallyAddedAssertions": {
    "prefixAssertions": [
      { "asn": 64496, "prefix": "198.51.100.0/24", "comment": "My other important route" }
    ],
    "bgpsecAssertions": []
  }
}"#;

#[test]
fn parses_bgpsec_filters_from_rfc_example() {
    let file = SlurmFile::from_json(RFC_EXAMPLE).unwrap_or_else(|e| panic!("parse: {e}"));
    let filters = file.bgpsec_filters().unwrap_or_else(|e| panic!("filters: {e}"));
    assert_eq!(filters.len(), 3);

    assert_eq!(filters[0].asn(), Some(Asn::from_u32(64496)));
    assert!(filters[0].ski().is_none());

    assert!(filters[1].asn().is_none());
    let ski = filters[1].ski().unwrap_or_else(|| panic!("ski missing"));
    assert_eq!(ski.as_bytes().len(), 20);

    assert_eq!(filters[2].asn(), Some(Asn::from_u32(64497)));
    assert_eq!(filters[2].comment(), Some("Key for ASN 64497 matching Router SKI"));

    // プレフィックス側は解釈せず保持するだけ
    assert_eq!(file.validation_output_filters.prefix_filters.len(), 2);
}

#[test]
fn rejects_unknown_version() {
    let text = r#"{ "slurmVersion": 2 }"#;
    assert!(matches!(
        SlurmFile::from_json(text),
        Err(AppError::InvalidInput(_))
    ));
}

#[test]
fn rejects_filter_without_asn_and_ski() {
    let text = r#"{
      "slurmVersion": 1,
      "validationOutputFilters": { "bgpsecFilters": [ { "comment": "matches nothing" } ] }
    }"#;
    let file = SlurmFile::from_json(text).unwrap_or_else(|e| panic!("parse: {e}"));
    assert!(matches!(
        file.bgpsec_filters(),
        Err(AppError::InvalidFilter(_))
    ));
}

#[test]
fn export_omits_absent_members() {
    let filter = BgpsecFilter::new(Some(Asn::from_u32(65001)), None, None)
        .unwrap_or_else(|e| panic!("{e}"));
    let file = SlurmFile::from_filters([&filter]);
    let json = file.to_json_pretty().unwrap_or_else(|e| panic!("{e}"));
    let value: serde_json::Value = serde_json::from_str(&json).unwrap_or_else(|e| panic!("{e}"));

    assert_eq!(value["slurmVersion"], 1);
    let exported = &value["validationOutputFilters"]["bgpsecFilters"][0];
    assert_eq!(exported, &serde_json::json!({ "asn": 65001 }));
    assert!(value["locallyAddedAssertions"]["bgpsecAssertions"]
        .as_array()
        .is_some_and(|a| a.is_empty()));
}

#[test]
fn slurm_filter_converts_back_to_record() {
    let dto = SlurmBgpsecFilter {
        asn: None,
        ski: Some("aabb".to_string()),
        comment: Some("c".to_string()),
    };
    let filter = BgpsecFilter::try_from(dto).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(SlurmBgpsecFilter::from(&filter).ski.as_deref(), Some("AABB"));
}
