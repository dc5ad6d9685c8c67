use bgpsec_filter::asn::Asn;
use bgpsec_filter::engine::{FilterEngine, filter_matches, is_emitted};
use bgpsec_filter::error::AppError;
use bgpsec_filter::filter::{AddFilter, BgpsecFilter};
use bgpsec_filter::ski::Ski;
use bgpsec_filter::RouterCertificate;
use futures::{StreamExt, TryStreamExt, stream};

fn ski(byte: u8) -> Ski {
    Ski::from_bytes(vec![byte])
}

fn cert(asns: &[u32], ski_byte: u8) -> RouterCertificate {
    RouterCertificate::new(asns.iter().copied().map(Asn::from_u32).collect(), ski(ski_byte))
}

fn filter(asn: Option<u32>, ski_byte: Option<u8>) -> BgpsecFilter {
    BgpsecFilter::new(asn.map(Asn::from_u32), ski_byte.map(ski), None)
        .unwrap_or_else(|e| panic!("filter: {e}"))
}

// rc1(asn={65001}, ski=0xAA), rc2(asn={65002}, ski=0xBB)
fn sample() -> Vec<RouterCertificate> {
    vec![cert(&[65001], 0xAA), cert(&[65002], 0xBB)]
}

fn run(filters: &[BgpsecFilter]) -> Vec<RouterCertificate> {
    FilterEngine::new(filters).filter_iter(sample()).collect()
}

#[test]
fn empty_filter_set_keeps_everything() {
    assert_eq!(run(&[]), sample());
}

#[test]
fn asn_only_filter() {
    assert_eq!(run(&[filter(Some(65001), None)]), vec![cert(&[65002], 0xBB)]);
}

#[test]
fn ski_only_filter() {
    assert_eq!(run(&[filter(None, Some(0xBB))]), vec![cert(&[65001], 0xAA)]);
}

#[test]
fn combined_filter_requires_both() {
    // どちらの証明書も両条件は満たさない
    assert_eq!(run(&[filter(Some(65001), Some(0xBB))]), sample());
    // 両方一致すれば除外
    assert_eq!(
        run(&[filter(Some(65002), Some(0xBB))]),
        vec![cert(&[65001], 0xAA)]
    );
}

#[test]
fn independent_filters_are_ored() {
    let out = run(&[filter(Some(65001), None), filter(None, Some(0xBB))]);
    assert!(out.is_empty());
}

#[test]
fn multi_asn_certificate_is_suppressed_by_any_of_its_asns() {
    let engine = FilterEngine::new(&[filter(Some(65010), None)]);
    assert!(!engine.permits(&cert(&[65001, 65010, 65020], 0xAA)));
    assert!(engine.permits(&cert(&[65001, 65020], 0xAA)));

    let combined = FilterEngine::new(&[filter(Some(65010), Some(0xAA))]);
    assert!(!combined.permits(&cert(&[65001, 65010], 0xAA)));
    assert!(combined.permits(&cert(&[65001, 65010], 0xBB)));
}

#[test]
fn asn_filter_does_not_match_certificate_without_asns() {
    let f = filter(Some(65001), None);
    let c = cert(&[], 0xAA);
    assert!(!filter_matches(&f, &c));
    assert!(is_emitted(&c, [&f]));
    assert!(FilterEngine::new([&f]).permits(&c));
}

#[test]
fn order_of_survivors_is_preserved() {
    let input: Vec<RouterCertificate> = (0..20u8)
        .map(|i| cert(&[65000 + i as u32], i))
        .collect();
    let filters: Vec<BgpsecFilter> = (0..20u8)
        .step_by(3)
        .map(|i| filter(None, Some(i)))
        .collect();

    let out: Vec<RouterCertificate> = FilterEngine::new(&filters)
        .filter_iter(input.clone())
        .collect();
    let expected: Vec<RouterCertificate> = input
        .into_iter()
        .filter(|c| c.subject_key_identifier.as_bytes()[0] % 3 != 0)
        .collect();
    assert_eq!(out, expected);
}

#[test]
fn textual_asn_forms_match_the_same_certificates() {
    for form in ["AS65001", "65001", "0.65001"] {
        let f = AddFilter {
            asn: Some(form.to_string()),
            ..Default::default()
        }
        .into_filter()
        .unwrap_or_else(|e| panic!("into_filter {form}: {e}"));
        assert_eq!(run(&[f]), vec![cert(&[65002], 0xBB)], "form {form}");
    }
}

#[test]
fn filtering_is_lazy() {
    // 無限列でも先頭から必要な分だけ取り出せる
    let engine = FilterEngine::new(&[filter(None, Some(0))]);
    let endless = (0u32..).map(|i| cert(&[i], (i % 2) as u8));
    let first: Vec<RouterCertificate> = engine.filter_iter(endless).take(3).collect();
    assert_eq!(first, vec![cert(&[1], 1), cert(&[3], 1), cert(&[5], 1)]);
}

#[tokio::test]
async fn stream_filtering_passes_input_errors_through() {
    let engine = FilterEngine::new(&[filter(Some(65001), None)]);
    let input = stream::iter(vec![
        Ok(cert(&[65001], 0xAA)),
        Err(AppError::Other("upstream broke".to_string())),
        Ok(cert(&[65002], 0xBB)),
    ]);

    let items: Vec<Result<RouterCertificate, AppError>> =
        engine.filter_stream(input).collect().await;
    assert_eq!(items.len(), 2);
    assert!(matches!(&items[0], Err(AppError::Other(msg)) if msg == "upstream broke"));
    assert!(matches!(&items[1], Ok(c) if *c == cert(&[65002], 0xBB)));
}

#[tokio::test]
async fn empty_stream_yields_nothing() {
    let engine = FilterEngine::new(&[filter(Some(65001), None)]);
    let input = stream::iter(Vec::<Result<RouterCertificate, AppError>>::new());
    let out: Vec<RouterCertificate> = engine
        .filter_stream(input)
        .try_collect()
        .await
        .unwrap_or_else(|e| panic!("collect: {e}"));
    assert!(out.is_empty());
}
