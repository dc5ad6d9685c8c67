//! BGPsecフィルタの適用 (RFC 8416 §3.3.2)
//!
//! 証明書は、スナップショット中の**どの**フィルタにもマッチしない場合にのみ出力される。
//! フィルタのマッチ条件は、存在する項目のAND:
//!
//! - asn がある: 証明書のASN集合のいずれかが数値として一致する
//!   (証明書にASNが無ければ不一致)
//! - SKI がある: 証明書のSKIとバイト単位で一致する

use crate::asn::Asn;
use crate::common::RouterCertificate;
use crate::filter::{BgpsecFilter, FilterSet};
use crate::ski::Ski;
use futures::stream::{BoxStream, Stream, StreamExt, TryStreamExt};
use std::collections::{HashMap, HashSet};
use std::future;
use std::sync::Arc;

/// 1つのフィルタが証明書にマッチするか
pub fn filter_matches(filter: &BgpsecFilter, cert: &RouterCertificate) -> bool {
    let asn_matches = match filter.asn() {
        Some(asn) => cert.has_asn(asn),
        None => true,
    };
    let ski_matches = match filter.ski() {
        Some(ski) => *ski == cert.subject_key_identifier,
        None => true,
    };
    asn_matches && ski_matches
}

/// いずれのフィルタにもマッチしなければ true (出力対象)
pub fn is_emitted<'a, I>(cert: &RouterCertificate, filters: I) -> bool
where
    I: IntoIterator<Item = &'a BgpsecFilter>,
{
    !filters.into_iter().any(|f| filter_matches(f, cert))
}

/// スナップショットから組み立てた判定器
///
/// フィルタを種類別の索引に分けておき、証明書1枚あたりの判定を
/// ASN数に比例する程度のコストに抑える。判定結果は `is_emitted` と同じ。
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    inner: Arc<CompiledFilters>,
}

#[derive(Debug, Default)]
struct CompiledFilters {
    // asn のみのフィルタ
    by_asn: HashSet<Asn>,
    // SKI のみのフィルタ
    by_ski: HashSet<Ski>,
    // 両方指定されたフィルタ: SKI -> ASN集合
    by_pair: HashMap<Ski, HashSet<Asn>>,
    len: usize,
}

impl FilterEngine {
    pub fn new<'a, I>(filters: I) -> Self
    where
        I: IntoIterator<Item = &'a BgpsecFilter>,
    {
        let mut compiled = CompiledFilters::default();
        for filter in filters {
            compiled.len += 1;
            match (filter.asn(), filter.ski()) {
                (Some(asn), Some(ski)) => {
                    compiled.by_pair.entry(ski.clone()).or_default().insert(asn);
                }
                (Some(asn), None) => {
                    compiled.by_asn.insert(asn);
                }
                (None, Some(ski)) => {
                    compiled.by_ski.insert(ski.clone());
                }
                // BgpsecFilter::new が弾くので到達しない
                (None, None) => {}
            }
        }
        FilterEngine {
            inner: Arc::new(compiled),
        }
    }

    pub fn from_set(set: &FilterSet) -> Self {
        FilterEngine::new(set.filters())
    }

    /// 元になったフィルタの件数
    pub fn len(&self) -> usize {
        self.inner.len
    }

    pub fn is_empty(&self) -> bool {
        self.inner.len == 0
    }

    /// 証明書を出力してよいか
    pub fn permits(&self, cert: &RouterCertificate) -> bool {
        let f = &*self.inner;
        let ski = &cert.subject_key_identifier;

        if f.by_ski.contains(ski) {
            return false;
        }
        if cert.asn.iter().any(|asn| f.by_asn.contains(asn)) {
            return false;
        }
        match f.by_pair.get(ski) {
            Some(asns) => !cert.asn.iter().any(|asn| asns.contains(asn)),
            None => true,
        }
    }

    /// イテレータを遅延評価でフィルタする
    pub fn filter_iter<I>(self, input: I) -> FilteredCertificates<I::IntoIter>
    where
        I: IntoIterator<Item = RouterCertificate>,
    {
        FilteredCertificates {
            engine: self,
            input: input.into_iter(),
        }
    }

    /// ストリームを遅延評価でフィルタする
    ///
    /// 入力側のエラーはそのまま出力に流す。出力を drop するとスナップショットも解放される。
    pub fn filter_stream<S, E>(self, input: S) -> BoxStream<'static, Result<RouterCertificate, E>>
    where
        S: Stream<Item = Result<RouterCertificate, E>> + Send + 'static,
        E: Send + 'static,
    {
        input
            .try_filter(move |cert| future::ready(self.permits(cert)))
            .boxed()
    }
}

/// `FilterEngine::filter_iter` の戻り値
#[derive(Debug)]
pub struct FilteredCertificates<I> {
    engine: FilterEngine,
    input: I,
}

impl<I> Iterator for FilteredCertificates<I>
where
    I: Iterator<Item = RouterCertificate>,
{
    type Item = RouterCertificate;

    fn next(&mut self) -> Option<Self::Item> {
        let engine = &self.engine;
        self.input.by_ref().find(|cert| engine.permits(cert))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.input.size_hint().1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ski(b: u8) -> Ski {
        Ski::from_bytes(vec![b; 20])
    }

    fn filter(asn: Option<u32>, ski_byte: Option<u8>) -> BgpsecFilter {
        BgpsecFilter::new(asn.map(Asn::from_u32), ski_byte.map(ski), None)
            .unwrap_or_else(|e| panic!("filter: {e}"))
    }

    #[test]
    fn compiled_engine_agrees_with_literal_predicate() {
        let filters = vec![
            filter(Some(1), None),
            filter(None, Some(0xAA)),
            filter(Some(2), Some(0xBB)),
            filter(Some(3), Some(0xBB)),
        ];
        let engine = FilterEngine::new(&filters);

        // ASN 0..5 の組み合わせ × SKI 3種類を総当たり
        for mask in 0u32..32 {
            let asns: Vec<Asn> = (0..5)
                .filter(|bit| mask & (1 << bit) != 0)
                .map(Asn::from_u32)
                .collect();
            for s in [0xAA, 0xBB, 0xCC] {
                let cert = RouterCertificate::new(asns.clone(), ski(s));
                assert_eq!(
                    engine.permits(&cert),
                    is_emitted(&cert, &filters),
                    "mismatch for asns={asns:?} ski={s:#x}"
                );
            }
        }
    }

    #[test]
    fn certificate_without_asn_never_matches_asn_filter() {
        let engine = FilterEngine::new(&[filter(Some(1), None)]);
        assert!(engine.permits(&RouterCertificate::new(vec![], ski(0xAA))));
    }
}
