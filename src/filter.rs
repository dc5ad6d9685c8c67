use crate::asn::Asn;
use crate::constants::MAX_COMMENT_LEN;
use crate::error::AppError;
use crate::ski::Ski;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ストアが払い出すフィルタID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterId(u64);

impl FilterId {
    pub const fn new(value: u64) -> Self {
        FilterId(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ローカルで定義したBGPsecフィルタ (RFC 8416 §3.3.2)
///
/// asn / ski のどちらか一方は必ず存在する。構築後は不変。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BgpsecFilter {
    asn: Option<Asn>,
    ski: Option<Ski>,
    comment: Option<String>,
}

impl BgpsecFilter {
    pub fn new(
        asn: Option<Asn>,
        ski: Option<Ski>,
        comment: Option<String>,
    ) -> Result<Self, AppError> {
        if asn.is_none() && ski.is_none() {
            return Err(AppError::InvalidFilter(
                "at least one of asn or SKI must be present".to_string(),
            ));
        }
        if let Some(text) = &comment {
            let len = text.chars().count();
            if len > MAX_COMMENT_LEN {
                return Err(AppError::InvalidFilter(format!(
                    "comment is {len} characters long, limit is {MAX_COMMENT_LEN}"
                )));
            }
        }
        Ok(BgpsecFilter { asn, ski, comment })
    }

    pub fn asn(&self) -> Option<Asn> {
        self.asn
    }

    pub fn ski(&self) -> Option<&Ski> {
        self.ski.as_ref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

impl fmt::Display for BgpsecFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let asn = self.asn.map(|a| a.to_string()).unwrap_or_else(|| "*".to_string());
        let ski = self.ski.as_ref().map(Ski::to_hex).unwrap_or_else(|| "*".to_string());
        write!(f, "asn={asn} SKI={ski}")?;
        if let Some(comment) = &self.comment {
            write!(f, " # {comment}")?;
        }
        Ok(())
    }
}

/// フィルタ追加コマンド (REST/CLIからの入力)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddFilter {
    #[serde(default)]
    pub asn: Option<String>,
    #[serde(default, alias = "SKI")]
    pub ski: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl AddFilter {
    /// テキスト入力を検証して BgpsecFilter に変換する
    /// 空白のみの値は未指定として扱う
    pub fn into_filter(self) -> Result<BgpsecFilter, AppError> {
        let asn = non_blank(self.asn).map(|s| Asn::parse(&s)).transpose()?;
        let ski = non_blank(self.ski).map(|s| Ski::parse_hex(&s)).transpose()?;
        let comment = non_blank(self.comment);
        BgpsecFilter::new(asn, ski, comment)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// ストア内のBGPsecフィルタ一覧
///
/// 挿入順を保持する。件数は人手で書く程度なので線形走査で十分。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    entries: Vec<(FilterId, BgpsecFilter)>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: FilterId, filter: BgpsecFilter) {
        self.entries.push((id, filter));
    }

    /// 指定IDを除外する。実際に削除した場合のみ true
    pub fn remove(&mut self, id: FilterId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() < before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, id: FilterId) -> Option<&BgpsecFilter> {
        self.entries
            .iter()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, filter)| filter)
    }

    pub fn entry(&self, index: usize) -> Option<&(FilterId, BgpsecFilter)> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(FilterId, BgpsecFilter)> {
        self.entries.iter()
    }

    pub fn filters(&self) -> impl Iterator<Item = &BgpsecFilter> {
        self.entries.iter().map(|(_, filter)| filter)
    }

    pub fn max_id(&self) -> Option<FilterId> {
        self.entries.iter().map(|(id, _)| *id).max()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
