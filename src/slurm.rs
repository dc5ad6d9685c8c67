//! SLURM (RFC 8416) ドキュメントの入出力
//!
//! このクレートが扱うのは `bgpsecFilters` のみ。
//! プレフィックスフィルタ・アサーションは中身を解釈せずJSONのまま保持する。

use crate::asn::Asn;
use crate::constants::SLURM_VERSION;
use crate::error::AppError;
use crate::filter::BgpsecFilter;
use crate::ski::Ski;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// SLURMのBGPsecフィルタ1件 (`{ "asn"?, "SKI"?, "comment"? }`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlurmBgpsecFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asn: Option<u32>,
    #[serde(rename = "SKI", default, skip_serializing_if = "Option::is_none")]
    pub ski: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl From<&BgpsecFilter> for SlurmBgpsecFilter {
    fn from(filter: &BgpsecFilter) -> Self {
        SlurmBgpsecFilter {
            asn: filter.asn().map(Asn::into_u32),
            ski: filter.ski().map(Ski::to_hex),
            comment: filter.comment().map(str::to_string),
        }
    }
}

impl TryFrom<SlurmBgpsecFilter> for BgpsecFilter {
    type Error = AppError;

    fn try_from(value: SlurmBgpsecFilter) -> Result<Self, Self::Error> {
        let ski = value.ski.as_deref().map(Ski::parse_hex).transpose()?;
        BgpsecFilter::new(value.asn.map(Asn::from_u32), ski, value.comment)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutputFilters {
    #[serde(default)]
    pub prefix_filters: Vec<Value>,
    #[serde(default)]
    pub bgpsec_filters: Vec<SlurmBgpsecFilter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocallyAddedAssertions {
    #[serde(default)]
    pub prefix_assertions: Vec<Value>,
    #[serde(default)]
    pub bgpsec_assertions: Vec<Value>,
}

/// SLURMファイル全体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlurmFile {
    pub slurm_version: u32,
    #[serde(default)]
    pub validation_output_filters: ValidationOutputFilters,
    #[serde(default)]
    pub locally_added_assertions: LocallyAddedAssertions,
}

impl Default for SlurmFile {
    fn default() -> Self {
        SlurmFile {
            slurm_version: SLURM_VERSION,
            validation_output_filters: ValidationOutputFilters::default(),
            locally_added_assertions: LocallyAddedAssertions::default(),
        }
    }
}

impl SlurmFile {
    /// BGPsecフィルタのみを持つドキュメントを作る
    pub fn from_filters<'a, I>(filters: I) -> Self
    where
        I: IntoIterator<Item = &'a BgpsecFilter>,
    {
        let mut file = SlurmFile::default();
        file.validation_output_filters.bgpsec_filters =
            filters.into_iter().map(SlurmBgpsecFilter::from).collect();
        file
    }

    pub fn from_json(text: &str) -> Result<Self, AppError> {
        let file: SlurmFile = serde_json::from_str(text)
            .map_err(|e| AppError::ParseError(format!("Failed to parse SLURM JSON: {e}")))?;
        if file.slurm_version != SLURM_VERSION {
            return Err(AppError::InvalidInput(format!(
                "unsupported slurmVersion {}, expected {SLURM_VERSION}",
                file.slurm_version
            )));
        }
        Ok(file)
    }

    pub fn to_json_pretty(&self) -> Result<String, AppError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AppError::Other(format!("Failed to encode SLURM JSON: {e}")))
    }

    /// BGPsecフィルタをすべて検証して返す。1件でも不正ならエラー
    pub fn bgpsec_filters(&self) -> Result<Vec<BgpsecFilter>, AppError> {
        self.validation_output_filters
            .bgpsec_filters
            .iter()
            .cloned()
            .map(BgpsecFilter::try_from)
            .collect()
    }
}
