use crate::asn::Asn;
use crate::ski::Ski;
use std::str::FromStr;

/// 検証済みのBGPsecルーター証明書
///
/// 1枚の証明書が複数のASを委任できるため asn は集合として扱う。
/// フィルタ判定に使うのは asn と SKI のみで、公開鍵は素通しする。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterCertificate {
    pub asn: Vec<Asn>,
    pub subject_key_identifier: Ski,
    pub router_public_key: Option<String>,
}

impl RouterCertificate {
    pub fn new(asn: Vec<Asn>, subject_key_identifier: Ski) -> Self {
        RouterCertificate {
            asn,
            subject_key_identifier,
            router_public_key: None,
        }
    }

    pub fn has_asn(&self, asn: Asn) -> bool {
        self.asn.contains(&asn)
    }
}

/// 出力形式を管理するためのenum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Txt,
}

impl FromStr for OutputFormat {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "txt" => Ok(OutputFormat::Txt),
            _ => Err("Invalid output format. Must be 'json' or 'txt'"),
        }
    }
}
