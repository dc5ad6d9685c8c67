/// 検証済みルーター鍵 (BGPsecルーター証明書) を Routinator の JSON から読み込む実装。
use crate::asn::Asn;
use crate::common::RouterCertificate;
use crate::constants::{ROUTINATOR_ARGS, ROUTINATOR_BIN};
use crate::error::AppError;
use crate::ski::Ski;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    path::Path,
    process::{Command, Stdio},
};
use tracing::{debug, info};

/// Routinator JSON に含まれる最小限のフィールドだけ定義
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RouterKeysJson {
    #[serde(rename = "routerKeys", default)]
    pub router_keys: Vec<RouterKeyEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterKeyEntry {
    pub asn: AsnField, // 例: "AS64496" または 64496
    #[serde(rename = "SKI")]
    pub ski: String, // 例: "E2F0...", 16進
    #[serde(
        rename = "routerPublicKey",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub router_public_key: Option<String>,
}

/// asn は文字列でも数値でも受け付ける
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AsnField {
    Number(u32),
    Text(String),
}

impl AsnField {
    fn to_asn(&self) -> Result<Asn, AppError> {
        match self {
            AsnField::Number(n) => Ok(Asn::from_u32(*n)),
            AsnField::Text(s) => Asn::parse(s),
        }
    }
}

/// JSON文字列からルーター証明書の一覧を作る
///
/// Routinator は (ASN, 鍵) ごとに1エントリを出すので、
/// SKI と公開鍵が同じエントリは1枚の複数AS証明書にまとめる (初出順)。
pub fn parse_router_keys(json_str: &str) -> Result<Vec<RouterCertificate>, AppError> {
    let parsed: RouterKeysJson = serde_json::from_str(json_str)
        .map_err(|e| AppError::ParseError(format!("Failed to parse router keys JSON: {e}")))?;

    let mut certs: Vec<RouterCertificate> = Vec::new();
    let mut index: HashMap<(Ski, Option<String>), usize> = HashMap::new();

    for entry in parsed.router_keys {
        let asn = entry.asn.to_asn()?;
        let ski = Ski::parse_hex(&entry.ski)?;
        let key = (ski, entry.router_public_key);

        match index.get(&key) {
            Some(&pos) => {
                let cert = &mut certs[pos];
                if !cert.has_asn(asn) {
                    cert.asn.push(asn);
                }
            }
            None => {
                let (ski, public_key) = key.clone();
                index.insert(key, certs.len());
                certs.push(RouterCertificate {
                    asn: vec![asn],
                    subject_key_identifier: ski,
                    router_public_key: public_key,
                });
            }
        }
    }

    debug!(certificates = certs.len(), "parsed router keys");
    Ok(certs)
}

/// ルーター証明書を Routinator 形式のエントリに戻す (ASNごとに1エントリ)
pub fn to_router_key_entries<'a, I>(certs: I) -> Vec<RouterKeyEntry>
where
    I: IntoIterator<Item = &'a RouterCertificate>,
{
    certs
        .into_iter()
        .flat_map(|cert| {
            cert.asn.iter().map(move |asn| RouterKeyEntry {
                asn: AsnField::Text(asn.to_string()),
                ski: cert.subject_key_identifier.to_hex(),
                router_public_key: cert.router_public_key.clone(),
            })
        })
        .collect()
}

/// ファイルから読み込む
pub async fn load_router_keys_from_file(
    path: impl AsRef<Path>,
) -> Result<Vec<RouterCertificate>, AppError> {
    let path = path.as_ref();
    let json_str = tokio::fs::read_to_string(path).await?;
    let certs = parse_router_keys(&json_str)?;
    info!(path = %path.display(), certificates = certs.len(), "loaded router keys");
    Ok(certs)
}

/// Routinator を実行して読み込む
pub async fn load_router_keys_from_routinator() -> Result<Vec<RouterCertificate>, AppError> {
    // Routinator を blocking スレッドで実行
    let output_res = tokio::task::spawn_blocking(|| {
        Command::new(ROUTINATOR_BIN)
            .args(ROUTINATOR_ARGS)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output() // -> std::io::Result<Output>
    })
    .await?;

    let output = output_res?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AppError::Other(format!(
            "Routinator exited with code {}: {}",
            output.status, stderr
        )));
    }

    let json_str = String::from_utf8(output.stdout)
        .map_err(|e| AppError::ParseError(format!("Routinator output is not UTF-8: {e}")))?;
    let certs = parse_router_keys(&json_str)?;
    info!(certificates = certs.len(), "loaded router keys from routinator");
    Ok(certs)
}
