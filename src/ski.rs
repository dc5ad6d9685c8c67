use crate::error::AppError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Subject Key Identifier (通常は公開鍵のSHA-1で20バイト)
///
/// 内部では生バイト列で保持し、比較はバイト単位で行う。
/// テキストでは大文字小文字を区別しない16進表現を受け付け、表示は大文字。
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ski(Vec<u8>);

impl Ski {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Ski(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// 16進文字列からSKIを作る
    pub fn parse_hex(text: &str) -> Result<Self, AppError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(AppError::InvalidSki("empty SKI".to_string()));
        }
        // hex::decode は大文字小文字どちらも受け付ける
        let bytes = hex::decode(trimmed)
            .map_err(|e| AppError::InvalidSki(format!("{trimmed:?}: {e}")))?;
        Ok(Ski(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(&self.0)
    }
}

impl FromStr for Ski {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ski::parse_hex(s)
    }
}

impl fmt::Display for Ski {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Ski {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ski({})", self.to_hex())
    }
}

impl Serialize for Ski {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Ski {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ski::parse_hex(&text).map_err(serde::de::Error::custom)
    }
}
