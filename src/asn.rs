use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 32bit符号なしのAS番号
///
/// 比較は常に数値で行う。"AS64500" / "64500" / "0.64500" はすべて同じ値になる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Asn(u32);

impl Asn {
    pub const fn from_u32(value: u32) -> Self {
        Asn(value)
    }

    pub const fn into_u32(self) -> u32 {
        self.0
    }

    /// テキスト表現のAS番号をパースする
    ///
    /// 受け付ける形式:
    /// - `AS<n>` (プレフィックスは大文字小文字を区別しない)
    /// - `<n>`
    /// - `<high>.<low>` (asdot形式、各16bit)
    pub fn parse(text: &str) -> Result<Self, AppError> {
        let trimmed = text.trim();
        let body = strip_as_prefix(trimmed);

        if body.is_empty() {
            return Err(AppError::InvalidAsn(format!("empty AS number: {text:?}")));
        }

        match body.split_once('.') {
            Some((high, low)) => {
                let high = parse_digits(high, u16::MAX as u64, text)?;
                let low = parse_digits(low, u16::MAX as u64, text)?;
                Ok(Asn(((high as u32) << 16) | low as u32))
            }
            None => {
                let value = parse_digits(body, u32::MAX as u64, text)?;
                Ok(Asn(value as u32))
            }
        }
    }
}

fn strip_as_prefix(text: &str) -> &str {
    match text.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("AS") => &text[2..],
        _ => text,
    }
}

/// 10進数字のみを許可し、上限を超える値は拒否する
/// (u64::from_str は先頭の '+' を許してしまうため自前で判定)
fn parse_digits(digits: &str, max: u64, original: &str) -> Result<u64, AppError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::InvalidAsn(format!(
            "not a decimal AS number: {original:?}"
        )));
    }

    // 桁数が多すぎる場合は u64 でも溢れるので先に弾く
    let value = digits
        .parse::<u64>()
        .map_err(|_| AppError::InvalidAsn(format!("AS number out of range: {original:?}")))?;

    if value > max {
        return Err(AppError::InvalidAsn(format!(
            "AS number out of range: {original:?}"
        )));
    }
    Ok(value)
}

impl FromStr for Asn {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Asn::parse(s)
    }
}

impl From<u32> for Asn {
    fn from(value: u32) -> Self {
        Asn(value)
    }
}

impl From<Asn> for u32 {
    fn from(asn: Asn) -> Self {
        asn.0
    }
}

impl fmt::Display for Asn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AS{}", self.0)
    }
}
