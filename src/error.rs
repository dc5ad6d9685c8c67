use std::io;
use thiserror::Error;
use tokio::task::JoinError;

#[derive(Error, Debug)]
pub enum AppError {
    // AS番号の文法・範囲違反
    #[error("Invalid ASN: {0}")]
    InvalidAsn(String),

    // SKI (16進文字列) が不正
    #[error("Invalid SKI: {0}")]
    InvalidSki(String),

    // asn/SKI のどちらも無いなど、フィルタとして成立しない
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    // ストアのI/O・デコード・トランザクション失敗
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    // IOまわりのエラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // 汎用的なパースエラー
    #[error("Parse error: {0}")]
    ParseError(String),

    // 特定の入力が不正だった場合など
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // tokio::task::spawn_blocking(…).await? のエラー
    #[error("Task join error: {0}")]
    JoinError(#[from] JoinError),

    // その他、文字列メッセージだけを格納した汎用エラー
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// 呼び出し側がリトライしてよいエラーか
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::StoreUnavailable(_))
    }
}
