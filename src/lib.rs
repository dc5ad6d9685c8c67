//! SLURM (RFC 8416) BGPsecフィルタの管理と適用
//!
//! ローカルで定義したBGPsecフィルタをストアに保存し、
//! 検証済みのルーター証明書のうちフィルタにマッチするものを取り除く。
//!
//! ```rust
//! use bgpsec_filter::{AddFilter, FilterService, RouterCertificate, SlurmStore};
//! use bgpsec_filter::{asn::Asn, ski::Ski};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), bgpsec_filter::AppError> {
//! let service = FilterService::new(Arc::new(SlurmStore::in_memory()));
//! service
//!     .add(AddFilter { asn: Some("AS65001".into()), ..Default::default() })
//!     .await?;
//!
//! let certs = vec![
//!     RouterCertificate::new(vec![Asn::from_u32(65001)], Ski::parse_hex("AA")?),
//!     RouterCertificate::new(vec![Asn::from_u32(65002)], Ski::parse_hex("BB")?),
//! ];
//! let kept: Vec<_> = service.apply_iter(certs).await?.collect();
//! assert_eq!(kept.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod asn;
pub mod cli;
pub mod commands;
pub mod common;
pub mod constants;
pub mod engine;
pub mod error;
pub mod filter;
pub mod output;
pub mod output_common;
pub mod rpki;
pub mod service;
pub mod ski;
pub mod slurm;
pub mod store;

pub use common::RouterCertificate;
pub use engine::FilterEngine;
pub use error::AppError;
pub use filter::{AddFilter, BgpsecFilter, FilterId, FilterSet};
pub use service::FilterService;
pub use store::{FilterStore, SlurmStore};
