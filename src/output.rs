use crate::common::{OutputFormat, RouterCertificate};
use crate::error::AppError;
use crate::filter::{BgpsecFilter, FilterId};
use crate::output_common::{make_header, render_lines, write_output};
use crate::rpki::rpki_loader::{RouterKeysJson, to_router_key_entries};
use crate::slurm::SlurmBgpsecFilter;
use chrono::Local;
use serde::Serialize;
use std::path::Path;

/// ルーター証明書を文字列化する
pub fn render_router_keys(
    certs: &[RouterCertificate],
    source: &str,
    filter_count: usize,
    format: OutputFormat,
) -> Result<String, AppError> {
    match format {
        OutputFormat::Json => {
            let doc = RouterKeysJson {
                router_keys: to_router_key_entries(certs),
            };
            let json = serde_json::to_string_pretty(&doc)
                .map_err(|e| AppError::Other(format!("Failed to encode router keys: {e}")))?;
            Ok(format!("{json}\n"))
        }
        OutputFormat::Txt => {
            let now_str = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
            let header = make_header(&now_str, source, filter_count);
            let lines = certs.iter().map(|cert| {
                let asns = cert
                    .asn
                    .iter()
                    .map(|a| a.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                format!("{} {}", cert.subject_key_identifier, asns)
            });
            Ok(render_lines(&header, lines))
        }
    }
}

/// フィルタ適用後のルーター鍵をファイル(または標準出力)に書き出す
pub async fn write_router_keys<P: AsRef<Path>>(
    path: P,
    certs: &[RouterCertificate],
    source: &str,
    filter_count: usize,
    format: OutputFormat,
) -> Result<(), AppError> {
    let content = render_router_keys(certs, source, filter_count, format)?;
    write_output(path, &content).await?;
    Ok(())
}

#[derive(Serialize)]
struct ListedFilter {
    id: FilterId,
    #[serde(flatten)]
    filter: SlurmBgpsecFilter,
}

/// フィルタ一覧を文字列化する
pub fn render_filter_list<I>(entries: I, format: OutputFormat) -> Result<String, AppError>
where
    I: IntoIterator<Item = (FilterId, BgpsecFilter)>,
{
    match format {
        OutputFormat::Json => {
            let listed = entries
                .into_iter()
                .map(|(id, filter)| ListedFilter {
                    id,
                    filter: SlurmBgpsecFilter::from(&filter),
                })
                .collect::<Vec<_>>();
            let json = serde_json::to_string_pretty(&listed)
                .map_err(|e| AppError::Other(format!("Failed to encode filter list: {e}")))?;
            Ok(format!("{json}\n"))
        }
        OutputFormat::Txt => Ok(render_lines(
            "",
            entries
                .into_iter()
                .map(|(id, filter)| format!("{id}\t{filter}")),
        )),
    }
}
