use crate::cli::AddArgs;
use crate::common::OutputFormat;
use crate::error::AppError;
use crate::filter::{AddFilter, FilterId};
use crate::output::render_filter_list;
use crate::output_common::write_output;
use crate::service::FilterService;
use crate::store::FilterStore;

/// フィルタを追加し、払い出したIDを表示
pub async fn run_add<S: FilterStore>(
    service: &FilterService<S>,
    args: AddArgs,
) -> Result<FilterId, AppError> {
    let command = AddFilter {
        asn: args.asn,
        ski: args.ski,
        comment: args.comment,
    };
    let id = service.add(command).await?;
    println!("{id}");
    Ok(id)
}

pub async fn run_remove<S: FilterStore>(
    service: &FilterService<S>,
    id: u64,
) -> Result<(), AppError> {
    service.remove(FilterId::new(id)).await
}

/// 一覧を標準出力へ
pub async fn run_list<S: FilterStore>(
    service: &FilterService<S>,
    output_format: &str,
) -> Result<(), AppError> {
    let format: OutputFormat = output_format
        .parse()
        .map_err(|e: &str| AppError::InvalidInput(e.to_string()))?;
    let content = render_filter_list(service.entries().await?, format)?;
    write_output("-", &content).await?;
    Ok(())
}

pub async fn run_clear<S: FilterStore>(service: &FilterService<S>) -> Result<(), AppError> {
    service.clear().await
}
