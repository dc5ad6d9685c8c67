use crate::cli::ApplyArgs;
use crate::common::{OutputFormat, RouterCertificate};
use crate::error::AppError;
use crate::output::write_router_keys;
use crate::rpki::rpki_loader::{load_router_keys_from_file, load_router_keys_from_routinator};
use crate::service::FilterService;
use crate::store::FilterStore;
use futures::{TryStreamExt, stream};
use tracing::info;

/// ルーター鍵を読み込み、フィルタを適用して書き出す
pub async fn run_apply<S: FilterStore>(
    service: &FilterService<S>,
    args: ApplyArgs,
) -> Result<Vec<RouterCertificate>, AppError> {
    let format: OutputFormat = args
        .output_format
        .parse()
        .map_err(|e: &str| AppError::InvalidInput(e.to_string()))?;

    // 入力元: ファイル優先、無ければ routinator
    let (certs, source) = match &args.input {
        Some(path) => (
            load_router_keys_from_file(path).await?,
            path.display().to_string(),
        ),
        None => (load_router_keys_from_routinator().await?, "routinator".to_string()),
    };
    let total = certs.len();

    let engine = service.snapshot_engine().await?;
    let filter_count = engine.len();

    let input = stream::iter(certs.into_iter().map(Ok::<_, AppError>));
    let kept: Vec<RouterCertificate> = engine.filter_stream(input).try_collect().await?;

    info!(
        total,
        kept = kept.len(),
        filtered = total - kept.len(),
        "BGPsec filters applied"
    );

    write_router_keys(&args.output, &kept, &source, filter_count, format).await?;
    Ok(kept)
}

