use crate::error::AppError;
use crate::output_common::write_output;
use crate::service::FilterService;
use crate::slurm::SlurmFile;
use crate::store::FilterStore;
use std::path::Path;

/// 現在のフィルタをSLURMファイルとして書き出す
pub async fn run_export<S: FilterStore>(
    service: &FilterService<S>,
    output: &Path,
) -> Result<(), AppError> {
    let file = service.export_slurm().await?;
    let json = file.to_json_pretty()?;
    write_output(output, &format!("{json}\n")).await?;
    Ok(())
}

/// SLURMファイルのbgpsecFiltersで置き換える
pub async fn run_import<S: FilterStore>(
    service: &FilterService<S>,
    input: &Path,
) -> Result<usize, AppError> {
    let text = tokio::fs::read_to_string(input).await?;
    let file = SlurmFile::from_json(&text)?;
    let count = service.import_slurm(&file).await?;
    println!("Imported {count} BGPsec filters from {}", input.display());
    Ok(count)
}
