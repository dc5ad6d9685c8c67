use bgpsec_filter::{
    cli::{Cli, Command},
    commands::{
        handle_apply::run_apply,
        handle_filters::{run_add, run_clear, run_list, run_remove},
        handle_slurm::{run_export, run_import},
    },
    constants::EXIT_RETRYABLE,
    error::AppError,
    service::FilterService,
    store::SlurmStore,
};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    // RUST_LOG が無ければ info。ログは標準エラーへ (標準出力は結果用)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    if let Err(e) = run(args).await {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {e}");
        if e.is_retryable() {
            // ストアが一時的に使えないだけなので、再実行で通る可能性がある
            eprintln!("The filter store is temporarily unavailable; retry the command.");
            std::process::exit(EXIT_RETRYABLE);
        }
        std::process::exit(1);
    }
}

/// アプリケーションのメインロジック
async fn run(args: Cli) -> Result<(), AppError> {
    let store = SlurmStore::open(&args.store).await?;
    let service = FilterService::new(Arc::new(store));

    match args.command {
        Command::Add(add_args) => {
            run_add(&service, add_args).await?;
        }
        Command::Remove { id } => run_remove(&service, id).await?,
        Command::List { output_format } => run_list(&service, &output_format).await?,
        Command::Clear => run_clear(&service).await?,
        Command::Apply(apply_args) => {
            run_apply(&service, apply_args).await?;
        }
        Command::Export { output } => run_export(&service, &output).await?,
        Command::Import { file } => {
            run_import(&service, &file).await?;
        }
    }
    Ok(())
}
