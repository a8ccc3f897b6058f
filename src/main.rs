//! Open Voice CLI entry point

use std::process::ExitCode;

use clap::Parser;

use open_voice::cli::{
    app::{load_client_config, run, EXIT_SUCCESS},
    args::Cli,
    init_logging,
    presenter::Presenter,
};
use open_voice::infrastructure::XdgClientConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut presenter = Presenter::new();

    let store = match cli.config.clone() {
        Some(path) => XdgClientConfigStore::with_path(path),
        None => XdgClientConfigStore::new(),
    };
    let config = load_client_config(&store, &cli).await;
    init_logging(config.log_level_or_default());

    match run(cli.command, &config, &store, &mut presenter).await {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(e.exit_code())
        }
    }
}
