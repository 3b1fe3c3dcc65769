//! sno - a modal text editor
//! Reads ex commands from stdin and drives the editing session

use anyhow::Context;
use clap::Parser;

use sno::cli::Cli;
use sno::config::Config;
use sno::editor::Editor;
use sno::logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_path = cli.log_file.clone().unwrap_or_else(logging::default_log_path);
    if let Err(e) = logging::init(&log_path) {
        eprintln!("sno: logging disabled ({}): {e}", log_path.display());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;
    runtime.block_on(run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.clone().or_else(Config::default_path);
    let (config, config_error) = match config_path.as_deref().map(Config::load) {
        Some(Ok(config)) => (config, None),
        Some(Err(e)) => (Config::default(), Some(e)),
        None => (Config::default(), None),
    };

    let mut editor = Editor::new(config);
    if let Some(e) = config_error {
        editor.handle_error(e);
    }
    editor
        .open_initial(&cli.files, cli.layout())
        .await
        .context("failed to open the initial windows")?;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    editor
        .run(stdin, tokio::io::stdout())
        .await
        .context("editor loop failed")?;
    tracing::info!("exited cleanly");
    Ok(())
}
