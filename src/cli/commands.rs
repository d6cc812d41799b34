//! CLI command implementations

use std::sync::Arc;

use super::args::{Cli, Command, CommonArgs};
use super::config::Config;
use super::errors::{CliError, CliResult};
use crate::http_server::{HttpServer, MovieState};
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::store::DocumentStore;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { common } => init(&common),
        Command::Serve { common, port } => serve(&common, port),
    }
}

fn runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))
}

fn load_config(common: &CommonArgs, port: Option<u16>) -> CliResult<Config> {
    let config = Config::resolve(common, port)?;
    Logger::set_min_severity(config.severity()?);

    let data_file = config.data_file.display().to_string();
    let port = config.http.port.to_string();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("data_file", data_file.as_str()), ("port", port.as_str())],
    );
    Ok(config)
}

async fn prepare_store(store: &DocumentStore) -> CliResult<()> {
    if store.init().await? {
        let path = store.path().display().to_string();
        log_event_with_fields(Event::StoreInitialized, &[("data_file", path.as_str())]);
    }
    Ok(())
}

/// Create the backing file if missing
///
/// An existing file is left untouched.
pub fn init(common: &CommonArgs) -> CliResult<()> {
    let config = load_config(common, None)?;
    let store = DocumentStore::new(&config.data_file);

    runtime()?.block_on(prepare_store(&store))
}

/// Start the HTTP server
///
/// Creates the backing file first if it does not exist, then serves until
/// ctrl-c.
pub fn serve(common: &CommonArgs, port: Option<u16>) -> CliResult<()> {
    let config = load_config(common, port)?;
    let state = Arc::new(MovieState::new(&config.data_file));
    let server = HttpServer::new(config.http.clone(), state.clone());

    runtime()?.block_on(async move {
        prepare_store(&state.store).await?;

        server.start().await.map_err(|e| {
            let message = e.to_string();
            log_event_with_fields(Event::ServerFailed, &[("error", message.as_str())]);
            CliError::serve_failed(format!("HTTP server failed: {}", message))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_backing_file() {
        let dir = TempDir::new().unwrap();
        let data_file = dir.path().join("nested").join("movies.json");
        let common = CommonArgs {
            config: None,
            data_file: Some(data_file.clone()),
        };

        run_command(Command::Init { common: common.clone() }).unwrap();
        assert_eq!(std::fs::read_to_string(&data_file).unwrap(), "[]");

        std::fs::write(&data_file, r#"[{"id":"1","title":"Alien"}]"#).unwrap();
        run_command(Command::Init { common }).unwrap();
        assert!(std::fs::read_to_string(&data_file).unwrap().contains("Alien"));
    }
}
