use ptable::config::Config;
use ptable::error::ServeError;
use ptable::logging::init_logging;
use ptable::server::{serve, AppState};

#[tokio::main]
async fn main() -> Result<(), ServeError> {
    let config = Config::from_env()?;
    init_logging(&config.log_level);
    log::info!(
        "dataset={} table={} selection={} bohr={}",
        config.dataset,
        config.table.as_str(),
        config.selection.as_str(),
        config.bohr.as_str()
    );

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .map_err(ServeError::Bind)?;
    serve(listener, AppState::new(config)).await
}
