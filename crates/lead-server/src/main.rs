//! Lead intake server executable

use anyhow::Context;
use clap::{Arg, Command};
use lead_core::{
    clients::{notification_channels, StoreState},
    DiagnosticsReporter, IntakeOrchestrator, LeadsConfig,
};
use lead_server::{listen_address, router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with INFO as default if RUST_LOG not set
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let matches = Command::new("lead-server")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Lead intake backend")
        .arg(
            Arg::new("host")
                .long("host")
                .value_name("HOST")
                .help("Address to bind")
                .default_value("0.0.0.0")
        )
        .arg(
            Arg::new("port")
                .long("port")
                .short('p')
                .value_name("PORT")
                .help("Port to listen on (overrides PORT)")
                .value_parser(clap::value_parser!(u16))
        )
        .get_matches();

    let config = LeadsConfig::from_env().context("Failed to load configuration")?;
    log::info!("Loaded configuration from environment");

    if config.owner.uses_fallback {
        log::warn!(
            "OWNER_EMAIL or OWNER_WHATSAPP_TO not set, notifications go to development placeholders ({} / {})",
            config.owner.email,
            config.owner.whatsapp_to
        );
    }

    // A missing or broken database is reported by /test, not fatal at startup
    let store_state = StoreState::open(&config.database);
    let (email, messaging) = notification_channels(&config)
        .context("Failed to initialize notification clients")?;

    let orchestrator = IntakeOrchestrator::new(store_state.lead_store(), email, messaging);
    let diagnostics = DiagnosticsReporter::new(config.clone(), store_state);
    let app = router(AppState::new(orchestrator, diagnostics));

    log::info!("Initialized all services and orchestrator");

    let host = matches.get_one::<String>("host")
        .map(String::as_str)
        .unwrap_or("0.0.0.0");
    let port = matches.get_one::<u16>("port")
        .copied()
        .unwrap_or(config.server.port);
    let addr = listen_address(host, port)?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    log::info!("Starting HTTP server on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    log::info!("HTTP server exited normally");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}
