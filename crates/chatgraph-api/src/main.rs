//! chatgraph CLI and REST API entry point.
//!
//! Parses CLI arguments, loads configuration, wires the graph client and model
//! registry, then dispatches to the command handler or starts the REST server.

mod cli;
mod http;
mod state;

use clap::Parser;

use chatgraph_core::greeting::say_hello;
use chatgraph_observe::tracing_setup::{init_tracing, shutdown_tracing};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.otel, cli.log_filter()) {
        eprintln!("Warning: failed to initialize tracing: {e}");
    }

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // The greeting needs no configuration or graph connection.
    if let Commands::Hello { name } = &cli.command {
        return cli::graph::print_message(&say_hello(name.as_deref()), cli.json);
    }

    let state = AppState::init(cli.config.clone()).await?;

    match cli.command {
        Commands::Serve { port, host } => {
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            if !cli.quiet {
                println!(
                    "  {} chatgraph API listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}/api/v1")).cyan()
                );
                println!(
                    "  {} {} ({})",
                    console::style("graph").dim(),
                    state.config.graph.connection_name,
                    state.config.graph.endpoint
                );
                println!(
                    "  {} {}",
                    console::style("config").dim(),
                    state.config_path.display()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Chat { session, message } => {
            cli::session::chat(&state, &session, &message, cli.json).await?;
        }

        Commands::History { session } => {
            cli::session::history(&state, &session, cli.json).await?;
        }

        Commands::Clear { session } => {
            cli::session::clear(&state, &session, cli.json).await?;
        }

        Commands::ApplySchema => {
            cli::graph::apply(&state, cli.json).await?;
        }

        Commands::Probe => {
            cli::graph::probe(&state, cli.json).await?;
        }

        Commands::Hello { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
