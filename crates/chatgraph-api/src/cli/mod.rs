//! CLI command definitions for the `chatgraph` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod graph;
pub mod session;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Graph-backed chat sessions over a language model.
#[derive(Parser)]
#[command(name = "chatgraph", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config.toml (default: $CHATGRAPH_HOME/config.toml or ~/.chatgraph/config.toml).
    #[arg(long, global = true, env = "CHATGRAPH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true, env = "CHATGRAPH_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Send one message in a session and print the reply.
    Chat {
        /// Session id (any string).
        session: String,

        /// The user message.
        message: String,
    },

    /// Show the stored messages of a session.
    History {
        session: String,
    },

    /// Delete a session and all of its messages.
    Clear {
        session: String,
    },

    /// Apply the chat schema to the graph store.
    #[command(name = "apply-schema")]
    ApplySchema,

    /// Write and read back a test node to verify graph connectivity.
    Probe,

    /// Print a greeting.
    Hello {
        name: Option<String>,
    },
}

impl Cli {
    /// Default log filter for the verbosity flags, used when RUST_LOG is unset.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "warn",
            1 => "info,chatgraph_core=debug,chatgraph_infra=debug,chatgraph_api=debug",
            _ => "trace",
        }
    }
}
