//! CLI command definitions for the `chatrelay` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod config;
pub mod history;

use clap::{Parser, Subcommand};

use chatrelay_observe::LogFormat;
use chatrelay_types::config::{RelayConfig, StoreBackend};

/// Conversational relay between chat clients and a completion provider.
#[derive(Parser)]
#[command(name = "chatrelay", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log output format: pretty or json.
    #[arg(long, global = true, default_value = "pretty", env = "CHATRELAY_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server.
    Serve(ServeArgs),

    /// Print the stored turns of a session.
    History {
        /// Session id, e.g. session_1f0c...
        session_id: String,

        /// Output machine-readable JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration.
    Config {
        /// Output JSON instead of TOML.
        #[arg(long)]
        json: bool,
    },
}

/// Overrides for the `[server]` and `[store]` config sections.
#[derive(clap::Args, Debug, Default)]
pub struct ServeArgs {
    /// Address to bind.
    #[arg(long, env = "CHATRELAY_HOST")]
    pub host: Option<String>,

    /// Port to listen on.
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Conversation store backend: sqlite or memory.
    #[arg(long)]
    pub store: Option<StoreBackend>,

    /// SQLite database URL (defaults to {data_dir}/chatrelay.db).
    #[arg(long, env = "CHATRELAY_DATABASE_URL")]
    pub database_url: Option<String>,
}

impl ServeArgs {
    /// Command-line and environment values win over the config file.
    pub fn apply(self, config: &mut RelayConfig) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(store) = self.store {
            config.store.backend = store;
        }
        if let Some(url) = self.database_url {
            config.store.database_url = Some(url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_flags() {
        let cli = Cli::try_parse_from([
            "chatrelay",
            "--log-format",
            "json",
            "-vv",
            "serve",
            "--port",
            "8080",
            "--store",
            "memory",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_format, LogFormat::Json);
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, Some(8080));
                assert_eq!(args.store, Some(StoreBackend::Memory));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_serve_args_override_config() {
        let mut config = RelayConfig::default();
        ServeArgs {
            host: Some("127.0.0.1".into()),
            port: Some(9000),
            store: Some(StoreBackend::Memory),
            database_url: Some("sqlite:///tmp/x.db".into()),
        }
        .apply(&mut config);

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.database_url.as_deref(), Some("sqlite:///tmp/x.db"));
    }

    #[test]
    fn test_empty_serve_args_keep_config() {
        let mut config = RelayConfig::default();
        ServeArgs::default().apply(&mut config);
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.store.backend, StoreBackend::Sqlite);
    }

    #[test]
    fn test_history_requires_session_id() {
        assert!(Cli::try_parse_from(["chatrelay", "history"]).is_err());
    }
}
