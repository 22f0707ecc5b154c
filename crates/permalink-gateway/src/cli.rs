use clap::{Args, Parser, Subcommand, ValueEnum};
use permalink_telemetry::LogFormat;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "PERMALINK_LISTEN_ADDR";
pub const BASE_URL_ENV: &str = "PERMALINK_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "PERMALINK_STORAGE_BACKEND";
pub const MYSQL_DSN_ENV: &str = "PERMALINK_MYSQL_DSN";
pub const SQLITE_URL_ENV: &str = "PERMALINK_SQLITE_URL";
pub const LOG_FORMAT_ENV: &str = "PERMALINK_LOG_FORMAT";
pub const LOG_LEVEL_ENV: &str = "PERMALINK_LOG_LEVEL";
pub const OTLP_ENDPOINT_ENV: &str = "PERMALINK_OTLP_ENDPOINT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080/";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "mysql")]
    Mysql,
    #[value(name = "sqlite")]
    Sqlite,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Mysql => write!(f, "mysql"),
            StorageBackendArg::Sqlite => write!(f, "sqlite"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "permalink", version, about = "Permalinks for test result reports")]
pub struct CLI {
    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = MYSQL_DSN_ENV, required_if_eq("storage", "mysql"))]
    pub mysql_dsn: Option<String>,

    /// e.g. `sqlite://permalinks.db`
    #[arg(long, env = SQLITE_URL_ENV, required_if_eq("storage", "sqlite"))]
    pub sqlite_url: Option<String>,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,

    /// Filter directives used when `RUST_LOG` is unset.
    #[arg(long, env = LOG_LEVEL_ENV, default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    #[arg(long, env = OTLP_ENDPOINT_ENV)]
    pub otlp_endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server.
    Serve(ServeArgs),
    /// Print the permalink id for a url, creating it if needed.
    Make { url: String },
    /// Print the url a permalink id points to.
    Resolve { id: String },
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Public url of the reporter; permalinks and their targets hang off it.
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_defaults() {
        let cli = CLI::try_parse_from(["permalink", "serve"]).unwrap();

        assert_eq!(cli.storage, StorageBackendArg::InMemory);
        assert_eq!(cli.log_format, LogFormatArg::Text);
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.listen_addr.to_string(), DEFAULT_LISTEN_ADDR);
    }

    #[test]
    fn mysql_requires_dsn() {
        let err = CLI::try_parse_from(["permalink", "--storage", "mysql", "serve"]).unwrap_err();

        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn make_takes_a_url() {
        let cli = CLI::try_parse_from([
            "permalink",
            "--storage",
            "sqlite",
            "--sqlite-url",
            "sqlite://permalinks.db",
            "make",
            "http://host/app?a=1",
        ])
        .unwrap();

        assert_eq!(cli.sqlite_url.as_deref(), Some("sqlite://permalinks.db"));
        assert!(matches!(cli.command, Command::Make { url } if url == "http://host/app?a=1"));
    }
}
