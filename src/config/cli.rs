use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the Folio binary.
#[derive(Debug, Parser)]
#[command(name = "folio", version, about = "Folio month-aware blog pagination service")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "FOLIO_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the posts HTTP API.
    Serve(Box<ServeArgs>),
    /// Compute one page from the content directory and print it as JSON.
    #[command(name = "paginate")]
    Paginate(PaginateArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ContentOverrides {
    /// Override the content root holding `<locale>/posts.toml` files.
    #[arg(long = "content-dir", value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub content_dir: Option<PathBuf>,

    /// Override the locale used when a request names none.
    #[arg(long = "default-locale", value_name = "LOCALE")]
    pub default_locale: Option<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct PaginationOverrides {
    /// Override the page size used when `limit` is absent or malformed.
    #[arg(long = "pagination-default-limit", value_name = "COUNT")]
    pub default_limit: Option<usize>,

    /// Override the largest accepted `limit`.
    #[arg(long = "pagination-max-limit", value_name = "COUNT")]
    pub max_limit: Option<usize>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    #[command(flatten)]
    pub content: ContentOverrides,

    #[command(flatten)]
    pub pagination: PaginationOverrides,

    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the graceful shutdown timeout.
    #[arg(long = "server-graceful-shutdown-seconds", value_name = "SECONDS")]
    pub server_graceful_shutdown_seconds: Option<u64>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Toggle the in-process post snapshot cache.
    #[arg(
        long = "cache-enabled",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub cache_enabled: Option<bool>,

    /// Override how long a cached snapshot stays fresh; 0 keeps it until evicted.
    #[arg(long = "cache-ttl-seconds", value_name = "SECONDS")]
    pub cache_ttl_seconds: Option<u64>,

    /// Override how many locales the snapshot cache holds.
    #[arg(long = "cache-capacity", value_name = "COUNT")]
    pub cache_capacity: Option<usize>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct PaginateArgs {
    #[command(flatten)]
    pub content: ContentOverrides,

    #[command(flatten)]
    pub pagination: PaginationOverrides,

    /// Locale to read; defaults to the configured default locale.
    #[arg(long, value_name = "LOCALE")]
    pub locale: Option<String>,

    /// Date cursor taken from a previous page.
    #[arg(long, value_name = "DATE")]
    pub cursor: Option<String>,

    /// Requested page size (clamped like the HTTP parameter).
    #[arg(long, value_name = "COUNT")]
    pub limit: Option<String>,

    /// Walk direction: `next` or `prev`.
    #[arg(long, value_name = "DIRECTION")]
    pub direction: Option<String>,
}
