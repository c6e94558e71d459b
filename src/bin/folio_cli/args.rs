//! Command-line surface for `folio-cli`.

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "folio-cli", version, about = "Browse a Folio blog archive page by page", long_about = None)]
pub struct Cli {
    /// Site base URL, e.g. <https://example.com>
    #[arg(long, env = "FOLIO_SITE_URL")]
    pub site: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Walk the archive with the pagination controller and print month groups
    Browse(BrowseArgs),
}

#[derive(Args, Debug, Clone)]
pub struct BrowseArgs {
    /// Locale of the archive
    #[arg(long, default_value = "en")]
    pub locale: String,

    /// Posts requested per page
    #[arg(long, default_value_t = 10)]
    pub limit: usize,

    /// Number of pages to accumulate
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: u32,

    /// Resume from a cursor copied out of an earlier resume URL
    #[arg(long)]
    pub cursor: Option<String>,

    /// Path of the archive page kept in the resume URL
    #[arg(long, default_value = "/blog")]
    pub path: String,

    /// Print month groups as JSON instead of text
    #[arg(long)]
    pub json: bool,
}
