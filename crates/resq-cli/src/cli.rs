use clap::{Parser, Subcommand, ValueEnum};

/// Category value that means "no filter", as offered by the category picker
pub const ALL_CATEGORIES: &str = "all";

#[derive(Parser, Debug)]
#[command(
    name = "resq",
    version,
    about = "ResQ360 emergency numbers and legal rights, available offline"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(long, global = true, help = "Skip the connectivity check and never sync")]
    pub offline: bool,
    #[arg(long, global = true, help = "Keep the cache in memory for this run only")]
    pub ephemeral: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List emergency numbers
    Numbers {
        #[arg(long, short)]
        category: Option<String>,
        #[arg(long, short)]
        search: Option<String>,
    },
    /// List legal rights information
    Legal {
        #[arg(long, short)]
        category: Option<String>,
        #[arg(long, short)]
        search: Option<String>,
        #[arg(long, help = "Show full details and citations")]
        details: bool,
    },
    /// List the categories of a collection
    Categories {
        #[arg(value_enum)]
        collection: Collection,
    },
    /// Refresh the local cache now
    Sync,
    /// Check connectivity and cache freshness
    Status,
    /// Delete all cached data
    Clear,
    /// Keep checking connectivity and refresh the cache on reconnect
    Watch {
        #[arg(long, default_value_t = 30, help = "Seconds between connectivity checks")]
        interval: u64,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Collection {
    Numbers,
    Legal,
}

/// Normalize a `--category` argument: blank or "all" means no filter.
pub fn category_filter(category: Option<&str>) -> Option<&str> {
    category
        .map(str::trim)
        .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
}
