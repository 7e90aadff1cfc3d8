use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Embeds, theme variables and category pages from the command line
#[derive(Parser)]
#[command(name = "forumkit")]
#[command(about = "Resolve embeds and inspect forum theme output", long_about = None)]
pub struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the embed cache database URL
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Keep the embed cache in memory for this run
    #[arg(long, global = true, conflicts_with = "database_url")]
    pub memory: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a URL into an embed
    Embed {
        url: String,
        /// Skip the cache and fetch again
        #[arg(short, long)]
        refresh: bool,
    },
    /// List registered embed types
    Providers,
    /// Dump computed theme variables
    Theme {
        #[arg(short, long, value_enum, default_value_t = Component::Global)]
        component: Component,
        /// Print the generated CSS instead of variables
        #[arg(long)]
        css: bool,
    },
    /// Render the categories page from a JSON tree
    Categories {
        file: PathBuf,
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Remove cached embeds
    ClearCache {
        /// Only keys starting with this (after the embed prefix)
        #[arg(short, long)]
        prefix: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Component {
    Global,
    Button,
}
