pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "threadreel")]
#[command(about = "A terminal reader for Reddit listings and threads", long_about = None)]
pub struct Cli {
    /// Ignore the disk cache for this run
    #[arg(long, global = true)]
    pub bypass_cache: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the front page
    Home {
        /// Continue from a pagination cursor
        #[arg(long)]
        after: Option<String>,
    },
    /// Show a subreddit listing
    Subreddit {
        /// Subreddit name, with or without the r/ prefix
        name: String,
        /// Continue from a pagination cursor
        #[arg(long)]
        after: Option<String>,
    },
    /// Show the comments page at a URL
    Comments {
        /// Full comments URL
        url: String,
    },
    /// Show the comments of a post by id
    Post {
        /// Post id, e.g. "1abc2de"
        id: String,
    },
    /// Remove expired cache entries
    Clean,
}
