//! Coauthor CLI - Command-line interface for Coauthor
//!
//! Builds the co-authorship graph from a CSV file and answers queries
//! over it, either once from the command line or as a WebSocket server.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "coauthor")]
#[command(author = "Coauthor Contributors")]
#[command(version)]
#[command(about = "Co-authorship graph analytics", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// CSV file with author_name, coauthors and paper_title columns
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize Coauthor in the current directory
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Show graph statistics
    Status,

    /// Shortest path between two authors
    Path {
        from: String,
        to: String,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Shortest paths from one author to all others
    Paths {
        from: String,

        #[arg(long)]
        json: bool,
    },

    /// Rank an author's collaborators by shared papers
    Rank {
        author: String,

        #[arg(long)]
        json: bool,
    },

    /// Build a search tree of an author's collaborators
    Tree {
        author: String,

        /// Keys to remove after building
        #[arg(long, num_args = 1..)]
        remove: Vec<String>,

        /// Keys to insert after building
        #[arg(long, num_args = 1..)]
        insert: Vec<String>,

        #[arg(long)]
        json: bool,
    },

    /// Count an author's distinct collaborators
    Count {
        author: String,

        #[arg(long)]
        json: bool,
    },

    /// Find the most collaborative author
    Top {
        #[arg(long)]
        json: bool,
    },

    /// Longest simple path from an author
    Longest {
        author: String,

        /// Give up after this many search steps
        #[arg(long)]
        max_steps: Option<u64>,

        #[arg(long)]
        json: bool,
    },

    /// Export the graph summary to JSON
    Export {
        /// Output file
        #[arg(short, long, default_value = "coauthor-graph.json")]
        output: PathBuf,
    },

    /// Start the query server
    Serve {
        /// Port to listen on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Accept connections from any host
        #[arg(long)]
        headless: bool,

        /// Reuse one graph snapshot until refreshed
        #[arg(long)]
        cache: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let result = match cli.command {
        Commands::Init { path } => commands::init(&path, cli.data),
        command => match commands::Context::load(cli.data) {
            Ok(ctx) => run(command, &ctx).await,
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(
    command: Commands,
    ctx: &commands::Context,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Init { .. } => Ok(()),
        Commands::Status => commands::status(ctx),
        Commands::Path { from, to, json } => commands::path(ctx, &from, &to, json),
        Commands::Paths { from, json } => commands::paths(ctx, &from, json),
        Commands::Rank { author, json } => commands::rank(ctx, &author, json),
        Commands::Tree {
            author,
            remove,
            insert,
            json,
        } => commands::tree(ctx, &author, &remove, &insert, json),
        Commands::Count { author, json } => commands::count(ctx, &author, json),
        Commands::Top { json } => commands::top(ctx, json),
        Commands::Longest {
            author,
            max_steps,
            json,
        } => commands::longest(ctx, &author, max_steps, json),
        Commands::Export { output } => commands::export(ctx, &output),
        Commands::Serve {
            port,
            headless,
            cache,
        } => commands::serve(ctx, port, headless, cache).await,
    }
}
