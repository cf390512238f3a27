//! CLI command implementations.

use crate::config::{AppConfig, CONFIG_DIR};
use coauthor_core::{normalize, CsvSource};
use coauthor_graph::{
    build_from_source, collaborator_count, longest_path_with_budget, most_collaborative,
    neighbor_tree, rank_neighbors, shortest_path, shortest_paths_from, summarize, AuthorPapers,
    CollabGraph, SearchBudget,
};
use coauthor_server::{QueryServer, ServerConfig};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Settings resolved from the project config and global flags.
pub struct Context {
    pub project: PathBuf,
    pub config: AppConfig,
    pub data: PathBuf,
}

impl Context {
    /// Reads `.coauthor/config.json` from the current directory, if any.
    /// `--data` wins over the configured data file.
    pub fn load(data_flag: Option<PathBuf>) -> Result<Self> {
        let project = std::env::current_dir()?;
        let config = AppConfig::load(&project)?.unwrap_or_default();
        let data = data_flag.unwrap_or_else(|| config.data_path(&project));
        debug!("Using data file {}", data.display());

        Ok(Self {
            project,
            config,
            data,
        })
    }

    fn budget(&self, max_steps: Option<u64>) -> SearchBudget {
        let mut budget = SearchBudget::unlimited();
        if let Some(steps) = max_steps.or(self.config.max_steps) {
            budget = budget.with_max_steps(steps);
        }
        if let Some(secs) = self.config.timeout_secs {
            budget = budget.with_timeout(Duration::from_secs(secs));
        }
        budget
    }
}

/// Reads the data file and builds the graph behind a spinner.
fn load_graph(data: &Path) -> Result<(CollabGraph, AuthorPapers)> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(format!("Reading {}...", data.display()));

    let start = Instant::now();
    let result = build_from_source(&CsvSource::new(data));
    spinner.finish_and_clear();

    let (graph, papers) = result?;
    debug!(
        "Loaded {} authors and {} edges in {}ms",
        graph.node_count(),
        graph.edge_count(),
        start.elapsed().as_millis()
    );
    Ok((graph, papers))
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Initialize Coauthor in a directory.
pub fn init(path: &Path, data: Option<PathBuf>) -> Result<()> {
    if AppConfig::path(path).exists() {
        println!("{} Already initialized", "✓".green());
        return Ok(());
    }

    let mut config = AppConfig::default();
    if let Some(data) = data {
        config.data = data;
    }
    config.save(path)?;

    println!("{} Initialized Coauthor in {}", "✓".green(), path.display());
    println!(
        "  Data file: {}",
        config.data.display().to_string().cyan()
    );
    println!("  Run {} to check it", "coauthor status".cyan());

    Ok(())
}

/// Show project and graph status.
pub fn status(ctx: &Context) -> Result<()> {
    if !ctx.project.join(CONFIG_DIR).exists() {
        println!("{} Coauthor not initialized in this directory", "✗".red());
        println!("  Run {} to initialize", "coauthor init".cyan());
    }

    let (graph, papers) = load_graph(&ctx.data)?;
    let stats = graph.stats();

    println!("{}", "Coauthor Status".cyan().bold());
    println!();
    println!("  {} {}", "Data:".dimmed(), ctx.data.display());
    println!("  {} {}", "Authors:".dimmed(), stats.node_count);
    println!("  {} {}", "Edges:".dimmed(), stats.edge_count);
    println!("  {} {}", "Isolated:".dimmed(), stats.isolated);
    println!("  {} {}", "With papers:".dimmed(), papers.len());

    Ok(())
}

/// Cheapest path between two authors.
pub fn path(ctx: &Context, from: &str, to: &str, json: bool) -> Result<()> {
    let (graph, _) = load_graph(&ctx.data)?;
    let route = shortest_path(&graph, from, to)?;

    if json {
        return print_json(&route);
    }

    println!(
        "{} {} (length: {})",
        "Shortest path:".bold(),
        route.path.join(" → ").cyan(),
        route.distance
    );
    Ok(())
}

/// Cheapest paths from one author to everyone reachable.
pub fn paths(ctx: &Context, from: &str, json: bool) -> Result<()> {
    let (graph, _) = load_graph(&ctx.data)?;
    let routes = shortest_paths_from(&graph, from)?;

    if json {
        return print_json(&routes);
    }

    let mut unreachable = 0;
    for (target, route) in &routes {
        if route.path.is_empty() {
            unreachable += 1;
            continue;
        }
        println!(
            "  {} {} {}",
            target.cyan(),
            route.path.join(" → "),
            format!("(length: {})", route.distance).dimmed()
        );
    }
    if unreachable > 0 {
        println!("\n  {} authors unreachable", unreachable.to_string().yellow());
    }
    Ok(())
}

/// Collaborators ranked by shared rows.
pub fn rank(ctx: &Context, author: &str, json: bool) -> Result<()> {
    let (graph, _) = load_graph(&ctx.data)?;
    let ranked = rank_neighbors(&graph, author)?;

    if json {
        return print_json(&ranked);
    }

    if ranked.is_empty() {
        println!("No collaborators found for \"{}\"", author);
        return Ok(());
    }
    for (i, neighbor) in ranked.iter().enumerate() {
        println!(
            "  {:>3}. {} {}",
            i + 1,
            neighbor.author.cyan(),
            neighbor.weight.to_string().dimmed()
        );
    }
    Ok(())
}

/// Binary search tree of an author's collaborators.
pub fn tree(
    ctx: &Context,
    author: &str,
    remove: &[String],
    insert: &[String],
    json: bool,
) -> Result<()> {
    let (graph, _) = load_graph(&ctx.data)?;
    let mut tree = neighbor_tree(&graph, author)?;

    for key in insert {
        tree.insert(normalize(key));
    }
    let mut missing = Vec::new();
    for key in remove {
        let key = normalize(key);
        if !tree.remove(&key) {
            missing.push(key);
        }
    }

    let keys = tree.inorder();
    if json {
        return print_json(&serde_json::json!({
            "inorder": keys,
            "height": tree.height(),
            "missing": missing
        }));
    }

    println!("{} {}", "BST nodes:".bold(), keys.join(", "));
    println!("  {} {}", "Height:".dimmed(), tree.height());
    for key in missing {
        println!("  {} {} was not in the tree", "⚠".yellow(), key);
    }
    Ok(())
}

/// Number of distinct collaborators.
pub fn count(ctx: &Context, author: &str, json: bool) -> Result<()> {
    let (graph, _) = load_graph(&ctx.data)?;
    let count = collaborator_count(&graph, author)?;

    if json {
        return print_json(&serde_json::json!({ "author": normalize(author), "count": count }));
    }

    println!(
        "{} collaborated with {} authors in total.",
        normalize(author).cyan(),
        count
    );
    Ok(())
}

/// The author with the most distinct collaborators.
pub fn top(ctx: &Context, json: bool) -> Result<()> {
    let (graph, _) = load_graph(&ctx.data)?;
    let top = most_collaborative(&graph)?;

    if json {
        return print_json(&top);
    }

    println!(
        "{} {} ({} collaborations)",
        "Most collaborative author:".bold(),
        top.author.cyan(),
        top.degree
    );
    Ok(())
}

/// Longest simple path from an author.
pub fn longest(ctx: &Context, author: &str, max_steps: Option<u64>, json: bool) -> Result<()> {
    let (graph, _) = load_graph(&ctx.data)?;
    let path = longest_path_with_budget(&graph, author, ctx.budget(max_steps))?;

    if json {
        return print_json(&path);
    }

    println!(
        "{} {} ({} authors)",
        "Longest path:".bold(),
        path.join(" → ").cyan(),
        path.len()
    );
    Ok(())
}

/// Export the graph summary to JSON.
pub fn export(ctx: &Context, output: &Path) -> Result<()> {
    let (graph, papers) = load_graph(&ctx.data)?;
    let summary = summarize(&graph, &papers);

    fs::write(output, serde_json::to_string_pretty(&summary)?)?;
    println!(
        "{} Exported {} authors ({} high) to {}",
        "✓".green(),
        summary.nodes.len(),
        summary.high_count(),
        output.display()
    );
    Ok(())
}

/// Start the query server.
pub async fn serve(ctx: &Context, port: Option<u16>, headless: bool, cache: bool) -> Result<()> {
    let ip = if headless {
        IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    } else {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    };
    let config = ServerConfig {
        addr: SocketAddr::new(ip, port.unwrap_or(ctx.config.port)),
        cache: cache || ctx.config.cache,
        search_budget: ctx.budget(None),
    };

    if headless {
        println!("{}", "Starting Coauthor server in headless mode...".cyan());
    } else {
        println!("{}", "Starting Coauthor server...".cyan());
    }

    // Fail early on a bad data file instead of on the first request.
    let (graph, _) = load_graph(&ctx.data)?;
    println!(
        "{} Loaded {} authors, {} edges",
        "✓".green(),
        graph.node_count(),
        graph.edge_count()
    );

    let addr = config.addr;
    let caching = config.cache;
    let server = QueryServer::new(Arc::new(CsvSource::new(&ctx.data)), config);

    println!("  Listening on {}", format!("ws://{}", addr).cyan());
    if caching {
        println!("  Caching enabled: send graph.refresh to reload the data file");
    }
    if headless {
        println!("  Headless mode: accepting connections from any host");
    }
    println!("  Press {} to stop", "Ctrl+C".cyan());

    server.run().await?;

    Ok(())
}
