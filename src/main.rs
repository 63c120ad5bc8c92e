use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing::info;

use codemetrics::analysis::analyze_path;
use codemetrics::config::{get_config_path, load_config, save_config, MetricsConfig};
use codemetrics::mcp::McpServer;
use codemetrics::report::render_documentation;
use codemetrics::scan::scan;
use codemetrics::types::OutputFormat;

/// Code metrics for AI assistants.
#[derive(Parser)]
#[command(
    name = "codemetrics",
    version,
    about = "Line counts, complexity and directory statistics over MCP"
)]
struct Cli {
    /// Project root (default: current directory)
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server on stdio (default)
    Serve,
    /// Write a default configuration file
    Init,
    /// Scan the project root and print a summary
    Scan {
        /// Print the full report as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Analyze a file or directory
    Analyze {
        /// Path relative to the project root, or absolute
        path: String,
    },
    /// Generate project documentation
    Docs {
        /// Project name used as the title
        #[arg(short, long)]
        name: String,
        /// Output format (markdown or json)
        #[arg(short, long, default_value = "markdown")]
        format: String,
    },
}

#[tokio::main]
async fn main() {
    // stdout carries protocol frames; logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> codemetrics::errors::Result<()> {
    let root = resolve_root(cli.root);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let config = load_config(&root)?;
            info!(root = %config.root_dir, "starting MCP server");
            McpServer::new(config).run().await?;
        }
        Commands::Init => {
            let config = MetricsConfig::for_root(&root);
            save_config(&root, &config)?;
            println!("Wrote {}", get_config_path(&root).display());
        }
        Commands::Scan { json } => {
            let config = load_config(&root)?;
            let report = scan(&root, &config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Scan of {}", report.root_path);
                println!("  Files:       {}", report.total_files);
                println!("  Lines:       {}", report.total_lines);
                println!("  Directories: {}", report.directories.len());
                if !report.languages.is_empty() {
                    println!("\n  Files by language:");
                    for (language, count) in report.sorted_languages() {
                        println!("    {}: {}", language, count);
                    }
                }
            }
        }
        Commands::Analyze { path } => {
            let config = load_config(&root)?;
            let payload = analyze_path(&config, &path)?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Commands::Docs { name, format } => {
            let config = load_config(&root)?;
            let output_format = OutputFormat::from_str(&format).ok_or_else(|| {
                codemetrics::errors::MetricsError::InvalidParams {
                    message: format!("unsupported format: {}", format),
                }
            })?;
            let report = scan(&root, &config)?;
            println!(
                "{}",
                render_documentation(&name, &report, output_format, config.max_tree_entries)?
            );
        }
    }
    Ok(())
}

/// Resolves the optional root argument to an absolute directory.
///
/// Defaults to the current working directory.
fn resolve_root(root: Option<PathBuf>) -> PathBuf {
    let root = match root {
        Some(p) => p,
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    root.canonicalize().unwrap_or(root)
}
