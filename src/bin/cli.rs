//! CLI binary for packfinder.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pack_search::{ProgressReporter, ProjectType, SearchAggregator, SearchError, SearchProgress};
use packfinder::render::render_page;
use packfinder::{PackfinderConfig, SearchRequest};
use tracing_subscriber::EnvFilter;

/// Packfinder: search Modrinth and CurseForge at once.
#[derive(Parser)]
#[command(name = "packfinder", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Search both catalogs and print one page of merged results.
    Search {
        /// Search text. May be empty to browse by popularity.
        #[arg(default_value = "")]
        text: String,

        /// Restrict to one project type (mod, datapack, resourcepack, modpack, plugin, shader).
        #[arg(short = 't', long = "type")]
        project_type: Option<ProjectType>,

        /// Game version filter, e.g. 1.20.1.
        #[arg(short = 'v', long)]
        version: Option<String>,

        /// Mod loader filter, e.g. fabric.
        #[arg(short, long)]
        loader: Option<String>,

        /// Page number, starting at 1.
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Results per page.
        #[arg(short = 'n', long)]
        page_size: Option<usize>,

        /// Look up each result's missing cross-catalog link.
        #[arg(long)]
        pair_search: bool,

        /// Fetch just this page, bypassing the deep-search cache.
        ///
        /// The cache lives only as long as one run, so from the command line
        /// deep mode only changes how many records are ranked together.
        #[arg(long)]
        simple: bool,
    },

    /// Write a default configuration file.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("packfinder=info,pack_search=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Search {
            text,
            project_type,
            version,
            loader,
            page,
            page_size,
            pair_search,
            simple,
        } => {
            let request = SearchRequest {
                text,
                project_type,
                version,
                loader,
                page,
                page_size,
                pair_search,
                simple,
            };
            run_search(cli.config, request).await
        }
        Command::InitConfig { force } => init_config(cli.config, force),
    }
}

async fn run_search(config_path: Option<PathBuf>, request: SearchRequest) -> anyhow::Result<()> {
    let config = PackfinderConfig::load(config_path.as_deref())?;
    let query = request.into_query(&config.defaults)?;

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<SearchProgress>();
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if event != SearchProgress::Done {
                eprintln!("{event}");
            }
        }
    });

    let aggregator = SearchAggregator::with_default_providers(config.search)?
        .with_progress(ProgressReporter::new(tx));
    let outcome = aggregator.request_page(&query).await;

    // Dropping the aggregator closes the channel so the printer finishes.
    drop(aggregator);
    let _ = printer.await;

    match outcome {
        Ok(records) => {
            let first = query.page.saturating_mul(query.page_size).saturating_add(1);
            println!("{}", render_page(&records, first));
            Ok(())
        }
        Err(SearchError::NoResults) => {
            println!("No results");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn init_config(config_path: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(PackfinderConfig::default_config_path);
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    PackfinderConfig::default().save_to_file(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn simple_help_explains_per_run_cache() {
        let cli = Cli::command();
        let search = cli.find_subcommand("search").expect("search subcommand");
        let simple = search
            .get_arguments()
            .find(|arg| arg.get_id() == "simple")
            .expect("--simple");
        let help = simple.get_long_help().expect("long help").to_string();
        assert!(help.contains("one run"));
    }

    #[test]
    fn search_arguments_parse() {
        let cli = Cli::try_parse_from(["packfinder", "search", "sodium", "-p", "2", "--simple"])
            .expect("parse");
        match cli.command {
            Command::Search {
                text, page, simple, ..
            } => {
                assert_eq!(text, "sodium");
                assert_eq!(page, 2);
                assert!(simple);
            }
            Command::InitConfig { .. } => panic!("expected search"),
        }
    }
}
