//! # Timeline Report
//!
//! Command-line access to the timeline and dependency views. Every command prints
//! JSON on stdout; failures are logged and exit non-zero.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::{error, info};

use dbt_timeline::config::{ConfigLoader, TimelineConfig};
use dbt_timeline::database::{DatabaseConnection, PgTimelineStore, TimelineStore};
use dbt_timeline::graph::{GraphExtractor, SourceSnapshot};
use dbt_timeline::logging::init_structured_logging;
use dbt_timeline::services::{GraphService, ProjectCatalog, TimelineService};

#[derive(Parser)]
#[command(name = "timeline-report")]
#[command(about = "Inspect dbt execution timelines and model dependencies")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Configuration file (TOML or YAML); defaults to config/timeline.toml when present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List projects
    Projects,

    /// Execution timeline for one project and day
    Timeline {
        project_id: i32,

        /// Calendar day, YYYY-MM-DD
        date: String,
    },

    /// Dependency graph extracted from model source files, or from stored edges
    Graph {
        /// Model .sql files; the stored graph is read when none are given
        files: Vec<PathBuf>,
    },

    /// Recent per-model performance
    History,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_file(path.clone());
    }

    let config = match loader.load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {e}");
            process::exit(2);
        }
    };

    init_structured_logging(&config.logging);

    if let Err(e) = run(&cli, &config).await {
        error!(error = %format!("{e:#}"), "timeline-report failed");
        eprintln!("❌ {e:#}");
        process::exit(1);
    }
}

async fn run(cli: &Cli, config: &TimelineConfig) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Graph { files } if !files.is_empty() => {
            // Source extraction needs no database
            let snapshot = SourceSnapshot::from_paths(files);
            let graph = GraphExtractor::from_config(&config.graph).extract(&snapshot);
            print_json(cli, &graph)
        }
        command => {
            let db = DatabaseConnection::connect_lazy(&config.database)
                .context("creating database pool")?;
            let store: Arc<dyn TimelineStore> =
                Arc::new(PgTimelineStore::new(db.pool().clone(), &config.database));

            let result = dispatch(cli, command, config, store).await;
            db.close().await;
            result
        }
    }
}

async fn dispatch(
    cli: &Cli,
    command: &Commands,
    config: &TimelineConfig,
    store: Arc<dyn TimelineStore>,
) -> anyhow::Result<()> {
    match command {
        Commands::Projects => {
            let projects = ProjectCatalog::new(store).list_projects().await?;
            print_json(cli, &projects)
        }
        Commands::Timeline { project_id, date } => {
            let service = TimelineService::new(store, &config.timeline);
            let outcome = service
                .get_timeline(*project_id, date)
                .await
                .with_context(|| format!("timeline for project {project_id} on {date}"))?;

            if let Some(reason) = outcome.demo_reason() {
                info!(reason = %reason, "Printing demo timeline");
            }
            print_json(cli, &outcome)
        }
        Commands::Graph { .. } => {
            let graph = GraphService::new(store, &config.graph)
                .stored_graph()
                .await
                .context("reading stored dependency edges")?;
            print_json(cli, &graph)
        }
        Commands::History => {
            let service = TimelineService::new(store, &config.timeline);
            let history = service.history().await?;
            print_json(cli, &history)
        }
    }
}

fn print_json<T: Serialize>(cli: &Cli, value: &T) -> anyhow::Result<()> {
    let json = if cli.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}
