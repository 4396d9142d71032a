use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use folio_core::{
    compare_catalogs, fallback_records, page::catalog_loader, Catalog, CatalogOrigin, Config,
    ExportOptions, Exporter, LoadOutcome, Page,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version, about = "Build the projects section of a portfolio site", long_about = None)]
struct Cli {
    /// Config file (defaults to <config dir>/folio/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog URL or file path, overrides the config file
    #[arg(long, global = true)]
    catalog_url: Option<String>,

    /// GitHub account owning the project repositories
    #[arg(long, global = true)]
    owner: Option<String>,

    /// GitHub token for metrics requests
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Load the catalog, render the cards, fetch metrics and write the result
    Build {
        /// Output file; .html, .json or .md
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write only the projects section instead of a full HTML document
        #[arg(long)]
        fragment: bool,
    },
    /// Print the catalog the page would render
    Catalog {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compare the embedded fallback catalog with the live one
    CheckFallback,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio=info,folio_core=info,folio_api=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Some(Commands::Build { output, fragment }) => build(&config, output, fragment).await,
        Some(Commands::Catalog { json }) => print_catalog(&config, json).await,
        Some(Commands::CheckFallback) => check_fallback(&config).await,
        None => {
            println!("No command specified. Try --help");
            Ok(())
        }
    }
}

/// File config with CLI flags and env layered on top
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load().context("Failed to load config")?,
    };

    if let Some(url) = &cli.catalog_url {
        config.catalog.url = url.clone();
    }
    if let Some(owner) = &cli.owner {
        config.github.owner = Some(owner.clone());
    }
    if let Some(token) = &cli.token {
        config.github.token = Some(token.clone());
    }

    Ok(config)
}

async fn build(config: &Config, output: Option<PathBuf>, fragment: bool) -> anyhow::Result<()> {
    let output = output.unwrap_or_else(|| config.site.output.clone());
    let mut page = Page::from_config(config)?;

    tracing::info!("Building projects from {}", config.catalog.url);
    let (outcome, report) = page.run().await;

    let options = ExportOptions {
        title: config.site.title.clone(),
        full_document: config.site.full_document && !fragment,
    };
    let format = Exporter::export_to_file(page.surface(), &output, &options)?;
    tracing::info!("Wrote {} ({})", output.display(), format.extension());

    match outcome {
        LoadOutcome::Rendered { origin, cards } => {
            println!(
                "Rendered {} projects from the {} catalog ({} with stats, {} hidden) -> {}",
                cards,
                origin,
                report.shown,
                report.hidden,
                output.display()
            );
            if origin == CatalogOrigin::Fallback {
                tracing::warn!("Live catalog unavailable, output uses the fallback dataset");
            }
            Ok(())
        }
        LoadOutcome::Failed { reason } => bail!("No projects could be loaded: {}", reason),
    }
}

async fn print_catalog(config: &Config, json: bool) -> anyhow::Result<()> {
    let catalog = catalog_loader(config)?.load().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(catalog.records())?);
        return Ok(());
    }

    println!("{} projects ({} catalog)", catalog.len(), catalog.origin());
    for record in &catalog {
        println!(
            "  {:<24} {:<12} {}",
            record.id,
            record.status.label(),
            record.source().unwrap_or("-")
        );
    }
    Ok(())
}

async fn check_fallback(config: &Config) -> anyhow::Result<()> {
    let live = catalog_loader(config)?
        .load_live()
        .await
        .context("Live catalog could not be loaded")?;
    let fallback = Catalog::new(fallback_records()?, CatalogOrigin::Fallback)?;

    let drift = compare_catalogs(&live, &fallback);
    if drift.is_clean() {
        println!("Fallback catalog matches the live catalog ({} records)", fallback.len());
        return Ok(());
    }

    for id in &drift.missing_from_live {
        println!("  missing from live catalog: {}", id);
    }
    for changed in &drift.changed {
        println!("  {} differs in: {}", changed.id, changed.fields.join(", "));
    }
    bail!(
        "Fallback catalog is out of date ({} missing, {} changed)",
        drift.missing_from_live.len(),
        drift.changed.len()
    )
}
