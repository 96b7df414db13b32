use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use colsync_catalog::{CatalogApi, CatalogCredentials, CatalogSession, TableResolver, TableauClient};
use colsync_core::{ColumnStatus, Config, SyncError, SyncReport, TableRecord};
use colsync_engine::{SyncOptions, SyncPipeline, SyncTargets};
use colsync_warehouse::{SnowflakeAdapter, SnowflakeAdapterBuilder};

const DEFAULT_CONFIG: &str = "colsync.toml";

/// colsync - Publish warehouse column comments to the BI catalog
#[derive(Parser)]
#[command(name = "colsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: colsync.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy column comments from the warehouse into catalog descriptions
    Sync {
        /// Tables to synchronize (default: [sync].tables from the config)
        tables: Vec<String>,

        /// Synchronize every table of the configured database
        #[arg(long, conflicts_with = "tables")]
        all: bool,

        /// Show what would be published without updating the catalog
        #[arg(long)]
        dry_run: bool,

        /// Output file for the run report
        #[arg(short, long, default_value = "colsync-report.json")]
        output: PathBuf,
    },

    /// List catalog tables for the configured database
    Tables,

    /// Verify warehouse and catalog credentials
    Check,

    /// Write a starter colsync.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Sync { tables, all, dry_run, output } => {
            let config = load_config(cli.config.as_deref(), cli.verbose)?;
            let targets = if all {
                SyncTargets::All
            } else if !tables.is_empty() {
                SyncTargets::Tables(tables)
            } else {
                SyncTargets::Tables(config.sync.tables.clone())
            };
            let options = SyncOptions {
                dry_run: dry_run || config.sync.dry_run,
            };
            sync_command(&config, &targets, options, &output, cli.verbose).await
        }
        Commands::Tables => tables_command(&load_config(cli.config.as_deref(), cli.verbose)?).await,
        Commands::Check => check_command(&load_config(cli.config.as_deref(), cli.verbose)?).await,
        Commands::Init { force } => {
            let path = cli.config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
            init_command(&path, force)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Load the config file, apply environment overrides and validate
fn load_config(path: Option<&Path>, verbose: bool) -> Result<Config> {
    let mut config = if let Some(path) = path {
        Config::from_file(path).with_context(|| format!("Failed to load {}", path.display()))?
    } else if Path::new(DEFAULT_CONFIG).exists() {
        Config::from_file(Path::new(DEFAULT_CONFIG))?
    } else {
        if verbose {
            eprintln!("{}", "No config file found, using environment only".yellow());
        }
        Config::default()
    };

    config.apply_env();
    config
        .validate()
        .context("Incomplete configuration (run `colsync init` for a template)")?;
    Ok(config)
}

async fn open_warehouse(config: &Config) -> Result<SnowflakeAdapter> {
    let wh = &config.warehouse;
    let mut builder = SnowflakeAdapterBuilder::with_password(&wh.account, &wh.user, wh.password.expose())
        .with_database(&wh.database);

    if let Some(warehouse) = &wh.warehouse {
        builder = builder.with_warehouse(warehouse);
    }
    if let Some(role) = &wh.role {
        builder = builder.with_role(role);
    }
    if let Some(schema) = &wh.schema {
        builder = builder.with_schema(schema);
    }

    builder
        .open()
        .await
        .with_context(|| format!("Failed to connect to warehouse account '{}'", wh.account))
}

async fn connect_catalog(config: &Config) -> Result<(TableauClient, CatalogSession)> {
    let client = TableauClient::from_config(&config.catalog)?;
    let session = client
        .sign_in(&CatalogCredentials::from_config(&config.catalog))
        .await
        .with_context(|| format!("Failed to sign in to {}", config.catalog.server))?;
    Ok((client, session))
}

async fn sign_out(client: &TableauClient, session: &CatalogSession) {
    if let Err(e) = client.sign_out(session).await {
        tracing::warn!(error = %e, "catalog sign-out failed");
    }
}

/// Sync command - publish comments table by table
async fn sync_command(
    config: &Config,
    targets: &SyncTargets,
    options: SyncOptions,
    output: &Path,
    verbose: bool,
) -> Result<()> {
    if verbose {
        eprintln!("{} {}", "Connecting to warehouse".cyan(), config.warehouse.account);
    }
    let warehouse = open_warehouse(config).await?;

    if verbose {
        eprintln!("{} {}", "Signing in to".cyan(), config.catalog.server);
    }
    let (client, session) = connect_catalog(config).await?;

    let result = run_sync(&warehouse, &client, &session, &config.warehouse.database, targets, options).await;
    sign_out(&client, &session).await;
    let report = result?;

    report
        .save_to_file(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if verbose {
        eprintln!("{} {}", "Report saved to:".green(), output.display());
    }

    print_sync_summary(&report);

    if report.has_failures() {
        std::process::exit(1);
    }

    Ok(())
}

async fn run_sync(
    warehouse: &SnowflakeAdapter,
    client: &TableauClient,
    session: &CatalogSession,
    database: &str,
    targets: &SyncTargets,
    options: SyncOptions,
) -> Result<SyncReport> {
    let resolver = TableResolver::load(client, session, database).await?;
    let report = SyncPipeline::new(warehouse, client, session, &resolver)
        .with_options(options)
        .run(targets)
        .await?;
    Ok(report)
}

fn print_sync_summary(report: &SyncReport) {
    println!("\n{}", "=".repeat(60).bright_blue());
    if report.dry_run {
        println!("{}", "Column Description Sync (dry run)".bold().bright_blue());
    } else {
        println!("{}", "Column Description Sync".bold().bright_blue());
    }
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    for table in &report.tables {
        match &table.error {
            Some(error) => println!("{} {}: {}", "✗".red(), table.table.bold(), error),
            None => {
                println!("{} {}", "✓".green(), table.table.bold());
                for column in &table.columns {
                    match &column.status {
                        ColumnStatus::Updated => println!("    {} {}", "updated".green(), column.column_name),
                        ColumnStatus::Planned => println!("    {} {}", "planned".cyan(), column.column_name),
                        ColumnStatus::Skipped => println!("    {} {}", "skipped".dimmed(), column.column_name),
                        ColumnStatus::Failed { error } => {
                            println!("    {} {}: {}", "failed".red(), column.column_name, error)
                        }
                    }
                }
            }
        }
    }

    let summary = &report.summary;
    println!();
    println!("{}", "Summary:".bold());
    println!("  Tables:   {} ({} failed)", summary.tables, summary.tables_failed);
    if report.dry_run {
        println!("  Planned:  {}", summary.planned.to_string().cyan());
    } else {
        println!("  Updated:  {}", summary.updated.to_string().green());
    }
    println!("  Skipped:  {}", summary.skipped);

    if summary.failed > 0 {
        println!("  Failed:   {}", summary.failed.to_string().red().bold());
    } else {
        println!("  Failed:   {}", summary.failed.to_string().green());
    }

    println!("{}", "=".repeat(60).bright_blue());
}

/// Tables command - list what the catalog knows about the database
async fn tables_command(config: &Config) -> Result<()> {
    let (client, session) = connect_catalog(config).await?;
    let database = &config.warehouse.database;

    let result = list_tables(&client, &session, database).await;
    sign_out(&client, &session).await;
    let tables = result?;

    println!("{} {}", "Catalog tables for".bold(), database.bold());
    for table in &tables {
        let luid = table.rest_id().unwrap_or("-");
        println!("  {:<40} {}", table.name, luid.dimmed());
    }
    println!("{} tables", tables.len());

    Ok(())
}

async fn list_tables(
    client: &TableauClient,
    session: &CatalogSession,
    database: &str,
) -> Result<Vec<TableRecord>, SyncError> {
    let resolver = TableResolver::load(client, session, database).await?;
    match resolver.tables() {
        Some(tables) => Ok(tables.to_vec()),
        None => {
            eprintln!("{}", "Metadata API unavailable, listing every site table".yellow());
            client.list_site_tables(session).await
        }
    }
}

/// Check command - open both sessions and close them again
async fn check_command(config: &Config) -> Result<()> {
    open_warehouse(config).await?;
    println!("{} warehouse {}", "✓".green(), config.warehouse.account);

    let (client, session) = connect_catalog(config).await?;
    println!("{} catalog {} (site {})", "✓".green(), config.catalog.server, session.site_id);

    client
        .sign_out(&session)
        .await
        .context("Failed to sign out of the catalog")?;
    println!("{}", "All connections OK".green().bold());

    Ok(())
}

/// Init command - write a starter config
fn init_command(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    Config::template().save_to_file(path)?;
    println!("{} {}", "Wrote".green(), path.display());
    println!("Set SNOWFLAKE_PASSWORD and TABLEAU_PAT_SECRET in the environment or a .env file.");
    Ok(())
}
