use clap::{Parser, Subcommand};
use importer::{CanonicalFormat, CanonicalTransformer, CanonicalValidator, ImportSummary};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pitchside-import")]
#[command(about = "Pitchside club, squad and tournament importer", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Only needed by commands that write to the database
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a canonical JSON file and print every error and warning
    Validate { file: PathBuf },
    Import {
        file: PathBuf,

        #[arg(long)]
        validate_only: bool,
    },
    BulkImport {
        #[arg(long, default_value = "./imports")]
        directory: PathBuf,

        #[arg(long)]
        validate_only: bool,
    },
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() -> CliResult<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("pitchside_import={},importer={}", log_level, log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Validate { file } => handle_validate(&file).await?,
        Commands::Import {
            file,
            validate_only,
        } => {
            handle_import(&file, validate_only, cli.database_url.as_deref()).await?;
        }
        Commands::BulkImport {
            directory,
            validate_only,
        } => {
            handle_bulk_import(&directory, validate_only, cli.database_url.as_deref()).await?;
        }
    }

    Ok(())
}

async fn load(file: &Path) -> CliResult<CanonicalFormat> {
    let json_content = tokio::fs::read_to_string(file).await?;
    Ok(serde_json::from_str(&json_content)?)
}

async fn connect(database_url: Option<&str>) -> CliResult<PgPool> {
    let database_url = database_url.ok_or("DATABASE_URL must be set to import")?;

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;
    Ok(pool)
}

async fn handle_validate(file: &Path) -> CliResult<()> {
    let canonical = load(file).await?;
    let report = CanonicalValidator::check(&canonical);

    for error in &report.errors {
        tracing::error!("{}", error);
    }
    report.log_warnings();

    tracing::info!(
        "{}: {} error(s), {} warning(s)",
        file.display(),
        report.errors.len(),
        report.warnings.len()
    );

    if !report.errors.is_empty() {
        return Err(format!("{} is not a valid import file", file.display()).into());
    }
    Ok(())
}

async fn handle_import(file: &Path, validate_only: bool, database_url: Option<&str>) -> CliResult<()> {
    tracing::info!("Loading canonical JSON from: {}", file.display());
    let canonical = load(file).await?;

    tracing::info!(
        "Loaded {} club(s){} (v{})",
        canonical.clubs.len(),
        if canonical.tournament.is_some() { " and a tournament" } else { "" },
        canonical.format_version
    );

    let report = CanonicalValidator::validate(&canonical)?;
    report.log_warnings();
    tracing::info!("Validation successful");

    if validate_only {
        return Ok(());
    }

    let pool = connect(database_url).await?;
    let summary = CanonicalTransformer::new(&pool)
        .import_to_database(&canonical)
        .await?;
    log_summary(&summary);

    Ok(())
}

async fn handle_bulk_import(
    directory: &Path,
    validate_only: bool,
    database_url: Option<&str>,
) -> CliResult<()> {
    tracing::info!("Scanning directory for canonical JSON files: {}", directory.display());

    let json_files = collect_json_files(directory).await?;
    if json_files.is_empty() {
        tracing::warn!("No JSON files found in {}", directory.display());
        return Ok(());
    }
    tracing::info!("Found {} canonical JSON file(s)", json_files.len());

    let pool = if validate_only {
        None
    } else {
        Some(connect(database_url).await?)
    };

    let mut success_count = 0;
    let mut error_count = 0;

    for (idx, file_path) in json_files.iter().enumerate() {
        tracing::info!("[{}/{}] Processing: {}", idx + 1, json_files.len(), file_path.display());

        match process_file(file_path, pool.as_ref()).await {
            Ok(()) => success_count += 1,
            Err(e) => {
                error_count += 1;
                tracing::error!("  {}: {}", file_path.display(), e);
            }
        }
    }

    tracing::info!("Summary: {} succeeded, {} failed", success_count, error_count);

    if error_count > 0 {
        return Err(format!("{} file(s) failed to import", error_count).into());
    }
    Ok(())
}

/// `*.json` files directly in `directory` or one level below, sorted.
async fn collect_json_files(directory: &Path) -> CliResult<Vec<PathBuf>> {
    let mut json_files = Vec::new();
    let mut entries = tokio::fs::read_dir(directory).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_dir() {
            let mut sub_entries = tokio::fs::read_dir(&path).await?;
            while let Some(sub_entry) = sub_entries.next_entry().await? {
                let sub_path = sub_entry.path();
                if is_json(&sub_path) {
                    json_files.push(sub_path);
                }
            }
        } else if is_json(&path) {
            json_files.push(path);
        }
    }

    json_files.sort();
    Ok(json_files)
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

async fn process_file(file_path: &Path, pool: Option<&PgPool>) -> CliResult<()> {
    let canonical = load(file_path).await?;

    let report = CanonicalValidator::validate(&canonical)?;
    report.log_warnings();

    if let Some(pool) = pool {
        let summary = CanonicalTransformer::new(pool)
            .import_to_database(&canonical)
            .await?;
        log_summary(&summary);
    }

    Ok(())
}

fn log_summary(summary: &ImportSummary) {
    tracing::info!(
        "Imported {} new club(s), {} new player(s), {} membership(s) ({} skipped)",
        summary.clubs_created,
        summary.players_created,
        summary.memberships_created,
        summary.memberships_skipped
    );
    if let Some(slug) = &summary.tournament_slug {
        tracing::info!("Tournament '{}' created with {} team(s)", slug, summary.teams_created);
    }
}
