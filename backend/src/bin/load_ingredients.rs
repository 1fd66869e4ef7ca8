//! Import ingredients from a JSON file into the database.
//!
//! The file holds an array of `{"name": ..., "measurement_unit": ...}`
//! objects. Pairs already present are skipped, so the import can be rerun.

use std::env;
use std::io::Read;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use clap::Parser;
use color_eyre::eyre::{Context, Report, Result, eyre};
use serde::Deserialize;
use tokio::runtime::Builder;

use foodgram::domain::NewIngredient;
use foodgram::domain::ports::IngredientRepository;
use foodgram::outbound::persistence::{
    DbPool, DieselIngredientRepository, PoolConfig, run_pending_migrations,
};

const DATABASE_URL_ENV: &str = "FOODGRAM_DATABASE_URL";

/// `load-ingredients` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "load-ingredients",
    about = "Import ingredients from a JSON file, skipping existing name and unit pairs",
    version
)]
struct CliArgs {
    /// Path to the JSON ingredient list.
    #[arg(value_name = "path")]
    input: PathBuf,
    /// Database connection URL. Falls back to `FOODGRAM_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IngredientRecord {
    name: String,
    measurement_unit: String,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let ingredients = parse_ingredients(&read_input(&args.input)?)?;
    let database_url = resolve_database_url(args.database_url)?;

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build Tokio runtime")?;
    runtime.block_on(async move {
        run_pending_migrations(&database_url)
            .await
            .wrap_err("failed to apply migrations")?;
        let pool = DbPool::new(PoolConfig::new(&database_url))
            .await
            .wrap_err("failed to create database pool")?;
        let summary = DieselIngredientRepository::new(pool)
            .import(&ingredients)
            .await
            .wrap_err("ingredient import failed")?;
        println!("inserted={}", summary.inserted);
        println!("skipped={}", summary.skipped);
        Ok::<(), Report>(())
    })
}

fn read_input(path: &Path) -> Result<String> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| eyre!("input path must name a file: {}", path.display()))?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority())
        .with_context(|| format!("open input directory '{}'", parent.display()))?;
    let mut contents = String::new();
    directory
        .open(Path::new(file_name))
        .and_then(|mut file| file.read_to_string(&mut contents))
        .with_context(|| format!("read input file '{}'", path.display()))?;
    Ok(contents)
}

fn parse_ingredients(raw: &str) -> Result<Vec<NewIngredient>> {
    let records: Vec<IngredientRecord> =
        serde_json::from_str(raw).wrap_err("input must be a JSON array of ingredients")?;
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            NewIngredient::new(&record.name, &record.measurement_unit)
                .map_err(|err| eyre!("ingredient {index} is invalid: {err}"))
        })
        .collect()
}

fn resolve_database_url(explicit: Option<String>) -> Result<String> {
    let (value, source) = match explicit {
        Some(value) => (value, "--database-url"),
        None => (
            env::var(DATABASE_URL_ENV).map_err(|_| {
                eyre!("database URL missing: set --database-url or {DATABASE_URL_ENV}")
            })?,
            DATABASE_URL_ENV,
        ),
    };
    if value.trim().is_empty() {
        return Err(eyre!("{source} must not be empty"));
    }
    Ok(value)
}
