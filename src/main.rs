use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use layout2scene::config::{IdStrategy, MigrationOptions};
use layout2scene::fonts::{FontMapFile, FontSynchronizer};
use layout2scene::schema::{validate_document, ValidationResult};
use layout2scene::storage::{DocumentSink, DocumentSource, FileSink, FileSource, UploadOptions};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Parser)]
#[command(name = "layout2scene")]
#[command(version, about = "Migrate legacy v1 layouts into v2 scene-graph documents")]
#[command(long_about = "Migrate legacy v1 layouts into v2 scene-graph documents\n\n\
    JSON output is pretty-printed by default with indentation.\n\n\
    Migrate a layout file or a layout id from a source directory:\n  \
    layout2scene migrate layout.json [-o document.json] [--font-map fonts.json] [--dry-run]\n  \
    layout2scene migrate tpl-42 --source-dir layouts --store-dir documents\n\n\
    Check an existing v2 document:\n  \
    layout2scene validate document.json")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output for debugging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate a v1 layout into a v2 document
    Migrate {
        /// Layout JSON file, or a layout id looked up in --source-dir
        input: String,

        /// Directory holding `<id>.json` layouts
        #[arg(long, default_value = ".")]
        source_dir: PathBuf,

        /// Output JSON file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also store the document as `<document id>.json` in this directory
        #[arg(long)]
        store_dir: Option<PathBuf>,

        /// Font name map or font sync report JSON file
        #[arg(long)]
        font_map: Option<PathBuf>,

        /// Compact JSON output (default is pretty-printed with indentation)
        #[arg(long)]
        compact: bool,

        /// Transform and validate, but write nothing
        #[arg(long)]
        dry_run: bool,

        /// Use `n1`, `n2`, ... ids instead of random UUIDs
        #[arg(long)]
        sequential_ids: bool,
    },

    /// Validate a v2 document
    Validate {
        /// v2 document JSON file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_target(false)
        .init();

    match cli.command {
        Commands::Migrate {
            input,
            source_dir,
            output,
            store_dir,
            font_map,
            compact,
            dry_run,
            sequential_ids,
        } => {
            let options = MigrationOptions {
                id_strategy: if sequential_ids {
                    IdStrategy::Sequential
                } else {
                    IdStrategy::Uuid
                },
                ..MigrationOptions::default()
            };
            let args = MigrateArgs {
                input,
                source_dir,
                output,
                store_dir,
                font_map,
                compact,
                dry_run,
            };
            run_migrate(&args, &options)
        }
        Commands::Validate { input } => run_validate(&input),
    }
}

struct MigrateArgs {
    input: String,
    source_dir: PathBuf,
    output: Option<PathBuf>,
    store_dir: Option<PathBuf>,
    font_map: Option<PathBuf>,
    compact: bool,
    dry_run: bool,
}

fn run_migrate(args: &MigrateArgs, options: &MigrationOptions) -> Result<()> {
    let source = FileSource::new(&args.source_dir)
        .fetch(&args.input)
        .with_context(|| format!("Failed to load layout: {}", args.input))?;

    let font_sync = match &args.font_map {
        Some(path) => Some(
            FontMapFile::new(path)
                .sync(&source.embedded_fonts)
                .with_context(|| format!("Failed to read font map: {}", path.display()))?,
        ),
        None => None,
    };

    let migration = layout2scene::migrate_document(&source, font_sync.as_ref(), options)
        .context("Failed to migrate layout")?;

    eprintln!(
        "Migrated '{}': {} page(s), {} node(s), {} source node(s) skipped",
        migration.document.name,
        migration.document.pages.len(),
        migration.document.nodes.len(),
        migration.stats.skipped
    );
    report(&migration.validation);

    if args.dry_run {
        eprintln!("Dry run: nothing written");
    } else {
        let json = if args.compact {
            serde_json::to_string(&migration.document)?
        } else {
            serde_json::to_string_pretty(&migration.document)?
        };

        match args.output.as_ref() {
            Some(path) => {
                fs::write(path, &json)
                    .with_context(|| format!("Failed to write output file: {}", path.display()))?;
                tracing::info!(path = %path.display(), "wrote document");
            }
            None => println!("{}", json),
        }

        if let Some(dir) = &args.store_dir {
            let upload = UploadOptions {
                pretty: !args.compact,
                ..UploadOptions::default()
            };
            let receipt = FileSink::new(dir)
                .upload(&migration.document, &upload)
                .with_context(|| format!("Failed to store document in: {}", dir.display()))?;
            eprintln!("Stored '{}' as {}", receipt.name, receipt.id);
        }
    }

    if !migration.validation.valid {
        bail!(
            "Migrated document failed validation with {} error(s)",
            migration.validation.errors.len()
        );
    }

    Ok(())
}

fn run_validate(input: &Path) -> Result<()> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    let tree: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse JSON: {}", input.display()))?;

    let validation = validate_document(&tree);
    report(&validation);

    if !validation.valid {
        bail!("{} is not a valid document", input.display());
    }

    eprintln!("{} is valid", input.display());
    Ok(())
}

fn report(validation: &ValidationResult) {
    for error in &validation.errors {
        eprintln!("error: {error}");
    }
    for warning in &validation.warnings {
        eprintln!("warning: {warning}");
    }
}
