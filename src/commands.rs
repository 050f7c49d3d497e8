//! Subcommand handlers
//!
//! Each handler reads what it needs from the configuration, does its work
//! through the library and writes its report to the given writer.

use crate::cli::{AddArgs, CliArgs, Command, DigArgs, ListArgs, SyncArgs, VersionsArgs};
use crate::config::Config;
use crate::domain::{DependencyType, Manifest, Spec};
use crate::error::{AppError, ConfigError};
use crate::fetcher::Fetchers;
use crate::notifier::ConsoleNotifier;
use crate::orchestrator::Orchestrator;
use crate::output::{FilterOptions, ManifestWriter, OutputFormat};
use crate::progress::Progress;
use crate::store::{DocumentStore, FileStore, ReadWriter};
use crate::version::Mask;
use std::io::{self, IsTerminal, Write};
use tracing::{debug, warn};

/// Width of the rule printed above tables
const TABLE_RULE_WIDTH: usize = 120;

/// Run the selected subcommand
pub async fn execute(args: &CliArgs, config: &Config, out: &mut dyn Write) -> Result<(), AppError> {
    match &args.command {
        Command::Init => init(config, out),
        Command::Add(add_args) => add(add_args, config, out),
        Command::List(list_args) => list(list_args, config, out),
        Command::Dig(dig_args) => dig(dig_args, config, !args.quiet, out).await,
        Command::Versions(versions_args) => versions(versions_args, config, out).await,
        Command::Sync(sync_args) => sync(sync_args, config, !args.quiet, out).await,
    }
}

fn init(config: &Config, out: &mut dyn Write) -> Result<(), AppError> {
    FileStore::new(&config.manifest_path).init(&config.api_version, &[])?;
    writeln!(
        out,
        "Wrote new config file to {:?}",
        config.manifest_path.display().to_string()
    )?;
    Ok(())
}

fn add(args: &AddArgs, config: &Config, out: &mut dyn Write) -> Result<(), AppError> {
    let store = FileStore::new(&config.manifest_path);
    let mut manifest = store.read()?;

    let kind = match args.kind.as_deref().filter(|k| !k.is_empty()) {
        Some(kind) => DependencyType::parse_declared(kind)?,
        None => {
            let kind = DependencyType::determine(&args.name);
            if kind == DependencyType::Docker && looks_like_url(&args.name) {
                warn!(name = %args.name, kind = %kind, "name looks like a URL but not a GitHub repository");
                writeln!(
                    out,
                    "Note: {:?} is not a GitHub repository URL, treating it as a {} image",
                    args.name, kind
                )?;
            }
            kind
        }
    };
    Mask::new(&args.mask)?;

    let spec = Spec::new(&args.name, &args.version)
        .with_type(kind)
        .with_mask(&args.mask);
    let summary = format!("{} ({})", spec.name, spec.effective_type());
    if !manifest.append(spec) {
        return Err(ConfigError::DuplicateDependency {
            name: args.name.clone(),
        }
        .into());
    }

    store.write(&manifest)?;
    writeln!(out, "Added {}", summary)?;
    Ok(())
}

fn list(args: &ListArgs, config: &Config, out: &mut dyn Write) -> Result<(), AppError> {
    let manifest = FileStore::new(&config.manifest_path).read()?;
    let filter = FilterOptions {
        outdated: args.outdated,
        types: args.types.clone(),
    };
    print_manifest(&manifest, args.output, filter, out)
}

async fn dig(
    args: &DigArgs,
    config: &Config,
    show_progress: bool,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    let store = FileStore::new(&config.manifest_path);
    let manifest = store.read()?;

    let fetchers = Fetchers::from_config(&config.registry)?;
    let mut progress = Progress::new(show_progress);
    let refreshed = manifest.latest_with_progress(&fetchers, &mut progress).await;

    print_manifest(&refreshed, args.output, FilterOptions::default(), out)?;

    if args.dry_run {
        debug!("dry run, not writing the config file");
    } else {
        store.write(&refreshed)?;
    }
    Ok(())
}

async fn versions(args: &VersionsArgs, config: &Config, out: &mut dyn Write) -> Result<(), AppError> {
    let kind = match args.kind.as_deref().filter(|k| !k.is_empty()) {
        Some(kind) => DependencyType::parse_declared(kind)?,
        None => DependencyType::determine(&args.name),
    };
    let mask = Mask::new(&args.mask)?;

    let fetchers = Fetchers::from_config(&config.registry)?;
    let found = fetchers
        .for_type(&kind)
        .all_versions(&args.name, &mask)
        .await?;

    for version in found.iter() {
        writeln!(out, "{}", version)?;
    }
    Ok(())
}

async fn sync(
    args: &SyncArgs,
    config: &Config,
    show_progress: bool,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    let incoming = FileStore::new(&config.manifest_path).read()?;

    let mut store_config = config.store.clone();
    if let Some(root) = &args.store {
        store_config.root = root.clone();
    }
    if let Some(collection) = &args.collection {
        store_config.collection = collection.clone();
    }
    if let Some(doc) = &args.doc {
        store_config.doc = doc.clone();
    }
    let store = DocumentStore::new(&store_config);
    let path = store.path().display().to_string();

    let color = io::stdout().is_terminal();
    let fetchers = Fetchers::from_config(&config.registry)?;
    let result = {
        let mut orchestrator = Orchestrator::new(
            Box::new(store),
            Box::new(ConsoleNotifier::new(&mut *out, color)),
            fetchers,
            config.api_version.clone(),
        )
        .with_progress(show_progress);
        orchestrator.run(&incoming.dependencies).await?
    };
    writeln!(
        out,
        "Synced {} dependencies to {:?} ({} new, {} updated, {} unchanged)",
        result.manifest.len(),
        path,
        result.new,
        result.updated,
        result.existing
    )?;
    Ok(())
}

fn print_manifest(
    manifest: &Manifest,
    format: OutputFormat,
    filter: FilterOptions,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    if format == OutputFormat::Table {
        writeln!(out, "{}", "-".repeat(TABLE_RULE_WIDTH))?;
    }
    ManifestWriter::new(filter).write(format, manifest, out)?;
    Ok(())
}

/// Whether a name reads like a URL rather than an image reference
fn looks_like_url(name: &str) -> bool {
    name.contains("://") || name.starts_with("www.")
}
