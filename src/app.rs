//! Application entry point shared by the binary and the integration tests.
//!
//! [`run_app`] resolves the inputs, runs the `scan` or `clean` pipeline over
//! each of them and maps the per-input outcomes to an [`ExitCode`]:
//!
//! - every input failed: the first error is returned
//! - some inputs failed: [`ExitCode::PartialSuccess`]
//! - duplicates were found (and removed, for `clean`): [`ExitCode::Success`]
//! - otherwise: [`ExitCode::NoDuplicates`]

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use rayon::prelude::*;

use crate::actions::{
    persist, read_source, rewrite, AutoSelect, OutputPaths, PromptSelect, SelectionPolicy,
};
use crate::cli::{CleanArgs, Cli, Commands, OutputFormat};
use crate::config::Config;
use crate::duplicates::{Comparator, DuplicateFinder, DuplicateGroup, EntryKind, FinderStats};
use crate::error::ExitCode;
use crate::logging::init_logging;
use crate::output::{CsvOutput, InputReport, InputStatus, JsonOutput, TextOutput};
use crate::tree::{parse_tree, RootName, Tree};

/// One file to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    /// Path of the file.
    pub path: PathBuf,
    /// Kind of entries it holds.
    pub kind: EntryKind,
    /// Whether the path was named by the user (command line or config file).
    pub explicit: bool,
}

/// Decide which files to process.
///
/// Paths from the command line win over `paths` from the configuration.
/// With neither, the default file of every enabled kind is looked up in the
/// current directory.
///
/// # Errors
///
/// Returns an error when no path was given and every kind is disabled.
pub fn resolve_inputs(cli_paths: &[PathBuf], config: &Config) -> Result<Vec<Input>> {
    let explicit = if cli_paths.is_empty() {
        &config.paths
    } else {
        cli_paths
    };

    if !explicit.is_empty() {
        let kind = config.kind.unwrap_or(EntryKind::Bookmarks);
        return Ok(explicit
            .iter()
            .map(|path| Input {
                path: path.clone(),
                kind,
                explicit: true,
            })
            .collect());
    }

    let kinds = config.fallback_kinds();
    if kinds.is_empty() {
        bail!("No input files given and both process_bookmarks and process_notes are disabled");
    }

    log::info!(
        "No paths given. Falling back to {} in the current directory.",
        kinds
            .iter()
            .map(|kind| kind.default_file_name())
            .collect::<Vec<_>>()
            .join(" and ")
    );
    Ok(kinds
        .into_iter()
        .map(|kind| Input {
            path: PathBuf::from(kind.default_file_name()),
            kind,
            explicit: false,
        })
        .collect())
}

/// Run the application with parsed command-line arguments.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, no inputs can be
/// resolved, every input fails, or the report cannot be written.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    init_logging(cli.verbose, cli.quiet);

    let mut config = Config::load_from(cli.config.as_deref())?;
    config.apply_cli(&cli.command);
    let inputs = resolve_inputs(&cli.command.input().paths, &config)?;
    let color = !cli.no_color;

    match &cli.command {
        Commands::Scan(args) => {
            let results: Vec<Result<InputReport>> = inputs
                .par_iter()
                .map(|input| scan_input(input, &config))
                .collect();
            let (reports, code) = settle(&inputs, results)?;
            write_reports(&reports, args.output, code, color)?;
            Ok(code)
        }
        Commands::Clean(args) => {
            let results = clean_all(&inputs, &config, args);
            let (reports, code) = settle(&inputs, results)?;
            if !cli.quiet {
                write_reports(&reports, OutputFormat::Text, code, color)?;
            }
            Ok(code)
        }
    }
}

struct Analysis {
    tree: Tree,
    roots: Vec<RootName>,
    groups: Vec<DuplicateGroup>,
    stats: FinderStats,
}

fn analyze(input: &Input, config: &Config) -> Result<Analysis> {
    let bytes = read_source(&input.path)?;
    let tree = parse_tree(&bytes)
        .with_context(|| format!("Failed to parse {}", input.path.display()))?;

    let finder = DuplicateFinder::new(config.finder_config(input.kind));
    let (groups, stats) = finder
        .find(&tree)
        .with_context(|| format!("Invalid {} file {}", input.kind, input.path.display()))?;

    Ok(Analysis {
        tree,
        roots: finder.config().roots.clone(),
        groups,
        stats,
    })
}

fn scan_input(input: &Input, config: &Config) -> Result<InputReport> {
    let analysis = analyze(input, config)?;

    let mut report = InputReport::new(&input.path, input.kind);
    report.status = if analysis.groups.is_empty() {
        InputStatus::NoDuplicates
    } else {
        InputStatus::Scanned
    };
    report.groups = analysis.groups;
    report.stats = analysis.stats;
    Ok(report)
}

fn clean_all(inputs: &[Input], config: &Config, args: &CleanArgs) -> Vec<Result<InputReport>> {
    if args.interactive {
        let stdin = io::stdin();
        inputs
            .iter()
            .map(|input| {
                let mut policy = PromptSelect::new(
                    stdin.lock(),
                    io::stdout().lock(),
                    Comparator::for_kind(input.kind),
                );
                clean_input(input, config, &mut policy, args.dry_run)
            })
            .collect()
    } else {
        inputs
            .par_iter()
            .map(|input| clean_input(input, config, &mut AutoSelect, args.dry_run))
            .collect()
    }
}

/// Run the full pipeline on one input with the given selection policy.
///
/// # Errors
///
/// Returns an error if the input cannot be read, parsed or written, or if
/// the selection policy fails.
pub fn clean_input(
    input: &Input,
    config: &Config,
    policy: &mut dyn SelectionPolicy,
    dry_run: bool,
) -> Result<InputReport> {
    let analysis = analyze(input, config)?;
    let mut report = InputReport::new(&input.path, input.kind);
    report.stats = analysis.stats;

    if analysis.groups.is_empty() {
        log::info!(
            "No duplicates found in {}. New output files won't be written.",
            input.path.display()
        );
        return Ok(report);
    }

    let remove = policy
        .select(&analysis.groups)
        .context("Failed to read selection")?;
    report.groups = analysis.groups;

    if remove.is_empty() {
        log::info!(
            "Nothing selected for removal in {}. New output files won't be written.",
            input.path.display()
        );
        return Ok(report);
    }

    let outcome = rewrite(&analysis.tree, &remove, &analysis.roots);
    report.removed = outcome.removed_count();
    report.unmatched = outcome.unmatched;

    if report.removed == 0 {
        log::warn!(
            "None of the {} selected entries were found in {}. New output files won't be written.",
            remove.len(),
            input.path.display()
        );
        return Ok(report);
    }

    if dry_run {
        log::info!(
            "Would remove {} {} from {}",
            report.removed,
            input.kind,
            input.path.display()
        );
        report.status = InputStatus::DryRun;
        return Ok(report);
    }

    let persist_config = config.persist_config();
    let paths = OutputPaths::derive(&input.path, input.explicit, input.kind, &persist_config);
    persist(&input.path, &paths, &outcome.tree, &persist_config)?;

    log::info!(
        "Written out cleaned up {} as \"{}\", original file copied to \"{}\" in \"{}\"",
        input.kind,
        paths.clean_name,
        paths.backup_name,
        paths.destination_dir.display()
    );

    report.status = InputStatus::Cleaned;
    report.clean_path = Some(paths.clean);
    report.backup_path = Some(paths.backup);
    Ok(report)
}

/// Turn per-input results into reports and the run's exit code.
fn settle(inputs: &[Input], results: Vec<Result<InputReport>>) -> Result<(Vec<InputReport>, ExitCode)> {
    let mut first_error = None;
    let mut succeeded = 0;
    let mut reports = Vec::with_capacity(inputs.len());
    for (input, result) in inputs.iter().zip(results) {
        match result {
            Ok(report) => {
                succeeded += 1;
                reports.push(report);
            }
            Err(err) => {
                log::error!("{}: {:#}", input.path.display(), err);
                reports.push(InputReport::failed(&input.path, input.kind, &err));
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
    }

    let failed = match first_error {
        Some(err) if succeeded == 0 => return Err(err),
        Some(_) => true,
        None => false,
    };

    let found = reports.iter().any(|report| {
        matches!(
            report.status,
            InputStatus::Scanned | InputStatus::Cleaned | InputStatus::DryRun
        )
    });

    let code = if failed {
        ExitCode::PartialSuccess
    } else if found {
        ExitCode::Success
    } else {
        ExitCode::NoDuplicates
    };
    Ok((reports, code))
}

fn write_reports(reports: &[InputReport], format: OutputFormat, code: ExitCode, color: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match format {
        OutputFormat::Text => TextOutput::new(reports, color).write_to(&mut out)?,
        OutputFormat::Json => JsonOutput::new(reports, code).write_to(&mut out, true)?,
        OutputFormat::Csv => CsvOutput::new(reports).write_to(&mut out)?,
    }
    out.flush()?;
    Ok(())
}
