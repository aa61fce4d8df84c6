//! Human-readable terminal output.
//!
//! Colours come from `yansi` and are only emitted when enabled, so the same
//! formatter serves terminals, pipes and `--no-color`.

use std::fmt::Display;
use std::io::{self, Write};

use yansi::{Color, Paint, Style};

use super::{format_date_added, InputReport, InputStatus, RunSummary};
use crate::duplicates::Comparator;

const HEADER: Style = Style::new().bold();
const KEEP: Style = Style::new().fg(Color::Green);
const DUPLICATE: Style = Style::new().fg(Color::Yellow);
const ERROR: Style = Style::new().fg(Color::Red).bold();
const DIM: Style = Style::new().dim();

/// Text formatter for input reports.
pub struct TextOutput<'a> {
    reports: &'a [InputReport],
    color: bool,
}

impl<'a> TextOutput<'a> {
    /// Create a formatter; `color` enables ANSI styling.
    #[must_use]
    pub fn new(reports: &'a [InputReport], color: bool) -> Self {
        Self { reports, color }
    }

    fn paint<T: Display>(&self, value: T, style: Style) -> String {
        if self.color {
            value.paint(style).to_string()
        } else {
            value.to_string()
        }
    }

    fn write_report<W: Write>(&self, writer: &mut W, report: &InputReport) -> io::Result<()> {
        let title = format!("{} ({})", report.path.display(), report.kind);
        writeln!(writer, "{}", self.paint(title, HEADER))?;

        match report.status {
            InputStatus::Failed => {
                let message = report.error.as_deref().unwrap_or("unknown error");
                writeln!(writer, "  {} {}", self.paint("error:", ERROR), message)?;
                return Ok(());
            }
            InputStatus::NoDuplicates => {
                writeln!(writer, "  no duplicates found")?;
                return Ok(());
            }
            _ => {}
        }

        let comparator = Comparator::for_kind(report.kind);
        for group in &report.groups {
            writeln!(
                writer,
                "  Folder \"{}\" {}",
                group.folder_name.as_deref().unwrap_or_default(),
                self.paint(format!("(id {})", group.folder_id), DIM)
            )?;
            for (position, node) in group.members.iter().enumerate() {
                let role = if position == 0 {
                    self.paint("keep", KEEP)
                } else {
                    self.paint("dup ", DUPLICATE)
                };
                let date = node
                    .date_added
                    .as_deref()
                    .map(format_date_added)
                    .unwrap_or_default();
                writeln!(
                    writer,
                    "    {} {:>6}  {}  {}  {}",
                    role,
                    node.id,
                    node.display_name(),
                    comparator.payload(node).unwrap_or_default(),
                    self.paint(date, DIM)
                )?;
            }
        }

        let groups = report.groups.len();
        match report.status {
            InputStatus::Cleaned => {
                writeln!(
                    writer,
                    "  removed {} of {} entries in {} group(s)",
                    report.removed, report.stats.leaves_scanned, groups
                )?;
                if let (Some(clean), Some(backup)) = (&report.clean_path, &report.backup_path) {
                    writeln!(
                        writer,
                        "  written to {}, original copied to {}",
                        clean.display(),
                        backup.display()
                    )?;
                }
            }
            InputStatus::DryRun => {
                writeln!(
                    writer,
                    "  would remove {} of {} entries in {} group(s)",
                    report.removed, report.stats.leaves_scanned, groups
                )?;
            }
            _ => {
                writeln!(
                    writer,
                    "  {} group(s), {} duplicate entries",
                    groups, report.stats.duplicate_entries
                )?;
            }
        }

        if !report.unmatched.is_empty() {
            writeln!(
                writer,
                "  {} selected id(s) not found: {}",
                report.unmatched.len(),
                report.unmatched.join(", ")
            )?;
        }
        Ok(())
    }

    /// Write every report followed by the run summary.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for report in self.reports {
            self.write_report(writer, report)?;
        }

        let summary = RunSummary::from_reports(self.reports);
        writeln!(
            writer,
            "{} {} input(s), {} folder(s), {} entries scanned, {} group(s), {} removed{}",
            self.paint("Summary:", HEADER),
            summary.inputs,
            summary.folders_scanned,
            summary.leaves_scanned,
            summary.duplicate_groups,
            summary.entries_removed,
            if summary.failed > 0 {
                format!(", {} failed", summary.failed)
            } else {
                String::new()
            }
        )
    }

    /// Render everything to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if formatting fails.
    pub fn to_string(&self) -> io::Result<String> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
