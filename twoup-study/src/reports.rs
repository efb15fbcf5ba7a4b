//! Report generation for sweep result tables.
//!
//! The console path goes through the [`TableSink`] capability so the
//! same report logic can target an interactive (colored) terminal or a
//! plain-text stream; file and machine formats (markdown, CSV, JSON)
//! write directly to any `Write`.

use std::io::Write;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use twoup_engine::{TimeBoxedSummary, UnlimitedSummary};

/// A fully formatted table: column headers plus stringified cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTable {
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl RenderedTable {
    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.len()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }
        widths
    }
}

/// Destination capability for human-readable tables.
pub trait TableSink {
    /// Emit one titled table.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying stream cannot be written.
    fn report(&mut self, title: &str, table: &RenderedTable) -> Result<()>;

    /// Emit one line of free-form commentary.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying stream cannot be written.
    fn note(&mut self, text: &str) -> Result<()>;
}

/// Colored terminal sink.
pub struct InteractiveSink<'w> {
    out: &'w mut dyn Write,
}

impl<'w> InteractiveSink<'w> {
    pub fn new(out: &'w mut dyn Write) -> Self {
        Self { out }
    }
}

impl TableSink for InteractiveSink<'_> {
    fn report(&mut self, title: &str, table: &RenderedTable) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", title.bright_cyan().bold())?;
        writeln!(self.out, "{}", "=".repeat(title.len()).cyan())?;
        let widths = table.column_widths();
        let header = format_row(&widths, table.columns.iter().copied());
        writeln!(self.out, "{}", header.bold())?;
        for row in &table.rows {
            writeln!(
                self.out,
                "{}",
                format_row(&widths, row.iter().map(String::as_str))
            )?;
        }
        Ok(())
    }

    fn note(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text.yellow())?;
        Ok(())
    }
}

/// Plain-text sink for non-interactive streams.
pub struct PlainSink<'w> {
    out: &'w mut dyn Write,
}

impl<'w> PlainSink<'w> {
    pub fn new(out: &'w mut dyn Write) -> Self {
        Self { out }
    }
}

impl TableSink for PlainSink<'_> {
    fn report(&mut self, title: &str, table: &RenderedTable) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{title}")?;
        writeln!(self.out, "{}", "-".repeat(title.len()))?;
        let widths = table.column_widths();
        writeln!(
            self.out,
            "{}",
            format_row(&widths, table.columns.iter().copied())
        )?;
        for row in &table.rows {
            writeln!(
                self.out,
                "{}",
                format_row(&widths, row.iter().map(String::as_str))
            )?;
        }
        Ok(())
    }

    fn note(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{text}")?;
        Ok(())
    }
}

fn format_row<'a>(widths: &[usize], cells: impl Iterator<Item = &'a str>) -> String {
    let mut line = String::new();
    for (i, (cell, &width)) in cells.zip(widths).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(&format!("{cell:>width$}"));
    }
    line
}

const TIMEBOXED_COLUMNS: [&str; 8] = [
    "base_bet",
    "box_rounds",
    "mean_final",
    "median_final",
    "bust_rate",
    "pct_profitable",
    "avg_profit_given_profit",
    "avg_loss_given_loss",
];

const UNLIMITED_COLUMNS: [&str; 6] = [
    "base_bet",
    "cap_rounds",
    "avg_peak_profit",
    "median_peak_profit",
    "avg_bust_round",
    "bust_rate",
];

#[must_use]
pub fn render_timeboxed(rows: &[TimeBoxedSummary]) -> RenderedTable {
    RenderedTable {
        columns: TIMEBOXED_COLUMNS.to_vec(),
        rows: rows
            .iter()
            .map(|r| {
                vec![
                    format!("{:.2}", r.base_bet),
                    r.box_rounds.to_string(),
                    format!("{:.2}", r.mean_final),
                    format!("{:.2}", r.median_final),
                    format_rate(r.bust_rate),
                    format_rate(r.pct_profitable),
                    format!("{:.2}", r.avg_profit_given_profit),
                    format!("{:.2}", r.avg_loss_given_loss),
                ]
            })
            .collect(),
    }
}

#[must_use]
pub fn render_unlimited(rows: &[UnlimitedSummary]) -> RenderedTable {
    RenderedTable {
        columns: UNLIMITED_COLUMNS.to_vec(),
        rows: rows
            .iter()
            .map(|r| {
                vec![
                    format!("{:.2}", r.base_bet),
                    r.cap_rounds.to_string(),
                    format!("{:.2}", r.avg_peak_profit),
                    format!("{:.2}", r.median_peak_profit),
                    format_bust_round(r.avg_bust_round),
                    format_rate(r.bust_rate),
                ]
            })
            .collect(),
    }
}

fn format_rate(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

fn format_bust_round(avg: f64) -> String {
    if avg.is_finite() {
        format!("{avg:.1}")
    } else {
        "-".to_string()
    }
}

/// All tables produced by one study run.
#[derive(Debug, Serialize)]
pub struct StudyReport {
    pub grid: Vec<TimeBoxedSummary>,
    pub best_by_mean_final: Vec<TimeBoxedSummary>,
    pub best_by_pct_profitable: Vec<TimeBoxedSummary>,
    pub unlimited: Vec<UnlimitedSummary>,
}

/// Winners and peak statistics through a table sink.
///
/// # Errors
///
/// Propagates sink write failures.
pub fn generate_console_report(sink: &mut dyn TableSink, report: &StudyReport) -> Result<()> {
    sink.report(
        "Best by MEAN bankroll",
        &render_timeboxed(&report.best_by_mean_final),
    )?;
    sink.report(
        "Best by % PROFITABLE",
        &render_timeboxed(&report.best_by_pct_profitable),
    )?;
    sink.report(
        "Unlimited play - average peak profit & bust round",
        &render_unlimited(&report.unlimited),
    )?;
    sink.note(&format!(
        "Grid: {} rows (export with --report csv)",
        report.grid.len()
    ))?;
    Ok(())
}

/// Full grid and winners as markdown pipe tables.
///
/// # Errors
///
/// Propagates stream write failures.
pub fn generate_markdown_report<W: Write>(out: &mut W, report: &StudyReport) -> Result<()> {
    writeln!(out, "# Two-Up Martingale Study\n")?;
    markdown_table(out, "Best by mean bankroll", &render_timeboxed(&report.best_by_mean_final))?;
    markdown_table(
        out,
        "Best by % profitable",
        &render_timeboxed(&report.best_by_pct_profitable),
    )?;
    markdown_table(out, "Unlimited play", &render_unlimited(&report.unlimited))?;
    markdown_table(out, "Full grid", &render_timeboxed(&report.grid))?;
    Ok(())
}

fn markdown_table<W: Write>(out: &mut W, title: &str, table: &RenderedTable) -> Result<()> {
    writeln!(out, "## {title}\n")?;
    writeln!(out, "| {} |", table.columns.join(" | "))?;
    let separators: Vec<&str> = table.columns.iter().map(|_| "---").collect();
    writeln!(out, "| {} |", separators.join(" | "))?;
    for row in &table.rows {
        writeln!(out, "| {} |", row.join(" | "))?;
    }
    writeln!(out)?;
    Ok(())
}

/// Time-boxed grid as CSV, one row per (stake, round budget) cell, raw
/// (unrounded) values.
///
/// # Errors
///
/// Propagates stream write failures.
pub fn generate_csv_report<W: Write>(out: &mut W, grid: &[TimeBoxedSummary]) -> Result<()> {
    writeln!(out, "{}", TIMEBOXED_COLUMNS.join(","))?;
    for r in grid {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{}",
            r.base_bet,
            r.box_rounds,
            r.mean_final,
            r.median_final,
            r.bust_rate,
            r.pct_profitable,
            r.avg_profit_given_profit,
            r.avg_loss_given_loss
        )?;
    }
    Ok(())
}

/// Unlimited table as CSV; an undefined bust-round mean becomes an
/// empty field.
///
/// # Errors
///
/// Propagates stream write failures.
pub fn generate_unlimited_csv_report<W: Write>(
    out: &mut W,
    table: &[UnlimitedSummary],
) -> Result<()> {
    writeln!(out, "{}", UNLIMITED_COLUMNS.join(","))?;
    for r in table {
        let avg_bust_round = if r.avg_bust_round.is_finite() {
            r.avg_bust_round.to_string()
        } else {
            String::new()
        };
        writeln!(
            out,
            "{},{},{},{},{},{}",
            r.base_bet, r.cap_rounds, r.avg_peak_profit, r.median_peak_profit, avg_bust_round,
            r.bust_rate
        )?;
    }
    Ok(())
}

/// Whole report as pretty JSON.
///
/// # Errors
///
/// Propagates serialization and stream write failures.
pub fn generate_json_report<W: Write>(out: &mut W, report: &StudyReport) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use twoup_engine::{RankField, SweepConfig, best_by, run_timeboxed_sweep, run_unlimited_sweep};

    fn sample_report() -> StudyReport {
        let cfg = SweepConfig::new(1_000.0, 100, 42);
        let grid = run_timeboxed_sweep(&[5.0, 10.0], &[10, 20], &cfg).expect("grid");
        let peak_cfg = SweepConfig::new(1_000.0, 100, 123);
        let unlimited = run_unlimited_sweep(&[5.0, 10.0], &[150], &peak_cfg).expect("peaks");
        StudyReport {
            best_by_mean_final: best_by(&grid, RankField::MeanFinal),
            best_by_pct_profitable: best_by(&grid, RankField::PctProfitable),
            grid,
            unlimited,
        }
    }

    #[test]
    fn csv_report_emits_header_plus_one_line_per_row() {
        let report = sample_report();
        let mut buffer = Vec::new();
        generate_csv_report(&mut buffer, &report.grid).expect("csv");
        let text = String::from_utf8(buffer).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), report.grid.len() + 1);
        assert_eq!(lines[0], TIMEBOXED_COLUMNS.join(","));
        assert!(lines[1].starts_with("5,10,"));
    }

    #[test]
    fn csv_report_is_deterministic_for_a_fixed_seed() {
        let first = {
            let mut buffer = Vec::new();
            generate_csv_report(&mut buffer, &sample_report().grid).expect("csv");
            buffer
        };
        let second = {
            let mut buffer = Vec::new();
            generate_csv_report(&mut buffer, &sample_report().grid).expect("csv");
            buffer
        };
        assert_eq!(first, second);
    }

    #[test]
    fn unlimited_csv_blanks_undefined_bust_round() {
        let row = UnlimitedSummary {
            base_bet: 5.0,
            cap_rounds: 150,
            avg_peak_profit: 120.0,
            median_peak_profit: 90.0,
            avg_bust_round: f64::NAN,
            bust_rate: 0.0,
        };
        let mut buffer = Vec::new();
        generate_unlimited_csv_report(&mut buffer, &[row]).expect("csv");
        let text = String::from_utf8(buffer).expect("utf8");
        assert!(text.lines().nth(1).expect("data row").contains(",,"));
    }

    #[test]
    fn plain_and_interactive_sinks_render_the_same_cells() {
        let report = sample_report();
        let table = render_timeboxed(&report.best_by_mean_final);

        let mut plain_out = Vec::new();
        let mut plain = PlainSink::new(&mut plain_out);
        plain.report("Winners", &table).expect("plain");

        let plain_text = String::from_utf8(plain_out).expect("utf8");
        assert!(plain_text.contains("Winners"));
        assert!(plain_text.contains("mean_final"));
        for row in &table.rows {
            for cell in row {
                assert!(plain_text.contains(cell.as_str()));
            }
        }

        let mut interactive_out = Vec::new();
        let mut interactive = InteractiveSink::new(&mut interactive_out);
        interactive.report("Winners", &table).expect("interactive");
        assert!(!interactive_out.is_empty());
    }

    #[test]
    fn markdown_report_contains_every_section() {
        let report = sample_report();
        let mut buffer = Vec::new();
        generate_markdown_report(&mut buffer, &report).expect("markdown");
        let text = String::from_utf8(buffer).expect("utf8");
        for heading in [
            "## Best by mean bankroll",
            "## Best by % profitable",
            "## Unlimited play",
            "## Full grid",
        ] {
            assert!(text.contains(heading), "missing {heading}");
        }
    }

    #[test]
    fn json_report_round_trips_the_grid_shape() {
        let report = sample_report();
        let mut buffer = Vec::new();
        generate_json_report(&mut buffer, &report).expect("json");
        let value: serde_json::Value = serde_json::from_slice(&buffer).expect("parse");
        assert_eq!(
            value["grid"].as_array().map(Vec::len),
            Some(report.grid.len())
        );
        assert_eq!(
            value["best_by_mean_final"].as_array().map(Vec::len),
            Some(2)
        );
    }
}
