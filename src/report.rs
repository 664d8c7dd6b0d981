/*!
 * Reporting functionality for txtdump
 *
 * Renders the terminal summary of an export run with the tabled library.
 */

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::exporter::ExportSummary;
use crate::types::FileEntry;
use crate::utils::format_file_size;

/// Largest files listed when an export has many
const TOP_FILES: usize = 10;

/// Format of the report output
pub enum ReportFormat {
    /// Tables followed by the plain summary lines
    ConsoleTable,
    /// Only the plain summary lines
    Plain,
}

/// Report generator for export results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string for an export run
    pub fn generate_report(&self, summary: &ExportSummary) -> String {
        match self.format {
            ReportFormat::ConsoleTable => format!(
                "{}\n\n{}",
                self.generate_console_report(summary),
                self.summary_lines(summary)
            ),
            ReportFormat::Plain => self.summary_lines(summary),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, summary: &ExportSummary) {
        println!("\n{}", self.generate_report(summary));
    }

    /// The count and the two output paths
    pub fn summary_lines(&self, summary: &ExportSummary) -> String {
        let paths = &summary.finalize.paths;
        let mut lines = vec![
            format!(
                "Done. Exported {} files to: {}",
                summary.finalize.exported_count,
                paths.output_dir.display()
            ),
            format!("- Manifest: {}", paths.manifest.display()),
            format!("- Consolidated: {}", paths.consolidated.display()),
        ];
        if let Err(e) = &summary.finalize.manifest {
            lines.push(format!("! Manifest not written: {}", e));
        }
        if let Err(e) = &summary.finalize.consolidated {
            lines.push(format!("! Consolidated file not written: {}", e));
        }
        lines.join("\n")
    }

    // Shorten a relative path from the left, keeping whole trailing segments
    fn format_path(&self, path: &str, max_len: usize) -> String {
        if path.len() <= max_len {
            return path.to_string();
        }

        let parts: Vec<&str> = path.split('/').collect();
        let mut current_len = 3; // Start with "..."
        let mut segments = Vec::new();

        for part in parts.iter().rev() {
            let part_len = part.len() + 1; // +1 for '/'
            if current_len + part_len <= max_len {
                segments.push(*part);
                current_len += part_len;
            } else {
                break;
            }
        }

        if segments.is_empty() {
            let tail: String = path.chars().rev().take(max_len - 3).collect();
            return format!("...{}", tail.chars().rev().collect::<String>());
        }

        let mut result = String::from("...");
        for part in segments.iter().rev() {
            result.push('/');
            result.push_str(part);
        }
        result
    }

    // Create a summary table using the tabled crate
    fn create_summary_table(&self, summary: &ExportSummary) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let total_bytes: u64 = summary.exported().map(|e| e.size).sum();

        let mut rows = vec![
            SummaryRow {
                key: "📂 Output Directory".to_string(),
                value: summary.finalize.paths.output_dir.display().to_string(),
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", summary.duration),
            },
            SummaryRow {
                key: "📄 Files Exported".to_string(),
                value: self.format_number(summary.finalize.exported_count),
            },
            SummaryRow {
                key: "📦 Exported Size".to_string(),
                value: format_file_size(total_bytes),
            },
        ];

        for (label, count) in summary.skip_counts() {
            rows.push(SummaryRow {
                key: format!("⏭️ Skipped ({})", label),
                value: self.format_number(count),
            });
        }

        let status = |ok: bool| {
            let text = if ok { "written" } else { "FAILED" };
            text.to_string()
        };
        rows.push(SummaryRow {
            key: "🧾 Manifest".to_string(),
            value: status(summary.finalize.manifest.is_ok()),
        });
        rows.push(SummaryRow {
            key: "📚 Consolidated".to_string(),
            value: status(summary.finalize.consolidated.is_ok()),
        });

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    // Create a files table using the tabled crate
    fn create_files_table(&self, summary: &ExportSummary) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Size")]
            size: String,
        }

        // Largest first
        let mut files: Vec<&FileEntry> = summary.exported().collect();
        files.sort_by(|a, b| b.size.cmp(&a.size));
        files.truncate(TOP_FILES);

        let rows: Vec<FileRow> = files
            .iter()
            .map(|entry| FileRow {
                path: self.format_path(&entry.relpath, 60),
                size: format_file_size(entry.size),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    // Generate a console table report
    fn generate_console_report(&self, summary: &ExportSummary) -> String {
        let summary_table = self.create_summary_table(summary);
        let files_table = self.create_files_table(summary);

        let summary_title = "✅  EXPORT COMPLETE";
        let files_title = if summary.finalize.exported_count > TOP_FILES {
            "📋  TOP 10 LARGEST EXPORTED FILES  📋"
        } else {
            "📋  EXPORTED FILES"
        };

        format!(
            "{}\n{}\n\n{}\n{}",
            files_title, files_table, summary_title, summary_table
        )
    }
}
