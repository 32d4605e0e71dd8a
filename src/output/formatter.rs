//! Output formatters: console, JSON and Markdown renderings of an extraction report

use crate::config::{OutputConfig, OutputFormat};
use crate::error::{Result, ResumeExtractorError};
use crate::output::report::ExtractionReport;
use crate::processing::relevance::ExperienceLevel;
use colored::{Color, Colorize};
use std::fmt::Write as _;
use std::path::Path;

pub trait OutputFormatter {
    fn format_report(&self, report: &ExtractionReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Terminal output with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Picks the formatter for a requested format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

fn fmt_error(err: std::fmt::Error) -> ResumeExtractorError {
    ResumeExtractorError::OutputFormatting(err.to_string())
}

fn level_color(level: ExperienceLevel) -> Color {
    match level {
        ExperienceLevel::Junior => Color::Yellow,
        ExperienceLevel::Mid => Color::Cyan,
        ExperienceLevel::Senior => Color::Green,
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let (prefix, color) = match level {
            1 => ("█", Color::Blue),
            2 => ("▓", Color::Green),
            _ => ("▒", Color::Yellow),
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn field(&self, label: &str, value: Option<&str>) -> String {
        match value {
            Some(value) => format!("  {:<8} {}\n", format!("{}:", label), value),
            None => format!("  {:<8} {}\n", format!("{}:", label), self.colorize("not found", Color::BrightBlack)),
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &ExtractionReport) -> Result<String> {
        let result = &report.result;
        let resume = &result.resume;
        let mut output = String::new();

        output.push_str(&self.format_header("RESUME EXTRACTION", 1));
        if let Some(source) = &report.metadata.source_file {
            writeln!(output, "Source: {} | Processing time: {}ms", source, report.metadata.processing_time_ms)
                .map_err(fmt_error)?;
        }
        writeln!(output, "{}", self.colorize(&report.summary.headline, Color::Cyan)).map_err(fmt_error)?;

        output.push_str(&self.format_header("Contact", 2));
        output.push_str(&self.field("Name", resume.contact.name.as_deref()));
        output.push_str(&self.field("Email", resume.contact.email.as_deref()));
        output.push_str(&self.field("Phone", resume.contact.phone.as_deref()));

        output.push_str(&self.format_header("Classification", 2));
        writeln!(
            output,
            "  Category: {} ({:.0}% confidence)",
            result.classification,
            result.confidence * 100.0
        )
        .map_err(fmt_error)?;
        let level = result.experience_level.to_string();
        writeln!(output, "  Level:    {}", self.colorize(&level, level_color(result.experience_level)))
            .map_err(fmt_error)?;

        output.push_str(&self.format_header("Experience", 2));
        writeln!(
            output,
            "  Total {:.1} years | relevant {:.1} | other {:.1}",
            resume.experience_years, result.relevant_years, result.other_years
        )
        .map_err(fmt_error)?;
        if let Some(note) = &report.summary.attribution_note {
            writeln!(output, "  {}", self.colorize(note, Color::Yellow)).map_err(fmt_error)?;
        }
        for segment in &resume.experience_breakdown {
            writeln!(
                output,
                "  • {} ({:.1} yrs, {} - {})",
                segment.title, segment.years, segment.start, segment.end
            )
            .map_err(fmt_error)?;
        }

        if !resume.skills.is_empty() {
            output.push_str(&self.format_header(&format!("Skills ({})", resume.skills.len()), 3));
            let shown = if self.detailed { resume.skills.len() } else { resume.skills.len().min(10) };
            writeln!(output, "  {}", resume.skills[..shown].join(", ")).map_err(fmt_error)?;
            if shown < resume.skills.len() {
                writeln!(output, "  ... and {} more", resume.skills.len() - shown).map_err(fmt_error)?;
            }
        }

        if !resume.education.is_empty() {
            output.push_str(&self.format_header("Education", 3));
            for entry in &resume.education {
                writeln!(output, "  • {}", entry).map_err(fmt_error)?;
            }
        }

        if self.detailed && !report.summary.fields_missing.is_empty() {
            output.push_str(&self.format_header("Missing Fields", 3));
            writeln!(
                output,
                "  {}",
                self.colorize(&report.summary.fields_missing.join(", "), Color::Red)
            )
            .map_err(fmt_error)?;
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &ExtractionReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn or_dash(value: Option<&str>) -> &str {
        value.unwrap_or("-")
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &ExtractionReport) -> Result<String> {
        let result = &report.result;
        let resume = &result.resume;
        let mut output = String::new();

        output.push_str("# Resume Extraction Report\n\n");

        if self.include_metadata {
            writeln!(
                output,
                "**Generated:** {} | **Version:** {}",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.extractor_version
            )
            .map_err(fmt_error)?;
            if let Some(source) = &report.metadata.source_file {
                writeln!(output, "**Source:** `{}`", source).map_err(fmt_error)?;
            }
            output.push('\n');
        }

        writeln!(output, "{}\n", report.summary.headline).map_err(fmt_error)?;

        output.push_str("## Contact\n\n");
        output.push_str("| Field | Value |\n|-------|-------|\n");
        writeln!(output, "| Name | {} |", Self::or_dash(resume.contact.name.as_deref())).map_err(fmt_error)?;
        writeln!(output, "| Email | {} |", Self::or_dash(resume.contact.email.as_deref())).map_err(fmt_error)?;
        writeln!(output, "| Phone | {} |", Self::or_dash(resume.contact.phone.as_deref())).map_err(fmt_error)?;

        output.push_str("\n## Classification\n\n");
        writeln!(
            output,
            "- **Category:** {} ({:.0}% confidence)\n- **Experience level:** {}",
            result.classification,
            result.confidence * 100.0,
            result.experience_level
        )
        .map_err(fmt_error)?;

        output.push_str("\n## Experience\n\n");
        writeln!(
            output,
            "**Total:** {:.1} years (relevant {:.1}, other {:.1})\n",
            resume.experience_years, result.relevant_years, result.other_years
        )
        .map_err(fmt_error)?;
        if let Some(note) = &report.summary.attribution_note {
            writeln!(output, "> {}\n", note).map_err(fmt_error)?;
        }
        if !resume.experience_breakdown.is_empty() {
            output.push_str("| Role | Years | Start | End |\n|------|-------|-------|-----|\n");
            for segment in &resume.experience_breakdown {
                writeln!(
                    output,
                    "| {} | {:.1} | {} | {} |",
                    segment.title, segment.years, segment.start, segment.end
                )
                .map_err(fmt_error)?;
            }
            output.push('\n');
        }

        if !resume.skills.is_empty() {
            output.push_str("## Skills\n\n");
            writeln!(output, "{}\n", resume.skills.join(", ")).map_err(fmt_error)?;
        }

        if !resume.education.is_empty() {
            output.push_str("## Education\n\n");
            for entry in &resume.education {
                writeln!(output, "- {}", entry).map_err(fmt_error)?;
            }
            output.push('\n');
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::from_config(&OutputConfig::default())
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::with_options(config.color_output, config.detailed, config.pretty_json, true)
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &ExtractionReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    };
    format!("{}_extraction{}.{}", base_name, timestamp_suffix, extension)
}
