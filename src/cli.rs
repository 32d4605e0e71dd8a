//! CLI interface for the resume extractor

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-extractor")]
#[command(about = "Extract structured information from resumes")]
#[command(long_about = "Recover contact details, skills, education and a dated work history from resume text, then rate experience against a job category")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract information from a single resume
    Parse {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Job category decided elsewhere; skips the built-in keyword classifier
        #[arg(long)]
        category: Option<String>,

        /// Confidence reported with --category
        #[arg(long, default_value_t = 1.0, requires = "category")]
        confidence: f64,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Show every skill and the fields that were not found
        #[arg(short, long)]
        detailed: bool,
    },

    /// Extract information from several resumes concurrently
    Batch {
        /// Resume files (PDF, TXT, MD)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Directory to write one report per resume into
        #[arg(long)]
        save_dir: Option<PathBuf>,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },

    /// Reference table management
    Reference {
        #[command(subcommand)]
        action: ReferenceAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

#[derive(Subcommand)]
pub enum ReferenceAction {
    /// Write the active reference tables as TOML for editing
    Export {
        /// Destination file
        file: PathBuf,
    },
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_command_arguments() {
        let cli = Cli::try_parse_from([
            "resume-extractor",
            "parse",
            "--resume",
            "cv.pdf",
            "--category",
            "Data Scientist",
            "--confidence",
            "0.7",
            "-o",
            "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Parse { resume, category, confidence, output, .. } => {
                assert_eq!(resume, PathBuf::from("cv.pdf"));
                assert_eq!(category.as_deref(), Some("Data Scientist"));
                assert_eq!(confidence, 0.7);
                assert_eq!(output.as_deref(), Some("json"));
            }
            _ => panic!("expected parse command"),
        }
    }

    #[test]
    fn test_confidence_requires_category() {
        let result = Cli::try_parse_from(["resume-extractor", "parse", "-r", "cv.txt", "--confidence", "0.5"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_output_formats() {
        assert_eq!(parse_output_format("JSON"), Ok(OutputFormat::Json));
        assert_eq!(parse_output_format("md"), Ok(OutputFormat::Markdown));
        assert!(parse_output_format("html").is_err());
    }

    #[test]
    fn test_file_extension_validation() {
        assert!(validate_file_extension(Path::new("cv.PDF"), &["pdf", "txt"]).is_ok());
        assert!(validate_file_extension(Path::new("cv.docx"), &["pdf", "txt"]).is_err());
        assert!(validate_file_extension(Path::new("cv"), &["pdf"]).is_err());
    }
}
