//! Resume extractor: structured information from resume documents

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use resume_extractor::cli::{self, Cli, Commands, ConfigAction, ReferenceAction};
use resume_extractor::config::{Config, OutputFormat};
use resume_extractor::error::{Result, ResumeExtractorError};
use resume_extractor::input::{FileType, InputManager};
use resume_extractor::output::{save_report_to_file, suggest_filename, ExtractionReport, ReportGenerator};
use resume_extractor::processing::analyzer::AnalysisEngine;
use resume_extractor::processing::classifier::FixedClassifier;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Parse {
            resume,
            category,
            confidence,
            output,
            save,
            detailed,
        } => {
            let format = resolve_format(output.as_deref(), &config)?;
            cli::validate_file_extension(&resume, &FileType::EXTENSIONS)
                .map_err(|e| ResumeExtractorError::InvalidInput(format!("Resume file: {}", e)))?;

            info!("Extracting resume information from {}", resume.display());
            let start_time = Instant::now();

            let engine = match category {
                Some(category) => {
                    let classifier = Arc::new(FixedClassifier::new(category, confidence)?);
                    AnalysisEngine::with_classifier(&config, classifier)?
                }
                None => AnalysisEngine::new(&config)?,
            };

            let mut input_manager = InputManager::new();
            let text = input_manager.extract_text(&resume).await?;
            let result = engine.analyze(&text)?;

            let report = ExtractionReport::from_analysis(
                result,
                Some(resume.display().to_string()),
                start_time.elapsed().as_millis() as u64,
            );

            let mut output_config = config.output.clone();
            output_config.detailed |= detailed;
            let generator = ReportGenerator::from_config(&output_config);
            let rendered = generator.generate_report(&report, format)?;
            println!("{}", rendered);

            if let Some(path) = save {
                // Saved console reports are plain text
                let content = if format == OutputFormat::Console {
                    ReportGenerator::with_options(false, output_config.detailed, output_config.pretty_json, true)
                        .generate_report(&report, format)?
                } else {
                    rendered
                };
                save_report_to_file(&content, &path)?;
                println!("{} {}", "Report saved to".green(), path.display());
            }
        }

        Commands::Batch { files, output, save_dir } => {
            let format = resolve_format(output.as_deref(), &config)?;
            let engine = Arc::new(AnalysisEngine::new(&config)?);
            let generator = ReportGenerator::from_config(&config.output);

            info!("Reading {} resume files", files.len());
            let progress = ProgressBar::new(files.len() as u64);
            progress.set_style(
                ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .map_err(|e| ResumeExtractorError::OutputFormatting(e.to_string()))?
                    .progress_chars("#>-"),
            );
            progress.enable_steady_tick(Duration::from_millis(100));

            let mut input_manager = InputManager::new();
            let mut readable: Vec<(PathBuf, String)> = Vec::with_capacity(files.len());
            for path in files {
                progress.set_message(path.display().to_string());
                match input_manager.extract_text(&path).await {
                    Ok(text) => readable.push((path, text)),
                    Err(e) => warn!("Skipping {}: {}", path.display(), e),
                }
                progress.inc(1);
            }
            progress.finish_with_message("files read");

            let start_time = Instant::now();
            let (paths, texts): (Vec<PathBuf>, Vec<String>) = readable.into_iter().unzip();
            let results = engine.analyze_batch(texts).await;
            let elapsed = start_time.elapsed().as_millis() as u64;

            let mut succeeded = 0;
            for (path, result) in paths.iter().zip(results) {
                let result = match result {
                    Ok(result) => result,
                    Err(e) => {
                        warn!("Analysis failed for {}: {}", path.display(), e);
                        continue;
                    }
                };
                succeeded += 1;

                let report = ExtractionReport::from_analysis(result, Some(path.display().to_string()), elapsed);
                let rendered = generator.generate_report(&report, format)?;

                match &save_dir {
                    Some(dir) => {
                        let target = dir.join(suggest_filename(format, &path.to_string_lossy(), false));
                        save_report_to_file(&rendered, &target)?;
                        info!("Saved {}", target.display());
                    }
                    None => println!("{}", rendered),
                }
            }

            println!(
                "{} {} of {} resumes analyzed",
                "Done:".green().bold(),
                succeeded,
                paths.len()
            );
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("{}", "Current Configuration".bold());
                println!("File: {}\n", config_path.display());
                let content = toml::to_string_pretty(&config)
                    .map_err(|e| ResumeExtractorError::Configuration(e.to_string()))?;
                println!("{}", content);
            }

            Some(ConfigAction::Reset) => {
                Config::default().save_to(config_path)?;
                println!("{}", "Configuration reset to defaults".green());
            }

            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
            }
        },

        Commands::Reference { action } => match action {
            ReferenceAction::Export { file } => {
                let reference = config.reference_data()?;
                reference.save(&file)?;
                println!(
                    "{} {} ({} skills, {} job titles, {} categories)",
                    "Reference tables written to".green(),
                    file.display(),
                    reference.skills.len(),
                    reference.job_titles.len(),
                    reference.category_keywords.len()
                );
            }
        },
    }

    Ok(())
}

/// Flag value when given, otherwise the configured default
fn resolve_format(flag: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match flag {
        Some(value) => cli::parse_output_format(value).map_err(ResumeExtractorError::InvalidInput),
        None => Ok(config.output.format),
    }
}
