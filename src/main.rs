//! cctrans - Caption and Metadata Translation Pipeline
//!
//! Command line entry point: translates the captions and metadata of a
//! catalog video into many languages at once.

use std::time::Duration;
use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};

use cctrans::cli::{Args, Commands};
use cctrans::config::Config;
use cctrans::pipeline::{Delivery, FlowReport, Pipeline, Targets};
use cctrans::translate::{Translator, TranslatorFactory};
use cctrans::translate::deepl::DeeplTranslator;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    // Load configuration
    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if std::path::Path::new("cctrans.toml").exists() {
                info!("Found cctrans.toml in current directory, loading...");
                Config::from_file("cctrans.toml")?
            } else {
                Config::default()
            }
        }
    };

    let failures = match args.command {
        Commands::InitConfig { output } => {
            config.save_to_file(&output)?;
            println!("Wrote configuration to {}", output.display());
            0
        }
        Commands::Usage => {
            let translator = DeeplTranslator::new(config.translate.clone())?;
            let usage = translator.usage().await?;
            println!("Characters used: {} / {}", usage.character_count, usage.character_limit);
            0
        }
        Commands::Languages => {
            let translator = TranslatorFactory::create_translator(config.translate.clone())?;
            let languages = translator.languages().await?;
            println!("{}", languages.join(", "));
            0
        }
        Commands::Captions { video, source, target_langs } => {
            let pipeline = connect(&config)?;
            let spinner = spinner(format!("Translating captions of {}", video))?;
            let report = pipeline
                .translate_captions(&video, &source, &Targets::parse(&target_langs))
                .await;
            spinner.finish_and_clear();

            let report = report?;
            print_report("Captions", &report);
            report.failed().count()
        }
        Commands::Metadata { video, target_langs } => {
            let pipeline = connect(&config)?;
            let spinner = spinner(format!("Translating metadata of {}", video))?;
            let report = pipeline
                .translate_metadata(&video, &Targets::parse(&target_langs))
                .await;
            spinner.finish_and_clear();

            let report = report?;
            print_report("Metadata", &report);
            report.failed().count()
        }
        Commands::Process { video, target_langs } => {
            let pipeline = connect(&config)?;
            let spinner = spinner(format!("Processing {}", video))?;
            let report = pipeline
                .process_video(&video, &Targets::parse(&target_langs))
                .await;
            spinner.finish_and_clear();

            let report = report?;
            print_report("Metadata", &report.metadata);
            let mut failures = report.metadata.failed().count();
            match &report.captions {
                Ok(captions) => {
                    print_report("Captions", captions);
                    failures += captions.failed().count();
                }
                Err(e) => {
                    println!("\nCaptions: not translated ({})", e);
                    failures += 1;
                }
            }
            failures
        }
    };

    if failures > 0 {
        return Err(anyhow::anyhow!("{} language(s) were not delivered", failures));
    }

    info!("cctrans completed successfully");
    Ok(())
}

/// Build the pipeline and abandon in-flight translations on Ctrl-C
fn connect(config: &Config) -> Result<Pipeline> {
    let pipeline = Pipeline::from_config(config)?;

    let cancel = pipeline.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, discarding pending translations");
            cancel.cancel();
        }
    });

    Ok(pipeline)
}

fn spinner(message: String) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(120));
    Ok(spinner)
}

fn print_report<A>(title: &str, report: &FlowReport<A>) {
    println!("\n{} of {} ({} -> {} languages):",
             title, report.video_id, report.source_language, report.languages.len());
    println!("{:<10} {:<60}", "Language", "Result");
    println!("{}", "-".repeat(70));

    for language in &report.languages {
        let result = match &language.delivery {
            Delivery::Delivered => "delivered".to_string(),
            Delivery::TranslationFailed(e) => format!("translation failed: {}", e),
            Delivery::UploadFailed(e) => format!("upload failed: {}", e),
        };
        println!("{:<10} {:<60}", language.language, result);
    }
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".cctrans").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "cctrans.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - console: {}, file: {}",
          log_level, log_dir.join("cctrans.log").display());

    Ok(())
}
