//! LocalFonts CLI - build-step interface
//!
//! Commands: build, scan
//! Outputs JSON (or CSS) to stdout, logs to stderr
//! Returns 1 on configuration errors, 2 on pipeline failures

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use localfonts_core::{Config, Fallback, FontPaths, FontPipeline, ENGINE_VERSION};

#[derive(Parser)]
#[command(name = "localfonts-cli")]
#[command(about = "LocalFonts CLI - @font-face compiler for local fonts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file (camelCase keys)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Font directory, repeatable; replaces localFontPath
    #[arg(long = "font-dir", global = true)]
    font_dirs: Vec<PathBuf>,

    /// Public path fonts are served from
    #[arg(long, global = true)]
    destination: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate @font-face rules and utility classes
    Build {
        #[arg(long)]
        auto_classes: bool,

        #[arg(long)]
        web_performance: bool,

        #[arg(long)]
        build_performance: bool,

        /// Fallback family for utility classes, or "false" to omit it
        #[arg(long)]
        fallback: Option<String>,

        #[arg(long)]
        cache_file: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Print the resolved font metadata
    Scan,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Css,
}

fn fail(code: u8, error: impl std::fmt::Display) -> ExitCode {
    let output = serde_json::json!({
        "success": false,
        "error": error.to_string(),
    });
    println!("{}", output);
    ExitCode::from(code)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!("localfonts {}", ENGINE_VERSION);

    let mut config = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(c) => c,
            Err(e) => return fail(1, e),
        },
        None => Config::default(),
    };

    if !cli.font_dirs.is_empty() {
        config.local_font_path = Some(FontPaths::Many(cli.font_dirs.clone()));
    }
    if let Some(destination) = cli.destination {
        config.destination_path = Some(destination);
    }

    match cli.command {
        Commands::Build {
            auto_classes,
            web_performance,
            build_performance,
            fallback,
            cache_file,
            format,
        } => {
            if auto_classes {
                config.auto_classes = Some(true);
            }
            if web_performance {
                config.web_performance = Some(true);
            }
            if build_performance {
                config.build_performance = Some(true);
            }
            if let Some(fallback) = fallback {
                config.fallback = Some(match fallback.as_str() {
                    "false" | "" => Fallback::Disabled,
                    _ => Fallback::Family(fallback),
                });
            }
            if cache_file.is_some() {
                config.cache_file = cache_file;
            }

            let pipeline = FontPipeline::new(config.resolve());
            let rules = match pipeline.run() {
                Ok(rules) => rules,
                Err(e) => return fail(2, e),
            };

            match format {
                OutputFormat::Css => print!("{}", rules.to_css()),
                OutputFormat::Json => match serde_json::to_string_pretty(&rules) {
                    Ok(json) => println!("{}", json),
                    Err(e) => return fail(2, e),
                },
            }
            ExitCode::SUCCESS
        }

        Commands::Scan => {
            let pipeline = FontPipeline::new(config.resolve());
            match pipeline.resolve_fonts() {
                Ok(fonts) => match serde_json::to_string_pretty(&fonts) {
                    Ok(json) => {
                        println!("{}", json);
                        ExitCode::SUCCESS
                    }
                    Err(e) => fail(2, e),
                },
                Err(e) => fail(2, e),
            }
        }
    }
}
