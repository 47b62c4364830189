//! testkit - run test classes in isolation and inspect the results
//!
//! A small front end over the engine test kit and its sample suites.
//!
//! ## Usage
//!
//! ```bash
//! # List the sample classes
//! testkit list --detailed
//!
//! # Run classes, in parallel
//! testkit run --class DummyClass --class FailingClass --parallel
//!
//! # Run one overload of a parameterized method
//! testkit run --class DummyPropertyClass --method single --param-type i64
//!
//! # Summary line only
//! testkit run --class FailingClass --format summary
//! ```
//!
//! Exits with status 1 when any test or container failed.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, info};

mod cli;

use cli::Args;
use engine_testkit::catalog::TestCatalog;
use engine_testkit::config::{self, EnvConfig, KitConfig};
use engine_testkit::kit::TestKit;
use engine_testkit::output::{write_results_to_file, OutputFormat, ResultFormatter};
use engine_testkit::suites;
use engine_testkit::utils::logger::{init_logger, LogLevel};

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    match args.command {
        cli::Command::Run(run_args) => {
            let config = load_config(args.config.as_deref(), args.verbose)?;
            run_tests(run_args, config)
        }
        cli::Command::List(list_args) => {
            init_logger(base_log_level(args.verbose));
            list_classes(&suites::catalog(), list_args);
            Ok(ExitCode::SUCCESS)
        }
        cli::Command::Config(config_args) => {
            manage_config(config_args, args.config.as_deref(), args.verbose)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn base_log_level(verbose: bool) -> LogLevel {
    if verbose {
        LogLevel::Debug
    } else {
        LogLevel::default()
    }
}

/// Resolve the effective configuration and start logging with its level
fn load_config(path: Option<&str>, verbose: bool) -> Result<KitConfig> {
    let mut config = KitConfig::resolve(path.map(Path::new))?;
    if verbose {
        config.log_level = LogLevel::Debug;
    }
    init_logger(config.log_level);
    debug!("Effective configuration: {:?}", config);
    Ok(config)
}

fn run_tests(args: cli::RunArgs, mut config: KitConfig) -> Result<ExitCode> {
    if args.parallel {
        config.engine.parallel = true;
    }
    if let Some(concurrent) = args.concurrent {
        config.engine.max_concurrent = concurrent;
    }
    config.validate()?;

    let format = match args.format.as_deref() {
        Some(name) => OutputFormat::from_str(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown output format: {name}"))?,
        None => config.output_format,
    };

    let selectors = args.selectors()?;
    info!(
        "Running {} selector(s) ({})",
        selectors.len(),
        if config.engine.parallel {
            "parallel"
        } else {
            "sequential"
        }
    );

    let kit = TestKit::with_config(suites::catalog(), config.engine.clone());
    let results = kit.execute(&selectors)?;

    println!("{}", ResultFormatter::new(format).format_results(&results)?);

    if let Some(output) = &args.output {
        write_results_to_file(output, &results, format)?;
        println!("✓ Results saved to {output}");
    }

    Ok(if results.is_all_succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn list_classes(catalog: &TestCatalog, args: cli::ListArgs) {
    println!("\nTest Classes ({} total)\n", catalog.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for class in catalog.classes() {
        println!("  {:22} {}", class.name(), class.description());

        if args.detailed {
            for method in class.methods() {
                let mut notes = Vec::new();
                if method.invocation_count() != 1 {
                    notes.push(format!("{} invocations", method.invocation_count()));
                }
                if let Some(reason) = method.disabled_reason() {
                    notes.push(format!("disabled: {reason}"));
                }
                if notes.is_empty() {
                    println!("      - {}", method.signature());
                } else {
                    println!("      - {} [{}]", method.signature(), notes.join(", "));
                }
            }
        }
    }

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
}

fn manage_config(args: cli::ConfigArgs, config_path: Option<&str>, verbose: bool) -> Result<()> {
    if !matches!(args.action, cli::ConfigAction::Show { env: false, .. }) {
        init_logger(base_log_level(verbose));
    }

    match args.action {
        cli::ConfigAction::Init { output, force } => {
            let path = Path::new(&output);
            if path.exists() && !force {
                anyhow::bail!(
                    "Configuration file already exists: {output}. Use --force to overwrite."
                );
            }

            KitConfig::default().save(path)?;
            println!("✓ Configuration file created: {output}");
        }

        cli::ConfigAction::Show { env, format } => {
            if env {
                println!("{:#?}", EnvConfig::load());
                println!();
                config::print_env_help();
            } else {
                let effective = load_config(config_path, verbose)?;
                let output = if format == "json" {
                    serde_json::to_string_pretty(&effective)?
                } else {
                    serde_yaml::to_string(&effective)?
                };
                println!("{output}");
            }
        }

        cli::ConfigAction::Validate { file } => {
            let path = file
                .or_else(|| {
                    config::find_config_file().map(|p| p.to_string_lossy().to_string())
                })
                .context("No configuration file found")?;

            match KitConfig::load(&path) {
                Ok(_) => println!("✓ Configuration file is valid: {path}"),
                Err(e) => {
                    println!("✗ Configuration file is invalid: {path}");
                    println!("  Error: {e:#}");
                    return Err(e);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_init_ignores_broken_config() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.yaml");
        std::fs::write(&broken, "engine: [not, a, map").unwrap();
        let output = dir.path().join("fresh.yaml");

        let args = cli::ConfigArgs {
            action: cli::ConfigAction::Init {
                output: output.to_string_lossy().to_string(),
                force: false,
            },
        };
        manage_config(args, broken.to_str(), false).unwrap();

        assert!(KitConfig::load(&output).is_ok());
    }

    #[test]
    fn test_config_show_reports_broken_config() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.yaml");
        std::fs::write(&broken, "engine: [not, a, map").unwrap();

        let args = cli::ConfigArgs {
            action: cli::ConfigAction::Show {
                env: false,
                format: "yaml".to_string(),
            },
        };
        assert!(manage_config(args, broken.to_str(), false).is_err());
    }

    #[test]
    fn test_config_validate_reports_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.yaml");
        std::fs::write(&broken, "engine: [not, a, map").unwrap();

        let args = cli::ConfigArgs {
            action: cli::ConfigAction::Validate {
                file: Some(broken.to_string_lossy().to_string()),
            },
        };
        assert!(manage_config(args, None, false).is_err());
    }
}
