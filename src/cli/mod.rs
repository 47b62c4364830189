//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};

use engine_testkit::error::{KitError, KitResult};
use engine_testkit::selector::{
    for_classes, for_method, for_method_with_parameter_types, Selector, TypeName,
};

/// Run sample test classes through the engine test kit
#[derive(Parser, Debug)]
#[command(name = "testkit")]
#[command(version)]
#[command(about = "Run test classes in isolation and report what happened")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (overrides TESTKIT_CONFIG and the default locations)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run test classes or a single method
    Run(RunArgs),

    /// List the available test classes
    List(ListArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

/// Arguments for run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Test class to run (repeatable)
    #[arg(short, long = "class", required = true)]
    pub classes: Vec<String>,

    /// Run only this method (requires exactly one class)
    #[arg(short, long)]
    pub method: Option<String>,

    /// Parameter type of the method (repeatable, requires --method)
    #[arg(short = 't', long = "param-type", requires = "method")]
    pub param_types: Vec<String>,

    /// Output format (table, json, json-pretty, csv, summary)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Run classes in parallel
    #[arg(short, long)]
    pub parallel: bool,

    /// Number of classes running at once (when parallel)
    #[arg(long)]
    pub concurrent: Option<usize>,

    /// Save results to file
    #[arg(short, long)]
    pub output: Option<String>,
}

impl RunArgs {
    /// Selectors described by the arguments
    pub fn selectors(&self) -> KitResult<Vec<Selector>> {
        let Some(method) = &self.method else {
            return for_classes(self.classes.iter().map(String::as_str));
        };

        let class = match self.classes.as_slice() {
            [class] => class,
            _ => {
                return Err(KitError::invalid_argument(
                    "--method requires exactly one --class",
                ))
            }
        };

        let selector = if self.param_types.is_empty() {
            for_method(class.as_str(), method.as_str())?
        } else {
            let types: Vec<TypeName> = self.param_types.iter().map(TypeName::new).collect();
            for_method_with_parameter_types(class.as_str(), method.as_str(), types)?
        };
        Ok(vec![selector])
    }
}

/// Arguments for list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Show methods of each class
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a configuration file with default values
    Init {
        /// Output path
        #[arg(short, long, default_value = "./testkit.yaml")]
        output: String,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show the effective configuration
    Show {
        /// Show environment variables instead
        #[arg(short, long)]
        env: bool,

        /// Output format (yaml, json)
        #[arg(short, long, default_value = "yaml")]
        format: String,
    },

    /// Validate a configuration file
    Validate {
        /// File to validate (default: first file found)
        file: Option<String>,
    },
}
