//! # CLI Module
//!
//! Command-line front end for the planner, installed as the `apiseq` binary.
//!
//! ## Commands
//!
//! ### `plan`
//!
//! Compute the execution plan and write the artifact:
//!
//! ```bash
//! apiseq plan --spec openapi.yaml --output plan.json
//! ```
//!
//! Options:
//! - `--spec <FILE>` - Path to OpenAPI specification (required)
//! - `--output <FILE>` - Artifact path (default: stdout)
//! - `--format <json|yaml>` - Artifact format (default: from the output extension)
//! - `--config <FILE>` - Planner configuration (also `APISEQ_CONFIG`)
//! - `--fail-on-cycle` - Exit with status 2 when a cycle is found
//!
//! A one-line summary goes to stderr so stdout can be piped.
//!
//! ### `inspect`
//!
//! One line per operation with its producer/protected flags:
//!
//! ```bash
//! apiseq inspect --spec openapi.yaml
//! ```
//!
//! ### `config`
//!
//! Print the default configuration, a starting point for a custom file:
//!
//! ```bash
//! apiseq config > apiseq.toml
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use apiseq::cli::{run, Cli};
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! let code = run(cli)?;
//! ```

mod commands;


pub use commands::{run, run_cli, Cli, Commands, CYCLE_EXIT_CODE};
