//! Loadout - CLI tool for resolving bundler loader chains from declarative
//! module rules.
//!
//! This library provides the core functionality for loadout, including:
//! - Configuration file parsing and cascade discovery
//! - Rule pattern compilation and first-match-wins resolution
//! - Loader chain normalization with declared and execution order views
//! - Per-rule evaluation traces for diagnostics
//!
//! # Example
//!
//! ```no_run
//! use loadout_cli::config::load_merged_config;
//! use loadout_cli::rules::{compile_rules, find_matching_rule};
//! use std::path::Path;
//!
//! let cwd = std::env::current_dir().unwrap();
//! let config = load_merged_config(&cwd).unwrap();
//! let rules = compile_rules(&config).unwrap();
//!
//! if let Some(rule) = find_matching_rule(&rules, Path::new("src/app.module.css")) {
//!     println!("loader chain: {}", rule.chain);
//! }
//! ```

pub mod config;
pub mod error;
pub mod rules;

pub use error::{LoadoutError, Result};
