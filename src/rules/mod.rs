//! Rule compilation and resolution for loadout.
//!
//! This module handles:
//! - Pattern compilation for `test` and `exclude` predicates
//! - First-match-wins resolution of the loader chain for a path
//! - Per-rule evaluation traces for diagnostics
//! - Normalized loader chains with declared and execution order views

pub mod chain;
pub mod matcher;

pub use chain::{LoaderChain, LoaderInvocation};
pub use matcher::{CompiledRule, MatchOutcome, compile_rules, evaluate_rules, find_matching_rule};
