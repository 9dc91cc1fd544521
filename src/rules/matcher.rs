use crate::config::types::{MergedConfig, Rule, RuleWithSource};
use crate::error::{LoadoutError, Result};
use crate::rules::chain::LoaderChain;
use regex::Regex;
use std::path::Path;

/// Outcome of evaluating a single rule against a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
	/// `test` did not match the path.
	TestMissed,

	/// `test` matched, but `exclude` matched too. Exclusion wins.
	Excluded,

	/// `test` matched and no exclusion applied.
	Matched,
}

impl MatchOutcome {
	/// Short label for trace output.
	pub fn as_str(&self) -> &'static str {
		match self {
			MatchOutcome::TestMissed => "test missed",
			MatchOutcome::Excluded => "excluded",
			MatchOutcome::Matched => "matched",
		}
	}
}

/// A compiled rule ready for matching.
///
/// Patterns are compiled once at load time. Afterwards the rule is
/// read-only, so one table can serve concurrent path resolutions.
#[derive(Debug)]
pub struct CompiledRule {
	/// The original rule.
	pub rule: Rule,

	/// Compiled `test` regex.
	pub test: Regex,

	/// Compiled `exclude` regex, if the rule has one.
	pub exclude: Option<Regex>,

	/// Normalized loader chain in declared order.
	pub chain: LoaderChain,

	/// Source config path (for debugging).
	pub source: std::path::PathBuf,
}

impl CompiledRule {
	/// Compile a rule from a RuleWithSource.
	pub fn from_rule_with_source(rws: &RuleWithSource) -> Result<Self> {
		let test = compile_pattern(&rws.rule.test)?;

		let exclude = rws
			.rule
			.exclude
			.as_ref()
			.map(|p| compile_pattern(p))
			.transpose()?;

		Ok(CompiledRule {
			rule: rws.rule.clone(),
			test,
			exclude,
			chain: LoaderChain::from_entries(&rws.rule.use_chain),
			source: rws.source.clone(),
		})
	}

	/// Evaluate this rule against a path.
	pub fn evaluate(&self, path: &Path) -> MatchOutcome {
		let path_str = path.to_string_lossy();

		if !self.test.is_match(&path_str) {
			return MatchOutcome::TestMissed;
		}

		// Exclusion wins over inclusion within a matching rule
		if let Some(ref exclude) = self.exclude
			&& exclude.is_match(&path_str)
		{
			return MatchOutcome::Excluded;
		}

		MatchOutcome::Matched
	}

	/// Check if this rule effectively selects the given path.
	pub fn matches(&self, path: &Path) -> bool {
		self.evaluate(path) == MatchOutcome::Matched
	}
}

/// Compile a regex pattern string.
fn compile_pattern(pattern: &str) -> Result<Regex> {
	Regex::new(pattern).map_err(|source| LoadoutError::InvalidPattern {
		pattern: pattern.to_string(),
		source,
	})
}

/// Compile all rules in a merged config.
pub fn compile_rules(config: &MergedConfig) -> Result<Vec<CompiledRule>> {
	config
		.rules
		.iter()
		.map(CompiledRule::from_rule_with_source)
		.collect()
}

/// Find the first matching, non-excluded rule for a path.
///
/// Rules are consulted in table order and the search stops at the winner.
/// `None` means no rule applies and the embedding engine's default handling
/// takes over.
pub fn find_matching_rule<'a>(
	rules: &'a [CompiledRule],
	path: &Path,
) -> Option<&'a CompiledRule> {
	rules.iter().find(|rule| rule.matches(path))
}

/// Evaluate every rule against a path, in table order.
///
/// Unlike `find_matching_rule` this does not stop at the winner; the full
/// outcome vector backs the `explain` trace.
pub fn evaluate_rules(rules: &[CompiledRule], path: &Path) -> Vec<MatchOutcome> {
	rules.iter().map(|rule| rule.evaluate(path)).collect()
}
