use crate::error::{LoadoutError, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Top-level shape of a `.loadout.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// Marks the end of the upward cascade walk. ~/.loadout.toml is still
	/// consulted after a root config.
	#[serde(default)]
	pub root: bool,

	/// Ends the cascade walk at this file: nothing above it and no user
	/// config is consulted. Configs from more specific directories already
	/// collected still apply.
	#[serde(default)]
	pub no_external_lookup: bool,

	/// Name of an environment variable that, when truthy, turns off the
	/// ~/.loadout.toml fallback (typically set in CI).
	#[serde(default)]
	pub root_config_lookup_disable_env_var: Option<String>,

	/// The `module` table carrying the rule list.
	#[serde(default)]
	pub module: ModuleConfig,
}

/// The `module` table of a config file: an ordered rule list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModuleConfig {
	/// Rules in declared order. The first matching, non-excluded rule wins.
	#[serde(default)]
	pub rules: Vec<Rule>,
}

/// A module rule: pattern predicates plus the loader chain they select.
#[derive(Debug, Clone, Deserialize)]
pub struct Rule {
	/// Regex matched against the asset path.
	pub test: String,

	/// Optional regex; a path matching it is skipped even when `test` matches.
	#[serde(default)]
	pub exclude: Option<String>,

	/// Loader steps in declared order. The engine applies them right-to-left
	/// (last listed runs first); declared order is what this file stores.
	#[serde(rename = "use", default)]
	pub use_chain: Vec<UseEntry>,
}

/// One entry of a rule's `use` array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum UseEntry {
	/// Bare loader name with no options.
	Name(String),

	/// Loader with an options value, passed through to the engine opaquely.
	Detailed {
		loader: String,
		#[serde(default)]
		options: Option<toml::Value>,
	},
}

impl UseEntry {
	/// The loader name, regardless of entry form.
	pub fn loader(&self) -> &str {
		match self {
			UseEntry::Name(name) => name,
			UseEntry::Detailed { loader, .. } => loader,
		}
	}
}

/// One parsed config plus the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	pub config: Config,
	pub path: PathBuf,
}

/// The effective rule table after flattening the cascade.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
	/// Rules from every file, kept in cascade order so first-match-wins
	/// spans file boundaries.
	pub rules: Vec<RuleWithSource>,

	/// True when any file in the cascade claimed `no-external-lookup`.
	pub no_external_lookup: bool,
}

/// A rule annotated with the config file that declared it.
#[derive(Debug, Clone)]
pub struct RuleWithSource {
	pub rule: Rule,

	/// Shown in `config show` and `explain` output.
	pub source: PathBuf,
}

impl Config {
	/// Validate structural invariants of every rule in this config.
	///
	/// A rule with an empty `use` chain selects nothing and is always a
	/// configuration mistake, so it is rejected at load time rather than
	/// silently matching paths to a zero-step chain.
	pub fn validate(&self) -> Result<()> {
		for (index, rule) in self.module.rules.iter().enumerate() {
			if rule.use_chain.is_empty() {
				return Err(LoadoutError::EmptyUseChain {
					index: index + 1,
					test: rule.test.clone(),
				});
			}
		}
		Ok(())
	}
}
