use crate::config::parser::parse_config_file;
use crate::config::types::{LoadedConfig, MergedConfig, RuleWithSource};
use crate::error::{LoadoutError, Result};
use std::path::{Path, PathBuf};

/// File name looked up at every level of the cascade.
pub const CONFIG_FILE_NAME: &str = ".loadout.toml";

/// Collect every `.loadout.toml` that applies to `start_dir`.
///
/// The walk goes from `start_dir` toward the filesystem root, then falls
/// back to `~/.loadout.toml`. A config with `root = true` ends the walk
/// (the user config is still consulted); `no-external-lookup = true` ends
/// the walk and skips everything above it plus the user config, though
/// configs already collected from more specific directories still apply.
///
/// Returns configs in cascade order, the most specific first. Rule
/// precedence across files follows directly from this order.
pub fn discover_configs(start_dir: &Path) -> Result<Vec<LoadedConfig>> {
	let mut configs = Vec::new();
	let mut current_dir = start_dir.to_path_buf();
	let mut skip_cascade = false;

	loop {
		let config_path = current_dir.join(CONFIG_FILE_NAME);

		if config_path.exists() {
			let config = parse_config_file(&config_path)?;

			// A config may claim the whole rule table for itself
			if config.no_external_lookup {
				configs.push(LoadedConfig {
					config,
					path: config_path,
				});
				return Ok(configs);
			}

			if config.root {
				skip_cascade = true;
			}

			configs.push(LoadedConfig {
				config,
				path: config_path,
			});

			if skip_cascade {
				break;
			}
		}

		if let Some(parent) = current_dir.parent() {
			current_dir = parent.to_path_buf();
		} else {
			break;
		}
	}

	if let Some(user_config) = load_user_config(&configs)? {
		configs.push(user_config);
	}

	Ok(configs)
}

/// Load a single explicitly chosen config file, bypassing discovery.
///
/// Used for the CLI `--config` override. Unlike the cascade walk, a missing
/// file is an error here: the caller asked for this exact path.
pub fn load_explicit_config(path: &Path) -> Result<LoadedConfig> {
	if !path.exists() {
		return Err(LoadoutError::ConfigNotFound {
			path: path.to_path_buf(),
		});
	}

	let config = parse_config_file(path)?;
	Ok(LoadedConfig {
		config,
		path: path.to_path_buf(),
	})
}

/// Load the user's ~/.loadout.toml if it exists and isn't disabled.
fn load_user_config(existing_configs: &[LoadedConfig]) -> Result<Option<LoadedConfig>> {
	// Check if any config disables user config lookup via env var
	for loaded in existing_configs {
		if let Some(ref env_var) = loaded.config.root_config_lookup_disable_env_var
			&& is_env_truthy(env_var)
		{
			return Ok(None);
		}
	}

	let home_dir = dirs::home_dir().ok_or(LoadoutError::HomeDirectoryNotFound)?;
	let user_config_path = home_dir.join(CONFIG_FILE_NAME);

	if user_config_path.exists() {
		let config = parse_config_file(&user_config_path)?;
		Ok(Some(LoadedConfig {
			config,
			path: user_config_path,
		}))
	} else {
		Ok(None)
	}
}

/// Check if an environment variable is set to a truthy value.
fn is_env_truthy(var_name: &str) -> bool {
	match std::env::var(var_name) {
		Ok(value) => {
			let lower = value.to_lowercase();
			!value.is_empty() && lower != "0" && lower != "false" && lower != "no"
		}
		Err(_) => false,
	}
}

/// Merge multiple configs into a single effective rule table.
///
/// Rules keep cascade order, so resolution stays first-match-wins across
/// file boundaries. The `no_external_lookup` flag is set if any config
/// has it.
pub fn merge_configs(configs: &[LoadedConfig]) -> MergedConfig {
	let mut merged = MergedConfig::default();

	for loaded in configs {
		for rule in &loaded.config.module.rules {
			merged.rules.push(RuleWithSource {
				rule: rule.clone(),
				source: loaded.path.clone(),
			});
		}

		if loaded.config.no_external_lookup {
			merged.no_external_lookup = true;
		}
	}

	merged
}

/// Convenience function to discover, load, and merge configs from a directory.
pub fn load_merged_config(start_dir: &Path) -> Result<MergedConfig> {
	let configs = discover_configs(start_dir)?;
	Ok(merge_configs(&configs))
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(LoadoutError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(CONFIG_FILE_NAME))
}
