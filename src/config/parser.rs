use crate::config::types::Config;
use crate::error::{LoadoutError, Result};
use std::path::Path;

/// Read and parse one config file.
pub fn parse_config_file(path: &Path) -> Result<Config> {
	let content =
		std::fs::read_to_string(path).map_err(|source| LoadoutError::ConfigReadError {
			path: path.to_path_buf(),
			source,
		})?;

	parse_config_str(&content, path)
}

/// Parse config content directly; `path` is only used in error values.
pub fn parse_config_str(content: &str, path: &Path) -> Result<Config> {
	let config: Config =
		toml::from_str(content).map_err(|source| LoadoutError::ConfigParseError {
			path: path.to_path_buf(),
			source,
		})?;

	config.validate()?;

	Ok(config)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::types::UseEntry;
	use std::path::PathBuf;

	#[test]
	fn test_parse_empty_config() {
		let content = "";
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert!(!config.root);
		assert!(!config.no_external_lookup);
		assert!(config.root_config_lookup_disable_env_var.is_none());
		assert!(config.module.rules.is_empty());
	}

	#[test]
	fn test_parse_cascade_flags() {
		let content = r#"
root = true
no-external-lookup = true
root-config-lookup-disable-env-var = "CI"
"#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert!(config.root);
		assert!(config.no_external_lookup);
		assert_eq!(
			config.root_config_lookup_disable_env_var,
			Some("CI".to_string())
		);
	}

	#[test]
	fn test_parse_rules_array_of_tables() {
		let content = r#"
[[module.rules]]
test = '(?i)\.module\.p?css$'
use = [
    "style-loader",
    { loader = "css-loader", options = { modules = true } },
    "postcss-loader",
]

[[module.rules]]
test = '(?i)\.p?css$'
exclude = '(?i)\.module\.p?css$'
use = ["style-loader", "css-loader", "postcss-loader"]
"#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert_eq!(config.module.rules.len(), 2);

		let rule1 = &config.module.rules[0];
		assert_eq!(rule1.test, r"(?i)\.module\.p?css$");
		assert!(rule1.exclude.is_none());
		assert_eq!(rule1.use_chain.len(), 3);
		assert_eq!(rule1.use_chain[0], UseEntry::Name("style-loader".to_string()));
		match &rule1.use_chain[1] {
			UseEntry::Detailed { loader, options } => {
				assert_eq!(loader, "css-loader");
				let options = options.as_ref().unwrap();
				assert_eq!(options.get("modules"), Some(&toml::Value::Boolean(true)));
			}
			other => panic!("Expected detailed entry, got {other:?}"),
		}

		let rule2 = &config.module.rules[1];
		assert_eq!(rule2.exclude.as_deref(), Some(r"(?i)\.module\.p?css$"));
		assert!(rule2.use_chain.iter().all(|e| matches!(e, UseEntry::Name(_))));
	}

	#[test]
	fn test_parse_rules_inline_tables() {
		let content = r#"
[module]
rules = [
    { test = '\.module\.css$', use = ["style-loader"] },
    { test = '\.css$', exclude = '\.module\.css$', use = ["css-loader"] },
]
"#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert_eq!(config.module.rules.len(), 2);
		assert_eq!(config.module.rules[1].exclude.as_deref(), Some(r"\.module\.css$"));
	}

	#[test]
	fn test_parse_rule_missing_test() {
		let content = r#"
[[module.rules]]
use = ["style-loader"]
"#;
		let path = PathBuf::from("test.toml");
		let result = parse_config_str(content, &path);

		assert!(result.is_err());
		match result.unwrap_err() {
			LoadoutError::ConfigParseError { path, .. } => {
				assert_eq!(path, PathBuf::from("test.toml"));
			}
			other => panic!("Expected ConfigParseError, got {other:?}"),
		}
	}

	#[test]
	fn test_parse_rule_empty_use_chain() {
		let content = r#"
[[module.rules]]
test = '\.css$'
use = ["css-loader"]

[[module.rules]]
test = '\.svg$'
use = []
"#;
		let path = PathBuf::from("test.toml");
		let result = parse_config_str(content, &path);

		assert!(result.is_err());
		match result.unwrap_err() {
			LoadoutError::EmptyUseChain { index, test } => {
				assert_eq!(index, 2);
				assert_eq!(test, r"\.svg$");
			}
			other => panic!("Expected EmptyUseChain, got {other:?}"),
		}
	}

	#[test]
	fn test_parse_rule_missing_use_chain() {
		// A rule without `use` deserializes to an empty chain and is rejected
		// by validation, same as an explicit empty array.
		let content = r#"
[[module.rules]]
test = '\.css$'
"#;
		let path = PathBuf::from("test.toml");
		let result = parse_config_str(content, &path);

		assert!(matches!(
			result.unwrap_err(),
			LoadoutError::EmptyUseChain { index: 1, .. }
		));
	}

	#[test]
	fn test_parse_invalid_toml() {
		let content = "module = [[[";
		let path = PathBuf::from("broken.toml");
		let result = parse_config_str(content, &path);

		assert!(result.is_err());
		assert!(matches!(
			result.unwrap_err(),
			LoadoutError::ConfigParseError { .. }
		));
	}
}
