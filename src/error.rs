use std::path::PathBuf;

/// Library-level structured errors for loadout.
///
/// Structured via `thiserror` so library consumers can match on individual
/// failure modes. The CLI binary wraps these with `anyhow` context chains.
#[derive(Debug, thiserror::Error)]
pub enum LoadoutError {
	#[error("Config file not found: {path}")]
	ConfigNotFound { path: PathBuf },

	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid pattern in rule: {pattern}")]
	InvalidPattern {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Rule {index} (test '{test}') has an empty use chain")]
	EmptyUseChain { index: usize, test: String },

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Result type alias using LoadoutError.
pub type Result<T> = std::result::Result<T, LoadoutError>;
