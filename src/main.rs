use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use loadout_cli::config::{
	CONFIG_FILE_NAME, LoadedConfig, discover_configs, generate_init_template,
	load_explicit_config, merge_configs, user_config_path,
};
use loadout_cli::rules::{
	CompiledRule, LoaderChain, MatchOutcome, compile_rules, evaluate_rules, find_matching_rule,
};

#[derive(Parser)]
#[command(name = "loadout")]
#[command(
	author,
	version,
	about = "CLI tool for resolving bundler loader chains from declarative module rules"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Use exactly this config file instead of cascade discovery
	#[arg(short, long, value_name = "FILE", global = true)]
	config: Option<PathBuf>,

	/// Create a template .loadout.toml in the current directory
	#[arg(long)]
	init: bool,

	/// Overwrite existing .loadout.toml when using --init
	#[arg(long, requires = "init")]
	force: bool,
}

#[derive(Subcommand)]
enum Commands {
	/// Resolve the loader chain for one or more asset paths
	Resolve {
		/// Asset paths to resolve
		#[arg(required = true)]
		paths: Vec<String>,

		/// Print chains in engine execution order (last listed runs first)
		#[arg(long)]
		execution_order: bool,
	},
	/// Show how every rule evaluates against a single asset path
	Explain {
		/// Asset path to trace
		path: String,
	},
	/// Inspect and check the discovered configuration
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display discovered configuration with source annotations
	Show,
	/// Check all config files and rule patterns without resolving anything
	Validate,
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	if cli.init {
		return handle_init(cli.force);
	}

	if let Some(command) = cli.command {
		return match command {
			Commands::Resolve {
				paths,
				execution_order,
			} => handle_resolve(cli.config.as_deref(), &paths, execution_order),
			Commands::Explain { path } => handle_explain(cli.config.as_deref(), &path),
			Commands::Config { action } => match action {
				ConfigAction::Show => handle_config_show(cli.config.as_deref()),
				ConfigAction::Validate => handle_config_validate(cli.config.as_deref()),
			},
		};
	}

	// Unreachable in practice: arg_required_else_help covers the bare call
	Ok(ExitCode::SUCCESS)
}

/// Load the effective config set: the explicit file when `--config` is
/// given, the cascade from the current directory otherwise.
fn load_configs(config_override: Option<&Path>) -> Result<Vec<LoadedConfig>> {
	match config_override {
		Some(path) => {
			let loaded = load_explicit_config(path)
				.with_context(|| format!("Failed to load {}", path.display()))?;
			Ok(vec![loaded])
		}
		None => {
			let cwd = std::env::current_dir().context("Failed to get current directory")?;
			discover_configs(&cwd).context("Failed to discover config files")
		}
	}
}

/// Load configs and compile the merged rule table.
fn load_rules(config_override: Option<&Path>) -> Result<Vec<CompiledRule>> {
	let configs = load_configs(config_override)?;
	let merged = merge_configs(&configs);
	compile_rules(&merged).context("Failed to compile rules")
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
	}

	std::fs::write(&config_path, generate_init_template())
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {CONFIG_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}

fn handle_resolve(
	config_override: Option<&Path>,
	paths: &[String],
	execution_order: bool,
) -> Result<ExitCode> {
	let rules = load_rules(config_override)?;

	for path in paths {
		match find_matching_rule(&rules, Path::new(path)) {
			Some(rule) => {
				let chain = if execution_order {
					let steps: Vec<String> =
						rule.chain.execution_order().map(|s| s.to_string()).collect();
					steps.join(" -> ")
				} else {
					rule.chain.to_string()
				};
				println!("{path}: {chain}");
			}
			// The engine's default handling applies; not an error here
			None => println!("{path}: (no matching rule)"),
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_explain(config_override: Option<&Path>, path: &str) -> Result<ExitCode> {
	let rules = load_rules(config_override)?;

	if rules.is_empty() {
		println!("No rules configured.");
		return Ok(ExitCode::SUCCESS);
	}

	let outcomes = evaluate_rules(&rules, Path::new(path));

	println!("Evaluating {} rule(s) against {path}:\n", rules.len());

	let mut winner: Option<usize> = None;
	for (i, (rule, outcome)) in rules.iter().zip(&outcomes).enumerate() {
		println!(
			"  Rule {} ({}): {}",
			i + 1,
			rule.source.display(),
			outcome.as_str()
		);
		println!("    test: {}", rule.rule.test);
		if let Some(ref exclude) = rule.rule.exclude {
			println!("    exclude: {}", exclude);
		}
		println!("    use: {}", rule.chain);

		if winner.is_none() && *outcome == MatchOutcome::Matched {
			winner = Some(i);
		}
	}

	println!();
	match winner {
		Some(i) => println!("Selected: rule {} -> {}", i + 1, rules[i].chain),
		None => println!("Selected: none (engine default handling applies)"),
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_show(config_override: Option<&Path>) -> Result<ExitCode> {
	let configs = load_configs(config_override)?;

	if configs.is_empty() {
		println!("No configuration files found.");
		return Ok(ExitCode::SUCCESS);
	}

	println!("Configuration files (in cascade order):\n");

	for loaded in &configs {
		println!("# Source: {}", loaded.path.display());
		println!("# root: {}", loaded.config.root);
		println!("# no-external-lookup: {}", loaded.config.no_external_lookup);
		if let Some(ref env_var) = loaded.config.root_config_lookup_disable_env_var {
			println!("# root-config-lookup-disable-env-var: {}", env_var);
		}
		println!("# rules: {}", loaded.config.module.rules.len());
		println!();

		for (i, rule) in loaded.config.module.rules.iter().enumerate() {
			println!("  Rule {}:", i + 1);
			println!("    test: {}", rule.test);
			if let Some(ref exclude) = rule.exclude {
				println!("    exclude: {}", exclude);
			}
			println!("    use: {}", LoaderChain::from_entries(&rule.use_chain));
			println!();
		}
	}

	// User config only participates in discovery mode
	if config_override.is_none()
		&& let Ok(user_path) = user_config_path()
	{
		println!("User config path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate(config_override: Option<&Path>) -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	let result = match config_override {
		Some(path) => load_explicit_config(path).map(|loaded| vec![loaded]),
		None => discover_configs(&cwd),
	}
	.and_then(|configs| compile_rules(&merge_configs(&configs)).map(|_| configs));

	match result {
		Ok(configs) => {
			if configs.is_empty() {
				println!("No configuration files found.");
			} else {
				println!("All configuration files are valid:");
				for loaded in &configs {
					println!(
						"  {} ({} rules)",
						loaded.path.display(),
						loaded.config.module.rules.len()
					);
				}
			}
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {}", e);
			Ok(ExitCode::FAILURE)
		}
	}
}
