use crate::config::types::UseEntry;
use std::fmt;

/// A single loader step: name plus optional opaque options.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderInvocation {
	/// Loader name as the engine's registry knows it.
	pub loader: String,

	/// Options value handed to the loader untouched. `None` means the loader
	/// runs with its defaults.
	pub options: Option<toml::Value>,
}

impl From<&UseEntry> for LoaderInvocation {
	fn from(entry: &UseEntry) -> Self {
		match entry {
			UseEntry::Name(name) => LoaderInvocation {
				loader: name.clone(),
				options: None,
			},
			UseEntry::Detailed { loader, options } => LoaderInvocation {
				loader: loader.clone(),
				options: options.clone(),
			},
		}
	}
}

impl fmt::Display for LoaderInvocation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.options {
			Some(options) => write!(f, "{} {}", self.loader, render_value(options)),
			None => write!(f, "{}", self.loader),
		}
	}
}

/// The normalized `use` list of a rule, in declared order.
///
/// Declared order is the canonical stored form. The engine convention runs
/// loaders right-to-left (last listed runs first); `execution_order` exposes
/// that view without touching the stored order. Porting a rule table to an
/// engine with a different convention silently changes which loader runs
/// first, so the convention is part of this type's contract.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderChain {
	steps: Vec<LoaderInvocation>,
}

impl LoaderChain {
	/// Normalize raw `use` entries into a chain.
	pub fn from_entries(entries: &[UseEntry]) -> Self {
		LoaderChain {
			steps: entries.iter().map(LoaderInvocation::from).collect(),
		}
	}

	/// Steps in declared order.
	pub fn steps(&self) -> &[LoaderInvocation] {
		&self.steps
	}

	/// Steps in engine execution order: the reverse of declared order.
	pub fn execution_order(&self) -> impl Iterator<Item = &LoaderInvocation> {
		self.steps.iter().rev()
	}

	pub fn len(&self) -> usize {
		self.steps.len()
	}

	pub fn is_empty(&self) -> bool {
		self.steps.is_empty()
	}
}

impl fmt::Display for LoaderChain {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let rendered: Vec<String> = self.steps.iter().map(|step| step.to_string()).collect();
		write!(f, "{}", rendered.join(" -> "))
	}
}

/// Render a TOML value the way it would appear inline in a config file.
fn render_value(value: &toml::Value) -> String {
	use toml::Value;

	match value {
		Value::String(s) => format!("\"{}\"", escape_string(s)),
		Value::Integer(i) => i.to_string(),
		Value::Float(f) => f.to_string(),
		Value::Boolean(b) => b.to_string(),
		Value::Datetime(d) => d.to_string(),
		Value::Array(items) => {
			let rendered: Vec<String> = items.iter().map(render_value).collect();
			format!("[{}]", rendered.join(", "))
		}
		Value::Table(table) => {
			if table.is_empty() {
				return "{}".to_string();
			}
			let rendered: Vec<String> = table
				.iter()
				.map(|(key, value)| format!("{key} = {}", render_value(value)))
				.collect();
			format!("{{ {} }}", rendered.join(", "))
		}
	}
}

/// Escape a string for a TOML basic string, so rendered options stay
/// re-parseable as config.
fn escape_string(s: &str) -> String {
	let mut out = String::with_capacity(s.len());
	for c in s.chars() {
		match c {
			'\\' => out.push_str("\\\\"),
			'"' => out.push_str("\\\""),
			'\n' => out.push_str("\\n"),
			'\r' => out.push_str("\\r"),
			'\t' => out.push_str("\\t"),
			c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04X}", c as u32)),
			c => out.push(c),
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	fn entries() -> Vec<UseEntry> {
		vec![
			UseEntry::Name("style-loader".to_string()),
			UseEntry::Detailed {
				loader: "css-loader".to_string(),
				options: Some("modules = true".parse().unwrap()),
			},
			UseEntry::Name("postcss-loader".to_string()),
		]
	}

	#[test]
	fn test_from_entries_normalizes_both_forms() {
		let chain = LoaderChain::from_entries(&entries());

		assert_eq!(chain.len(), 3);
		assert_eq!(chain.steps()[0].loader, "style-loader");
		assert!(chain.steps()[0].options.is_none());
		assert_eq!(chain.steps()[1].loader, "css-loader");
		assert!(chain.steps()[1].options.is_some());
	}

	#[test]
	fn test_execution_order_is_reverse_of_declared() {
		let chain = LoaderChain::from_entries(&entries());

		let declared: Vec<&str> = chain.steps().iter().map(|s| s.loader.as_str()).collect();
		let execution: Vec<&str> = chain.execution_order().map(|s| s.loader.as_str()).collect();

		assert_eq!(declared, ["style-loader", "css-loader", "postcss-loader"]);
		assert_eq!(execution, ["postcss-loader", "css-loader", "style-loader"]);
	}

	#[test]
	fn test_display_bare_chain() {
		let chain = LoaderChain::from_entries(&[
			UseEntry::Name("style-loader".to_string()),
			UseEntry::Name("css-loader".to_string()),
		]);

		assert_eq!(chain.to_string(), "style-loader -> css-loader");
	}

	#[test]
	fn test_display_options_inline() {
		let chain = LoaderChain::from_entries(&entries());

		assert_eq!(
			chain.to_string(),
			"style-loader -> css-loader { modules = true } -> postcss-loader"
		);
	}

	#[test]
	fn test_display_detailed_without_options() {
		let invocation = LoaderInvocation::from(&UseEntry::Detailed {
			loader: "postcss-loader".to_string(),
			options: None,
		});

		assert_eq!(invocation.to_string(), "postcss-loader");
	}

	#[test]
	fn test_render_value_escapes_strings() {
		let value: toml::Value = toml::Value::String("say \"hi\" \\ bye".to_string());

		assert_eq!(render_value(&value), r#""say \"hi\" \\ bye""#);
	}

	#[test]
	fn test_render_value_shapes() {
		let value: toml::Value = r#"
limit = 8
mode = "local"
strict = true
targets = ["ie11", "safari"]
"#
		.parse()
		.unwrap();

		assert_eq!(
			render_value(&value),
			r#"{ limit = 8, mode = "local", strict = true, targets = ["ie11", "safari"] }"#
		);
	}
}
