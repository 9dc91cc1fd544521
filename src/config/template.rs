/// Starter config written by `loadout --init`.
///
/// Reproduces the stock stylesheet setup: scoped `*.module.css` /
/// `*.module.pcss` files get the css loader with `modules = true`, every
/// other stylesheet gets the plain chain. The `(?i)` flags keep the
/// extension match case-insensitive.
pub fn generate_init_template() -> &'static str {
	r#"# Created by `loadout --init`.
#
# Rules are evaluated top to bottom. The first rule whose `test` matches the
# asset path (and whose `exclude`, if present, does not) selects the loader
# chain. Loaders are listed in declared order; the engine runs them
# right-to-left, so the last listed loader runs first.
root = true

# Scoped stylesheets: the css loader rewrites class names per module.
[[module.rules]]
test = '(?i)\.module\.p?css$'
use = [
    "style-loader",
    { loader = "css-loader", options = { modules = true } },
    "postcss-loader",
]

# Plain stylesheets, explicitly excluding the scoped variant above.
[[module.rules]]
test = '(?i)\.p?css$'
exclude = '(?i)\.module\.p?css$'
use = ["style-loader", "css-loader", "postcss-loader"]
"#
}
