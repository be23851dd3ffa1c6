//! Page templates.

use anyhow::{Context, Result};
use handlebars::Handlebars;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;

/// Name of the home page template (`homepage.hbs`).
pub const HOMEPAGE: &str = "homepage";

/// Registers every `*.hbs` file in `dir` under its file stem.
pub fn load_templates(dir: &Path) -> Result<Handlebars<'static>> {
    let mut handlebars = Handlebars::new();

    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read template directory {}", dir.display()))?;

    for entry in entries {
        let file_path = entry?.path();

        if file_path.is_file() && file_path.extension() == Some(OsStr::new("hbs")) {
            if let Some(name) = file_path.file_stem().and_then(|stem| stem.to_str()) {
                handlebars
                    .register_template_file(name, &file_path)
                    .with_context(|| format!("invalid template {}", file_path.display()))?;
            }
        }
    }

    if !handlebars.has_template(HOMEPAGE) {
        anyhow::bail!("template directory {} has no {HOMEPAGE}.hbs", dir.display());
    }

    Ok(handlebars)
}
