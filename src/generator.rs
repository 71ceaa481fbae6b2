//! YAML test case generation from a template and a context file.
//!
//! The context YAML supplies the variables; the template (Jinja syntax,
//! rendered with `MiniJinja`) produces the test case YAML. The rendered text is
//! written verbatim, after reading its `id` to name the file and pick the
//! category folder.

use crate::category::PrefixMap;
use crate::config::Config;
use crate::diagnostics::{SourceName, structure_error, syntax_error};
use anyhow::{Context, Result, anyhow, bail};
use minijinja::{Environment, UndefinedBehavior};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct RenderedId {
    id: String,
}

fn load_context(context_path: &Path) -> Result<serde_json::Value> {
    let text = fs::read_to_string(context_path)
        .with_context(|| format!("read context file {}", context_path.display()))?;
    let name = SourceName::new(context_path.display().to_string());
    let value: serde_json::Value =
        serde_saphyr::from_str(&text).map_err(|e| anyhow!(syntax_error(&e, &text, &name)))?;
    match value {
        serde_json::Value::Object(_) => Ok(value),
        serde_json::Value::Null => Ok(serde_json::Value::Object(serde_json::Map::new())),
        _ => bail!("context file {name} must be a mapping of template variables"),
    }
}

/// Render `template_path` with the variables in `context_path`.
///
/// Undefined variables are errors rather than empty strings.
///
/// # Errors
///
/// Returns an error when either file cannot be read, the context is not a
/// YAML mapping, or the template fails to render.
pub fn render_template(template_path: &Path, context_path: &Path) -> Result<String> {
    let template = fs::read_to_string(template_path)
        .with_context(|| format!("read template {}", template_path.display()))?;
    let context = load_context(context_path)?;

    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);
    let name = template_path.display().to_string();
    env.render_named_str(&name, &template, context)
        .with_context(|| format!("render template {name} with {}", context_path.display()))
}

/// Name of the generated file: `{id}-{context stem}.yaml`.
///
/// # Errors
///
/// Returns an error when the rendered text is not YAML with a string `id`,
/// or when the context path has no UTF-8 stem.
pub fn output_name(rendered: &str, context_path: &Path) -> Result<String> {
    let name = SourceName::new("rendered test case");
    serde_saphyr::from_str::<serde_json::Value>(rendered)
        .map_err(|e| anyhow!(syntax_error(&e, rendered, &name)))?;
    let doc: RenderedId = serde_saphyr::from_str(rendered)
        .map_err(|e| anyhow!(structure_error(&e, rendered, &name)))?;
    let stem = context_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .with_context(|| format!("{} has no usable file name", context_path.display()))?;
    info!("Got test data for {}", doc.id);
    Ok(format!("{}-{stem}.yaml", doc.id))
}

/// Generate one test case from `context_path` and return the written path.
///
/// The file lands in `output_path/<category>/`, where the category comes
/// from the ID prefix; missing folders are created.
///
/// # Errors
///
/// Returns an error when rendering fails, the ID prefix is not in
/// `prefixes`, or the file cannot be written.
pub fn generate(context_path: &Path, config: &Config, prefixes: &PrefixMap) -> Result<PathBuf> {
    let rendered = render_template(&config.template(), context_path)?;
    debug!("{rendered}");

    let out_name = output_name(&rendered, context_path)?;
    let category = prefixes.category_for_name(&out_name, &config.id_sep)?;
    let out_dir = config.output_path.join(category.folder());
    debug!(%category, dir = %out_dir.display(), "target dir");
    fs::create_dir_all(&out_dir).with_context(|| format!("create {}", out_dir.display()))?;

    let out_file = out_dir.join(&out_name);
    fs::write(&out_file, rendered).with_context(|| format!("write {}", out_file.display()))?;
    info!("New testcase written to {}", out_file.display());
    Ok(out_file)
}
