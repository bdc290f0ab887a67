//! Project templates for the init command.
//!
//! Files under `templates/common/` go into every project; files under
//! `templates/<template>/` only into projects of that template. A leading
//! `_` in a file name stands for `.` so dotfiles survive packaging.

use std::borrow::Cow;
use std::path::PathBuf;

use rust_embed::RustEmbed;
use serde_json::json;

use crate::cli::Template;
use crate::error::{CliError, Result};

const COMMON_DIR: &str = "common";
const INITIAL_VERSION: &str = "1.0.0";

/// Name of the generated config.
pub(crate) const CONFIG_FILE: &str = "sammi.config.json";
/// Name of the generated JSON Schema, referenced by the config's `$schema`.
pub(crate) const SCHEMA_FILE: &str = "sammi.config.schema.json";

#[derive(RustEmbed)]
#[folder = "templates/"]
struct TemplateAssets;

/// One file of a rendered project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TemplateFile {
    /// Path relative to the project directory.
    pub path: PathBuf,
    pub contents: String,
}

/// Render every file of `template` for an extension with the given id.
///
/// Files are sorted by path.
pub(crate) fn render(id: &str, template: Template) -> Result<Vec<TemplateFile>> {
    let mut files = Vec::new();

    for prefix in [COMMON_DIR, template.name()] {
        for asset in assets_under(prefix) {
            let Some(file) = TemplateAssets::get(&asset) else {
                continue;
            };
            let raw = String::from_utf8(file.data.into_owned()).map_err(|_| {
                CliError::Custom(format!("Template file '{asset}' is not valid UTF-8"))
            })?;
            let relative = &asset[prefix.len() + 1..];

            files.push(TemplateFile {
                path: output_path(relative),
                contents: substitute(&raw, id),
            });
        }
    }

    files.push(TemplateFile {
        path: PathBuf::from(CONFIG_FILE),
        contents: config_json(id, template)?,
    });
    files.push(TemplateFile {
        path: PathBuf::from(SCHEMA_FILE),
        contents: pretty(&sammi_config::json_schema())?,
    });

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

fn assets_under(prefix: &str) -> Vec<String> {
    let dir = format!("{prefix}/");
    let mut names: Vec<String> = TemplateAssets::iter()
        .filter(|name| name.starts_with(&dir))
        .map(Cow::into_owned)
        .collect();
    names.sort();
    names
}

fn output_path(relative: &str) -> PathBuf {
    relative
        .split('/')
        .map(|part| match part.strip_prefix('_') {
            Some(rest) => Cow::Owned(format!(".{rest}")),
            None => Cow::Borrowed(part),
        })
        .fold(PathBuf::new(), |path, part| path.join(part.as_ref()))
}

fn substitute(raw: &str, id: &str) -> String {
    raw.replace("{{id}}", id)
        .replace("{{name}}", id)
        .replace("{{version}}", INITIAL_VERSION)
}

fn config_json(id: &str, template: Template) -> Result<String> {
    let config = json!({
        "$schema": format!("./{SCHEMA_FILE}"),
        "id": id,
        "name": id,
        "version": INITIAL_VERSION,
        "entry": format!("src/script.{}", template.script_extension()),
        "external": "external.html",
        "over": "over.json",
    });
    pretty(&config)
}

fn pretty(value: &serde_json::Value) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map(|text| text + "\n")
        .map_err(|err| CliError::Custom(format!("Failed to serialize {CONFIG_FILE}: {err}")))
}
