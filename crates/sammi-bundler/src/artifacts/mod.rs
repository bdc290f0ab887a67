//! Packaging of a bundled script into the SEF and the preview page.
//!
//! Both artifacts are derived from the script the bundling step already wrote
//! to disk; nothing here runs the bundler.

mod preview;
mod sef;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub use preview::{PREVIEW_BLUEPRINT, render_preview, preview_blueprint};
pub use sef::{SefDocument, SefSection, registers_default_command};

use crate::options::BuildOptions;
use crate::{Error, Result};

/// File name of the preview page, inside the output directory.
pub const PREVIEW_FILE: &str = "preview.html";

/// The two packaged artifacts of one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub sef: String,
    pub preview: String,
}

impl Artifacts {
    /// Write both artifacts into the output directory.
    pub fn write(&self, options: &BuildOptions) -> Result<()> {
        write_artifact(&options.sef_path(), &self.sef)?;
        write_artifact(&options.preview_path(), &self.preview)
    }
}

/// Generate the SEF and the preview page for `options`.
///
/// # Errors
///
/// Returns `Error::ArtifactMissing` if the bundled script is not on disk.
pub fn generate(options: &BuildOptions) -> Result<Artifacts> {
    Ok(Artifacts {
        sef: generate_sef(options)?,
        preview: generate_preview(options)?,
    })
}

pub fn generate_sef(options: &BuildOptions) -> Result<String> {
    let script = read_script(options)?;
    Ok(SefDocument::for_build(options, &script)?.render())
}

pub fn generate_preview(options: &BuildOptions) -> Result<String> {
    let script = read_script(options)?;
    let external = external_section(options)?;
    Ok(render_preview(&preview_blueprint()?, &external, &script))
}

/// Write one artifact, creating the output directory when needed.
pub fn write_artifact(path: &Path, contents: &str) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|err| {
            Error::io(
                format!("Failed to create output directory '{}'", dir.display()),
                err,
            )
        })?;
    }
    fs::write(path, contents)
        .map_err(|err| Error::io(format!("Failed to write '{}'", path.display()), err))
}

fn read_script(options: &BuildOptions) -> Result<String> {
    let path = options.js_path();
    fs::read_to_string(&path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => Error::ArtifactMissing(path.clone()),
        _ => Error::io(format!("Failed to read '{}'", path.display()), err),
    })
}

/// Read a configured fragment. A fragment that disappeared since resolution
/// reads as absent.
fn read_fragment(path: Option<&PathBuf>) -> Result<Option<String>> {
    let Some(path) = path else {
        return Ok(None);
    };
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(Error::io(format!("Failed to read '{}'", path.display()), err)),
    }
}

/// The wrapped external fragment, or an empty string.
pub fn external_section(options: &BuildOptions) -> Result<String> {
    Ok(match read_fragment(options.config.external.as_ref())? {
        Some(content) if !content.is_empty() => {
            format!("<div id=\"{}-external\">{content}</div>", options.config.id)
        }
        _ => String::new(),
    })
}

/// The over fragment as it goes into the SEF, or an empty string.
///
/// Production builds re-serialize the fragment compactly. An empty object
/// yields an empty section.
pub fn over_section(options: &BuildOptions) -> Result<String> {
    let Some(path) = options.config.over.as_ref() else {
        return Ok(String::new());
    };
    let Some(mut content) = read_fragment(Some(path))? else {
        return Ok(String::new());
    };

    if options.mode.is_production() && !content.is_empty() {
        let over_invalid = |source| Error::OverInvalid {
            path: path.clone(),
            source,
        };
        let mut value: serde_json::Value = serde_json::from_str(&content).map_err(over_invalid)?;
        integral_floats_to_integers(&mut value);
        content = serde_json::to_string(&value).map_err(over_invalid)?;
    }

    if content == "{}" {
        content.clear();
    }
    Ok(content)
}

/// Write `1.0` and `1e2` as `1` and `100`, as JavaScript serializes them.
fn integral_floats_to_integers(value: &mut serde_json::Value) {
    use serde_json::Value;

    match value {
        Value::Number(number) if number.is_f64() => {
            let Some(float) = number.as_f64() else {
                return;
            };
            if float.fract() == 0.0 && float.abs() < 9_007_199_254_740_992.0 {
                *value = Value::from(float as i64);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(integral_floats_to_integers),
        Value::Object(map) => map.values_mut().for_each(integral_floats_to_integers),
        _ => {}
    }
}
