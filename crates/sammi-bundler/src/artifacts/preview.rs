use rust_embed::RustEmbed;

use crate::{Error, Result};

#[derive(RustEmbed)]
#[folder = "assets/"]
struct PreviewAssets;

/// Name of the embedded preview page template.
pub const PREVIEW_BLUEPRINT: &str = "preview.blueprint.html";

const EXTERNAL_PLACEHOLDER: &str = "{{EXTERNAL}}";
const SCRIPT_PLACEHOLDER: &str = "{{SCRIPT}}";

pub fn preview_blueprint() -> Result<String> {
    PreviewAssets::get(PREVIEW_BLUEPRINT)
        .map(|asset| String::from_utf8_lossy(asset.data.as_ref()).into_owned())
        .ok_or(Error::TemplateMissing(PREVIEW_BLUEPRINT))
}

/// Fill every placeholder of `blueprint`. Inserted text is taken literally.
pub fn render_preview(blueprint: &str, external: &str, script: &str) -> String {
    blueprint
        .replace(EXTERNAL_PLACEHOLDER, external)
        .replace(SCRIPT_PLACEHOLDER, script)
}
