//! Check command implementation.
//!
//! Runs discovery, validation and resolution without bundling.

use std::path::Path;

use sammi_bundler::{BuildMode, BuildOptions, BundlerSettings};
use sammi_config::OutConfig;

use crate::cli::CheckArgs;
use crate::commands::utils;
use crate::error::Result;
use crate::ui;

/// Execute the check command.
///
/// # Validation Steps
///
/// 1. Find and validate `sammi.config.*`
/// 2. Resolve it, checking the entry, external and over files exist
/// 3. Merge the bundler passthrough (reports unsupported keys)
///
/// # Errors
///
/// Returns the first failing step's error.
pub async fn execute(args: CheckArgs) -> Result<()> {
    let root = utils::resolve_root(args.root.as_deref())?;
    ui::info(&format!("Checking extension in {}", root.display()));

    let loaded = utils::load_config(&root).await?;
    ui::success(&format!("{} is valid", display_name(&loaded.path)));

    let config = sammi_config::resolve(loaded.config, &OutConfig::default(), &root)?;
    let options = BuildOptions::new(config, &root, BuildMode::default());
    BundlerSettings::resolve(&options)?;

    for line in summary(&options) {
        ui::info(&line);
    }

    ui::success("All checks passed!");
    Ok(())
}

fn summary(options: &BuildOptions) -> Vec<String> {
    let config = &options.config;
    let optional = |path: Option<&std::path::PathBuf>| {
        path.map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    };

    vec![
        format!("id:       {}", config.id),
        format!("name:     {}", config.name),
        format!("version:  {}", config.version),
        format!("entry:    {}", config.entry.display()),
        format!("external: {}", optional(config.external.as_ref())),
        format!("over:     {}", optional(config.over.as_ref())),
        format!("js:       {}", options.js_path().display()),
        format!("sef:      {}", options.sef_path().display()),
    ]
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sammi_config::{ResolvedExtensionConfig, ResolvedOut};
    use std::path::PathBuf;

    #[test]
    fn summary_marks_unset_fragments() {
        let config = ResolvedExtensionConfig {
            id: "demo".into(),
            name: "Demo".into(),
            info: String::new(),
            version: "1.0.0".into(),
            entry: PathBuf::from("/ext/src/script.js"),
            external: Some(PathBuf::from("/ext/external.html")),
            over: None,
            out: ResolvedOut::default(),
            bundler_config: Default::default(),
        };
        let lines = summary(&BuildOptions::new(config, "/ext", BuildMode::Production));

        assert!(lines.contains(&"id:       demo".to_string()));
        assert!(lines.contains(&"external: /ext/external.html".to_string()));
        assert!(lines.contains(&"over:     (none)".to_string()));
        assert!(lines.contains(&"sef:      /ext/dist/extension.sef".to_string()));
    }

    #[test]
    fn display_name_is_the_file_name() {
        assert_eq!(display_name(Path::new("/ext/sammi.config.json")), "sammi.config.json");
    }
}
