//! Init command implementation.
//!
//! Creates new SAMMI extension projects from the embedded templates.

use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::InitArgs;
use crate::commands::templates;
use crate::error::{CliError, Result, ResultExt};
use crate::ui;

/// Execute the init command.
///
/// # Process
///
/// 1. Determine the extension id (argument or current directory name)
/// 2. Pick the project directory and make sure it is safe to write into
/// 3. Render the template and write its files
/// 4. Show next steps
///
/// # Errors
///
/// Returns errors for:
/// - Names that are not valid extension ids
/// - A non-empty target directory without `--force`
/// - File write failures
pub async fn execute(args: InitArgs) -> Result<()> {
    let cwd = std::env::current_dir().map_err(|e| {
        CliError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to get current directory: {e}"),
        ))
    })?;

    let project = scaffold(&cwd, &args)?;
    print_next_steps(&cwd, &project);

    ui::success("Project created successfully!");
    Ok(())
}

/// Write the project described by `args` relative to `cwd` and return its
/// directory.
pub(crate) fn scaffold(cwd: &Path, args: &InitArgs) -> Result<PathBuf> {
    let (id, project_dir) = match args.name.as_deref() {
        Some(name) => (name.to_string(), cwd.join(name)),
        None => (dir_name(cwd)?, cwd.to_path_buf()),
    };
    validate_id(&id)?;

    ui::info(&format!("Creating extension: {id}"));
    ui::info(&format!("Using template: {}", args.template.name()));

    ensure_writable(&project_dir, args.force)?;

    for file in templates::render(&id, args.template)? {
        let target = project_dir.join(&file.path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).with_path(parent)?;
        }
        fs::write(&target, &file.contents).with_path(&target)?;
        ui::success(&format!("  Created {}", file.path.display()));
    }

    Ok(project_dir)
}

fn dir_name(cwd: &Path) -> Result<String> {
    cwd.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| CliError::InvalidArgument("Invalid directory name".to_string()))
}

fn validate_id(id: &str) -> Result<()> {
    if sammi_config::is_valid_id(id) {
        return Ok(());
    }
    Err(CliError::InvalidArgument(format!(
        "'{id}' is not a valid extension id. Use letters, numbers, hyphens and underscores only"
    )))
}

fn ensure_writable(dir: &Path, force: bool) -> Result<()> {
    if !dir.exists() {
        return fs::create_dir_all(dir).with_path(dir);
    }
    if !dir.is_dir() {
        return Err(CliError::InvalidArgument(format!(
            "'{}' exists and is not a directory",
            dir.display()
        )));
    }

    let has_entries = fs::read_dir(dir).with_path(dir)?.next().is_some();
    if has_entries && !force {
        return Err(CliError::InvalidArgument(format!(
            "Directory '{}' is not empty. Use --force to write into it anyway",
            dir.display()
        )));
    }
    Ok(())
}

fn print_next_steps(cwd: &Path, project: &Path) {
    eprintln!();
    ui::info("Next steps:");
    eprintln!();
    if let Ok(relative) = project.strip_prefix(cwd) {
        if !relative.as_os_str().is_empty() {
            eprintln!("  cd {}", relative.display());
        }
    }
    eprintln!("  npm install");
    eprintln!("  npm run dev");
    eprintln!();
}
