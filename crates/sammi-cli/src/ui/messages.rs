//! Status lines.

use std::path::Path;
use std::time::Duration;

use owo_colors::{OwoColorize, Style};

use super::{colors_enabled, format_duration};

const BUILD_PREFIX: &str = "[sammi-next]";

fn paint(text: &str, style: Style) -> String {
    if colors_enabled() {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

fn prefix() -> String {
    paint(BUILD_PREFIX, Style::new().blue())
}

pub fn success(message: &str) {
    eprintln!("{} {}", paint("✓", Style::new().green().bold()), message);
}

pub fn info(message: &str) {
    eprintln!("{} {}", paint("ℹ", Style::new().blue().bold()), message);
}

pub fn error(message: &str) {
    eprintln!(
        "{} {}",
        paint("✗", Style::new().red().bold()),
        paint(message, Style::new().red())
    );
}

/// `SAMMI Next v0.3.0 building "Demo" extension in dev mode...`
pub fn build_header(version: &str, name: &str, mode: impl std::fmt::Display) {
    eprintln!(
        "{} {}",
        paint(&format!("SAMMI Next v{version}"), Style::new().cyan()),
        paint(
            &format!("building \"{name}\" extension in {mode} mode..."),
            Style::new().green()
        )
    );
}

/// `✔ [sammi-next] built extension.sef in 3ms`
pub fn built(file: &str, elapsed: Duration) {
    eprintln!(
        "{} {} built {} in {}",
        paint("✔", Style::new().green()),
        prefix(),
        file,
        format_duration(elapsed)
    );
}

pub fn build_failed(elapsed: Duration) {
    eprintln!(
        "{} {} Build failed in {}",
        paint("✗", Style::new().red()),
        prefix(),
        format_duration(elapsed)
    );
}

pub fn watching() {
    eprintln!("{} {}", prefix(), paint("watching for file changes...", Style::new().cyan()));
}

/// One line per file-system event, e.g. `change: src/script.ts`.
pub fn change(kind: &str, path: &Path) {
    eprintln!("{}", paint(&format!("{kind}: {}", path.display()), Style::new().cyan()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_lines_do_not_panic() {
        success("Success message");
        info("Info message");
        error("Error message");
        build_header("0.0.0", "Demo", "dev");
        built("extension.js", Duration::from_millis(12));
        build_failed(Duration::from_millis(12));
        watching();
        change("change", Path::new("src/script.ts"));
    }

    #[test]
    #[serial_test::serial]
    fn paint_is_plain_without_colors() {
        super::super::init_colors(true);
        assert_eq!(paint("x", Style::new().red()), "x");
    }
}
