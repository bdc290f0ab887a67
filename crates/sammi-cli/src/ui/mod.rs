//! Terminal output for status lines.
//!
//! Everything here writes to stderr. Colors are decided once by
//! [`init_colors`] and can be turned off with `--no-color` or `NO_COLOR`.
//!
//! ```no_run
//! use sammi_cli::ui;
//! use std::time::Duration;
//!
//! ui::init_colors(false);
//! ui::built("extension.js", Duration::from_millis(120));
//! ui::error("Build failed");
//! ```

mod format;
mod messages;

use std::sync::atomic::{AtomicBool, Ordering};

pub use format::format_duration;
pub use messages::{
    build_failed, build_header, built, change, error, info, success, watching,
};

static COLORS: AtomicBool = AtomicBool::new(false);

/// Decide whether status lines are colored.
///
/// `NO_COLOR` disables colors, `FORCE_COLOR` enables them even when stderr
/// is not a terminal.
pub fn init_colors(no_color: bool) {
    COLORS.store(!no_color && should_use_color(), Ordering::Relaxed);
}

pub(crate) fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}

/// Whether stderr should get ANSI colors, for status lines and log output.
///
/// `NO_COLOR` wins over `FORCE_COLOR`; otherwise the terminal decides.
pub fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::Term::stderr().features().colors_supported()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn no_color_env_overrides_force_color() {
        unsafe {
            std::env::set_var("NO_COLOR", "1");
            std::env::set_var("FORCE_COLOR", "1");
        }
        assert!(!should_use_color());
        unsafe {
            std::env::remove_var("NO_COLOR");
            std::env::remove_var("FORCE_COLOR");
        }
    }

    #[test]
    #[serial]
    fn no_color_flag_wins() {
        unsafe { std::env::set_var("FORCE_COLOR", "1") };
        init_colors(true);
        assert!(!colors_enabled());
        unsafe { std::env::remove_var("FORCE_COLOR") };
    }

    #[test]
    #[serial]
    fn force_color_enables_colors() {
        unsafe {
            std::env::remove_var("NO_COLOR");
            std::env::set_var("FORCE_COLOR", "1");
        }
        init_colors(false);
        assert!(colors_enabled());
        unsafe { std::env::remove_var("FORCE_COLOR") };
        init_colors(true);
    }
}
