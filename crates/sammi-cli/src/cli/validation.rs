use sammi_bundler::BuildMode;

/// Parse `--mode`, case-insensitively.
///
/// # Errors
///
/// Returns `Invalid mode: X. It must be one of: DEV, PRODUCTION` for any
/// other value.
pub fn parse_mode(s: &str) -> Result<BuildMode, String> {
    s.parse()
}
