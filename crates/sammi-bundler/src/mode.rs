use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Build mode. Production minifies the bundle and normalizes the over file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BuildMode {
    Dev,
    #[default]
    Production,
}

impl BuildMode {
    pub const ALL: [BuildMode; 2] = [BuildMode::Dev, BuildMode::Production];

    pub fn is_production(self) -> bool {
        self == BuildMode::Production
    }

    /// Upper-case name, as accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            BuildMode::Dev => "DEV",
            BuildMode::Production => "PRODUCTION",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BuildMode::Dev => "dev",
            BuildMode::Production => "production",
        })
    }
}

impl FromStr for BuildMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuildMode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<&str> = BuildMode::ALL.iter().map(|m| m.name()).collect();
                format!("Invalid mode: {s}. It must be one of: {}", names.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("dev".parse::<BuildMode>(), Ok(BuildMode::Dev));
        assert_eq!("PRODUCTION".parse::<BuildMode>(), Ok(BuildMode::Production));
        assert_eq!("Production".parse::<BuildMode>(), Ok(BuildMode::Production));
    }

    #[test]
    fn rejects_unknown_modes() {
        assert_eq!(
            "staging".parse::<BuildMode>().unwrap_err(),
            "Invalid mode: staging. It must be one of: DEV, PRODUCTION"
        );
    }

    #[test]
    fn displays_lowercase() {
        assert_eq!(BuildMode::Dev.to_string(), "dev");
        assert!(BuildMode::default().is_production());
    }
}
