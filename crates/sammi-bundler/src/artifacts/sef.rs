//! The SAMMI Extension File format.
//!
//! A SEF is a flat text file of eight sections in a fixed order. Each section
//! is a bracketed header line, its content, and a blank line.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{external_section, over_section};
use crate::options::BuildOptions;
use crate::{GLOBAL_NAME, Result};

/// Matches a `<fn>(<exports>, { default: ...` export registration in the
/// bundle. A heuristic: it can match unrelated code of the same shape.
static COMMAND_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9_]+\([A-Za-z0-9_]+,\s*\{\s*default:")
        .expect("command pattern is a valid regular expression")
});

/// Whether `script` looks like it exports a default command callback.
pub fn registers_default_command(script: &str) -> bool {
    COMMAND_PATTERN.is_match(script)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SefSection {
    ExtensionName,
    ExtensionInfo,
    ExtensionVersion,
    InsertExternal,
    InsertCommand,
    InsertHook,
    InsertScript,
    InsertOver,
}

impl SefSection {
    /// Every section, in file order.
    pub const ALL: [SefSection; 8] = [
        SefSection::ExtensionName,
        SefSection::ExtensionInfo,
        SefSection::ExtensionVersion,
        SefSection::InsertExternal,
        SefSection::InsertCommand,
        SefSection::InsertHook,
        SefSection::InsertScript,
        SefSection::InsertOver,
    ];

    pub fn header(self) -> &'static str {
        match self {
            SefSection::ExtensionName => "[extension_name]",
            SefSection::ExtensionInfo => "[extension_info]",
            SefSection::ExtensionVersion => "[extension_version]",
            SefSection::InsertExternal => "[insert_external]",
            SefSection::InsertCommand => "[insert_command]",
            SefSection::InsertHook => "[insert_hook]",
            SefSection::InsertScript => "[insert_script]",
            SefSection::InsertOver => "[insert_over]",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Section contents of one SEF. Unset sections render empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SefDocument {
    contents: [String; 8],
}

impl SefDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, section: SefSection, content: impl Into<String>) -> &mut Self {
        self.contents[section.index()] = content.into();
        self
    }

    pub fn get(&self, section: SefSection) -> &str {
        &self.contents[section.index()]
    }

    /// Assemble the document for a build whose bundled script is `script`.
    pub fn for_build(options: &BuildOptions, script: &str) -> Result<Self> {
        let config = &options.config;
        let command = if registers_default_command(script) {
            format!("{GLOBAL_NAME}.{}.default()", config.id)
        } else {
            String::new()
        };

        let mut document = Self::new();
        document
            .set(SefSection::ExtensionName, config.name.as_str())
            .set(SefSection::ExtensionInfo, config.info.as_str())
            .set(SefSection::ExtensionVersion, config.version.as_str())
            .set(SefSection::InsertExternal, external_section(options)?)
            .set(SefSection::InsertCommand, command)
            .set(SefSection::InsertScript, script)
            .set(SefSection::InsertOver, over_section(options)?);
        Ok(document)
    }

    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(SefSection::ALL.len() * 3);
        for section in SefSection::ALL {
            lines.push(section.header());
            lines.push(self.get(section));
            lines.push("");
        }
        lines.join("\n")
    }
}
