//! Pluggable descriptor validation.
//!
//! Separates structural checks (for in-memory descriptors) from the
//! `fileExists` rule that needs a filesystem. Both walk the raw JSON value and
//! collect every violation rather than stopping at the first one.

use std::fmt;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::schema::ExtensionConfig;

static ID_PATTERN: Lazy<Regex> = Lazy::new(|| pattern(r"^[a-zA-Z0-9\-_]+$"));
static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| pattern(r"^[a-zA-Z0-9 \-_]+$"));
static VERSION_PATTERN: Lazy<Regex> = Lazy::new(|| pattern(r"^[0-9]+(?:\.[0-9]+)*(?:-.*)?$"));
static OUT_DIR_PATTERN: Lazy<Regex> = Lazy::new(|| pattern(r#"^[^<>:"|?*]+$"#));
static OUT_JS_PATTERN: Lazy<Regex> = Lazy::new(|| pattern(r"^[A-Za-z0-9_\-. ]+\.js$"));
static OUT_SEF_PATTERN: Lazy<Regex> = Lazy::new(|| pattern(r"^[A-Za-z0-9_\-. ]+\.sef$"));

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("validation patterns are valid regular expressions")
}

const REQUIRED: [&str; 4] = ["id", "name", "version", "entry"];
const FILE_FIELDS: [&str; 3] = ["entry", "external", "over"];
const PASSTHROUGH_KEYS: [&str; 2] = ["bundlerConfig", "tsdownConfig"];

/// One violated constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// JSON pointer to the offending field, e.g. `/out/js`.
    pub path: String,
    pub message: String,
}

impl FieldViolation {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "{path} {}", self.message)
    }
}

/// All violations found in one descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Paths of the offending fields, in the order they were found.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.violations.iter().map(|v| v.path.as_str())
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.paths().any(|p| p == path)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self
            .violations
            .iter()
            .map(|violation| format!("    - {violation}"))
            .collect();
        f.write_str(&lines.join("\n"))
    }
}

impl std::error::Error for ValidationError {}

/// Trait for pluggable descriptor validation strategies
pub trait ConfigValidator {
    /// Collect every violation in `raw`.
    fn violations(&self, raw: &Value) -> Vec<FieldViolation>;

    /// Validate `raw` and return it typed.
    fn validate(&self, raw: &Value) -> Result<ExtensionConfig, ValidationError> {
        let violations = self.violations(raw);
        if !violations.is_empty() {
            return Err(ValidationError { violations });
        }

        serde_json::from_value(raw.clone()).map_err(|err| ValidationError {
            violations: vec![FieldViolation::new("", err.to_string())],
        })
    }
}

/// Structural validation (no filesystem checks)
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn violations(&self, raw: &Value) -> Vec<FieldViolation> {
        let mut found = Vec::new();
        let Some(object) = raw.as_object() else {
            found.push(FieldViolation::new("", "must be object"));
            return found;
        };

        for field in REQUIRED {
            if !object.contains_key(field) {
                found.push(FieldViolation::new(
                    format!("/{field}"),
                    format!("must have required property '{field}'"),
                ));
            }
        }

        let rules = [
            ("id", StringRule::new(1, Some(&ID_PATTERN))),
            ("name", StringRule::new(1, Some(&NAME_PATTERN))),
            ("info", StringRule::new(0, None).nullable()),
            ("version", StringRule::new(0, Some(&VERSION_PATTERN))),
            ("entry", StringRule::new(1, None)),
            ("external", StringRule::new(1, None).nullable()),
            ("over", StringRule::new(1, None).nullable()),
        ];
        for (field, rule) in &rules {
            if let Some(value) = object.get(*field) {
                rule.check(&format!("/{field}"), value, &mut found);
            }
        }

        if let Some(out) = object.get("out") {
            check_out(out, &mut found);
        }

        for key in PASSTHROUGH_KEYS {
            if let Some(value) = object.get(key) {
                if !(value.is_object() || value.is_null()) {
                    found.push(FieldViolation::new(format!("/{key}"), "must be object"));
                }
            }
        }

        found
    }
}

/// Filesystem validator (for CLI use)
///
/// Runs [`SchemaValidator`] and then requires `entry`, `external` and `over`
/// to exist relative to `base` when they are non-empty.
pub struct FsValidator {
    base: PathBuf,
}

impl FsValidator {
    pub fn new(base: impl AsRef<Path>) -> Self {
        Self {
            base: base.as_ref().to_path_buf(),
        }
    }

    /// Resolve references against the process's working directory.
    pub fn current_dir() -> Self {
        Self::new(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }
}

impl ConfigValidator for FsValidator {
    fn violations(&self, raw: &Value) -> Vec<FieldViolation> {
        let mut found = SchemaValidator.violations(raw);
        let Some(object) = raw.as_object() else {
            return found;
        };

        for field in FILE_FIELDS {
            let Some(reference) = object.get(field).and_then(Value::as_str) else {
                continue;
            };
            if reference.is_empty() {
                continue;
            }
            if !self.base.join(reference).exists() {
                found.push(FieldViolation::new(
                    format!("/{field}"),
                    format!("must reference an existing file (\"{reference}\")"),
                ));
            }
        }

        found
    }
}

/// Validate against the process's working directory.
pub fn validate(raw: &Value) -> Result<ExtensionConfig, ValidationError> {
    FsValidator::current_dir().validate(raw)
}

/// Validate structure only.
pub fn validate_schema(raw: &Value) -> Result<ExtensionConfig, ValidationError> {
    SchemaValidator.validate(raw)
}

/// Whether `id` is usable as an extension id.
pub fn is_valid_id(id: &str) -> bool {
    ID_PATTERN.is_match(id)
}

struct StringRule {
    min_length: usize,
    pattern: Option<&'static Lazy<Regex>>,
    nullable: bool,
}

impl StringRule {
    fn new(min_length: usize, pattern: Option<&'static Lazy<Regex>>) -> Self {
        Self {
            min_length,
            pattern,
            nullable: false,
        }
    }

    fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    fn check(&self, path: &str, value: &Value, found: &mut Vec<FieldViolation>) {
        let text = match value {
            Value::String(text) => text,
            Value::Null if self.nullable => return,
            _ => {
                let expected = if self.nullable { "string,null" } else { "string" };
                found.push(FieldViolation::new(path, format!("must be {expected}")));
                return;
            }
        };

        if text.chars().count() < self.min_length {
            found.push(FieldViolation::new(
                path,
                format!("must NOT have fewer than {} characters", self.min_length),
            ));
        }

        if let Some(pattern) = self.pattern {
            if !pattern.is_match(text) {
                found.push(FieldViolation::new(
                    path,
                    format!("must match pattern \"{}\"", pattern.as_str()),
                ));
            }
        }
    }
}

fn check_out(out: &Value, found: &mut Vec<FieldViolation>) {
    let object: &Map<String, Value> = match out {
        Value::Object(object) => object,
        Value::Null => return,
        _ => {
            found.push(FieldViolation::new("/out", "must be object,null"));
            return;
        }
    };

    for key in object.keys() {
        if !matches!(key.as_str(), "dir" | "js" | "sef") {
            found.push(FieldViolation::new(
                format!("/out/{key}"),
                "must NOT have additional properties",
            ));
        }
    }

    let rules = [
        ("dir", StringRule::new(1, Some(&OUT_DIR_PATTERN)).nullable()),
        ("js", StringRule::new(4, Some(&OUT_JS_PATTERN)).nullable()),
        ("sef", StringRule::new(5, Some(&OUT_SEF_PATTERN)).nullable()),
    ];
    for (field, rule) in &rules {
        if let Some(value) = object.get(*field) {
            rule.check(&format!("/out/{field}"), value, found);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> Value {
        json!({
            "id": "demo",
            "name": "Demo",
            "version": "1.0.0",
            "entry": "src/main.ts"
        })
    }

    #[test]
    fn schema_accepts_minimal_descriptor() {
        let config = SchemaValidator.validate(&base()).unwrap();
        assert_eq!(config.id, "demo");
        assert_eq!(config.info, None);
        assert_eq!(config.out, None);
    }

    #[test]
    fn schema_reports_every_missing_field() {
        let err = SchemaValidator.validate(&json!({})).unwrap_err();
        for field in ["/id", "/name", "/version", "/entry"] {
            assert!(err.contains_path(field), "missing {field}");
        }
        assert_eq!(err.violations().len(), 4);
    }

    #[test]
    fn schema_rejects_non_object() {
        let err = SchemaValidator.validate(&json!([1, 2])).unwrap_err();
        assert_eq!(err.to_string(), "    - / must be object");
    }

    #[test]
    fn id_and_name_patterns() {
        let mut raw = base();
        raw["id"] = json!("has space");
        raw["name"] = json!("Bad/Name");
        let err = SchemaValidator.validate(&raw).unwrap_err();
        assert!(err.contains_path("/id"));
        assert!(err.contains_path("/name"));

        let mut raw = base();
        raw["id"] = json!("my_ext-2");
        raw["name"] = json!("My Ext - 2_b");
        assert!(SchemaValidator.validate(&raw).is_ok());
    }

    #[test]
    fn version_accepts_prerelease_suffix() {
        for version in ["1", "1.0", "1.2.3", "1.2.3-beta.1"] {
            let mut raw = base();
            raw["version"] = json!(version);
            assert!(SchemaValidator.validate(&raw).is_ok(), "{version}");
        }
        for version in ["", "v1.0.0", "1..0", "1.0."] {
            let mut raw = base();
            raw["version"] = json!(version);
            assert!(SchemaValidator.validate(&raw).is_err(), "{version}");
        }
    }

    #[test]
    fn optional_fields_accept_null() {
        let mut raw = base();
        raw["info"] = Value::Null;
        raw["external"] = Value::Null;
        raw["over"] = Value::Null;
        raw["out"] = Value::Null;
        raw["bundlerConfig"] = Value::Null;
        assert!(SchemaValidator.validate(&raw).is_ok());
    }

    #[test]
    fn out_rules() {
        let mut raw = base();
        raw["out"] = json!({ "dir": "build", "js": "main.js", "sef": "main.sef" });
        assert!(SchemaValidator.validate(&raw).is_ok());

        raw["out"] = json!({ "dir": "a|b", "js": "main.mjs", "sef": ".sef", "html": "x" });
        let err = SchemaValidator.validate(&raw).unwrap_err();
        assert!(err.contains_path("/out/dir"));
        assert!(err.contains_path("/out/js"));
        assert!(err.contains_path("/out/sef"));
        assert!(err.contains_path("/out/html"));
    }

    #[test]
    fn unknown_top_level_keys_are_allowed() {
        let mut raw = base();
        raw["$schema"] = json!("./sammi.config.schema.json");
        assert!(SchemaValidator.validate(&raw).is_ok());
    }

    #[test]
    fn wrong_types_are_reported() {
        let mut raw = base();
        raw["id"] = json!(5);
        raw["bundlerConfig"] = json!("minify");
        let err = SchemaValidator.validate(&raw).unwrap_err();
        assert_eq!(
            err.violations()[0],
            FieldViolation::new("/id", "must be string")
        );
        assert!(err.contains_path("/bundlerConfig"));
    }

    #[test]
    fn violation_lines_render_like_a_list() {
        let mut raw = base();
        raw.as_object_mut().unwrap().remove("entry");
        let err = SchemaValidator.validate(&raw).unwrap_err();
        assert_eq!(
            err.to_string(),
            "    - /entry must have required property 'entry'"
        );
    }
}
