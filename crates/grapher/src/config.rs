use crate::error::{GrapherError, Result};
use code_graph::OffsetType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Which unit types need rune-to-byte conversion when the grapher did not
/// declare its offset unit.
///
/// Lookup order: exact unit type, then the longest matching prefix, then
/// `default_convert`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OffsetPolicy {
    /// Unit type -> needs conversion
    pub exact: BTreeMap<String, bool>,

    /// Unit type prefix -> needs conversion
    pub prefixes: BTreeMap<String, bool>,

    /// Answer for unit types matching no rule
    pub default_convert: bool,
}

impl Default for OffsetPolicy {
    /// Go, Dockerfile and Java* graphers already emit byte offsets.
    fn default() -> Self {
        Self {
            exact: BTreeMap::from([
                ("GoPackage".to_string(), false),
                ("Dockerfile".to_string(), false),
            ]),
            prefixes: BTreeMap::from([("Java".to_string(), false)]),
            default_convert: true,
        }
    }
}

impl OffsetPolicy {
    /// Policy with no rules that converts every undeclared unit type
    pub fn convert_all() -> Self {
        Self {
            exact: BTreeMap::new(),
            prefixes: BTreeMap::new(),
            default_convert: true,
        }
    }

    /// Builder: add or replace an exact rule
    #[must_use]
    pub fn with_exact(mut self, unit_type: impl Into<String>, convert: bool) -> Self {
        self.exact.insert(unit_type.into(), convert);
        self
    }

    /// Builder: add or replace a prefix rule
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>, convert: bool) -> Self {
        self.prefixes.insert(prefix.into(), convert);
        self
    }

    /// Parse a policy from TOML. Omitted fields keep their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let policy: Self = toml::from_str(raw)?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.exact.keys().any(String::is_empty) {
            return Err(GrapherError::invalid_config("exact unit type rules must not be empty"));
        }
        if self.prefixes.keys().any(String::is_empty) {
            return Err(GrapherError::invalid_config(
                "unit type prefixes must not be empty (use default_convert instead)",
            ));
        }
        Ok(())
    }

    /// Table lookup for a unit type whose grapher did not declare offsets
    pub fn converts_unit_type(&self, unit_type: &str) -> bool {
        if let Some(&convert) = self.exact.get(unit_type) {
            return convert;
        }
        self.prefixes
            .iter()
            .filter(|(prefix, _)| unit_type.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map_or(self.default_convert, |(_, &convert)| convert)
    }

    /// Whether offsets in grapher output must be converted
    pub fn needs_conversion(&self, offset_type: OffsetType, unit_type: &str) -> bool {
        match offset_type {
            OffsetType::Char => true,
            OffsetType::Byte => false,
            OffsetType::Unspecified => self.converts_unit_type(unit_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_policy_matches_known_byte_offset_graphers() {
        let policy = OffsetPolicy::default();
        assert!(policy.validate().is_ok());

        assert!(!policy.converts_unit_type("GoPackage"));
        assert!(!policy.converts_unit_type("Dockerfile"));
        assert!(!policy.converts_unit_type("JavaArtifact"));
        assert!(!policy.converts_unit_type("Java"));
        assert!(policy.converts_unit_type("Python"));
        // prefix match, not a language check
        assert!(!policy.converts_unit_type("JavaScript"));
        assert!(policy.converts_unit_type("GoPackages"));
        assert!(policy.converts_unit_type(""));
    }

    #[test]
    fn declared_offset_type_wins_over_table() {
        let policy = OffsetPolicy::default();
        assert!(policy.needs_conversion(OffsetType::Char, "GoPackage"));
        assert!(!policy.needs_conversion(OffsetType::Byte, "Python"));
        assert!(!policy.needs_conversion(OffsetType::Unspecified, "GoPackage"));
        assert!(policy.needs_conversion(OffsetType::Unspecified, "Python"));
    }

    #[test]
    fn exact_rule_beats_prefix_and_longest_prefix_wins() {
        let policy = OffsetPolicy::default()
            .with_exact("JavaScript", true)
            .with_prefix("JavaKotlin", true);

        assert!(policy.converts_unit_type("JavaScript"));
        assert!(policy.converts_unit_type("JavaKotlinModule"));
        assert!(!policy.converts_unit_type("JavaArtifact"));
    }

    #[test]
    fn loads_from_toml() {
        let policy = OffsetPolicy::from_toml_str(
            r#"
default_convert = false

[exact]
Python = true
"#,
        )
        .unwrap();

        assert_eq!(policy.exact.len(), 1);
        assert!(policy.converts_unit_type("Python"));
        assert!(!policy.converts_unit_type("RubyGem"));
        // omitted table keeps its default
        assert!(!policy.converts_unit_type("JavaArtifact"));
    }

    #[test]
    fn loads_from_toml_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("offsets.toml");
        std::fs::write(&path, "[prefixes]\nRuby = false\n").unwrap();

        let policy = OffsetPolicy::from_toml_file(&path).unwrap();
        assert!(!policy.converts_unit_type("RubyGem"));
        assert!(!policy.converts_unit_type("GoPackage"));
        assert!(policy.converts_unit_type("JavaArtifact"));

        assert!(matches!(
            OffsetPolicy::from_toml_file(temp.path().join("missing.toml")),
            Err(GrapherError::IoError(_))
        ));
    }

    #[test]
    fn rejects_empty_rules() {
        assert!(OffsetPolicy::convert_all().with_prefix("", false).validate().is_err());
        assert!(matches!(
            OffsetPolicy::from_toml_str("[exact]\n\"\" = true\n"),
            Err(GrapherError::InvalidConfig(_))
        ));
        assert!(matches!(
            OffsetPolicy::from_toml_str("default_convert = \"yes\""),
            Err(GrapherError::Toml(_))
        ));
    }
}
