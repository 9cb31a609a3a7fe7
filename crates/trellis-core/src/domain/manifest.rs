//! The persisted project document: a generated project's `Cargo.toml`.
//!
//! Trellis keeps its own bookkeeping under `[package.metadata.trellis]`:
//!
//! ```toml
//! [package.metadata.trellis]
//! version = "1.0.0"
//! package = "my_crate"
//! extensions = ["github-actions"]
//! github_actions_toolchain = "stable"
//! ```
//!
//! Edits go through `toml_edit` so that comments and formatting the user
//! added to the manifest survive an update.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value as Json;
use toml_edit::{ArrayOfTables, DocumentMut, InlineTable, Item, Table, TableLike, Value, value};

use crate::domain::{error::DomainError, version::Version};

/// File name of the persisted document, relative to the project root.
pub const MANIFEST_FILE: &str = "Cargo.toml";

/// Key of the tool's table inside `[package.metadata]`.
pub const METADATA_KEY: &str = "trellis";

const VERSION_KEY: &str = "version";
const PACKAGE_KEY: &str = "package";
const EXTENSIONS_KEY: &str = "extensions";
const BUILD_REQUIRES_KEY: &str = "build-requires";

const RESERVED_KEYS: [&str; 4] = [VERSION_KEY, PACKAGE_KEY, EXTENSIONS_KEY, BUILD_REQUIRES_KEY];

/// Editable, format-preserving view over a `Cargo.toml`.
#[derive(Debug, Clone)]
pub struct Manifest {
    doc: DocumentMut,
}

impl Manifest {
    pub fn parse(text: &str) -> Result<Self, DomainError> {
        text.parse::<DocumentMut>()
            .map(|doc| Self { doc })
            .map_err(|e| DomainError::InvalidManifest(e.to_string()))
    }

    // ── [package] ───────────────────────────────────────────────────────────

    pub fn package_str(&self, key: &str) -> Option<&str> {
        self.package()?.get(key)?.as_str()
    }

    pub fn package_authors(&self) -> Vec<String> {
        self.package()
            .and_then(|p| p.get("authors"))
            .and_then(Item::as_array)
            .map(|arr| arr.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn set_package_str(&mut self, key: &str, text: &str) -> Result<(), DomainError> {
        let package = child_table(self.doc.as_table_mut(), "package")?;
        package.insert(key, value(text));
        Ok(())
    }

    // ── [package.metadata.trellis] ──────────────────────────────────────────

    /// Recorded tool version as written. Bare numbers (`version = 0.2`) read
    /// as their decimal form; any other kind of value keeps its TOML text.
    pub fn recorded_version_text(&self) -> Option<String> {
        let item = self.metadata()?.get(VERSION_KEY)?;
        let text = match item.as_value() {
            Some(Value::String(s)) => s.value().clone(),
            Some(Value::Integer(i)) => i.value().to_string(),
            Some(Value::Float(f)) => f.value().to_string(),
            _ => item.to_string().trim().to_string(),
        };
        Some(text)
    }

    /// `Ok(None)` when no version is recorded, an error when it cannot be parsed.
    pub fn recorded_version(&self) -> Result<Option<Version>, DomainError> {
        let Some(item) = self.metadata().and_then(|m| m.get(VERSION_KEY)) else {
            return Ok(None);
        };
        match item.as_value() {
            Some(Value::String(s)) => Version::parse(s.value()).map(Some),
            Some(Value::Integer(i)) => Version::parse(&i.value().to_string()).map(Some),
            Some(Value::Float(f)) => Version::parse(&f.value().to_string()).map(Some),
            _ => Err(DomainError::InvalidVersion {
                input: item.to_string().trim().to_string(),
                reason: "expected a string or a number".into(),
            }),
        }
    }

    pub fn recorded_package(&self) -> Option<&str> {
        self.metadata()?.get(PACKAGE_KEY)?.as_str()
    }

    pub fn persisted_extensions(&self) -> Vec<String> {
        self.metadata()
            .and_then(|m| m.get(EXTENSIONS_KEY))
            .and_then(Item::as_array)
            .map(|arr| arr.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Every non-reserved metadata key, converted to JSON values.
    pub fn metadata_extras(&self) -> BTreeMap<String, Json> {
        let Some(meta) = self.metadata() else {
            return BTreeMap::new();
        };
        meta.iter()
            .filter(|(k, _)| !RESERVED_KEYS.contains(k))
            .filter_map(|(k, item)| item_to_json(item).map(|j| (k.to_string(), j)))
            .collect()
    }

    /// Record version, package, extensions and extra options.
    pub fn stamp(
        &mut self,
        version: &Version,
        package: Option<&str>,
        extensions: &[String],
        extras: &BTreeMap<String, Json>,
    ) -> Result<(), DomainError> {
        let meta = self.metadata_mut()?;
        meta.insert(VERSION_KEY, value(version.to_string()));
        if let Some(package) = package {
            meta.insert(PACKAGE_KEY, value(package));
        }
        let names: toml_edit::Array = extensions.iter().map(String::as_str).collect();
        meta.insert(EXTENSIONS_KEY, value(names));

        for (key, json) in extras {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            if let Some(v) = json_to_value(json) {
                meta.insert(key.as_str(), value(v));
            }
        }
        Ok(())
    }

    /// Remove and return the legacy `build-requires` list (`name@req` entries).
    pub fn take_build_requires(&mut self) -> Result<Vec<String>, DomainError> {
        if self.metadata().is_none() {
            return Ok(Vec::new());
        }
        let removed = self.metadata_mut()?.remove(BUILD_REQUIRES_KEY);
        Ok(removed
            .as_ref()
            .and_then(Item::as_array)
            .map(|arr| arr.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default())
    }

    // ── Dependencies and targets ────────────────────────────────────────────

    pub fn dependency_names(&self, table: &str) -> Vec<String> {
        self.doc
            .get(table)
            .and_then(Item::as_table_like)
            .map(|t| t.iter().map(|(k, _)| k.to_string()).collect())
            .unwrap_or_default()
    }

    /// Insert `name = "req"` into `table` unless the dependency is already
    /// declared. Returns whether something was inserted.
    pub fn ensure_dependency(&mut self, table: &str, name: &str, req: &str) -> Result<bool, DomainError> {
        let deps = child_table(self.doc.as_table_mut(), table)?;
        if deps.contains_key(name) {
            return Ok(false);
        }
        deps.insert(name, value(req));
        Ok(true)
    }

    /// Returns whether the dependency was present.
    pub fn remove_dependency(&mut self, table: &str, name: &str) -> bool {
        self.doc
            .get_mut(table)
            .and_then(Item::as_table_like_mut)
            .is_some_and(|t| t.remove(name).is_some())
    }

    pub fn has_bin_targets(&self) -> bool {
        self.doc.contains_key("bin")
    }

    /// Append a `[[bin]]` target.
    pub fn add_bin_target(&mut self, name: &str, path: &str) -> Result<(), DomainError> {
        let mut target = Table::new();
        target.insert("name", value(name));
        target.insert("path", value(path));

        let root = self.doc.as_table_mut();
        match root.get_mut("bin") {
            Some(Item::ArrayOfTables(bins)) => bins.push(target),
            Some(_) => {
                return Err(DomainError::InvalidManifest(
                    "`bin` must be an array of tables".into(),
                ));
            }
            None => {
                let mut bins = ArrayOfTables::new();
                bins.push(target);
                root.insert("bin", Item::ArrayOfTables(bins));
            }
        }
        Ok(())
    }

    /// Drop every `[[bin]]` target. Returns whether there was one.
    pub fn remove_bin_targets(&mut self) -> bool {
        self.doc.remove("bin").is_some()
    }

    // ── helpers ─────────────────────────────────────────────────────────────

    fn package(&self) -> Option<&dyn TableLike> {
        self.doc.get("package")?.as_table_like()
    }

    fn metadata(&self) -> Option<&dyn TableLike> {
        self.package()?
            .get("metadata")?
            .as_table_like()?
            .get(METADATA_KEY)?
            .as_table_like()
    }

    fn metadata_mut(&mut self) -> Result<&mut Table, DomainError> {
        let package = child_table(self.doc.as_table_mut(), "package")?;
        let metadata = child_table(package, "metadata")?;
        metadata.set_implicit(true);
        child_table(metadata, METADATA_KEY)
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.doc)
    }
}

/// Split a `Cargo.toml` author entry (`"Name <email>"`) into its parts.
pub fn split_author(entry: &str) -> (String, Option<String>) {
    match entry.split_once('<') {
        Some((name, rest)) => {
            let email = rest.trim_end().trim_end_matches('>').trim();
            let email = (!email.is_empty()).then(|| email.to_string());
            (name.trim().to_string(), email)
        }
        None => (entry.trim().to_string(), None),
    }
}

fn child_table<'a>(parent: &'a mut Table, key: &str) -> Result<&'a mut Table, DomainError> {
    parent
        .entry(key)
        .or_insert(Item::Table(Table::new()))
        .as_table_mut()
        .ok_or_else(|| DomainError::InvalidManifest(format!("`{key}` must be a table")))
}

fn item_to_json(item: &Item) -> Option<Json> {
    match item {
        Item::Value(v) => value_to_json(v),
        Item::Table(t) => Some(Json::Object(
            t.iter()
                .filter_map(|(k, i)| item_to_json(i).map(|j| (k.to_string(), j)))
                .collect(),
        )),
        Item::None | Item::ArrayOfTables(_) => None,
    }
}

fn value_to_json(v: &Value) -> Option<Json> {
    match v {
        Value::String(s) => Some(Json::String(s.value().clone())),
        Value::Integer(i) => Some(Json::from(*i.value())),
        Value::Float(f) => serde_json::Number::from_f64(*f.value()).map(Json::Number),
        Value::Boolean(b) => Some(Json::Bool(*b.value())),
        Value::Datetime(d) => Some(Json::String(d.value().to_string())),
        Value::Array(arr) => Some(Json::Array(arr.iter().filter_map(value_to_json).collect())),
        Value::InlineTable(t) => Some(Json::Object(
            t.iter()
                .filter_map(|(k, v)| value_to_json(v).map(|j| (k.to_string(), j)))
                .collect(),
        )),
    }
}

fn json_to_value(json: &Json) -> Option<Value> {
    match json {
        Json::Null => None,
        Json::Bool(b) => Some(Value::from(*b)),
        Json::Number(n) => n
            .as_i64()
            .map(Value::from)
            .or_else(|| n.as_f64().map(Value::from)),
        Json::String(s) => Some(Value::from(s.as_str())),
        Json::Array(items) => Some(Value::Array(items.iter().filter_map(json_to_value).collect())),
        Json::Object(map) => {
            let mut table = InlineTable::new();
            for (k, v) in map {
                if let Some(v) = json_to_value(v) {
                    table.insert(k.as_str(), v);
                }
            }
            Some(Value::InlineTable(table))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LEGACY: &str = r#"# keep me
[package]
name = "demo"
edition = "2018"
authors = ["Jane Doe <jane@example.com>"]

[package.metadata.trellis]
version = "0.2"
extensions = ["no-cli"]
build-requires = ["cc@1.0", "trellis@0.2"]
github_actions_toolchain = "nightly"

[dependencies]
anyhow = "1.0.40" # pinned
"#;

    #[test]
    fn reads_metadata() {
        let m = Manifest::parse(LEGACY).unwrap();
        assert_eq!(m.recorded_version_text().as_deref(), Some("0.2"));
        assert_eq!(m.recorded_version().unwrap(), Some(Version::new(0, 2, 0)));
        assert_eq!(m.persisted_extensions(), ["no-cli"]);
        assert_eq!(m.package_str("name"), Some("demo"));
        assert_eq!(m.package_authors(), ["Jane Doe <jane@example.com>"]);

        let extras = m.metadata_extras();
        assert_eq!(extras.len(), 1);
        assert_eq!(extras["github_actions_toolchain"], Json::from("nightly"));
    }

    #[test]
    fn missing_metadata_is_absent_not_error() {
        let m = Manifest::parse("[package]\nname = \"x\"\n").unwrap();
        assert_eq!(m.recorded_version().unwrap(), None);
        assert!(m.persisted_extensions().is_empty());
        assert!(m.metadata_extras().is_empty());
    }

    #[test]
    fn garbage_version_is_error() {
        let m = Manifest::parse("[package.metadata.trellis]\nversion = \"banana\"\n").unwrap();
        assert!(m.recorded_version().is_err());
    }

    #[test]
    fn bare_number_versions_are_read() {
        let float = Manifest::parse("[package.metadata.trellis]\nversion = 0.2\n").unwrap();
        assert_eq!(float.recorded_version_text().as_deref(), Some("0.2"));
        assert_eq!(float.recorded_version().unwrap(), Some(Version::new(0, 2, 0)));

        let int = Manifest::parse("[package.metadata.trellis]\nversion = 3\n").unwrap();
        assert_eq!(int.recorded_version().unwrap(), Some(Version::new(3, 0, 0)));
    }

    #[test]
    fn non_scalar_version_is_error_not_absent() {
        let m = Manifest::parse("[package.metadata.trellis]\nversion = [1, 2]\n").unwrap();
        assert!(matches!(
            m.recorded_version(),
            Err(DomainError::InvalidVersion { .. })
        ));
        assert_eq!(m.recorded_version_text().as_deref(), Some("[1, 2]"));

        let negative = Manifest::parse("[package.metadata.trellis]\nversion = -3\n").unwrap();
        assert!(negative.recorded_version().is_err());
    }

    #[test]
    fn invalid_toml_is_rejected() {
        assert!(matches!(
            Manifest::parse("[package"),
            Err(DomainError::InvalidManifest(_))
        ));
    }

    #[test]
    fn stamp_preserves_comments_and_order() {
        let mut m = Manifest::parse(LEGACY).unwrap();
        let mut extras = BTreeMap::new();
        extras.insert("version".to_string(), Json::from("ignored"));
        extras.insert("flag".to_string(), Json::Bool(true));
        m.stamp(&Version::new(1, 0, 0), Some("demo"), &["no-cli".into()], &extras)
            .unwrap();

        let text = m.to_string();
        assert!(text.starts_with("# keep me"));
        assert!(text.contains("anyhow = \"1.0.40\" # pinned"));

        let reread = Manifest::parse(&text).unwrap();
        assert_eq!(reread.recorded_version_text().as_deref(), Some("1.0.0"));
        assert_eq!(reread.recorded_package(), Some("demo"));
        assert_eq!(reread.metadata_extras()["flag"], Json::Bool(true));
    }

    #[test]
    fn stamp_creates_missing_tables() {
        let mut m = Manifest::parse("[package]\nname = \"x\"\n").unwrap();
        m.stamp(&Version::new(1, 0, 0), None, &[], &BTreeMap::new()).unwrap();
        let text = m.to_string();
        assert!(text.contains("[package.metadata.trellis]"));
        assert!(!text.contains("[package.metadata]\n"));
    }

    #[test]
    fn build_requires_are_taken_once() {
        let mut m = Manifest::parse(LEGACY).unwrap();
        assert_eq!(m.take_build_requires().unwrap(), ["cc@1.0", "trellis@0.2"]);
        assert!(m.take_build_requires().unwrap().is_empty());
        assert!(!m.to_string().contains("build-requires"));
    }

    #[test]
    fn existing_dependency_wins() {
        let mut m = Manifest::parse(LEGACY).unwrap();
        assert!(!m.ensure_dependency("dependencies", "anyhow", "1").unwrap());
        assert!(m.ensure_dependency("build-dependencies", "cc", "1.0").unwrap());
        assert_eq!(m.dependency_names("build-dependencies"), ["cc"]);
        assert!(m.remove_dependency("build-dependencies", "cc"));
        assert!(!m.remove_dependency("build-dependencies", "cc"));
    }

    #[test]
    fn bin_targets() {
        let mut m = Manifest::parse(LEGACY).unwrap();
        assert!(!m.has_bin_targets());
        m.add_bin_target("demo", "src/main.rs").unwrap();
        assert!(m.has_bin_targets());
        assert!(m.to_string().contains("[[bin]]"));

        assert!(m.remove_bin_targets());
        assert!(!m.has_bin_targets());
        assert!(!m.remove_bin_targets());
    }

    #[test]
    fn author_split() {
        assert_eq!(
            split_author("Jane Doe <jane@example.com>"),
            ("Jane Doe".to_string(), Some("jane@example.com".to_string()))
        );
        assert_eq!(split_author("Solo"), ("Solo".to_string(), None));
    }
}
