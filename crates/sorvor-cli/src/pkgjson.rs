//! The project's `package.json`, exposed to the entry HTML template as `pkg`.
//!
//! ```html
//! <title>{{ pkg.name }} v{{ pkg.version }}</title>
//! ```

use crate::error::{Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Fields of a node `package.json` that templates commonly use.
///
/// Absent fields are left out when serialized, so `{{ pkg.version }}` renders
/// as an empty string rather than `none`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Either a string or a `{ name, email, url }` object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default)]
    pub peer_dependencies: BTreeMap<String, String>,
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, String>,
}

impl PackageJson {
    /// Parse `package.json` contents.
    pub fn parse(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Read `package.json` from `dir`, if there is one.
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join("package.json");
        if !path.is_file() {
            return Ok(None);
        }

        let payload = std::fs::read_to_string(&path).with_path(&path)?;
        Self::parse(&payload)
            .with_hint(format!("{} is not valid JSON", path.display()))
            .map(Some)
    }
}
