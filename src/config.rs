//! TOML description of the maps to create at startup.
//!
//! ```toml
//! [[map]]
//! name = "aliases"
//! backend = "static"
//! entries = [["root", "admin"], ["admin"]]
//!
//! [[map]]
//! name = "virtual"
//! backend = "file"
//! config = "/etc/mail/virtual"
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::Error;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, rename = "map")]
    pub maps: Vec<MapConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapConfig {
    pub name: Option<String>,
    pub backend: String,
    pub config: Option<String>,
    /// Static maps only: `[key]` or `[key, value]`, in lookup order.
    #[serde(default)]
    pub entries: Vec<Vec<String>>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, Error> {
        Ok(toml::from_str(content)?)
    }
}

impl MapConfig {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_maps_in_order() {
        let config = Config::parse(
            r#"
            [[map]]
            name = "aliases"
            backend = "static"
            entries = [["root", "admin"], ["admin"]]

            [[map]]
            backend = "file"
            config = "/etc/mail/virtual"
            "#,
        )
        .unwrap();

        assert_eq!(config.maps.len(), 2);
        assert_eq!(config.maps[0].name.as_deref(), Some("aliases"));
        assert_eq!(
            config.maps[0].entries,
            vec![vec!["root".to_owned(), "admin".to_owned()], vec!["admin".to_owned()]]
        );
        assert_eq!(config.maps[1].display_name(), "<unnamed>");
        assert_eq!(config.maps[1].config.as_deref(), Some("/etc/mail/virtual"));
    }

    #[test]
    fn empty_file_has_no_maps() {
        assert!(Config::parse("").unwrap().maps.is_empty());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = Config::parse("[[map]]\nbackend = \"static\"\nsource = \"x\"\n").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}
