use crate::error::ConfigError;
use std::net::SocketAddr;

pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_DATASET_URL: &str =
    "https://raw.githubusercontent.com/Bowserinator/Periodic-Table-JSON/refs/heads/master/periodic-table-lookup.json";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// How the table view lays out its tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableMode {
    /// Flat 7x18 grid plus the lanthanide and actinide rows.
    Grid,
    /// Every tile placed in a rotating CSS3D group.
    Css3d,
}

impl TableMode {
    pub fn from_query(value: Option<&str>) -> Self {
        match value.unwrap_or("grid").trim().to_lowercase().as_str() {
            "css3d" => TableMode::Css3d,
            _ => TableMode::Grid,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TableMode::Grid => "grid",
            TableMode::Css3d => "css3d",
        }
    }
}

/// How the selected element travels from the table view to the detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// `?element=<key>` on the detail URL.
    Query,
    /// A page-local storage slot, read once by the detail page.
    Storage,
}

impl SelectionMode {
    pub fn from_query(value: Option<&str>) -> Self {
        match value.unwrap_or("query").trim().to_lowercase().as_str() {
            "storage" => SelectionMode::Storage,
            _ => SelectionMode::Query,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SelectionMode::Query => "query",
            SelectionMode::Storage => "storage",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BohrMode {
    /// Shell rings with orbiting electron spheres.
    Procedural,
    /// The record's glTF model, when it has one.
    Asset,
}

impl BohrMode {
    pub fn from_query(value: Option<&str>) -> Self {
        match value.unwrap_or("procedural").trim().to_lowercase().as_str() {
            "asset" => BohrMode::Asset,
            _ => BohrMode::Procedural,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BohrMode::Procedural => "procedural",
            BohrMode::Asset => "asset",
        }
    }
}

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    Url(String),
    File(std::path::PathBuf),
}

impl DatasetSource {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            DatasetSource::Url(value.to_string())
        } else {
            DatasetSource::File(value.into())
        }
    }
}

impl std::fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetSource::Url(url) => f.write_str(url),
            DatasetSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub dataset: DatasetSource,
    pub table: TableMode,
    pub selection: SelectionMode,
    pub bohr: BohrMode,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    ///
    /// Unknown mode values fall back to their defaults; only a malformed bind
    /// address is an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr_value = lookup("PTABLE_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_value
            .trim()
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::InvalidAddr {
                value: addr_value.clone(),
                source,
            })?;

        let dataset = lookup("PTABLE_DATASET")
            .filter(|v| !v.trim().is_empty())
            .map(|v| DatasetSource::parse(&v))
            .unwrap_or_else(|| DatasetSource::Url(DEFAULT_DATASET_URL.to_string()));

        Ok(Config {
            addr,
            dataset,
            table: TableMode::from_query(lookup("PTABLE_TABLE").as_deref()),
            selection: SelectionMode::from_query(lookup("PTABLE_SELECTION").as_deref()),
            bohr: BohrMode::from_query(lookup("PTABLE_BOHR").as_deref()),
            log_level: lookup("PTABLE_LOG").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            dataset: DatasetSource::Url(DEFAULT_DATASET_URL.to_string()),
            table: TableMode::Grid,
            selection: SelectionMode::Query,
            bohr: BohrMode::Procedural,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.addr.to_string(), DEFAULT_ADDR);
        assert_eq!(config.dataset, DatasetSource::Url(DEFAULT_DATASET_URL.into()));
        assert_eq!(config.table, TableMode::Grid);
        assert_eq!(config.selection, SelectionMode::Query);
        assert_eq!(config.bohr, BohrMode::Procedural);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn reads_every_variable() {
        let config = Config::from_lookup(lookup_from(&[
            ("PTABLE_ADDR", "0.0.0.0:8080"),
            ("PTABLE_DATASET", "data/table.json"),
            ("PTABLE_TABLE", "CSS3D"),
            ("PTABLE_SELECTION", "storage"),
            ("PTABLE_BOHR", "asset"),
            ("PTABLE_LOG", "debug"),
        ]))
        .unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.dataset, DatasetSource::File("data/table.json".into()));
        assert_eq!(config.table, TableMode::Css3d);
        assert_eq!(config.selection, SelectionMode::Storage);
        assert_eq!(config.bohr, BohrMode::Asset);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn unknown_modes_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("PTABLE_TABLE", "spiral"),
            ("PTABLE_SELECTION", "cookie"),
        ]))
        .unwrap();
        assert_eq!(config.table, TableMode::Grid);
        assert_eq!(config.selection, SelectionMode::Query);
    }

    #[test]
    fn bad_address_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("PTABLE_ADDR", "localhost")])).unwrap_err();
        assert!(err.to_string().contains("localhost"));
    }

    #[test]
    fn dataset_source_detects_urls() {
        assert!(matches!(
            DatasetSource::parse("https://example.org/t.json"),
            DatasetSource::Url(_)
        ));
        assert!(matches!(DatasetSource::parse("./t.json"), DatasetSource::File(_)));
    }
}
