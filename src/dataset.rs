use crate::config::DatasetSource;
use crate::error::DatasetError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A value that may arrive as a JSON number or as a (possibly numeric) string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(v) => Some(*v),
            Scalar::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(v) => write!(f, "{v}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Scalar>::deserialize(deserializer)?;
    match raw {
        None => Ok(0),
        Some(scalar) => scalar
            .as_f64()
            .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0 && *v <= u32::MAX as f64)
            .map(|v| v as u32)
            .ok_or_else(|| serde::de::Error::custom(format!("expected a non-negative integer, got `{scalar}`"))),
    }
}

/// One element as published by the remote dataset.
///
/// Only the fields the views use are kept; everything else in the source
/// document is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    pub name: String,
    pub symbol: String,
    #[serde(deserialize_with = "lenient_u32")]
    pub number: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub xpos: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub ypos: u32,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub atomic_mass: Option<Scalar>,
    #[serde(default)]
    pub density: Option<Scalar>,
    #[serde(default)]
    pub melt: Option<Scalar>,
    #[serde(default)]
    pub boil: Option<Scalar>,
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default)]
    pub group: Option<Scalar>,
    #[serde(default)]
    pub period: Option<Scalar>,
    #[serde(default)]
    pub block: Option<String>,
    #[serde(default)]
    pub electronegativity_pauling: Option<Scalar>,
    #[serde(default)]
    pub electron_affinity: Option<Scalar>,
    #[serde(default)]
    pub electron_configuration_semantic: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, rename = "cpk-hex")]
    pub cpk_hex: Option<String>,
    #[serde(default)]
    pub bohr_model_3d: Option<String>,
}

impl ElementRecord {
    /// The case-folded name used to carry a selection between views.
    pub fn route_key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Element name to record, plus the display order when the source has one.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    elements: HashMap<String, ElementRecord>,
    order: Vec<String>,
}

impl Dataset {
    /// Parses the lookup document: a map of key to record plus an optional
    /// `order` array. Any malformed record fails the whole document.
    pub fn from_json(bytes: &[u8]) -> Result<Self, DatasetError> {
        let mut root: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(bytes)?;

        let order = match root.remove("order") {
            Some(value) => serde_json::from_value::<Vec<String>>(value)?,
            None => Vec::new(),
        };

        let mut elements = HashMap::with_capacity(root.len());
        for (key, value) in root {
            if !value.is_object() {
                log::debug!("skipping non-record key `{key}`");
                continue;
            }
            let record: ElementRecord = serde_json::from_value(value)?;
            elements.insert(key, record);
        }

        Ok(Dataset { elements, order })
    }

    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = ElementRecord>,
    {
        let mut order = Vec::new();
        let mut elements = HashMap::new();
        for record in records {
            let key = record.route_key();
            order.push(key.clone());
            elements.insert(key, record);
        }
        Dataset { elements, order }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&ElementRecord> {
        self.elements.get(key)
    }

    /// Resolves a selection identity: exact key first, then case-folded key,
    /// then case-folded element name.
    pub fn resolve(&self, identity: &str) -> Option<(&str, &ElementRecord)> {
        let identity = identity.trim();
        if identity.is_empty() {
            return None;
        }
        if let Some((key, record)) = self.elements.get_key_value(identity) {
            return Some((key.as_str(), record));
        }
        let folded = identity.to_lowercase();
        if let Some((key, record)) = self.elements.get_key_value(&folded) {
            return Some((key.as_str(), record));
        }
        self.elements
            .iter()
            .find(|(_, record)| record.name.to_lowercase() == folded)
            .map(|(key, record)| (key.as_str(), record))
    }

    /// Linear scan by atomic number.
    pub fn by_number(&self, number: u32) -> Option<&ElementRecord> {
        self.elements.values().find(|record| record.number == number)
    }

    pub fn records(&self) -> impl Iterator<Item = &ElementRecord> {
        self.elements.values()
    }

    /// Records in display order: the source `order` array when present,
    /// otherwise ascending atomic number. Keys in `order` with no record are
    /// skipped.
    pub fn ordered(&self) -> Vec<&ElementRecord> {
        if self.order.is_empty() {
            let mut all: Vec<&ElementRecord> = self.elements.values().collect();
            all.sort_by_key(|record| record.number);
            return all;
        }
        self.order
            .iter()
            .filter_map(|key| self.elements.get(key))
            .collect()
    }
}

/// Fetches the dataset from its configured source, once per call.
#[derive(Clone)]
pub struct DatasetProvider {
    client: reqwest::Client,
    source: DatasetSource,
}

impl DatasetProvider {
    pub fn new(source: DatasetSource) -> Self {
        DatasetProvider {
            client: reqwest::Client::new(),
            source,
        }
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    pub async fn load(&self) -> Result<Dataset, DatasetError> {
        log::debug!("loading dataset from {}", self.source);
        let bytes = match &self.source {
            DatasetSource::Url(url) => self.fetch(url).await?,
            DatasetSource::File(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|source| DatasetError::Read {
                        path: path.clone(),
                        source,
                    })?
            }
        };
        let dataset = Dataset::from_json(&bytes)?;
        log::info!("dataset loaded records={} source={}", dataset.len(), self.source);
        Ok(dataset)
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DatasetError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DatasetError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(name: &str, symbol: &str, number: u32, xpos: u32, ypos: u32) -> ElementRecord {
        ElementRecord {
            name: name.to_string(),
            symbol: symbol.to_string(),
            number,
            xpos,
            ypos,
            category: "diatomic nonmetal".to_string(),
            atomic_mass: Some(Scalar::Number(number as f64 * 2.0)),
            density: Some(Scalar::Number(1.5)),
            melt: None,
            boil: None,
            phase: Some("Gas".to_string()),
            group: Some(Scalar::Number(1.0)),
            period: Some(Scalar::Number(1.0)),
            block: Some("s".to_string()),
            electronegativity_pauling: Some(Scalar::Number(2.2)),
            electron_affinity: Some(Scalar::Number(72.769)),
            electron_configuration_semantic: Some("1s1".to_string()),
            summary: Some(format!("{name} summary")),
            cpk_hex: None,
            bohr_model_3d: None,
        }
    }

    const LOOKUP: &str = r#"{
        "order": ["helium", "hydrogen", "ghost"],
        "hydrogen": {
            "name": "Hydrogen", "symbol": "H", "number": 1, "xpos": 1, "ypos": 1,
            "category": "diatomic nonmetal", "atomic_mass": 1.008, "density": 0.08988,
            "electronegativity_pauling": 2.2, "cpk-hex": "ffffff", "shells": [1]
        },
        "helium": {
            "name": "Helium", "symbol": "He", "number": "2", "xpos": "18", "ypos": 1,
            "category": "noble gas", "atomic_mass": "4.0026022",
            "electronegativity_pauling": null, "electron_affinity": null
        }
    }"#;

    #[test]
    fn parses_lookup_document() {
        let dataset = Dataset::from_json(LOOKUP.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);
        let h = dataset.get("hydrogen").unwrap();
        assert_eq!(h.symbol, "H");
        assert_eq!(h.cpk_hex.as_deref(), Some("ffffff"));
        assert_eq!(h.melt, None);
    }

    #[test]
    fn numeric_strings_are_tolerated() {
        let dataset = Dataset::from_json(LOOKUP.as_bytes()).unwrap();
        let he = dataset.get("helium").unwrap();
        assert_eq!(he.number, 2);
        assert_eq!(he.xpos, 18);
        assert_eq!(he.atomic_mass.as_ref().and_then(Scalar::as_f64), Some(4.0026022));
        assert_eq!(he.electronegativity_pauling, None);
    }

    #[test]
    fn order_array_drives_display_order() {
        let dataset = Dataset::from_json(LOOKUP.as_bytes()).unwrap();
        let symbols: Vec<&str> = dataset.ordered().iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, ["He", "H"]);
    }

    #[test]
    fn missing_order_sorts_by_number() {
        let dataset = Dataset::from_json(br#"{
            "b": {"name": "Beta", "symbol": "B", "number": 5},
            "a": {"name": "Alpha", "symbol": "A", "number": 3}
        }"#)
        .unwrap();
        let numbers: Vec<u32> = dataset.ordered().iter().map(|r| r.number).collect();
        assert_eq!(numbers, [3, 5]);
    }

    #[test]
    fn resolve_is_case_insensitive_and_falls_back_to_name() {
        let dataset = Dataset::from_json(LOOKUP.as_bytes()).unwrap();
        assert_eq!(dataset.resolve("hydrogen").map(|(k, _)| k), Some("hydrogen"));
        assert_eq!(dataset.resolve("Hydrogen").map(|(k, _)| k), Some("hydrogen"));

        let renamed = Dataset::from_json(br#"{
            "h-1": {"name": "Hydrogen", "symbol": "H", "number": 1}
        }"#)
        .unwrap();
        assert_eq!(renamed.resolve("HYDROGEN").map(|(k, _)| k), Some("h-1"));
        assert!(renamed.resolve("").is_none());
        assert!(renamed.resolve("unobtainium").is_none());
    }

    #[test]
    fn malformed_record_fails_whole_document() {
        let err = Dataset::from_json(br#"{
            "x": {"name": "X", "symbol": "X", "number": "one"}
        }"#)
        .unwrap_err();
        assert!(matches!(err, DatasetError::Parse(_)));
    }

    #[test]
    fn by_number_scans_records() {
        let dataset = Dataset::from_records(vec![record("Hydrogen", "H", 1, 1, 1), record("Helium", "He", 2, 18, 1)]);
        assert_eq!(dataset.by_number(2).map(|r| r.symbol.as_str()), Some("He"));
        assert!(dataset.by_number(3).is_none());
    }

    #[tokio::test]
    async fn missing_file_reports_path() {
        let provider = DatasetProvider::new(DatasetSource::File("/nonexistent/table.json".into()));
        let err = provider.load().await.unwrap_err();
        assert!(matches!(err, DatasetError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/table.json"));
    }
}
