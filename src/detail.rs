use crate::config::BohrMode;
use crate::dataset::{Dataset, ElementRecord, Scalar};
use crate::html::{escape, script_json};
use crate::scene::{OrbitAnimation, SceneDescription, SceneGraph};
use crate::shells::ShellState;
use rand::Rng;
use serde::Serialize;

pub const NOT_FOUND_MESSAGE: &str = "Element not found.";
pub const PLACEHOLDER: &str = "N/A";

/// What a property row does when its value is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnAbsent {
    Omit,
    Placeholder(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    AtomicMass,
    Density,
    MeltingPoint,
    BoilingPoint,
    Phase,
    Category,
    Group,
    Period,
    Block,
    Electronegativity,
    ElectronAffinity,
    ElectronConfiguration,
}

impl Property {
    /// Display order of the property list.
    pub const ALL: [Property; 12] = [
        Property::AtomicMass,
        Property::Density,
        Property::MeltingPoint,
        Property::BoilingPoint,
        Property::Phase,
        Property::Category,
        Property::Group,
        Property::Period,
        Property::Block,
        Property::Electronegativity,
        Property::ElectronAffinity,
        Property::ElectronConfiguration,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Property::AtomicMass => "Atomic Mass",
            Property::Density => "Density",
            Property::MeltingPoint => "Melting Point",
            Property::BoilingPoint => "Boiling Point",
            Property::Phase => "Phase",
            Property::Category => "Category",
            Property::Group => "Group",
            Property::Period => "Period",
            Property::Block => "Block",
            Property::Electronegativity => "Electronegativity",
            Property::ElectronAffinity => "Electron Affinity",
            Property::ElectronConfiguration => "Electron Configuration",
        }
    }

    /// Only a missing value counts as absent. A present `0` is shown as `0`,
    /// never as the placeholder.
    pub fn on_absent(self) -> OnAbsent {
        match self {
            Property::Electronegativity | Property::ElectronAffinity => OnAbsent::Placeholder(PLACEHOLDER),
            _ => OnAbsent::Omit,
        }
    }

    pub fn value(self, record: &ElementRecord) -> Option<String> {
        fn scalar(value: &Option<Scalar>) -> Option<String> {
            value.as_ref().map(Scalar::to_string)
        }
        match self {
            Property::AtomicMass => scalar(&record.atomic_mass),
            Property::Density => scalar(&record.density),
            Property::MeltingPoint => scalar(&record.melt),
            Property::BoilingPoint => scalar(&record.boil),
            Property::Phase => record.phase.clone(),
            Property::Category => Some(record.category.clone()).filter(|c| !c.is_empty()),
            Property::Group => scalar(&record.group),
            Property::Period => scalar(&record.period),
            Property::Block => record.block.clone(),
            Property::Electronegativity => scalar(&record.electronegativity_pauling),
            Property::ElectronAffinity => scalar(&record.electron_affinity),
            Property::ElectronConfiguration => record.electron_configuration_semantic.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyRow {
    pub label: &'static str,
    pub value: String,
}

/// Rows in display order, applying each property's absent policy.
pub fn property_rows(record: &ElementRecord) -> Vec<PropertyRow> {
    Property::ALL
        .iter()
        .filter_map(|&property| {
            let value = match (property.value(record), property.on_absent()) {
                (Some(value), _) => value,
                (None, OnAbsent::Placeholder(text)) => text.to_string(),
                (None, OnAbsent::Omit) => return None,
            };
            Some(PropertyRow {
                label: property.label(),
                value,
            })
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct DetailView {
    pub key: String,
    pub symbol: String,
    pub name: String,
    pub number: u32,
    pub headline: String,
    pub properties: Vec<PropertyRow>,
    pub summary: Option<String>,
    pub animation: OrbitAnimation,
    pub scene: SceneDescription,
}

/// Builds the detail view, including a fresh shell state for the Bohr scene.
///
/// Asset mode uses the record's `bohr_model_3d` when it has one and falls back
/// to the procedural model otherwise.
pub fn render_detail<R: Rng>(key: &str, record: &ElementRecord, bohr: BohrMode, rng: &mut R) -> DetailView {
    let mut graph = SceneGraph::default();
    let model_url = record
        .bohr_model_3d
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty());
    let animation = match (bohr, model_url) {
        (BohrMode::Asset, Some(url)) => OrbitAnimation::mount_model(&mut graph, url),
        _ => OrbitAnimation::mount_bohr(&mut graph, ShellState::new(record.number, rng)),
    };
    let scene = animation.describe(&graph);
    let mass = record
        .atomic_mass
        .as_ref()
        .map(Scalar::to_string)
        .unwrap_or_else(|| PLACEHOLDER.to_string());

    DetailView {
        key: key.to_string(),
        symbol: record.symbol.clone(),
        name: record.name.clone(),
        number: record.number,
        headline: format!("Atomic Number: {} | Atomic Mass: {}", record.number, mass),
        properties: property_rows(record),
        summary: record.summary.clone(),
        animation,
        scene,
    }
}

pub enum DetailPage {
    Found(Box<DetailView>),
    NotFound,
}

impl DetailPage {
    pub fn resolve<R: Rng>(dataset: &Dataset, identity: Option<&str>, bohr: BohrMode, rng: &mut R) -> Self {
        match identity.and_then(|id| dataset.resolve(id)) {
            Some((key, record)) => DetailPage::Found(Box::new(render_detail(key, record, bohr, rng))),
            None => {
                log::debug!("detail requested for unknown element {identity:?}");
                DetailPage::NotFound
            }
        }
    }

    pub fn to_html(&self) -> Result<String, serde_json::Error> {
        match self {
            DetailPage::Found(view) => view.to_html(),
            DetailPage::NotFound => Ok(not_found_html()),
        }
    }
}

pub fn not_found_html() -> String {
    format!(r#"<p class="not-found">{NOT_FOUND_MESSAGE}</p>"#)
}

impl DetailView {
    /// Body fragment of the detail view. The scene rides along as JSON for the
    /// browser host.
    pub fn to_html(&self) -> Result<String, serde_json::Error> {
        let mut properties = String::new();
        for row in &self.properties {
            properties.push_str(&format!(
                r#"<div class="property"><span>{}:</span><span>{}</span></div>"#,
                escape(row.label),
                escape(&row.value)
            ));
        }
        let summary = self.summary.as_deref().map(escape).unwrap_or_default();
        Ok(format!(
            r#"<div class="detail-header">
  <div id="detail-symbol" class="detail-symbol">{symbol}</div>
  <div>
    <h1 id="detail-name">{name}</h1>
    <div id="detail-number">{headline}</div>
  </div>
</div>
<div class="detail-body">
  <div id="properties" class="properties">{properties}</div>
  <div id="bohr-container" class="bohr-container"></div>
</div>
<p id="summary" class="summary">{summary}</p>
<script type="application/json" id="scene-data">{scene}</script>"#,
            symbol = escape(&self.symbol),
            name = escape(&self.name),
            headline = escape(&self.headline),
            scene = script_json(&self.scene)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::record;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rows(record: &ElementRecord) -> Vec<(String, String)> {
        property_rows(record)
            .into_iter()
            .map(|r| (r.label.to_string(), r.value))
            .collect()
    }

    #[test]
    fn missing_electronegativity_shows_placeholder() {
        let mut he = record("Helium", "He", 2, 18, 1);
        he.electronegativity_pauling = None;
        he.electron_affinity = None;
        let rows = rows(&he);
        assert!(rows.contains(&("Electronegativity".into(), "N/A".into())));
        assert!(rows.contains(&("Electron Affinity".into(), "N/A".into())));
    }

    #[test]
    fn zero_is_a_value_not_an_absence() {
        let mut he = record("Helium", "He", 2, 18, 1);
        he.electronegativity_pauling = Some(Scalar::Number(0.0));
        assert!(rows(&he).contains(&("Electronegativity".into(), "0".into())));
    }

    #[test]
    fn missing_density_is_omitted() {
        let mut h = record("Hydrogen", "H", 1, 1, 1);
        h.density = None;
        assert!(rows(&h).iter().all(|(label, _)| label != "Density"));
    }

    #[test]
    fn rows_follow_fixed_order() {
        let mut h = record("Hydrogen", "H", 1, 1, 1);
        h.melt = Some(Scalar::Number(13.99));
        h.boil = Some(Scalar::Text("20.271".into()));
        let labels: Vec<String> = rows(&h).into_iter().map(|(l, _)| l).collect();
        assert_eq!(
            labels,
            [
                "Atomic Mass",
                "Density",
                "Melting Point",
                "Boiling Point",
                "Phase",
                "Category",
                "Group",
                "Period",
                "Block",
                "Electronegativity",
                "Electron Affinity",
                "Electron Configuration"
            ]
        );
        assert!(rows(&h).contains(&("Boiling Point".into(), "20.271".into())));
    }

    #[test]
    fn hydrogen_detail_has_one_electron() {
        let mut rng = StdRng::seed_from_u64(0);
        let h = record("Hydrogen", "H", 1, 1, 1);
        let view = render_detail("hydrogen", &h, BohrMode::Procedural, &mut rng);
        assert_eq!(view.symbol, "H");
        assert_eq!(view.number, 1);
        assert_eq!(view.animation.shells().counts(), [1]);
        assert_eq!(view.animation.shells().shells[0].capacity, 2);
        assert_eq!(view.headline, "Atomic Number: 1 | Atomic Mass: 2");
    }

    #[test]
    fn asset_mode_without_model_falls_back() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut li = record("Lithium", "Li", 3, 1, 2);
        let view = render_detail("lithium", &li, BohrMode::Asset, &mut rng);
        assert_eq!(view.scene.orbits.len(), 3);

        li.bohr_model_3d = Some("https://example.org/li.glb".into());
        let view = render_detail("lithium", &li, BohrMode::Asset, &mut rng);
        assert!(view.scene.orbits.is_empty());
        assert_eq!(view.scene.spins.len(), 1);
    }

    #[test]
    fn unknown_identity_is_not_found() {
        let mut rng = StdRng::seed_from_u64(0);
        let dataset = Dataset::from_records(vec![record("Hydrogen", "H", 1, 1, 1)]);
        let page = DetailPage::resolve(&dataset, Some("kryptonite"), BohrMode::Procedural, &mut rng);
        assert!(matches!(page, DetailPage::NotFound));
        assert!(page.to_html().unwrap().contains(NOT_FOUND_MESSAGE));
        let page = DetailPage::resolve(&dataset, None, BohrMode::Procedural, &mut rng);
        assert!(matches!(page, DetailPage::NotFound));
    }

    #[test]
    fn html_escapes_record_text() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut h = record("Hydrogen", "H", 1, 1, 1);
        h.summary = Some("<b>bold</b> claim".into());
        let html = render_detail("hydrogen", &h, BohrMode::Procedural, &mut rng).to_html().unwrap();
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt; claim"));
        assert!(html.contains(r#"<span>Electronegativity:</span><span>2.2</span>"#));
        assert!(html.contains(r#"id="scene-data""#));
    }
}
