use crate::dataset::{ElementRecord, Scalar};
use crate::html::escape;
use crate::selection::{Selection, TileAction};
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern"));
static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-fA-F]{3}(?:[0-9a-fA-F]{3})?$").expect("hex color pattern"));

const DEFAULT_BORDER: &str = "ffffff";

/// `category-<normalized>`: whitespace runs become one `-`, then lowercase.
pub fn category_class(category: &str) -> String {
    format!(
        "category-{}",
        WHITESPACE.replace_all(category.trim(), "-").to_lowercase()
    )
}

/// Third line of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caption {
    Name,
    /// Atomic mass to two decimals.
    Mass,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub key: String,
    pub number: u32,
    pub symbol: String,
    pub name: String,
    pub caption: String,
    pub class: String,
    pub border: String,
    pub action: TileAction,
    /// CSS3D scene position, when the table is laid out in 3D.
    pub position: Option<(f32, f32)>,
}

pub fn format_mass(mass: Option<&Scalar>) -> String {
    match mass.and_then(Scalar::as_f64) {
        Some(v) => format!("{v:.2}"),
        None => "N/A".to_string(),
    }
}

pub fn render_tile(record: &ElementRecord, caption: Caption, selection: &Selection) -> Tile {
    let key = record.route_key();
    let caption = match caption {
        Caption::Name => record.name.clone(),
        Caption::Mass => format_mass(record.atomic_mass.as_ref()),
    };
    let border = record
        .cpk_hex
        .as_deref()
        .map(str::trim)
        .filter(|hex| HEX_COLOR.is_match(hex))
        .unwrap_or(DEFAULT_BORDER)
        .to_string();

    Tile {
        action: selection.action_for(&key),
        key,
        number: record.number,
        symbol: record.symbol.clone(),
        name: record.name.clone(),
        caption,
        class: category_class(&record.category),
        border,
        position: None,
    }
}

impl Tile {
    pub fn at(mut self, position: (f32, f32)) -> Self {
        self.position = Some(position);
        self
    }

    pub fn to_html(&self) -> String {
        let body = format!(
            r#"<div class="element-number">{}</div><div class="element-symbol">{}</div><div class="element-caption">{}</div>"#,
            self.number,
            escape(&self.symbol),
            escape(&self.caption),
        );
        let mut attrs = format!(
            r#"class="element {}" data-element="{}" data-number="{}" data-symbol="{}" data-name="{}""#,
            escape(&self.class),
            escape(&self.key),
            self.number,
            escape(&self.symbol),
            escape(&self.name),
        );
        if let Some((x, y)) = self.position {
            attrs.push_str(&format!(
                r#" data-x="{x}" data-y="{y}" style="border: 2px solid #{}""#,
                self.border
            ));
        }
        match &self.action {
            TileAction::Link { href } => {
                format!(r#"<a {attrs} href="{}">{body}</a>"#, escape(href))
            }
            TileAction::Store { .. } => {
                format!(r#"<div {attrs} data-store="1" role="button" tabindex="0">{body}</div>"#)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectionMode;
    use crate::dataset::tests::record;

    #[test]
    fn category_class_normalizes_whitespace_and_case() {
        assert_eq!(category_class("alkali metal"), "category-alkali-metal");
        assert_eq!(category_class("Alkaline  Earth\tMetal"), "category-alkaline-earth-metal");
        assert_eq!(category_class("noble gas"), "category-noble-gas");
        assert_eq!(category_class("post-transition metal"), "category-post-transition-metal");
    }

    #[test]
    fn same_record_renders_the_same_tile() {
        let selection = Selection::new(SelectionMode::Query);
        let h = record("Hydrogen", "H", 1, 1, 1);
        assert_eq!(
            render_tile(&h, Caption::Name, &selection),
            render_tile(&h, Caption::Name, &selection)
        );
    }

    #[test]
    fn query_tile_links_to_detail() {
        let selection = Selection::new(SelectionMode::Query);
        let tile = render_tile(&record("Hydrogen", "H", 1, 1, 1), Caption::Name, &selection);
        let html = tile.to_html();
        assert!(html.starts_with("<a "));
        assert!(html.contains(r#"href="/element?element=hydrogen""#));
        assert!(html.contains(r#"<div class="element-symbol">H</div>"#));
        assert!(html.contains(r#"<div class="element-caption">Hydrogen</div>"#));
        assert!(html.contains("category-diatomic-nonmetal"));
    }

    #[test]
    fn storage_tile_is_a_button() {
        let selection = Selection::new(SelectionMode::Storage);
        let html = render_tile(&record("Helium", "He", 2, 18, 1), Caption::Name, &selection).to_html();
        assert!(html.starts_with("<div "));
        assert!(html.contains(r#"data-store="1""#));
        assert!(html.contains(r#"data-element="helium""#));
        assert!(!html.contains("href="));
    }

    #[test]
    fn mass_caption_uses_two_decimals() {
        let selection = Selection::new(SelectionMode::Query);
        let mut h = record("Hydrogen", "H", 1, 1, 1);
        h.atomic_mass = Some(Scalar::Text("1.008".into()));
        assert_eq!(render_tile(&h, Caption::Mass, &selection).caption, "1.01");
        h.atomic_mass = None;
        assert_eq!(render_tile(&h, Caption::Mass, &selection).caption, "N/A");
    }

    #[test]
    fn border_falls_back_on_bad_color() {
        let selection = Selection::new(SelectionMode::Query);
        let mut h = record("Hydrogen", "H", 1, 1, 1);
        h.cpk_hex = Some("\"><script>".into());
        let tile = render_tile(&h, Caption::Mass, &selection).at((0.0, 0.0));
        assert_eq!(tile.border, "ffffff");
        h.cpk_hex = Some("FF1493".into());
        let tile = render_tile(&h, Caption::Mass, &selection).at((-960.0, 480.0));
        let html = tile.to_html();
        assert!(html.contains("#FF1493"));
        assert!(html.contains(r#"data-x="-960""#));
    }
}
