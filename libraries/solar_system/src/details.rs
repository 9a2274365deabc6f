use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const NO_DETAILS: &str = "No details available.";

const BUILTIN_DETAILS: [(&str, &str); 8] = [
    (
        "Mercury",
        "The smallest planet and the closest to the Sun. Mercury has almost no atmosphere, so \
         its surface swings from scorching days to freezing nights.",
    ),
    (
        "Venus",
        "Wrapped in thick clouds of sulfuric acid, Venus traps heat so well that it is the \
         hottest planet in the solar system. It spins backwards compared to most planets.",
    ),
    (
        "Earth",
        "Our home planet, and the only world known to harbor life. Liquid water covers about \
         seventy percent of its surface.",
    ),
    (
        "Mars",
        "Known as the \"Red Planet\", Mars owes its color to iron oxide dust. It hosts Olympus \
         Mons, the tallest volcano in the solar system, and two small moons.",
    ),
    (
        "Jupiter",
        "The largest planet, a gas giant more than twice as massive as all the others combined. \
         Its Great Red Spot is a storm larger than Earth.",
    ),
    (
        "Saturn",
        "Famous for its bright ring system of ice and rock. Saturn is the least dense planet; \
         it would float in a large enough bath.",
    ),
    (
        "Uranus",
        "An ice giant tipped on its side, so each pole faces the Sun for decades at a time. \
         Methane in its atmosphere gives it a pale cyan color.",
    ),
    (
        "Neptune",
        "The farthest planet from the Sun, a deep blue ice giant swept by the fastest winds \
         measured in the solar system.",
    ),
];

/// Image shown next to a body's description.
pub fn image_path_for(name: &str) -> String {
    format!("images/{}.png", name.to_lowercase())
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DetailEntry {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Descriptive text for bodies, keyed by exact name.
#[derive(Debug, Clone, Default)]
pub struct DetailCatalog {
    entries: HashMap<String, DetailEntry>,
}

impl DetailCatalog {
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_DETAILS
                .iter()
                .map(|(name, description)| {
                    (
                        name.to_string(),
                        DetailEntry {
                            description: description.to_string(),
                            image: None,
                        },
                    )
                })
                .collect(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: DetailEntry) {
        self.entries.insert(name.into(), entry);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn description(&self, name: &str) -> &str {
        self.entries
            .get(name)
            .map(|entry| entry.description.as_str())
            .unwrap_or(NO_DETAILS)
    }

    pub fn image_path(&self, name: &str) -> String {
        self.entries
            .get(name)
            .and_then(|entry| entry.image.clone())
            .unwrap_or_else(|| image_path_for(name))
    }
}

impl Extend<(String, DetailEntry)> for DetailCatalog {
    fn extend<T: IntoIterator<Item = (String, DetailEntry)>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}

/// The side panel describing the last picked body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailPanel {
    visible: bool,
    title: String,
    text: String,
    image: String,
}

impl DetailPanel {
    /// Fills the panel for `name` and opens it, falling back to placeholder text for unknown
    /// bodies.
    pub fn show_details(&mut self, catalog: &DetailCatalog, name: &str) {
        self.title = name.to_string();
        self.text = catalog.description(name).to_string();
        self.image = catalog.image_path(name);
        self.visible = true;
    }

    pub fn hide_details(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn image(&self) -> &str {
        &self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mars_has_description() {
        let mut panel = DetailPanel::default();
        panel.show_details(&DetailCatalog::builtin(), "Mars");
        assert!(panel.is_visible());
        assert_eq!(panel.title(), "Mars");
        assert!(panel.text().starts_with("Known as the \"Red Planet\""));
        assert_eq!(panel.image(), "images/mars.png");
    }

    #[test]
    fn unknown_body_shows_placeholder() {
        let mut panel = DetailPanel::default();
        panel.show_details(&DetailCatalog::builtin(), "Moon");
        assert!(panel.is_visible());
        assert_eq!(panel.text(), NO_DETAILS);
        assert_eq!(panel.image(), "images/moon.png");
    }

    #[test]
    fn hiding_is_idempotent() {
        let mut panel = DetailPanel::default();
        panel.hide_details();
        assert!(!panel.is_visible());
        panel.show_details(&DetailCatalog::builtin(), "Earth");
        panel.hide_details();
        panel.hide_details();
        assert!(!panel.is_visible());
    }

    #[test]
    fn catalog_overrides_replace_builtin_text() {
        let mut catalog = DetailCatalog::builtin();
        catalog.insert(
            "Earth",
            DetailEntry {
                description: "Mostly harmless.".into(),
                image: Some("images/blue-marble.png".into()),
            },
        );
        assert_eq!(catalog.description("Earth"), "Mostly harmless.");
        assert_eq!(catalog.image_path("Earth"), "images/blue-marble.png");
        assert!(catalog.contains("Neptune"));
    }
}
