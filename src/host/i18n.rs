use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Key-based text lookup supplied by the host.
pub trait Translator {
    fn t(&self, key: &str) -> String;
}

impl<F> Translator for F
where
    F: Fn(&str) -> String,
{
    fn t(&self, key: &str) -> String {
        self(key)
    }
}

/// Flat translation table. Missing keys translate to themselves.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub locale: String,
    pub entries: IndexMap<String, String>,
}

impl Catalog {
    #[must_use]
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            entries: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn english() -> Self {
        Self::new("en").with_entries([
            ("chart.preview", "{title} will render here"),
            ("getStarted.mapRegions.turkey", "Turkey"),
            ("getStarted.mapRegions.europe", "Europe"),
            ("getStarted.mapRegions.uk", "United Kingdom"),
        ])
    }

    #[must_use]
    pub fn turkish() -> Self {
        Self::new("tr").with_entries([
            ("chart.preview", "{title} burada görüntülenecek"),
            ("getStarted.mapRegions.turkey", "Türkiye"),
            ("getStarted.mapRegions.europe", "Avrupa"),
            ("getStarted.mapRegions.uk", "Birleşik Krallık"),
        ])
    }

    pub fn from_json(input: &str) -> serde_json::Result<Self> {
        serde_json::from_str(input)
    }

    #[must_use]
    pub fn with_entries<'k>(mut self, entries: impl IntoIterator<Item = (&'k str, &'k str)>) -> Self {
        for (key, value) in entries {
            self.insert(key, value);
        }
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }
}

impl Translator for Catalog {
    fn t(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_owned())
    }
}

/// Replaces `{name}` placeholders with the given values.
#[must_use]
pub fn interpolate(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_owned(), |text, (name, value)| {
            text.replace(&format!("{{{name}}}"), value)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MapRegion;

    #[test]
    fn missing_keys_fall_back_to_key() {
        let catalog = Catalog::english();
        assert_eq!(catalog.t("nope.missing"), "nope.missing");
        assert_eq!(catalog.t("getStarted.mapRegions.uk"), "United Kingdom");
    }

    #[test]
    fn interpolate_replaces_named_slots() {
        let text = interpolate(&Catalog::turkish().t("chart.preview"), &[("title", "Bar")]);
        assert_eq!(text, "Bar burada görüntülenecek");
    }

    #[test]
    fn region_switch_labels_are_translated() {
        let english = Catalog::english();
        let turkish = Catalog::turkish();
        let labels: Vec<(String, String)> = [MapRegion::Tr, MapRegion::Eu, MapRegion::Uk]
            .into_iter()
            .map(|region| (english.t(region.label_key()), turkish.t(region.label_key())))
            .collect();
        assert_eq!(
            labels,
            [
                ("Turkey".to_owned(), "Türkiye".to_owned()),
                ("Europe".to_owned(), "Avrupa".to_owned()),
                ("United Kingdom".to_owned(), "Birleşik Krallık".to_owned()),
            ]
        );
    }
}
