//! The JSON document stored under a cache key.

use chrono::Local;
use serde::Serialize;

const ACCESSED_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Pass-through metadata describing where the data came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Provenance {
    pub source: String,
    pub link: String,
    pub license: String,
    pub info: String,
}

impl Provenance {
    pub fn new(source: &str, link: &str, license: &str, info: &str) -> Self {
        Provenance {
            source: source.to_string(),
            link: link.to_string(),
            license: license.to_string(),
            info: info.to_string(),
        }
    }

    /// Replaces each field for which an override is given.
    pub fn with_overrides(mut self, overrides: &ProvenanceOverrides) -> Self {
        let fields = [
            (&mut self.source, &overrides.source),
            (&mut self.link, &overrides.link),
            (&mut self.license, &overrides.license),
            (&mut self.info, &overrides.info),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                field.clone_from(value);
            }
        }
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProvenanceOverrides {
    pub source: Option<String>,
    pub link: Option<String>,
    pub license: Option<String>,
    pub info: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document<T> {
    #[serde(flatten)]
    pub provenance: Provenance,
    pub accessed: String,
    pub data: T,
}

impl<T: Serialize> Document<T> {
    pub fn new(provenance: Provenance, accessed: String, data: T) -> Self {
        Document {
            provenance,
            accessed,
            data,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Local time stamp for the `accessed` field.
pub fn accessed_now() -> String {
    Local::now().format(ACCESSED_FORMAT).to_string()
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn should_flatten_provenance() {
        let doc = Document::new(
            Provenance::new("JHU CSSE", "https://example.org", "", "info"),
            "2020-04-01 10:00".to_string(),
            vec![1, 2],
        );

        let value: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();

        assert_eq!(value["source"], "JHU CSSE");
        assert_eq!(value["link"], "https://example.org");
        assert_eq!(value["license"], "");
        assert_eq!(value["accessed"], "2020-04-01 10:00");
        assert_eq!(value["data"][1], 2);
    }

    #[test]
    fn should_apply_overrides() {
        let overrides = ProvenanceOverrides {
            source: Some("custom".to_string()),
            ..ProvenanceOverrides::default()
        };

        let provenance = Provenance::new("a", "b", "c", "d").with_overrides(&overrides);

        assert_eq!(provenance.source, "custom");
        assert_eq!(provenance.link, "b");
    }

    #[test]
    fn should_format_access_time() {
        let accessed = accessed_now();
        assert_eq!(accessed.len(), "2020-04-01 10:00".len());
    }
}
