//! Population and region lookup, loaded from a JSON asset.
//!
//! The default table is embedded from `data/world-population.json`; a
//! replacement with the same layout can be loaded from disk.

use std::{collections::HashMap, fs, path::Path};

use serde::Deserialize;

use crate::error::PopulationError;

const EMBEDDED_TABLE: &str = include_str!("../data/world-population.json");

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CountryRecord {
    pub name: String,
    /// Number of inhabitants.
    pub population: u64,
    #[serde(default)]
    pub region: Option<String>,
}

impl CountryRecord {
    /// Population in millions, rounded down to two decimals.
    pub fn millions(&self) -> f64 {
        (100.0 * self.population as f64 / 1_000_000.0).floor() / 100.0
    }
}

#[derive(Debug, Deserialize)]
struct TableFile {
    regions: Vec<String>,
    countries: Vec<CountryRecord>,
    #[serde(default)]
    aliases: HashMap<String, String>,
    #[serde(default)]
    merges: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct PopulationTable {
    regions: Vec<String>,
    countries: Vec<CountryRecord>,
    index: HashMap<String, usize>,
    /// Alternative spellings of the same country.
    aliases: HashMap<String, String>,
    /// Territories reported under another country.
    merges: HashMap<String, String>,
}

impl PopulationTable {
    pub fn embedded() -> Result<Self, PopulationError> {
        Self::from_json(EMBEDDED_TABLE)
    }

    pub fn from_path(path: &Path) -> Result<Self, PopulationError> {
        let json = fs::read_to_string(path).map_err(|source| PopulationError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, PopulationError> {
        let file: TableFile = serde_json::from_str(json)?;

        let mut index = HashMap::new();
        for (i, country) in file.countries.iter().enumerate() {
            if index.insert(country.name.clone(), i).is_some() {
                return Err(PopulationError::Duplicate {
                    name: country.name.clone(),
                });
            }
        }

        for (alias, target) in file.aliases.iter().chain(file.merges.iter()) {
            let resolved = file.aliases.get(target).unwrap_or(target);
            if !index.contains_key(resolved) {
                return Err(PopulationError::DanglingAlias {
                    alias: alias.clone(),
                    target: target.clone(),
                });
            }
        }

        Ok(PopulationTable {
            regions: file.regions,
            countries: file.countries,
            index,
            aliases: file.aliases,
            merges: file.merges,
        })
    }

    /// Resolves alternative spellings ("Burma" -> "Myanmar").
    pub fn canonical_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }

    /// Like [`canonical_name`](Self::canonical_name), but also folds
    /// territories into the country they are reported under.
    pub fn reporting_name<'a>(&'a self, name: &'a str) -> &'a str {
        let name = self.canonical_name(name);
        match self.merges.get(name) {
            Some(target) => self.canonical_name(target),
            None => name,
        }
    }

    pub fn get(&self, name: &str) -> Option<&CountryRecord> {
        self.index
            .get(self.canonical_name(name))
            .map(|&i| &self.countries[i])
    }

    /// Region names used for roll-ups, in display order.
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn is_region(&self, name: &str) -> bool {
        self.regions.iter().any(|r| r == name)
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use super::*;

    fn table() -> PopulationTable {
        PopulationTable::embedded().unwrap()
    }

    fn population(table: &PopulationTable, name: &str) -> Option<u64> {
        table.get(name).map(|c| c.population)
    }

    fn members<'a>(table: &'a PopulationTable, region: &str) -> Vec<&'a str> {
        table
            .countries
            .iter()
            .filter(|c| c.region.as_deref() == Some(region))
            .map(|c| c.name.as_str())
            .collect()
    }

    #[test]
    fn should_load_embedded_table() {
        let table = table();

        assert!(table.len() > 200);
        assert_eq!(table.regions().len(), 6);
        assert_eq!(population(&table, "Norway"), Some(5378857));
        assert_eq!(population(&table, "Cote d'Ivoire"), Some(25716544));
    }

    #[test]
    fn should_resolve_aliases() {
        let table = table();

        assert_eq!(table.canonical_name("Burma"), "Myanmar");
        assert_eq!(table.canonical_name("United Kingdom"), "UK");
        assert_eq!(table.canonical_name("Taiwan*"), "Taiwan");
        assert_eq!(table.canonical_name("Random String"), "Random String");
        assert_eq!(population(&table, "Burma"), population(&table, "Myanmar"));
    }

    #[test]
    fn should_fold_reported_territories() {
        let table = table();

        assert_eq!(table.reporting_name("San Marino"), "Italy");
        assert_eq!(table.reporting_name("Vatican City"), "Italy");
        assert_eq!(table.reporting_name("Norway"), "Norway");
        assert_eq!(table.canonical_name("San Marino"), "San Marino");
    }

    #[test]
    fn should_return_none_for_unknown_country() {
        let table = table();

        assert_eq!(population(&table, "Random String"), None);
        assert_eq!(table.get("U.S. Virgin Islands").and_then(|c| c.region.as_deref()), None);
        assert!(table.get("U.S. Virgin Islands").is_some());
    }

    #[test]
    fn should_list_region_members() {
        let table = table();
        let asia = members(&table, "Asia");
        let europe = members(&table, "Europe");

        assert!(asia.len() > 40 && asia.len() < 60);
        assert!(["Japan", "Thailand", "Brunei", "Nepal"].iter().all(|c| asia.contains(c)));
        assert!(["Norway", "UK", "France", "Estonia"].iter().all(|c| europe.contains(c)));
        assert_eq!(members(&table, "Jalla Jalla").len(), 0);
    }

    #[test]
    fn should_express_population_in_millions() {
        let norway = table().get("Norway").cloned().unwrap();
        assert_eq!(norway.millions(), 5.37);
    }

    #[test]
    fn should_reject_dangling_alias() {
        let json = r#"{"regions": [], "countries": [{"name": "A", "population": 1}],
                       "aliases": {"B": "C"}}"#;

        assert!(matches!(
            PopulationTable::from_json(json),
            Err(PopulationError::DanglingAlias { .. })
        ));
    }

    #[test]
    fn should_reject_duplicate_country() {
        let json = r#"{"regions": [], "countries": [
                        {"name": "A", "population": 1}, {"name": "A", "population": 2}]}"#;

        assert!(matches!(
            PopulationTable::from_json(json),
            Err(PopulationError::Duplicate { .. })
        ));
    }
}
