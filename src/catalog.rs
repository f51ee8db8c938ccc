//! Static discipline catalog shipped with the binary.

use serde::{Deserialize, Serialize};

static SEED: &str = include_str!("../data/disciplines.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Materials {
    pub videos: u32,
    pub pdfs: u32,
    pub questions: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discipline {
    pub id: String,
    pub name: String,
    /// Examining board that sets the exam.
    pub board: String,
    pub level: Level,
    pub duration_hours: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub materials: Materials,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    disciplines: Vec<Discipline>,
}

impl Catalog {
    pub fn seed() -> color_eyre::Result<Self> {
        let disciplines: Vec<Discipline> = serde_json::from_str(SEED)?;
        tracing::debug!("loaded {} disciplines into the catalog", disciplines.len());
        Ok(Self { disciplines })
    }

    pub fn all(&self) -> &[Discipline] {
        &self.disciplines
    }

    pub fn get(&self, id: &str) -> Option<&Discipline> {
        self.disciplines.iter().find(|d| d.id == id)
    }

    /// Display name for a discipline id, falling back to the id itself for
    /// disciplines that are not in the catalog.
    pub fn name_of<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map(|d| d.name.as_str()).unwrap_or(id)
    }

    pub fn filter(&self, level: Option<Level>, tag: Option<&str>) -> Vec<&Discipline> {
        self.disciplines
            .iter()
            .filter(|d| level.map_or(true, |l| d.level == l))
            .filter(|d| tag.map_or(true, |t| d.tags.iter().any(|x| x.eq_ignore_ascii_case(t))))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_parses_and_ids_are_unique() {
        let catalog = Catalog::seed().unwrap();
        assert!(!catalog.all().is_empty());

        let mut ids: Vec<&str> = catalog.all().iter().map(|d| d.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), catalog.all().len());
    }

    #[test]
    fn filter_by_level_and_tag() {
        let catalog = Catalog::seed().unwrap();

        let beginners = catalog.filter(Some(Level::Beginner), None);
        assert!(!beginners.is_empty());
        assert!(beginners.iter().all(|d| d.level == Level::Beginner));

        let processual = catalog.filter(None, Some("PROCESSUAL"));
        assert!(processual.iter().all(|d| d.tags.iter().any(|t| t == "processual")));
        assert_eq!(processual.len(), 2);
    }

    #[test]
    fn unknown_discipline_name_falls_back_to_id() {
        let catalog = Catalog::seed().unwrap();
        assert_eq!(catalog.name_of("civil"), "Direito Civil");
        assert_eq!(catalog.name_of("maritimo"), "maritimo");
    }
}
