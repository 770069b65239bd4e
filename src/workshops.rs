use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workshop {
    pub id: String,
    pub name: String,
    pub summary: String,
    pub location: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub specialties: Vec<String>,
}

/// Workshops listed on the site, in display order.
#[derive(Debug, Clone)]
pub struct Catalog {
    workshops: Vec<Workshop>,
}

impl Catalog {
    pub fn new(workshops: Vec<Workshop>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for workshop in &workshops {
            if workshop.id.trim().is_empty() {
                return Err(ConfigError::InvalidCatalog(format!(
                    "workshop \"{}\" has an empty id",
                    workshop.name
                )));
            }
            if !seen.insert(workshop.id.as_str()) {
                return Err(ConfigError::InvalidCatalog(format!(
                    "duplicate workshop id \"{}\"",
                    workshop.id
                )));
            }
        }
        Ok(Catalog { workshops })
    }

    /// Reads a JSON array of workshops.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::CatalogFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&raw).map_err(|e| match e {
            ConfigError::InvalidCatalog(reason) => ConfigError::CatalogFile {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let workshops: Vec<Workshop> =
            serde_json::from_str(raw).map_err(|e| ConfigError::InvalidCatalog(e.to_string()))?;
        Self::new(workshops)
    }

    pub fn builtin() -> Self {
        let workshop = |id: &str, name: &str, summary: &str, location: &str, featured: bool, specialties: &[&str]| Workshop {
            id: id.to_string(),
            name: name.to_string(),
            summary: summary.to_string(),
            location: location.to_string(),
            featured,
            specialties: specialties.iter().map(|s| s.to_string()).collect(),
        };

        Catalog {
            workshops: vec![
                workshop(
                    "confecciones-elite",
                    "Confecciones Elite",
                    "Tailored garments and uniforms produced in small and medium runs.",
                    "Lima",
                    true,
                    &["Uniforms", "Tailoring"],
                ),
                workshop(
                    "moda-andina",
                    "Moda Andina",
                    "Alpaca and cotton knitwear with traditional Andean patterns.",
                    "Cusco",
                    true,
                    &["Knitwear", "Alpaca"],
                ),
                workshop(
                    "textiles-del-sur",
                    "Textiles del Sur",
                    "Full-package production from pattern making to finishing.",
                    "Arequipa",
                    true,
                    &["Pattern making", "Finishing"],
                ),
                workshop(
                    "costura-creativa",
                    "Costura Creativa",
                    "Alterations and custom pieces for independent designers.",
                    "Trujillo",
                    false,
                    &["Alterations"],
                ),
                workshop(
                    "bordados-luna",
                    "Bordados Luna",
                    "Machine and hand embroidery for brands and events.",
                    "Piura",
                    false,
                    &["Embroidery"],
                ),
            ],
        }
    }

    pub fn all(&self) -> &[Workshop] {
        &self.workshops
    }

    pub fn find(&self, id: &str) -> Option<&Workshop> {
        self.workshops.iter().find(|w| w.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.workshops.iter().map(|w| w.id.as_str())
    }

    pub fn featured_ids(&self) -> impl Iterator<Item = &str> {
        self.workshops
            .iter()
            .filter(|w| w.featured)
            .map(|w| w.id.as_str())
    }
}
