use std::collections::HashSet;
use std::io::Read;

use serde::{Deserialize, Serialize};

/// A required output image and the keywords that make a file a good fit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub target_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Slot {
    pub fn new<I, S>(
        target_name: impl Into<String>,
        description: impl Into<String>,
        keywords: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            target_name: target_name.into(),
            description: description.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("slot names must not be empty")]
    EmptySlotName,
    #[error("slot '{0}' is declared more than once")]
    DuplicateSlot(String),
    #[error("invalid slot catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Ordered set of hero slots. Slot order is significant: earlier slots pick
/// from a larger pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SlotCatalog {
    slots: Vec<Slot>,
}

impl SlotCatalog {
    pub fn new(slots: Vec<Slot>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for slot in &slots {
            if slot.target_name.trim().is_empty() {
                return Err(CatalogError::EmptySlotName);
            }
            if !seen.insert(slot.target_name.as_str()) {
                return Err(CatalogError::DuplicateSlot(slot.target_name.clone()));
            }
        }
        Ok(Self { slots })
    }

    /// Reads a JSON array of `{ "target_name", "description", "keywords" }`.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let slots: Vec<Slot> = serde_json::from_reader(reader)?;
        Self::new(slots)
    }

    /// The three hero files the portal templates expect.
    pub fn standard() -> Self {
        Self {
            slots: vec![
                Slot::new(
                    "hero-paraiba.jpg",
                    "Hero da página inicial (1920x600px recomendado)",
                    ["praia", "paisagem", "vista", "aerea", "cidade", "coast", "beach"],
                ),
                Slot::new(
                    "hero-interno-paraiba.jpg",
                    "Hero das páginas internas (1920x400px recomendado)",
                    ["paisagem", "urbana", "cidade", "arquitetura", "centro"],
                ),
                Slot::new(
                    "sobre-paraiba.jpg",
                    "Imagem da página Sobre (600x400px recomendado)",
                    ["paisagem", "cultura", "turismo", "ponto", "turistico"],
                ),
            ],
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
