pub mod xml;

use std::path::Path;

use serde::Serialize;

use crate::error::AppError;

/// Number of catalog recipes shown on the home view.
pub const FEATURED_COUNT: usize = 4;

/// One illustrated cooking step of an official recipe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManualStep {
    pub image: String,
    pub text: String,
}

/// Nutrition facts as published; values are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Nutrition {
    pub calories: Option<String>,
    pub protein: Option<String>,
    pub fat: Option<String>,
    pub sodium: Option<String>,
}

/// A recipe from the official dataset. Never persisted, never modified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfficialRecipe {
    pub id: String,
    pub name: String,
    pub image: String,
    /// Free-text ingredient list.
    pub ingredients: String,
    pub manual: Vec<ManualStep>,
    pub nutrition: Nutrition,
}

/// The official recipe catalog, parsed once and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    recipes: Vec<OfficialRecipe>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(recipes: Vec<OfficialRecipe>) -> Self {
        Self { recipes }
    }

    pub fn from_xml(xml: &str) -> Result<Self, AppError> {
        Ok(Self::new(xml::parse_catalog(xml)?))
    }

    /// Read and parse the catalog file at `path`.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::Catalog(format!("Failed to read '{}': {}", path.display(), e))
        })?;

        let catalog = Self::from_xml(&raw)?;
        tracing::info!(recipes = catalog.len(), "Loaded recipe catalog from {}", path.display());
        Ok(catalog)
    }

    /// Load the catalog, falling back to an empty one when the file is
    /// missing or malformed.
    pub async fn load_or_empty(path: impl AsRef<Path>) -> Self {
        match Self::load(path).await {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!("Recipe catalog unavailable, continuing without it: {e}");
                Self::empty()
            }
        }
    }

    /// All recipes, in dataset order.
    pub fn list(&self) -> &[OfficialRecipe] {
        &self.recipes
    }

    pub fn find(&self, id: &str) -> Option<&OfficialRecipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    /// The first few recipes, for the home view.
    pub fn featured(&self) -> &[OfficialRecipe] {
        &self.recipes[..self.recipes.len().min(FEATURED_COUNT)]
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
