use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::Category;
use crate::ConfigError;

/// Built-in keyword pack document, compiled in so the pipeline works
/// without any files on disk. An on-disk copy can override it for tuning.
const BUILTIN_KEYWORDS_YAML: &str = include_str!("../config/keywords.yaml");

/// Gating and EQ data for one routing category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordPack {
    pub core_keywords: Vec<String>,
    pub negative_keywords: Vec<String>,
    /// Emotional quotient assumed for businesses in this category, 0-100.
    pub default_eq: u8,
}

#[derive(Debug, Deserialize)]
struct KeywordsFile {
    version: u32,
    categories: BTreeMap<Category, KeywordPack>,
}

/// All category keyword packs, validated on load.
#[derive(Debug, Clone)]
pub struct KeywordLibrary {
    version: u32,
    packs: BTreeMap<&'static str, KeywordPack>,
}

impl KeywordLibrary {
    /// Parse the compiled-in keyword pack document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` only if the built-in document is malformed,
    /// which indicates a packaging defect.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_yaml(BUILTIN_KEYWORDS_YAML)
    }

    /// Load keyword packs from a YAML file on disk.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or fails
    /// validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::KeywordsFileIo {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let file: KeywordsFile =
            serde_yaml::from_str(yaml).map_err(ConfigError::KeywordsFileParse)?;
        let mut packs = BTreeMap::new();
        for (category, pack) in file.categories {
            packs.insert(category.slug(), pack);
        }
        let library = Self {
            version: file.version,
            packs,
        };
        library.validate()?;
        Ok(library)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for category in Category::ALL {
            let Some(pack) = self.packs.get(category.slug()) else {
                return Err(ConfigError::Validation(format!(
                    "keywords file missing category {category}"
                )));
            };
            if pack.core_keywords.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "category {category} has no core keywords"
                )));
            }
            if pack.default_eq > 100 {
                return Err(ConfigError::Validation(format!(
                    "category {category} default_eq must be 0-100, got {}",
                    pack.default_eq
                )));
            }
        }
        Ok(())
    }

    /// The pack for a category. Validation guarantees every category is present.
    #[must_use]
    pub fn pack(&self, category: Category) -> &KeywordPack {
        &self.packs[category.slug()]
    }

    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }
}
