use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Immutable description of the business a pipeline run works for.
///
/// Source of every keyword set used downstream: the scorer's dimensions,
/// the router's signals, and the trigger matcher's customer triggers are
/// all derived from these fields. Created once per run; never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessProfile {
    /// Stable identity; cache entries are keyed by this.
    pub business_id: String,
    pub business_name: String,
    pub industry: String,
    /// Natural-language statement of who buys, e.g. "facilities managers
    /// at mid-size commercial properties".
    pub target_customer: String,
    #[serde(default)]
    pub pain_points: Vec<String>,
    #[serde(default)]
    pub differentiators: Vec<String>,
    pub products: Vec<String>,
    /// Natural-language statement of what the product fundamentally does.
    /// Drives the core-function relevance check and outcome queries.
    pub core_function: Option<String>,
    /// Market reach / business-model cues, e.g. "local", "saas", "b2b".
    #[serde(default)]
    pub market_signals: Vec<String>,
    #[serde(default)]
    pub emotional_drivers: Vec<String>,
    #[serde(default)]
    pub functional_drivers: Vec<String>,
    pub service_area: Option<String>,
    /// Optional override for the category's default emotional quotient.
    pub emotional_quotient: Option<u8>,
}

impl BusinessProfile {
    /// Check the profile is fully populated enough to run the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_empty = [
            ("business_id", &self.business_id),
            ("business_name", &self.business_name),
            ("industry", &self.industry),
            ("target_customer", &self.target_customer),
        ];
        for (field, value) in non_empty {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "profile field {field} must be non-empty"
                )));
            }
        }
        if self.products.iter().all(|p| p.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "profile must list at least one product or service".to_string(),
            ));
        }
        if let Some(eq) = self.emotional_quotient {
            if eq > 100 {
                return Err(ConfigError::Validation(format!(
                    "emotional_quotient must be 0-100, got {eq}"
                )));
            }
        }
        Ok(())
    }
}

/// Load and validate a business profile from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_profile(path: &Path) -> Result<BusinessProfile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProfileFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    let profile: BusinessProfile =
        serde_yaml::from_str(&content).map_err(ConfigError::ProfileFileParse)?;
    profile.validate()?;
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BusinessProfile {
        BusinessProfile {
            business_id: "acme-hvac".to_string(),
            business_name: "Acme HVAC".to_string(),
            industry: "HVAC services".to_string(),
            target_customer: "homeowners in the metro area".to_string(),
            pain_points: vec!["high energy bills".to_string()],
            differentiators: vec!["24/7 emergency response".to_string()],
            products: vec!["furnace repair".to_string()],
            core_function: Some("repair and maintain home heating systems".to_string()),
            market_signals: vec!["local".to_string(), "service".to_string()],
            emotional_drivers: vec!["comfort".to_string(), "safety".to_string()],
            functional_drivers: vec!["fast response".to_string()],
            service_area: Some("Springfield metro".to_string()),
            emotional_quotient: None,
        }
    }

    #[test]
    fn valid_profile_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn empty_business_id_fails() {
        let mut p = sample();
        p.business_id = "  ".to_string();
        let err = p.validate().unwrap_err();
        assert!(err.to_string().contains("business_id"));
    }

    #[test]
    fn no_products_fails() {
        let mut p = sample();
        p.products = vec![String::new()];
        assert!(p.validate().is_err());
    }

    #[test]
    fn out_of_range_eq_fails() {
        let mut p = sample();
        p.emotional_quotient = Some(120);
        assert!(p.validate().is_err());
    }

    #[test]
    fn profile_round_trips_through_yaml() {
        let yaml = serde_yaml::to_string(&sample()).unwrap();
        let back: BusinessProfile = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.business_id, "acme-hvac");
        assert_eq!(back.pain_points.len(), 1);
    }
}
