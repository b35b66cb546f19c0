//! Category routing: classifies a business into one of the closed set of
//! routing categories that select specialized source adapters.
//!
//! Deterministic by construction — pure rule scoring over cue words
//! extracted from the profile, no randomness, no I/O.

use trendscope_core::{BusinessProfile, Category, RoutedCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reach {
    Local,
    Regional,
    National,
}

const LOCAL_CUES: &[&str] = &[
    "local",
    "near me",
    "neighborhood",
    "city",
    "metro",
    "on-site",
    "house call",
];
const REGIONAL_CUES: &[&str] = &["regional", "statewide", "multi-city", "county"];
const NATIONAL_CUES: &[&str] = &[
    "national",
    "nationwide",
    "global",
    "online",
    "saas",
    "ecommerce",
    "remote",
];

const B2B_CUES: &[&str] = &[
    "b2b",
    "business",
    "businesses",
    "companies",
    "enterprise",
    "commercial",
    "agency",
    "agencies",
    "managers",
    "professionals",
    "teams",
    "contractors",
];
const B2C_CUES: &[&str] = &[
    "b2c",
    "consumer",
    "consumers",
    "homeowner",
    "homeowners",
    "families",
    "shoppers",
    "individuals",
    "residential",
    "household",
];

const SERVICE_CUES: &[&str] = &[
    "service",
    "services",
    "repair",
    "maintenance",
    "installation",
    "consulting",
    "cleaning",
];
const AGENCY_CUES: &[&str] = &["agency", "marketing", "studio", "consultancy", "campaigns"];
const SAAS_CUES: &[&str] = &["saas", "software", "platform", "app", "api", "automation"];
const RETAIL_CUES: &[&str] = &["retail", "store", "shop", "ecommerce", "boutique", "merchandise"];

/// Route a profile to its category with a confidence score and the cue
/// words that drove the decision. Same profile signals, same category.
#[must_use]
pub fn route_category(profile: &BusinessProfile) -> RoutedCategory {
    let haystack = signal_text(profile);
    let mut signals = Vec::new();

    let local_hits = collect_hits(&haystack, LOCAL_CUES, &mut signals);
    let regional_hits = collect_hits(&haystack, REGIONAL_CUES, &mut signals);
    let national_hits = collect_hits(&haystack, NATIONAL_CUES, &mut signals);

    // Service-area presence is itself a locality signal.
    let local_hits = if profile.service_area.is_some() {
        signals.push("service_area".to_string());
        local_hits + 1
    } else {
        local_hits
    };

    let reach = if national_hits > local_hits && national_hits >= regional_hits {
        Reach::National
    } else if local_hits >= regional_hits && local_hits > 0 {
        Reach::Local
    } else if regional_hits > 0 {
        Reach::Regional
    } else {
        // No reach cues at all: assume the widest market.
        Reach::National
    };

    let b2b_hits = collect_hits(&haystack, B2B_CUES, &mut signals);
    let b2c_hits = collect_hits(&haystack, B2C_CUES, &mut signals);
    let is_b2b = b2b_hits > b2c_hits;

    let service_hits = collect_hits(&haystack, SERVICE_CUES, &mut signals);
    let agency_hits = collect_hits(&haystack, AGENCY_CUES, &mut signals);
    let saas_hits = collect_hits(&haystack, SAAS_CUES, &mut signals);
    let retail_hits = collect_hits(&haystack, RETAIL_CUES, &mut signals);

    let category = match reach {
        Reach::Local => {
            if is_b2b {
                Category::LocalB2bService
            } else {
                Category::LocalB2cService
            }
        }
        Reach::Regional => {
            if is_b2b && agency_hits >= retail_hits {
                Category::RegionalB2bAgency
            } else {
                Category::RegionalB2cRetail
            }
        }
        Reach::National => {
            if is_b2b || saas_hits > retail_hits + service_hits {
                Category::NationalSaasB2b
            } else {
                Category::NationalProductB2c
            }
        }
    };

    // More corroborating cues, more confidence; floor keeps the default
    // route honest about its uncertainty.
    let confidence = f64::min(1.0, 0.4 + 0.06 * signals_count(&signals));

    RoutedCategory {
        category,
        confidence,
        signals,
    }
}

fn signal_text(profile: &BusinessProfile) -> String {
    let mut parts = vec![
        profile.industry.clone(),
        profile.target_customer.clone(),
    ];
    parts.extend(profile.market_signals.iter().cloned());
    parts.extend(profile.products.iter().cloned());
    if let Some(area) = &profile.service_area {
        parts.push(area.clone());
    }
    parts.join(" ").to_lowercase()
}

fn collect_hits(haystack: &str, cues: &[&str], signals: &mut Vec<String>) -> usize {
    let mut hits = 0;
    for cue in cues {
        if haystack.contains(cue) {
            hits += 1;
            signals.push((*cue).to_string());
        }
    }
    hits
}

#[allow(clippy::cast_precision_loss)]
fn signals_count(signals: &[String]) -> f64 {
    signals.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(industry: &str, customer: &str, signals: &[&str], area: Option<&str>) -> BusinessProfile {
        BusinessProfile {
            business_id: "test".to_string(),
            business_name: "Test Co".to_string(),
            industry: industry.to_string(),
            target_customer: customer.to_string(),
            pain_points: vec![],
            differentiators: vec![],
            products: vec!["widget".to_string()],
            core_function: None,
            market_signals: signals.iter().map(|s| (*s).to_string()).collect(),
            emotional_drivers: vec![],
            functional_drivers: vec![],
            service_area: area.map(str::to_string),
            emotional_quotient: None,
        }
    }

    #[test]
    fn local_hvac_routes_to_local_b2c_service() {
        let p = profile(
            "HVAC repair services",
            "homeowners in the metro area",
            &["local"],
            Some("Springfield"),
        );
        let routed = route_category(&p);
        assert_eq!(routed.category, Category::LocalB2cService);
        assert!(routed.signals.contains(&"local".to_string()));
    }

    #[test]
    fn commercial_contractor_routes_to_local_b2b_service() {
        let p = profile(
            "commercial electrical services",
            "facilities managers at commercial properties",
            &["local"],
            Some("Denver metro"),
        );
        assert_eq!(route_category(&p).category, Category::LocalB2bService);
    }

    #[test]
    fn saas_routes_to_national_saas_b2b() {
        let p = profile(
            "field service management software",
            "operations managers at trade companies",
            &["saas", "b2b", "national"],
            None,
        );
        assert_eq!(route_category(&p).category, Category::NationalSaasB2b);
    }

    #[test]
    fn dtc_brand_routes_to_national_product_b2c() {
        let p = profile(
            "specialty coffee ecommerce brand",
            "home coffee enthusiasts and consumers",
            &["online", "nationwide"],
            None,
        );
        assert_eq!(route_category(&p).category, Category::NationalProductB2c);
    }

    #[test]
    fn regional_agency_routes_to_regional_b2b_agency() {
        let p = profile(
            "marketing agency",
            "mid-size companies across the state",
            &["regional", "b2b"],
            None,
        );
        assert_eq!(route_category(&p).category, Category::RegionalB2bAgency);
    }

    #[test]
    fn regional_retail_routes_to_regional_b2c_retail() {
        let p = profile(
            "outdoor gear retail stores",
            "families and shoppers",
            &["regional"],
            None,
        );
        assert_eq!(route_category(&p).category, Category::RegionalB2cRetail);
    }

    #[test]
    fn routing_is_deterministic() {
        let p = profile(
            "field service management software",
            "operations managers",
            &["saas", "b2b"],
            None,
        );
        let a = route_category(&p);
        let b = route_category(&p);
        assert_eq!(a.category, b.category);
        assert_eq!(a.signals, b.signals);
        assert!((a.confidence - b.confidence).abs() < f64::EPSILON);
    }

    #[test]
    fn confidence_grows_with_signal_count() {
        let sparse = route_category(&profile("widgets", "people", &[], None));
        let rich = route_category(&profile(
            "saas software platform",
            "b2b enterprise teams",
            &["national", "saas", "b2b"],
            None,
        ));
        assert!(rich.confidence > sparse.confidence);
    }
}
