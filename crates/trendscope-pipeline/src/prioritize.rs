//! EQ prioritization: re-rank scored trends by blending relevance with
//! emotional-driver keyword density.
//!
//! The industry's emotional quotient (0-100, high = emotionally-driven
//! buying) controls how much the emotional signal moves the ranking.
//! This stage reorders only; nothing is dropped.

use trendscope_core::{BusinessProfile, LifecycleInfo, LifecycleStage, LifecycleTrend, ScoredTrend};

use crate::text::{keyword_matches, token_set};

/// Portion of the blend the emotional signal can claim at EQ = 100.
const MAX_EMOTIONAL_WEIGHT: f64 = 0.4;

/// Re-rank the pool by EQ-adjusted score, descending, with a stable id
/// tie-break. The lifecycle slot is filled with a placeholder; the
/// lifecycle detector overwrites it in the next stage.
#[must_use]
pub fn prioritize_trends(
    trends: Vec<ScoredTrend>,
    profile: &BusinessProfile,
    default_eq: u8,
) -> Vec<LifecycleTrend> {
    let eq = profile.emotional_quotient.unwrap_or(default_eq).min(100);
    let weight = f64::from(eq) / 100.0 * MAX_EMOTIONAL_WEIGHT;

    let mut prioritized: Vec<LifecycleTrend> = trends
        .into_iter()
        .map(|trend| {
            let density = emotional_density(&trend, &profile.emotional_drivers);
            let eq_adjusted_score = trend.relevance.overall * (1.0 - weight) + density * weight;
            LifecycleTrend {
                trend,
                eq_adjusted_score,
                lifecycle: LifecycleInfo {
                    stage: LifecycleStage::Emerging,
                    stage_label: LifecycleStage::Emerging.label().to_string(),
                },
            }
        })
        .collect();

    prioritized.sort_by(|a, b| {
        b.eq_adjusted_score
            .partial_cmp(&a.eq_adjusted_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id().cmp(b.id()))
    });

    tracing::debug!(eq, count = prioritized.len(), "eq prioritization complete");
    prioritized
}

/// Matched emotional-driver count scaled to 0-100: each matched driver
/// contributes 34 points, saturating at three.
fn emotional_density(trend: &ScoredTrend, emotional_drivers: &[String]) -> f64 {
    if emotional_drivers.is_empty() {
        return 0.0;
    }
    let text = trend.trend.item.text().to_lowercase();
    let tokens = token_set(&text);
    let matched = emotional_drivers
        .iter()
        .filter(|kw| keyword_matches(&text, &tokens, kw))
        .count();
    #[allow(clippy::cast_precision_loss)]
    {
        (matched as f64 * 34.0).min(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use trendscope_core::{QueryIntent, RawTrendItem, RelevanceScore, ValidatedTrend};

    fn profile(eq: Option<u8>) -> BusinessProfile {
        BusinessProfile {
            business_id: "b".to_string(),
            business_name: "B".to_string(),
            industry: "plumbing".to_string(),
            target_customer: "homeowners".to_string(),
            pain_points: vec![],
            differentiators: vec![],
            products: vec![],
            core_function: None,
            market_signals: vec![],
            emotional_drivers: vec!["peace of mind".to_string(), "trust".to_string()],
            functional_drivers: vec![],
            service_area: None,
            emotional_quotient: eq,
        }
    }

    fn scored(title: &str, overall: f64) -> ScoredTrend {
        ScoredTrend {
            trend: ValidatedTrend {
                item: RawTrendItem::new(
                    "news",
                    title.to_string(),
                    String::new(),
                    None,
                    None,
                    QueryIntent::Trend,
                ),
                is_validated: true,
                validation_score: 64.0,
                corroborating_sources: ["news".to_string()].into(),
            },
            relevance: RelevanceScore {
                overall,
                breakdown: BTreeMap::new(),
                matched_keywords: vec![],
                passes_core_function_check: false,
            },
            is_relevant: true,
        }
    }

    #[test]
    fn reorders_without_dropping() {
        let trends = vec![scored("a", 50.0), scored("b", 60.0), scored("c", 40.0)];
        let out = prioritize_trends(trends, &profile(Some(50)), 50);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn zero_eq_preserves_relevance_order() {
        let trends = vec![
            scored("trust and peace of mind restored", 40.0),
            scored("boring topic", 60.0),
        ];
        let out = prioritize_trends(trends, &profile(Some(0)), 70);
        assert!((out[0].eq_adjusted_score - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn high_eq_promotes_emotionally_loaded_trends() {
        let trends = vec![
            scored("trust and peace of mind for homeowners", 50.0),
            scored("quarterly report on fittings", 55.0),
        ];
        let out = prioritize_trends(trends, &profile(Some(100)), 50);
        assert!(out[0].trend.trend.item.title.contains("peace of mind"));
    }

    #[test]
    fn profile_eq_overrides_category_default() {
        let trends = vec![scored("trust wins customers", 20.0)];
        let with_override = prioritize_trends(trends.clone(), &profile(Some(100)), 0);
        let with_default = prioritize_trends(trends, &profile(None), 0);
        assert!(with_override[0].eq_adjusted_score > with_default[0].eq_adjusted_score);
    }
}
