//! Lifecycle classification: which market stage a trend is in.
//!
//! Velocity metadata from the trend-velocity adapter is the strongest
//! signal when present; otherwise the stage falls back to the recency
//! of the newest contributing item and the corroboration count.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use trendscope_core::{LifecycleInfo, LifecycleStage, LifecycleTrend};

/// Velocity at or above which a trend is accelerating.
const VELOCITY_GROWING: f64 = 1.5;
/// Velocity at or below which a trend is losing steam.
const VELOCITY_DECLINING: f64 = -0.5;

/// Classify each trend in place and report the stage distribution.
pub fn detect_lifecycle(trends: &mut [LifecycleTrend], now: DateTime<Utc>) {
    let mut distribution: BTreeMap<&'static str, usize> = BTreeMap::new();
    for trend in trends.iter_mut() {
        let stage = classify(trend, now);
        *distribution.entry(stage.label()).or_insert(0) += 1;
        trend.lifecycle = LifecycleInfo {
            stage,
            stage_label: stage.label().to_string(),
        };
    }
    tracing::info!(?distribution, "lifecycle stage distribution");
}

fn classify(trend: &LifecycleTrend, now: DateTime<Utc>) -> LifecycleStage {
    let item = &trend.trend.trend.item;
    let sources = trend.trend.trend.corroborating_sources.len();

    if let Some(&velocity) = item.metadata.get("trend_velocity") {
        if velocity >= VELOCITY_GROWING {
            return if sources >= 4 {
                LifecycleStage::Peak
            } else {
                LifecycleStage::Growing
            };
        }
        if velocity <= VELOCITY_DECLINING {
            return LifecycleStage::Declining;
        }
    }

    let Some(published) = item.published_at else {
        // Undated items tend to be evergreen reference content.
        return LifecycleStage::Evergreen;
    };
    let age_days = (now - published).num_days();

    if age_days <= 14 {
        if sources >= 3 {
            LifecycleStage::Growing
        } else {
            LifecycleStage::Emerging
        }
    } else if age_days <= 60 {
        if sources >= 4 {
            LifecycleStage::Peak
        } else {
            LifecycleStage::Growing
        }
    } else if age_days <= 180 {
        if sources >= 2 {
            LifecycleStage::Peak
        } else {
            LifecycleStage::Declining
        }
    } else if sources >= 2 {
        LifecycleStage::Evergreen
    } else {
        LifecycleStage::Declining
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::collections::BTreeSet;
    use trendscope_core::{
        QueryIntent, RawTrendItem, RelevanceScore, ScoredTrend, ValidatedTrend,
    };

    fn trend(age_days: i64, sources: usize, velocity: Option<f64>) -> LifecycleTrend {
        let mut item = RawTrendItem::new(
            "news",
            "t".to_string(),
            String::new(),
            None,
            Some(Utc::now() - Duration::days(age_days)),
            QueryIntent::Trend,
        );
        if let Some(v) = velocity {
            item.metadata.insert("trend_velocity".to_string(), v);
        }
        let corroborating_sources: BTreeSet<String> =
            (0..sources).map(|i| format!("s{i}")).collect();
        LifecycleTrend {
            trend: ScoredTrend {
                trend: ValidatedTrend {
                    item,
                    is_validated: sources >= 2,
                    validation_score: 64.0,
                    corroborating_sources,
                },
                relevance: RelevanceScore {
                    overall: 50.0,
                    breakdown: BTreeMap::new(),
                    matched_keywords: vec![],
                    passes_core_function_check: false,
                },
                is_relevant: true,
            },
            eq_adjusted_score: 50.0,
            lifecycle: LifecycleInfo {
                stage: LifecycleStage::Emerging,
                stage_label: String::new(),
            },
        }
    }

    fn stage_of(t: LifecycleTrend) -> LifecycleStage {
        let mut trends = vec![t];
        detect_lifecycle(&mut trends, Utc::now());
        trends[0].lifecycle.stage
    }

    #[test]
    fn velocity_beats_recency() {
        assert_eq!(stage_of(trend(300, 2, Some(2.0))), LifecycleStage::Growing);
        assert_eq!(stage_of(trend(5, 2, Some(-1.0))), LifecycleStage::Declining);
    }

    #[test]
    fn fresh_single_source_is_emerging() {
        assert_eq!(stage_of(trend(3, 1, None)), LifecycleStage::Emerging);
    }

    #[test]
    fn widely_corroborated_mid_age_is_peak() {
        assert_eq!(stage_of(trend(45, 4, None)), LifecycleStage::Peak);
    }

    #[test]
    fn old_corroborated_is_evergreen() {
        assert_eq!(stage_of(trend(400, 3, None)), LifecycleStage::Evergreen);
    }

    #[test]
    fn old_lonely_is_declining() {
        assert_eq!(stage_of(trend(400, 1, None)), LifecycleStage::Declining);
    }

    #[test]
    fn stage_label_is_attached() {
        let mut trends = vec![trend(3, 1, None)];
        detect_lifecycle(&mut trends, Utc::now());
        assert!(!trends[0].lifecycle.stage_label.is_empty());
    }
}
