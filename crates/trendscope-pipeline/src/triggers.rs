//! Trigger matching: connect trends to the customer motivations that
//! make them worth writing about.
//!
//! Triggers are derived from the business profile across four
//! motivation categories. Each trend gets its best-matching trigger, a
//! suggested hook, and up to three content angles; a trend is
//! content-ready once it is validated, relevant, and matched strongly
//! enough.

use trendscope_core::{
    BusinessProfile, ContentMatch, CustomerTrigger, LifecycleStage, LifecycleTrend,
    TrendWithMatches, TriggerCategory, TriggerMatch,
};

use crate::text::{content_words, keyword_matches, token_set};

/// Minimum trigger-match strength for content readiness.
pub const MIN_TRIGGER_STRENGTH: f64 = 40.0;

const MAX_CONTENT_ANGLES: usize = 3;

/// Build the trigger set from the profile.
///
/// Pain points map directly to pain triggers; differentiators to desire
/// ("what customers want and we uniquely offer"); pain points recast as
/// fear ("what happens if this goes unaddressed"); emotional drivers to
/// aspiration.
#[must_use]
pub fn derive_triggers(profile: &BusinessProfile) -> Vec<CustomerTrigger> {
    let mut triggers = Vec::new();

    for pain in &profile.pain_points {
        triggers.push(CustomerTrigger {
            category: TriggerCategory::Pain,
            phrase: format!("struggling with {pain}"),
            keywords: trigger_keywords(pain),
        });
        triggers.push(CustomerTrigger {
            category: TriggerCategory::Fear,
            phrase: format!("worried {pain} will get worse"),
            keywords: trigger_keywords(pain),
        });
    }
    for diff in &profile.differentiators {
        triggers.push(CustomerTrigger {
            category: TriggerCategory::Desire,
            phrase: format!("looking for {diff}"),
            keywords: trigger_keywords(diff),
        });
    }
    for driver in &profile.emotional_drivers {
        triggers.push(CustomerTrigger {
            category: TriggerCategory::Aspiration,
            phrase: format!("wants {driver}"),
            keywords: trigger_keywords(driver),
        });
    }

    triggers
}

/// Attach the best trigger match to each trend and mark content
/// readiness.
#[must_use]
pub fn match_triggers(
    trends: Vec<LifecycleTrend>,
    triggers: &[CustomerTrigger],
) -> Vec<TrendWithMatches> {
    let matched: Vec<TrendWithMatches> = trends
        .into_iter()
        .map(|trend| match_one(trend, triggers))
        .collect();

    let ready = matched.iter().filter(|t| t.is_content_ready).count();
    tracing::debug!(total = matched.len(), content_ready = ready, "trigger matching complete");
    matched
}

fn match_one(trend: LifecycleTrend, triggers: &[CustomerTrigger]) -> TrendWithMatches {
    let text = trend.trend.trend.item.text().to_lowercase();
    let tokens = token_set(&text);

    let primary_trigger = triggers
        .iter()
        .map(|trigger| TriggerMatch {
            trigger: trigger.clone(),
            strength: trigger_strength(trigger, &text, &tokens),
        })
        .filter(|m| m.strength > 0.0)
        .max_by(|a, b| {
            a.strength
                .partial_cmp(&b.strength)
                .unwrap_or(std::cmp::Ordering::Equal)
                // Stable winner when strengths tie.
                .then_with(|| b.trigger.phrase.cmp(&a.trigger.phrase))
        });

    let best_match = primary_trigger
        .as_ref()
        .map(|m| build_content_match(&trend, m));

    let is_content_ready = trend.trend.trend.is_validated
        && trend.trend.is_relevant
        && primary_trigger
            .as_ref()
            .is_some_and(|m| m.strength >= MIN_TRIGGER_STRENGTH);

    TrendWithMatches {
        trend,
        primary_trigger,
        best_match,
        is_content_ready,
    }
}

/// Fraction of trigger keywords found in the trend text, scaled 0-100.
fn trigger_strength(
    trigger: &CustomerTrigger,
    text: &str,
    tokens: &std::collections::BTreeSet<String>,
) -> f64 {
    if trigger.keywords.is_empty() {
        return 0.0;
    }
    let matched = trigger
        .keywords
        .iter()
        .filter(|kw| keyword_matches(text, tokens, kw))
        .count();
    #[allow(clippy::cast_precision_loss)]
    {
        matched as f64 / trigger.keywords.len() as f64 * 100.0
    }
}

fn build_content_match(trend: &LifecycleTrend, matched: &TriggerMatch) -> ContentMatch {
    let title = &trend.trend.trend.item.title;
    let phrase = &matched.trigger.phrase;

    let suggested_hook = match matched.trigger.category {
        TriggerCategory::Pain => format!("If you're {phrase}, here's what \"{title}\" means for you"),
        TriggerCategory::Desire => format!("\"{title}\" — and why it matters if you're {phrase}"),
        TriggerCategory::Fear => format!("\"{title}\": what it means if you're {phrase}"),
        TriggerCategory::Aspiration => {
            format!("\"{title}\" for everyone who {phrase}")
        }
    };

    let mut content_angles = vec![
        format!("What \"{title}\" means for customers {phrase}"),
        format!("How to act on \"{title}\" this quarter"),
    ];
    match trend.lifecycle.stage {
        LifecycleStage::Emerging => {
            content_angles.push(format!("Early take: why \"{title}\" is worth watching now"));
        }
        LifecycleStage::Growing | LifecycleStage::Peak => {
            content_angles.push(format!("\"{title}\" is everywhere — how to stand out"));
        }
        LifecycleStage::Declining => {
            content_angles.push(format!("Is \"{title}\" over? What to do instead"));
        }
        LifecycleStage::Evergreen => {
            content_angles.push(format!("The lasting lessons of \"{title}\""));
        }
    }
    content_angles.truncate(MAX_CONTENT_ANGLES);

    ContentMatch {
        suggested_hook,
        content_angles,
    }
}

fn trigger_keywords(phrase: &str) -> Vec<String> {
    content_words(phrase).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::{BTreeMap, BTreeSet};
    use trendscope_core::{
        LifecycleInfo, QueryIntent, RawTrendItem, RelevanceScore, ScoredTrend, ValidatedTrend,
    };

    fn profile() -> BusinessProfile {
        BusinessProfile {
            business_id: "b".to_string(),
            business_name: "B".to_string(),
            industry: "plumbing".to_string(),
            target_customer: "homeowners".to_string(),
            pain_points: vec!["burst pipes".to_string()],
            differentiators: vec!["same-day service".to_string()],
            products: vec![],
            core_function: None,
            market_signals: vec![],
            emotional_drivers: vec!["peace of mind".to_string()],
            functional_drivers: vec![],
            service_area: None,
            emotional_quotient: None,
        }
    }

    fn lifecycle_trend(title: &str, validated: bool, relevant: bool) -> LifecycleTrend {
        LifecycleTrend {
            trend: ScoredTrend {
                trend: ValidatedTrend {
                    item: RawTrendItem::new(
                        "news",
                        title.to_string(),
                        String::new(),
                        None,
                        Some(Utc::now()),
                        QueryIntent::Trend,
                    ),
                    is_validated: validated,
                    validation_score: 64.0,
                    corroborating_sources: BTreeSet::from(["news".to_string()]),
                },
                relevance: RelevanceScore {
                    overall: 50.0,
                    breakdown: BTreeMap::new(),
                    matched_keywords: vec![],
                    passes_core_function_check: false,
                },
                is_relevant: relevant,
            },
            eq_adjusted_score: 50.0,
            lifecycle: LifecycleInfo {
                stage: LifecycleStage::Growing,
                stage_label: LifecycleStage::Growing.label().to_string(),
            },
        }
    }

    #[test]
    fn derives_triggers_from_all_profile_dimensions() {
        let triggers = derive_triggers(&profile());
        let categories: BTreeSet<&str> = triggers
            .iter()
            .map(|t| match t.category {
                TriggerCategory::Pain => "pain",
                TriggerCategory::Desire => "desire",
                TriggerCategory::Fear => "fear",
                TriggerCategory::Aspiration => "aspiration",
            })
            .collect();
        assert_eq!(categories.len(), 4);
    }

    #[test]
    fn strong_match_on_validated_relevant_trend_is_content_ready() {
        let triggers = derive_triggers(&profile());
        let trends = vec![lifecycle_trend("Burst pipes surge this winter", true, true)];
        let matched = match_triggers(trends, &triggers);
        assert!(matched[0].is_content_ready);
        let primary = matched[0].primary_trigger.as_ref().unwrap();
        assert!(primary.strength >= MIN_TRIGGER_STRENGTH);
        assert!(matched[0].best_match.is_some());
    }

    #[test]
    fn content_ready_implies_validated_relevant_and_strong() {
        let triggers = derive_triggers(&profile());
        let trends = vec![
            lifecycle_trend("Burst pipes surge this winter", true, true),
            lifecycle_trend("Burst pipes surge this winter", false, true),
            lifecycle_trend("Burst pipes surge this winter", true, false),
            lifecycle_trend("Quarterly plumbing conference recap", true, true),
        ];
        for matched in match_triggers(trends, &triggers) {
            if matched.is_content_ready {
                assert!(matched.trend.trend.trend.is_validated);
                assert!(matched.trend.trend.is_relevant);
                assert!(
                    matched.primary_trigger.as_ref().unwrap().strength >= MIN_TRIGGER_STRENGTH
                );
            }
        }
    }

    #[test]
    fn no_keyword_overlap_means_no_trigger() {
        let triggers = derive_triggers(&profile());
        let trends = vec![lifecycle_trend("Celebrity gossip roundup", true, true)];
        let matched = match_triggers(trends, &triggers);
        assert!(matched[0].primary_trigger.is_none());
        assert!(!matched[0].is_content_ready);
    }

    #[test]
    fn angles_are_capped_at_three() {
        let triggers = derive_triggers(&profile());
        let trends = vec![lifecycle_trend("Burst pipes surge this winter", true, true)];
        let matched = match_triggers(trends, &triggers);
        let angles = &matched[0].best_match.as_ref().unwrap().content_angles;
        assert!(angles.len() <= MAX_CONTENT_ANGLES);
    }
}
