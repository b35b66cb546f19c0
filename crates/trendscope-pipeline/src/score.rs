//! Relevance scoring of validated trends against the business profile.
//!
//! Every trend gets a per-dimension keyword breakdown and a weighted
//! overall score, then passes through three gates: a negative-keyword
//! gate (hard reject), a core-keyword gate, and a core-function check.
//! When strict filtering leaves a thin result set the pool is topped up
//! with the next-best excluded items, trading precision for recall.

use std::collections::{BTreeMap, BTreeSet};

use trendscope_core::{BusinessProfile, KeywordPack, RelevanceScore, ScoredTrend, ValidatedTrend};

use crate::text::{containment, content_words, keyword_matches, token_set};

/// Default relevance threshold, 0-100.
pub const DEFAULT_THRESHOLD: f64 = 35.0;

/// Below this many strictly-relevant items the pool is supplemented.
const SUPPLEMENT_FLOOR: usize = 20;
/// Supplementation never grows the pool past this size.
const SUPPLEMENT_CAP: usize = 50;

/// Overall score that accepts an item even without a core keyword.
const EXCEPTIONAL_OVERALL: f64 = 70.0;

/// Minimum content-word overlap with the core-function statement.
const CORE_FUNCTION_OVERLAP: f64 = 0.3;

/// Largest single dimension weight: alignment with what the business
/// fundamentally does.
const CORE_FUNCTION_WEIGHT: f64 = 0.25;

const DIMENSION_WEIGHTS: &[(&str, f64)] = &[
    ("industry", 0.15),
    ("pain_points", 0.15),
    ("products", 0.12),
    ("customer", 0.11),
    ("differentiators", 0.08),
    ("emotional_drivers", 0.07),
    ("functional_drivers", 0.07),
];

/// Score every trend and assemble the downstream working pool.
///
/// The returned pool contains the strictly-relevant items plus, when
/// those number fewer than 20, the next-highest-scoring excluded items
/// up to 50 total. Supplements keep `is_relevant = false`; they widen
/// the pool without widening the relevance claim. Items rejected by the
/// negative-keyword gate are never supplemented.
#[must_use]
pub fn score_trends(
    trends: Vec<ValidatedTrend>,
    profile: &BusinessProfile,
    pack: &KeywordPack,
    threshold: f64,
) -> Vec<ScoredTrend> {
    let mut scored: Vec<GatedTrend> = trends
        .into_iter()
        .map(|trend| score_one(trend, profile, pack, threshold))
        .collect();

    // Completion order from the fetch stage must not leak into the
    // ranking; sort by score with a stable id tie-break.
    scored.sort_by(|a, b| {
        b.trend
            .relevance
            .overall
            .partial_cmp(&a.trend.relevance.overall)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.trend.id().cmp(b.trend.id()))
    });

    let relevant = scored.iter().filter(|t| t.trend.is_relevant).count();
    let mut pool: Vec<ScoredTrend> = if relevant >= SUPPLEMENT_FLOOR {
        scored
            .into_iter()
            .filter(|t| t.trend.is_relevant)
            .map(|t| t.trend)
            .collect()
    } else {
        // Thin result set: top up with the next-best excluded items so
        // downstream stages always have a workable pool. Negative-gated
        // items stay out no matter how thin the set is; a zero score
        // from matching nothing is still supplementable.
        let target = SUPPLEMENT_CAP.min(scored.len());
        let mut pool = Vec::with_capacity(target);
        for gated in &scored {
            if gated.trend.is_relevant {
                pool.push(gated.trend.clone());
            }
        }
        for gated in scored {
            if pool.len() >= target {
                break;
            }
            if !gated.trend.is_relevant && !gated.negative_gated {
                pool.push(gated.trend);
            }
        }
        pool
    };
    pool.sort_by(|a, b| {
        b.relevance
            .overall
            .partial_cmp(&a.relevance.overall)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id().cmp(b.id()))
    });

    tracing::debug!(
        relevant,
        pool = pool.len(),
        threshold,
        "relevance scoring complete"
    );
    pool
}

/// A scored trend plus whether the negative-keyword gate rejected it.
/// The gate outcome matters only inside this stage — rejected items
/// must never re-enter via supplementation — so it is not carried on
/// the public record.
struct GatedTrend {
    trend: ScoredTrend,
    negative_gated: bool,
}

fn score_one(
    trend: ValidatedTrend,
    profile: &BusinessProfile,
    pack: &KeywordPack,
    threshold: f64,
) -> GatedTrend {
    let text = trend.item.text().to_lowercase();
    let tokens = token_set(&text);

    if let Some(negative) = pack
        .negative_keywords
        .iter()
        .find(|kw| keyword_matches(&text, &tokens, kw))
    {
        tracing::debug!(id = %trend.item.id, keyword = %negative, "negative-keyword gate rejected trend");
        return GatedTrend {
            trend: ScoredTrend {
                trend,
                relevance: RelevanceScore {
                    overall: 0.0,
                    breakdown: BTreeMap::new(),
                    matched_keywords: Vec::new(),
                    passes_core_function_check: false,
                },
                is_relevant: false,
            },
            negative_gated: true,
        };
    }

    let mut breakdown = BTreeMap::new();
    let mut matched_keywords = Vec::new();
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;

    for &(name, weight) in DIMENSION_WEIGHTS {
        let keywords = dimension_keywords(profile, name);
        if keywords.is_empty() {
            continue;
        }
        let score = dimension_score(&text, &tokens, &keywords, &mut matched_keywords);
        breakdown.insert(name.to_string(), score);
        weighted_sum += score * weight;
        weight_total += weight;
    }

    let passes_core_function_check = profile
        .core_function
        .as_deref()
        .is_some_and(|cf| core_function_overlap(cf, &tokens) >= CORE_FUNCTION_OVERLAP);
    if let Some(cf) = profile.core_function.as_deref() {
        let overlap = core_function_overlap(cf, &tokens);
        let score = (overlap * 200.0).min(100.0);
        breakdown.insert("core_function".to_string(), score);
        weighted_sum += score * CORE_FUNCTION_WEIGHT;
        weight_total += CORE_FUNCTION_WEIGHT;
    }

    // Renormalize so profiles missing optional dimensions are not
    // penalized for the absence.
    let overall = if weight_total > 0.0 {
        (weighted_sum / weight_total).min(100.0)
    } else {
        0.0
    };

    let has_core_keyword = pack
        .core_keywords
        .iter()
        .any(|kw| keyword_matches(&text, &tokens, kw));

    let is_relevant = overall >= threshold
        && (has_core_keyword || passes_core_function_check || overall >= EXCEPTIONAL_OVERALL);

    GatedTrend {
        trend: ScoredTrend {
            trend,
            relevance: RelevanceScore {
                overall,
                breakdown,
                matched_keywords,
                passes_core_function_check,
            },
            is_relevant,
        },
        negative_gated: false,
    }
}

fn dimension_keywords(profile: &BusinessProfile, name: &str) -> Vec<String> {
    match name {
        "industry" => vec![profile.industry.clone()],
        "pain_points" => profile.pain_points.clone(),
        "products" => profile.products.clone(),
        "customer" => vec![profile.target_customer.clone()],
        "differentiators" => profile.differentiators.clone(),
        "emotional_drivers" => profile.emotional_drivers.clone(),
        "functional_drivers" => profile.functional_drivers.clone(),
        _ => Vec::new(),
    }
}

fn dimension_score(
    text: &str,
    tokens: &BTreeSet<String>,
    keywords: &[String],
    matched_out: &mut Vec<String>,
) -> f64 {
    let matched: Vec<&String> = keywords
        .iter()
        .filter(|kw| keyword_matches(text, tokens, kw))
        .collect();
    for kw in &matched {
        if !matched_out.contains(kw) {
            matched_out.push((*kw).clone());
        }
    }
    #[allow(clippy::cast_precision_loss)]
    let ratio = matched.len() as f64 / keywords.len() as f64;
    (ratio * 120.0).min(100.0)
}

fn core_function_overlap(core_function: &str, trend_tokens: &BTreeSet<String>) -> f64 {
    containment(&content_words(core_function), trend_tokens)
}
