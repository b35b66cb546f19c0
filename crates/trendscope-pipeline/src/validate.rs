//! Multi-source validation: corroboration across distinct sources.
//!
//! Items describing the same underlying insight are grouped by text
//! similarity; a group is trusted once enough distinct sources
//! contributed to it. Unvalidated items are retained as a supplementary
//! pool rather than dropped.

use std::collections::BTreeSet;

use trendscope_core::{RawTrendItem, ValidatedTrend};

use crate::text::{jaccard, token_set};

/// Token-Jaccard threshold above which two items are the same insight.
const SIMILARITY_THRESHOLD: f64 = 0.55;

struct Group {
    representative: RawTrendItem,
    rep_tokens: BTreeSet<String>,
    members: Vec<RawTrendItem>,
}

/// Group raw items into corroborated trends.
///
/// Input is sorted by id first so the greedy clustering is independent
/// of adapter completion order — identical inputs in any order produce
/// identical output.
#[must_use]
pub fn validate_trends(mut items: Vec<RawTrendItem>, min_sources: usize) -> Vec<ValidatedTrend> {
    items.sort_by(|a, b| a.id.cmp(&b.id));

    let mut groups: Vec<Group> = Vec::new();
    for item in items {
        let tokens = token_set(&item.text());
        let matched = groups.iter_mut().find(|group| {
            jaccard(&group.rep_tokens, &tokens) >= SIMILARITY_THRESHOLD
                || title_contains(&group.representative.title, &item.title)
        });
        match matched {
            Some(group) => {
                // The longest description becomes the group's face.
                if item.description.len() > group.representative.description.len() {
                    group.representative = item.clone();
                    group.rep_tokens = tokens;
                }
                group.members.push(item);
            }
            None => groups.push(Group {
                rep_tokens: tokens,
                representative: item.clone(),
                members: vec![item],
            }),
        }
    }

    let mut validated: Vec<ValidatedTrend> = groups
        .into_iter()
        .map(|group| to_validated(group, min_sources))
        .collect();
    validated.sort_by(|a, b| a.item.id.cmp(&b.item.id));

    let validated_count = validated.iter().filter(|t| t.is_validated).count();
    tracing::debug!(
        groups = validated.len(),
        validated = validated_count,
        "multi-source validation complete"
    );
    validated
}

fn to_validated(group: Group, min_sources: usize) -> ValidatedTrend {
    let corroborating_sources: BTreeSet<String> = group
        .members
        .iter()
        .map(|m| m.source.clone())
        .collect();
    let source_count = corroborating_sources.len();

    let mut item = group.representative;
    for member in &group.members {
        // Enrich the representative with members' side-channel data;
        // existing keys win.
        for (key, value) in &member.metadata {
            item.metadata.entry(key.clone()).or_insert(*value);
        }
        // Newest member date drives recency downstream.
        if member.published_at > item.published_at {
            item.published_at = member.published_at;
        }
    }

    ValidatedTrend {
        item,
        is_validated: source_count >= min_sources,
        validation_score: validation_score(source_count),
        corroborating_sources,
    }
}

/// Monotonic in the source count with diminishing returns:
/// 1 source = 40, 2 = 64, 3 = 78.4, asymptote 100.
fn validation_score(source_count: usize) -> f64 {
    let n = i32::try_from(source_count).unwrap_or(i32::MAX);
    100.0 * (1.0 - 0.6_f64.powi(n))
}

/// Near-duplicate titles corroborate even when descriptions diverge.
fn title_contains(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    a.contains(&b) || b.contains(&a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trendscope_core::QueryIntent;

    fn item(source: &str, title: &str, description: &str) -> RawTrendItem {
        RawTrendItem::new(
            source,
            title.to_string(),
            description.to_string(),
            None,
            None,
            QueryIntent::Trend,
        )
    }

    #[test]
    fn same_title_from_two_sources_is_validated() {
        let items = vec![
            item("news", "Rising demand for X", "coverage from the news desk"),
            item("forum", "Rising demand for X", "users discussing the shift"),
        ];
        let validated = validate_trends(items, 2);
        assert_eq!(validated.len(), 1);
        assert!(validated[0].is_validated);
        assert_eq!(validated[0].corroborating_sources.len(), 2);
    }

    #[test]
    fn single_source_is_retained_but_not_validated() {
        let validated = validate_trends(vec![item("news", "Solo insight", "only one outlet")], 2);
        assert_eq!(validated.len(), 1);
        assert!(!validated[0].is_validated);
        assert_eq!(validated[0].corroborating_sources.len(), 1);
    }

    #[test]
    fn corroboration_invariant_holds() {
        let items = vec![
            item("news", "Rising demand for X", "a"),
            item("forum", "Rising demand for X", "b"),
            item("video", "Unrelated topic entirely different words", "c"),
        ];
        for trend in validate_trends(items, 2) {
            if trend.is_validated {
                assert!(trend.corroborating_sources.len() >= 2);
            }
        }
    }

    #[test]
    fn same_source_twice_does_not_corroborate() {
        let items = vec![
            item("news", "Rising demand for X", "first article"),
            item("news", "Rising demand for X extended", "second article"),
        ];
        let validated = validate_trends(items, 2);
        assert_eq!(validated.len(), 1);
        assert!(!validated[0].is_validated);
    }

    #[test]
    fn validation_score_is_monotonic_with_diminishing_returns() {
        let s1 = validation_score(1);
        let s2 = validation_score(2);
        let s3 = validation_score(3);
        assert!(s1 < s2 && s2 < s3);
        assert!(s2 - s1 > s3 - s2, "returns must diminish");
        assert!(s3 < 100.0);
    }

    #[test]
    fn clustering_is_order_independent() {
        let a = vec![
            item("news", "Rising demand for X", "a"),
            item("forum", "Rising demand for X", "b"),
            item("video", "Completely different insight about Y", "c"),
        ];
        let mut b = a.clone();
        b.reverse();
        let va = validate_trends(a, 2);
        let vb = validate_trends(b, 2);
        let ids_a: Vec<&str> = va.iter().map(|t| t.item.id.as_str()).collect();
        let ids_b: Vec<&str> = vb.iter().map(|t| t.item.id.as_str()).collect();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn metadata_merges_across_members() {
        let mut velocity = item("trend_velocity", "Rising demand for X", "velocity topic");
        velocity.metadata.insert("trend_velocity".to_string(), 2.0);
        let items = vec![item("news", "Rising demand for X", "article"), velocity];
        let validated = validate_trends(items, 2);
        assert_eq!(validated.len(), 1);
        assert_eq!(
            validated[0].item.metadata.get("trend_velocity"),
            Some(&2.0)
        );
    }
}
