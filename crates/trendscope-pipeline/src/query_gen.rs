//! Query generation: turns a business profile into a prioritized query set.
//!
//! Pure function of the profile — no I/O. The base generator balances
//! four angles (use-case, industry, outcome, persona) across all five
//! query types; a secondary outcome-driven generator derived from the
//! core-function statement contributes a fixed 30% of the final mix.

use trendscope_core::{BusinessProfile, Query, QueryIntent, QueryType};

/// How many queries a run should work with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryVolume {
    /// ~20 queries.
    Standard,
    /// 50–100 queries; fires more adapters per query downstream.
    Deep,
}

/// Deep mode tops up the base set until the merged total clears this.
const DEEP_MIN_TOTAL: usize = 50;
const DEEP_MAX_TOTAL: usize = 100;

/// Generate the query set for one pipeline run, sorted descending by
/// priority (ties broken by text for determinism).
#[must_use]
pub fn generate_queries(profile: &BusinessProfile, volume: QueryVolume) -> Vec<Query> {
    let deep = volume == QueryVolume::Deep;
    let mut base = base_queries(profile, deep);

    if deep {
        ensure_deep_floor(&mut base);
    }

    // Outcome generator owns 30% of the final mix: with the base at 70%,
    // its quota is 3/7 of the base count.
    let outcome_quota = (base.len() * 3).div_ceil(7);
    let mut queries = base;
    queries.extend(outcome_queries(profile, outcome_quota));

    dedupe_by_text(&mut queries);
    if deep {
        // Text collisions between the generators can knock the deduped
        // total back under the floor; restore it with fresh variants.
        top_up_deep_total(&mut queries);
    }
    queries.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.text.cmp(&b.text)));
    queries
}

/// Pad a deduplicated deep-mode set with variant queries until the
/// total clears [`DEEP_MIN_TOTAL`].
fn top_up_deep_total(queries: &mut Vec<Query>) {
    const TOP_UP_SUFFIXES: &[&str] = &["forecast", "report", "analysis", "faq"];
    let mut seen: std::collections::HashSet<String> =
        queries.iter().map(|q| q.text.to_lowercase()).collect();
    let originals: Vec<Query> = queries.clone();
    if originals.is_empty() {
        return;
    }
    let max_variants = originals.len() * TOP_UP_SUFFIXES.len();
    let mut variant_index = 0usize;
    while queries.len() < DEEP_MIN_TOTAL
        && queries.len() < DEEP_MAX_TOTAL
        && variant_index < max_variants
    {
        let original = &originals[variant_index % originals.len()];
        let suffix = TOP_UP_SUFFIXES[(variant_index / originals.len()) % TOP_UP_SUFFIXES.len()];
        variant_index += 1;
        let text = format!("{} {suffix}", original.text);
        if !seen.insert(text.to_lowercase()) {
            continue;
        }
        let mut q = original.clone();
        q.text = text;
        q.priority = q.priority.saturating_sub(20);
        queries.push(q);
    }
}

fn query(text: String, query_type: QueryType, intent: QueryIntent, priority: u8) -> Query {
    Query {
        text,
        query_type,
        intent,
        priority,
    }
}

fn base_queries(profile: &BusinessProfile, deep: bool) -> Vec<Query> {
    let mut queries = Vec::new();
    queries.extend(use_case_angle(profile, deep));
    queries.extend(industry_angle(profile, deep));
    queries.extend(outcome_angle(profile, deep));
    queries.extend(persona_angle(profile, deep));
    queries
}

/// Use-case angle: what people do with each product or service.
fn use_case_angle(profile: &BusinessProfile, deep: bool) -> Vec<Query> {
    let product_cap = if deep { 4 } else { 2 };
    let mut queries = Vec::new();
    for product in profile.products.iter().take(product_cap) {
        queries.push(query(
            format!("{product} trends"),
            QueryType::Search,
            QueryIntent::Trend,
            85,
        ));
        queries.push(query(
            format!("{product} best practices"),
            QueryType::Video,
            QueryIntent::Product,
            55,
        ));
        if deep {
            queries.push(query(
                format!("{product} news"),
                QueryType::News,
                QueryIntent::Product,
                65,
            ));
            queries.push(query(
                format!("{product} reviews"),
                QueryType::Social,
                QueryIntent::Product,
                50,
            ));
            queries.push(query(
                format!("{product} alternatives"),
                QueryType::Search,
                QueryIntent::Opportunity,
                60,
            ));
        }
    }
    queries
}

/// Industry angle: the market the business sits in.
fn industry_angle(profile: &BusinessProfile, deep: bool) -> Vec<Query> {
    let industry = &profile.industry;
    let mut queries = vec![
        query(
            format!("{industry} industry trends"),
            QueryType::News,
            QueryIntent::Industry,
            90,
        ),
        query(
            format!("{industry} market outlook"),
            QueryType::Search,
            QueryIntent::Industry,
            80,
        ),
        query(
            format!("what is changing in {industry}"),
            QueryType::Ai,
            QueryIntent::Industry,
            75,
        ),
    ];
    if deep {
        queries.push(query(
            format!("{industry} innovations"),
            QueryType::Video,
            QueryIntent::Industry,
            60,
        ));
        queries.push(query(
            format!("{industry} discussions"),
            QueryType::Social,
            QueryIntent::Industry,
            55,
        ));
        queries.push(query(
            format!("{industry} statistics"),
            QueryType::Search,
            QueryIntent::Industry,
            50,
        ));
    }
    queries
}

/// Outcome angle: the results differentiators and drivers promise.
fn outcome_angle(profile: &BusinessProfile, deep: bool) -> Vec<Query> {
    let cap = if deep { 4 } else { 2 };
    let mut queries = Vec::new();
    for differentiator in profile.differentiators.iter().take(cap) {
        queries.push(query(
            format!("{differentiator} demand"),
            QueryType::Search,
            QueryIntent::Opportunity,
            70,
        ));
        if deep {
            queries.push(query(
                format!("{differentiator} customer expectations"),
                QueryType::Social,
                QueryIntent::Opportunity,
                55,
            ));
        }
    }
    for driver in profile.functional_drivers.iter().take(cap) {
        queries.push(query(
            format!("{driver} solutions"),
            QueryType::Search,
            QueryIntent::Opportunity,
            60,
        ));
    }
    queries
}

/// Persona angle: what the target customer says and struggles with.
fn persona_angle(profile: &BusinessProfile, deep: bool) -> Vec<Query> {
    let customer = &profile.target_customer;
    let pain_cap = if deep { 4 } else { 2 };
    let mut queries = vec![
        query(
            format!("{customer} challenges"),
            QueryType::Social,
            QueryIntent::PainPoint,
            85,
        ),
        query(
            format!("what {customer} complain about"),
            QueryType::Social,
            QueryIntent::PainPoint,
            70,
        ),
    ];
    for pain in profile.pain_points.iter().take(pain_cap) {
        queries.push(query(
            pain.clone(),
            QueryType::Search,
            QueryIntent::PainPoint,
            80,
        ));
        queries.push(query(
            format!("{pain} solutions"),
            QueryType::News,
            QueryIntent::PainPoint,
            75,
        ));
        if deep {
            queries.push(query(
                format!("{pain} stories"),
                QueryType::Video,
                QueryIntent::PainPoint,
                55,
            ));
            queries.push(query(
                format!("why {pain}"),
                QueryType::Ai,
                QueryIntent::PainPoint,
                60,
            ));
        }
    }
    queries
}

/// Outcome-driven generator: fixed quota derived from the core-function
/// statement and the target-customer statement.
fn outcome_queries(profile: &BusinessProfile, quota: usize) -> Vec<Query> {
    let fallback = profile
        .products
        .first()
        .cloned()
        .unwrap_or_else(|| profile.industry.clone());
    let function = profile.core_function.as_deref().unwrap_or(&fallback);
    let customer = &profile.target_customer;

    let templates: Vec<Query> = vec![
        query(
            format!("how to {function}"),
            QueryType::Search,
            QueryIntent::Opportunity,
            88,
        ),
        query(
            format!("{function} trends"),
            QueryType::Search,
            QueryIntent::Trend,
            84,
        ),
        query(
            format!("{function} for {customer}"),
            QueryType::Ai,
            QueryIntent::Opportunity,
            82,
        ),
        query(
            format!("new approaches to {function}"),
            QueryType::News,
            QueryIntent::Opportunity,
            78,
        ),
        query(
            format!("best way to {function}"),
            QueryType::Video,
            QueryIntent::Opportunity,
            72,
        ),
        query(
            format!("{customer} looking to {function}"),
            QueryType::Social,
            QueryIntent::Opportunity,
            68,
        ),
    ];

    // Cycle suffix variants when the quota exceeds the template count.
    const SUFFIXES: &[&str] = &["cost", "mistakes", "case studies", "comparison", "checklist"];
    let mut queries = Vec::with_capacity(quota);
    let mut round = 0usize;
    while queries.len() < quota {
        for template in &templates {
            if queries.len() >= quota {
                break;
            }
            let mut q = template.clone();
            if round > 0 {
                let suffix = SUFFIXES[(round - 1) % SUFFIXES.len()];
                q.text = format!("{} {suffix}", q.text);
                q.priority = q.priority.saturating_sub(u8::try_from(round * 10).unwrap_or(u8::MAX));
            }
            queries.push(q);
        }
        round += 1;
    }
    queries
}

/// Pad a deep-mode base set with variant queries until it reaches the
/// share that puts the merged total at or above [`DEEP_MIN_TOTAL`].
fn ensure_deep_floor(base: &mut Vec<Query>) {
    // base / (base + 3/7 * base) = 70%, so the base must carry 70% of
    // the minimum total.
    let base_floor = DEEP_MIN_TOTAL * 7 / 10;
    const VARIANTS: &[&str] = &["2025", "guide", "examples", "explained"];
    let originals: Vec<Query> = base.clone();
    let mut variant_index = 0usize;
    while base.len() < base_floor && base.len() < DEEP_MAX_TOTAL * 7 / 10 {
        let Some(original) = originals.get(variant_index % originals.len()) else {
            break;
        };
        let suffix = VARIANTS[(variant_index / originals.len()) % VARIANTS.len()];
        let mut q = original.clone();
        q.text = format!("{} {suffix}", q.text);
        q.priority = q.priority.saturating_sub(15);
        base.push(q);
        variant_index += 1;
    }
}

fn dedupe_by_text(queries: &mut Vec<Query>) {
    let mut seen = std::collections::HashSet::new();
    queries.retain(|q| seen.insert(q.text.to_lowercase()));
}
