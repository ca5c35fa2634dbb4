//! Category-weighted sampling with replacement.
//!
//! Each category gets `floor(total * weight)` draws from the records that
//! carry exactly that category. Draws are with replacement, so a category
//! with fewer records than its quota still reaches it, at the cost of
//! repeated payloads. Categories without a weight are never drawn. The
//! truncation means the realized size can be below `total`; the remainder is
//! not redistributed.

use std::collections::{BTreeMap, HashMap};

use log::info;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;

use crate::error::{DatasetError, Result};
use crate::extract::ConversationRecord;

/// Category name -> fraction of the total to allocate to it.
pub type WeightSpec = BTreeMap<String, f64>;

/// How many examples one category contributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Allocation<'w> {
    pub category: &'w str,
    pub weight: f64,
    pub count: usize,
}

/// Upper bound on the number of examples one plan may allocate.
pub const MAX_PLANNED_EXAMPLES: usize = 100_000_000;

/// Number of draws for a category of `weight` when `total` examples are
/// requested, or `None` when it exceeds [`MAX_PLANNED_EXAMPLES`].
pub fn quota(total: usize, weight: f64) -> Option<usize> {
    let n = (total as f64 * weight).floor();
    if n.is_finite() && n <= MAX_PLANNED_EXAMPLES as f64 {
        Some(n as usize)
    } else {
        None
    }
}

/// Per-category draw counts, in category order.
///
/// Fails with [`DatasetError::Config`] when a quota, or their sum, exceeds
/// [`MAX_PLANNED_EXAMPLES`].
pub fn plan(weights: &WeightSpec, total: usize) -> Result<Vec<Allocation<'_>>> {
    let too_large = |what: String| {
        DatasetError::config(
            "Weights.category_weights",
            format!("{what} exceeds the limit of {MAX_PLANNED_EXAMPLES} examples"),
        )
    };

    let mut planned = 0usize;
    let mut allocations = Vec::with_capacity(weights.len());
    for (category, &weight) in weights {
        let count = quota(total, weight)
            .ok_or_else(|| too_large(format!("quota for {category:?} ({total} x {weight})")))?;
        planned = planned
            .checked_add(count)
            .filter(|&p| p <= MAX_PLANNED_EXAMPLES)
            .ok_or_else(|| too_large("planned total".to_owned()))?;
        allocations.push(Allocation {
            category: category.as_str(),
            weight,
            count,
        });
    }
    Ok(allocations)
}

/// Draw the weighted, shuffled dataset from `corpus`.
///
/// Fails with [`DatasetError::EmptyCategory`] if any category with a
/// positive quota has no records, and with [`DatasetError::Config`] if the
/// weights plan more than [`MAX_PLANNED_EXAMPLES`]; nothing is returned in
/// either case.
pub fn sample<'c, R>(
    corpus: &'c [ConversationRecord],
    weights: &WeightSpec,
    total: usize,
    rng: &mut R,
) -> Result<Vec<&'c Value>>
where
    R: Rng + ?Sized,
{
    let mut pools: HashMap<&str, Vec<&'c Value>> = HashMap::new();
    for rec in corpus {
        if weights.contains_key(&rec.category) {
            pools.entry(rec.category.as_str()).or_default().push(&rec.payload);
        }
    }

    let allocations = plan(weights, total)?;
    let mut selected = Vec::with_capacity(allocations.iter().map(|a| a.count).sum());

    for alloc in allocations {
        if alloc.count == 0 {
            continue;
        }
        let pool = pools.get(alloc.category).map(Vec::as_slice).unwrap_or_default();
        if pool.is_empty() {
            return Err(DatasetError::EmptyCategory {
                category: alloc.category.to_owned(),
                requested: alloc.count,
            });
        }

        selected.extend((0..alloc.count).map(|_| pool[rng.gen_range(0..pool.len())]));
        info!(
            "{:?}: drew {} from {} record(s) (weight {})",
            alloc.category,
            alloc.count,
            pool.len(),
            alloc.weight
        );
    }

    selected.shuffle(rng);
    Ok(selected)
}
