//! Turning probability tables into exact counts.

use thiserror::Error;
use crate::game::{
    Category,
    Distribution,
    ProbabilityTable
};

/// The error returned by `distribute`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DistributionError {
    /// A positive count was requested from a table in which no category has a positive chance.
    #[error("cannot distribute {count} items over a table with no positive chance")]
    DegenerateTable {
        /// The requested count.
        count: u32
    }
}

/// Splits `count` items across categories in proportion to their chances, so that the counts sum to exactly `count`.
///
/// Every category with a positive chance first gets the floor of its ideal share. The units left over go one at a time to the categories with the largest fractional remainders; ties go to the category that comes first in declaration order. Categories with a zero chance always get 0.
///
/// # Errors
///
/// Returns `DistributionError::DegenerateTable` if `count > 0` but no category has a positive chance. Use `ProbabilityTable::or_fallback` first to rule this out.
pub fn distribute<C: Category>(count: u32, table: &ProbabilityTable<C>) -> Result<Distribution<C>, DistributionError> {
    let mut distribution = Distribution::zeroed();
    if count == 0 {
        return Ok(distribution);
    }
    let target = u64::from(count);
    let mut assigned = 0u64;
    let mut remainders = Vec::default();
    for (category, chance) in table.iter() {
        if chance <= 0.0 { continue; }
        let ideal = f64::from(count) * chance / 100.0;
        let floor = ideal.floor();
        let base = (floor as u64).min(target);
        *distribution.slot_mut(category) = base as u32;
        assigned += base;
        remainders.push((category, ideal - floor));
    }
    if remainders.is_empty() {
        return Err(DistributionError::DegenerateTable { count });
    }
    // stable sort keeps declaration order among equal remainders
    remainders.sort_by(|(_, a), (_, b)| b.total_cmp(a));
    // tables summing to less than 100 can leave more units than there are categories
    for &(category, _) in remainders.iter().cycle() {
        if assigned >= target { break; }
        *distribution.slot_mut(category) += 1;
        assigned += 1;
    }
    // tables summing to more than 100 overshoot, take back from the smallest remainders
    for &(category, _) in remainders.iter().rev().cycle() {
        if assigned <= target { break; }
        let slot = distribution.slot_mut(category);
        if *slot > 0 {
            *slot -= 1;
            assigned -= 1;
        }
    }
    Ok(distribution)
}
