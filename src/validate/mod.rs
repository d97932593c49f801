use crate::categorize::GroupedTransactions;
use crate::error::{Error, Result};
use crate::models::{Transaction, UNGROUPED};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsistencyReport {
    /// Classified transactions re-run through the rules.
    pub checked: usize,
    /// Left out of the check because they sit in Ungrouped.
    pub ungrouped: usize,
}

/// Re-run classification over every stored transaction outside Ungrouped and
/// require each one to land in the category it is stored under.
///
/// Ungrouped takes no part as input. A classified transaction that the current
/// rules no longer match ends up there, which is reported as a difference.
pub fn check_consistency(stored: &GroupedTransactions) -> Result<ConsistencyReport> {
    let mut recomputed = stored.empty_copy();
    let classified: Vec<Transaction> = stored
        .get_categories()
        .into_iter()
        .filter(|c| c.name() != UNGROUPED)
        .flat_map(|c| c.transactions().iter().cloned())
        .collect();
    let checked = classified.len();

    let added = recomputed.add_transactions(classified)?;
    for tx in added.unmatched {
        recomputed.restore(UNGROUPED, tx)?;
    }

    for before in stored.get_categories() {
        let after = recomputed.get_category(before.name())?;
        let expected: &[Transaction] = if before.name() == UNGROUPED {
            &[]
        } else {
            before.transactions()
        };

        if expected != after.transactions() {
            let missing: Vec<Transaction> = expected
                .iter()
                .filter(|t| !after.contains(t))
                .cloned()
                .collect();
            let unexpected: Vec<Transaction> = after
                .transactions()
                .iter()
                .filter(|t| !expected.contains(t))
                .cloned()
                .collect();
            tracing::error!(
                category = before.name(),
                missing = missing.len(),
                unexpected = unexpected.len(),
                "stored classification differs from the current rules"
            );
            return Err(Error::ConsistencyViolation {
                category: before.name().to_string(),
                missing,
                unexpected,
            });
        }
    }

    let report = ConsistencyReport {
        checked,
        ungrouped: stored.ungrouped().len(),
    };
    tracing::info!(
        checked = report.checked,
        ungrouped = report.ungrouped,
        "stored classification is consistent"
    );
    Ok(report)
}
