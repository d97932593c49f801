use std::collections::HashSet;

use crate::models::Transaction;

/// Result of a dedup pass: survivors in input order, and what was dropped.
#[derive(Debug, Default)]
pub struct Deduplicated {
    pub kept: Vec<Transaction>,
    pub dropped: Vec<Transaction>,
}

/// Keep the first transaction seen for every dedup key.
///
/// Dropped transactions are logged with their raw line so an overlapping
/// statement import can be audited afterwards. Never fails.
pub fn dedup(transactions: Vec<Transaction>) -> Deduplicated {
    let mut seen: HashSet<Transaction> = HashSet::with_capacity(transactions.len());
    let mut out = Deduplicated::default();

    for tx in transactions {
        if seen.contains(&tx) {
            tracing::warn!(transaction = %tx, raw = tx.raw(), "dropping duplicate transaction");
            out.dropped.push(tx);
        } else {
            seen.insert(tx.clone());
            out.kept.push(tx);
        }
    }

    if !out.dropped.is_empty() {
        tracing::info!(
            kept = out.kept.len(),
            dropped = out.dropped.len(),
            "deduplicated transactions"
        );
    }
    out
}

/// True if no transaction in `existing` shares the candidate's dedup key.
///
/// `existing` must be sorted, as a category's transactions always are.
pub fn is_new(existing: &[Transaction], candidate: &Transaction) -> bool {
    existing.binary_search(candidate).is_err()
}

#[cfg(test)]
#[path = "dedup_tests.rs"]
mod tests;
