mod rules;
mod summary;

pub use rules::CategoryKind;
pub use summary::Summary;

use std::collections::{BTreeMap, HashSet};

use crate::error::{Error, Result};
use crate::models::{Category, Transaction, UNGROUPED};

/// What happens to a transaction that no category claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnmatchedPolicy {
    /// File it into the Ungrouped catch-all.
    #[default]
    FileUngrouped,
    /// Leave the catch-all alone and hand it back in [`AddSummary::unmatched`].
    ReturnToCaller,
}

impl UnmatchedPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "file" | "ungrouped" => Some(Self::FileUngrouped),
            "return" => Some(Self::ReturnToCaller),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct AddSummary {
    /// Newly filed into some category, Ungrouped included.
    pub filed: usize,
    /// Already held by a category; left untouched.
    pub duplicates: usize,
    /// Unclaimed transactions under [`UnmatchedPolicy::ReturnToCaller`].
    pub unmatched: Vec<Transaction>,
}

/// Exclusive owner of one instance of each category.
///
/// Every transaction added through [`add_transactions`] lives in exactly one
/// category. Categories are keyed, and iterated, by name.
///
/// [`add_transactions`]: GroupedTransactions::add_transactions
#[derive(Debug, Clone)]
pub struct GroupedTransactions {
    categories: BTreeMap<String, Category>,
    policy: UnmatchedPolicy,
}

impl GroupedTransactions {
    /// Build a classifier over the given categories. The Ungrouped catch-all
    /// is added if the caller did not supply it.
    pub fn new(
        categories: impl IntoIterator<Item = Category>,
        policy: UnmatchedPolicy,
    ) -> Result<Self> {
        let mut map = BTreeMap::new();
        for category in categories {
            let name = category.name().to_string();
            if name == UNGROUPED && !category.is_catch_all() {
                return Err(Error::DuplicateCategory(name));
            }
            if map.insert(name.clone(), category).is_some() {
                return Err(Error::DuplicateCategory(name));
            }
        }
        map.entry(UNGROUPED.to_string())
            .or_insert_with(Category::ungrouped);

        Ok(Self {
            categories: map,
            policy,
        })
    }

    /// One instance of every registered category.
    pub fn from_registry(policy: UnmatchedPolicy) -> Result<Self> {
        let categories = CategoryKind::all()
            .iter()
            .map(|kind| kind.build())
            .collect::<Result<Vec<_>>>()?;
        Self::new(categories, policy)
    }

    /// Classify and file a batch.
    ///
    /// The whole batch is classified before anything is filed, so an
    /// ambiguous transaction leaves every category untouched.
    pub fn add_transactions(&mut self, transactions: Vec<Transaction>) -> Result<AddSummary> {
        let mut summary = AddSummary::default();
        let mut plan: Vec<(String, Transaction)> = Vec::with_capacity(transactions.len());
        let mut seen: HashSet<Transaction> = HashSet::with_capacity(transactions.len());

        for tx in transactions {
            if self.find(&tx).is_some() || !seen.insert(tx.clone()) {
                tracing::debug!(transaction = %tx, "already filed, skipping");
                summary.duplicates += 1;
                continue;
            }
            match self.classify(&tx)? {
                Some(name) => plan.push((name.to_string(), tx)),
                None => match self.policy {
                    UnmatchedPolicy::FileUngrouped => plan.push((UNGROUPED.to_string(), tx)),
                    UnmatchedPolicy::ReturnToCaller => summary.unmatched.push(tx),
                },
            }
        }

        for (name, tx) in plan {
            tracing::debug!(category = %name, transaction = %tx, "filing transaction");
            if self.category_mut(&name)?.add_transaction(tx) {
                summary.filed += 1;
            }
        }
        Ok(summary)
    }

    /// Name of the single ordinary category matching `tx`, or `None`.
    ///
    /// More than one match is a rule-authoring bug and fails with
    /// [`Error::AmbiguousClassification`].
    pub fn classify(&self, tx: &Transaction) -> Result<Option<&str>> {
        let matched: Vec<&str> = self
            .categories
            .values()
            .filter(|c| !c.is_catch_all() && c.is_matched(tx))
            .map(|c| c.name())
            .collect();

        match matched.as_slice() {
            [] => Ok(None),
            [only] => Ok(Some(*only)),
            _ => Err(Error::AmbiguousClassification {
                transaction: Box::new(tx.clone()),
                categories: matched.iter().map(|s| s.to_string()).collect(),
            }),
        }
    }

    /// Re-run the rules over the Ungrouped bucket and move out whatever now
    /// matches. Returns how many transactions moved.
    pub fn process_ungrouped(&mut self) -> Result<usize> {
        let pending = self.ungrouped().transactions().to_vec();
        let mut moves: Vec<(String, Transaction)> = Vec::new();
        for tx in pending {
            if let Some(name) = self.classify(&tx)? {
                moves.push((name.to_string(), tx));
            }
        }

        let moved = moves.len();
        if moved == 0 {
            return Ok(0);
        }

        let remaining: Vec<Transaction> = self
            .category_mut(UNGROUPED)?
            .take_transactions()
            .into_iter()
            .filter(|tx| !moves.iter().any(|(_, m)| m == tx))
            .collect();
        for tx in remaining {
            self.category_mut(UNGROUPED)?.add_transaction(tx);
        }
        for (name, tx) in moves {
            tracing::info!(category = %name, transaction = %tx, "moved out of {UNGROUPED}");
            self.category_mut(&name)?.add_transaction(tx);
        }
        Ok(moved)
    }

    /// File a transaction into a named category without consulting rules.
    /// Used when rebuilding persisted state.
    ///
    /// Returns `Ok(false)` if the category already holds the key. A key held
    /// by a different category is a malformed record.
    pub fn restore(&mut self, category: &str, tx: Transaction) -> Result<bool> {
        if !self.categories.contains_key(category) {
            return Err(Error::UnknownCategory(category.to_string()));
        }
        if let Some(owner) = self.find(&tx) {
            if owner.name() != category {
                return Err(Error::malformed(
                    None,
                    format!("{tx} is filed under both {} and {category}", owner.name()),
                ));
            }
            return Ok(false);
        }
        self.category_mut(category)?.add_transaction(tx);
        Ok(true)
    }

    /// All categories, sorted by name.
    pub fn get_categories(&self) -> Vec<&Category> {
        self.categories.values().collect()
    }

    pub fn get_category(&self, name: &str) -> Result<&Category> {
        self.categories
            .get(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// The category holding a transaction with the same key, if any.
    pub fn find(&self, tx: &Transaction) -> Option<&Category> {
        self.categories.values().find(|c| c.contains(tx))
    }

    pub fn ungrouped(&self) -> &Category {
        // Inserted by `new`, never removed.
        &self.categories[UNGROUPED]
    }

    pub fn total_transactions(&self) -> usize {
        self.categories.values().map(Category::len).sum()
    }

    /// Same categories and policy, every category emptied.
    pub fn empty_copy(&self) -> Self {
        Self {
            categories: self
                .categories
                .iter()
                .map(|(name, c)| (name.clone(), c.empty_copy()))
                .collect(),
            policy: self.policy,
        }
    }

    /// Empty every category.
    pub fn clear(&mut self) {
        self.categories.values_mut().for_each(Category::clear);
    }

    fn category_mut(&mut self, name: &str) -> Result<&mut Category> {
        self.categories
            .get_mut(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }
}
