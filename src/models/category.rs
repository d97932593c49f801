use chrono::NaiveDate;
use regex::{Regex, RegexBuilder};
use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::import::is_new;
use crate::models::Transaction;

/// Name of the catch-all category.
pub const UNGROUPED: &str = "Ungrouped";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowDirection {
    Earnings,
    Expenses,
    /// Transfers between own accounts; excluded from profit/loss.
    Neutral,
}

impl FlowDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Earnings => "earnings",
            Self::Expenses => "expenses",
            Self::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for FlowDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateConstraint {
    Any,
    On(NaiveDate),
    /// Inclusive on both ends.
    Between(NaiveDate, NaiveDate),
}

impl DateConstraint {
    pub fn admits(&self, date: NaiveDate) -> bool {
        match *self {
            Self::Any => true,
            Self::On(day) => date == day,
            Self::Between(start, end) => start <= date && date <= end,
        }
    }
}

/// One receiver pattern, optionally restricted to a date or date window.
#[derive(Debug, Clone)]
pub struct MatchCriterion {
    regex: Regex,
    case_sensitive: bool,
    date: DateConstraint,
}

impl MatchCriterion {
    pub fn new(pattern: &str, case_sensitive: bool, date: DateConstraint) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|e| Error::InvalidRule {
                category: String::new(),
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;
        if let DateConstraint::Between(start, end) = date {
            if start > end {
                return Err(Error::InvalidRule {
                    category: String::new(),
                    pattern: pattern.to_string(),
                    reason: format!("date window {start}..={end} is empty"),
                });
            }
        }
        Ok(Self {
            regex,
            case_sensitive,
            date,
        })
    }

    /// Unanchored search against the receiver, then the date constraint.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.regex.is_match(transaction.receiver()) && self.date.admits(transaction.date())
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn date_constraint(&self) -> DateConstraint {
        self.date
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    Rules(Vec<MatchCriterion>),
    CatchAll,
}

/// A named bucket of transactions plus the rule deciding membership.
///
/// Transactions are kept sorted and free of duplicate keys; `total` always
/// equals the sum of the held amounts.
#[derive(Debug, Clone)]
pub struct Category {
    name: String,
    flow: FlowDirection,
    matcher: Matcher,
    transactions: Vec<Transaction>,
    total: Decimal,
}

impl Category {
    pub fn new(name: impl Into<String>, flow: FlowDirection, criteria: Vec<MatchCriterion>) -> Self {
        Self {
            name: name.into(),
            flow,
            matcher: Matcher::Rules(criteria),
            transactions: Vec::new(),
            total: Decimal::ZERO,
        }
    }

    /// The catch-all that receives transactions no rule claims.
    pub fn ungrouped() -> Self {
        Self {
            name: UNGROUPED.to_string(),
            flow: FlowDirection::Neutral,
            matcher: Matcher::CatchAll,
            transactions: Vec::new(),
            total: Decimal::ZERO,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flow_direction(&self) -> FlowDirection {
        self.flow
    }

    pub fn is_catch_all(&self) -> bool {
        matches!(self.matcher, Matcher::CatchAll)
    }

    pub fn criteria(&self) -> &[MatchCriterion] {
        match &self.matcher {
            Matcher::Rules(criteria) => criteria,
            Matcher::CatchAll => &[],
        }
    }

    /// True if any criterion matches.
    ///
    /// # Panics
    ///
    /// The catch-all has no rule; asking it is a caller bug.
    #[allow(clippy::panic)]
    pub fn is_matched(&self, transaction: &Transaction) -> bool {
        match &self.matcher {
            Matcher::Rules(criteria) => criteria.iter().any(|c| c.matches(transaction)),
            Matcher::CatchAll => panic!(
                "is_matched called on catch-all category {} for {transaction}",
                self.name
            ),
        }
    }

    /// Files a transaction at its sorted position. Returns false, changing
    /// nothing, when a transaction with the same key is already held.
    pub fn add_transaction(&mut self, transaction: Transaction) -> bool {
        if !is_new(&self.transactions, &transaction) {
            return false;
        }
        let pos = self.transactions.partition_point(|t| *t < transaction);
        self.total += transaction.amount();
        self.transactions.insert(pos, transaction);
        true
    }

    pub fn contains(&self, transaction: &Transaction) -> bool {
        !is_new(&self.transactions, transaction)
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn clear(&mut self) {
        self.transactions = Vec::new();
        self.total = Decimal::ZERO;
    }

    /// Empties the category, handing the transactions to the caller.
    pub(crate) fn take_transactions(&mut self) -> Vec<Transaction> {
        self.total = Decimal::ZERO;
        std::mem::take(&mut self.transactions)
    }

    /// Same name, flow and rules; no transactions.
    pub fn empty_copy(&self) -> Self {
        Self {
            name: self.name.clone(),
            flow: self.flow,
            matcher: self.matcher.clone(),
            transactions: Vec::new(),
            total: Decimal::ZERO,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
