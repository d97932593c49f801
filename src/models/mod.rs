mod category;
mod transaction;

pub use category::{Category, DateConstraint, FlowDirection, MatchCriterion, UNGROUPED};
pub use transaction::{Bank, Transaction, FIELD_NAMES};
