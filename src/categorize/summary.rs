use rust_decimal::Decimal;

use super::GroupedTransactions;
use crate::models::FlowDirection;

/// Profit/loss view over a classified state.
///
/// Neutral categories (own-account transfers) and the catch-all are left out
/// of the totals and only listed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Summary {
    pub earnings: Decimal,
    pub expenses: Decimal,
    pub earning_categories: Vec<String>,
    pub spending_categories: Vec<String>,
    pub excluded_categories: Vec<String>,
}

impl Summary {
    pub fn of(grouped: &GroupedTransactions) -> Self {
        let mut summary = Self::default();
        for category in grouped.get_categories() {
            if category.is_empty() {
                continue;
            }
            let name = category.name().to_string();
            if category.is_catch_all() {
                summary.excluded_categories.push(name);
                continue;
            }
            match category.flow_direction() {
                FlowDirection::Earnings => {
                    summary.earnings += category.total();
                    summary.earning_categories.push(name);
                }
                FlowDirection::Expenses => {
                    summary.expenses += category.total();
                    summary.spending_categories.push(name);
                }
                FlowDirection::Neutral => summary.excluded_categories.push(name),
            }
        }
        summary
    }

    pub fn net(&self) -> Decimal {
        self.earnings + self.expenses
    }
}
