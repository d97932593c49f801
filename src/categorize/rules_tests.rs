#![allow(clippy::unwrap_used)]

use super::*;
use crate::categorize::{GroupedTransactions, UnmatchedPolicy};
use crate::models::{Bank, Transaction};
use rust_decimal_macros::dec;
use std::collections::HashSet;

fn make_txn(receiver: &str, y: i32, m: u32, d: u32) -> Transaction {
    Transaction::new(
        Bank::AbnAmro,
        "nl91abna0417164300",
        receiver,
        "EUR",
        NaiveDate::from_ymd_opt(y, m, d).unwrap(),
        dec!(-10.00),
        "",
    )
}

fn classify(receiver: &str, y: i32, m: u32, d: u32) -> Option<String> {
    let grouped = GroupedTransactions::from_registry(UnmatchedPolicy::FileUngrouped).unwrap();
    grouped
        .classify(&make_txn(receiver, y, m, d))
        .unwrap()
        .map(str::to_string)
}

// ── Registry ──────────────────────────────────────────────────

#[test]
fn test_every_kind_builds() {
    for kind in CategoryKind::all() {
        let category = kind.build().unwrap();
        assert_eq!(category.name(), kind.as_str());
        assert_eq!(category.flow_direction(), kind.flow_direction());
    }
}

#[test]
fn test_names_are_unique() {
    let names: HashSet<&str> = CategoryKind::all().iter().map(|k| k.as_str()).collect();
    assert_eq!(names.len(), CategoryKind::all().len());
}

#[test]
fn test_kind_roundtrip() {
    for kind in CategoryKind::all() {
        assert_eq!(CategoryKind::parse(kind.as_str()), Some(*kind));
    }
    assert_eq!(CategoryKind::parse("groceries"), None);
    assert_eq!(CategoryKind::parse("Nope"), None);
}

#[test]
fn test_ungrouped_is_the_catch_all() {
    let category = CategoryKind::Ungrouped.build().unwrap();
    assert!(category.is_catch_all());
    assert_eq!(category.name(), UNGROUPED);
    for kind in CategoryKind::all() {
        if *kind != CategoryKind::Ungrouped {
            assert!(!kind.build().unwrap().is_catch_all(), "{kind}");
        }
    }
}

#[test]
fn test_flow_directions() {
    assert_eq!(CategoryKind::Income.flow_direction(), FlowDirection::Earnings);
    assert_eq!(
        CategoryKind::InternalTransfers.flow_direction(),
        FlowDirection::Neutral
    );
    assert_eq!(CategoryKind::Groceries.flow_direction(), FlowDirection::Expenses);
    assert_eq!(CategoryKind::HouseholdGoods.as_str(), "Household goods");
    assert_eq!(CategoryKind::Vve.as_str(), "VVE");
}

#[test]
fn test_registry_has_one_instance_per_kind() {
    let grouped = GroupedTransactions::from_registry(UnmatchedPolicy::FileUngrouped).unwrap();
    assert_eq!(grouped.get_categories().len(), CategoryKind::all().len());
}

// ── Rules ─────────────────────────────────────────────────────

#[test]
fn test_albert_heijn_is_groceries() {
    assert_eq!(
        classify("Albert Heijn 1234", 2025, 1, 1).as_deref(),
        Some("Groceries")
    );
    assert_eq!(classify("albert heijn", 2025, 1, 1).as_deref(), Some("Groceries"));
    assert_eq!(classify("albert heijnx", 2025, 1, 1), None);
}

#[test]
fn test_gamma_is_household_goods() {
    let groceries = CategoryKind::Groceries.build().unwrap();
    assert!(!groceries.is_matched(&make_txn("gamma", 2025, 1, 2)));
    assert_eq!(
        classify("gamma", 2025, 1, 2).as_deref(),
        Some("Household goods")
    );
}

#[test]
fn test_prefixed_card_terminals() {
    assert_eq!(classify("bck*jumbo 4411", 2025, 2, 1).as_deref(), Some("Groceries"));
    assert_eq!(
        classify("ccv*starbucks den haag", 2025, 2, 1).as_deref(),
        Some("Restaurants")
    );
    assert_eq!(
        classify("zettle_*house of tribe", 2025, 2, 1).as_deref(),
        Some("Restaurants")
    );
}

#[test]
fn test_uber_and_uber_eats_do_not_overlap() {
    assert_eq!(classify("uber", 2025, 1, 5).as_deref(), Some("Transport"));
    assert_eq!(classify("uber eats", 2025, 1, 5).as_deref(), Some("Restaurants"));
}

#[test]
fn test_single_date_rule() {
    assert_eq!(
        classify("klarna bank ab", 2025, 1, 15).as_deref(),
        Some("Household goods")
    );
    assert_eq!(classify("klarna bank ab", 2025, 1, 16), None);
}

#[test]
fn test_date_window_rule_is_inclusive() {
    assert_eq!(classify("albert", 2025, 3, 7), None);
    assert_eq!(classify("albert", 2025, 3, 8).as_deref(), Some("Others"));
    assert_eq!(classify("albert", 2025, 3, 9).as_deref(), Some("Others"));
    assert_eq!(classify("albert", 2025, 3, 10), None);
}

#[test]
fn test_non_ascii_receivers() {
    assert_eq!(
        classify("Pražský hrad", 2025, 3, 9).as_deref(),
        Some("Others")
    );
    assert_eq!(classify("praha lodě", 2025, 3, 8).as_deref(), Some("Others"));
}

#[test]
fn test_transfers_and_income() {
    assert_eq!(
        classify("oranje spaarrekening", 2025, 1, 1).as_deref(),
        Some("InternalTransfers")
    );
    assert_eq!(classify("imc trading bv", 2025, 1, 25).as_deref(), Some("Income"));
}

#[test]
fn test_every_rule_is_lowercase_and_case_sensitive() {
    for kind in CategoryKind::all() {
        for criterion in kind.build().unwrap().criteria() {
            assert!(criterion.is_case_sensitive(), "{kind}: {}", criterion.pattern());
            assert!(
                !criterion.pattern().chars().any(char::is_uppercase),
                "{kind}: {}",
                criterion.pattern()
            );
        }
    }
}

#[test]
fn test_entertainment_matches_nothing() {
    let entertainment = CategoryKind::Entertainment.build().unwrap();
    assert!(entertainment.criteria().is_empty());
    assert!(!entertainment.is_matched(&make_txn("pathe", 2025, 1, 1)));
}

#[test]
fn test_unknown_receiver_is_unmatched() {
    assert_eq!(classify("some corner shop", 2025, 1, 1), None);
}

#[test]
fn test_known_receivers_are_unambiguous() {
    let grouped = GroupedTransactions::from_registry(UnmatchedPolicy::FileUngrouped).unwrap();
    let receivers = [
        "albert heijn 1234",
        "jumbo den haag",
        "ah to go 5521",
        "uber",
        "uber eats",
        "ns groep iz ns reizigers",
        "hema den haag",
        "ikea bv",
        "apple",
        "apple pay top-up by *1234",
        "revolut bank uab",
        "belastingdienst",
        "gemeente den haag",
        "kruidvat 7788",
        "etos 1.2",
        "ing hypotheken",
        "vve la fenetre",
        "ziggo services bv",
        "abn amro bank n.v.",
        "abn amro schadev nv",
    ];
    for receiver in receivers {
        let tx = make_txn(receiver, 2025, 3, 8);
        assert!(
            grouped.classify(&tx).unwrap().is_some(),
            "{receiver} should match exactly one category"
        );
    }
}
