//! Classification and persistence of bank transactions into spending
//! categories.
//!
//! Transactions go through [`import::dedup`], are partitioned by
//! [`categorize::GroupedTransactions`] and written with [`store::Store`].

pub mod categorize;
pub mod config;
pub mod error;
pub mod import;
pub mod models;
pub mod store;
pub mod validate;

pub use error::{Error, Result};
