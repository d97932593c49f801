use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Persisted field order. The store header is `category` followed by these.
pub const FIELD_NAMES: [&str; 7] = [
    "sender_bank",
    "sender",
    "receiver",
    "currency",
    "date",
    "amount",
    "raw",
];

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bank {
    AbnAmro,
    Ing,
    Revolut,
}

impl Bank {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AbnAmro => "ABNAMRO",
            Self::Ing => "ING",
            Self::Revolut => "Revolut",
        }
    }

    pub fn all() -> &'static [Bank] {
        &[Self::AbnAmro, Self::Ing, Self::Revolut]
    }
}

impl FromStr for Bank {
    type Err = Error;

    /// Only the canonical spelling is accepted; the store is bit-exact.
    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| Error::malformed(None, format!("unknown bank '{s}'")))
    }
}

impl std::fmt::Display for Bank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A normalized bank transaction.
///
/// Identity (equality, hashing, ordering) is the dedup key
/// `(sender, receiver, currency, date, amount)`; `sender_bank` and `raw` are
/// carried along but never compared. Ordering is by date first.
#[derive(Debug, Clone)]
pub struct Transaction {
    sender_bank: Bank,
    sender: String,
    receiver: String,
    currency: String,
    date: NaiveDate,
    amount: Decimal,
    raw: String,
}

impl Transaction {
    /// Builds a transaction, lowercasing the free-text identity fields.
    pub fn new(
        sender_bank: Bank,
        sender: &str,
        receiver: &str,
        currency: &str,
        date: NaiveDate,
        amount: Decimal,
        raw: impl Into<String>,
    ) -> Self {
        Self {
            sender_bank,
            sender: sender.to_lowercase(),
            receiver: receiver.to_lowercase(),
            currency: currency.to_lowercase(),
            date,
            amount,
            raw: raw.into(),
        }
    }

    /// Parse the seven persisted fields, in [`FIELD_NAMES`] order.
    pub fn from_strings(fields: &[&str]) -> Result<Self> {
        let [bank, sender, receiver, currency, date, amount, raw] = fields else {
            return Err(Error::malformed(
                None,
                format!(
                    "expected {} transaction fields, found {}",
                    FIELD_NAMES.len(),
                    fields.len()
                ),
            ));
        };

        let sender_bank = Bank::from_str(bank)?;
        let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|e| Error::malformed(None, format!("invalid date '{date}': {e}")))?;
        let amount = Decimal::from_str(amount)
            .map_err(|e| Error::malformed(None, format!("invalid amount '{amount}': {e}")))?;

        Ok(Self::new(
            sender_bank,
            sender,
            receiver,
            currency,
            date,
            amount,
            *raw,
        ))
    }

    pub fn to_strings(&self) -> [String; 7] {
        [
            self.sender_bank.as_str().to_string(),
            self.sender.clone(),
            self.receiver.clone(),
            self.currency.clone(),
            self.date.format(DATE_FORMAT).to_string(),
            self.amount.to_string(),
            self.raw.clone(),
        ]
    }

    pub fn sender_bank(&self) -> Bank {
        self.sender_bank
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn receiver(&self) -> &str {
        &self.receiver
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_income(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_expense(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    pub fn abs_amount(&self) -> Decimal {
        self.amount.abs()
    }

    fn key(&self) -> (NaiveDate, &str, &str, &str, Decimal) {
        (
            self.date,
            &self.sender,
            &self.receiver,
            &self.currency,
            self.amount,
        )
    }
}

impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Transaction {}

impl Hash for Transaction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Transaction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Transaction {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {} -> {} [{}]",
            self.date.format(DATE_FORMAT),
            self.amount,
            self.currency,
            self.sender,
            self.receiver,
            self.sender_bank
        )
    }
}
