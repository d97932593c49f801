use std::collections::HashMap;

use crate::categorize::GroupedTransactions;
use crate::error::{Error, Result};
use crate::models::{Transaction, FIELD_NAMES};

pub const DEFAULT_DELIMITER: u8 = b'|';

/// Store header: `category` then the transaction fields in store order.
pub fn header() -> Vec<&'static str> {
    std::iter::once("category").chain(FIELD_NAMES).collect()
}

/// Delimited-table encoding of a whole classifier state.
///
/// One row per (category, transaction), categories in name order and
/// transactions in their sorted order. Fields holding the delimiter, quotes
/// or line breaks are quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableCodec {
    delimiter: u8,
}

impl Default for TableCodec {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl TableCodec {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    pub fn serialize(&self, grouped: &GroupedTransactions) -> Result<String> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        wtr.write_record(header())?;
        for category in grouped.get_categories() {
            for tx in category.transactions() {
                let fields = tx.to_strings();
                wtr.write_record(
                    std::iter::once(category.name()).chain(fields.iter().map(String::as_str)),
                )?;
            }
        }

        let bytes = wtr
            .into_inner()
            .map_err(|e| Error::Csv(e.into_error().into()))?;
        String::from_utf8(bytes).map_err(|e| Error::malformed(None, e.to_string()))
    }

    /// Parse a serialized table and file its rows into `grouped`.
    ///
    /// Every row is validated before anything is filed. Returns the number of
    /// transactions added.
    pub fn deserialize(&self, input: &str, grouped: &mut GroupedTransactions) -> Result<usize> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(input.as_bytes());

        let expected = header();
        let mut header_seen = false;
        let mut rows: Vec<(String, Transaction)> = Vec::new();
        let mut owners: HashMap<Transaction, String> = HashMap::new();

        for result in rdr.records() {
            let record = result?;
            let line = record.position().map(|p| p.line());
            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }

            if !header_seen {
                let found: Vec<&str> = record.iter().collect();
                if found != expected {
                    return Err(Error::HeaderMismatch {
                        expected: self.join(&expected),
                        found: self.join(&found),
                    });
                }
                header_seen = true;
                continue;
            }

            if record.len() != expected.len() {
                return Err(Error::malformed(
                    line,
                    format!(
                        "expected {} fields, found {}",
                        expected.len(),
                        record.len()
                    ),
                ));
            }

            let category = &record[0];
            if grouped.get_category(category).is_err() {
                tracing::error!(category, line = ?line, "row names an unregistered category");
                return Err(Error::UnknownCategory(category.to_string()));
            }

            let fields: Vec<&str> = record.iter().skip(1).collect();
            let tx = Transaction::from_strings(&fields).map_err(|e| match e {
                Error::MalformedRecord { reason, .. } => Error::malformed(line, reason),
                other => other,
            })?;

            let owner = owners
                .get(&tx)
                .map(String::as_str)
                .or_else(|| grouped.find(&tx).map(|c| c.name()));
            if let Some(owner) = owner {
                if owner != category {
                    return Err(Error::malformed(
                        line,
                        format!("{tx} is filed under both {owner} and {category}"),
                    ));
                }
            }

            owners.insert(tx.clone(), category.to_string());
            rows.push((category.to_string(), tx));
        }

        if !header_seen {
            return Err(Error::MissingHeader);
        }

        let mut added = 0;
        for (category, tx) in rows {
            if grouped.restore(&category, tx)? {
                added += 1;
            }
        }
        Ok(added)
    }

    fn join(&self, fields: &[&str]) -> String {
        fields.join(&char::from(self.delimiter).to_string())
    }
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
