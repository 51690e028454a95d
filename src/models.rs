use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow, bail};
use getset::Getters;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize, Serializer};

/// Label of the selector value that matches every category.
pub const ALL: &str = "All";

pub(crate) fn serialize_amount<S>(x: &Decimal, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&x.normalize().to_string())
}

/// A calendar month, ordered January through December.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Month(chrono::Month);

impl Month {
    pub fn number(&self) -> u32 {
        self.0.number_from_month()
    }

    /// Three letter English name, e.g. `Jan`.
    pub fn short_name(&self) -> &'static str {
        &self.0.name()[..3]
    }
}

impl Ord for Month {
    fn cmp(&self, other: &Self) -> Ordering {
        self.number().cmp(&other.number())
    }
}

impl PartialOrd for Month {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Month {
    type Err = anyhow::Error;

    /// Accepts short or long English names in any case, or a number from 1 to 12.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(n) = s.parse::<u8>() {
            return chrono::Month::try_from(n)
                .map(Month)
                .map_err(|_| anyhow!("month number out of range: {n}"));
        }
        chrono::Month::from_str(s)
            .map(Month)
            .map_err(|_| anyhow!("unrecognized month: {s:?}"))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl Serialize for Month {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.short_name())
    }
}

/// One row of the sales table. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
pub struct SalesRecord {
    #[getset(get = "pub")]
    month: Month,
    #[getset(get = "pub")]
    category: String,
    #[getset(get = "pub")]
    #[serde(serialize_with = "serialize_amount")]
    amount: Decimal,
}

impl SalesRecord {
    /// Builds a record, rejecting an empty category or a negative amount.
    pub fn new(month: Month, category: impl Into<String>, amount: Decimal) -> Result<Self> {
        let category = category.into();
        if category.trim().is_empty() {
            bail!("record for {month} has an empty category");
        }
        if amount.is_sign_negative() && !amount.is_zero() {
            bail!("record {month}/{category} has a negative amount: {amount}");
        }
        Ok(SalesRecord {
            month,
            category,
            amount,
        })
    }
}

/// Row of a long-format source file: `month,category,amount`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Getters)]
pub struct RawRecord {
    #[getset(get = "pub")]
    month: String,
    #[getset(get = "pub")]
    category: String,
    #[getset(get = "pub")]
    amount: String,
}

impl TryFrom<RawRecord> for SalesRecord {
    type Error = anyhow::Error;

    fn try_from(raw: RawRecord) -> Result<Self> {
        let month = raw.month.parse::<Month>()?;
        let amount = raw
            .amount
            .trim()
            .parse::<Decimal>()
            .map_err(|e| anyhow!("invalid amount {:?}: {e}", raw.amount))?;
        SalesRecord::new(month, raw.category.trim(), amount)
    }
}

/// The category filter chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    All,
    Category(String),
}

impl Selector {
    pub fn as_str(&self) -> &str {
        match self {
            Selector::All => ALL,
            Selector::Category(name) => name,
        }
    }
}

impl From<&str> for Selector {
    fn from(value: &str) -> Self {
        let value = value.trim();
        if value == ALL {
            Selector::All
        } else {
            Selector::Category(value.to_string())
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Selector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}
