use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Result, anyhow};
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::prelude::*;
use tracing::{debug, info};

use crate::{
    errors::DashboardError,
    models::{Month, RawRecord, SalesRecord},
};

const MONTH_COLUMN: &str = "month";
const LONG_FORMAT_HEADERS: [&str; 3] = ["month", "category", "amount"];

const SAMPLE_MONTHS: [&str; 6] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun"];
const SAMPLE_SERIES: [(&str, [i64; 6]); 3] = [
    ("Electronics", [15000, 18000, 22000, 19000, 24000, 21000]),
    ("Clothing", [8000, 9500, 11000, 10500, 12000, 13000]),
    ("Food", [12000, 13000, 14000, 14500, 15000, 16000]),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<SalesRecord>,
    categories: Vec<String>,
}

impl Dataset {
    /// Builds a dataset from already validated records.
    ///
    /// Fails with `ValueOverflow` when the grand total does not fit a `Decimal`;
    /// past that check no subset total can overflow.
    pub fn new(records: Vec<SalesRecord>) -> Result<Self> {
        records.iter().try_fold(Decimal::ZERO, |acc, rec| {
            acc.checked_add(*rec.amount())
                .ok_or(DashboardError::ValueOverflow)
        })?;

        let mut categories: Vec<String> = Vec::new();
        for rec in &records {
            if !categories.iter().any(|c| c == rec.category()) {
                categories.push(rec.category().clone());
            }
        }

        Ok(Dataset {
            records,
            categories,
        })
    }

    /// Loads the dataset from a CSV file.
    pub fn load(path: &Path) -> Result<Self> {
        let origin = path.display().to_string();
        let file = File::open(path).map_err(|e| DashboardError::data_load(&origin, e))?;
        let dataset = Self::from_reader(&origin, file)?;
        info!(
            "loaded {} records in {} categories from {origin}",
            dataset.len(),
            dataset.categories().len()
        );
        Ok(dataset)
    }

    /// Parses CSV in either long (`month,category,amount`) or wide
    /// (`month,<category>,...`) layout. Every failure is a `DataLoad` error.
    pub fn from_reader<R: Read>(origin: &str, input: R) -> Result<Self> {
        Self::parse(input)
            .map_err(|e| match e.downcast::<DashboardError>() {
                Ok(DashboardError::ValueOverflow) => {
                    DashboardError::data_load(origin, DashboardError::ValueOverflow)
                }
                Ok(other) => other,
                Err(e) => DashboardError::data_load(origin, format!("{e:#}")),
            })
            .map_err(Into::into)
    }

    /// The six month, three category table the dashboard ships with.
    pub fn sample() -> Result<Self> {
        let mut records = Vec::new();
        for (row, month) in SAMPLE_MONTHS.iter().enumerate() {
            let month = month.parse::<Month>()?;
            for (category, values) in SAMPLE_SERIES.iter() {
                records.push(SalesRecord::new(
                    month,
                    *category,
                    Decimal::from(values[row]),
                )?);
            }
        }
        Self::new(records)
    }

    /// Every record, in load order.
    pub fn all(&self) -> &[SalesRecord] {
        &self.records
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn parse<R: Read>(input: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(input);

        let headers: StringRecord = reader
            .headers()?
            .iter()
            .map(|h| h.to_lowercase())
            .collect();

        let is_long = LONG_FORMAT_HEADERS
            .iter()
            .all(|h| headers.iter().any(|c| c == *h));
        let records = if is_long {
            debug!("reading long format sales table");
            Self::parse_long(&mut reader, &headers)?
        } else {
            debug!("reading wide format sales table");
            Self::parse_wide(&mut reader)?
        };

        Self::new(records)
    }

    fn parse_long<R: Read>(
        reader: &mut csv::Reader<R>,
        headers: &StringRecord,
    ) -> Result<Vec<SalesRecord>> {
        let mut records = Vec::new();
        for (line, row) in reader.records().enumerate() {
            let raw: RawRecord = row?.deserialize(Some(headers))?;
            let rec =
                SalesRecord::try_from(raw).map_err(|e| anyhow!("row {}: {e}", line + 1))?;
            records.push(rec);
        }
        Ok(records)
    }

    fn parse_wide<R: Read>(reader: &mut csv::Reader<R>) -> Result<Vec<SalesRecord>> {
        let headers = reader.headers()?.clone();
        let month_idx = headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(MONTH_COLUMN))
            .ok_or(anyhow!("missing {MONTH_COLUMN:?} column"))?;

        let mut records = Vec::new();
        for (line, row) in reader.records().enumerate() {
            let row = row?;
            let cell = row
                .get(month_idx)
                .ok_or(anyhow!("row {}: missing month", line + 1))?;
            let month = cell
                .parse::<Month>()
                .map_err(|e| anyhow!("row {}: {e}", line + 1))?;

            for (idx, category) in headers.iter().enumerate() {
                if idx == month_idx {
                    continue;
                }
                let value = row.get(idx).unwrap_or_default();
                let amount = value.parse::<Decimal>().map_err(|e| {
                    anyhow!("row {}, {category}: invalid amount {value:?}: {e}", line + 1)
                })?;
                let rec = SalesRecord::new(month, category, amount)
                    .map_err(|e| anyhow!("row {}: {e}", line + 1))?;
                records.push(rec);
            }
        }
        Ok(records)
    }
}
