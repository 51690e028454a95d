use std::collections::BTreeMap;

use rust_decimal::prelude::*;
use serde::Serialize;

use crate::{
    filter::FilteredView,
    models::{Month, Selector, serialize_amount},
};

const Y_LABEL: &str = "Sales ($)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Line,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataPoint {
    pub label: String,
    #[serde(serialize_with = "serialize_amount")]
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<DataPoint>,
}

impl ChartSpec {
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.points.iter().map(|p| p.label.as_str())
    }

    /// Sum of every plotted value.
    pub fn sum(&self) -> Decimal {
        self.points.iter().map(|p| p.value).sum()
    }

    /// Value plotted for `label`, if any.
    pub fn value_of(&self, label: &str) -> Option<Decimal> {
        self.points.iter().find(|p| p.label == label).map(|p| p.value)
    }
}

/// Bar chart comparing categories when the view spans every category, or
/// comparing months when it is narrowed to one. Bars keep first-seen order.
pub fn build_bar_chart(view: &FilteredView<'_>) -> ChartSpec {
    let (title, x_label) = match view.selector() {
        Selector::All => ("Sales by Category".to_string(), "Category"),
        Selector::Category(name) => (format!("Monthly Sales - {name}"), "Month"),
    };

    let mut points: Vec<DataPoint> = Vec::new();
    for rec in view.iter() {
        let label = match view.selector() {
            Selector::All => rec.category().clone(),
            Selector::Category(_) => rec.month().to_string(),
        };
        match points.iter_mut().find(|p| p.label == label) {
            Some(point) => point.value += *rec.amount(),
            None => points.push(DataPoint {
                label,
                value: *rec.amount(),
            }),
        }
    }

    ChartSpec {
        kind: ChartKind::Bar,
        title,
        x_label: x_label.to_string(),
        y_label: Y_LABEL.to_string(),
        points,
    }
}

/// Line chart of monthly sales, one point per month in calendar order.
pub fn build_line_chart(view: &FilteredView<'_>) -> ChartSpec {
    let mut by_month: BTreeMap<Month, Decimal> = BTreeMap::new();
    for rec in view.iter() {
        *by_month.entry(*rec.month()).or_insert(Decimal::ZERO) += *rec.amount();
    }

    ChartSpec {
        kind: ChartKind::Line,
        title: format!("Sales Trend - {}", view.selector()),
        x_label: "Month".to_string(),
        y_label: Y_LABEL.to_string(),
        points: by_month
            .into_iter()
            .map(|(month, value)| DataPoint {
                label: month.to_string(),
                value,
            })
            .collect(),
    }
}
