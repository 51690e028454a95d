use std::sync::Arc;

use anyhow::Result;
use getset::Getters;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    charts::{ChartSpec, build_bar_chart, build_line_chart},
    dataset::Dataset,
    errors::DashboardError,
    filter::{FilteredView, filter},
    models::{Selector, serialize_amount},
    total::{format_total, total},
    traits::Exporter,
};

/// Input events produced by the user interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SelectorChanged(String),
    ExportRequested,
}

/// Which records an export request writes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportScope {
    /// The records matching the current selector.
    #[default]
    Filtered,
    /// The whole dataset.
    Full,
}

/// Everything the renderer needs for one update, derived from one view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
#[getset(get = "pub")]
pub struct OutputBundle {
    selector: Selector,
    bar_chart: ChartSpec,
    line_chart: ChartSpec,
    #[serde(serialize_with = "serialize_amount")]
    total: Decimal,
    total_display: String,
    status_message: Option<String>,
}

/// Per-user state: the accepted selector and the output it produced.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct Session {
    selector: Selector,
    bundle: OutputBundle,
}

pub struct Dashboard<E> {
    dataset: Arc<Dataset>,
    exporter: E,
    export_scope: ExportScope,
}

impl<E> Dashboard<E>
where
    E: Exporter,
{
    pub fn new(dataset: Arc<Dataset>, exporter: E) -> Self {
        Self {
            dataset,
            exporter,
            export_scope: ExportScope::default(),
        }
    }

    pub fn with_export_scope(mut self, export_scope: ExportScope) -> Self {
        self.export_scope = export_scope;
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Dropdown options: `All` followed by each category in first-seen order.
    pub fn selector_options(&self) -> Vec<Selector> {
        std::iter::once(Selector::All)
            .chain(
                self.dataset
                    .categories()
                    .iter()
                    .map(|c| Selector::Category(c.clone())),
            )
            .collect()
    }

    /// Starts a session showing `initial`. Fails with `InvalidSelector` when
    /// `initial` is not a valid choice.
    pub fn open_session(&self, initial: &str) -> Result<Session> {
        let selector = Selector::from(initial);
        let bundle = self.render(&selector)?;
        Ok(Session { selector, bundle })
    }

    /// Applies one event to a session and returns the next session.
    pub fn handle(&self, session: Session, event: Event) -> Session {
        match event {
            Event::SelectorChanged(value) => self.change_selector(session, &value),
            Event::ExportRequested => self.export(session),
        }
    }

    fn change_selector(&self, mut session: Session, value: &str) -> Session {
        let selector = Selector::from(value);
        match self.render(&selector) {
            Ok(bundle) => {
                debug!("selector changed to {selector}");
                Session { selector, bundle }
            }
            Err(e) => {
                warn!("rejected selector {value:?}: {e}");
                let message = match e.downcast_ref::<DashboardError>() {
                    Some(DashboardError::InvalidSelector(name)) => {
                        format!("Invalid category selected: {name}")
                    }
                    _ => format!("An error occurred while updating: {e}"),
                };
                session.bundle.status_message = Some(message);
                session
            }
        }
    }

    fn export(&self, mut session: Session) -> Session {
        let view = match self.export_scope {
            ExportScope::Filtered => filter(&self.dataset, &session.selector),
            ExportScope::Full => Ok(FilteredView::full(&self.dataset)),
        };
        let message = match view {
            Ok(view) => {
                let result = self.exporter.export(&view);
                match (result.success, result.path) {
                    (true, Some(path)) => {
                        format!("Data exported successfully as {}", path.display())
                    }
                    (true, None) => "Data exported successfully".to_string(),
                    (false, _) => format!("Failed to export data: {}", result.message),
                }
            }
            Err(e) => format!("Failed to export data: {e}"),
        };
        info!("{message}");
        session.bundle.status_message = Some(message);
        session
    }

    /// Filters once and derives charts and total from that single view.
    fn render(&self, selector: &Selector) -> Result<OutputBundle> {
        let view = filter(&self.dataset, selector)?;
        let total = total(&view);
        Ok(OutputBundle {
            selector: selector.clone(),
            bar_chart: build_bar_chart(&view),
            line_chart: build_line_chart(&view),
            total,
            total_display: format_total(total),
            status_message: None,
        })
    }
}
