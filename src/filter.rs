use anyhow::Result;
use tracing::trace;

use crate::{
    dataset::Dataset,
    errors::DashboardError,
    models::{SalesRecord, Selector},
};

/// The records matching a selector, borrowed from the dataset in load order.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a> {
    selector: Selector,
    records: Vec<&'a SalesRecord>,
}

impl<'a> FilteredView<'a> {
    /// A view over every record of `dataset`, regardless of category.
    pub fn full(dataset: &'a Dataset) -> Self {
        FilteredView {
            selector: Selector::All,
            records: dataset.all().iter().collect(),
        }
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn records(&self) -> &[&'a SalesRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a SalesRecord> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Selects the records of `dataset` matching `selector`, preserving order.
///
/// Fails with `InvalidSelector` when the selector names a category the
/// dataset does not contain.
pub fn filter<'a>(dataset: &'a Dataset, selector: &Selector) -> Result<FilteredView<'a>> {
    let view = match selector {
        Selector::All => FilteredView::full(dataset),
        Selector::Category(name) => {
            if !dataset.has_category(name) {
                return Err(DashboardError::InvalidSelector(name.clone()))?;
            }
            FilteredView {
                selector: selector.clone(),
                records: dataset
                    .all()
                    .iter()
                    .filter(|rec| rec.category() == name)
                    .collect(),
            }
        }
    };
    trace!("selector {selector} matched {} records", view.len());
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Result<Dataset> {
        Dataset::from_reader(
            "test",
            "month,category,amount\nJan,Electronics,100\nFeb,Electronics,150\nJan,Furniture,50\nMar,Electronics,10\n"
                .as_bytes(),
        )
    }

    #[test]
    fn test_filter_all_is_identity() -> Result<()> {
        let dataset = dataset()?;
        let view = filter(&dataset, &Selector::All)?;
        assert_eq!(view.len(), dataset.len());
        for (got, want) in view.iter().zip(dataset.all()) {
            assert!(std::ptr::eq(got, want));
        }
        Ok(())
    }

    #[test]
    fn test_filter_category_keeps_only_matches_in_order() -> Result<()> {
        let dataset = dataset()?;
        let view = filter(&dataset, &Selector::from("Electronics"))?;
        let months: Vec<_> = view.iter().map(|r| r.month().short_name()).collect();
        assert_eq!(months, vec!["Jan", "Feb", "Mar"]);
        assert!(view.iter().all(|r| r.category() == "Electronics"));
        assert_eq!(view.selector(), &Selector::from("Electronics"));
        Ok(())
    }

    #[test]
    fn test_filter_every_category_partitions_dataset() -> Result<()> {
        let dataset = dataset()?;
        let mut seen = 0;
        for category in dataset.categories() {
            let view = filter(&dataset, &Selector::Category(category.clone()))?;
            assert!(view.iter().all(|r| r.category() == category));
            seen += view.len();
        }
        assert_eq!(seen, dataset.len());
        Ok(())
    }

    #[test]
    fn test_filter_rejects_unknown_category() -> Result<()> {
        let dataset = dataset()?;
        let err = filter(&dataset, &Selector::from("Nonexistent")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DashboardError>(),
            Some(DashboardError::InvalidSelector(name)) if name == "Nonexistent"
        ));
        Ok(())
    }

    #[test]
    fn test_filter_empty_dataset_all_is_empty() -> Result<()> {
        let dataset = Dataset::new(Vec::new())?;
        let view = filter(&dataset, &Selector::All)?;
        assert!(view.is_empty());
        Ok(())
    }
}
