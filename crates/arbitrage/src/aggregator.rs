//! Grouping of opportunities by expiry

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

use crate::types::{ArbitrageOpportunity, SavedOpportunity};

/// Opportunities keyed by `20YYMMDD` expiry, ascending
pub type GroupedByExpiry<T> = BTreeMap<String, Vec<T>>;

/// Anything that can be grouped by expiry and ordered by strike
pub trait ExpiryKeyed {
    fn expiry_date(&self) -> &str;
    fn strike_price(&self) -> f64;
}

impl ExpiryKeyed for ArbitrageOpportunity {
    fn expiry_date(&self) -> &str {
        &self.expiry_date
    }

    fn strike_price(&self) -> f64 {
        self.strike_price
    }
}

impl ExpiryKeyed for SavedOpportunity {
    fn expiry_date(&self) -> &str {
        &self.opportunity.expiry_date
    }

    fn strike_price(&self) -> f64 {
        self.opportunity.strike_price
    }
}

/// Partition by expiry date, then sort each group by ascending strike.
///
/// The sort is stable: equal strikes keep their input order.
pub fn group_by_expiry<T: ExpiryKeyed>(items: impl IntoIterator<Item = T>) -> GroupedByExpiry<T> {
    let mut grouped: GroupedByExpiry<T> = BTreeMap::new();

    for item in items {
        grouped
            .entry(item.expiry_date().to_string())
            .or_default()
            .push(item);
    }

    for group in grouped.values_mut() {
        group.sort_by_key(|item| OrderedFloat(item.strike_price()));
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        expiry: &'static str,
        strike: f64,
        tag: u32,
    }

    impl ExpiryKeyed for Item {
        fn expiry_date(&self) -> &str {
            self.expiry
        }

        fn strike_price(&self) -> f64 {
            self.strike
        }
    }

    fn item(expiry: &'static str, strike: f64, tag: u32) -> Item {
        Item { expiry, strike, tag }
    }

    #[test]
    fn test_partition_and_sort() {
        let grouped = group_by_expiry(vec![
            item("20250627", 70000.0, 0),
            item("20250328", 65000.0, 1),
            item("20250328", 55000.0, 2),
            item("20250627", 60000.0, 3),
            item("20250328", 60000.0, 4),
        ]);

        assert_eq!(grouped.keys().collect::<Vec<_>>(), vec!["20250328", "20250627"]);

        let march: Vec<f64> = grouped["20250328"].iter().map(|i| i.strike).collect();
        assert_eq!(march, vec![55000.0, 60000.0, 65000.0]);

        let june: Vec<f64> = grouped["20250627"].iter().map(|i| i.strike).collect();
        assert_eq!(june, vec![60000.0, 70000.0]);

        let total: usize = grouped.values().map(Vec::len).sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn test_equal_strikes_keep_order() {
        let grouped = group_by_expiry(vec![
            item("20250328", 60000.0, 7),
            item("20250328", 50000.0, 8),
            item("20250328", 60000.0, 9),
        ]);
        let tags: Vec<u32> = grouped["20250328"].iter().map(|i| i.tag).collect();
        assert_eq!(tags, vec![8, 7, 9]);
    }

    #[test]
    fn test_empty() {
        assert!(group_by_expiry(Vec::<Item>::new()).is_empty());
    }
}
