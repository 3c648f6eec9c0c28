//! The aggregate the stats cache memoizes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::storage::Item;

/// Item count and mean price at one point in the store's history.
///
/// The mean of an empty store is `0.0`, never `NaN`, so the value always
/// serializes as a JSON number.
///
/// # Example
/// ```
/// use catalogd::{ItemId, NewItem, StatsSnapshot};
///
/// let items = vec![
///     NewItem::new("a", "x", 10.0).into_item(ItemId::new(1)),
///     NewItem::new("b", "x", 20.0).into_item(ItemId::new(2)),
/// ];
/// let stats = StatsSnapshot::from_items(&items);
/// assert_eq!(stats.total, 2);
/// assert_eq!(stats.average_price, 15.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub total: usize,
    pub average_price: f64,
}

impl StatsSnapshot {
    /// Aggregate over every item.
    pub fn from_items(items: &[Item]) -> Self {
        let total = items.len();
        let average_price = if total == 0 {
            0.0
        } else {
            items.iter().map(|item| item.price).sum::<f64>() / total as f64
        };

        Self {
            total,
            average_price,
        }
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ total: {}, average_price: {:.2} }}",
            self.total, self.average_price
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ItemId;
    use crate::storage::NewItem;

    fn priced(prices: &[f64]) -> Vec<Item> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| NewItem::new("item", "misc", p).into_item(ItemId::new(i as i64)))
            .collect()
    }

    #[test]
    fn test_empty_store_mean_is_zero() {
        let stats = StatsSnapshot::from_items(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.average_price, 0.0);
    }

    #[test]
    fn test_mean_of_two() {
        let stats = StatsSnapshot::from_items(&priced(&[10.0, 20.0]));
        assert_eq!(stats, StatsSnapshot { total: 2, average_price: 15.0 });
    }

    #[test]
    fn test_mean_fractional() {
        let stats = StatsSnapshot::from_items(&priced(&[1.0, 2.0, 2.0]));
        assert!((stats.average_price - 5.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_unpriced_items_count_as_zero() {
        let items: Vec<Item> = serde_json::from_value(serde_json::json!([
            { "id": 1, "name": "Lamp", "price": 30 },
            { "id": 2, "name": "Rug" },
            { "id": 3, "name": "Vase", "price": "12" },
            { "id": 4, "name": "Mug", "price": null }
        ]))
        .unwrap();

        let stats = StatsSnapshot::from_items(&items);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.average_price, 7.5);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(StatsSnapshot::from_items(&priced(&[4.0]))).unwrap();
        assert_eq!(json, serde_json::json!({ "total": 1, "averagePrice": 4.0 }));
    }

    #[test]
    fn test_display() {
        let display = format!("{}", StatsSnapshot::from_items(&priced(&[10.0, 20.0])));
        assert!(display.contains("total: 2"));
        assert!(display.contains("15.00"));
    }
}
