//! Stock-keeping operations built on top of [`TeaStore`]
//!
//! These cover what the shop front does with a tea besides editing it:
//! selling a unit, receiving stock, and pulling the details needed to ask
//! the warehouse for more.

use crate::contract::{TeaColumn, TeaType};
use crate::storage::{Direction, Selection, SortOrder, TeaStore};
use crate::tea::{Tea, TeaValues};
use crate::uri::ContentUri;
use crate::Result;
use serde::Serialize;

/// What a restock request needs to say about a tea.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestockSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub tea_type: TeaType,
    /// Units currently in stock
    pub quantity: i64,
}

impl From<&Tea> for RestockSummary {
    fn from(tea: &Tea) -> Self {
        Self {
            name: tea.name.clone(),
            tea_type: tea.tea_type,
            quantity: tea.quantity,
        }
    }
}

pub struct InventoryService<'a> {
    store: &'a TeaStore,
}

impl<'a> InventoryService<'a> {
    pub fn new(store: &'a TeaStore) -> Self {
        Self { store }
    }

    /// Sell one unit. Returns the new quantity, or `None` if the tea does not
    /// exist. A tea with no stock is left as is.
    pub fn sell_one(&self, id: i64) -> Result<Option<i64>> {
        let Some(tea) = self.store.get(id)? else {
            return Ok(None);
        };
        if tea.quantity == 0 {
            tracing::debug!("Tea {} is out of stock, nothing sold", id);
            return Ok(Some(0));
        }

        let quantity = tea.quantity - 1;
        self.set_quantity(id, quantity)?;
        // List views watch the collection itself
        self.store.notify_change(&self.store.uris().collection_uri());
        Ok(Some(quantity))
    }

    /// Add `amount` units to stock
    pub fn receive(&self, id: i64, amount: u32) -> Result<Option<i64>> {
        self.adjust_quantity(id, i64::from(amount))
    }

    /// Apply a signed change to stock, never going below zero.
    pub fn adjust_quantity(&self, id: i64, delta: i64) -> Result<Option<i64>> {
        let Some(tea) = self.store.get(id)? else {
            return Ok(None);
        };

        let quantity = tea.quantity.saturating_add(delta).max(0);
        if quantity != tea.quantity {
            self.set_quantity(id, quantity)?;
        }
        Ok(Some(quantity))
    }

    /// Teas with fewer than `threshold` units, emptiest first
    pub fn low_stock(&self, threshold: i64) -> Result<Vec<Tea>> {
        let uri = self.store.uris().collection_uri();
        let selection = Selection::lt(TeaColumn::Quantity, threshold);
        let sort = SortOrder::asc(TeaColumn::Quantity).then(TeaColumn::Name, Direction::Asc);
        self.store.query(&uri, &[], Some(&selection), Some(&sort))?.into_teas()
    }

    pub fn restock_summary(&self, id: i64) -> Result<Option<RestockSummary>> {
        Ok(self.store.get(id)?.as_ref().map(RestockSummary::from))
    }

    /// Insert the demo tea used to populate an empty shop
    pub fn seed_sample(&self) -> Result<ContentUri> {
        let values = TeaValues::new()
            .name("Assam")
            .tea_type(TeaType::Black)
            .price(4.50)
            .quantity(12);
        self.store.insert(&self.store.uris().collection_uri(), &values)
    }

    fn set_quantity(&self, id: i64, quantity: i64) -> Result<usize> {
        let uri = self.store.uris().item_uri(id);
        self.store.update(&uri, &TeaValues::new().quantity(quantity), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::ChannelObserver;
    use std::sync::Arc;

    fn store_with(quantity: i64) -> TeaStore {
        let store = TeaStore::open_in_memory().unwrap();
        let values = TeaValues::new()
            .name("Darjeeling")
            .tea_type(TeaType::Black)
            .price(5.0)
            .quantity(quantity);
        store.insert(&store.uris().collection_uri(), &values).unwrap();
        store
    }

    #[test]
    fn test_sell_one() {
        let store = store_with(2);
        let service = InventoryService::new(&store);

        assert_eq!(service.sell_one(1).unwrap(), Some(1));
        assert_eq!(service.sell_one(1).unwrap(), Some(0));
        assert_eq!(service.sell_one(1).unwrap(), Some(0));
        assert_eq!(store.get(1).unwrap().unwrap().quantity, 0);
        assert_eq!(service.sell_one(42).unwrap(), None);
    }

    #[test]
    fn test_sell_notifies_collection() {
        let store = store_with(1);
        let teas = store.uris().collection_uri();
        let (observer, rx) = ChannelObserver::new();
        store.subscribe(&teas, false, Arc::new(observer));
        let service = InventoryService::new(&store);

        service.sell_one(1).unwrap();
        assert_eq!(rx.try_recv().unwrap().uri, teas);

        // Out of stock: no write, no notification
        service.sell_one(1).unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_adjust_clamps_at_zero() {
        let store = store_with(3);
        let service = InventoryService::new(&store);

        assert_eq!(service.adjust_quantity(1, -10).unwrap(), Some(0));
        assert_eq!(service.receive(1, 7).unwrap(), Some(7));
        assert_eq!(store.get(1).unwrap().unwrap().quantity, 7);
    }

    #[test]
    fn test_low_stock() {
        let store = store_with(10);
        let teas = store.uris().collection_uri();
        for (name, quantity) in [("Rooibos", 2), ("Chamomile", 0)] {
            let values = TeaValues::new()
                .name(name)
                .tea_type(TeaType::Herbal)
                .quantity(quantity);
            store.insert(&teas, &values).unwrap();
        }

        let service = InventoryService::new(&store);
        let names: Vec<String> = service
            .low_stock(5)
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, ["Chamomile", "Rooibos"]);
    }

    #[test]
    fn test_restock_summary() {
        let store = store_with(4);
        let service = InventoryService::new(&store);

        let summary = service.restock_summary(1).unwrap().unwrap();
        assert_eq!(summary.name, "Darjeeling");
        assert_eq!(summary.tea_type, TeaType::Black);
        assert_eq!(summary.quantity, 4);
        assert!(service.restock_summary(2).unwrap().is_none());
    }

    #[test]
    fn test_seed_sample() {
        let store = TeaStore::open_in_memory().unwrap();
        let uri = InventoryService::new(&store).seed_sample().unwrap();
        assert_eq!(uri, store.uris().item_uri(1));
        assert_eq!(store.get(1).unwrap().unwrap().name, "Assam");
    }
}
