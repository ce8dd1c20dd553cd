//! In-memory opportunity store implementation

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::{ArbitrageError, Result};
use crate::store::traits::{validate_for_save, OpportunityStore};
use crate::types::{ArbitrageOpportunity, SavedOpportunity};

/// In-memory store for tests and ephemeral runs
#[derive(Debug)]
pub struct InMemoryOpportunityStore {
    records: RwLock<Vec<SavedOpportunity>>,
}

impl InMemoryOpportunityStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryOpportunityStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OpportunityStore for InMemoryOpportunityStore {
    async fn save(&self, opportunity: ArbitrageOpportunity) -> Result<SavedOpportunity> {
        validate_for_save(&opportunity)?;
        let saved = SavedOpportunity::new(opportunity);
        self.records.write().push(saved.clone());
        Ok(saved)
    }

    async fn get(&self, id: Uuid) -> Result<Option<SavedOpportunity>> {
        Ok(self.records.read().iter().find(|r| r.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<SavedOpportunity>> {
        Ok(self.records.read().clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut records = self.records.write();
        let index = records
            .iter()
            .position(|r| r.id == id)
            .ok_or(ArbitrageError::NotFound(id))?;
        records.remove(index);
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.read().len())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use assert_matches::assert_matches;

    pub(crate) fn sample(expiry: &str, strike: f64) -> ArbitrageOpportunity {
        ArbitrageOpportunity {
            expiry_date: expiry.to_string(),
            strike_price: strike,
            btc_price: 65000.0,
            days_to_expiry: 30.0,
            years_to_expiry: 30.0 / 365.0,
            synthetic_long_price: 62730.0,
            long_price_diff: 2270.0,
            long_annual_rate: 0.4249,
            synthetic_short_price: 61950.0,
            short_price_diff: -3050.0,
            short_annual_rate: -0.5709,
            call_option_id: format!("BTC-USD-{}-{}-C", &expiry[2..], strike),
            call_ask: 0.05,
            call_bid: 0.04,
            put_option_id: format!("BTC-USD-{}-{}-P", &expiry[2..], strike),
            put_ask: 0.01,
            put_bid: 0.008,
            opportunity_cost: 267.12,
        }
    }

    #[tokio::test]
    async fn test_save_and_get() {
        let store = InMemoryOpportunityStore::new();

        let saved = store.save(sample("20250328", 60000.0)).await.unwrap();
        let fetched = store.get(saved.id).await.unwrap().unwrap();

        assert_eq!(fetched, saved);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let store = InMemoryOpportunityStore::new();
        let a = store.save(sample("20250627", 70000.0)).await.unwrap();
        let b = store.save(sample("20250328", 60000.0)).await.unwrap();

        let ids: Vec<Uuid> = store.list().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemoryOpportunityStore::new();
        let saved = store.save(sample("20250328", 60000.0)).await.unwrap();

        store.delete(saved.id).await.unwrap();
        assert!(store.get(saved.id).await.unwrap().is_none());
        assert_matches!(store.delete(saved.id).await, Err(ArbitrageError::NotFound(id)) if id == saved.id);
    }

    #[tokio::test]
    async fn test_rejects_invalid() {
        let store = InMemoryOpportunityStore::new();

        let mut bad = sample("20250328", 60000.0);
        bad.strike_price = f64::NAN;
        assert_matches!(store.save(bad).await, Err(ArbitrageError::InvalidInput(_)));

        let mut bad = sample("20250328", 60000.0);
        bad.expiry_date = String::new();
        assert_matches!(store.save(bad).await, Err(ArbitrageError::InvalidInput(_)));

        assert_eq!(store.count().await.unwrap(), 0);
    }
}
