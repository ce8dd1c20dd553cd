//! OpportunityStore trait definition

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{ArbitrageError, Result};
use crate::types::{ArbitrageOpportunity, SavedOpportunity};

/// Storage for opportunities the user chose to keep
///
/// Implementations (in-memory, JSON file) can be swapped without changing
/// the API layer.
#[async_trait]
pub trait OpportunityStore: Send + Sync {
    /// Persist an opportunity
    ///
    /// # Returns
    /// The saved record with a fresh id and capture timestamp
    async fn save(&self, opportunity: ArbitrageOpportunity) -> Result<SavedOpportunity>;

    /// Get a saved opportunity by id
    ///
    /// # Returns
    /// The record if found, None otherwise
    async fn get(&self, id: Uuid) -> Result<Option<SavedOpportunity>>;

    /// All saved opportunities, oldest first
    async fn list(&self) -> Result<Vec<SavedOpportunity>>;

    /// Delete a saved opportunity
    ///
    /// # Errors
    /// [`ArbitrageError::NotFound`] if no record has this id
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Number of saved opportunities
    async fn count(&self) -> Result<usize>;
}

/// Reject records that cannot be grouped or sorted later
pub fn validate_for_save(opportunity: &ArbitrageOpportunity) -> Result<()> {
    if opportunity.expiry_date.trim().is_empty() {
        return Err(ArbitrageError::InvalidInput("expiry_date is empty".to_string()));
    }
    if !opportunity.strike_price.is_finite() || opportunity.strike_price <= 0.0 {
        return Err(ArbitrageError::InvalidInput(format!(
            "strike_price {} is not a positive number",
            opportunity.strike_price
        )));
    }
    if opportunity.call_option_id.is_empty() || opportunity.put_option_id.is_empty() {
        return Err(ArbitrageError::InvalidInput("option ids are required".to_string()));
    }
    Ok(())
}
