//! Data access for sales

mod memory;
mod postgres;

pub use memory::MemorySaleStore;
pub use postgres::PgSaleStore;

use crate::model::{SaleId, SaleRecord};
use crate::Result;
use async_trait::async_trait;

/// Read access to sales for receipt generation
#[async_trait]
pub trait SaleStore: Send + Sync {
    /// Fetch a sale with its passengers, installments (ordinal ascending) and creator
    ///
    /// Returns `Ok(None)` when no sale has this id.
    async fn fetch_sale(&self, id: SaleId) -> Result<Option<SaleRecord>>;

    /// Verify the store is reachable
    async fn health_check(&self) -> Result<()>;
}
