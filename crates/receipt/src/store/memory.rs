//! In-memory sale store

use super::SaleStore;
use crate::model::{SaleId, SaleRecord};
use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// Sale store backed by a map, for tests and demos
#[derive(Debug, Default)]
pub struct MemorySaleStore {
    sales: RwLock<HashMap<SaleId, SaleRecord>>,
}

impl MemorySaleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record; installments are kept sorted by ordinal
    pub fn insert(&self, mut record: SaleRecord) {
        record.installments.sort_by_key(|i| i.number);
        let mut sales = self.sales.write().unwrap_or_else(|e| e.into_inner());
        sales.insert(record.sale.id, record);
    }

    pub fn len(&self) -> usize {
        self.sales.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<SaleRecord> for MemorySaleStore {
    fn from_iter<I: IntoIterator<Item = SaleRecord>>(iter: I) -> Self {
        let store = Self::new();
        for record in iter {
            store.insert(record);
        }
        store
    }
}

#[async_trait]
impl SaleStore for MemorySaleStore {
    async fn fetch_sale(&self, id: SaleId) -> Result<Option<SaleRecord>> {
        let sales = self.sales.read().unwrap_or_else(|e| e.into_inner());
        Ok(sales.get(&id).cloned())
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
