//! Store Info Repository

use std::sync::Arc;

use shared::models::{StoreInfo, StoreInfoUpdate};
use shared::{AppError, AppResult};

use crate::calendar::TradingHours;
use crate::db::DataStore;

#[derive(Clone)]
pub struct StoreInfoRepository<S> {
    store: Arc<S>,
}

impl<S: DataStore> StoreInfoRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Get store info
    pub async fn get(&self, store_id: &str) -> AppResult<StoreInfo> {
        self.store
            .store_info(store_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Store {store_id} not found")))
    }

    /// Parsed trading window for business-day computations
    pub async fn trading_hours(&self, store_id: &str) -> AppResult<TradingHours> {
        TradingHours::from_store(&self.get(store_id).await?)
    }

    /// Update store info
    ///
    /// Opening/closing times are validated as "HH:MM" before the write so
    /// a bad value can never poison later business-day math.
    pub async fn update(&self, store_id: &str, data: StoreInfoUpdate) -> AppResult<StoreInfo> {
        let mut info = self.get(store_id).await?;

        if let Some(name) = data.name {
            info.name = name;
        }
        if let Some(address) = data.address {
            info.address = Some(address);
        }
        if let Some(phone) = data.phone {
            info.phone = Some(phone);
        }
        if let Some(service_charge) = data.service_charge {
            info.service_charge = Some(service_charge);
        }
        if let Some(table_charge) = data.table_charge {
            info.table_charge = Some(table_charge);
        }
        if let Some(opening_time) = data.opening_time {
            crate::calendar::parse_hhmm(&opening_time)?;
            info.opening_time = Some(opening_time);
        }
        if let Some(closing_time) = data.closing_time {
            crate::calendar::parse_hhmm(&closing_time)?;
            info.closing_time = Some(closing_time);
        }

        Ok(self.store.update_store_info(info).await?)
    }
}
