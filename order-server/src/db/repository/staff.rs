//! Staff Repository
//!
//! Staff deletion is logical: rows keep their id so historic staff-drink
//! records stay resolvable, and a deleted row is frozen: no further
//! updates, no second delete.

use std::sync::Arc;

use chrono::Utc;
use shared::models::{Staff, StaffCreate, StaffUpdate};
use shared::{AppError, AppResult};

use super::new_record_id;
use crate::db::DataStore;

#[derive(Clone)]
pub struct StaffRepository<S> {
    store: Arc<S>,
}

impl<S: DataStore> StaffRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Find all staff in a store, excluding soft-deleted, ordered by name
    pub async fn find_all(&self, store_id: &str) -> AppResult<Vec<Staff>> {
        let mut staff: Vec<Staff> = self
            .store
            .staff_by_store(store_id)
            .await?
            .into_iter()
            .filter(|s| !s.is_deleted())
            .collect();
        staff.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(staff)
    }

    /// Find active staff only (selectable for staff drinks)
    pub async fn find_active(&self, store_id: &str) -> AppResult<Vec<Staff>> {
        let mut staff = self.find_all(store_id).await?;
        staff.retain(|s| s.is_active);
        Ok(staff)
    }

    /// Find staff by id
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Staff>> {
        Ok(self.store.staff(id).await?)
    }

    /// Create a new staff member (active)
    pub async fn create(&self, data: StaffCreate) -> AppResult<Staff> {
        let staff = Staff {
            id: new_record_id(),
            store_id: data.store_id,
            name: data.name,
            staff_code: data.staff_code,
            is_active: true,
            deleted_at: None,
        };
        Ok(self.store.insert_staff(staff).await?)
    }

    /// Update a staff member
    ///
    /// Soft-deleted staff cannot be updated.
    pub async fn update(&self, id: &str, data: StaffUpdate) -> AppResult<Staff> {
        let mut staff = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Staff {id} not found")))?;

        if staff.is_deleted() {
            return Err(AppError::validation("Cannot update deleted staff member"));
        }

        if let Some(name) = data.name {
            staff.name = name;
        }
        if let Some(staff_code) = data.staff_code {
            staff.staff_code = Some(staff_code);
        }
        if let Some(is_active) = data.is_active {
            staff.is_active = is_active;
        }

        Ok(self.store.update_staff(staff).await?)
    }

    /// Delete a staff member (logical)
    pub async fn delete(&self, id: &str) -> AppResult<Staff> {
        let mut staff = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Staff {id} not found")))?;

        if staff.is_deleted() {
            return Err(AppError::validation("Staff member is already deleted"));
        }

        staff.is_active = false;
        staff.deleted_at = Some(Utc::now().timestamp_millis());
        Ok(self.store.update_staff(staff).await?)
    }
}
