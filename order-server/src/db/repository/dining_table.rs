//! Dining Table Repository

use std::sync::Arc;

use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate};
use shared::{AppError, AppResult};

use super::new_record_id;
use crate::db::DataStore;

#[derive(Clone)]
pub struct DiningTableRepository<S> {
    store: Arc<S>,
}

impl<S: DataStore> DiningTableRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Find all active tables in a store, ordered by table number
    pub async fn find_active(&self, store_id: &str) -> AppResult<Vec<DiningTable>> {
        let mut tables: Vec<DiningTable> = self
            .store
            .tables_by_store(store_id)
            .await?
            .into_iter()
            .filter(|t| t.is_active)
            .collect();
        tables.sort_by(|a, b| a.table_number.cmp(&b.table_number));
        Ok(tables)
    }

    /// Find all tables in a store including inactive
    pub async fn find_all(&self, store_id: &str) -> AppResult<Vec<DiningTable>> {
        let mut tables = self.store.tables_by_store(store_id).await?;
        tables.sort_by(|a, b| a.table_number.cmp(&b.table_number));
        Ok(tables)
    }

    /// Find table by id
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<DiningTable>> {
        Ok(self.store.table(id).await?)
    }

    async fn find_by_number(
        &self,
        store_id: &str,
        table_number: &str,
    ) -> AppResult<Option<DiningTable>> {
        Ok(self
            .store
            .tables_by_store(store_id)
            .await?
            .into_iter()
            .find(|t| t.table_number == table_number))
    }

    /// Create a new table
    ///
    /// Table numbers are unique within a store.
    pub async fn create(&self, data: DiningTableCreate) -> AppResult<DiningTable> {
        if self
            .find_by_number(&data.store_id, &data.table_number)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(format!(
                "Table '{}' already exists in this store",
                data.table_number
            )));
        }

        let table = DiningTable {
            id: new_record_id(),
            store_id: data.store_id,
            table_number: data.table_number,
            is_active: true,
            qr_code: data.qr_code,
        };
        Ok(self.store.insert_table(table).await?)
    }

    /// Update a table
    pub async fn update(&self, id: &str, data: DiningTableUpdate) -> AppResult<DiningTable> {
        let mut table = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Table {id} not found")))?;

        if let Some(number) = &data.table_number
            && *number != table.table_number
        {
            if let Some(other) = self.find_by_number(&table.store_id, number).await?
                && other.id != table.id
            {
                return Err(AppError::conflict(format!(
                    "Table '{number}' already exists in this store"
                )));
            }
            table.table_number = number.clone();
        }
        if let Some(is_active) = data.is_active {
            table.is_active = is_active;
        }
        if let Some(qr_code) = data.qr_code {
            table.qr_code = Some(qr_code);
        }

        Ok(self.store.update_table(table).await?)
    }

    /// Delete a table (hard delete)
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        Ok(self.store.delete_table(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;

    fn repo() -> DiningTableRepository<MemoryStore> {
        DiningTableRepository::new(Arc::new(MemoryStore::new()))
    }

    fn create(table_number: &str) -> DiningTableCreate {
        DiningTableCreate {
            store_id: "store-1".into(),
            table_number: table_number.into(),
            qr_code: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_table_number_rejected() {
        let repo = repo();
        repo.create(create("A1")).await.unwrap();

        let err = repo.create(create("A1")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_to_existing_number_rejected() {
        let repo = repo();
        repo.create(create("A1")).await.unwrap();
        let b2 = repo.create(create("B2")).await.unwrap();

        let err = repo
            .update(
                &b2.id,
                DiningTableUpdate {
                    table_number: Some("A1".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // Keeping its own number is not a conflict
        repo.update(
            &b2.id,
            DiningTableUpdate {
                table_number: Some("B2".into()),
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_find_active_excludes_deactivated() {
        let repo = repo();
        let a1 = repo.create(create("A1")).await.unwrap();
        repo.create(create("B2")).await.unwrap();

        repo.update(
            &a1.id,
            DiningTableUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let active = repo.find_active("store-1").await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].table_number, "B2");
        assert_eq!(repo.find_all("store-1").await.unwrap().len(), 2);
    }
}
