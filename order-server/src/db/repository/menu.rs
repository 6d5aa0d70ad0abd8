//! Menu Repository
//!
//! Categories and items, plus the grouped menu the customer page renders.

use std::sync::Arc;

use shared::models::{
    MenuCategory, MenuCategoryCreate, MenuCategoryUpdate, MenuCategoryWithItems, MenuItem,
    MenuItemCreate, MenuItemUpdate,
};
use shared::{AppError, AppResult};

use super::new_record_id;
use crate::db::DataStore;

#[derive(Clone)]
pub struct MenuRepository<S> {
    store: Arc<S>,
}

impl<S: DataStore> MenuRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    // ========== Categories ==========

    /// Find all categories in a store, ordered by display_order
    pub async fn find_categories(&self, store_id: &str) -> AppResult<Vec<MenuCategory>> {
        let mut categories = self.store.categories_by_store(store_id).await?;
        categories.sort_by_key(|c| c.display_order);
        Ok(categories)
    }

    /// Create a category
    pub async fn create_category(&self, data: MenuCategoryCreate) -> AppResult<MenuCategory> {
        let category = MenuCategory {
            id: new_record_id(),
            store_id: data.store_id,
            name: data.name,
            display_order: data.display_order,
        };
        Ok(self.store.insert_category(category).await?)
    }

    /// Update a category
    pub async fn update_category(
        &self,
        id: &str,
        data: MenuCategoryUpdate,
    ) -> AppResult<MenuCategory> {
        let mut category = self
            .store
            .category(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Category {id} not found")))?;

        if let Some(name) = data.name {
            category.name = name;
        }
        if let Some(display_order) = data.display_order {
            category.display_order = display_order;
        }
        Ok(self.store.update_category(category).await?)
    }

    /// Delete a category and its items (hard delete)
    pub async fn delete_category(&self, id: &str) -> AppResult<bool> {
        for item in self.store.menu_items_by_category(id).await? {
            self.store.delete_menu_item(&item.id).await?;
        }
        Ok(self.store.delete_category(id).await?)
    }

    // ========== Items ==========

    /// Find menu item by id
    pub async fn find_item(&self, id: &str) -> AppResult<Option<MenuItem>> {
        Ok(self.store.menu_item(id).await?)
    }

    /// Create a menu item under an existing category
    pub async fn create_item(&self, data: MenuItemCreate) -> AppResult<MenuItem> {
        if data.price < 0 {
            return Err(AppError::validation("Price must not be negative"));
        }
        self.store
            .category(&data.category_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Category {} not found", data.category_id))
            })?;

        let item = MenuItem {
            id: new_record_id(),
            category_id: data.category_id,
            name: data.name,
            price: data.price,
            description: data.description,
            image_url: data.image_url,
            is_available: true,
        };
        Ok(self.store.insert_menu_item(item).await?)
    }

    /// Update a menu item
    ///
    /// Price edits never touch existing orders; their items carry the
    /// price snapshot taken at order time.
    pub async fn update_item(&self, id: &str, data: MenuItemUpdate) -> AppResult<MenuItem> {
        let mut item = self
            .find_item(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Menu item {id} not found")))?;

        if let Some(price) = data.price {
            if price < 0 {
                return Err(AppError::validation("Price must not be negative"));
            }
            item.price = price;
        }
        if let Some(name) = data.name {
            item.name = name;
        }
        if let Some(description) = data.description {
            item.description = Some(description);
        }
        if let Some(image_url) = data.image_url {
            item.image_url = Some(image_url);
        }
        if let Some(is_available) = data.is_available {
            item.is_available = is_available;
        }
        Ok(self.store.update_menu_item(item).await?)
    }

    /// Delete a menu item (hard delete)
    pub async fn delete_item(&self, id: &str) -> AppResult<bool> {
        Ok(self.store.delete_menu_item(id).await?)
    }

    // ========== Customer Menu ==========

    /// Categories with their available items, in display order
    pub async fn menu_data(&self, store_id: &str) -> AppResult<Vec<MenuCategoryWithItems>> {
        let categories = self.find_categories(store_id).await?;
        let mut grouped = Vec::with_capacity(categories.len());
        for category in categories {
            let mut items: Vec<MenuItem> = self
                .store
                .menu_items_by_category(&category.id)
                .await?
                .into_iter()
                .filter(|i| i.is_available)
                .collect();
            items.sort_by(|a, b| a.name.cmp(&b.name));
            grouped.push(MenuCategoryWithItems { category, items });
        }
        Ok(grouped)
    }
}
