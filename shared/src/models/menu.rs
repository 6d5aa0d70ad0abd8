//! Menu Models (categories and items)

use serde::{Deserialize, Serialize};

/// Menu category entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuCategory {
    pub id: String,
    pub store_id: String,
    pub name: String,
    /// Render/report ordering, ascending
    pub display_order: i32,
}

/// Menu item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub category_id: String,
    pub name: String,
    /// Price in integer currency units
    pub price: i64,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_available: bool,
}

/// Category with its available items, as rendered by the customer menu
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuCategoryWithItems {
    #[serde(flatten)]
    pub category: MenuCategory,
    pub items: Vec<MenuItem>,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuCategoryCreate {
    pub store_id: String,
    pub name: String,
    pub display_order: i32,
}

/// Update category payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuCategoryUpdate {
    pub name: Option<String>,
    pub display_order: Option<i32>,
}

/// Create menu item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub category_id: String,
    pub name: String,
    pub price: i64,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Update menu item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_available: Option<bool>,
}
