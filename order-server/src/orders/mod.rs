//! Order lifecycle
//!
//! The write path for orders:
//!
//! - **create**: price snapshot at creation, staff-drink records,
//!   compensating rollback when a multi-row write fails partway
//! - **status**: transition validation and the bulk checkout completion
//!
//! Orders are never deleted through this module; `delete_order` on the
//! store exists solely for rollback compensation.

mod create;
mod status;

#[cfg(test)]
mod tests;

pub use create::CreatedOrder;
pub use status::validate_transition;

use std::sync::Arc;

use crate::db::DataStore;

/// Order command service
///
/// All mutations of orders go through here so the status machine and the
/// creation-time atomicity rules cannot be bypassed.
#[derive(Clone)]
pub struct OrderService<S> {
    store: Arc<S>,
}

impl<S: DataStore> OrderService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub(crate) fn store(&self) -> &S {
        &self.store
    }
}
