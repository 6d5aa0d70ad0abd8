//! Staff Drink Repository

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use shared::AppResult;
use shared::models::StaffDrinkTally;

use crate::db::DataStore;

#[derive(Clone)]
pub struct StaffDrinkRepository<S> {
    store: Arc<S>,
}

impl<S: DataStore> StaffDrinkRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Per-staff drink counts over a business-date range, inclusive,
    /// ordered by count descending then name
    pub async fn summary(
        &self,
        store_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<StaffDrinkTally>> {
        let drinks = self.store.staff_drinks_in_range(store_id, from, to).await?;

        let mut counts: HashMap<String, i64> = HashMap::new();
        for drink in &drinks {
            *counts.entry(drink.staff_id.clone()).or_insert(0) += 1;
        }

        let mut tallies = Vec::with_capacity(counts.len());
        for (staff_id, drink_count) in counts {
            let staff_name = self
                .store
                .staff(&staff_id)
                .await?
                .map(|s| s.name)
                .unwrap_or_default();
            tallies.push(StaffDrinkTally {
                staff_id,
                staff_name,
                drink_count,
            });
        }
        tallies.sort_by(|a, b| {
            b.drink_count
                .cmp(&a.drink_count)
                .then_with(|| a.staff_name.cmp(&b.staff_name))
        });
        Ok(tallies)
    }
}
