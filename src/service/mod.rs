//! Business operations on chefs and dishes.
//!
//! Both services share one write gate. Every operation that reads, changes
//! and stores a record holds it, so concurrent requests cannot interleave
//! their read-modify-write sequences.

mod chef;
mod dish;

use std::sync::Arc;

use tokio::sync::Mutex;

pub use chef::ChefService;
pub use dish::DishService;

use crate::repository::Repositories;

/// Serializes writes across both services.
pub type WriteGate = Arc<Mutex<()>>;

/// Build both services over the same repositories and write gate
pub fn build(repos: &Repositories) -> (ChefService, DishService) {
    let gate: WriteGate = Arc::new(Mutex::new(()));
    (
        ChefService::new(repos.chefs.clone(), repos.dishes.clone(), gate.clone()),
        DishService::new(repos.dishes.clone(), repos.chefs.clone(), gate),
    )
}
