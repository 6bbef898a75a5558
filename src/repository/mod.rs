//! Storage gateway for chefs and dishes.
//!
//! Two interchangeable backends implement the same traits:
//! - In-memory lists (default for tests and throwaway runs)
//! - SQLite through SeaORM

mod backend;
mod config;
mod memory;
mod sea;

pub use backend::{ChefRepository, DishRepository, Repositories};
pub use config::{RepositoryConfig, StorageType};
pub use memory::{InMemoryChefRepository, InMemoryDishRepository};
pub use sea::{SeaChefRepository, SeaDishRepository};
