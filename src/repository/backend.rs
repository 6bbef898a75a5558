//! Repository trait definitions.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Chef, ChefDraft, ChefId, Dish, DishDraft, DishKey, Rating};

/// CRUD access to chefs.
///
/// `save` is insert-or-replace by id: an existing record with the same id is
/// removed first, then the given record is stored.
#[async_trait]
pub trait ChefRepository: Send + Sync {
    /// All chefs in storage order
    async fn find_all(&self) -> Result<Vec<Chef>>;

    async fn find_by_id(&self, id: ChefId) -> Result<Option<Chef>>;

    /// Store a new chef under a freshly generated id
    async fn create(&self, draft: ChefDraft) -> Result<Chef>;

    async fn save(&self, chef: Chef) -> Result<Chef>;

    /// Remove a chef; absent ids are not an error
    async fn delete_by_id(&self, id: ChefId) -> Result<()>;

    async fn count(&self) -> Result<u64>;
}

/// CRUD access to dishes plus the lookups the listings need.
#[async_trait]
pub trait DishRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Dish>>;

    async fn find_by_id(&self, id: DishKey) -> Result<Option<Dish>>;

    /// Look up by the external identifier
    async fn find_by_dish_id(&self, dish_id: &str) -> Result<Option<Dish>>;

    async fn find_all_by_chef_id(&self, chef_id: ChefId) -> Result<Vec<Dish>>;

    async fn find_all_by_rating(&self, rating: Rating) -> Result<Vec<Dish>>;

    async fn create(&self, draft: DishDraft) -> Result<Dish>;

    async fn save(&self, dish: Dish) -> Result<Dish>;

    async fn delete_by_id(&self, id: DishKey) -> Result<()>;

    /// Remove every dish owned by the chef
    async fn delete_all_by_chef_id(&self, chef_id: ChefId) -> Result<()>;

    async fn count(&self) -> Result<u64>;
}

/// The pair of repositories a running server works with.
#[derive(Clone)]
pub struct Repositories {
    pub chefs: Arc<dyn ChefRepository>,
    pub dishes: Arc<dyn DishRepository>,
}

impl Repositories {
    /// Fresh, empty in-memory repositories
    pub fn in_memory() -> Self {
        Self {
            chefs: Arc::new(super::InMemoryChefRepository::new()),
            dishes: Arc::new(super::InMemoryDishRepository::new()),
        }
    }
}
