//! In-memory repositories.
//!
//! Each repository owns its list behind a `RwLock`. Every mutation runs under
//! one write guard, and guards are never held across an `.await`.
//!
//! Ids come from a counter that only moves forward, so an id freed by a
//! delete is never handed out again.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::backend::{ChefRepository, DishRepository};
use crate::error::Result;
use crate::model::{Chef, ChefDraft, ChefId, Dish, DishDraft, DishKey, Rating};

/// Highest id handed out or saved so far
#[derive(Default)]
struct IdCounter(AtomicI64);

impl IdCounter {
    fn next(&self) -> i64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn observe(&self, id: i64) {
        self.0.fetch_max(id, Ordering::Relaxed);
    }
}

/// Chefs kept in a vector.
#[derive(Default)]
pub struct InMemoryChefRepository {
    chefs: RwLock<Vec<Chef>>,
    last_id: IdCounter,
}

impl InMemoryChefRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChefRepository for InMemoryChefRepository {
    async fn find_all(&self) -> Result<Vec<Chef>> {
        Ok(self.chefs.read().clone())
    }

    async fn find_by_id(&self, id: ChefId) -> Result<Option<Chef>> {
        Ok(self.chefs.read().iter().find(|c| c.id == id).cloned())
    }

    async fn create(&self, draft: ChefDraft) -> Result<Chef> {
        let mut chefs = self.chefs.write();
        let id = self.last_id.next();
        let chef = draft.into_chef(id);
        chefs.push(chef.clone());
        Ok(chef)
    }

    async fn save(&self, chef: Chef) -> Result<Chef> {
        let mut chefs = self.chefs.write();
        self.last_id.observe(chef.id);
        chefs.retain(|c| c.id != chef.id);
        chefs.push(chef.clone());
        Ok(chef)
    }

    async fn delete_by_id(&self, id: ChefId) -> Result<()> {
        self.chefs.write().retain(|c| c.id != id);
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.chefs.read().len() as u64)
    }
}

/// Dishes kept in a vector.
#[derive(Default)]
pub struct InMemoryDishRepository {
    dishes: RwLock<Vec<Dish>>,
    last_id: IdCounter,
}

impl InMemoryDishRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn filtered(&self, predicate: impl Fn(&Dish) -> bool) -> Vec<Dish> {
        self.dishes
            .read()
            .iter()
            .filter(|d| predicate(d))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl DishRepository for InMemoryDishRepository {
    async fn find_all(&self) -> Result<Vec<Dish>> {
        Ok(self.dishes.read().clone())
    }

    async fn find_by_id(&self, id: DishKey) -> Result<Option<Dish>> {
        Ok(self.dishes.read().iter().find(|d| d.id == id).cloned())
    }

    async fn find_by_dish_id(&self, dish_id: &str) -> Result<Option<Dish>> {
        Ok(self
            .dishes
            .read()
            .iter()
            .find(|d| d.dish_id == dish_id)
            .cloned())
    }

    async fn find_all_by_chef_id(&self, chef_id: ChefId) -> Result<Vec<Dish>> {
        Ok(self.filtered(|d| d.chef_id == Some(chef_id)))
    }

    async fn find_all_by_rating(&self, rating: Rating) -> Result<Vec<Dish>> {
        Ok(self.filtered(|d| d.rating == Some(rating)))
    }

    async fn create(&self, draft: DishDraft) -> Result<Dish> {
        let mut dishes = self.dishes.write();
        let id = self.last_id.next();
        let dish = draft.into_dish(id);
        dishes.push(dish.clone());
        Ok(dish)
    }

    async fn save(&self, dish: Dish) -> Result<Dish> {
        let mut dishes = self.dishes.write();
        self.last_id.observe(dish.id);
        dishes.retain(|d| d.id != dish.id);
        dishes.push(dish.clone());
        Ok(dish)
    }

    async fn delete_by_id(&self, id: DishKey) -> Result<()> {
        self.dishes.write().retain(|d| d.id != id);
        Ok(())
    }

    async fn delete_all_by_chef_id(&self, chef_id: ChefId) -> Result<()> {
        self.dishes.write().retain(|d| d.chef_id != Some(chef_id));
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.dishes.read().len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_chef_ids_are_sequential() {
        let repo = InMemoryChefRepository::new();
        let a = repo.create(ChefDraft::new("Gordon", "Ramsay", "")).await.unwrap();
        let b = repo.create(ChefDraft::new("Jamie", "Oliver", "")).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_deleted_ids_are_not_reused() {
        let chefs = InMemoryChefRepository::new();
        chefs.create(ChefDraft::new("Gordon", "Ramsay", "")).await.unwrap();
        let last = chefs.create(ChefDraft::new("Jamie", "Oliver", "")).await.unwrap();
        chefs.delete_by_id(last.id).await.unwrap();
        let next = chefs.create(ChefDraft::new("Marco", "White", "")).await.unwrap();
        assert_eq!(next.id, 3);
        assert!(chefs.find_by_id(last.id).await.unwrap().is_none());

        chefs.save(ChefDraft::new("Heston", "Blumenthal", "").into_chef(10)).await.unwrap();
        let after_save = chefs.create(ChefDraft::new("Massimo", "Bottura", "")).await.unwrap();
        assert_eq!(after_save.id, 11);

        let dishes = InMemoryDishRepository::new();
        let only = dishes.create(DishDraft::new("1", "Pasta Carbonara", "Italian", 30)).await.unwrap();
        dishes.delete_by_id(only.id).await.unwrap();
        let again = dishes.create(DishDraft::new("1", "Pasta Carbonara", "Italian", 30)).await.unwrap();
        assert_eq!(again.id, 2);
    }

    #[tokio::test]
    async fn test_save_replaces_and_moves_to_end() {
        let repo = InMemoryChefRepository::new();
        let mut first = repo.create(ChefDraft::new("Gordon", "Ramsay", "")).await.unwrap();
        repo.create(ChefDraft::new("Jamie", "Oliver", "")).await.unwrap();

        first.bio = "Updated".to_string();
        repo.save(first.clone()).await.unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1], first);
        assert_eq!(repo.find_by_id(first.id).await.unwrap().unwrap().bio, "Updated");
    }

    #[tokio::test]
    async fn test_save_unknown_id_inserts() {
        let repo = InMemoryChefRepository::new();
        let chef = ChefDraft::new("Heston", "Blumenthal", "").into_chef(42);
        repo.save(chef.clone()).await.unwrap();
        assert_eq!(repo.find_by_id(42).await.unwrap(), Some(chef));
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let repo = InMemoryChefRepository::new();
        repo.create(ChefDraft::new("Gordon", "Ramsay", "")).await.unwrap();
        repo.delete_by_id(99).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);
        repo.delete_by_id(1).await.unwrap();
        assert!(repo.find_by_id(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_dish_lookups() {
        let repo = InMemoryDishRepository::new();
        let four = Rating::new(4).unwrap();
        repo.create(DishDraft::new("1", "Pasta Carbonara", "Italian", 30).with_chef(2))
            .await
            .unwrap();
        repo.create(DishDraft::new("2", "Beef Wellington", "British", 45).with_rating(four))
            .await
            .unwrap();
        repo.create(DishDraft::new("3", "Sushi Platter", "Japanese", 50).with_chef(2).with_rating(four))
            .await
            .unwrap();

        assert_eq!(repo.find_by_dish_id("2").await.unwrap().unwrap().name, "Beef Wellington");
        assert!(repo.find_by_dish_id("nope").await.unwrap().is_none());

        let owned: Vec<String> = repo
            .find_all_by_chef_id(2)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.dish_id)
            .collect();
        assert_eq!(owned, vec!["1", "3"]);

        assert_eq!(repo.find_all_by_rating(four).await.unwrap().len(), 2);

        repo.delete_all_by_chef_id(2).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
