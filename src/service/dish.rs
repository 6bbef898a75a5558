//! Dish service.

use std::sync::Arc;

use super::WriteGate;
use crate::error::{Result, ServerError};
use crate::model::{ChefId, Dish, DishDraft, DishKey, Rating};
use crate::repository::{ChefRepository, DishRepository};

pub struct DishService {
    dishes: Arc<dyn DishRepository>,
    chefs: Arc<dyn ChefRepository>,
    gate: WriteGate,
}

impl DishService {
    pub fn new(
        dishes: Arc<dyn DishRepository>,
        chefs: Arc<dyn ChefRepository>,
        gate: WriteGate,
    ) -> Self {
        Self { dishes, chefs, gate }
    }

    pub async fn list_dishes(&self) -> Result<Vec<Dish>> {
        self.dishes.find_all().await
    }

    pub async fn count(&self) -> Result<u64> {
        self.dishes.count().await
    }

    pub async fn find_by_dish_id(&self, dish_id: &str) -> Result<Option<Dish>> {
        self.dishes.find_by_dish_id(dish_id.trim()).await
    }

    pub async fn find_by_id(&self, id: DishKey) -> Result<Dish> {
        self.dishes
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServerError::DishNotFound(id.to_string()))
    }

    /// Store a new dish. An owner id that doesn't resolve is dropped silently.
    pub async fn create(&self, draft: DishDraft) -> Result<Dish> {
        let _guard = self.gate.lock().await;
        let draft = self.validated(draft, None).await?;
        let dish = self.dishes.create(draft).await?;
        tracing::info!("Created dish {} ({})", dish.dish_id, dish.name);
        Ok(dish)
    }

    /// Overwrite every field of an existing dish, including the owner
    pub async fn update(&self, id: DishKey, draft: DishDraft) -> Result<Dish> {
        let _guard = self.gate.lock().await;
        let existing = self.find_by_id(id).await?;
        let draft = self.validated(draft, Some(existing.id)).await?;
        let dish = self.dishes.save(draft.into_dish(existing.id)).await?;
        tracing::info!("Updated dish {}", dish.id);
        Ok(dish)
    }

    pub async fn delete(&self, id: DishKey) -> Result<()> {
        let _guard = self.gate.lock().await;
        self.dishes.delete_by_id(id).await?;
        tracing::info!("Deleted dish {}", id);
        Ok(())
    }

    pub async fn find_all_by_chef_id(&self, chef_id: ChefId) -> Result<Vec<Dish>> {
        self.dishes.find_all_by_chef_id(chef_id).await
    }

    pub async fn find_all_by_rating(&self, rating: Rating) -> Result<Vec<Dish>> {
        self.dishes.find_all_by_rating(rating).await
    }

    /// Check the external id and resolve the owner. `current` is the dish
    /// being updated, which may keep its own external id.
    async fn validated(&self, mut draft: DishDraft, current: Option<DishKey>) -> Result<DishDraft> {
        draft.dish_id = draft.dish_id.trim().to_string();
        if draft.dish_id.is_empty() {
            return Err(ServerError::EmptyDishId);
        }

        if let Some(other) = self.dishes.find_by_dish_id(&draft.dish_id).await? {
            if Some(other.id) != current {
                return Err(ServerError::DishIdTaken(draft.dish_id));
            }
        }

        if let Some(chef_id) = draft.chef_id {
            if self.chefs.find_by_id(chef_id).await?.is_none() {
                tracing::debug!("Chef {} not found, storing dish without owner", chef_id);
                draft.chef_id = None;
            }
        }

        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use crate::bootstrap;
    use crate::error::ServerError;
    use crate::model::{DishDraft, Rating};
    use crate::repository::Repositories;
    use crate::service::{self, ChefService, DishService};

    async fn seeded() -> (ChefService, DishService) {
        let (chefs, dishes) = service::build(&Repositories::in_memory());
        bootstrap::seed(&chefs, &dishes).await.unwrap();
        (chefs, dishes)
    }

    fn rating(value: i64) -> Rating {
        Rating::new(value).unwrap()
    }

    #[tokio::test]
    async fn test_create_then_find_by_dish_id() {
        let (_, dishes) = seeded().await;

        dishes
            .create(DishDraft::new("9", "Tacos", "Mexican", 20).with_rating(rating(3)))
            .await
            .unwrap();

        let tacos = dishes.find_by_dish_id("9").await.unwrap().unwrap();
        assert_eq!(tacos.dish_id, "9");
        assert_eq!(tacos.name, "Tacos");
        assert_eq!(tacos.cuisine, "Mexican");
        assert_eq!(tacos.preparation_time, 20);
        assert_eq!(tacos.rating, Some(rating(3)));
        assert_eq!(tacos.chef_id, None);

        assert!(dishes.list_dishes().await.unwrap().contains(&tacos));
        assert_eq!(dishes.find_by_id(tacos.id).await.unwrap(), tacos);
    }

    #[tokio::test]
    async fn test_create_with_unknown_chef_drops_owner() {
        let (_, dishes) = seeded().await;
        let dish = dishes
            .create(DishDraft::new("10", "Ramen", "Japanese", 90).with_chef(404))
            .await
            .unwrap();
        assert_eq!(dish.chef_id, None);

        let owned = dishes
            .create(DishDraft::new("11", "Risotto", "Italian", 35).with_chef(5))
            .await
            .unwrap();
        assert_eq!(owned.chef_id, Some(5));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_and_duplicate_ids() {
        let (_, dishes) = seeded().await;
        assert!(matches!(
            dishes.create(DishDraft::new("  ", "Nothing", "None", 0)).await,
            Err(ServerError::EmptyDishId)
        ));
        assert!(matches!(
            dishes.create(DishDraft::new("1", "Copy", "Italian", 10)).await,
            Err(ServerError::DishIdTaken(id)) if id == "1"
        ));
    }

    #[tokio::test]
    async fn test_update_overwrites_everything() {
        let (_, dishes) = seeded().await;
        let original = dishes
            .create(DishDraft::new("12", "Paella", "Spanish", 60).with_chef(1).with_rating(rating(4)))
            .await
            .unwrap();

        let updated = dishes
            .update(original.id, DishDraft::new("12b", "Seafood Paella", "Spanish", 75))
            .await
            .unwrap();
        assert_eq!(updated.id, original.id);

        let fetched = dishes.find_by_id(original.id).await.unwrap();
        assert_eq!(fetched.dish_id, "12b");
        assert_eq!(fetched.name, "Seafood Paella");
        assert_eq!(fetched.preparation_time, 75);
        assert_eq!(fetched.rating, None);
        assert_eq!(fetched.chef_id, None);
    }

    #[tokio::test]
    async fn test_update_keeps_own_dish_id_but_not_others() {
        let (_, dishes) = seeded().await;
        let pasta = dishes.find_by_dish_id("1").await.unwrap().unwrap();

        dishes
            .update(pasta.id, DishDraft::new("1", "Pasta Carbonara", "Italian", 25))
            .await
            .unwrap();
        assert!(matches!(
            dishes.update(pasta.id, DishDraft::new("2", "Pasta", "Italian", 25)).await,
            Err(ServerError::DishIdTaken(_))
        ));
        assert!(matches!(
            dishes.update(999, DishDraft::new("x", "x", "x", 1)).await,
            Err(ServerError::DishNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let (_, dishes) = seeded().await;
        let sushi = dishes.find_by_dish_id("4").await.unwrap().unwrap();
        dishes.delete(sushi.id).await.unwrap();
        assert!(matches!(dishes.find_by_id(sushi.id).await, Err(ServerError::DishNotFound(_))));
        assert!(!dishes.list_dishes().await.unwrap().contains(&sushi));
    }

    #[tokio::test]
    async fn test_filters() {
        let (chefs, dishes) = seeded().await;
        chefs.add_dish_to_chef(4, "3").await.unwrap();

        let heston: Vec<String> = dishes
            .find_all_by_chef_id(4)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(heston, vec!["Chicken Tikka Masala"]);

        let five_stars = dishes.find_all_by_rating(rating(5)).await.unwrap();
        assert_eq!(five_stars.len(), 3);
        assert!(dishes.find_all_by_rating(rating(1)).await.unwrap().is_empty());
    }
}
