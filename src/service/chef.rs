//! Chef service.

use std::collections::HashMap;
use std::sync::Arc;

use super::WriteGate;
use crate::error::{Result, ServerError};
use crate::model::{Chef, ChefDetails, ChefDraft, ChefId, ChefSummary};
use crate::repository::{ChefRepository, DishRepository};

pub struct ChefService {
    chefs: Arc<dyn ChefRepository>,
    dishes: Arc<dyn DishRepository>,
    gate: WriteGate,
}

impl ChefService {
    pub fn new(
        chefs: Arc<dyn ChefRepository>,
        dishes: Arc<dyn DishRepository>,
        gate: WriteGate,
    ) -> Self {
        Self { chefs, dishes, gate }
    }

    pub async fn list_chefs(&self) -> Result<Vec<Chef>> {
        self.chefs.find_all().await
    }

    pub async fn find_by_id(&self, id: ChefId) -> Result<Chef> {
        self.chefs
            .find_by_id(id)
            .await?
            .ok_or(ServerError::ChefNotFound(id))
    }

    /// The chef with every dish that points at it
    pub async fn details(&self, id: ChefId) -> Result<ChefDetails> {
        let chef = self.find_by_id(id).await?;
        let dishes = self.dishes.find_all_by_chef_id(chef.id).await?;
        Ok(ChefDetails { chef, dishes })
    }

    /// Every chef with its dish count, in storage order
    pub async fn list_summaries(&self) -> Result<Vec<ChefSummary>> {
        let chefs = self.chefs.find_all().await?;
        let mut counts: HashMap<ChefId, usize> = HashMap::new();
        for dish in self.dishes.find_all().await? {
            if let Some(chef_id) = dish.chef_id {
                *counts.entry(chef_id).or_default() += 1;
            }
        }

        Ok(chefs
            .into_iter()
            .map(|chef| {
                let dish_count = counts.get(&chef.id).copied().unwrap_or(0);
                ChefSummary { chef, dish_count }
            })
            .collect())
    }

    /// Make the chef the owner of the dish with the given external id.
    ///
    /// Ownership lives on the dish, so attaching the same dish twice keeps it
    /// listed once, and attaching a dish owned by someone else moves it.
    pub async fn add_dish_to_chef(&self, chef_id: ChefId, dish_id: &str) -> Result<ChefDetails> {
        let dish_id = dish_id.trim();
        if dish_id.is_empty() {
            return Err(ServerError::EmptyDishId);
        }

        let _guard = self.gate.lock().await;

        let chef = self.find_by_id(chef_id).await?;
        let mut dish = self
            .dishes
            .find_by_dish_id(dish_id)
            .await?
            .ok_or_else(|| ServerError::DishNotFound(dish_id.to_string()))?;

        dish.chef_id = Some(chef.id);
        self.dishes.save(dish).await?;
        tracing::debug!("Attached dish {} to chef {}", dish_id, chef.id);

        let dishes = self.dishes.find_all_by_chef_id(chef.id).await?;
        Ok(ChefDetails { chef, dishes })
    }

    /// Chef owning the most dishes; ties go to the first chef in storage order
    pub async fn find_most_popular_chef(&self) -> Result<Option<ChefSummary>> {
        let summaries = self.list_summaries().await?;
        Ok(summaries.into_iter().fold(None, |best, candidate| match best {
            Some(best) if best.dish_count >= candidate.dish_count => Some(best),
            _ => Some(candidate),
        }))
    }

    pub async fn count(&self) -> Result<u64> {
        self.chefs.count().await
    }

    pub async fn create(&self, draft: ChefDraft) -> Result<Chef> {
        draft.validate()?;
        let _guard = self.gate.lock().await;
        let chef = self.chefs.create(draft).await?;
        tracing::info!("Created chef {} ({})", chef.id, chef.full_name());
        Ok(chef)
    }

    /// Overwrite every field of an existing chef
    pub async fn update(&self, id: ChefId, draft: ChefDraft) -> Result<Chef> {
        draft.validate()?;
        let _guard = self.gate.lock().await;
        let existing = self.find_by_id(id).await?;
        let chef = self.chefs.save(draft.into_chef(existing.id)).await?;
        tracing::info!("Updated chef {}", chef.id);
        Ok(chef)
    }

    /// Delete the chef and its dishes
    pub async fn delete(&self, id: ChefId) -> Result<()> {
        let _guard = self.gate.lock().await;
        self.dishes.delete_all_by_chef_id(id).await?;
        self.chefs.delete_by_id(id).await?;
        tracing::info!("Deleted chef {}", id);
        Ok(())
    }
}
