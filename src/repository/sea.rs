//! SQLite repositories backed by SeaORM.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use super::backend::{ChefRepository, DishRepository};
use crate::db::entities::{chef, dish};
use crate::error::{Result, ServerError};
use crate::model::{Chef, ChefDraft, ChefId, Dish, DishDraft, DishKey, Rating};

impl From<chef::Model> for Chef {
    fn from(model: chef::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            bio: model.bio,
        }
    }
}

impl TryFrom<dish::Model> for Dish {
    type Error = ServerError;

    fn try_from(model: dish::Model) -> Result<Self> {
        let preparation_time = u32::try_from(model.preparation_time).map_err(|_| {
            ServerError::Internal(format!(
                "Stored preparation time {} for dish {} is negative",
                model.preparation_time, model.id
            ))
        })?;
        let rating = model
            .rating
            .map(|r| Rating::new(i64::from(r)))
            .transpose()
            .map_err(|_| ServerError::Internal(format!("Stored rating for dish {} is out of range", model.id)))?;

        Ok(Self {
            id: model.id,
            dish_id: model.dish_id,
            name: model.name,
            cuisine: model.cuisine,
            preparation_time,
            rating,
            chef_id: model.chef_id,
        })
    }
}

fn to_dishes(models: Vec<dish::Model>) -> Result<Vec<Dish>> {
    models.into_iter().map(Dish::try_from).collect()
}

fn preparation_time_column(minutes: u32) -> Result<i32> {
    i32::try_from(minutes)
        .map_err(|_| ServerError::InvalidRequest(format!("Preparation time {} is too large", minutes)))
}

fn rating_column(rating: Option<Rating>) -> Option<i32> {
    rating.map(|r| i32::from(r.value()))
}

/// Chefs stored in the `chefs` table.
pub struct SeaChefRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaChefRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ChefRepository for SeaChefRepository {
    async fn find_all(&self) -> Result<Vec<Chef>> {
        let models = chef::Entity::find()
            .order_by_asc(chef::Column::Id)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Chef::from).collect())
    }

    async fn find_by_id(&self, id: ChefId) -> Result<Option<Chef>> {
        let model = chef::Entity::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(model.map(Chef::from))
    }

    async fn create(&self, draft: ChefDraft) -> Result<Chef> {
        let model = chef::ActiveModel {
            first_name: Set(draft.first_name),
            last_name: Set(draft.last_name),
            bio: Set(draft.bio),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;
        Ok(model.into())
    }

    async fn save(&self, chef: Chef) -> Result<Chef> {
        let existing = chef::Entity::find_by_id(chef.id).one(self.db.as_ref()).await?;

        let model = match existing {
            Some(existing) => {
                let mut active: chef::ActiveModel = existing.into();
                active.first_name = Set(chef.first_name);
                active.last_name = Set(chef.last_name);
                active.bio = Set(chef.bio);
                active.update(self.db.as_ref()).await?
            }
            None => {
                chef::ActiveModel {
                    id: Set(chef.id),
                    first_name: Set(chef.first_name),
                    last_name: Set(chef.last_name),
                    bio: Set(chef.bio),
                }
                .insert(self.db.as_ref())
                .await?
            }
        };
        Ok(model.into())
    }

    async fn delete_by_id(&self, id: ChefId) -> Result<()> {
        // Dishes go with their chef even when the foreign key pragma is off
        let txn = self.db.begin().await?;
        dish::Entity::delete_many()
            .filter(dish::Column::ChefId.eq(id))
            .exec(&txn)
            .await?;
        chef::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        Ok(chef::Entity::find().count(self.db.as_ref()).await?)
    }
}

/// Dishes stored in the `dishes` table.
pub struct SeaDishRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaDishRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DishRepository for SeaDishRepository {
    async fn find_all(&self) -> Result<Vec<Dish>> {
        let models = dish::Entity::find()
            .order_by_asc(dish::Column::Id)
            .all(self.db.as_ref())
            .await?;
        to_dishes(models)
    }

    async fn find_by_id(&self, id: DishKey) -> Result<Option<Dish>> {
        dish::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .map(Dish::try_from)
            .transpose()
    }

    async fn find_by_dish_id(&self, dish_id: &str) -> Result<Option<Dish>> {
        dish::Entity::find()
            .filter(dish::Column::DishId.eq(dish_id))
            .one(self.db.as_ref())
            .await?
            .map(Dish::try_from)
            .transpose()
    }

    async fn find_all_by_chef_id(&self, chef_id: ChefId) -> Result<Vec<Dish>> {
        let models = dish::Entity::find()
            .filter(dish::Column::ChefId.eq(chef_id))
            .order_by_asc(dish::Column::Id)
            .all(self.db.as_ref())
            .await?;
        to_dishes(models)
    }

    async fn find_all_by_rating(&self, rating: Rating) -> Result<Vec<Dish>> {
        let models = dish::Entity::find()
            .filter(dish::Column::Rating.eq(i32::from(rating.value())))
            .order_by_asc(dish::Column::Id)
            .all(self.db.as_ref())
            .await?;
        to_dishes(models)
    }

    async fn create(&self, draft: DishDraft) -> Result<Dish> {
        let model = dish::ActiveModel {
            dish_id: Set(draft.dish_id),
            name: Set(draft.name),
            cuisine: Set(draft.cuisine),
            preparation_time: Set(preparation_time_column(draft.preparation_time)?),
            rating: Set(rating_column(draft.rating)),
            chef_id: Set(draft.chef_id),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;
        Dish::try_from(model)
    }

    async fn save(&self, dish: Dish) -> Result<Dish> {
        let existing = dish::Entity::find_by_id(dish.id).one(self.db.as_ref()).await?;
        let preparation_time = preparation_time_column(dish.preparation_time)?;

        let model = match existing {
            Some(existing) => {
                let mut active: dish::ActiveModel = existing.into();
                active.dish_id = Set(dish.dish_id);
                active.name = Set(dish.name);
                active.cuisine = Set(dish.cuisine);
                active.preparation_time = Set(preparation_time);
                active.rating = Set(rating_column(dish.rating));
                active.chef_id = Set(dish.chef_id);
                active.update(self.db.as_ref()).await?
            }
            None => {
                dish::ActiveModel {
                    id: Set(dish.id),
                    dish_id: Set(dish.dish_id),
                    name: Set(dish.name),
                    cuisine: Set(dish.cuisine),
                    preparation_time: Set(preparation_time),
                    rating: Set(rating_column(dish.rating)),
                    chef_id: Set(dish.chef_id),
                }
                .insert(self.db.as_ref())
                .await?
            }
        };
        Dish::try_from(model)
    }

    async fn delete_by_id(&self, id: DishKey) -> Result<()> {
        dish::Entity::delete_by_id(id).exec(self.db.as_ref()).await?;
        Ok(())
    }

    async fn delete_all_by_chef_id(&self, chef_id: ChefId) -> Result<()> {
        dish::Entity::delete_many()
            .filter(dish::Column::ChefId.eq(chef_id))
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        Ok(dish::Entity::find().count(self.db.as_ref()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn temp_db(name: &str) -> (Arc<DatabaseConnection>, std::path::PathBuf) {
        let dir = std::env::temp_dir().join(format!("kitchen-test-{}-{}", name, uuid::Uuid::new_v4()));
        let path = dir.join("kitchen.db");
        let conn = db::init_database(&path).await.unwrap();
        (Arc::new(conn), dir)
    }

    #[tokio::test]
    async fn test_chef_crud() {
        let (conn, dir) = temp_db("chef-crud").await;
        let repo = SeaChefRepository::new(conn);

        let gordon = repo
            .create(ChefDraft::new("Gordon", "Ramsay", "16 Michelin stars"))
            .await
            .unwrap();
        let jamie = repo.create(ChefDraft::new("Jamie", "Oliver", "")).await.unwrap();
        assert_ne!(gordon.id, jamie.id);
        assert_eq!(repo.count().await.unwrap(), 2);

        let mut updated = gordon.clone();
        updated.bio = "Hell's Kitchen".to_string();
        repo.save(updated.clone()).await.unwrap();
        assert_eq!(repo.find_by_id(gordon.id).await.unwrap(), Some(updated));

        repo.delete_by_id(jamie.id).await.unwrap();
        assert!(repo.find_by_id(jamie.id).await.unwrap().is_none());
        assert_eq!(repo.find_all().await.unwrap().len(), 1);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_dish_lookups_and_owner_cascade() {
        let (conn, dir) = temp_db("dish-lookups").await;
        let chefs = SeaChefRepository::new(conn.clone());
        let dishes = SeaDishRepository::new(conn);

        let gordon = chefs.create(ChefDraft::new("Gordon", "Ramsay", "")).await.unwrap();
        let five = Rating::new(5).unwrap();

        let wellington = dishes
            .create(
                DishDraft::new("2", "Beef Wellington", "British", 45)
                    .with_rating(five)
                    .with_chef(gordon.id),
            )
            .await
            .unwrap();
        dishes
            .create(DishDraft::new("4", "Sushi Platter", "Japanese", 50))
            .await
            .unwrap();

        assert_eq!(dishes.find_by_dish_id("2").await.unwrap(), Some(wellington.clone()));
        assert_eq!(dishes.find_all_by_chef_id(gordon.id).await.unwrap(), vec![wellington.clone()]);
        assert_eq!(dishes.find_all_by_rating(five).await.unwrap().len(), 1);

        let mut unowned = wellington.clone();
        unowned.chef_id = None;
        unowned.rating = None;
        dishes.save(unowned.clone()).await.unwrap();
        assert_eq!(dishes.find_by_id(wellington.id).await.unwrap(), Some(unowned.clone()));

        let mut owned = unowned;
        owned.chef_id = Some(gordon.id);
        dishes.save(owned).await.unwrap();

        chefs.delete_by_id(gordon.id).await.unwrap();
        assert!(dishes.find_by_id(wellington.id).await.unwrap().is_none());
        assert_eq!(dishes.count().await.unwrap(), 1);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
