//! Dish entity
//!
//! The owning chef is referenced through `chef_id`; deleting the chef
//! deletes its dishes.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "dishes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// External identifier assigned by the application
    #[sea_orm(unique)]
    pub dish_id: String,
    pub name: String,
    pub cuisine: String,
    /// Minutes
    pub preparation_time: i32,
    /// 1-5, NULL when unrated
    pub rating: Option<i32>,
    pub chef_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::chef::Entity",
        from = "Column::ChefId",
        to = "super::chef::Column::Id",
        on_delete = "Cascade"
    )]
    Chef,
}

impl Related<super::chef::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Chef.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
