//! Chef and dish records shared by the repositories, services and handlers.
//!
//! A dish points at its owning chef through `chef_id`; a chef never holds its
//! dishes directly. Services resolve the reverse side with a lookup.

use serde::Serialize;

use crate::error::{Result, ServerError};

pub type ChefId = i64;
pub type DishKey = i64;

/// A chef as stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Chef {
    pub id: ChefId,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
}

impl Chef {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Fields of a chef before an id is assigned. Also used for full updates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChefDraft {
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
}

impl ChefDraft {
    /// Longest bio either backend accepts
    pub const MAX_BIO_CHARS: usize = 1000;

    pub fn new(first_name: &str, last_name: &str, bio: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            bio: bio.to_string(),
        }
    }

    /// Names must be present and the bio must fit the chefs table.
    pub fn validate(&self) -> Result<()> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(ServerError::InvalidRequest(
                "First and last name are required".to_string(),
            ));
        }
        if self.bio.chars().count() > Self::MAX_BIO_CHARS {
            return Err(ServerError::InvalidRequest(format!(
                "Bio must be at most {} characters",
                Self::MAX_BIO_CHARS
            )));
        }
        Ok(())
    }

    pub fn into_chef(self, id: ChefId) -> Chef {
        Chef {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            bio: self.bio,
        }
    }
}

/// Dish quality rating, 1 to 5 stars.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Result<Self> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ServerError::InvalidRequest(format!(
                "Rating must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                value
            )))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Rating> {
        (Self::MIN..=Self::MAX).map(Rating)
    }
}

/// A dish as stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Dish {
    pub id: DishKey,
    /// External identifier shown to users, unique across dishes.
    pub dish_id: String,
    pub name: String,
    pub cuisine: String,
    /// Minutes.
    pub preparation_time: u32,
    pub rating: Option<Rating>,
    pub chef_id: Option<ChefId>,
}

/// Fields of a dish before an id is assigned. Also used for full updates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DishDraft {
    pub dish_id: String,
    pub name: String,
    pub cuisine: String,
    pub preparation_time: u32,
    pub chef_id: Option<ChefId>,
    pub rating: Option<Rating>,
}

impl DishDraft {
    pub fn new(dish_id: &str, name: &str, cuisine: &str, preparation_time: u32) -> Self {
        Self {
            dish_id: dish_id.to_string(),
            name: name.to_string(),
            cuisine: cuisine.to_string(),
            preparation_time,
            chef_id: None,
            rating: None,
        }
    }

    pub fn with_rating(mut self, rating: Rating) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_chef(mut self, chef_id: ChefId) -> Self {
        self.chef_id = Some(chef_id);
        self
    }

    pub fn into_dish(self, id: DishKey) -> Dish {
        Dish {
            id,
            dish_id: self.dish_id,
            name: self.name,
            cuisine: self.cuisine,
            preparation_time: self.preparation_time,
            rating: self.rating,
            chef_id: self.chef_id,
        }
    }
}

/// A chef together with the dishes that point at it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChefDetails {
    pub chef: Chef,
    pub dishes: Vec<Dish>,
}

/// A chef with the number of dishes it owns, for listings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChefSummary {
    pub chef: Chef,
    pub dish_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert_eq!(Rating::new(1).unwrap().value(), 1);
        assert_eq!(Rating::new(5).unwrap().value(), 5);
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(6).is_err());
        assert!(Rating::new(-3).is_err());
        assert_eq!(Rating::all().count(), 5);
    }

    #[test]
    fn test_rating_serializes_as_number() {
        let rating = Rating::new(4).unwrap();
        assert_eq!(serde_json::to_string(&rating).unwrap(), "4");
    }

    #[test]
    fn test_drafts_keep_fields() {
        let dish = DishDraft::new("9", "Tacos", "Mexican", 20)
            .with_rating(Rating::new(3).unwrap())
            .into_dish(12);
        assert_eq!(dish.id, 12);
        assert_eq!(dish.dish_id, "9");
        assert_eq!(dish.preparation_time, 20);
        assert_eq!(dish.rating.map(Rating::value), Some(3));
        assert_eq!(dish.chef_id, None);

        let chef = ChefDraft::new("Gordon", "Ramsay", "bio").into_chef(1);
        assert_eq!(chef.full_name(), "Gordon Ramsay");
    }

    #[test]
    fn test_chef_draft_validation() {
        assert!(ChefDraft::new("Gordon", "Ramsay", "").validate().is_ok());
        assert!(ChefDraft::new("Gordon", "Ramsay", &"x".repeat(1000)).validate().is_ok());
        assert!(matches!(
            ChefDraft::new("Gordon", "Ramsay", &"x".repeat(1001)).validate(),
            Err(ServerError::InvalidRequest(_))
        ));
        assert!(ChefDraft::new("  ", "Ramsay", "").validate().is_err());
        assert!(ChefDraft::new("Gordon", "", "").validate().is_err());
    }
}
