//! Request parameter parsing shared by the HTML and JSON handlers.
//!
//! Forms and query strings arrive as text. Empty strings mean "not given".

use serde::Deserialize;

use crate::error::{Result, ServerError};
use crate::model::{ChefId, Dish, Rating};
use crate::service::DishService;

/// Parse a required numeric id
pub fn parse_id(raw: &str, field: &str) -> Result<i64> {
    raw.trim()
        .parse()
        .map_err(|_| ServerError::InvalidRequest(format!("{} must be a number, got '{}'", field, raw)))
}

/// Parse an optional numeric id; missing or blank is `None`
pub fn parse_optional_id(raw: Option<&str>, field: &str) -> Result<Option<i64>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_id(value, field).map(Some),
    }
}

/// Parse an optional 1-5 rating; missing or blank is `None`
pub fn parse_optional_rating(raw: Option<&str>) -> Result<Option<Rating>> {
    match parse_optional_id(raw, "rating")? {
        None => Ok(None),
        Some(value) => Rating::new(value).map(Some),
    }
}

/// Filters for dish listings
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishFilter {
    pub rating: Option<String>,
    pub chef_id: Option<String>,
}

impl DishFilter {
    pub fn rating(&self) -> Result<Option<Rating>> {
        parse_optional_rating(self.rating.as_deref())
    }

    pub fn chef_id(&self) -> Result<Option<ChefId>> {
        parse_optional_id(self.chef_id.as_deref(), "chefId")
    }

    /// Dishes matching every given filter
    pub async fn apply(&self, dishes: &DishService) -> Result<Vec<Dish>> {
        let rating = self.rating()?;
        match (self.chef_id()?, rating) {
            (Some(chef_id), rating) => {
                let owned = dishes.find_all_by_chef_id(chef_id).await?;
                Ok(owned
                    .into_iter()
                    .filter(|d| rating.is_none() || d.rating == rating)
                    .collect())
            }
            (None, Some(rating)) => dishes.find_all_by_rating(rating).await,
            (None, None) => dishes.list_dishes().await,
        }
    }
}
