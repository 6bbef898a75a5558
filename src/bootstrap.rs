//! Startup seed data.

use crate::error::Result;
use crate::model::{ChefDraft, DishDraft, Rating};
use crate::service::{ChefService, DishService};

const CHEFS: [(&str, &str, &str); 5] = [
    ("Gordon", "Ramsay", "World-renowned chef with 16 Michelin stars"),
    ("Jamie", "Oliver", "British celebrity chef known for his Italian cuisine"),
    ("Marco", "Pierre White", "First British chef to be awarded three Michelin stars"),
    ("Heston", "Blumenthal", "Pioneer of multi-sensory cooking and molecular gastronomy"),
    ("Massimo", "Bottura", "Italian chef with three Michelin stars, owner of Osteria Francescana"),
];

/// (dish id, name, cuisine, minutes, stars)
const DISHES: [(&str, &str, &str, u32, i64); 5] = [
    ("1", "Pasta Carbonara", "Italian", 30, 5),
    ("2", "Beef Wellington", "British", 45, 5),
    ("3", "Chicken Tikka Masala", "Indian", 40, 4),
    ("4", "Sushi Platter", "Japanese", 50, 4),
    ("5", "Coq au Vin", "French", 60, 5),
];

/// Seed chefs and dishes when no chef exists yet. Dishes start without an
/// owner. Returns whether anything was written.
pub async fn seed(chefs: &ChefService, dishes: &DishService) -> Result<bool> {
    if chefs.count().await? > 0 {
        tracing::info!("Store already has chefs, skipping seed");
        return Ok(false);
    }

    for (first_name, last_name, bio) in CHEFS {
        chefs.create(ChefDraft::new(first_name, last_name, bio)).await?;
    }

    for (dish_id, name, cuisine, minutes, stars) in DISHES {
        let draft = DishDraft::new(dish_id, name, cuisine, minutes).with_rating(Rating::new(stars)?);
        dishes.create(draft).await?;
    }

    tracing::info!("Seeded {} chefs and {} dishes", CHEFS.len(), DISHES.len());
    Ok(true)
}
