//! Shop catalog, item categories and item effects

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::Vital::{self, Energy, Happiness, Health, Hunger, Hygiene};
use crate::engine::progression::Grant;

/// A purchasable item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShopItem {
    pub key: &'static str,
    pub title: &'static str,
    pub section: &'static str,
    pub base_price: u64,
    pub level_required: u32,
}

const fn item(
    key: &'static str,
    title: &'static str,
    section: &'static str,
    base_price: u64,
    level_required: u32,
) -> ShopItem {
    ShopItem {
        key,
        title,
        section,
        base_price,
        level_required,
    }
}

pub static CATALOG: &[ShopItem] = &[
    // Food
    item("food_apple", "Apple", "Food", 5, 1),
    item("food_carrot", "Carrot", "Food", 8, 1),
    item("food_candy", "Candy", "Food", 10, 1),
    item("food_icecream", "Ice cream", "Food", 12, 2),
    item("food_cake", "Cake", "Food", 15, 2),
    item("food_pizza", "Pizza", "Food", 20, 3),
    item("food_steak", "Steak", "Food", 30, 5),
    item("food_sushi", "Sushi", "Food", 40, 7),
    item("food_sandwich", "Sandwich", "Food", 8, 1),
    item("food_cookie", "Cookie", "Food", 9, 1),
    item("food_donut", "Donut", "Food", 11, 2),
    item("food_burger", "Burger", "Food", 22, 3),
    item("food_ramen", "Ramen", "Food", 28, 4),
    item("food_berry", "Berries", "Food", 7, 1),
    item("food_grape", "Grapes", "Food", 10, 1),
    item("food_pineapple", "Pineapple", "Food", 16, 2),
    item("food_lobster", "Lobster", "Food", 60, 9),
    item("food_truffle", "Truffle", "Food", 80, 12),
    // Drinks
    item("drink_tea", "Tea", "Drinks", 8, 1),
    item("drink_juice", "Juice", "Drinks", 10, 1),
    item("drink_milk", "Milk", "Drinks", 9, 1),
    item("drink_cocoa", "Cocoa", "Drinks", 14, 2),
    item("drink_smoothie", "Smoothie", "Drinks", 18, 3),
    item("drink_coconut", "Coconut drink", "Drinks", 22, 4),
    item("drink_potion_energy", "Energy potion", "Drinks", 35, 5),
    // Medicine
    item("medicine_bandage", "Bandage", "Medicine", 10, 1),
    item("medicine_syringe", "Shot", "Medicine", 18, 2),
    item("medicine_potion", "Potion", "Medicine", 25, 2),
    item("medicine_elixir", "Elixir", "Medicine", 50, 5),
    item("medicine_vitamin", "Vitamins", "Medicine", 14, 1),
    item("medicine_herb", "Healing herb", "Medicine", 20, 2),
    item("medicine_crystal_vial", "Crystal vial", "Medicine", 75, 8),
    item("medicine_phoenix_tear", "Phoenix tear", "Medicine", 120, 12),
    // Hygiene
    item("wash_soap", "Soap", "Hygiene", 8, 1),
    item("wash_sponge", "Sponge", "Hygiene", 10, 1),
    item("wash_toothbrush", "Toothbrush", "Hygiene", 12, 1),
    item("wash_shampoo", "Shampoo", "Hygiene", 15, 2),
    item("wash_spa", "Spa kit", "Hygiene", 35, 4),
    item("wash_perfume", "Perfume", "Hygiene", 28, 3),
    item("wash_bubble_bath", "Bubble bath", "Hygiene", 20, 2),
    item("wash_premium_spa", "Premium spa", "Hygiene", 65, 7),
    // Toys
    item("toy_ball", "Ball", "Toys", 12, 1),
    item("toy_frisbee", "Frisbee", "Toys", 18, 2),
    item("toy_puzzle", "Puzzle", "Toys", 25, 3),
    item("toy_guitar", "Guitar", "Toys", 30, 3),
    item("toy_accordion", "Accordion", "Toys", 35, 4),
    item("toy_saxophone", "Saxophone", "Toys", 40, 5),
    item("toy_drum", "Drum", "Toys", 28, 3),
    item("toy_bicycle", "Bicycle", "Toys", 50, 6),
    item("toy_kite", "Kite", "Toys", 22, 2),
    item("toy_telescope", "Telescope", "Toys", 45, 5),
    item("toy_chemistry_set", "Chemistry set", "Toys", 55, 6),
    item("toy_robot", "Toy robot", "Toys", 70, 8),
    item("toy_magic_wand", "Magic wand", "Toys", 60, 7),
    item("toy_paintbrush", "Paint set", "Toys", 34, 3),
    item("toy_skateboard", "Skateboard", "Toys", 48, 5),
    // Cosmetics
    item("decor_star_halo", "Star halo", "Decor", 35, 1),
    item("decor_moon_tiara", "Moon tiara", "Decor", 65, 4),
    item("decor_butterfly_clip", "Butterfly clip", "Decor", 40, 2),
    item("decor_rainbow_wings", "Rainbow wings", "Decor", 100, 8),
    item("decor_crown_gold", "Golden crown", "Decor", 150, 15),
    item("horn_glow_amber", "Amber glow", "Horn effects", 50, 3),
    item("horn_glow_aurora", "Aurora glow", "Horn effects", 90, 7),
    item("horn_glow_fire", "Fire glow", "Horn effects", 110, 10),
    item("acc_scarf_sky", "Sky scarf", "Accessories", 45, 2),
    item("acc_boots_cloud", "Cloud boots", "Accessories", 80, 8),
    item("acc_cape", "Hero cape", "Accessories", 90, 10),
    item("acc_sunglasses", "Sunglasses", "Accessories", 35, 2),
    // Room themes
    item("theme_spring_room", "Spring room", "Room themes", 70, 5),
    item("theme_forest_room", "Forest glade", "Room themes", 80, 6),
    item("theme_ocean_room", "Undersea world", "Room themes", 100, 8),
    item("theme_crystal_room", "Crystal room", "Room themes", 120, 10),
    item("theme_space_room", "Space station", "Room themes", 130, 11),
    item("theme_volcano_room", "Volcano lair", "Room themes", 160, 13),
];

static CATALOG_INDEX: Lazy<HashMap<&'static str, &'static ShopItem>> =
    Lazy::new(|| CATALOG.iter().map(|item| (item.key, item)).collect());

pub fn find_item(key: &str) -> Option<&'static ShopItem> {
    CATALOG_INDEX.get(key).copied()
}

/// Price scales geometrically with the buyer's level
pub fn price_for_level(base_price: u64, level: u32) -> u64 {
    let factor = 1.8_f64.powi(level.max(1) as i32);
    (base_price as f64 * factor).round() as u64
}

/// Item family, derived from the key prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Food,
    Drink,
    Medicine,
    Wash,
    Toy,
    Cosmetic,
}

impl ItemCategory {
    pub fn of(key: &str) -> Self {
        if key.starts_with("food_") {
            Self::Food
        } else if key.starts_with("drink_") {
            Self::Drink
        } else if key.starts_with("medicine_") {
            Self::Medicine
        } else if key.starts_with("wash_") {
            Self::Wash
        } else if key.starts_with("toy_") {
            Self::Toy
        } else {
            Self::Cosmetic
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Drink => "drink",
            Self::Medicine => "medicine",
            Self::Wash => "wash",
            Self::Toy => "toy",
            Self::Cosmetic => "cosmetic",
        }
    }

    pub fn is_consumable(&self) -> bool {
        !matches!(self, Self::Cosmetic)
    }

    /// XP and coins for using one item of this family
    pub fn use_reward(&self) -> Grant {
        match self {
            Self::Food | Self::Wash => Grant::new(5, 2),
            Self::Medicine => Grant::new(7, 3),
            Self::Toy => Grant::new(10, 5),
            Self::Drink | Self::Cosmetic => Grant::new(3, 1),
        }
    }
}

/// What consuming an item does to the pet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemEffect {
    pub key: &'static str,
    pub vitals: &'static [(Vital, i32)],
    /// Added on top of the clamped stats, never capped
    pub intelligence: u64,
}

const fn fx(key: &'static str, vitals: &'static [(Vital, i32)], intelligence: u64) -> ItemEffect {
    ItemEffect {
        key,
        vitals,
        intelligence,
    }
}

static ITEM_EFFECTS: &[ItemEffect] = &[
    fx("food_apple", &[(Hunger, 15), (Happiness, 2)], 0),
    fx("food_carrot", &[(Hunger, 18), (Happiness, 3)], 0),
    fx("food_candy", &[(Hunger, 12), (Happiness, 8)], 0),
    fx("food_icecream", &[(Hunger, 20), (Happiness, 10)], 0),
    fx("food_cake", &[(Hunger, 25), (Happiness, 8)], 0),
    fx("food_pizza", &[(Hunger, 30), (Happiness, 10)], 0),
    fx("food_steak", &[(Hunger, 35), (Happiness, 12)], 0),
    fx("food_sushi", &[(Hunger, 40), (Happiness, 15)], 0),
    fx("food_sandwich", &[(Hunger, 16), (Happiness, 4)], 0),
    fx("food_cookie", &[(Hunger, 10), (Happiness, 7)], 0),
    fx("food_donut", &[(Hunger, 14), (Happiness, 9)], 0),
    fx("food_burger", &[(Hunger, 28), (Happiness, 10)], 0),
    fx("food_ramen", &[(Hunger, 30), (Happiness, 8), (Health, 2)], 0),
    fx("food_berry", &[(Hunger, 10), (Happiness, 5), (Health, 3)], 0),
    fx("food_grape", &[(Hunger, 12), (Happiness, 5), (Health, 2)], 0),
    fx("food_pineapple", &[(Hunger, 18), (Happiness, 8), (Health, 3)], 0),
    fx("food_lobster", &[(Hunger, 45), (Happiness, 20), (Health, 5)], 0),
    fx("food_truffle", &[(Hunger, 50), (Happiness, 25)], 3),
    fx("drink_tea", &[(Happiness, 10), (Energy, 5), (Health, 2)], 0),
    fx("drink_juice", &[(Hunger, 8), (Happiness, 7), (Health, 3)], 0),
    fx("drink_milk", &[(Hunger, 12), (Health, 8)], 0),
    fx("drink_cocoa", &[(Hunger, 10), (Happiness, 12)], 0),
    fx("drink_smoothie", &[(Hunger, 15), (Happiness, 10), (Health, 5)], 0),
    fx("drink_coconut", &[(Hunger, 18), (Happiness, 12), (Health, 4)], 0),
    fx("drink_potion_energy", &[(Energy, 30), (Happiness, 8)], 0),
    fx("medicine_bandage", &[(Health, 20), (Energy, 5)], 0),
    fx("medicine_syringe", &[(Health, 30), (Energy, 8)], 0),
    fx("medicine_potion", &[(Health, 35), (Energy, 10)], 0),
    fx("medicine_elixir", &[(Health, 50), (Energy, 20)], 0),
    fx("medicine_vitamin", &[(Health, 15), (Energy, 10), (Happiness, 3)], 0),
    fx("medicine_herb", &[(Health, 22), (Energy, 8), (Hygiene, 5)], 0),
    fx("medicine_crystal_vial", &[(Health, 60), (Energy, 30), (Happiness, 10)], 0),
    fx("medicine_phoenix_tear", &[(Health, 100), (Energy, 50), (Happiness, 20)], 0),
    fx("wash_soap", &[(Hygiene, 25), (Happiness, 3)], 0),
    fx("wash_sponge", &[(Hygiene, 28), (Happiness, 4)], 0),
    fx("wash_toothbrush", &[(Hygiene, 30), (Happiness, 5), (Health, 3)], 0),
    fx("wash_shampoo", &[(Hygiene, 35), (Happiness, 5)], 0),
    fx("wash_spa", &[(Hygiene, 50), (Happiness, 10), (Health, 5)], 0),
    fx("wash_perfume", &[(Hygiene, 20), (Happiness, 12)], 0),
    fx("wash_bubble_bath", &[(Hygiene, 32), (Happiness, 8), (Energy, 5)], 0),
    fx(
        "wash_premium_spa",
        &[(Hygiene, 70), (Happiness, 20), (Health, 10), (Energy, 10)],
        0,
    ),
    fx("toy_ball", &[(Happiness, 18), (Energy, -8)], 0),
    fx("toy_frisbee", &[(Happiness, 22), (Energy, -10)], 0),
    fx("toy_puzzle", &[(Happiness, 25), (Energy, -5)], 1),
    fx("toy_guitar", &[(Happiness, 28), (Energy, -12)], 2),
    fx("toy_accordion", &[(Happiness, 30), (Energy, -10)], 2),
    fx("toy_saxophone", &[(Happiness, 32), (Energy, -15)], 3),
    fx("toy_drum", &[(Happiness, 26), (Energy, -14)], 0),
    fx("toy_bicycle", &[(Happiness, 35), (Energy, -20), (Health, 5)], 0),
    fx("toy_kite", &[(Happiness, 24), (Energy, -10)], 0),
    fx("toy_telescope", &[(Happiness, 28), (Energy, -8)], 3),
    fx("toy_chemistry_set", &[(Happiness, 30), (Energy, -10)], 4),
    fx("toy_robot", &[(Happiness, 35), (Energy, -12)], 5),
    fx("toy_magic_wand", &[(Happiness, 38), (Energy, -10)], 4),
    fx("toy_paintbrush", &[(Happiness, 28), (Energy, -8)], 3),
    fx("toy_skateboard", &[(Happiness, 32), (Energy, -18), (Health, 3)], 0),
];

static EFFECT_INDEX: Lazy<HashMap<&'static str, &'static ItemEffect>> =
    Lazy::new(|| ITEM_EFFECTS.iter().map(|e| (e.key, e)).collect());

pub fn item_effect(key: &str) -> Option<&'static ItemEffect> {
    EFFECT_INDEX.get(key).copied()
}

/// Display title, falling back to the key for items outside the catalog
pub fn item_title(key: &str) -> &str {
    find_item(key).map(|i| i.title).unwrap_or(key)
}
