//! Menu catalog and per-order item selection.

use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::order::OrderSize;

/// Items sold by the simulated restaurant.
///
/// Variant order is the catalog order, which is also the key order of
/// [`ItemQuantities`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuItem {
    Hamburger,
    FriedChicken,
    Fries,
    Drink,
    IceCream,
    Dessert,
}

impl MenuItem {
    /// The full catalog.
    pub const ALL: [MenuItem; 6] = [
        MenuItem::Hamburger,
        MenuItem::FriedChicken,
        MenuItem::Fries,
        MenuItem::Drink,
        MenuItem::IceCream,
        MenuItem::Dessert,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MenuItem::Hamburger => "hamburger",
            MenuItem::FriedChicken => "fried_chicken",
            MenuItem::Fries => "fries",
            MenuItem::Drink => "drink",
            MenuItem::IceCream => "ice_cream",
            MenuItem::Dessert => "dessert",
        }
    }

    /// Unit price.
    pub fn price(self) -> Decimal {
        let cents = match self {
            MenuItem::Hamburger => 1200,
            MenuItem::FriedChicken => 1400,
            MenuItem::Fries => 600,
            MenuItem::Drink => 500,
            MenuItem::IceCream => 700,
            MenuItem::Dessert => 800,
        };
        Decimal::new(cents, 2)
    }

    /// Probability that an order includes this item at all.
    pub fn inclusion_probability(self) -> f64 {
        match self {
            MenuItem::Fries => 0.7,
            MenuItem::IceCream | MenuItem::Dessert => 0.3,
            _ => 0.5,
        }
    }
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quantity per included menu item. Every stored quantity is at least 1.
pub type ItemQuantities = BTreeMap<MenuItem, u32>;

/// Items picked for one order together with their priced total.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSet {
    pub items: ItemQuantities,
    /// Sum of quantity times unit price, at two decimal places
    pub total: Decimal,
}

/// Price a set of quantities against the catalog.
pub fn price_items(items: &ItemQuantities) -> Decimal {
    items
        .iter()
        .map(|(item, qty)| item.price() * Decimal::from(*qty))
        .sum::<Decimal>()
        .round_dp(2)
}

/// Pick the items for one order.
///
/// Each catalog item is included independently with its own probability;
/// an included item gets a quantity in `1..=size.max_quantity()`. An order
/// with no items (total 0.00) is a valid outcome.
pub fn generate_items<R: Rng>(rng: &mut R, size: OrderSize) -> ItemSet {
    let mut items = ItemQuantities::new();
    let mut total = Decimal::ZERO;

    for item in MenuItem::ALL {
        if rng.gen_bool(item.inclusion_probability()) {
            let qty = rng.gen_range(1..=size.max_quantity());
            items.insert(item, qty);
            total += item.price() * Decimal::from(qty);
        }
    }

    ItemSet {
        items,
        total: total.round_dp(2),
    }
}
