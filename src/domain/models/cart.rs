use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AddOn {
    pub id: String,
    pub name: String,
    pub price: f64,
}

/// One line of a transient shopping cart. Physical products and experience bookings
/// share a checkout but diverge everywhere else, so the distinction is a tagged
/// union matched exhaustively at the codec boundary.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum CartItem {
    Product {
        id: String,
        title: String,
        price: f64,
        quantity: u32,
    },
    Experience {
        id: String,
        title: String,
        price: f64,
        quantity: u32,
        date: String,
        time: String,
        guests: u32,
        #[serde(default)]
        add_ons: Vec<AddOn>,
    },
}

impl CartItem {
    pub fn id(&self) -> &str {
        match self {
            CartItem::Product { id, .. } | CartItem::Experience { id, .. } => id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            CartItem::Product { title, .. } | CartItem::Experience { title, .. } => title,
        }
    }

    pub fn quantity(&self) -> u32 {
        match self {
            CartItem::Product { quantity, .. } | CartItem::Experience { quantity, .. } => *quantity,
        }
    }

    /// Provider unit amount in cents. Add-on cost is folded into the unit amount
    /// rather than sent as separate line items.
    pub fn unit_amount_cents(&self) -> i64 {
        match self {
            CartItem::Product { price, .. } => (price * 100.0).round() as i64,
            CartItem::Experience { price, add_ons, .. } => {
                let addon_total: f64 = add_ons.iter().map(|a| a.price).sum();
                (price * 100.0).round() as i64 + (addon_total * 100.0).round() as i64
            }
        }
    }

    /// Line total in major units, add-ons included. Used for the recomputed,
    /// authoritative amounts at materialization time.
    pub fn line_total(&self) -> f64 {
        match self {
            CartItem::Product { price, quantity, .. } => price * f64::from(*quantity),
            CartItem::Experience { price, quantity, add_ons, .. } => {
                let addon_total: f64 = add_ons.iter().map(|a| a.price).sum();
                (price + addon_total) * f64::from(*quantity)
            }
        }
    }
}
