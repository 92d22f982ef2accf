//! Ticket selection before checkout.
//!
//! The purchase sheet keeps a quantity per ticket tier. [`TicketSelection`]
//! holds those quantities, computes the subtotal against the conference's
//! tiers and turns a valid selection into the [`TicketOrder`] body sent to
//! `/Payment/create-payment`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::Conference;
use crate::validation::ValidationError;

/// Per-tier quantity cap, independent of remaining slots.
pub const MAX_PER_TIER: u32 = 10;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketSelection {
    quantities: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub conference_price_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketOrder {
    pub conference_id: String,
    pub tickets: Vec<OrderLine>,
}

impl TicketSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quantity(&self, price_id: &str) -> u32 {
        self.quantities.get(price_id).copied().unwrap_or(0)
    }

    /// Set a tier's quantity; zero removes the tier from the selection.
    pub fn set(&mut self, price_id: impl Into<String>, quantity: u32) {
        let price_id = price_id.into();
        if quantity == 0 {
            self.quantities.remove(&price_id);
        } else {
            self.quantities.insert(price_id, quantity.min(MAX_PER_TIER));
        }
    }

    pub fn increment(&mut self, price_id: &str) {
        let next = self.quantity(price_id).saturating_add(1);
        self.set(price_id, next);
    }

    pub fn decrement(&mut self, price_id: &str) {
        let next = self.quantity(price_id).saturating_sub(1);
        self.set(price_id, next);
    }

    pub fn total_quantity(&self) -> u32 {
        self.quantities.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    /// Sum of `price * quantity` over the selected tiers. Tiers that no longer
    /// exist on the conference contribute nothing.
    pub fn subtotal(&self, conference: &Conference) -> f64 {
        self.quantities
            .iter()
            .filter_map(|(id, qty)| conference.price(id).map(|p| p.price() * f64::from(*qty)))
            .sum()
    }

    /// Check the selection against the conference's tiers and build the order.
    pub fn to_order(&self, conference: &Conference) -> Result<TicketOrder, ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::new("tickets", "Select at least one ticket"));
        }
        let mut tickets = Vec::with_capacity(self.quantities.len());
        for (id, qty) in &self.quantities {
            let Some(tier) = conference.price(id) else {
                return Err(ValidationError::new("tickets", "Ticket type is no longer available"));
            };
            if let Some(available) = tier.available_slot {
                if *qty > available {
                    let name = tier.ticket_name.as_deref().unwrap_or("this ticket");
                    return Err(ValidationError::new(
                        "tickets",
                        format!("Only {available} left for {name}"),
                    ));
                }
            }
            tickets.push(OrderLine {
                conference_price_id: id.clone(),
                quantity: *qty,
            });
        }
        Ok(TicketOrder {
            conference_id: conference.conference_id.clone(),
            tickets,
        })
    }
}
