//! Customer orders.
//!
//! `Order` implements [`ActorEntity`](actor_framework::ActorEntity) (see
//! [`crate::order_actor::entity`]) and is owned by the order store shards.
//! Callers only ever hold snapshots.

use crate::order_actor::OrderError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Identifier assigned by the store. Assigned ids are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub i32);

impl TryFrom<u32> for OrderId {
    type Error = std::num::TryFromIntError;

    /// Fails for sequence values above `i32::MAX`.
    fn try_from(id: u32) -> Result<Self, Self::Error> {
        i32::try_from(id).map(Self)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OrderId {
    /// `false` for ids the store can never have assigned (zero or negative).
    pub fn is_assignable(self) -> bool {
        self.0 > 0
    }
}

/// Lifecycle state. Orders move `New -> InWork -> Closed` and never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderState {
    New,
    InWork,
    Closed,
}

impl Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OrderState::New => "New",
            OrderState::InWork => "InWork",
            OrderState::Closed => "Closed",
        };
        f.write_str(name)
    }
}

/// One product line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: u32,
    pub unit_price: f64,
    pub quantity: u32,
    /// Fraction in `[0, 1]`.
    pub discount: f64,
}

impl OrderLine {
    pub fn new(product_id: u32, unit_price: f64, quantity: u32) -> Self {
        Self {
            product_id,
            unit_price,
            quantity,
            discount: 0.0,
        }
    }

    pub fn total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity) * (1.0 - self.discount)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub state: OrderState,
    pub customer_id: String,
    pub employee_id: Option<u32>,
    pub required_date: DateTime<Utc>,
    /// Stamped when processing starts.
    pub order_date: Option<DateTime<Utc>>,
    /// Stamped when the order is closed.
    pub shipped_date: Option<DateTime<Utc>>,
    pub freight: f64,
    pub ship_name: String,
    pub ship_address: String,
    pub ship_city: String,
    pub ship_country: String,
    pub lines: Vec<OrderLine>,
}

impl Order {
    /// Builds a `New` order from a draft. The draft is not validated here.
    pub fn new(id: OrderId, draft: OrderDraft) -> Self {
        Self {
            id,
            state: OrderState::New,
            customer_id: draft.customer_id,
            employee_id: draft.employee_id,
            required_date: draft.required_date,
            order_date: None,
            shipped_date: None,
            freight: draft.freight,
            ship_name: draft.ship_name,
            ship_address: draft.ship_address,
            ship_city: draft.ship_city,
            ship_country: draft.ship_country,
            lines: draft.lines,
        }
    }

    /// Replaces every editable field with the draft's values.
    pub fn apply(&mut self, draft: OrderDraft) {
        self.customer_id = draft.customer_id;
        self.employee_id = draft.employee_id;
        self.required_date = draft.required_date;
        self.freight = draft.freight;
        self.ship_name = draft.ship_name;
        self.ship_address = draft.ship_address;
        self.ship_city = draft.ship_city;
        self.ship_country = draft.ship_country;
        self.lines = draft.lines;
    }

    /// Sum of all line totals plus freight.
    pub fn total(&self) -> f64 {
        self.lines.iter().map(OrderLine::total).sum::<f64>() + self.freight
    }
}

/// The caller-editable part of an order, used both to create and to update.
///
/// Identifier, state, and the processing timestamps are owned by the store
/// and cannot be set through a draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub customer_id: String,
    pub employee_id: Option<u32>,
    pub required_date: DateTime<Utc>,
    pub freight: f64,
    pub ship_name: String,
    pub ship_address: String,
    pub ship_city: String,
    pub ship_country: String,
    pub lines: Vec<OrderLine>,
}

impl OrderDraft {
    /// Minimal draft; shipping fields can be filled in with struct update syntax.
    pub fn new(customer_id: impl Into<String>, required_date: DateTime<Utc>) -> Self {
        Self {
            customer_id: customer_id.into(),
            employee_id: None,
            required_date,
            freight: 0.0,
            ship_name: String::new(),
            ship_address: String::new(),
            ship_city: String::new(),
            ship_country: String::new(),
            lines: Vec::new(),
        }
    }

    /// Rejects drafts that could not describe a real order.
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.customer_id.trim().is_empty() {
            return Err(OrderError::InvalidArgument("customer id is empty".into()));
        }
        if !self.freight.is_finite() || self.freight < 0.0 {
            return Err(OrderError::InvalidArgument(format!(
                "freight must be a non-negative amount, got {}",
                self.freight
            )));
        }
        for line in &self.lines {
            if line.quantity == 0 {
                return Err(OrderError::InvalidArgument(format!(
                    "line for product {} has zero quantity",
                    line.product_id
                )));
            }
            if !line.unit_price.is_finite() || line.unit_price < 0.0 {
                return Err(OrderError::InvalidArgument(format!(
                    "line for product {} has invalid unit price {}",
                    line.product_id, line.unit_price
                )));
            }
            if !(0.0..=1.0).contains(&line.discount) {
                return Err(OrderError::InvalidArgument(format!(
                    "line for product {} has discount {} outside [0, 1]",
                    line.product_id, line.discount
                )));
            }
        }
        Ok(())
    }
}

impl From<Order> for OrderDraft {
    fn from(order: Order) -> Self {
        Self {
            customer_id: order.customer_id,
            employee_id: order.employee_id,
            required_date: order.required_date,
            freight: order.freight,
            ship_name: order.ship_name,
            ship_address: order.ship_address,
            ship_city: order.ship_city,
            ship_country: order.ship_country,
            lines: order.lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn draft() -> OrderDraft {
        OrderDraft {
            freight: 12.5,
            lines: vec![OrderLine::new(11, 14.0, 12), OrderLine::new(42, 9.8, 10)],
            ..OrderDraft::new("VINET", Utc::now() + Duration::days(1))
        }
    }

    #[test]
    fn new_order_starts_in_new_without_timestamps() {
        let order = Order::new(OrderId(7), draft());
        assert_eq!(order.state, OrderState::New);
        assert!(order.order_date.is_none());
        assert!(order.shipped_date.is_none());
        assert_eq!(order.customer_id, "VINET");
    }

    #[test]
    fn total_includes_discount_and_freight() {
        let mut d = draft();
        d.lines[0].discount = 0.5;
        let order = Order::new(OrderId(1), d);
        let expected = 14.0 * 12.0 * 0.5 + 9.8 * 10.0 + 12.5;
        assert!((order.total() - expected).abs() < 1e-9);
    }

    #[test]
    fn validate_rejects_malformed_drafts() {
        assert!(draft().validate().is_ok());

        let mut empty_customer = draft();
        empty_customer.customer_id = "  ".into();
        assert!(matches!(empty_customer.validate(), Err(OrderError::InvalidArgument(_))));

        let mut negative_freight = draft();
        negative_freight.freight = -1.0;
        assert!(negative_freight.validate().is_err());

        let mut nan_freight = draft();
        nan_freight.freight = f64::NAN;
        assert!(nan_freight.validate().is_err());

        let mut zero_quantity = draft();
        zero_quantity.lines[1].quantity = 0;
        assert!(zero_quantity.validate().is_err());

        let mut bad_discount = draft();
        bad_discount.lines[0].discount = 1.5;
        assert!(bad_discount.validate().is_err());
    }

    #[test]
    fn draft_from_order_drops_store_owned_fields() {
        let original = draft();
        let mut order = Order::new(OrderId(3), original.clone());
        order.state = OrderState::InWork;
        order.order_date = Some(Utc::now());
        assert_eq!(OrderDraft::from(order), original);
    }

    #[test]
    fn ids_from_sequence_stay_positive() {
        assert_eq!(OrderId::try_from(5u32), Ok(OrderId(5)));
        assert_eq!(OrderId::try_from(i32::MAX as u32), Ok(OrderId(i32::MAX)));
        assert!(OrderId::try_from(i32::MAX as u32 + 1).is_err());
        assert!(OrderId(1).is_assignable());
        assert!(!OrderId(0).is_assignable());
        assert!(!OrderId(-1).is_assignable());
    }
}
