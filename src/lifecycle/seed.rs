//! Demo data for a freshly started system.

use crate::clients::OrderClient;
use crate::model::{OrderDraft, OrderId, OrderLine};
use crate::order_actor::OrderError;
use chrono::{Duration, Utc};
use tracing::info;

fn draft(customer_id: &str, ship_name: &str, city: &str, country: &str, lines: Vec<OrderLine>) -> OrderDraft {
    OrderDraft {
        employee_id: Some(5),
        freight: 32.38,
        ship_name: ship_name.to_string(),
        ship_address: format!("1 Main Street, {}", city),
        ship_city: city.to_string(),
        ship_country: country.to_string(),
        lines,
        ..OrderDraft::new(customer_id, Utc::now() + Duration::days(14))
    }
}

/// Creates one order in each lifecycle state: `New`, `InWork` and `Closed`.
///
/// Returns the ids in that order.
pub async fn seed_demo_orders(orders: &OrderClient) -> Result<Vec<OrderId>, OrderError> {
    let fresh = orders
        .create_order(Some(draft(
            "VINET",
            "Vins et alcools Chevalier",
            "Reims",
            "France",
            vec![OrderLine::new(11, 14.0, 12), OrderLine::new(42, 9.8, 10)],
        )))
        .await?;

    let in_work = orders
        .create_order(Some(draft(
            "TOMSP",
            "Toms Spezialitäten",
            "Münster",
            "Germany",
            vec![OrderLine::new(14, 18.6, 9), OrderLine::new(51, 42.4, 40)],
        )))
        .await?;
    orders.process_order(in_work).await?;

    let closed = orders
        .create_order(Some(draft(
            "HANAR",
            "Hanari Carnes",
            "Rio de Janeiro",
            "Brazil",
            vec![OrderLine {
                discount: 0.05,
                ..OrderLine::new(41, 7.7, 10)
            }],
        )))
        .await?;
    orders.process_order(closed).await?;
    orders.close_order(closed).await?;

    info!(count = 3, "Seeded demo orders");
    Ok(vec![fresh, in_work, closed])
}
