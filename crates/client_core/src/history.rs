//! Past orders of a customer.

use std::collections::{BTreeSet, HashMap};

use shared::{
    domain::{CustomerId, RestaurantId},
    protocol::OrderSummary,
};
use tracing::debug;

use crate::{api::CartApi, error::CartError};

/// Keep completed and cancelled orders, newest first. Orders without a
/// timestamp go last.
pub fn finished_orders(orders: Vec<OrderSummary>) -> Vec<OrderSummary> {
    let mut finished: Vec<_> = orders
        .into_iter()
        .filter(|order| order.status.is_finished())
        .collect();
    finished.sort_by(|a, b| b.ordered_at.cmp(&a.ordered_at));
    finished
}

/// Shown when a restaurant lookup fails.
pub const UNKNOWN_RESTAURANT: &str = "Restaurant";

pub async fn load_finished_orders<A: CartApi + ?Sized>(
    api: &A,
    customer_id: CustomerId,
) -> Result<Vec<OrderSummary>, CartError> {
    let orders = api.list_orders(customer_id).await?;
    let total = orders.len();
    let mut finished = finished_orders(orders);
    resolve_restaurant_names(api, &mut finished).await;
    debug!(%customer_id, total, finished = finished.len(), "loaded order history");
    Ok(finished)
}

/// Fill in missing restaurant names with one lookup per distinct restaurant.
/// Lookup failures never fail the history.
pub async fn resolve_restaurant_names<A: CartApi + ?Sized>(
    api: &A,
    orders: &mut [OrderSummary],
) {
    let missing: BTreeSet<RestaurantId> = orders
        .iter()
        .filter(|order| order.restaurant_name.is_none())
        .filter_map(|order| order.restaurant_id)
        .collect();

    let mut names = HashMap::with_capacity(missing.len());
    for restaurant_id in missing {
        let name = match api.restaurant_menu(restaurant_id).await {
            Ok(menu) => menu.name,
            Err(err) => {
                debug!(%restaurant_id, error = %err, "restaurant lookup failed");
                UNKNOWN_RESTAURANT.to_string()
            }
        };
        names.insert(restaurant_id, name);
    }

    for order in orders.iter_mut().filter(|order| order.restaurant_name.is_none()) {
        if let Some(restaurant_id) = order.restaurant_id {
            order.restaurant_name = names.get(&restaurant_id).cloned();
        }
    }
}
