//! Error taxonomy for cart actions and the user-facing text derived from it.

use shared::domain::{CartItemId, CustomerId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CartError {
    #[error("server is unreachable: {0}")]
    Network(String),
    #[error("request rejected ({status}): {message}")]
    Validation { status: u16, message: String },
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("the configured API address is not a valid base URL ({0})")]
    InvalidUrl(String),
    #[error("item {0} is not in the cart")]
    UnknownItem(CartItemId),
    #[error("quantity must stay at least 1; remove the item instead")]
    QuantityBelowMinimum,
    #[error("no note is being edited")]
    NotEditing,
    #[error("customer {0} has no delivery address on file")]
    MissingAddress(CustomerId),
}

// Status codes never reach this conversion; `check_status` maps them first.
impl From<reqwest::Error> for CartError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Validation,
    Server,
}

impl CartError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Network(_) => ErrorCategory::Network,
            Self::Server { .. } | Self::Decode(_) => ErrorCategory::Server,
            Self::Validation { .. }
            | Self::InvalidUrl(_)
            | Self::UnknownItem(_)
            | Self::QuantityBelowMinimum
            | Self::NotEditing
            | Self::MissingAddress(_) => ErrorCategory::Validation,
        }
    }

    /// Text worth showing to the user as-is, when the error carries one.
    fn detail(&self) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// The user action an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAction {
    LoadCart,
    AddItem,
    UpdateQuantity,
    EditNote,
    RemoveItem,
    ClearCart,
    Checkout,
    LoadOrders,
    LoadOrderDetails,
    LoadRestaurants,
    LoadMenu,
}

impl CartAction {
    pub fn name(self) -> &'static str {
        match self {
            Self::LoadCart => "load_cart",
            Self::AddItem => "add_item",
            Self::UpdateQuantity => "update_quantity",
            Self::EditNote => "edit_note",
            Self::RemoveItem => "remove_item",
            Self::ClearCart => "clear_cart",
            Self::Checkout => "checkout",
            Self::LoadOrders => "load_orders",
            Self::LoadOrderDetails => "load_order_details",
            Self::LoadRestaurants => "load_restaurants",
            Self::LoadMenu => "load_menu",
        }
    }

    fn failure_text(self) -> &'static str {
        match self {
            Self::LoadCart => "Could not load the cart",
            Self::AddItem => "Could not add the dish to the cart",
            Self::UpdateQuantity => "Could not update the quantity",
            Self::EditNote => "Could not save the note",
            Self::RemoveItem => "Could not remove the item",
            Self::ClearCart => "Could not empty the cart",
            Self::Checkout => "Could not place the order",
            Self::LoadOrders => "Could not load the order history",
            Self::LoadOrderDetails => "Could not load the order details",
            Self::LoadRestaurants => "Could not load the restaurants",
            Self::LoadMenu => "Could not load the menu",
        }
    }
}

pub fn user_message(action: CartAction, err: &CartError) -> String {
    let prefix = action.failure_text();
    match err.category() {
        ErrorCategory::Network => {
            format!("{prefix}: the server is unreachable. Check your connection and try again.")
        }
        ErrorCategory::Validation => format!("{prefix}: {}", err.detail()),
        ErrorCategory::Server => {
            format!("{prefix}: the server ran into a problem. Please try again later.")
        }
    }
}
