//! Client side of the food-ordering cart: REST access to the cart service and
//! the session controller that keeps a view's cart state in step with it.

pub mod api;
pub mod config;
pub mod error;
pub mod history;
pub mod prompt;
pub mod session;

pub use api::{CartApi, HttpCartApi};
pub use config::{load_settings, Settings};
pub use error::{user_message, CartAction, CartError, ErrorCategory};
pub use prompt::UserPrompt;
pub use session::{ActionOutcome, CartSession, DeliveryAddress, NoteEdit};

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod api_tests;

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod session_tests;
