use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_newtype!(CustomerId);
id_newtype!(CartId);
id_newtype!(CartItemId);
id_newtype!(DishId);
id_newtype!(PriceId);
id_newtype!(RestaurantId);
id_newtype!(AddressId);
id_newtype!(SupplierId);
id_newtype!(OrderId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Cart,
    Placed,
    Completed,
    Cancelled,
    #[serde(other)]
    Other,
}

impl OrderStatus {
    /// Orders that will not change any more.
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Cart => "In cart",
            Self::Placed => "Placed",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::Other => "Unknown",
        }
    }
}
