//! REST boundary to the cart service.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{AddressId, CartItemId, CustomerId, OrderId, RestaurantId},
    error::ApiErrorBody,
    protocol::{
        AddItemRequest, AddressLookupResponse, Cart, CheckoutReceipt, CheckoutRequest,
        OrderDetails, OrderSummary, RestaurantMenu, RestaurantSummary, UpdateNoteRequest,
        UpdateQuantityRequest,
    },
};
use tracing::debug;
use url::Url;

use crate::{config::Settings, error::CartError};

/// Remote cart service. Every mutating call answers with the authoritative
/// cart, except `clear_cart`.
#[async_trait]
pub trait CartApi: Send + Sync {
    async fn fetch_cart(&self, customer_id: CustomerId) -> Result<Cart, CartError>;
    async fn add_item(
        &self,
        customer_id: CustomerId,
        request: &AddItemRequest,
    ) -> Result<Cart, CartError>;
    async fn update_quantity(
        &self,
        customer_id: CustomerId,
        item_id: CartItemId,
        quantity: u32,
    ) -> Result<Cart, CartError>;
    async fn update_note(
        &self,
        customer_id: CustomerId,
        item_id: CartItemId,
        note: &str,
    ) -> Result<Cart, CartError>;
    async fn remove_item(
        &self,
        customer_id: CustomerId,
        item_id: CartItemId,
    ) -> Result<Cart, CartError>;
    async fn clear_cart(&self, customer_id: CustomerId) -> Result<(), CartError>;
    async fn delivery_address(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<AddressId>, CartError>;
    async fn checkout(
        &self,
        customer_id: CustomerId,
        request: &CheckoutRequest,
    ) -> Result<CheckoutReceipt, CartError>;
    async fn list_orders(&self, customer_id: CustomerId) -> Result<Vec<OrderSummary>, CartError>;
    async fn order_details(&self, order_id: OrderId) -> Result<OrderDetails, CartError>;
    async fn list_restaurants(&self) -> Result<Vec<RestaurantSummary>, CartError>;
    /// Restaurant with its orderable dishes and their price ids.
    async fn restaurant_menu(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<RestaurantMenu, CartError>;
}

pub struct HttpCartApi {
    http: Client,
    base_url: Url,
    auth_token: Option<String>,
}

impl HttpCartApi {
    pub fn new(base_url: &str, auth_token: Option<String>) -> Result<Self, CartError> {
        Self::with_client(Client::new(), base_url, auth_token)
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, CartError> {
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        Self::with_client(http, &settings.api_base_url, settings.auth_token.clone())
    }

    fn with_client(
        http: Client,
        base_url: &str,
        auth_token: Option<String>,
    ) -> Result<Self, CartError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|err| CartError::InvalidUrl(format!("{base_url}: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(CartError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            http,
            base_url,
            auth_token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, CartError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CartError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(method = %method, path = url.path(), "cart api request");
        let builder = self.http.request(method, url);
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, CartError> {
    let response = check_status(builder.send().await?).await?;
    Ok(response.json().await?)
}

async fn check_status(response: Response) -> Result<Response, CartError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.bytes().await.unwrap_or_default();
    let message = serde_json::from_slice::<ApiErrorBody>(&body)
        .ok()
        .and_then(|body| body.text())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
    debug!(status = status.as_u16(), %message, "cart api error response");

    let status = status.as_u16();
    if status >= 500 {
        Err(CartError::Server { status, message })
    } else {
        Err(CartError::Validation { status, message })
    }
}

#[async_trait]
impl CartApi for HttpCartApi {
    async fn fetch_cart(&self, customer_id: CustomerId) -> Result<Cart, CartError> {
        let url = self.endpoint(&["cart", &customer_id.to_string()])?;
        send_json(self.request(Method::GET, url)).await
    }

    async fn add_item(
        &self,
        customer_id: CustomerId,
        request: &AddItemRequest,
    ) -> Result<Cart, CartError> {
        let url = self.endpoint(&["cart", &customer_id.to_string(), "items"])?;
        send_json(self.request(Method::POST, url).json(request)).await
    }

    async fn update_quantity(
        &self,
        customer_id: CustomerId,
        item_id: CartItemId,
        quantity: u32,
    ) -> Result<Cart, CartError> {
        let url = self.endpoint(&[
            "cart",
            &customer_id.to_string(),
            "items",
            &item_id.to_string(),
            "quantity",
        ])?;
        send_json(
            self.request(Method::PUT, url)
                .json(&UpdateQuantityRequest { quantity }),
        )
        .await
    }

    async fn update_note(
        &self,
        customer_id: CustomerId,
        item_id: CartItemId,
        note: &str,
    ) -> Result<Cart, CartError> {
        let url = self.endpoint(&[
            "cart",
            &customer_id.to_string(),
            "items",
            &item_id.to_string(),
            "notes",
        ])?;
        send_json(self.request(Method::PUT, url).json(&UpdateNoteRequest {
            note: note.to_string(),
        }))
        .await
    }

    async fn remove_item(
        &self,
        customer_id: CustomerId,
        item_id: CartItemId,
    ) -> Result<Cart, CartError> {
        let url = self.endpoint(&[
            "cart",
            &customer_id.to_string(),
            "items",
            &item_id.to_string(),
        ])?;
        send_json(self.request(Method::DELETE, url)).await
    }

    async fn clear_cart(&self, customer_id: CustomerId) -> Result<(), CartError> {
        let url = self.endpoint(&["cart", &customer_id.to_string(), "clear"])?;
        check_status(self.request(Method::DELETE, url).send().await?).await?;
        Ok(())
    }

    async fn delivery_address(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<AddressId>, CartError> {
        let url = self.endpoint(&["customer", &customer_id.to_string(), "address-id"])?;
        let body: AddressLookupResponse = send_json(self.request(Method::GET, url)).await?;
        Ok(body.address_id)
    }

    async fn checkout(
        &self,
        customer_id: CustomerId,
        request: &CheckoutRequest,
    ) -> Result<CheckoutReceipt, CartError> {
        let url = self.endpoint(&["cart", &customer_id.to_string(), "checkout"])?;
        send_json(self.request(Method::POST, url).json(request)).await
    }

    async fn list_orders(&self, customer_id: CustomerId) -> Result<Vec<OrderSummary>, CartError> {
        let url = self.endpoint(&["orders", "customer", &customer_id.to_string()])?;
        send_json(self.request(Method::GET, url)).await
    }

    async fn order_details(&self, order_id: OrderId) -> Result<OrderDetails, CartError> {
        let url = self.endpoint(&["orders", &order_id.to_string(), "details"])?;
        send_json(self.request(Method::GET, url)).await
    }

    async fn list_restaurants(&self) -> Result<Vec<RestaurantSummary>, CartError> {
        let url = self.endpoint(&["restaurants"])?;
        send_json(self.request(Method::GET, url)).await
    }

    async fn restaurant_menu(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<RestaurantMenu, CartError> {
        let url = self.endpoint(&["restaurants", &restaurant_id.to_string()])?;
        send_json(self.request(Method::GET, url)).await
    }
}
