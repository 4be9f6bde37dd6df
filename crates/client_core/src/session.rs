//! Cart session controller.
//!
//! Holds the last server-confirmed cart for one customer together with the
//! view state around it (note editing, status line). Every mutation is a
//! single request; local state only changes once the server confirmed it.

use rust_decimal::Decimal;
use shared::{
    domain::{AddressId, CartItemId, CustomerId, OrderId, RestaurantId, SupplierId},
    protocol::{
        AddItemRequest, Cart, CheckoutReceipt, CheckoutRequest, OrderDetails, OrderSummary,
        RestaurantMenu, RestaurantSummary,
    },
};
use tracing::{debug, info, warn};

use crate::{
    api::CartApi,
    error::{user_message, CartAction, CartError},
    history,
    prompt::UserPrompt,
};

/// Note-editing state. At most one item is edited at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NoteEdit {
    #[default]
    Viewing,
    Editing { item_id: CartItemId, draft: String },
}

impl NoteEdit {
    pub fn is_editing(&self, item_id: CartItemId) -> bool {
        matches!(self, Self::Editing { item_id: editing, .. } if *editing == item_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Applied,
    Declined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryAddress {
    /// Look up the address stored on the customer profile.
    CustomerDefault,
    Explicit(AddressId),
}

pub struct CartSession<A: CartApi, P: UserPrompt> {
    api: A,
    prompt: P,
    customer_id: CustomerId,
    cart: Option<Cart>,
    note_edit: NoteEdit,
    status: Option<String>,
}

impl<A: CartApi, P: UserPrompt> CartSession<A, P> {
    pub fn new(customer_id: CustomerId, api: A, prompt: P) -> Self {
        Self {
            api,
            prompt,
            customer_id,
            cart: None,
            note_edit: NoteEdit::Viewing,
            status: None,
        }
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn cart(&self) -> Option<&Cart> {
        self.cart.as_ref()
    }

    pub fn note_edit(&self) -> &NoteEdit {
        &self.note_edit
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn display_subtotal(&self) -> Option<Decimal> {
        self.cart.as_ref().map(Cart::display_subtotal)
    }

    pub async fn load_cart(&mut self) -> Result<&Cart, CartError> {
        self.status = Some("Loading cart...".to_string());
        match self.api.fetch_cart(self.customer_id).await {
            Ok(cart) => {
                self.status = None;
                Ok(self.apply(cart))
            }
            Err(err) => {
                warn!(customer_id = %self.customer_id, error = %err, "failed to load cart");
                self.status = Some(user_message(CartAction::LoadCart, &err));
                self.cart = None;
                self.note_edit = NoteEdit::Viewing;
                Err(err)
            }
        }
    }

    pub async fn add_item(&mut self, request: AddItemRequest) -> Result<&Cart, CartError> {
        match self.api.add_item(self.customer_id, &request).await {
            Ok(cart) => {
                info!(customer_id = %self.customer_id, dish_id = %request.dish_id, "added dish to cart");
                Ok(self.apply(cart))
            }
            Err(err) => self.fail(CartAction::AddItem, err),
        }
    }

    pub async fn set_item_quantity(
        &mut self,
        item_id: CartItemId,
        quantity: u32,
    ) -> Result<&Cart, CartError> {
        match self
            .api
            .update_quantity(self.customer_id, item_id, quantity)
            .await
        {
            Ok(cart) => {
                debug!(%item_id, quantity, "quantity updated");
                Ok(self.apply(cart))
            }
            Err(err) => self.fail(CartAction::UpdateQuantity, err),
        }
    }

    /// Step the quantity of an item relative to the local snapshot.
    pub async fn adjust_item_quantity(
        &mut self,
        item_id: CartItemId,
        delta: i32,
    ) -> Result<&Cart, CartError> {
        let Some(current) = self.item_quantity(item_id) else {
            return self.fail(CartAction::UpdateQuantity, CartError::UnknownItem(item_id));
        };
        let target = i64::from(current) + i64::from(delta);
        if target < 1 {
            return self.fail(CartAction::UpdateQuantity, CartError::QuantityBelowMinimum);
        }
        let quantity = u32::try_from(target).unwrap_or(u32::MAX);
        self.set_item_quantity(item_id, quantity).await
    }

    /// Begin editing the note of `item_id`. A pending edit on another item is
    /// dropped without saving.
    pub fn start_note_edit(&mut self, item_id: CartItemId) -> Result<(), CartError> {
        let Some(item) = self.cart.as_ref().and_then(|cart| cart.item(item_id)) else {
            return self.fail(CartAction::EditNote, CartError::UnknownItem(item_id));
        };
        let draft = item.note.clone().unwrap_or_default();

        if let NoteEdit::Editing {
            item_id: previous, ..
        } = &self.note_edit
        {
            if *previous != item_id {
                debug!(%previous, "discarding unsaved note draft");
            }
        }
        self.note_edit = NoteEdit::Editing { item_id, draft };
        Ok(())
    }

    pub fn update_note_draft(&mut self, text: impl Into<String>) -> Result<(), CartError> {
        if let NoteEdit::Editing { draft, .. } = &mut self.note_edit {
            *draft = text.into();
            return Ok(());
        }
        self.fail(CartAction::EditNote, CartError::NotEditing)
    }

    pub fn cancel_note_edit(&mut self) {
        self.note_edit = NoteEdit::Viewing;
    }

    /// Send the draft. The edit stays open when the server rejects it.
    pub async fn save_note(&mut self) -> Result<&Cart, CartError> {
        let (item_id, draft) = match &self.note_edit {
            NoteEdit::Editing { item_id, draft } => (*item_id, draft.clone()),
            NoteEdit::Viewing => return self.fail(CartAction::EditNote, CartError::NotEditing),
        };

        match self
            .api
            .update_note(self.customer_id, item_id, &draft)
            .await
        {
            Ok(cart) => {
                debug!(%item_id, "note saved");
                self.note_edit = NoteEdit::Viewing;
                Ok(self.apply(cart))
            }
            Err(err) => self.fail(CartAction::EditNote, err),
        }
    }

    pub async fn set_item_note(
        &mut self,
        item_id: CartItemId,
        text: impl Into<String>,
    ) -> Result<&Cart, CartError> {
        self.start_note_edit(item_id)?;
        self.update_note_draft(text)?;
        self.save_note().await
    }

    pub async fn remove_item(&mut self, item_id: CartItemId) -> Result<ActionOutcome, CartError> {
        let question = match self.cart.as_ref().and_then(|cart| cart.item(item_id)) {
            Some(item) => format!("Remove {} from the cart?", item.name),
            None => "Remove this item from the cart?".to_string(),
        };
        if !self.prompt.confirm(&question) {
            debug!(%item_id, "item removal declined");
            return Ok(ActionOutcome::Declined);
        }

        match self.api.remove_item(self.customer_id, item_id).await {
            Ok(cart) => {
                info!(customer_id = %self.customer_id, %item_id, "removed item from cart");
                self.apply(cart);
                Ok(ActionOutcome::Applied)
            }
            Err(err) => self.fail(CartAction::RemoveItem, err),
        }
    }

    pub async fn clear_cart(&mut self) -> Result<ActionOutcome, CartError> {
        if !self.prompt.confirm("Empty the cart?") {
            debug!("clearing cart declined");
            return Ok(ActionOutcome::Declined);
        }

        match self.api.clear_cart(self.customer_id).await {
            Ok(()) => {
                info!(customer_id = %self.customer_id, "cleared cart");
                self.cart = Some(Cart::empty());
                self.note_edit = NoteEdit::Viewing;
                Ok(ActionOutcome::Applied)
            }
            Err(err) => self.fail(CartAction::ClearCart, err),
        }
    }

    /// Resolve the delivery address, then submit the order.
    ///
    /// The two calls are not transactional and carry no idempotency key: a
    /// failure after the lookup leaves nothing to undo, and retrying a
    /// checkout whose response got lost may place the order twice.
    pub async fn checkout(
        &mut self,
        address: DeliveryAddress,
        supplier_id: SupplierId,
    ) -> Result<CheckoutReceipt, CartError> {
        let address_id = match address {
            DeliveryAddress::Explicit(address_id) => address_id,
            DeliveryAddress::CustomerDefault => {
                match self.api.delivery_address(self.customer_id).await {
                    Ok(Some(address_id)) => address_id,
                    Ok(None) => {
                        return self.fail(
                            CartAction::Checkout,
                            CartError::MissingAddress(self.customer_id),
                        )
                    }
                    Err(err) => return self.fail(CartAction::Checkout, err),
                }
            }
        };

        let request = CheckoutRequest {
            address_id,
            supplier_id,
        };
        let receipt = match self.api.checkout(self.customer_id, &request).await {
            Ok(receipt) => receipt,
            Err(err) => return self.fail(CartAction::Checkout, err),
        };

        info!(
            customer_id = %self.customer_id,
            order_id = %receipt.order_id,
            %address_id,
            %supplier_id,
            "order placed"
        );
        self.cart = Some(Cart::empty());
        self.note_edit = NoteEdit::Viewing;
        self.prompt
            .notify(&format!("Order placed. Order number: {}", receipt.order_id));
        Ok(receipt)
    }

    pub async fn order_history(&self) -> Result<Vec<OrderSummary>, CartError> {
        match history::load_finished_orders(&self.api, self.customer_id).await {
            Ok(orders) => Ok(orders),
            Err(err) => self.fail(CartAction::LoadOrders, err),
        }
    }

    pub async fn order_details(&self, order_id: OrderId) -> Result<OrderDetails, CartError> {
        match self.api.order_details(order_id).await {
            Ok(details) => Ok(details),
            Err(err) => self.fail(CartAction::LoadOrderDetails, err),
        }
    }

    pub async fn restaurants(&self) -> Result<Vec<RestaurantSummary>, CartError> {
        match self.api.list_restaurants().await {
            Ok(restaurants) => Ok(restaurants),
            Err(err) => self.fail(CartAction::LoadRestaurants, err),
        }
    }

    pub async fn restaurant_menu(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<RestaurantMenu, CartError> {
        match self.api.restaurant_menu(restaurant_id).await {
            Ok(menu) => {
                debug!(%restaurant_id, dishes = menu.dishes.len(), "loaded menu");
                Ok(menu)
            }
            Err(err) => self.fail(CartAction::LoadMenu, err),
        }
    }

    fn item_quantity(&self, item_id: CartItemId) -> Option<u32> {
        self.cart
            .as_ref()
            .and_then(|cart| cart.item(item_id))
            .map(|item| item.quantity)
    }

    /// Replace the snapshot with a server-confirmed cart.
    fn apply(&mut self, cart: Cart) -> &Cart {
        if let NoteEdit::Editing { item_id, .. } = &self.note_edit {
            if cart.item(*item_id).is_none() {
                self.note_edit = NoteEdit::Viewing;
            }
        }
        self.cart.insert(cart)
    }

    fn fail<T>(&self, action: CartAction, err: CartError) -> Result<T, CartError> {
        warn!(
            customer_id = %self.customer_id,
            action = action.name(),
            category = ?err.category(),
            error = %err,
            "cart action failed"
        );
        self.prompt.alert(&user_message(action, &err));
        Err(err)
    }
}
