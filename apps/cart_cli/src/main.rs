use std::{io, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    config::normalize_base_url, load_settings, CartError, CartSession, DeliveryAddress,
    HttpCartApi,
};
use shared::{
    domain::{
        AddressId, CartItemId, CustomerId, DishId, OrderId, PriceId, RestaurantId, SupplierId,
    },
    protocol::AddItemRequest,
};
use tracing_subscriber::EnvFilter;

mod terminal;

use terminal::{
    render_cart, render_menu, render_order_details, render_orders, render_restaurants,
    TerminalPrompt,
};

#[derive(Parser, Debug)]
#[command(name = "cart-cli", about = "Inspect and edit a customer's food-ordering cart")]
struct Args {
    /// Base URL of the ordering API, e.g. http://localhost:8000/api
    #[arg(long)]
    api_url: Option<String>,
    /// Bearer token sent with every request
    #[arg(long)]
    token: Option<String>,
    #[arg(long)]
    customer: Option<i64>,
    /// Answer yes to every confirmation
    #[arg(long, short = 'y')]
    yes: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the current cart
    Show,
    /// Add a dish to the cart
    Add {
        #[arg(long)]
        restaurant: i64,
        #[arg(long)]
        dish: i64,
        #[arg(long)]
        price: i64,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
        #[arg(long)]
        note: Option<String>,
    },
    /// Set the quantity of an item
    Quantity { item: i64, quantity: u32 },
    /// Change the quantity of an item by a step, e.g. 1 or -1
    Adjust {
        item: i64,
        #[arg(allow_hyphen_values = true)]
        delta: i32,
    },
    /// Replace the special-request note of an item
    Note { item: i64, text: String },
    /// Remove an item after confirmation
    Remove { item: i64 },
    /// Empty the cart after confirmation
    Clear,
    /// Place the order
    Checkout {
        /// Deliver here instead of the address on the customer profile
        #[arg(long)]
        address: Option<i64>,
        #[arg(long)]
        supplier: Option<i64>,
    },
    /// List completed and cancelled orders
    Orders,
    /// Show the dishes of one past order
    Order { order: i64 },
    /// List restaurants
    Restaurants,
    /// Show the dishes of a restaurant with the price ids `add` expects
    Menu { restaurant: i64 },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(url) = &args.api_url {
        settings.api_base_url = normalize_base_url(url);
    }
    if let Some(token) = args.token.clone() {
        settings.auth_token = Some(token);
    }
    let customer_id = args
        .customer
        .map(CustomerId)
        .or(settings.customer_id)
        .context("no customer id; pass --customer or set APP__CUSTOMER_ID")?;

    tracing::debug!(%customer_id, api_url = %settings.api_base_url, "starting cart session");

    let api = HttpCartApi::from_settings(&settings).context("failed to build cart api client")?;
    let mut session = CartSession::new(
        customer_id,
        api,
        TerminalPrompt {
            assume_yes: args.yes,
        },
    );

    let browsed = match &args.command {
        Command::Orders => Some(
            session
                .order_history()
                .await
                .map(|orders| render_orders(&mut io::stdout().lock(), &orders)),
        ),
        Command::Order { order } => Some(
            session
                .order_details(OrderId(*order))
                .await
                .map(|details| render_order_details(&mut io::stdout().lock(), &details)),
        ),
        Command::Restaurants => Some(
            session
                .restaurants()
                .await
                .map(|restaurants| render_restaurants(&mut io::stdout().lock(), &restaurants)),
        ),
        Command::Menu { restaurant } => Some(
            session
                .restaurant_menu(RestaurantId(*restaurant))
                .await
                .map(|menu| render_menu(&mut io::stdout().lock(), &menu)),
        ),
        _ => None,
    };
    if let Some(result) = browsed {
        return match result {
            Ok(rendered) => {
                rendered?;
                Ok(ExitCode::SUCCESS)
            }
            Err(_) => Ok(ExitCode::FAILURE),
        };
    }

    if session.load_cart().await.is_err() {
        eprintln!("{}", session.status().unwrap_or("Could not load the cart"));
        return Ok(ExitCode::FAILURE);
    }

    let outcome = run(&mut session, args.command, settings.supplier_id).await;

    if let Some(cart) = session.cart() {
        render_cart(&mut io::stdout().lock(), cart, session.note_edit())?;
    }
    Ok(match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    })
}

async fn run(
    session: &mut CartSession<HttpCartApi, TerminalPrompt>,
    command: Command,
    default_supplier: SupplierId,
) -> Result<(), CartError> {
    match command {
        Command::Show
        | Command::Orders
        | Command::Order { .. }
        | Command::Restaurants
        | Command::Menu { .. } => Ok(()),
        Command::Add {
            restaurant,
            dish,
            price,
            quantity,
            note,
        } => session
            .add_item(AddItemRequest {
                restaurant_id: RestaurantId(restaurant),
                dish_id: DishId(dish),
                price_id: PriceId(price),
                quantity,
                note,
            })
            .await
            .map(|_| ()),
        Command::Quantity { item, quantity } => session
            .set_item_quantity(CartItemId(item), quantity)
            .await
            .map(|_| ()),
        Command::Adjust { item, delta } => session
            .adjust_item_quantity(CartItemId(item), delta)
            .await
            .map(|_| ()),
        Command::Note { item, text } => session
            .set_item_note(CartItemId(item), text)
            .await
            .map(|_| ()),
        Command::Remove { item } => session.remove_item(CartItemId(item)).await.map(|_| ()),
        Command::Clear => session.clear_cart().await.map(|_| ()),
        Command::Checkout { address, supplier } => {
            let address = address
                .map(|id| DeliveryAddress::Explicit(AddressId(id)))
                .unwrap_or(DeliveryAddress::CustomerDefault);
            let supplier_id = supplier.map(SupplierId).unwrap_or(default_supplier);
            session.checkout(address, supplier_id).await.map(|_| ())
        }
    }
}
