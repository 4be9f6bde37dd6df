//! Terminal stand-ins for the cart view: prompts on stdin, output on stdout/stderr.

use std::io::{self, BufRead, Write};

use client_core::{NoteEdit, UserPrompt};
use rust_decimal::Decimal;
use shared::protocol::{Cart, OrderDetails, OrderSummary, RestaurantMenu, RestaurantSummary};

pub struct TerminalPrompt {
    pub assume_yes: bool,
}

impl UserPrompt for TerminalPrompt {
    fn confirm(&self, question: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        let mut stderr = io::stderr().lock();
        let _ = write!(stderr, "{question} [y/N] ");
        let _ = stderr.flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_yes(&answer)
    }

    fn alert(&self, message: &str) {
        eprintln!("error: {message}");
    }

    fn notify(&self, message: &str) {
        println!("{message}");
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn euros(amount: Decimal) -> String {
    format!("€{:.2}", amount)
}

pub fn render_cart(out: &mut impl Write, cart: &Cart, note_edit: &NoteEdit) -> io::Result<()> {
    if cart.is_empty() {
        return writeln!(out, "Your cart is empty.");
    }

    writeln!(
        out,
        "Restaurant: {}",
        cart.restaurant_name.as_deref().unwrap_or("not assigned")
    )?;
    for item in &cart.items {
        writeln!(
            out,
            "  [{}] {} x{} @ {} = {}",
            item.item_id,
            item.name,
            item.quantity,
            euros(item.unit_price),
            euros(item.line_total)
        )?;
        if !item.description.is_empty() {
            writeln!(out, "      {}", item.description)?;
        }
        match note_edit {
            NoteEdit::Editing { item_id, draft } if *item_id == item.item_id => {
                writeln!(out, "      note (editing): {draft}")?;
            }
            _ => match item.note.as_deref().filter(|note| !note.is_empty()) {
                Some(note) => writeln!(out, "      note: {note}")?,
                None => writeln!(out, "      no special requests")?,
            },
        }
    }
    writeln!(
        out,
        "Total: {} ({} items)",
        euros(cart.display_subtotal()),
        cart.display_item_count()
    )
}

pub fn render_orders(out: &mut impl Write, orders: &[OrderSummary]) -> io::Result<()> {
    if orders.is_empty() {
        return writeln!(out, "No completed orders found.");
    }

    for order in orders {
        let ordered_at = order
            .ordered_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        let total = order.total.map(euros).unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "  #{:<6} {:<10} {:<16} {:<20} {}",
            order.order_id,
            order.status.label(),
            ordered_at,
            order.restaurant_name.as_deref().unwrap_or("-"),
            total
        )?;
    }
    Ok(())
}

pub fn render_order_details(out: &mut impl Write, details: &OrderDetails) -> io::Result<()> {
    writeln!(out, "Order #{} ({})", details.order_id, details.status.label())?;
    if let Some(restaurant) = &details.restaurant_name {
        writeln!(out, "Restaurant: {restaurant}")?;
    }
    if let Some(address) = &details.delivery_address {
        writeln!(out, "Delivered to: {address}")?;
    }
    if let Some(supplier) = &details.supplier_name {
        writeln!(out, "Courier: {supplier}")?;
    }
    for line in &details.lines {
        writeln!(
            out,
            "  {} x{} @ {} = {}",
            line.dish_name,
            line.quantity,
            euros(line.unit_price),
            euros(line.line_total)
        )?;
        if let Some(note) = line.note.as_deref().filter(|note| !note.is_empty()) {
            writeln!(out, "      note: {note}")?;
        }
    }
    match details.total {
        Some(total) => writeln!(out, "Total: {}", euros(total)),
        None => Ok(()),
    }
}

pub fn render_restaurants(
    out: &mut impl Write,
    restaurants: &[RestaurantSummary],
) -> io::Result<()> {
    if restaurants.is_empty() {
        return writeln!(out, "No restaurants found.");
    }

    for restaurant in restaurants {
        match &restaurant.classification {
            Some(classification) => writeln!(
                out,
                "  [{}] {} ({classification})",
                restaurant.restaurant_id, restaurant.name
            )?,
            None => writeln!(out, "  [{}] {}", restaurant.restaurant_id, restaurant.name)?,
        }
    }
    Ok(())
}

pub fn render_menu(out: &mut impl Write, menu: &RestaurantMenu) -> io::Result<()> {
    writeln!(out, "Menu of {} [{}]", menu.name, menu.restaurant_id)?;
    if menu.dishes.is_empty() {
        return writeln!(out, "  no dishes available");
    }

    for dish in &menu.dishes {
        writeln!(
            out,
            "  dish {} / price {}: {} {}",
            dish.dish_id,
            dish.price_id,
            dish.name,
            euros(dish.price)
        )?;
        if !dish.description.is_empty() {
            writeln!(out, "      {}", dish.description)?;
        }
    }
    Ok(())
}
