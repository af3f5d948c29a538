use crate::contract::TeaType;
use crate::output::is_quiet;
use crate::tea::Tea;
use crate::ui::theme::StockLevel;
use crate::ui::{Icons, theme};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    println!("{} {}", Icons::TEA, text.style(theme().header));
}

pub fn success(label: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", Icons::CHECK, label.style(theme().success));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn));
}

pub fn info(icon: &str, label: &str, value: &str) {
    println!(
        "{} {}: {}",
        icon.style(theme().info),
        label.style(theme().dim),
        value
    );
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().header));
}

pub fn summary_row(label: &str, value: &str) {
    println!("  {} {}", label.style(theme().dim), value);
}

pub fn tea_added(uri: &str) {
    println!("{} Added {}", Icons::NEW.style(theme().success), uri);
}

pub fn tea_updated(uri: &str, rows: usize) {
    println!("{} Updated {} row(s) at {}", Icons::MOD.style(theme().warn), rows, uri);
}

pub fn tea_deleted(uri: &str, rows: usize) {
    println!("{} Deleted {} row(s) at {}", Icons::DEL.style(theme().error), rows, uri);
}

/// Quantity text, highlighted when empty or below `low_stock`
pub fn quantity_label(quantity: i64, low_stock: i64) -> String {
    match theme().stock(StockLevel::of(quantity, low_stock)) {
        Some(style) => quantity.style(style).to_string(),
        None => quantity.to_string(),
    }
}

pub fn type_label(tea_type: TeaType) -> String {
    tea_type.label().style(theme().tea_type(tea_type)).to_string()
}

pub fn price_label(price: f64) -> String {
    format!("{:.2}", price).style(theme().price).to_string()
}

pub fn stock_change(icon: &str, id: i64, quantity: i64, low_stock: i64) {
    println!(
        "{} Tea {} now has {} in stock",
        icon,
        id,
        quantity_label(quantity, low_stock)
    );
}

pub fn tea_details(tea: &Tea, low_stock: i64) {
    section(&format!("{} {}", Icons::TEA, tea.name));
    summary_row("Id", &tea.id.to_string());
    summary_row("Type", &type_label(tea.tea_type));
    summary_row("Price", &price_label(tea.price));
    summary_row("In stock", &quantity_label(tea.quantity, low_stock));
    summary_row("Image", tea.image.as_deref().unwrap_or("-"));
}
