//! # Views
//!
//! Plain-text rendering of command results. Pure functions: data in, text
//! out, amounts formatted through [`AppConfig::format_currency`].

use std::fmt::Write;

use strato_core::{Discount, Money, PricingRule};

use crate::commands::catalog::{CatalogStatus, CategorySummary, CategoryView, ReloadSummary};
use crate::commands::history::OrderHistory;
use crate::session::Route;
use crate::state::{AppConfig, CartSnapshot};

const APP_NAME: &str = "Stratocore Services";

/// Page title for a route, e.g. `My Cart - Stratocore Services`.
pub fn title(route: &Route) -> String {
    format!("{} - {}", route.title(), APP_NAME)
}

fn heading(out: &mut String, route: &Route) {
    let _ = writeln!(out, "== {} ==", title(route));
}

fn money(config: &AppConfig, amount: Money) -> String {
    config.format_currency(amount.cents())
}

pub fn render_home(categories: &[CategorySummary], status: &CatalogStatus) -> String {
    let mut out = String::new();
    heading(&mut out, &Route::Home);

    if let Some(error) = &status.last_error {
        let _ = writeln!(out, "! Could not load catalog data: {}", error);
    }

    if categories.is_empty() {
        let _ = writeln!(out, "No categories available.");
        return out;
    }

    for category in categories {
        let _ = writeln!(
            out,
            "  [{}] {} ({} services)",
            category.id, category.name, category.service_count
        );
    }
    let _ = writeln!(out, "Type `category <id>` to browse a category.");
    out
}

pub fn render_category(view: &CategoryView, config: &AppConfig) -> String {
    let mut out = String::new();
    heading(&mut out, &Route::Category(view.id));
    let _ = writeln!(out, "{}", view.name);

    if view.services.is_empty() {
        let _ = writeln!(out, "  No services in this category.");
    }

    for service in &view.services {
        let _ = write!(
            out,
            "  #{:<4} {:<32} {:>12}",
            service.id,
            service.name,
            money(config, service.price)
        );
        if service.in_cart > 0 {
            let _ = write!(out, "  [in cart: {}]", service.in_cart);
        }
        let _ = writeln!(out);
        if !service.description.is_empty() {
            let _ = writeln!(out, "         {}", service.description);
        }
    }
    let _ = writeln!(out, "Type `add <service-id> [qty]` to add to your cart.");
    out
}

pub fn render_category_missing(category_id: i64) -> String {
    let mut out = String::new();
    heading(&mut out, &Route::Category(category_id));
    let _ = writeln!(out, "Category {} not found.", category_id);
    out
}

fn describe_rule(rule: &PricingRule, config: &AppConfig) -> String {
    let discount = match rule.discount {
        Discount::Percentage(rate) => format!("{}% off", rate.percentage()),
        Discount::Fixed(amount) => format!("{} off", money(config, amount)),
        Discount::BuyOneGetOne(rate) => format!("{}% off from 2 units", rate.percentage()),
    };
    match rule.min_quantity {
        Some(min) => format!("{} (min {})", discount, min),
        None => discount,
    }
}

pub fn render_cart(snapshot: &CartSnapshot, config: &AppConfig) -> String {
    let mut out = String::new();
    heading(&mut out, &Route::Cart);

    if snapshot.lines.is_empty() {
        let _ = writeln!(out, "Your cart is empty.");
        return out;
    }

    for line in &snapshot.lines {
        let unit = match line.discounted_price {
            Some(discounted) => format!(
                "{} -> {}",
                money(config, line.original_price),
                money(config, discounted)
            ),
            None => money(config, line.original_price),
        };
        let _ = writeln!(
            out,
            "  #{:<4} {:<28} x{:<4} {:>22}  = {}",
            line.service.id,
            line.service.name,
            line.quantity,
            unit,
            money(config, line.line_total())
        );
        for rule in &line.applied_rules {
            let _ = writeln!(out, "         rule: {}", describe_rule(rule, config));
        }
    }

    let totals = &snapshot.totals;
    let _ = writeln!(out, "  {}", "-".repeat(60));
    let _ = writeln!(out, "  Items:     {}", totals.items_count);
    let _ = writeln!(out, "  Original:  {}", money(config, totals.total_original_price));
    if !totals.total_savings.is_zero() {
        let _ = writeln!(out, "  Savings:   {}", money(config, totals.total_savings));
    }
    let _ = writeln!(out, "  Total:     {}", money(config, totals.total_discounted_price));
    out
}

/// One-line cart summary printed after a mutation.
pub fn render_cart_summary(snapshot: &CartSnapshot, config: &AppConfig) -> String {
    let totals = &snapshot.totals;
    format!(
        "Cart: {} item(s), total {} (saved {})\n",
        totals.items_count,
        money(config, totals.total_discounted_price),
        money(config, totals.total_savings)
    )
}

pub fn render_reload(summary: &ReloadSummary) -> String {
    let mut out = String::new();
    let count = |n: Option<usize>| n.map_or("failed".to_string(), |n| n.to_string());
    let _ = writeln!(
        out,
        "Catalog reloaded: categories {}, rules {}",
        count(summary.categories),
        count(summary.rules)
    );
    for error in &summary.errors {
        let _ = writeln!(out, "! {}", error);
    }
    out
}

pub fn render_orders(history: &OrderHistory, config: &AppConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Orders of {} <{}>",
        history.user.username, history.user.email
    );

    if history.orders.is_empty() {
        let _ = writeln!(out, "  No orders yet.");
        return out;
    }

    for order in &history.orders {
        let total = order
            .total
            .map_or_else(|| "-".to_string(), |total| money(config, total));
        let _ = writeln!(out, "  {}  {}  {}", order.order_id, order.date, total);
        for line in &order.lines {
            let name = line.service_name.as_deref().unwrap_or("(unknown service)");
            let _ = writeln!(out, "      {} x{} (#{})", name, line.quantity, line.service_id);
        }
    }
    out
}

pub fn render_help() -> String {
    "\
Commands:
  home                      list categories
  category <id>             services of a category
  cart                      show the cart
  add <service-id> [qty]    add units to the cart (default 1)
  set <service-id> <qty>    set a line quantity (0 removes it)
  inc <service-id>          one more unit
  dec <service-id>          one unit less
  remove <service-id>       remove a line
  clear                     empty the cart
  reload                    reload catalog data and re-price the cart
  orders <user-id>          order history of a user
  help                      this text
  quit                      leave
"
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strato_core::{Cart, CatalogStore, Category, Service};

    #[test]
    fn test_titles() {
        assert_eq!(title(&Route::Home), "Home - Service Categories - Stratocore Services");
        assert_eq!(title(&Route::Category(3)), "Services - Stratocore Services");
        assert_eq!(title(&Route::Cart), "My Cart - Stratocore Services");
    }

    #[test]
    fn test_render_cart() {
        let mut store = CatalogStore::new();
        store.replace_categories(vec![Category {
            id: 1,
            name: "Cloud".to_string(),
            services: vec![Service::new(10, "Backup", "Nightly backups", 5000)],
        }]);
        store.replace_rules(vec![PricingRule::for_service("Backup", Discount::percentage(1000))]);

        let mut cart = Cart::new();
        cart.add_item(&store, store.service_by_id(10).unwrap(), 2).unwrap();

        let text = render_cart(&CartSnapshot::from(&cart), &AppConfig::default());
        assert!(text.contains("$50.00 -> $45.00"));
        assert!(text.contains("= $90.00"));
        assert!(text.contains("rule: 10% off"));
        assert!(text.contains("Savings:   $10.00"));
        assert!(text.contains("Total:     $90.00"));
    }

    #[test]
    fn test_render_empty_cart() {
        let text = render_cart(&CartSnapshot::from(&Cart::new()), &AppConfig::default());
        assert!(text.contains("Your cart is empty."));
    }

    #[test]
    fn test_render_home_with_error() {
        let status = CatalogStatus {
            ready: false,
            last_error: Some("HTTP error! status: 404 (services.json)".to_string()),
        };
        let text = render_home(&[], &status);
        assert!(text.contains("Could not load catalog data"));
        assert!(text.contains("No categories available."));
    }
}
