//! # Session
//!
//! Parses session lines into commands, keeps track of the current page and
//! dispatches to [`crate::commands`].
//!
//! ## Routes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   home ─────────────► Route::Home                                       │
//! │   category <id> ────► id a positive integer? ──yes──► Route::Category   │
//! │                                  │ no                                   │
//! │                                  └──────────────────► Route::Home       │
//! │   cart ─────────────► Route::Cart                                       │
//! │                                                                         │
//! │   add / set / inc / dec / remove / clear ──► cart commands, route kept │
//! │   reload ──► reload + re-price, current page re-rendered               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use strato_core::validation::parse_id;
use strato_core::{CategoryId, ServiceId, ValidationError};
use strato_data::CatalogLoader;

use crate::commands::{cart, catalog, history};
use crate::error::{ApiError, ErrorCode};
use crate::state::{AppConfig, CartState, CatalogState};
use crate::view;

// =============================================================================
// Routes
// =============================================================================

/// The page the session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    Category(CategoryId),
    Cart,
}

impl Route {
    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home - Service Categories",
            Route::Category(_) => "Services",
            Route::Cart => "My Cart",
        }
    }

    /// Route for a raw category parameter. Anything that is not a positive
    /// integer redirects home.
    pub fn category(raw: &str) -> Route {
        match parse_id(raw, "category id") {
            Ok(id) => Route::Category(id),
            Err(err) => {
                debug!(raw, error = %err, "Invalid category id, redirecting home");
                Route::Home
            }
        }
    }
}

// =============================================================================
// Commands
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Home,
    Category(Route),
    Cart,
    Add { service_id: ServiceId, quantity: Option<i64> },
    Set { service_id: ServiceId, quantity: i64 },
    Increase(ServiceId),
    Decrease(ServiceId),
    Remove(ServiceId),
    Clear,
    Reload,
    Orders(i64),
    Help,
    Quit,
}

impl SessionCommand {
    /// Parses one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<SessionCommand>, ApiError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match (name.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("home", []) => SessionCommand::Home,
            ("category", [raw]) => SessionCommand::Category(Route::category(raw)),
            ("category", []) => SessionCommand::Category(Route::Home),
            ("cart", []) => SessionCommand::Cart,
            ("add", [id]) => SessionCommand::Add {
                service_id: parse_id(id, "service id")?,
                quantity: None,
            },
            ("add", [id, qty]) => SessionCommand::Add {
                service_id: parse_id(id, "service id")?,
                quantity: Some(parse_id(qty, "quantity")?),
            },
            ("set", [id, qty]) => SessionCommand::Set {
                service_id: parse_id(id, "service id")?,
                quantity: parse_quantity(qty)?,
            },
            ("inc", [id]) => SessionCommand::Increase(parse_id(id, "service id")?),
            ("dec", [id]) => SessionCommand::Decrease(parse_id(id, "service id")?),
            ("remove", [id]) => SessionCommand::Remove(parse_id(id, "service id")?),
            ("clear", []) => SessionCommand::Clear,
            ("reload", []) => SessionCommand::Reload,
            ("orders", [id]) => SessionCommand::Orders(parse_id(id, "user id")?),
            ("help", _) | ("?", _) => SessionCommand::Help,
            ("quit", []) | ("exit", []) => SessionCommand::Quit,
            (other, _) => {
                return Err(ApiError::validation(format!(
                    "Unknown command or wrong arguments: '{}' (type `help`)",
                    other
                )))
            }
        };
        Ok(Some(command))
    }
}

/// Any integer; zero and negatives are allowed because they mean removal.
fn parse_quantity(raw: &str) -> Result<i64, ValidationError> {
    raw.parse().map_err(|_| ValidationError::InvalidFormat {
        field: "quantity".to_string(),
        reason: format!("'{}' is not a number", raw),
    })
}

// =============================================================================
// Session
// =============================================================================

/// Result of executing one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Output(String),
    Quit,
}

pub struct Session {
    config: AppConfig,
    loader: CatalogLoader,
    catalog: CatalogState,
    cart: CartState,
    route: Route,
}

impl Session {
    pub fn new(config: AppConfig, loader: CatalogLoader) -> Self {
        Session {
            config,
            loader,
            catalog: CatalogState::new(),
            cart: CartState::new(),
            route: Route::Home,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn cart(&self) -> &CartState {
        &self.cart
    }

    pub fn catalog(&self) -> &CatalogState {
        &self.catalog
    }

    /// Loads the catalog and renders the landing page.
    pub async fn start(&mut self) -> String {
        let summary = catalog::reload_catalog(&self.loader, &self.catalog, &self.cart).await;
        let mut out = String::new();
        if !summary.errors.is_empty() {
            out.push_str(&view::render_reload(&summary));
        }
        out.push_str(&self.render_route());
        out
    }

    /// Executes one input line. Errors are rendered, never returned.
    pub async fn execute(&mut self, line: &str) -> Outcome {
        let command = match SessionCommand::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Outcome::Output(String::new()),
            Err(err) => return Outcome::Output(render_error(&err)),
        };

        if command == SessionCommand::Quit {
            return Outcome::Quit;
        }

        match self.dispatch(command).await {
            Ok(text) => Outcome::Output(text),
            Err(err) => Outcome::Output(render_error(&err)),
        }
    }

    async fn dispatch(&mut self, command: SessionCommand) -> Result<String, ApiError> {
        debug!(?command, "Session command");

        match command {
            SessionCommand::Home => self.navigate(Route::Home),
            SessionCommand::Category(route) => self.navigate(route),
            SessionCommand::Cart => self.navigate(Route::Cart),
            SessionCommand::Add { service_id, quantity } => {
                let snapshot = cart::add_to_cart(&self.catalog, &self.cart, service_id, quantity)?;
                Ok(view::render_cart_summary(&snapshot, &self.config))
            }
            SessionCommand::Set { service_id, quantity } => {
                let snapshot =
                    cart::update_cart_item(&self.catalog, &self.cart, service_id, quantity)?;
                Ok(view::render_cart_summary(&snapshot, &self.config))
            }
            SessionCommand::Increase(service_id) => {
                let snapshot = cart::increase_cart_item(&self.catalog, &self.cart, service_id)?;
                Ok(view::render_cart_summary(&snapshot, &self.config))
            }
            SessionCommand::Decrease(service_id) => {
                let snapshot = cart::decrease_cart_item(&self.catalog, &self.cart, service_id)?;
                Ok(view::render_cart_summary(&snapshot, &self.config))
            }
            SessionCommand::Remove(service_id) => {
                let snapshot = cart::remove_from_cart(&self.cart, service_id)?;
                Ok(view::render_cart_summary(&snapshot, &self.config))
            }
            SessionCommand::Clear => {
                let snapshot = cart::clear_cart(&self.cart);
                Ok(view::render_cart_summary(&snapshot, &self.config))
            }
            SessionCommand::Reload => {
                let summary =
                    catalog::reload_catalog(&self.loader, &self.catalog, &self.cart).await;
                let mut out = view::render_reload(&summary);
                out.push_str(&self.render_route());
                Ok(out)
            }
            SessionCommand::Orders(user_id) => {
                let history =
                    history::get_order_history(&self.loader, &self.catalog, user_id).await?;
                Ok(view::render_orders(&history, &self.config))
            }
            SessionCommand::Help => Ok(view::render_help()),
            SessionCommand::Quit => Ok(String::new()),
        }
    }

    fn navigate(&mut self, route: Route) -> Result<String, ApiError> {
        self.route = route;
        Ok(self.render_route())
    }

    /// Renders the current page.
    pub fn render_route(&self) -> String {
        match self.route {
            Route::Home => view::render_home(
                &catalog::list_categories(&self.catalog),
                &catalog::catalog_status(&self.catalog),
            ),
            Route::Category(id) => match catalog::get_category(&self.catalog, &self.cart, id) {
                Ok(page) => view::render_category(&page, &self.config),
                Err(err) if err.code == ErrorCode::NotFound => view::render_category_missing(id),
                Err(err) => render_error(&err),
            },
            Route::Cart => view::render_cart(&cart::get_cart(&self.cart), &self.config),
        }
    }
}

fn render_error(err: &ApiError) -> String {
    format!("error {}\n", err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strato_data::DirSource;

    const SERVICES: &str = r#"{
        "categories": [
            { "id": 1, "name": "Cloud", "services": [
                { "id": 10, "name": "Backup", "description": "Nightly backups", "price": 50 },
                { "id": 11, "name": "Storage", "description": "Object storage", "price": 20 }
            ] }
        ]
    }"#;

    const RULES: &str = r#"{
        "rules": [
            { "service": "Backup", "discount": 0.1 },
            { "service": "Backup", "discount": 5, "type": "fixed", "minQuantity": 3 }
        ]
    }"#;

    async fn session() -> (tempfile::TempDir, Session) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("services.json"), SERVICES).unwrap();
        std::fs::write(dir.path().join("pricerules.json"), RULES).unwrap();

        let loader = CatalogLoader::new(DirSource::new(dir.path()));
        let mut session = Session::new(AppConfig::default(), loader);
        session.start().await;
        (dir, session)
    }

    fn output(outcome: Outcome) -> String {
        match outcome {
            Outcome::Output(text) => text,
            Outcome::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(SessionCommand::parse("   ").unwrap(), None);
        assert_eq!(
            SessionCommand::parse("add 10").unwrap(),
            Some(SessionCommand::Add { service_id: 10, quantity: None })
        );
        assert_eq!(
            SessionCommand::parse("ADD 10 3").unwrap(),
            Some(SessionCommand::Add { service_id: 10, quantity: Some(3) })
        );
        assert_eq!(
            SessionCommand::parse("set 10 0").unwrap(),
            Some(SessionCommand::Set { service_id: 10, quantity: 0 })
        );
        assert_eq!(SessionCommand::parse("quit").unwrap(), Some(SessionCommand::Quit));

        assert!(SessionCommand::parse("add ten").is_err());
        assert!(SessionCommand::parse("add 10 0").is_err());
        assert!(SessionCommand::parse("set 10 many").is_err());
        assert!(SessionCommand::parse("checkout").is_err());
    }

    #[test]
    fn test_invalid_category_redirects_home() {
        assert_eq!(Route::category("2"), Route::Category(2));
        assert_eq!(Route::category("0"), Route::Home);
        assert_eq!(Route::category("-1"), Route::Home);
        assert_eq!(Route::category("cloud"), Route::Home);
    }

    #[tokio::test]
    async fn test_browse_and_buy() {
        let (_dir, mut session) = session().await;
        assert_eq!(session.route(), Route::Home);

        let page = output(session.execute("category 1").await);
        assert_eq!(session.route(), Route::Category(1));
        assert!(page.contains("Backup"));

        let summary = output(session.execute("add 10 3").await);
        assert!(summary.contains("3 item(s)"));
        assert!(summary.contains("total $135.00"));

        let cart = output(session.execute("cart").await);
        assert_eq!(session.route(), Route::Cart);
        assert!(cart.contains("My Cart - Stratocore Services"));
        assert!(cart.contains("rule: $5.00 off (min 3)"));

        output(session.execute("set 10 0").await);
        assert!(session.cart().snapshot().lines.is_empty());
    }

    #[tokio::test]
    async fn test_bad_category_param_goes_home() {
        let (_dir, mut session) = session().await;
        session.execute("category 1").await;

        let page = output(session.execute("category abc").await);
        assert_eq!(session.route(), Route::Home);
        assert!(page.contains("[1] Cloud"));
    }

    #[tokio::test]
    async fn test_unknown_category_page() {
        let (_dir, mut session) = session().await;
        let page = output(session.execute("category 42").await);
        assert_eq!(session.route(), Route::Category(42));
        assert!(page.contains("Category 42 not found."));
    }

    #[tokio::test]
    async fn test_errors_are_rendered() {
        let (_dir, mut session) = session().await;
        let text = output(session.execute("add 404").await);
        assert!(text.starts_with("error [NOT_FOUND]"));

        let text = output(session.execute("inc 10").await);
        assert!(text.starts_with("error [NOT_FOUND]"));
    }

    #[tokio::test]
    async fn test_quit() {
        let (_dir, mut session) = session().await;
        assert_eq!(session.execute("exit").await, Outcome::Quit);
    }
}
