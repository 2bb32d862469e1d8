//! # Order History Commands
//!
//! Read-only view of a user's past orders. Users and orders are fetched on
//! demand; service names are resolved against the loaded catalog.

use serde::Serialize;
use tracing::debug;

use strato_core::{Money, Order, ServiceId, User};
use strato_data::CatalogLoader;

use crate::error::ApiError;
use crate::state::CatalogState;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineView {
    pub service_id: ServiceId,

    /// `None` when the service is no longer in the catalog.
    pub service_name: Option<String>,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub order_id: String,
    pub date: String,
    pub lines: Vec<OrderLineView>,
    pub total: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderHistory {
    pub user: User,
    pub orders: Vec<OrderView>,
}

/// Gets a user and their orders, in dataset order.
pub async fn get_order_history(
    loader: &CatalogLoader,
    catalog: &CatalogState,
    user_id: i64,
) -> Result<OrderHistory, ApiError> {
    debug!(user_id, "get_order_history command");

    let (user, orders) = tokio::join!(
        loader.fetch_user_by_id(user_id),
        loader.fetch_orders_for_user(user_id)
    );
    let user = user?.ok_or_else(|| ApiError::not_found("User", user_id))?;
    let orders = orders?;

    let orders = catalog.with_catalog(|store| {
        orders
            .into_iter()
            .map(|order: Order| OrderView {
                lines: order
                    .services
                    .iter()
                    .map(|line| OrderLineView {
                        service_id: line.service_id,
                        service_name: store.service_by_id(line.service_id).map(|s| s.name.clone()),
                        quantity: line.quantity,
                    })
                    .collect(),
                total: order.total(),
                order_id: order.order_id,
                date: order.date,
            })
            .collect()
    });

    Ok(OrderHistory { user, orders })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use strato_core::{CatalogStore, Category, Service};
    use strato_data::DirSource;

    fn fixture() -> (tempfile::TempDir, CatalogLoader, CatalogState) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("user.json"),
            r#"{"users":[{"id":1,"username":"ada","email":"ada@example.com"}]}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("orders.json"),
            r#"{"orderHistory":[
                {"orderId":"A-1","userId":1,"date":"2024-05-01",
                 "services":[{"serviceId":10,"quantity":2},{"serviceId":77,"quantity":1}],
                 "totalAmount":119.5},
                {"orderId":"B-1","userId":2,"date":"2024-05-02","services":[]}
            ]}"#,
        )
        .unwrap();

        let mut store = CatalogStore::new();
        store.replace_categories(vec![Category {
            id: 1,
            name: "Cloud".to_string(),
            services: vec![Service::new(10, "Backup", "Nightly backups", 5000)],
        }]);

        let loader = CatalogLoader::new(DirSource::new(dir.path()));
        (dir, loader, CatalogState::from_store(store))
    }

    #[tokio::test]
    async fn test_history_for_user() {
        let (_dir, loader, catalog) = fixture();

        let history = get_order_history(&loader, &catalog, 1).await.unwrap();
        assert_eq!(history.user.username, "ada");
        assert_eq!(history.orders.len(), 1);

        let order = &history.orders[0];
        assert_eq!(order.total, Some(Money::from_cents(11_950)));
        assert_eq!(order.lines[0].service_name.as_deref(), Some("Backup"));
        assert_eq!(order.lines[1].service_name, None);
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let (_dir, loader, catalog) = fixture();
        let err = get_order_history(&loader, &catalog, 5).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_missing_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let loader = CatalogLoader::new(DirSource::new(dir.path()));
        let err = get_order_history(&loader, &CatalogState::new(), 1)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::LoadFailed);
    }
}
