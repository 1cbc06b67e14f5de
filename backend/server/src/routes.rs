use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::{
    analytics::TOP_N,
    error::AppError,
    filters::{DateRange, FilterOptions, OrderFilter, filter_options},
    report::{Dashboard, build_dashboard},
    state::AppState,
};

/// List parameters are comma-separated, e.g. `statuses=entregue,cancelado`.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub categories: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub restaurants: Option<String>,
    pub statuses: Option<String>,
    pub top: Option<usize>,
}

impl DashboardQuery {
    pub fn filter(&self) -> Result<OrderFilter, AppError> {
        Ok(OrderFilter {
            categories: split_list(self.categories.as_deref()),
            dates: DateRange::new(self.start, self.end)?,
            restaurants: split_list(self.restaurants.as_deref()),
            statuses: split_list(self.statuses.as_deref()),
        })
    }
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn filters_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FilterOptions>, AppError> {
    let tables = state.snapshot().await?;

    Ok(Json(filter_options(&tables.orders(), &tables.restaurants())))
}

pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Dashboard>, AppError> {
    let filter = query.filter()?;
    debug!("Dashboard requested with {filter:?}");

    let tables = state.snapshot().await?;

    Ok(Json(build_dashboard(
        &tables,
        &filter,
        query.top.unwrap_or(TOP_N),
    )))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{DashboardQuery, split_list};
    use crate::error::AppError;

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(Some("pizza, japonesa,,")), ["pizza", "japonesa"]);
        assert!(split_list(Some(" , ")).is_empty());
        assert!(split_list(None).is_empty());
    }

    #[test]
    fn test_query_to_filter() {
        let query = DashboardQuery {
            statuses: Some("entregue".to_string()),
            start: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..DashboardQuery::default()
        };

        let filter = query.filter().unwrap();

        assert_eq!(filter.statuses, ["entregue"]);
        assert!(filter.categories.is_empty());
        assert_eq!(filter.dates.end, None);
    }

    #[test]
    fn test_inverted_dates_rejected() {
        let query = DashboardQuery {
            start: NaiveDate::from_ymd_opt(2024, 3, 1),
            end: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..DashboardQuery::default()
        };

        assert!(matches!(query.filter(), Err(AppError::InvalidQuery(_))));
    }
}
