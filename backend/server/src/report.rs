//! # Dashboard
//!
//! One request, one pass over the snapshot: filter the orders, run every aggregation, and wrap each part
//! in a [`Section`] so the client can tell chart data from a placeholder.
//!
//! Reviews and dishes are not narrowed by the order filters.
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use warehouse::{
    Tables,
    models::{Order, Restaurant},
};

use crate::{
    analytics::{
        DailyPoint, DishPrice, HistogramBin, MonthlyScore, OrderSummary, Revenue, ReviewSummary,
        StatusCount, WeekdayCount, daily_series, monthly_average_score, order_summary,
        orders_by_weekday, price_histogram, revenue_by_category, review_summary, score_histogram,
        status_distribution, top_dishes_by_price, top_restaurants_by_revenue,
    },
    filters::OrderFilter,
};

pub const NO_ORDERS: &str = "No orders found for the selected filters.";
pub const NO_RESTAURANTS: &str = "No restaurant data found for performance analysis.";
pub const NO_CATEGORIES: &str = "Category data is not available for analysis.";
pub const NO_REVIEWS: &str = "No review data found.";
pub const NO_DISHES: &str = "No dish data found.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Section<T> {
    Ready { data: T },
    Info { message: String },
    Warning { message: String },
}

impl<T> Section<T> {
    pub fn info(message: &str) -> Self {
        Section::Info {
            message: message.to_string(),
        }
    }

    pub fn warning(message: &str) -> Self {
        Section::Warning {
            message: message.to_string(),
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Section::Ready { data } => Some(data),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Section::Ready { .. } => None,
            Section::Info { message } | Section::Warning { message } => Some(message.as_str()),
        }
    }
}

impl<T> From<T> for Section<T> {
    fn from(data: T) -> Self {
        Section::Ready { data }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderOverview {
    pub summary: OrderSummary,
    pub statuses: Vec<StatusCount>,
    pub weekdays: Vec<WeekdayCount>,
    pub daily: Vec<DailyPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantPerformance {
    pub top_by_revenue: Vec<Revenue>,
    pub revenue_by_category: Section<Vec<Revenue>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewOverview {
    pub summary: ReviewSummary,
    pub score_histogram: Vec<HistogramBin>,
    pub monthly_scores: Vec<MonthlyScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DishOverview {
    pub price_histogram: Vec<HistogramBin>,
    pub top_by_price: Vec<DishPrice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub generated_at: DateTime<Utc>,
    pub collections: BTreeMap<&'static str, usize>,
    pub orders: Section<OrderOverview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurants: Option<Section<RestaurantPerformance>>,
    pub reviews: Section<ReviewOverview>,
    pub dishes: Section<DishOverview>,
}

pub fn build_dashboard(tables: &Tables, filter: &OrderFilter, top: usize) -> Dashboard {
    let restaurants = tables.restaurants();
    let orders = filter.apply(tables.orders(), &restaurants);
    let reviews = tables.reviews();
    let dishes = tables.dishes();

    Dashboard {
        generated_at: Utc::now(),
        collections: tables
            .counts()
            .into_iter()
            .map(|(collection, count)| (collection.name(), count))
            .collect(),
        orders: order_section(&orders),
        restaurants: restaurant_section(&orders, &restaurants, top),
        reviews: if reviews.is_empty() {
            Section::warning(NO_REVIEWS)
        } else {
            ReviewOverview {
                summary: review_summary(&reviews),
                score_histogram: score_histogram(&reviews),
                monthly_scores: monthly_average_score(&reviews),
            }
            .into()
        },
        dishes: if dishes.is_empty() {
            Section::warning(NO_DISHES)
        } else {
            DishOverview {
                price_histogram: price_histogram(&dishes),
                top_by_price: top_dishes_by_price(&dishes, top),
            }
            .into()
        },
    }
}

fn order_section(orders: &[Order]) -> Section<OrderOverview> {
    if orders.is_empty() {
        return Section::warning(NO_ORDERS);
    }

    OrderOverview {
        summary: order_summary(orders),
        statuses: status_distribution(orders),
        weekdays: orders_by_weekday(orders),
        daily: daily_series(orders),
    }
    .into()
}

/// `None` when there are no orders, the order section already says so.
fn restaurant_section(
    orders: &[Order],
    restaurants: &[Restaurant],
    top: usize,
) -> Option<Section<RestaurantPerformance>> {
    if orders.is_empty() {
        return None;
    }

    if restaurants.is_empty() {
        return Some(Section::warning(NO_RESTAURANTS));
    }

    let revenue_by_category = match revenue_by_category(orders, restaurants) {
        Some(categories) => categories.into(),
        None => Section::info(NO_CATEGORIES),
    };

    Some(
        RestaurantPerformance {
            top_by_revenue: top_restaurants_by_revenue(orders, restaurants, top),
            revenue_by_category,
        }
        .into(),
    )
}
