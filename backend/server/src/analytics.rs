//! # Analytics
//!
//! Pure reductions over filtered records. Nothing here touches the store or the cache.
//!
//! Division is guarded everywhere: a zero denominator yields zero. Missing monetary values count as zero
//! in sums, missing scores and prices are skipped.
use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use warehouse::models::{Dish, Order, Restaurant, Review};

pub const TOP_N: usize = 10;
pub const SCORE_BINS: usize = 5;
pub const PRICE_BINS: usize = 20;
pub const POSITIVE_SCORE: f64 = 4.0;

const WEEKDAYS: [(&str, &str); 7] = [
    ("Monday", "Segunda"),
    ("Tuesday", "Terça"),
    ("Wednesday", "Quarta"),
    ("Thursday", "Quinta"),
    ("Friday", "Sexta"),
    ("Saturday", "Sábado"),
    ("Sunday", "Domingo"),
];

pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

pub fn percentage(part: usize, whole: usize) -> f64 {
    ratio(part as f64, whole as f64) * 100.0
}

pub fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (total, count) = values
        .into_iter()
        .fold((0.0, 0_usize), |(total, count), value| (total + value, count + 1));

    ratio(total, count as f64)
}

pub fn grouped_sum<T, K, FK, FV>(items: &[T], key: FK, value: FV) -> BTreeMap<K, f64>
where
    K: Ord,
    FK: Fn(&T) -> Option<K>,
    FV: Fn(&T) -> f64,
{
    let mut groups = BTreeMap::new();
    for item in items {
        if let Some(group) = key(item) {
            *groups.entry(group).or_insert(0.0) += value(item);
        }
    }

    groups
}

pub fn grouped_mean<T, K, FK, FV>(items: &[T], key: FK, value: FV) -> BTreeMap<K, f64>
where
    K: Ord,
    FK: Fn(&T) -> Option<K>,
    FV: Fn(&T) -> Option<f64>,
{
    let mut groups: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for item in items {
        if let (Some(group), Some(value)) = (key(item), value(item)) {
            let (total, count) = groups.entry(group).or_insert((0.0, 0));
            *total += value;
            *count += 1;
        }
    }

    groups
        .into_iter()
        .map(|(group, (total, count))| (group, ratio(total, count as f64)))
        .collect()
}

/// The `n` items with the largest value, largest first. Equal values keep their input order.
pub fn top_n_by<T, F>(items: impl IntoIterator<Item = T>, n: usize, value: F) -> Vec<T>
where
    F: Fn(&T) -> f64,
{
    let mut items: Vec<T> = items.into_iter().collect();
    items.sort_by(|a, b| value(b).total_cmp(&value(a)));
    items.truncate(n);

    items
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSummary {
    pub total_orders: usize,
    pub revenue: f64,
    pub delivered_orders: usize,
    pub success_rate: f64,
    pub average_ticket: f64,
}

pub fn order_summary(orders: &[Order]) -> OrderSummary {
    let total_orders = orders.len();
    let revenue: f64 = orders.iter().filter_map(|order| order.total).sum();
    let delivered_orders = orders.iter().filter(|order| order.is_delivered()).count();

    OrderSummary {
        total_orders,
        revenue,
        delivered_orders,
        success_rate: percentage(delivered_orders, total_orders),
        average_ticket: ratio(revenue, total_orders as f64),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
}

/// Most frequent status first, ties by status name.
pub fn status_distribution(orders: &[Order]) -> Vec<StatusCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for status in orders.iter().filter_map(|order| order.status.as_deref()) {
        *counts.entry(status).or_insert(0) += 1;
    }

    let mut distribution: Vec<StatusCount> = counts
        .into_iter()
        .map(|(status, count)| StatusCount {
            status: status.to_string(),
            count,
        })
        .collect();
    distribution.sort_by(|a, b| b.count.cmp(&a.count));

    distribution
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdayCount {
    pub weekday: &'static str,
    pub label: &'static str,
    pub count: usize,
}

/// Always seven buckets, Monday first.
pub fn orders_by_weekday(orders: &[Order]) -> Vec<WeekdayCount> {
    let mut counts = [0_usize; 7];
    for placed_at in orders.iter().filter_map(|order| order.placed_at) {
        counts[placed_at.weekday().num_days_from_monday() as usize] += 1;
    }

    WEEKDAYS
        .iter()
        .zip(counts)
        .map(|(&(weekday, label), count)| WeekdayCount {
            weekday,
            label,
            count,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub revenue: f64,
    pub orders: usize,
}

pub fn daily_series(orders: &[Order]) -> Vec<DailyPoint> {
    let mut days: BTreeMap<NaiveDate, DailyPoint> = BTreeMap::new();
    for order in orders {
        let Some(placed_at) = order.placed_at else {
            continue;
        };

        let date = placed_at.date();
        let point = days.entry(date).or_insert(DailyPoint {
            date,
            revenue: 0.0,
            orders: 0,
        });
        point.revenue += order.total.unwrap_or(0.0);
        point.orders += 1;
    }

    days.into_values().collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Revenue {
    pub name: String,
    pub revenue: f64,
}

fn restaurants_by_id(restaurants: &[Restaurant]) -> HashMap<&str, &Restaurant> {
    let mut by_id = HashMap::new();
    for restaurant in restaurants {
        if let Some(id) = restaurant.id.as_deref() {
            by_id.entry(id).or_insert(restaurant);
        }
    }

    by_id
}

/// Orders paired with their restaurant. Orders without a matching restaurant are dropped.
pub fn join_restaurants<'a>(
    orders: &'a [Order],
    restaurants: &'a [Restaurant],
) -> Vec<(&'a Order, &'a Restaurant)> {
    let by_id = restaurants_by_id(restaurants);

    orders
        .iter()
        .filter_map(|order| {
            let restaurant = by_id.get(order.restaurant_id.as_deref()?)?;
            Some((order, *restaurant))
        })
        .collect()
}

pub fn top_restaurants_by_revenue(
    orders: &[Order],
    restaurants: &[Restaurant],
    n: usize,
) -> Vec<Revenue> {
    let joined = join_restaurants(orders, restaurants);
    let by_name = grouped_sum(
        &joined,
        |(_, restaurant)| restaurant.name.clone(),
        |(order, _)| order.total.unwrap_or(0.0),
    );

    top_n_by(
        by_name
            .into_iter()
            .map(|(name, revenue)| Revenue { name, revenue }),
        n,
        |entry| entry.revenue,
    )
}

/// Revenue per cuisine. An order counts toward every category of its restaurant.
/// `None` when no matched order has a category.
pub fn revenue_by_category(orders: &[Order], restaurants: &[Restaurant]) -> Option<Vec<Revenue>> {
    let mut categories: BTreeMap<&str, f64> = BTreeMap::new();
    for (order, restaurant) in join_restaurants(orders, restaurants) {
        for category in &restaurant.categories {
            *categories.entry(category).or_insert(0.0) += order.total.unwrap_or(0.0);
        }
    }

    if categories.is_empty() {
        return None;
    }

    Some(
        categories
            .into_iter()
            .map(|(name, revenue)| Revenue {
                name: name.to_string(),
                revenue,
            })
            .collect(),
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSummary {
    pub average_score: f64,
    pub total_reviews: usize,
    pub positive_reviews: usize,
    pub satisfaction_rate: f64,
}

pub fn review_summary(reviews: &[Review]) -> ReviewSummary {
    let total_reviews = reviews.len();
    let positive_reviews = reviews
        .iter()
        .filter(|review| review.score.is_some_and(|score| score >= POSITIVE_SCORE))
        .count();

    ReviewSummary {
        average_score: mean(reviews.iter().filter_map(|review| review.score)),
        total_reviews,
        positive_reviews,
        satisfaction_rate: percentage(positive_reviews, total_reviews),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyScore {
    pub month: String,
    pub average_score: f64,
}

pub fn monthly_average_score(reviews: &[Review]) -> Vec<MonthlyScore> {
    grouped_mean(
        reviews,
        |review| review.reviewed_at.map(|at| at.format("%Y-%m").to_string()),
        |review| review.score,
    )
    .into_iter()
    .map(|(month, average_score)| MonthlyScore {
        month,
        average_score,
    })
    .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width bins over `[min, max]`. Bins are half-open except the last one.
/// Identical values collapse into a single bin.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let Some(min) = values.iter().copied().min_by(f64::total_cmp) else {
        return Vec::new();
    };
    let max = values.iter().copied().fold(min, f64::max);

    if bins == 0 {
        return Vec::new();
    }

    if max.total_cmp(&min) == Ordering::Equal {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: values.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0_usize; bins];
    for value in values {
        let index = (((value - min) / width).floor() as usize).min(bins - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(index, count)| HistogramBin {
            lower: min + width * index as f64,
            upper: if index + 1 == bins {
                max
            } else {
                min + width * (index + 1) as f64
            },
            count,
        })
        .collect()
}

pub fn score_histogram(reviews: &[Review]) -> Vec<HistogramBin> {
    let scores: Vec<f64> = reviews.iter().filter_map(|review| review.score).collect();

    histogram(&scores, SCORE_BINS)
}

pub fn price_histogram(dishes: &[Dish]) -> Vec<HistogramBin> {
    let prices: Vec<f64> = dishes.iter().filter_map(|dish| dish.price).collect();

    histogram(&prices, PRICE_BINS)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DishPrice {
    pub name: Option<String>,
    pub price: f64,
}

pub fn top_dishes_by_price(dishes: &[Dish], n: usize) -> Vec<DishPrice> {
    let priced = dishes.iter().filter_map(|dish| {
        dish.price.map(|price| DishPrice {
            name: dish.name.clone(),
            price,
        })
    });

    top_n_by(priced, n, |dish| dish.price)
}
