//! # Filters
//!
//! Narrows the order set to what the user selected.
//!
//! ## Selections
//! - Categories: orders of restaurants carrying any selected category
//! - Dates: calendar dates of the order timestamp, inclusive, either bound open
//! - Restaurants: orders of restaurants with a selected name
//! - Statuses: exact status match
//!
//! An empty selection, or one containing [`ALL`], is skipped. So is a category selection that no restaurant
//! carries. Every other selection becomes a [`Predicate`] and an order is kept only when all predicates hold,
//! so selections can be applied in any order.
use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use warehouse::models::{Order, Restaurant};

/// Sentinel selection meaning "no restriction".
pub const ALL: &str = "Todos";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("Date range starts on {start} but ends on {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, FilterError> {
        match (start, end) {
            (Some(start), Some(end)) if start > end => Err(FilterError::InvertedRange { start, end }),
            _ => Ok(Self { start, end }),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub categories: Vec<String>,
    pub dates: DateRange,
    pub restaurants: Vec<String>,
    pub statuses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    RestaurantIds(HashSet<String>),
    Dates(DateRange),
    Statuses(HashSet<String>),
}

impl Predicate {
    pub fn matches(&self, order: &Order) -> bool {
        match self {
            Predicate::RestaurantIds(ids) => order
                .restaurant_id
                .as_ref()
                .is_some_and(|id| ids.contains(id)),
            Predicate::Dates(range) => order
                .placed_at
                .is_some_and(|placed_at| range.contains(placed_at.date())),
            Predicate::Statuses(statuses) => order
                .status
                .as_ref()
                .is_some_and(|status| statuses.contains(status)),
        }
    }
}

impl OrderFilter {
    pub fn predicates(&self, restaurants: &[Restaurant]) -> Vec<Predicate> {
        let mut predicates = Vec::new();

        if !is_all(&self.categories) {
            let ids = restaurant_ids(restaurants, |restaurant| {
                restaurant
                    .categories
                    .iter()
                    .any(|category| self.categories.contains(category))
            });
            if !ids.is_empty() {
                predicates.push(Predicate::RestaurantIds(ids));
            }
        }

        if !self.dates.is_unbounded() {
            predicates.push(Predicate::Dates(self.dates));
        }

        if !is_all(&self.restaurants) {
            let ids = restaurant_ids(restaurants, |restaurant| {
                restaurant
                    .name
                    .as_ref()
                    .is_some_and(|name| self.restaurants.contains(name))
            });
            predicates.push(Predicate::RestaurantIds(ids));
        }

        if !is_all(&self.statuses) {
            predicates.push(Predicate::Statuses(self.statuses.iter().cloned().collect()));
        }

        predicates
    }

    pub fn apply(&self, orders: Vec<Order>, restaurants: &[Restaurant]) -> Vec<Order> {
        let predicates = self.predicates(restaurants);

        orders
            .into_iter()
            .filter(|order| predicates.iter().all(|predicate| predicate.matches(order)))
            .collect()
    }
}

fn is_all(selection: &[String]) -> bool {
    selection.is_empty() || selection.iter().any(|value| value == ALL)
}

fn restaurant_ids<F>(restaurants: &[Restaurant], keep: F) -> HashSet<String>
where
    F: Fn(&Restaurant) -> bool,
{
    restaurants
        .iter()
        .filter(|restaurant| keep(restaurant))
        .filter_map(|restaurant| restaurant.id.clone())
        .collect()
}

/// Values a client can offer for each selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub restaurants: Vec<String>,
    pub statuses: Vec<String>,
    pub first_order_date: Option<NaiveDate>,
    pub last_order_date: Option<NaiveDate>,
}

pub fn filter_options(orders: &[Order], restaurants: &[Restaurant]) -> FilterOptions {
    let categories: BTreeSet<&String> = restaurants
        .iter()
        .flat_map(|restaurant| restaurant.categories.iter())
        .collect();

    let names: BTreeSet<&String> = restaurants
        .iter()
        .filter_map(|restaurant| restaurant.name.as_ref())
        .collect();

    let mut statuses = vec![ALL.to_string()];
    for status in orders.iter().filter_map(|order| order.status.as_ref()) {
        if !statuses.contains(status) {
            statuses.push(status.clone());
        }
    }

    let dates = orders
        .iter()
        .filter_map(|order| order.placed_at.map(|placed_at| placed_at.date()));

    FilterOptions {
        categories: categories.into_iter().cloned().collect(),
        restaurants: std::iter::once(ALL.to_string())
            .chain(names.into_iter().cloned())
            .collect(),
        statuses,
        first_order_date: dates.clone().min(),
        last_order_date: dates.max(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use warehouse::models::{Order, Restaurant};

    use super::{ALL, DateRange, FilterError, OrderFilter, filter_options};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn order(id: &str, restaurant: &str, status: &str, day: Option<u32>) -> Order {
        Order {
            id: Some(id.to_string()),
            restaurant_id: Some(restaurant.to_string()),
            status: Some(status.to_string()),
            total: Some(10.0),
            placed_at: day.map(|day| date(day).and_hms_opt(19, 45, 0).unwrap()),
        }
    }

    fn restaurant(id: &str, name: &str, categories: &[&str]) -> Restaurant {
        Restaurant {
            id: Some(id.to_string()),
            name: Some(name.to_string()),
            categories: categories.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn restaurants() -> Vec<Restaurant> {
        vec![
            restaurant("r1", "Forno da Serra", &["pizza", "italiana"]),
            restaurant("r2", "Sushi Kaze", &["japonesa"]),
            restaurant("r3", "Casa do Norte", &["brasileira"]),
        ]
    }

    fn orders() -> Vec<Order> {
        vec![
            order("o1", "r1", "entregue", Some(1)),
            order("o2", "r2", "cancelado", Some(2)),
            order("o3", "r1", "entregue", Some(3)),
            order("o4", "r3", "em_preparo", Some(3)),
            order("o5", "r2", "entregue", None),
            order("o6", "desconhecido", "entregue", Some(4)),
        ]
    }

    fn ids(orders: &[Order]) -> Vec<&str> {
        orders.iter().filter_map(|order| order.id.as_deref()).collect()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn test_no_selection_keeps_everything() {
        let filter = OrderFilter {
            restaurants: strings(&[ALL]),
            statuses: strings(&[ALL, "entregue"]),
            ..OrderFilter::default()
        };

        assert!(filter.predicates(&restaurants()).is_empty());
        assert_eq!(filter.apply(orders(), &restaurants()).len(), orders().len());
    }

    #[test]
    fn test_categories() {
        let filter = OrderFilter {
            categories: strings(&["italiana", "brasileira"]),
            ..OrderFilter::default()
        };

        assert_eq!(ids(&filter.apply(orders(), &restaurants())), ["o1", "o3", "o4"]);
    }

    #[test]
    fn test_unknown_category_is_skipped() {
        let filter = OrderFilter {
            categories: strings(&["vegana"]),
            ..OrderFilter::default()
        };

        assert!(filter.predicates(&restaurants()).is_empty());
        assert_eq!(filter.apply(orders(), &restaurants()), orders());
    }

    #[test]
    fn test_unknown_restaurant_matches_nothing() {
        let filter = OrderFilter {
            restaurants: strings(&["Cantina Fechada"]),
            ..OrderFilter::default()
        };

        assert!(filter.apply(orders(), &restaurants()).is_empty());
    }

    #[test]
    fn test_date_range_inclusive() {
        let filter = OrderFilter {
            dates: DateRange::new(Some(date(2)), Some(date(3))).unwrap(),
            ..OrderFilter::default()
        };

        assert_eq!(ids(&filter.apply(orders(), &restaurants())), ["o2", "o3", "o4"]);
    }

    #[test]
    fn test_open_range_drops_undated() {
        let filter = OrderFilter {
            dates: DateRange::new(None, Some(date(30))).unwrap(),
            ..OrderFilter::default()
        };

        assert!(!ids(&filter.apply(orders(), &restaurants())).contains(&"o5"));
    }

    #[test]
    fn test_inverted_range() {
        assert_eq!(
            DateRange::new(Some(date(5)), Some(date(1))),
            Err(FilterError::InvertedRange {
                start: date(5),
                end: date(1)
            })
        );
    }

    #[test]
    fn test_restaurant_names_and_statuses() {
        let filter = OrderFilter {
            restaurants: strings(&["Sushi Kaze", "Forno da Serra"]),
            statuses: strings(&["entregue"]),
            ..OrderFilter::default()
        };

        assert_eq!(ids(&filter.apply(orders(), &restaurants())), ["o1", "o3", "o5"]);
    }

    #[test]
    fn test_filters_commute() {
        let filter = OrderFilter {
            categories: strings(&["pizza", "japonesa"]),
            dates: DateRange::new(Some(date(1)), Some(date(3))).unwrap(),
            restaurants: strings(&["Forno da Serra", "Sushi Kaze", "Casa do Norte"]),
            statuses: strings(&["entregue", "cancelado"]),
        };
        let predicates = filter.predicates(&restaurants());
        assert_eq!(predicates.len(), 4);

        let expected = filter.apply(orders(), &restaurants());
        let orderings: [[usize; 4]; 6] = [
            [0, 1, 2, 3],
            [3, 2, 1, 0],
            [1, 3, 0, 2],
            [2, 0, 3, 1],
            [3, 0, 1, 2],
            [1, 2, 3, 0],
        ];

        for ordering in orderings {
            let mut narrowed = orders();
            for index in ordering {
                narrowed.retain(|order| predicates[index].matches(order));
            }
            assert_eq!(narrowed, expected);
        }
        assert_eq!(ids(&expected), ["o1", "o2", "o3"]);
    }

    #[test]
    fn test_options() {
        let options = filter_options(&orders(), &restaurants());

        assert_eq!(options.categories, ["brasileira", "italiana", "japonesa", "pizza"]);
        assert_eq!(
            options.restaurants,
            [ALL, "Casa do Norte", "Forno da Serra", "Sushi Kaze"]
        );
        assert_eq!(options.statuses, [ALL, "entregue", "cancelado", "em_preparo"]);
        assert_eq!(options.first_order_date, Some(date(1)));
        assert_eq!(options.last_order_date, Some(date(4)));
    }

    #[test]
    fn test_options_empty() {
        let options = filter_options(&[], &[]);

        assert!(options.categories.is_empty());
        assert_eq!(options.statuses, [ALL]);
        assert_eq!(options.first_order_date, None);
    }
}
