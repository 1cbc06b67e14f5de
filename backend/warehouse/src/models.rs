//! # Typed Views
//!
//! The store is schemaless, so these are read-side views over normalized documents, not a schema.
//!
//! ## Fields
//! - Orders (`pedidos`): id, restaurant id, status, total (**number**), placed at (**datetime**)
//! - Restaurants (`restaurantes`): id, name, categories (**list**, or a single label)
//! - Reviews (`avaliacoes`): id, score (**number**), reviewed at (**datetime**)
//! - Dishes (`pratos`): id, name, price (**number**)
//!
//! Joins between them are left joins on string identifiers, done at query time.
use chrono::NaiveDateTime;
use mongodb::bson::Document;

use crate::fields::{identifier, labels, number, text, timestamp};

pub const ID: &str = "_id";

pub const ORDER_RESTAURANT_ID: &str = "restaurante_id";
pub const ORDER_STATUS: &str = "status_pedido";
pub const ORDER_TOTAL: &str = "valor_total";
pub const ORDER_PLACED_AT: &str = "data_hora_pedido";

pub const RESTAURANT_NAME: &str = "nome";
pub const RESTAURANT_CATEGORIES: &str = "categorias";

pub const REVIEW_SCORE: &str = "nota";
pub const REVIEW_DATE: &str = "data_avaliacao";

pub const DISH_NAME: &str = "nome";
pub const DISH_PRICE: &str = "preco";

pub const STATUS_DELIVERED: &str = "entregue";

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: Option<String>,
    pub restaurant_id: Option<String>,
    pub status: Option<String>,
    pub total: Option<f64>,
    pub placed_at: Option<NaiveDateTime>,
}

impl Order {
    pub fn from_document(document: &Document) -> Self {
        Self {
            id: identifier(document, ID),
            restaurant_id: identifier(document, ORDER_RESTAURANT_ID),
            status: text(document, ORDER_STATUS),
            total: number(document, ORDER_TOTAL),
            placed_at: timestamp(document, ORDER_PLACED_AT),
        }
    }

    pub fn is_delivered(&self) -> bool {
        self.status.as_deref() == Some(STATUS_DELIVERED)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Restaurant {
    pub id: Option<String>,
    pub name: Option<String>,
    pub categories: Vec<String>,
}

impl Restaurant {
    pub fn from_document(document: &Document) -> Self {
        Self {
            id: identifier(document, ID),
            name: text(document, RESTAURANT_NAME),
            categories: labels(document, RESTAURANT_CATEGORIES),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: Option<String>,
    pub score: Option<f64>,
    pub reviewed_at: Option<NaiveDateTime>,
}

impl Review {
    pub fn from_document(document: &Document) -> Self {
        Self {
            id: identifier(document, ID),
            score: number(document, REVIEW_SCORE),
            reviewed_at: timestamp(document, REVIEW_DATE),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dish {
    pub id: Option<String>,
    pub name: Option<String>,
    pub price: Option<f64>,
}

impl Dish {
    pub fn from_document(document: &Document) -> Self {
        Self {
            id: identifier(document, ID),
            name: text(document, DISH_NAME),
            price: number(document, DISH_PRICE),
        }
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::{Bson, doc, oid::ObjectId};

    use super::{Dish, Order, Restaurant, Review};
    use crate::normalize::normalize_document;

    #[test]
    fn test_order_view() {
        let restaurant_id = ObjectId::new();
        let document = normalize_document(doc! {
            "_id": ObjectId::new(),
            "restaurante_id": restaurant_id,
            "status_pedido": "entregue",
            "valor_total": 42.5,
            "data_hora_pedido": "2024-05-01 12:00:00",
        });

        let order = Order::from_document(&document);

        assert_eq!(order.restaurant_id, Some(restaurant_id.to_hex()));
        assert_eq!(order.total, Some(42.5));
        assert!(order.is_delivered());
        assert!(order.placed_at.is_some());
    }

    #[test]
    fn test_order_missing_fields() {
        let order = Order::from_document(&doc! { "status_pedido": Bson::Null });

        assert_eq!(order.id, None);
        assert_eq!(order.status, None);
        assert_eq!(order.total, None);
        assert!(!order.is_delivered());
    }

    #[test]
    fn test_restaurant_single_category() {
        let restaurant = Restaurant::from_document(&doc! {
            "_id": "r1",
            "nome": "Tempero da Vila",
            "categorias": "brasileira",
        });

        assert_eq!(restaurant.categories, ["brasileira"]);
        assert_eq!(restaurant.name.as_deref(), Some("Tempero da Vila"));
    }

    #[test]
    fn test_review_and_dish() {
        let review = Review::from_document(&doc! { "nota": 5, "data_avaliacao": "2024-02-10" });
        let dish = Dish::from_document(&doc! { "nome": "Feijoada", "preco": 39 });

        assert_eq!(review.score, Some(5.0));
        assert!(review.reviewed_at.is_some());
        assert_eq!(dish.price, Some(39.0));
    }
}
