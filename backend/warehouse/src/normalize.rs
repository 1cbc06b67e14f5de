//! # Normalization
//!
//! Documents come out of the store with `ObjectId` values wherever a record
//! references another one. Everything downstream compares identifiers as plain
//! strings, so every `ObjectId` is rewritten to its hex form before the record
//! leaves this crate.
//!
//! - Walks nested documents and arrays at any depth
//! - Leaves every other value untouched, key order included
//! - Idempotent: a normalized document normalizes to itself
use mongodb::bson::{Bson, Document};

pub fn normalize_document(document: Document) -> Document {
    document
        .into_iter()
        .map(|(key, value)| (key, normalize(value)))
        .collect()
}

pub fn normalize(value: Bson) -> Bson {
    match value {
        Bson::ObjectId(id) => Bson::String(id.to_hex()),
        Bson::Document(document) => Bson::Document(normalize_document(document)),
        Bson::Array(items) => Bson::Array(items.into_iter().map(normalize).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::{Bson, DateTime, doc, oid::ObjectId};

    use super::{normalize, normalize_document};

    fn has_object_id(value: &Bson) -> bool {
        match value {
            Bson::ObjectId(_) => true,
            Bson::Document(document) => document.values().any(has_object_id),
            Bson::Array(items) => items.iter().any(has_object_id),
            _ => false,
        }
    }

    #[test]
    fn test_top_level_id() {
        let id = ObjectId::new();
        let normalized = normalize_document(doc! { "_id": id, "nome": "Cantina" });

        assert_eq!(normalized.get_str("_id").unwrap(), id.to_hex());
        assert_eq!(normalized.get_str("nome").unwrap(), "Cantina");
    }

    #[test]
    fn test_nested_ids() {
        let order = doc! {
            "_id": ObjectId::new(),
            "restaurante_id": ObjectId::new(),
            "cliente": { "usuario_id": ObjectId::new(), "endereco": { "ref": ObjectId::new() } },
            "itens": [
                { "prato_id": ObjectId::new(), "quantidade": 2 },
                ObjectId::new(),
                [ObjectId::new(), "solto"],
            ],
        };

        let normalized = Bson::Document(normalize_document(order));

        assert!(!has_object_id(&normalized));
    }

    #[test]
    fn test_idempotent() {
        let once = normalize_document(doc! {
            "_id": ObjectId::new(),
            "categorias": ["pizza", "italiana"],
            "detalhes": { "dono": ObjectId::new() },
        });
        let twice = normalize_document(once.clone());

        assert_eq!(once, twice);
    }

    #[test]
    fn test_other_values_pass_through() {
        let when = DateTime::from_millis(1_700_000_000_000);
        let values = [
            Bson::Int32(4),
            Bson::Double(12.5),
            Bson::Boolean(true),
            Bson::Null,
            Bson::DateTime(when),
            Bson::String("entregue".to_string()),
        ];

        for value in values {
            assert_eq!(normalize(value.clone()), value);
        }
    }

    #[test]
    fn test_key_order_preserved() {
        let normalized = normalize_document(doc! { "z": 1, "a": ObjectId::new(), "m": 3 });
        let keys: Vec<&str> = normalized.keys().map(String::as_str).collect();

        assert_eq!(keys, ["z", "a", "m"]);
    }
}
