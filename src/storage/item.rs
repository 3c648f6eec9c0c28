//! Item records as they appear on disk and on the wire.
//!
//! Records are read leniently. The store keeps whatever object a client
//! posted, so a known field can hold any JSON type. Such a value stays in
//! `extra` under its own key and is written back unchanged, while the typed
//! field reads as its default.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::ItemId;

/// A catalog record.
///
/// `name`, `category` and `price` are the fields the query layer and the
/// stats cache look at. Anything else a client attached to the item is kept
/// in `extra` and written back untouched. A key present in `extra` takes
/// precedence over the typed field of the same name when serializing.
///
/// # Example
/// ```
/// use catalogd::Item;
///
/// let item: Item = serde_json::from_str(
///     r#"{"id": 1, "name": "Desk Lamp", "category": "Lighting", "price": 25.5, "sku": "L-1"}"#,
/// ).unwrap();
///
/// assert_eq!(item.name, "Desk Lamp");
/// assert_eq!(item.extra["sku"], "L-1");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub extra: Map<String, Value>,
}

/// Insert payload: an item without an id.
///
/// Bodies are taken as-is. The only field that is ever dropped is a
/// client-supplied `id`, because ids belong to the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub extra: Map<String, Value>,
}

impl NewItem {
    /// Build a payload from the three known fields.
    pub fn new(name: impl Into<String>, category: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            price,
            extra: Map::new(),
        }
    }

    /// Attach the store-assigned id.
    pub fn into_item(mut self, id: ItemId) -> Item {
        self.extra.remove("id");
        Item {
            id,
            name: self.name,
            category: self.category,
            price: self.price,
            extra: self.extra,
        }
    }

    /// Split a JSON object into typed fields and leftovers.
    ///
    /// Well-typed `name`, `category` and `price` are moved out of `fields`.
    /// Anything else, including a mistyped known field, stays behind as
    /// `extra`.
    fn from_fields(mut fields: Map<String, Value>) -> Self {
        let name = take_string(&mut fields, "name");
        let category = take_string(&mut fields, "category");
        let price = match fields.get("price") {
            Some(Value::Number(n)) => {
                let price = n.as_f64().unwrap_or(0.0);
                fields.remove("price");
                price
            }
            _ => 0.0,
        };

        Self {
            name,
            category,
            price,
            extra: fields,
        }
    }
}

fn take_string(fields: &mut Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(_)) => match fields.remove(key) {
            Some(Value::String(s)) => s,
            _ => String::new(),
        },
        _ => String::new(),
    }
}

fn serialize_record<S: Serializer>(
    serializer: S,
    id: Option<ItemId>,
    record: (&str, &str, f64),
    extra: &Map<String, Value>,
) -> Result<S::Ok, S::Error> {
    let (name, category, price) = record;
    let mut map = serializer.serialize_map(None)?;

    if let Some(id) = id {
        map.serialize_entry("id", &id)?;
    }
    if !extra.contains_key("name") {
        map.serialize_entry("name", name)?;
    }
    if !extra.contains_key("category") {
        map.serialize_entry("category", category)?;
    }
    if !extra.contains_key("price") {
        map.serialize_entry("price", &price)?;
    }
    for (key, value) in extra {
        if id.is_some() && key == "id" {
            continue;
        }
        map.serialize_entry(key, value)?;
    }

    map.end()
}

impl Serialize for Item {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_record(
            serializer,
            Some(self.id),
            (&self.name, &self.category, self.price),
            &self.extra,
        )
    }
}

impl<'de> Deserialize<'de> for Item {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields: Map<String, Value> = Map::deserialize(deserializer)?;
        let id = fields
            .remove("id")
            .ok_or_else(|| <D::Error as de::Error>::missing_field("id"))?;
        let id = ItemId::deserialize(id).map_err(<D::Error as de::Error>::custom)?;

        Ok(NewItem::from_fields(fields).into_item(id))
    }
}

impl Serialize for NewItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_record(
            serializer,
            None,
            (&self.name, &self.category, self.price),
            &self.extra,
        )
    }
}

impl<'de> Deserialize<'de> for NewItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::<String, Value>::deserialize(deserializer).map(Self::from_fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_missing_fields_default() {
        let item: Item = serde_json::from_value(json!({ "id": 3 })).unwrap();
        assert_eq!(item.id, ItemId::new(3));
        assert_eq!(item.name, "");
        assert_eq!(item.category, "");
        assert_eq!(item.price, 0.0);
        assert!(item.extra.is_empty());
    }

    #[test]
    fn test_item_requires_id() {
        let result: std::result::Result<Item, _> =
            serde_json::from_value(json!({ "name": "Orphan" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_integer_price_reads_as_float() {
        let item: Item = serde_json::from_value(json!({ "id": 1, "price": 10 })).unwrap();
        assert_eq!(item.price, 10.0);
    }

    #[test]
    fn test_item_serializes_known_fields() {
        let item = NewItem::new("Desk", "Furniture", 120.0).into_item(ItemId::new(9));
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(
            value,
            json!({ "id": 9, "name": "Desk", "category": "Furniture", "price": 120.0 })
        );
    }

    #[test]
    fn test_new_item_keeps_extra_fields() {
        let payload: NewItem = serde_json::from_value(json!({
            "name": "Mug",
            "category": "Kitchen",
            "price": 8,
            "color": "blue",
            "tags": ["ceramic"]
        }))
        .unwrap();

        let item = payload.into_item(ItemId::new(1));
        assert_eq!(item.extra["color"], "blue");
        assert_eq!(item.extra["tags"], json!(["ceramic"]));
    }

    #[test]
    fn test_new_item_drops_client_id() {
        let payload: NewItem =
            serde_json::from_value(json!({ "id": 1, "name": "Spoofed" })).unwrap();
        assert_eq!(payload.extra["id"], 1);

        let item = payload.into_item(ItemId::new(500));
        assert_eq!(item.id, ItemId::new(500));
        assert!(!item.extra.contains_key("id"));

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["id"], 500);
    }

    #[test]
    fn test_mistyped_fields_read_as_defaults() {
        let item: Item = serde_json::from_value(json!({
            "id": 4,
            "name": 7,
            "category": null,
            "price": "12"
        }))
        .unwrap();

        assert_eq!(item.name, "");
        assert_eq!(item.category, "");
        assert_eq!(item.price, 0.0);
        assert_eq!(item.extra["name"], 7);
        assert_eq!(item.extra["price"], "12");
    }

    #[test]
    fn test_mistyped_fields_written_back_unchanged() {
        let raw = json!({ "id": 4, "name": "Vase", "category": ["Decor"], "price": null });
        let item: Item = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(serde_json::to_value(&item).unwrap(), raw);
    }

    #[test]
    fn test_new_item_accepts_any_object() {
        let payload: NewItem =
            serde_json::from_value(json!({ "name": "Lamp", "price": null })).unwrap();
        assert_eq!(payload.name, "Lamp");
        assert_eq!(payload.price, 0.0);

        let item = payload.into_item(ItemId::new(2));
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value, json!({ "id": 2, "name": "Lamp", "category": "", "price": null }));
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(serde_json::from_value::<NewItem>(json!([1, 2])).is_err());
        assert!(serde_json::from_value::<Item>(json!("lamp")).is_err());
    }
}
