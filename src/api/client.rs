//! Blocking client for the collectibles tracking service.
//!
//! The service owns persistence and the external price-check integration;
//! this client fetches the item snapshot and issues mutations. Reads after
//! a mutation are satisfied by a full re-fetch, never by patching the
//! snapshot in place.
//!
//! Wire dates are ISO-8601 strings in a handful of shapes (the server
//! stores whatever it was given). They stay `String` in the wire structs
//! and are normalized on ingest; a history entry whose date cannot be
//! parsed, or whose price is missing or non-finite, is skipped rather than
//! treated as fatal.

use chrono::NaiveDateTime;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::domain::{ClientConfig, Item, ItemsSnapshot, Observation};
use crate::error::AppError;

const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Wire format for serialized observation timestamps.
const WIRE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from an optional flag override, the `CURIO_API_URL`
    /// environment variable (`.env` supported), or the default local URL.
    pub fn from_env(override_url: Option<&str>) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let base_url = match override_url {
            Some(url) => url.to_string(),
            None => std::env::var("CURIO_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        };
        Ok(Self::new(ClientConfig {
            api_url: base_url.trim_end_matches('/').to_string(),
        }))
    }

    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_url,
        }
    }

    /// Fetch the full item snapshot.
    pub fn fetch_items(&self) -> Result<ItemsSnapshot, AppError> {
        let resp = self
            .client
            .get(format!("{}/api/items", self.base_url))
            .send()
            .map_err(|e| AppError::new(4, format!("Item fetch failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Item fetch failed with status {}.", resp.status()),
            ));
        }

        let body: ItemsResponse = resp
            .json()
            .map_err(|e| AppError::new(4, format!("Failed to parse items response: {e}")))?;

        let items = body.items.into_iter().map(Item::from).collect();
        Ok(ItemsSnapshot { items })
    }

    /// Create a new item; the server assigns the id and seeds the history
    /// with the acquisition price. Returns the assigned id.
    pub fn create_item(
        &self,
        name: &str,
        category: Option<&str>,
        price: f64,
        exclude_keywords: Option<&str>,
    ) -> Result<u64, AppError> {
        let body = NewItemBody {
            name,
            category,
            price,
            exclude_keywords,
        };
        let resp = self
            .client
            .post(format!("{}/api/items", self.base_url))
            .json(&body)
            .send()
            .map_err(|e| AppError::new(4, format!("Item create failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Item create failed with status {}.", resp.status()),
            ));
        }

        let created: WireItem = resp
            .json()
            .map_err(|e| AppError::new(4, format!("Failed to parse create response: {e}")))?;
        Ok(created.id)
    }

    /// Replace an item wholesale. This is also the vehicle for
    /// history-entry deletion: send the item with the entry removed.
    pub fn update_item(&self, item: &Item) -> Result<(), AppError> {
        let resp = self
            .client
            .put(format!("{}/api/items/{}", self.base_url, item.id))
            .json(&WireItem::from(item))
            .send()
            .map_err(|e| AppError::new(4, format!("Item update failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Item update failed with status {}.", resp.status()),
            ));
        }
        Ok(())
    }

    pub fn delete_item(&self, id: u64) -> Result<(), AppError> {
        let resp = self
            .client
            .delete(format!("{}/api/items/{id}", self.base_url))
            .send()
            .map_err(|e| AppError::new(4, format!("Item delete failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Item delete failed with status {}.", resp.status()),
            ));
        }
        Ok(())
    }

    /// Append a price observation to an item's history.
    pub fn add_price(
        &self,
        id: u64,
        price: f64,
        at: Option<NaiveDateTime>,
    ) -> Result<(), AppError> {
        let body = NewPriceBody {
            price,
            date: at.map(|d| d.format(WIRE_DATE_FORMAT).to_string()),
        };
        let resp = self
            .client
            .post(format!("{}/api/items/{id}/price", self.base_url))
            .json(&body)
            .send()
            .map_err(|e| AppError::new(4, format!("Price update failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Price update failed with status {}.", resp.status()),
            ));
        }
        Ok(())
    }

    /// Trigger the server-side price check for a single item.
    pub fn check_item(&self, id: u64) -> Result<CheckOutcome, AppError> {
        let resp = self
            .client
            .post(format!("{}/api/items/{id}/check", self.base_url))
            .send()
            .map_err(|e| AppError::new(4, format!("Price check failed: {e}")))?;

        let outcome: CheckResponse = resp
            .json()
            .map_err(|e| AppError::new(4, format!("Failed to parse check response: {e}")))?;
        Ok(CheckOutcome {
            success: outcome.status == "success",
            status: outcome.status,
            price: outcome.price,
        })
    }

    /// Trigger the server-side price check for every item. Returns one
    /// result line per item, as reported by the server.
    pub fn check_all(&self) -> Result<Vec<String>, AppError> {
        let resp = self
            .client
            .post(format!("{}/api/check-prices", self.base_url))
            .send()
            .map_err(|e| AppError::new(4, format!("Price check failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Price check failed with status {}.", resp.status()),
            ));
        }

        let body: CheckAllResponse = resp
            .json()
            .map_err(|e| AppError::new(4, format!("Failed to parse check response: {e}")))?;
        Ok(body.results)
    }
}

/// Result of a single-item price check.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub success: bool,
    pub status: String,
    pub price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ItemsResponse {
    #[serde(default)]
    items: Vec<WireItem>,
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CheckAllResponse {
    #[serde(default)]
    results: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewItemBody<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
    price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    exclude_keywords: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct NewPriceBody {
    price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireItem {
    #[serde(default)]
    id: u64,
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(default)]
    price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exclude_keywords: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    active_listing_url: Option<String>,
    #[serde(default)]
    price_history: Vec<WirePricePoint>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WirePricePoint {
    #[serde(default)]
    date: String,
    #[serde(default)]
    price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

impl From<WireItem> for Item {
    fn from(wire: WireItem) -> Self {
        let history = wire
            .price_history
            .into_iter()
            .filter_map(|p| {
                let at = parse_wire_date(&p.date)?;
                let price = p.price.filter(|v| v.is_finite() && *v >= 0.0)?;
                Some(Observation {
                    at,
                    price,
                    url: p.url,
                })
            })
            .collect();

        Item {
            id: wire.id,
            name: wire.name,
            category: wire.category,
            price: if wire.price.is_finite() {
                wire.price
            } else {
                0.0
            },
            exclude_keywords: wire.exclude_keywords,
            active_listing_url: wire.active_listing_url,
            history,
        }
    }
}

impl From<&Item> for WireItem {
    fn from(item: &Item) -> Self {
        WireItem {
            id: item.id,
            name: item.name.clone(),
            category: item.category.clone(),
            price: item.price,
            exclude_keywords: item.exclude_keywords.clone(),
            active_listing_url: item.active_listing_url.clone(),
            price_history: item
                .history
                .iter()
                .map(|o| WirePricePoint {
                    date: o.at.format(WIRE_DATE_FORMAT).to_string(),
                    price: Some(o.price),
                    url: o.url.clone(),
                })
                .collect(),
        }
    }
}

/// Parse the date shapes the server is known to store: ISO-8601 with
/// optional fractional seconds, RFC 3339 with an offset, or a bare date.
fn parse_wire_date(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }
    if let Ok(d) = chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn parses_the_known_wire_date_shapes() {
        let naive = parse_wire_date("2025-03-14T09:26:53").unwrap();
        assert_eq!(naive.date(), NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());

        let fractional = parse_wire_date("2025-03-14T09:26:53.589793").unwrap();
        assert_eq!(fractional.second(), 53);

        let offset = parse_wire_date("2025-03-14T09:26:53+00:00").unwrap();
        assert_eq!(offset.hour(), 9);

        let bare = parse_wire_date("2025-03-14").unwrap();
        assert_eq!(bare.hour(), 0);

        assert!(parse_wire_date("").is_none());
        assert!(parse_wire_date("not-a-date").is_none());
    }

    #[test]
    fn malformed_history_entries_are_skipped_not_fatal() {
        let json = r#"{
            "id": 7,
            "name": "Tin Rocket",
            "category": "Tinplate",
            "price": 120.0,
            "priceHistory": [
                {"date": "2025-01-02T10:00:00", "price": 100.0},
                {"date": "garbage", "price": 50.0},
                {"date": "2025-01-03T10:00:00"},
                {"date": "2025-01-04T10:00:00", "price": 120.0, "url": "https://example.net/listing/9"}
            ]
        }"#;
        let wire: WireItem = serde_json::from_str(json).unwrap();
        let item = Item::from(wire);
        assert_eq!(item.history.len(), 2);
        assert_eq!(item.history[1].url.as_deref(), Some("https://example.net/listing/9"));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let json = r#"{"items": [{"id": 1, "name": "Lone Figure"}]}"#;
        let body: ItemsResponse = serde_json::from_str(json).unwrap();
        let item = Item::from(body.items.into_iter().next().unwrap());
        assert_eq!(item.price, 0.0);
        assert!(item.history.is_empty());
        assert!(item.category.is_none());
    }

    #[test]
    fn wire_item_round_trips_camel_case() {
        let item = Item {
            id: 3,
            name: "Clockwork Owl".to_string(),
            category: None,
            price: 85.0,
            exclude_keywords: Some("broken,repro".to_string()),
            active_listing_url: None,
            history: vec![Observation::new(
                NaiveDate::from_ymd_opt(2025, 2, 1)
                    .unwrap()
                    .and_hms_opt(12, 30, 0)
                    .unwrap(),
                85.0,
            )],
        };
        let json = serde_json::to_string(&WireItem::from(&item)).unwrap();
        assert!(json.contains("\"excludeKeywords\""));
        assert!(json.contains("\"priceHistory\""));
        assert!(json.contains("2025-02-01T12:30:00"));

        let back = Item::from(serde_json::from_str::<WireItem>(&json).unwrap());
        assert_eq!(back.history.len(), 1);
        assert_eq!(back.history[0], item.history[0]);
    }
}
