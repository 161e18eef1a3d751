//! Wire types exchanged with the backoffice API

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier of a person record
pub type PersonId = i64;

/// Identifier of a product record
pub type ProductId = i64;

/// Login request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Short-lived access token
    pub access: String,
    /// Long-lived refresh token
    pub refresh: String,
    /// Profile of the signed-in user, when the server includes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

/// Refresh request body. The token is `null` when none is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh: Option<String>,
}

/// Refresh response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

/// Snapshot of the signed-in user, received at login and never refetched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl UserProfile {
    /// "First Last", falling back to the username when both are blank
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Paginated list envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Number of pages needed to show `count` records at `page_size` per page
    pub fn total_pages(&self, page_size: u32) -> u64 {
        if page_size == 0 {
            return 0;
        }
        self.count.div_ceil(u64::from(page_size))
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}

/// Person record as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Person {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Body for creating a person
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Partial update of a person. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl PersonPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }
}

/// Person query criteria for the list endpoint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonFilters {
    pub email: Option<String>,
    pub last_name: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Owner summary embedded in product responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerDetails {
    pub id: PersonId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Product record as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub price: Decimal,
    #[serde(default)]
    pub owner: Option<PersonId>,
    #[serde(default)]
    pub owner_details: Option<OwnerDetails>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body for creating a product. A missing owner is sent as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub sku: String,
    pub price: Decimal,
    pub owner: Option<PersonId>,
}

/// Partial update of a product. `owner: Some(None)` clears the owner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Option<PersonId>>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.sku.is_none() && self.price.is_none() && self.owner.is_none()
    }
}

/// Product query criteria for the list endpoint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilters {
    pub sku: Option<String>,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
    pub q: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Health endpoint payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn person_patch_sends_only_set_fields() {
        let patch = PersonPatch {
            email: Some("juan.updated@example.com".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({ "email": "juan.updated@example.com" })
        );
    }

    #[test]
    fn product_draft_sends_null_owner() {
        let draft = ProductDraft {
            name: "Lamp".into(),
            sku: "LMP-001".into(),
            price: Decimal::new(1999, 2),
            owner: None,
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["owner"], serde_json::Value::Null);
    }

    #[test]
    fn product_patch_can_clear_owner() {
        let patch = ProductPatch {
            owner: Some(None),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "owner": null }));
    }

    #[test]
    fn product_accepts_string_and_number_prices() {
        let from_string: Product = serde_json::from_value(json!({
            "id": 1, "name": "Lamp", "sku": "LMP-001", "price": "19.99"
        }))
        .unwrap();
        let from_number: Product = serde_json::from_value(json!({
            "id": 1, "name": "Lamp", "sku": "LMP-001", "price": 19.99
        }))
        .unwrap();
        assert_eq!(from_string.price, Decimal::new(1999, 2));
        assert_eq!(from_number.price, Decimal::new(1999, 2));
    }

    #[test]
    fn total_pages_rounds_up() {
        let page: Page<Person> = Page {
            count: 21,
            next: None,
            previous: None,
            results: vec![],
        };
        assert_eq!(page.total_pages(10), 3);
        assert_eq!(page.total_pages(0), 0);
    }

    #[test]
    fn display_name_falls_back_to_username() {
        let user = UserProfile {
            id: 1,
            username: "admin".into(),
            email: "admin@example.com".into(),
            first_name: String::new(),
            last_name: String::new(),
        };
        assert_eq!(user.display_name(), "admin");
    }
}
