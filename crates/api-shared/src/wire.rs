//! Request and response bodies of the medstock HTTP API.
//!
//! Mutating endpoints take form-encoded bodies and answer with either [`MessageRes`] or
//! [`ErrorRes`]. Read endpoints answer with JSON.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// A medicine as returned by the API.
///
/// Records are passed through as stored, so `name` may be absent and `price` may be any JSON
/// value for hand-edited entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Medicine {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub price: Option<serde_json::Value>,
}

impl Medicine {
    /// The price when it is a JSON number.
    pub fn numeric_price(&self) -> Option<f64> {
        self.price.as_ref().and_then(serde_json::Value::as_f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListMedicinesRes {
    pub medicines: Vec<Medicine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AveragePriceRes {
    pub average_price: Option<f64>,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MessageRes {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

/// Form body of `POST /create`.
///
/// Fields are optional so that a missing field is reported with the same message as an empty
/// one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreateMedicineReq {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
}

/// Form body of `POST /update`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UpdateMedicineReq {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,
}

/// Form body of `DELETE /delete`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeleteMedicineReq {
    #[serde(default)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_medicine_accepts_malformed_price() {
        let m: Medicine = serde_json::from_str(r#"{"name": "A", "price": "x"}"#).unwrap();
        assert_eq!(m.numeric_price(), None);

        let m: Medicine = serde_json::from_str(r#"{"price": 2.5}"#).unwrap();
        assert_eq!(m.name, None);
        assert_eq!(m.numeric_price(), Some(2.5));
    }

    #[test]
    fn test_average_price_null_serialises_as_null() {
        let res = AveragePriceRes {
            average_price: None,
            count: 0,
        };
        assert_eq!(
            serde_json::to_string(&res).unwrap(),
            r#"{"average_price":null,"count":0}"#
        );
    }
}
