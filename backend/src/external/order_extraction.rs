//! Optical Order Extraction Client
//!
//! Client for the hosted image-recognition service that turns a scanned
//! production order into structured line items.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::{OrderData, ParsedOrder};

use crate::error::{AppError, AppResult};

/// Client for the order extraction microservice
#[derive(Clone)]
pub struct OrderExtractionClient {
    endpoint: String,
    api_key: Option<String>,
    http_client: Client,
}

/// Request to extract a production order from an image
#[derive(Debug, Serialize)]
pub struct ExtractOrderRequest {
    pub image: String,
}

/// Success response from the extraction API
#[derive(Debug, Deserialize)]
pub struct ExtractOrderResponse {
    pub datos: OrderData,
}

/// Failure body the API returns alongside a non-success status
#[derive(Debug, Deserialize)]
struct ExtractionErrorBody {
    error: String,
}

impl OrderExtractionClient {
    /// Create a new order extraction client
    pub fn new(endpoint: String, api_key: Option<String>, timeout: Duration) -> Self {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint,
            api_key,
            http_client,
        }
    }

    /// Strip the data-URL prefix browsers put on pasted images; the service
    /// expects the bare base64 payload.
    pub fn strip_data_url_prefix(image: &str) -> &str {
        match image.find("base64,") {
            Some(idx) => &image[idx + "base64,".len()..],
            None => image,
        }
    }

    /// Send a scanned order image for extraction.
    ///
    /// A timeout counts as an extraction failure; the caller's ledger state
    /// is never touched by a failed call.
    pub async fn extract_order(&self, image: &str) -> AppResult<ParsedOrder> {
        let request = ExtractOrderRequest {
            image: Self::strip_data_url_prefix(image).to_string(),
        };

        let mut builder = self
            .http_client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.header("x-api-key", key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Extraction("Request timed out".to_string())
            } else {
                AppError::Extraction(format!("Request failed: {}", e))
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<ExtractionErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            return Err(AppError::Extraction(format!(
                "API returned {}: {}",
                status, message
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::Extraction(format!("Failed to read response: {}", e)))?;
        parse_extraction_body(&body)
    }
}

/// Decode a success body. Anything that does not carry `datos` is an error,
/// non-JSON bodies included.
pub fn parse_extraction_body(body: &str) -> AppResult<ParsedOrder> {
    let parsed: ExtractOrderResponse = serde_json::from_str(body)
        .map_err(|e| AppError::Extraction(format!("Failed to parse response: {}", e)))?;
    Ok(parsed.datos.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_strip_data_url_prefix() {
        assert_eq!(
            OrderExtractionClient::strip_data_url_prefix("data:image/png;base64,iVBORw0K"),
            "iVBORw0K"
        );
        assert_eq!(
            OrderExtractionClient::strip_data_url_prefix("iVBORw0K"),
            "iVBORw0K"
        );
    }

    #[test]
    fn test_parse_success_body() {
        let body = r#"{
            "datos": {
                "numero_op": "OP-118",
                "insumos": [
                    {"nombre": "Harina", "cantidad": 50, "unidad": "kg"},
                    {"nombre": "Pote HDPE 310", "cantidad": 200, "unidad": "und", "categoria": "EMPAQUE"}
                ]
            }
        }"#;

        let order = parse_extraction_body(body).unwrap();
        assert_eq!(order.order_id, "OP-118");
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].quantity, Some(Decimal::from(50)));
    }

    #[test]
    fn test_parse_non_json_body_is_an_error() {
        let err = parse_extraction_body("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }

    #[test]
    fn test_parse_body_without_datos_is_an_error() {
        let err = parse_extraction_body(r#"{"error": "imagen ilegible"}"#).unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }
}
