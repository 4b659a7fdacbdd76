//! BigCommerce REST Client
//!
//! Talks to the v3 Management API of a single store:
//!
//! - `GET  /catalog/variants?sku=..`            SKU → variant
//! - `GET  /catalog/products/{id}/modifiers`    required modifiers
//! - `POST /carts?include=redirect_urls`        cart + checkout URL in one call

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::Value;

use super::{CartRequest, CatalogClient, Modifier, Variant};
use crate::config::CheckoutConfig;
use crate::error::{CheckoutError, Result};

const AUTH_HEADER: &str = "x-auth-token";
const VARIANT_FIELDS: &str = "id,product_id,sku";
const MODIFIER_FIELDS: &str = "id,display_name,type,required,is_required,option_values";

/// `{"data": ...}` wrapper used by every v3 response
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct VariantRecord {
    id: u64,
    product_id: u64,
}

/// BigCommerce store client
pub struct BigCommerceClient {
    http: reqwest::Client,
    api_base: String,
}

impl BigCommerceClient {
    /// Create a client for `api_base` (e.g. `https://api.bigcommerce.com/stores/<hash>/v3`)
    pub fn new(api_base: impl Into<String>, admin_token: &str) -> Result<Self> {
        let mut token = HeaderValue::from_str(admin_token).map_err(|_| {
            CheckoutError::Configuration("BC_ADMIN_TOKEN contains invalid header characters".into())
        })?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTH_HEADER, token);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| CheckoutError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create from loaded configuration
    ///
    /// Fails with `Configuration` when no admin token is set.
    pub fn from_config(config: &CheckoutConfig) -> Result<Self> {
        let token = config.admin_token.as_deref().ok_or_else(|| {
            CheckoutError::Configuration("Server not configured: missing BC_ADMIN_TOKEN".into())
        })?;
        Self::new(config.api_base.clone(), token)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}

#[async_trait]
impl CatalogClient for BigCommerceClient {
    async fn find_variant(&self, sku: &str) -> Result<Variant> {
        let response = self
            .http
            .get(self.url("/catalog/variants"))
            .query(&[("sku", sku), ("include_fields", VARIANT_FIELDS)])
            .send()
            .await?;

        let status = response.status();
        let not_found = || CheckoutError::NotFound(format!("SKU not found or unavailable: {sku}"));

        if !status.is_success() {
            tracing::warn!(sku, status = status.as_u16(), "Variant lookup rejected");
            return Err(not_found());
        }

        let envelope: Envelope<Vec<VariantRecord>> = response.json().await?;
        let record = envelope.data.into_iter().next().ok_or_else(not_found)?;

        Ok(Variant {
            variant_id: record.id,
            product_id: record.product_id,
        })
    }

    async fn product_modifiers(&self, product_id: u64) -> Result<Vec<Modifier>> {
        let response = self
            .http
            .get(self.url(&format!("/catalog/products/{product_id}/modifiers")))
            .query(&[("include_fields", MODIFIER_FIELDS)])
            .send()
            .await?;

        let status = response.status();
        let body: Value = response.json().await?;

        if !status.is_success() {
            tracing::warn!(product_id, status = status.as_u16(), "Modifier lookup rejected");
            return Err(CheckoutError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: Envelope<Vec<Modifier>> = serde_json::from_value(body)?;
        Ok(envelope.data)
    }

    async fn create_cart(&self, request: &CartRequest) -> Result<String> {
        let response = self
            .http
            .post(self.url("/carts"))
            .query(&[("include", "redirect_urls")])
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body: Value = response.json().await?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Cart creation rejected");
            return Err(CheckoutError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        body.pointer("/data/redirect_urls/checkout_url")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .ok_or_else(|| CheckoutError::BadGateway("No checkout_url returned".into()))
    }

    fn name(&self) -> &str {
        "BigCommerce"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::OptionSelection;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TOKEN: &str = "test-token";

    fn client(server: &MockServer) -> BigCommerceClient {
        BigCommerceClient::new(server.uri(), TOKEN).unwrap()
    }

    #[tokio::test]
    async fn test_find_variant() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/catalog/variants"))
            .and(query_param("sku", "PUL-30-SRV"))
            .and(query_param("include_fields", "id,product_id,sku"))
            .and(header("X-Auth-Token", TOKEN))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": 77, "product_id": 12, "sku": "PUL-30-SRV"}],
                "meta": {}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let variant = client(&server).find_variant("PUL-30-SRV").await.unwrap();
        assert_eq!(variant, Variant { variant_id: 77, product_id: 12 });
    }

    #[tokio::test]
    async fn test_find_variant_empty_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/catalog/variants"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;

        let err = client(&server).find_variant("NOPE").await.unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_string(), "SKU not found or unavailable: NOPE");
    }

    #[tokio::test]
    async fn test_find_variant_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/catalog/variants"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"title": "Unauthorized"})))
            .mount(&server)
            .await;

        let err = client(&server).find_variant("PUL-30-SRV").await.unwrap_err();
        assert!(matches!(err, CheckoutError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_product_modifiers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/catalog/products/12/modifiers"))
            .and(query_param("include_fields", MODIFIER_FIELDS))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{
                    "id": 5, "display_name": "Flavor", "type": "dropdown", "required": true,
                    "option_values": [{"id": 501, "label": "Citrus", "is_default": false}]
                }]
            })))
            .mount(&server)
            .await;

        let modifiers = client(&server).product_modifiers(12).await.unwrap();
        assert_eq!(modifiers.len(), 1);
        assert_eq!(modifiers[0].display_name, "Flavor");
        assert_eq!(modifiers[0].option_values[0].id, 501);
    }

    #[tokio::test]
    async fn test_product_modifiers_rejected() {
        let server = MockServer::start().await;
        let upstream = json!({"status": 403, "title": "You don't have a required scope"});
        Mock::given(method("GET"))
            .and(path("/catalog/products/12/modifiers"))
            .respond_with(ResponseTemplate::new(403).set_body_json(upstream.clone()))
            .mount(&server)
            .await;

        let err = client(&server).product_modifiers(12).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Upstream { status: 403, .. }));
        assert_eq!(err.error_body(), upstream);
    }

    #[tokio::test]
    async fn test_create_cart() {
        let server = MockServer::start().await;
        let request = CartRequest::single(
            1_778_657,
            Variant { variant_id: 77, product_id: 12 },
            3,
            vec![OptionSelection { option_id: 5, option_value: 501 }],
        );

        Mock::given(method("POST"))
            .and(path("/carts"))
            .and(query_param("include", "redirect_urls"))
            .and(header("X-Auth-Token", TOKEN))
            .and(body_json(json!({
                "channel_id": 1_778_657,
                "line_items": [{
                    "product_id": 12, "variant_id": 77, "quantity": 3,
                    "option_selections": [{"option_id": 5, "option_value": 501}]
                }]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": {"id": "c-1", "redirect_urls": {"checkout_url": "https://shop.test/checkout/c-1"}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let url = client(&server).create_cart(&request).await.unwrap();
        assert_eq!(url, "https://shop.test/checkout/c-1");
    }

    #[tokio::test]
    async fn test_create_cart_passes_upstream_error_through() {
        let server = MockServer::start().await;
        let upstream = json!({"status": 422, "title": "Product is out of stock", "errors": {}});
        Mock::given(method("POST"))
            .and(path("/carts"))
            .respond_with(ResponseTemplate::new(422).set_body_json(upstream.clone()))
            .mount(&server)
            .await;

        let request = CartRequest::single(1, Variant { variant_id: 1, product_id: 1 }, 1, Vec::new());
        let err = client(&server).create_cart(&request).await.unwrap_err();
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.error_body(), upstream);
    }

    #[tokio::test]
    async fn test_create_cart_without_checkout_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/carts"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {"id": "c-1"}})))
            .mount(&server)
            .await;

        let request = CartRequest::single(1, Variant { variant_id: 1, product_id: 1 }, 1, Vec::new());
        let err = client(&server).create_cart(&request).await.unwrap_err();
        assert_eq!(err.status_code(), 502);
        assert_eq!(err.to_string(), "No checkout_url returned");
    }

    #[tokio::test]
    async fn test_non_json_body_is_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/carts"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let request = CartRequest::single(1, Variant { variant_id: 1, product_id: 1 }, 1, Vec::new());
        let err = client(&server).create_cart(&request).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Server(_)));
    }

    #[test]
    fn test_from_config_requires_token() {
        let config = CheckoutConfig {
            admin_token: None,
            ..CheckoutConfig::default()
        };
        let err = BigCommerceClient::from_config(&config).err().unwrap();
        assert_eq!(err.to_string(), "Server not configured: missing BC_ADMIN_TOKEN");
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = BigCommerceClient::new("https://api.test/stores/abc/v3/", TOKEN).unwrap();
        assert_eq!(client.url("/carts"), "https://api.test/stores/abc/v3/carts");
    }
}
