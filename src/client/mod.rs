//! HTTP call layer the front end uses to reach the API service.
//!
//! Every operation issues exactly one request. Single-item getters map a 404
//! to `Ok(None)`; any other non-success status becomes [`ClientError::Status`].

mod error;

pub use error::ClientError;

use std::time::{Duration, Instant};

use metrics::{counter, histogram};
use reqwest::{header, Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, instrument, warn};
use url::Url;
use uuid::Uuid;

use crate::config::WebConfig;
use crate::entities::{order, order_line};
use crate::models::{NewOrder, NewOrderLine, OrderDto, OrderLineDto, OrderWithLines};

const ORDER_PATH: &str = "api/Order";
const ORDER_LINE_PATH: &str = "api/OrderLine";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Builds a client rooted at `base_url`. A missing trailing slash is added
    /// so relative paths resolve beneath it.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .default_headers(headers)
            .build()?;

        Ok(Self { http, base_url })
    }

    pub fn from_config(cfg: &WebConfig) -> Result<Self, ClientError> {
        Self::new(&cfg.api_base_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        Ok(self.http.request(method, self.url(path)?))
    }

    /// Sends the request and returns the raw body of a successful response.
    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, ClientError> {
        let start = Instant::now();
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        histogram!("smarthub_client.request_duration", start.elapsed());

        if !status.is_success() {
            counter!("smarthub_client.requests", 1, "outcome" => "error");
            let body = String::from_utf8_lossy(&body).into_owned();
            if status == StatusCode::NOT_FOUND {
                debug!(%status, "API resource not found");
            } else {
                warn!(%status, %body, "API call failed");
            }
            return Err(ClientError::Status { status, body });
        }

        counter!("smarthub_client.requests", 1, "outcome" => "success");
        debug!(%status, bytes = body.len(), "API call succeeded");
        Ok(body.to_vec())
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let body = self.send(self.request(Method::GET, path)?).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn fetch_optional<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, ClientError> {
        match self.send(self.request(Method::GET, path)?).await {
            Ok(body) => Ok(Some(serde_json::from_slice(&body)?)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn write<B, T>(&self, method: Method, path: &str, payload: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(method, path)?.json(payload);
        let body = self.send(request).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.send(self.request(Method::DELETE, path)?)
            .await
            .map(|_| ())
    }

    #[instrument(skip(self))]
    pub async fn get_orders(&self) -> Result<Vec<OrderWithLines>, ClientError> {
        self.fetch(ORDER_PATH).await
    }

    #[instrument(skip(self))]
    pub async fn get_order(&self, id: Uuid) -> Result<Option<OrderWithLines>, ClientError> {
        self.fetch_optional(&format!("{}/{}", ORDER_PATH, id)).await
    }

    #[instrument(skip(self, order), fields(order_number = %order.order_number))]
    pub async fn add_order(&self, order: &NewOrder) -> Result<order::Model, ClientError> {
        self.write(Method::POST, ORDER_PATH, order).await
    }

    #[instrument(skip(self, order), fields(order_id = %order.order_id))]
    pub async fn update_order(&self, order: &OrderDto) -> Result<OrderDto, ClientError> {
        let path = format!("{}/{}", ORDER_PATH, order.order_id);
        self.write(Method::PUT, &path, order).await
    }

    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: Uuid) -> Result<(), ClientError> {
        self.delete(&format!("{}/{}", ORDER_PATH, id)).await
    }

    #[instrument(skip(self))]
    pub async fn get_order_lines(&self) -> Result<Vec<order_line::Model>, ClientError> {
        self.fetch(ORDER_LINE_PATH).await
    }

    #[instrument(skip(self))]
    pub async fn get_order_line(&self, id: Uuid) -> Result<Option<order_line::Model>, ClientError> {
        self.fetch_optional(&format!("{}/{}", ORDER_LINE_PATH, id))
            .await
    }

    #[instrument(skip(self, line))]
    pub async fn add_order_line(
        &self,
        order_id: Uuid,
        line: &NewOrderLine,
    ) -> Result<order_line::Model, ClientError> {
        let path = format!("{}/{}", ORDER_LINE_PATH, order_id);
        self.write(Method::POST, &path, line).await
    }

    #[instrument(skip(self, line), fields(order_line_id = %line.order_line_id))]
    pub async fn update_order_line(&self, line: &OrderLineDto) -> Result<OrderLineDto, ClientError> {
        let path = format!("{}/{}", ORDER_LINE_PATH, line.order_line_id);
        self.write(Method::PUT, &path, line).await
    }

    #[instrument(skip(self))]
    pub async fn delete_order_line(&self, id: Uuid) -> Result<(), ClientError> {
        self.delete(&format!("{}/{}", ORDER_LINE_PATH, id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let client = ApiClient::new("http://api.internal:8080/smarthub").unwrap();
        assert_eq!(client.base_url().as_str(), "http://api.internal:8080/smarthub/");
        assert_eq!(
            client.url(ORDER_LINE_PATH).unwrap().as_str(),
            "http://api.internal:8080/smarthub/api/OrderLine"
        );
    }

    #[test]
    fn relative_base_url_is_rejected() {
        assert!(matches!(
            ApiClient::new("smarthub/api"),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}
