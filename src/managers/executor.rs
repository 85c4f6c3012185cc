use crate::constants::{network::TIMEOUT_REQUEST_MS, protocols::ALLOWED_HTTP};
use crate::errors::MethodError;
use crate::models::{RequestDefinition, RequestResult};
use crate::services::logger::Logger;
use crate::utils::body::{encode_body, Payload};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use url::Url;

/// Issues single HTTP calls. Never retries; retries belong to the pipeline.
#[derive(Clone)]
pub struct RequestExecutor {
    logger: Logger,
    client: Client,
}

impl RequestExecutor {
    pub fn new(logger: Logger) -> Result<Self, MethodError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(TIMEOUT_REQUEST_MS))
            .build()
            .map_err(|err| MethodError::network(format!("Failed to build HTTP client: {}", err)))?;
        Ok(Self {
            logger: logger.child("http"),
            client,
        })
    }

    pub async fn execute(
        &self,
        definition: &RequestDefinition,
    ) -> Result<RequestResult, MethodError> {
        let url = parse_url(&definition.url)?;
        let method = parse_method(&definition.method)?;
        let encoded = encode_body(definition).await?;
        let headers = build_headers(&definition.headers, &encoded.headers)?;

        let mut req = self.client.request(method.clone(), url.clone());
        req = match encoded.payload {
            Payload::Empty => req,
            Payload::Bytes(bytes) => req.body(bytes),
            Payload::Multipart(form) => req.multipart(form),
        };
        // Applied last so the single Content-Type replaces the one `multipart` appends.
        req = req.headers(headers);

        self.logger.debug(
            "Making a request",
            Some(&serde_json::json!({"method": method.as_str(), "url": url.as_str()})),
        );

        let started = Instant::now();
        let response = req.send().await?;
        let status = response.status();
        let response_headers = response.headers().clone();
        let body = response.bytes().await?;
        let elapsed = started.elapsed();

        self.logger.debug(
            "Request finished",
            Some(&serde_json::json!({
                "status": status.as_u16(),
                "duration_ms": elapsed.as_millis(),
                "body_bytes": body.len(),
            })),
        );

        Ok(RequestResult::new(status, response_headers, body, elapsed))
    }
}

fn parse_url(raw: &str) -> Result<Url, MethodError> {
    let parsed = Url::parse(raw.trim())
        .map_err(|err| MethodError::invalid_url(format!("Invalid URL '{}': {}", raw, err)))?;
    if !scheme_allowed(parsed.scheme()) {
        return Err(MethodError::invalid_url(format!(
            "Only http/https URLs are supported, got '{}'",
            raw
        )));
    }
    Ok(parsed)
}

fn scheme_allowed(scheme: &str) -> bool {
    let normalized = scheme.trim_end_matches(':');
    ALLOWED_HTTP
        .iter()
        .any(|allowed| allowed.trim_end_matches(':') == normalized)
}

fn parse_method(raw: &str) -> Result<Method, MethodError> {
    let normalized = raw.trim().to_uppercase();
    if normalized.is_empty() {
        return Ok(Method::GET);
    }
    Method::from_bytes(normalized.as_bytes())
        .map_err(|_| MethodError::invalid_definition(format!("Invalid HTTP method '{}'", raw)))
}

/// Declared headers first, then encoder headers, which replace same-named ones.
fn build_headers(
    declared: &BTreeMap<String, String>,
    overrides: &BTreeMap<String, String>,
) -> Result<HeaderMap, MethodError> {
    let mut map = HeaderMap::new();
    for (key, value) in declared.iter().chain(overrides.iter()) {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
            MethodError::invalid_definition(format!("Invalid header name '{}'", key))
        })?;
        let val = HeaderValue::from_str(value).map_err(|_| {
            MethodError::invalid_definition(format!("Invalid value for header '{}'", key))
        })?;
        map.insert(name, val);
    }
    Ok(map)
}
