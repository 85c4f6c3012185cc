use super::{null_as_default, AuthenticationHook, ConfigValue, Scalar};
use crate::constants::headers::CONTENT_TYPE;
use crate::errors::MethodError;
use serde::Deserialize;
use std::collections::BTreeMap;

/// A declarative HTTP call as loaded from a request document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDefinition {
    #[serde(default, deserialize_with = "null_as_default")]
    pub method: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub body_str: Option<String>,
    #[serde(default)]
    pub body: Option<ConfigValue>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub files: Vec<FileDefinition>,
    #[serde(default)]
    pub authentication_hook: Option<AuthenticationHook>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDefinition {
    pub request_body_path: String,
    pub file_path: String,
}

/// Which of the mutually exclusive body fields is in effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RequestBody<'a> {
    None,
    Raw(&'a str),
    Structured(&'a ConfigValue),
}

impl RequestDefinition {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn body(&self) -> RequestBody<'_> {
        match (&self.body, self.body_str.as_deref()) {
            (Some(ConfigValue::Scalar(Scalar::Null)), Some(raw)) if !raw.is_empty() => {
                RequestBody::Raw(raw)
            }
            (Some(ConfigValue::Scalar(Scalar::Null)), _) => RequestBody::None,
            (Some(value), _) => RequestBody::Structured(value),
            (None, Some(raw)) if !raw.is_empty() => RequestBody::Raw(raw),
            (None, _) => RequestBody::None,
        }
    }

    /// Checks the invariants a document must satisfy before it is executed.
    pub fn validate(&self) -> Result<(), MethodError> {
        let has_structured = matches!(
            &self.body,
            Some(value) if *value != ConfigValue::null()
        );
        let has_raw = self.body_str.as_deref().is_some_and(|raw| !raw.is_empty());
        if has_structured && has_raw {
            return Err(MethodError::invalid_definition(
                "request definition sets both body and bodyStr",
            )
            .with_hint("Keep exactly one of body (structured) or bodyStr (raw text)."));
        }
        Ok(())
    }

    /// Declared Content-Type; an exact `Content-Type` key wins over other casings.
    pub fn content_type(&self) -> Option<&str> {
        if let Some(value) = self.headers.get(CONTENT_TYPE) {
            return Some(value.as_str());
        }
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE))
            .map(|(_, value)| value.as_str())
    }
}
