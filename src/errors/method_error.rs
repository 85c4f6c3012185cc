use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodErrorKind {
    InvalidUrl,
    InvalidDefinition,
    Encoding,
    UnsupportedContentType,
    Io,
    Network,
    EmptyHookPath,
    CredentialFetchFailed,
    UnsupportedTokenExtraction,
    TokenPathNotFound,
    UnknownAuthStrategy,
}

impl MethodErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            MethodErrorKind::InvalidUrl => "INVALID_URL",
            MethodErrorKind::InvalidDefinition => "INVALID_DEFINITION",
            MethodErrorKind::Encoding => "ENCODING_ERROR",
            MethodErrorKind::UnsupportedContentType => "UNSUPPORTED_CONTENT_TYPE",
            MethodErrorKind::Io => "IO_ERROR",
            MethodErrorKind::Network => "NETWORK_ERROR",
            MethodErrorKind::EmptyHookPath => "EMPTY_HOOK_PATH",
            MethodErrorKind::CredentialFetchFailed => "CREDENTIAL_FETCH_FAILED",
            MethodErrorKind::UnsupportedTokenExtraction => "UNSUPPORTED_TOKEN_EXTRACTION",
            MethodErrorKind::TokenPathNotFound => "TOKEN_PATH_NOT_FOUND",
            MethodErrorKind::UnknownAuthStrategy => "UNKNOWN_AUTH_STRATEGY",
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct MethodError {
    pub kind: MethodErrorKind,
    pub message: String,
    pub hint: Option<String>,
}

impl MethodError {
    pub fn new(kind: MethodErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Prefixes the message, keeping kind and hint.
    pub fn context(mut self, prefix: &str) -> Self {
        self.message = format!("{}: {}", prefix, self.message);
        self
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn invalid_url(message: impl Into<String>) -> Self {
        Self::new(MethodErrorKind::InvalidUrl, message)
    }

    pub fn invalid_definition(message: impl Into<String>) -> Self {
        Self::new(MethodErrorKind::InvalidDefinition, message)
    }

    pub fn encoding(message: impl Into<String>) -> Self {
        Self::new(MethodErrorKind::Encoding, message)
    }

    pub fn unsupported_content_type(content_type: Option<&str>) -> Self {
        let message = match content_type {
            Some(value) if !value.is_empty() => {
                format!("No request body encoder available for {}", value)
            }
            _ => "No request body encoder available without a Content-Type header".to_string(),
        };
        Self::new(MethodErrorKind::UnsupportedContentType, message).with_hint(
            "Use one of application/json, application/x-www-form-urlencoded, multipart/form-data, or send the body through bodyStr.",
        )
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(MethodErrorKind::Io, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(MethodErrorKind::Network, message)
    }

    pub fn empty_hook_path() -> Self {
        Self::new(
            MethodErrorKind::EmptyHookPath,
            "unable to run authentication hook for empty request",
        )
        .with_hint("Set authenticationHook.requestPath or remove the authenticationHook block.")
    }

    pub fn credential_fetch_failed(status: impl Into<String>) -> Self {
        Self::new(
            MethodErrorKind::CredentialFetchFailed,
            format!("failed to retrieve credentials: {}", status.into()),
        )
    }

    pub fn unsupported_token_extraction(message: impl Into<String>) -> Self {
        Self::new(MethodErrorKind::UnsupportedTokenExtraction, message)
    }

    pub fn token_path_not_found(path: &str) -> Self {
        Self::new(
            MethodErrorKind::TokenPathNotFound,
            format!("unable to retrieve token by path {}", path),
        )
    }

    pub fn unknown_auth_strategy() -> Self {
        Self::new(
            MethodErrorKind::UnknownAuthStrategy,
            "unknown auth strategy should use one of [bearerToken, authHeader, environmentVariable]",
        )
    }
}

impl From<std::io::Error> for MethodError {
    fn from(err: std::io::Error) -> Self {
        MethodError::io(err.to_string())
    }
}

impl From<url::ParseError> for MethodError {
    fn from(err: url::ParseError) -> Self {
        MethodError::invalid_url(err.to_string())
    }
}

impl From<serde_yaml::Error> for MethodError {
    fn from(err: serde_yaml::Error) -> Self {
        MethodError::invalid_definition(err.to_string())
    }
}

impl From<reqwest::Error> for MethodError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return MethodError::network("HTTP request timed out");
        }
        MethodError::network(format!("unable to make request: {}", err))
    }
}
