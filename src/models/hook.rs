use super::null_as_default;
use crate::constants::headers::FORMAT_PLACEHOLDER;
use crate::errors::MethodError;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Headers produced by a successful authentication hook.
pub type AuthHeaders = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawAuthenticationHook")]
pub struct AuthenticationHook {
    pub triggers: Vec<AuthenticationTrigger>,
    pub request_path: String,
    pub json_parse_body_path: String,
    /// `None` loads fine and fails with `UnknownAuthStrategy` when the hook runs.
    pub strategy: Option<AuthStrategy>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationTrigger {
    #[serde(default, deserialize_with = "null_as_default")]
    pub on_http_status: Vec<u16>,
    #[serde(default)]
    pub on_json_value: Option<OnJsonValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OnJsonValue {
    pub path: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStrategy {
    BearerToken,
    AuthHeader {
        header: String,
        format_string: String,
    },
    EnvironmentVariable {
        variable: String,
    },
}

impl AuthStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            AuthStrategy::BearerToken => "BearerToken",
            AuthStrategy::AuthHeader { .. } => "AuthHeader",
            AuthStrategy::EnvironmentVariable { .. } => "EnvironmentVariable",
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAuthenticationHook {
    #[serde(default, deserialize_with = "null_as_default")]
    triggers: Vec<AuthenticationTrigger>,
    #[serde(default, deserialize_with = "null_as_default")]
    request_path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    json_parse_body_path: String,
    #[serde(default)]
    bearer_token: Option<RawBearerToken>,
    #[serde(default)]
    auth_header: Option<RawAuthHeader>,
    #[serde(default)]
    environment_variable: Option<RawEnvironmentVariable>,
}

#[derive(Deserialize)]
struct RawBearerToken {}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAuthHeader {
    header: String,
    format_string: String,
}

#[derive(Deserialize)]
struct RawEnvironmentVariable {
    variable: String,
}

impl TryFrom<RawAuthenticationHook> for AuthenticationHook {
    type Error = MethodError;

    fn try_from(raw: RawAuthenticationHook) -> Result<Self, Self::Error> {
        let mut strategies = Vec::new();
        if raw.bearer_token.is_some() {
            strategies.push(AuthStrategy::BearerToken);
        }
        if let Some(auth_header) = raw.auth_header {
            if auth_header.header.trim().is_empty() {
                return Err(MethodError::invalid_definition(
                    "authHeader.header must be a non-empty header name",
                ));
            }
            let placeholders = auth_header.format_string.matches(FORMAT_PLACEHOLDER).count();
            if placeholders != 1 {
                return Err(MethodError::invalid_definition(format!(
                    "authHeader.formatString must contain exactly one {} placeholder, found {}",
                    FORMAT_PLACEHOLDER, placeholders
                )));
            }
            strategies.push(AuthStrategy::AuthHeader {
                header: auth_header.header,
                format_string: auth_header.format_string,
            });
        }
        if let Some(env) = raw.environment_variable {
            if env.variable.trim().is_empty() {
                return Err(MethodError::invalid_definition(
                    "environmentVariable.variable must be a non-empty name",
                ));
            }
            strategies.push(AuthStrategy::EnvironmentVariable {
                variable: env.variable,
            });
        }
        if strategies.len() > 1 {
            let names: Vec<&str> = strategies.iter().map(AuthStrategy::name).collect();
            return Err(MethodError::invalid_definition(format!(
                "authenticationHook configures more than one strategy: {}",
                names.join(", ")
            ))
            .with_hint("Keep exactly one of bearerToken, authHeader, environmentVariable."));
        }
        Ok(AuthenticationHook {
            triggers: raw.triggers,
            request_path: raw.request_path,
            json_parse_body_path: raw.json_parse_body_path,
            strategy: strategies.pop(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthStrategy, AuthenticationHook};

    #[test]
    fn parses_bearer_hook_with_triggers() {
        let raw = r#"
triggers:
  - onHttpStatus: [401, 403]
  - onJsonValue:
      path: error.code
      value: expired
requestPath: ./login.yaml
jsonParseBodyPath: token
bearerToken: {}
"#;
        let hook: AuthenticationHook = serde_yaml::from_str(raw).unwrap();
        assert_eq!(hook.triggers.len(), 2);
        assert_eq!(hook.triggers[0].on_http_status, vec![401, 403]);
        assert!(hook.triggers[0].on_json_value.is_none());
        assert_eq!(
            hook.triggers[1].on_json_value.as_ref().map(|v| v.value.as_str()),
            Some("expired")
        );
        assert_eq!(hook.strategy, Some(AuthStrategy::BearerToken));
    }

    #[test]
    fn parses_auth_header_strategy() {
        let raw = "requestPath: a.yaml\nauthHeader:\n  header: X-Token\n  formatString: Token %s\n";
        let hook: AuthenticationHook = serde_yaml::from_str(raw).unwrap();
        assert_eq!(
            hook.strategy,
            Some(AuthStrategy::AuthHeader {
                header: "X-Token".into(),
                format_string: "Token %s".into()
            })
        );
    }

    #[test]
    fn hook_without_strategy_still_loads() {
        let hook: AuthenticationHook = serde_yaml::from_str("requestPath: a.yaml\n").unwrap();
        assert!(hook.strategy.is_none());
        assert!(hook.triggers.is_empty());
    }

    #[test]
    fn rejects_multiple_strategies() {
        let raw = "requestPath: a.yaml\nbearerToken: {}\nenvironmentVariable:\n  variable: TOKEN\n";
        let err = serde_yaml::from_str::<AuthenticationHook>(raw).unwrap_err();
        assert!(err.to_string().contains("more than one strategy"));
    }

    #[test]
    fn rejects_format_string_without_single_placeholder() {
        let raw = "requestPath: a.yaml\nauthHeader:\n  header: X-Token\n  formatString: \"%s %s\"\n";
        let err = serde_yaml::from_str::<AuthenticationHook>(raw).unwrap_err();
        assert!(err.to_string().contains("exactly one %s placeholder"));
    }
}
