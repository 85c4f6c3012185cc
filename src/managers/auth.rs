use crate::constants::content_types::JSON;
use crate::constants::headers::{AUTHORIZATION, BEARER_FORMAT, FORMAT_PLACEHOLDER};
use crate::constants::network::CREDENTIAL_FAILURE_STATUS;
use crate::errors::MethodError;
use crate::models::{AuthHeaders, AuthStrategy, AuthenticationHook, RequestResult};
use crate::services::environment::EnvironmentSink;
use crate::services::logger::Logger;
use crate::utils::data_path::get_path_str;
use crate::utils::template::fill_placeholder;
use async_trait::async_trait;

/// Loads and executes the definition a hook points at.
#[async_trait]
pub trait RequestDoer: Send + Sync {
    async fn do_request(&self, request_path: &str) -> Result<RequestResult, MethodError>;
}

/// Re-reads the original definition so fresh environment values apply.
#[async_trait]
pub trait DefinitionRefresher: Send {
    async fn refresh_definition(&mut self) -> Result<(), MethodError>;
}

pub trait ResultPrinter: Send + Sync {
    fn print_request_result(&self, result: &RequestResult);
}

enum HookState {
    FetchCredential,
    ExtractToken(RequestResult),
    InjectToken(String),
    Done(AuthHeaders),
}

pub struct AuthenticationHookRunner<'a> {
    logger: Logger,
    doer: &'a dyn RequestDoer,
    env: &'a dyn EnvironmentSink,
    printer: &'a dyn ResultPrinter,
}

impl<'a> AuthenticationHookRunner<'a> {
    pub fn new(
        logger: &Logger,
        doer: &'a dyn RequestDoer,
        env: &'a dyn EnvironmentSink,
        printer: &'a dyn ResultPrinter,
    ) -> Self {
        Self {
            logger: logger.child("auth"),
            doer,
            env,
            printer,
        }
    }

    /// Fetches a credential, extracts the token and injects it.
    ///
    /// Returns the headers the caller merges before its single retry. The
    /// environment-variable strategy returns no headers; it refreshes the
    /// definition through `refresher` instead.
    pub async fn run(
        &self,
        hook: &AuthenticationHook,
        refresher: &mut dyn DefinitionRefresher,
    ) -> Result<AuthHeaders, MethodError> {
        let mut state = HookState::FetchCredential;
        loop {
            state = match state {
                HookState::FetchCredential => {
                    HookState::ExtractToken(self.fetch_credential(hook).await?)
                }
                HookState::ExtractToken(result) => HookState::InjectToken(
                    extract_token(hook, &result)
                        .map_err(|err| err.context("Unable to parse auth token from response"))?,
                ),
                HookState::InjectToken(token) => {
                    HookState::Done(self.inject_token(hook, &token, refresher).await?)
                }
                HookState::Done(headers) => return Ok(headers),
            };
        }
    }

    async fn fetch_credential(
        &self,
        hook: &AuthenticationHook,
    ) -> Result<RequestResult, MethodError> {
        self.logger.debug(
            "Running authentication hook",
            Some(&serde_json::json!({"request_path": hook.request_path})),
        );
        let result = self.doer.do_request(&hook.request_path).await?;
        self.printer.print_request_result(&result);
        if result.status().as_u16() >= CREDENTIAL_FAILURE_STATUS {
            return Err(MethodError::credential_fetch_failed(result.status_line()));
        }
        Ok(result)
    }

    async fn inject_token(
        &self,
        hook: &AuthenticationHook,
        token: &str,
        refresher: &mut dyn DefinitionRefresher,
    ) -> Result<AuthHeaders, MethodError> {
        let strategy = hook
            .strategy
            .as_ref()
            .ok_or_else(MethodError::unknown_auth_strategy)?;
        self.logger.info(&format!("Using {}", strategy.name()), None);
        match strategy {
            AuthStrategy::BearerToken => Ok(self.header(AUTHORIZATION, BEARER_FORMAT, token)),
            AuthStrategy::AuthHeader {
                header,
                format_string,
            } => Ok(self.header(header, format_string, token)),
            AuthStrategy::EnvironmentVariable { variable } => {
                self.env.set_var(variable, token);
                refresher.refresh_definition().await.map_err(|err| {
                    err.context("unable to reload request definition after setting the token")
                })?;
                Ok(AuthHeaders::new())
            }
        }
    }

    fn header(&self, name: &str, format_string: &str, token: &str) -> AuthHeaders {
        self.logger.info(&format!("added header {}", name), None);
        AuthHeaders::from([(
            name.to_string(),
            fill_placeholder(format_string, FORMAT_PLACEHOLDER, token),
        )])
    }
}

/// Pulls the token string out of a credential response.
pub fn extract_token(
    hook: &AuthenticationHook,
    result: &RequestResult,
) -> Result<String, MethodError> {
    if hook.json_parse_body_path.trim().is_empty() {
        return Err(MethodError::unsupported_token_extraction(
            "unable to get auth token, invalid parse strategy use: [jsonParseBodyPath]",
        ));
    }
    if !result.content_type().contains(JSON) {
        return Err(MethodError::unsupported_token_extraction(
            "unable to parse json path from non-json auth response",
        ));
    }
    let body: serde_json::Value = serde_json::from_slice(result.body()).map_err(|err| {
        MethodError::unsupported_token_extraction(format!(
            "unable to unmarshal auth hook body: {}",
            err
        ))
    })?;
    get_path_str(&body, &hook.json_parse_body_path)
        .map(str::to_string)
        .ok_or_else(|| MethodError::token_path_not_found(&hook.json_parse_body_path))
}
