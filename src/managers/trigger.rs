use crate::errors::MethodError;
use crate::models::{AuthenticationHook, AuthenticationTrigger, RequestResult};
use crate::utils::data_path::get_path_str;
use serde_json::Value;

/// Decides whether `result` calls for running the authentication hook.
///
/// No hook means no authentication. A hook without `requestPath` is a
/// configuration error rather than a silent no-op.
pub fn should_authenticate(
    result: &RequestResult,
    hook: Option<&AuthenticationHook>,
) -> Result<bool, MethodError> {
    let Some(hook) = hook else {
        return Ok(false);
    };
    if hook.request_path.trim().is_empty() {
        return Err(MethodError::empty_hook_path());
    }
    Ok(matching_trigger(result, &hook.triggers).is_some())
}

/// Index of the first trigger that fires, in declared order.
///
/// Status membership is checked first and short-circuits the trigger. A body
/// that is not valid JSON never matches `onJsonValue`; evaluation moves on.
pub fn matching_trigger(
    result: &RequestResult,
    triggers: &[AuthenticationTrigger],
) -> Option<usize> {
    let status = result.status().as_u16();
    let mut parsed: Option<Option<Value>> = None;
    for (index, trigger) in triggers.iter().enumerate() {
        if trigger.on_http_status.contains(&status) {
            return Some(index);
        }
        let Some(expected) = &trigger.on_json_value else {
            continue;
        };
        if result.body().is_empty() {
            continue;
        }
        let body = parsed.get_or_insert_with(|| serde_json::from_slice(result.body()).ok());
        let Some(body) = body.as_ref() else {
            continue;
        };
        if get_path_str(body, &expected.path) == Some(expected.value.as_str()) {
            return Some(index);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{matching_trigger, should_authenticate};
    use crate::errors::MethodErrorKind;
    use crate::models::{AuthenticationHook, AuthenticationTrigger, OnJsonValue, RequestResult};
    use bytes::Bytes;
    use reqwest::header::HeaderMap;
    use reqwest::StatusCode;
    use std::time::Duration;

    fn result(status: u16, body: &'static str) -> RequestResult {
        RequestResult::new(
            StatusCode::from_u16(status).unwrap(),
            HeaderMap::new(),
            Bytes::from_static(body.as_bytes()),
            Duration::ZERO,
        )
    }

    fn on_status(codes: &[u16]) -> AuthenticationTrigger {
        AuthenticationTrigger {
            on_http_status: codes.to_vec(),
            on_json_value: None,
        }
    }

    fn on_json(path: &str, value: &str) -> AuthenticationTrigger {
        AuthenticationTrigger {
            on_http_status: Vec::new(),
            on_json_value: Some(OnJsonValue {
                path: path.into(),
                value: value.into(),
            }),
        }
    }

    fn hook(triggers: Vec<AuthenticationTrigger>) -> AuthenticationHook {
        AuthenticationHook {
            triggers,
            request_path: "login.yaml".into(),
            json_parse_body_path: "token".into(),
            strategy: None,
        }
    }

    #[test]
    fn absent_hook_never_authenticates() {
        assert!(!should_authenticate(&result(401, ""), None).unwrap());
    }

    #[test]
    fn present_hook_with_empty_path_is_an_error() {
        let mut hook = hook(vec![on_status(&[401])]);
        hook.request_path = "  ".into();
        let err = should_authenticate(&result(401, ""), Some(&hook)).unwrap_err();
        assert_eq!(err.kind, MethodErrorKind::EmptyHookPath);
    }

    #[test]
    fn status_membership_decides_status_triggers() {
        let hook = hook(vec![on_status(&[401, 403])]);
        assert!(should_authenticate(&result(401, ""), Some(&hook)).unwrap());
        assert!(should_authenticate(&result(403, ""), Some(&hook)).unwrap());
        assert!(!should_authenticate(&result(200, ""), Some(&hook)).unwrap());
    }

    #[test]
    fn status_match_short_circuits_json_condition() {
        let mut trigger = on_status(&[401]);
        trigger.on_json_value = Some(OnJsonValue {
            path: "error".into(),
            value: "never".into(),
        });
        let hook = hook(vec![trigger]);
        assert!(should_authenticate(&result(401, "not json"), Some(&hook)).unwrap());
    }

    #[test]
    fn json_value_must_match_exactly() {
        let body = r#"{"error": {"code": "token_expired"}}"#;
        let matching = hook(vec![on_json("error.code", "token_expired")]);
        assert!(should_authenticate(&result(200, body), Some(&matching)).unwrap());
        let off_by_one = hook(vec![on_json("error.code", "token_expirex")]);
        assert!(!should_authenticate(&result(200, body), Some(&off_by_one)).unwrap());
    }

    #[test]
    fn non_string_json_values_do_not_match() {
        let hook = hook(vec![on_json("code", "401")]);
        assert!(!should_authenticate(&result(200, r#"{"code": 401}"#), Some(&hook)).unwrap());
    }

    #[test]
    fn malformed_json_falls_through_to_next_trigger() {
        let triggers = vec![on_json("error", "expired"), on_status(&[500])];
        assert_eq!(matching_trigger(&result(500, "<html>"), &triggers), Some(1));
        assert_eq!(matching_trigger(&result(200, "<html>"), &triggers), None);
    }

    #[test]
    fn first_matching_trigger_wins() {
        let body = r#"{"state": "expired"}"#;
        let triggers = vec![on_status(&[418]), on_json("state", "expired"), on_status(&[200])];
        assert_eq!(matching_trigger(&result(200, body), &triggers), Some(1));
    }

    #[test]
    fn empty_trigger_list_never_matches() {
        assert!(!should_authenticate(&result(401, ""), Some(&hook(Vec::new()))).unwrap());
    }
}
