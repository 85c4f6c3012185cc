use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static ENV_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\$|\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .expect("env placeholder regex")
});

/// Replaces `${VAR}`, `${VAR:-default}` and `$VAR` using `lookup`.
///
/// Unset variables expand to an empty string (or the default when given);
/// `$$` produces a literal `$`. Anything else is left untouched.
pub fn substitute_env<F>(text: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ENV_PLACEHOLDER
        .replace_all(text, |caps: &Captures| {
            if &caps[0] == "$$" {
                return "$".to_string();
            }
            if let Some(name) = caps.get(1) {
                return match lookup(name.as_str()) {
                    Some(value) if !value.is_empty() => value,
                    _ => caps
                        .get(2)
                        .map(|m| m.as_str().to_string())
                        .unwrap_or_default(),
                };
            }
            caps.get(3)
                .and_then(|name| lookup(name.as_str()))
                .unwrap_or_default()
        })
        .into_owned()
}

/// Formats `template` by substituting its single `%s` placeholder with `value`.
pub fn fill_placeholder(template: &str, placeholder: &str, value: &str) -> String {
    template.replacen(placeholder, value, 1)
}
