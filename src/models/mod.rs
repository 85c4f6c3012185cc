mod definition;
mod hook;
mod result;
mod value;

pub use definition::{FileDefinition, RequestBody, RequestDefinition};
pub use hook::{AuthHeaders, AuthStrategy, AuthenticationHook, AuthenticationTrigger, OnJsonValue};
pub use result::RequestResult;
pub use value::{ConfigValue, Scalar};

use serde::{Deserialize, Deserializer};

/// Treats an explicit YAML `~`/empty value the same as an absent field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
