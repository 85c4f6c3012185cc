use serde::Deserialize;

/// Untyped configuration tree as written in a request document.
///
/// Map keys keep their original type (YAML allows `1: one` or `true: yes`),
/// so encoders must normalize them before producing JSON or form data.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "serde_yaml::Value")]
pub enum ConfigValue {
    Map(Vec<(ConfigValue, ConfigValue)>),
    Sequence(Vec<ConfigValue>),
    Scalar(Scalar),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
}

impl Scalar {
    /// Text form used for form fields and coerced map keys.
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Null => String::new(),
            Scalar::Bool(flag) => flag.to_string(),
            Scalar::Int(num) => num.to_string(),
            Scalar::UInt(num) => num.to_string(),
            Scalar::Float(num) => num.to_string(),
            Scalar::String(text) => text.clone(),
        }
    }
}

impl ConfigValue {
    pub fn string(value: impl Into<String>) -> Self {
        ConfigValue::Scalar(Scalar::String(value.into()))
    }

    pub fn int(value: i64) -> Self {
        ConfigValue::Scalar(Scalar::Int(value))
    }

    pub fn null() -> Self {
        ConfigValue::Scalar(Scalar::Null)
    }

    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<ConfigValue>,
        V: Into<ConfigValue>,
    {
        ConfigValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::string(value)
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::string(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::int(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Scalar(Scalar::Bool(value))
    }
}

impl From<serde_yaml::Value> for ConfigValue {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => ConfigValue::null(),
            serde_yaml::Value::Bool(flag) => ConfigValue::Scalar(Scalar::Bool(flag)),
            serde_yaml::Value::Number(num) => {
                if let Some(int) = num.as_i64() {
                    ConfigValue::Scalar(Scalar::Int(int))
                } else if let Some(uint) = num.as_u64() {
                    ConfigValue::Scalar(Scalar::UInt(uint))
                } else {
                    ConfigValue::Scalar(Scalar::Float(num.as_f64().unwrap_or(f64::NAN)))
                }
            }
            serde_yaml::Value::String(text) => ConfigValue::string(text),
            serde_yaml::Value::Sequence(items) => {
                ConfigValue::Sequence(items.into_iter().map(ConfigValue::from).collect())
            }
            serde_yaml::Value::Mapping(map) => ConfigValue::Map(
                map.into_iter()
                    .map(|(k, v)| (ConfigValue::from(k), ConfigValue::from(v)))
                    .collect(),
            ),
            serde_yaml::Value::Tagged(tagged) => ConfigValue::from(tagged.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigValue, Scalar};

    #[test]
    fn yaml_keeps_non_string_keys() {
        let parsed: ConfigValue = serde_yaml::from_str("1: one\nnested:\n  true: yes\n").unwrap();
        let ConfigValue::Map(entries) = parsed else {
            panic!("expected map");
        };
        assert_eq!(entries[0].0, ConfigValue::Scalar(Scalar::Int(1)));
        let ConfigValue::Map(nested) = &entries[1].1 else {
            panic!("expected nested map");
        };
        assert_eq!(nested[0].0, ConfigValue::Scalar(Scalar::Bool(true)));
    }

    #[test]
    fn scalars_render_as_text() {
        assert_eq!(Scalar::Int(-4).to_text(), "-4");
        assert_eq!(Scalar::Bool(false).to_text(), "false");
        assert_eq!(Scalar::Null.to_text(), "");
        assert_eq!(Scalar::Float(1.5).to_text(), "1.5");
    }
}
