use crate::constants::content_types::{FORM_URLENCODED, JSON, MULTIPART_FORM_DATA, OCTET_STREAM};
use crate::constants::headers::CONTENT_TYPE;
use crate::errors::MethodError;
use crate::models::{ConfigValue, FileDefinition, RequestBody, RequestDefinition, Scalar};
use crate::utils::user_paths::{base_name, resolve_user_path};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub enum Payload {
    #[default]
    Empty,
    Bytes(Vec<u8>),
    Multipart(Form),
}

/// Transport payload plus headers that must override the declared ones.
#[derive(Debug, Default)]
pub struct EncodedBody {
    pub payload: Payload,
    pub headers: BTreeMap<String, String>,
}

impl EncodedBody {
    fn bytes(bytes: Vec<u8>) -> Self {
        Self {
            payload: Payload::Bytes(bytes),
            headers: BTreeMap::new(),
        }
    }
}

/// Media type without parameters, lowercased.
pub fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// Converts a config tree into a JSON tree with string keys at every depth.
pub fn normalize(value: &ConfigValue) -> Result<Value, MethodError> {
    match value {
        ConfigValue::Map(entries) => {
            let mut out = serde_json::Map::new();
            for (key, entry) in entries {
                out.insert(normalize_key(key)?, normalize(entry)?);
            }
            Ok(Value::Object(out))
        }
        ConfigValue::Sequence(items) => items
            .iter()
            .map(normalize)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        ConfigValue::Scalar(scalar) => scalar_to_json(scalar),
    }
}

fn normalize_key(key: &ConfigValue) -> Result<String, MethodError> {
    match key {
        ConfigValue::Scalar(Scalar::Null) => Err(MethodError::encoding(
            "unable to use a null map key in a request body",
        )),
        ConfigValue::Scalar(scalar) => Ok(scalar.to_text()),
        ConfigValue::Map(_) | ConfigValue::Sequence(_) => Err(MethodError::encoding(
            "unable to use a map or sequence as a map key in a request body",
        )),
    }
}

fn scalar_to_json(scalar: &Scalar) -> Result<Value, MethodError> {
    Ok(match scalar {
        Scalar::Null => Value::Null,
        Scalar::Bool(flag) => Value::Bool(*flag),
        Scalar::Int(num) => Value::from(*num),
        Scalar::UInt(num) => Value::from(*num),
        Scalar::Float(num) => serde_json::Number::from_f64(*num)
            .map(Value::Number)
            .ok_or_else(|| {
                MethodError::encoding(format!("unable to represent {} as a JSON number", num))
            })?,
        Scalar::String(text) => Value::String(text.clone()),
    })
}

/// Flattens a top-level mapping into ordered `(name, text)` fields.
fn flat_fields(value: &ConfigValue, target: &str) -> Result<Vec<(String, String)>, MethodError> {
    let ConfigValue::Map(entries) = value else {
        return Err(MethodError::encoding(format!(
            "unable to convert a non-mapping body to {} data",
            target
        )));
    };
    let mut fields = Vec::with_capacity(entries.len());
    for (key, entry) in entries {
        let name = normalize_key(key)?;
        let ConfigValue::Scalar(scalar) = entry else {
            return Err(MethodError::encoding(format!(
                "{} field '{}' must be a scalar value",
                target, name
            )));
        };
        fields.push((name, scalar.to_text()));
    }
    Ok(fields)
}

fn encode_json(value: &ConfigValue) -> Result<Vec<u8>, MethodError> {
    let normalized = normalize(value)?;
    serde_json::to_vec(&normalized).map_err(|err| {
        MethodError::encoding(format!("unable to marshal body into json: {}", err))
    })
}

fn encode_form(value: &ConfigValue) -> Result<Vec<u8>, MethodError> {
    let fields = flat_fields(value, FORM_URLENCODED)?;
    serde_urlencoded::to_string(fields)
        .map(String::into_bytes)
        .map_err(|err| MethodError::encoding(format!("unable to encode form body: {}", err)))
}

async fn encode_multipart(
    value: Option<&ConfigValue>,
    files: &[FileDefinition],
) -> Result<EncodedBody, MethodError> {
    let fields = match value {
        Some(value) => flat_fields(value, MULTIPART_FORM_DATA)?,
        None => Vec::new(),
    };
    let mut form = Form::new();
    for (name, text) in fields {
        form = form.text(name, text);
    }
    for file in files {
        let path = resolve_user_path(&file.file_path);
        let content = tokio::fs::read(&path).await.map_err(|err| {
            MethodError::io(format!(
                "unable to read attachment {}: {}",
                path.display(),
                err
            ))
        })?;
        let part = Part::bytes(content)
            .file_name(base_name(&path))
            .mime_str(OCTET_STREAM)
            .map_err(|err| {
                MethodError::encoding(format!("unable to build multipart part: {}", err))
            })?;
        form = form.part(file.request_body_path.clone(), part);
    }
    let content_type = format!("{}; boundary={}", MULTIPART_FORM_DATA, form.boundary());
    Ok(EncodedBody {
        payload: Payload::Multipart(form),
        headers: BTreeMap::from([(CONTENT_TYPE.to_string(), content_type)]),
    })
}

/// Produces the transport body for `definition` based on its Content-Type.
pub async fn encode_body(definition: &RequestDefinition) -> Result<EncodedBody, MethodError> {
    let declared = definition.content_type();
    let media = declared.map(media_type).unwrap_or_default();
    match definition.body() {
        RequestBody::Raw(raw) => Ok(EncodedBody::bytes(raw.as_bytes().to_vec())),
        RequestBody::None => {
            if media == MULTIPART_FORM_DATA && !definition.files.is_empty() {
                return encode_multipart(None, &definition.files).await;
            }
            Ok(EncodedBody::default())
        }
        RequestBody::Structured(value) => match media.as_str() {
            JSON => Ok(EncodedBody::bytes(encode_json(value)?)),
            FORM_URLENCODED => Ok(EncodedBody::bytes(encode_form(value)?)),
            MULTIPART_FORM_DATA => encode_multipart(Some(value), &definition.files).await,
            _ => Err(MethodError::unsupported_content_type(declared)),
        },
    }
}
