use crate::constants::cache::{FILE_MODE, TMP_MARKER};
use crate::errors::MethodError;
use crate::models::{null_as_default, RequestDefinition};
use crate::services::logger::Logger;
use crate::utils::fs_atomic::atomic_write_text_file;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Sidecar document: the header set of the last successful invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedHeaders {
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: BTreeMap<String, String>,
}

/// `dir/name.ext` becomes `dir/.name.tmp.ext`; only the last extension moves.
pub fn sidecar_path(config_path: impl AsRef<Path>) -> PathBuf {
    let config_path = config_path.as_ref();
    let file_name = config_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let sidecar_name = match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!(".{}.{}.{}", stem, TMP_MARKER, ext),
        _ => format!(".{}.{}", file_name, TMP_MARKER),
    };
    match config_path.parent() {
        Some(dir) => dir.join(sidecar_name),
        None => PathBuf::from(sidecar_name),
    }
}

/// Copies every cached header the definition lacks (absent or empty).
/// Headers already set on the definition always win.
pub fn merge_cached(original: &mut RequestDefinition, cached: &CachedHeaders) {
    for (name, value) in &cached.headers {
        let missing = original
            .headers
            .get(name)
            .map(|current| current.is_empty())
            .unwrap_or(true);
        if missing {
            original.headers.insert(name.clone(), value.clone());
        }
    }
}

#[derive(Clone)]
pub struct CredentialCache {
    logger: Logger,
    path: PathBuf,
}

impl CredentialCache {
    pub fn for_definition(logger: Logger, config_path: &Path) -> Self {
        Self {
            logger: logger.child("cache"),
            path: sidecar_path(config_path),
        }
    }

    /// `Ok(None)` when no sidecar exists yet.
    pub async fn read(&self) -> Result<Option<CachedHeaders>, MethodError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                self.logger.debug(
                    "No cached headers",
                    Some(&serde_json::json!({"path": self.path.display().to_string()})),
                );
                return Ok(None);
            }
            Err(err) => {
                return Err(MethodError::io(format!(
                    "unable to read cache file {}: {}",
                    self.path.display(),
                    err
                )))
            }
        };
        let cached: CachedHeaders = serde_yaml::from_str(&raw).map_err(|err| {
            MethodError::invalid_definition(format!(
                "unable to parse cache file {}: {}",
                self.path.display(),
                err
            ))
            .with_hint("Delete the cache file to start without cached headers.")
        })?;
        self.logger.debug(
            "Loaded cached headers",
            Some(&serde_json::json!({
                "path": self.path.display().to_string(),
                "headers": cached.headers.keys().collect::<Vec<_>>(),
            })),
        );
        Ok(Some(cached))
    }

    pub fn write(&self, headers: &BTreeMap<String, String>) -> Result<(), MethodError> {
        let document = CachedHeaders {
            headers: headers.clone(),
        };
        let text = serde_yaml::to_string(&document).map_err(|err| {
            MethodError::encoding(format!("unable to serialize cached headers: {}", err))
        })?;
        atomic_write_text_file(&self.path, &text, FILE_MODE).map_err(|err| {
            MethodError::io(format!(
                "unable to write cache file {}: {}",
                self.path.display(),
                err
            ))
        })?;
        self.logger.debug(
            "Wrote cached headers",
            Some(&serde_json::json!({"path": self.path.display().to_string()})),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{merge_cached, sidecar_path, CachedHeaders};
    use crate::models::RequestDefinition;
    use std::collections::BTreeMap;
    use std::path::Path;

    #[test]
    fn sidecar_path_is_a_dotfile_sibling() {
        assert_eq!(sidecar_path("a/b/report.yaml"), Path::new("a/b/.report.tmp.yaml"));
        assert_eq!(sidecar_path("report.yaml"), Path::new(".report.tmp.yaml"));
        assert_eq!(sidecar_path("a/b.c.yaml"), Path::new("a/.b.c.tmp.yaml"));
        assert_eq!(sidecar_path("/abs/req.yml"), Path::new("/abs/.req.tmp.yml"));
    }

    #[test]
    fn sidecar_path_without_extension() {
        assert_eq!(sidecar_path("dir/request"), Path::new("dir/.request.tmp"));
    }

    fn cached(pairs: &[(&str, &str)]) -> CachedHeaders {
        CachedHeaders {
            headers: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn merge_fills_missing_and_empty_headers_only() {
        let mut definition = RequestDefinition::new("GET", "http://x")
            .with_header("Accept", "text/plain")
            .with_header("X-Empty", "");
        merge_cached(
            &mut definition,
            &cached(&[
                ("Authorization", "Bearer T1"),
                ("Accept", "application/json"),
                ("X-Empty", "filled"),
            ]),
        );
        assert_eq!(definition.headers["Authorization"], "Bearer T1");
        assert_eq!(definition.headers["Accept"], "text/plain");
        assert_eq!(definition.headers["X-Empty"], "filled");
    }

    #[test]
    fn merge_is_idempotent() {
        let source = cached(&[("Authorization", "Bearer T1"), ("X-Trace", "1")]);
        let mut once = RequestDefinition::new("GET", "http://x").with_header("X-Trace", "mine");
        merge_cached(&mut once, &source);
        let mut twice = once.clone();
        merge_cached(&mut twice, &source);
        assert_eq!(once, twice);
    }

    #[test]
    fn sidecar_document_parses_with_extra_fields() {
        let doc: CachedHeaders =
            serde_yaml::from_str("method: GET\nheaders:\n  Authorization: Bearer T1\n").unwrap();
        assert_eq!(doc.headers["Authorization"], "Bearer T1");
    }
}
