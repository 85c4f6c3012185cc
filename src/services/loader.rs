use crate::errors::MethodError;
use crate::models::RequestDefinition;
use crate::services::environment::EnvironmentSink;
use crate::services::logger::Logger;
use crate::utils::template::substitute_env;
use crate::utils::user_paths::resolve_user_path;
use std::path::Path;
use std::sync::Arc;

/// Reads request documents, substituting environment placeholders first.
#[derive(Clone)]
pub struct DefinitionLoader {
    logger: Logger,
    env: Arc<dyn EnvironmentSink>,
}

impl DefinitionLoader {
    pub fn new(logger: Logger, env: Arc<dyn EnvironmentSink>) -> Self {
        Self {
            logger: logger.child("loader"),
            env,
        }
    }

    pub fn environment(&self) -> Arc<dyn EnvironmentSink> {
        self.env.clone()
    }

    pub fn parse(&self, text: &str) -> Result<RequestDefinition, MethodError> {
        let substituted = substitute_env(text, |name| self.env.var(name));
        let definition: RequestDefinition = serde_yaml::from_str(&substituted)?;
        definition.validate()?;
        Ok(definition)
    }

    pub async fn load(&self, path: &Path) -> Result<RequestDefinition, MethodError> {
        self.logger.debug(
            "Reading request definition",
            Some(&serde_json::json!({"path": path.display().to_string()})),
        );
        let text = tokio::fs::read_to_string(path).await.map_err(|err| {
            MethodError::io(format!(
                "unable to read request definition {}: {}",
                path.display(),
                err
            ))
        })?;
        self.parse(&text)
            .map_err(|err| err.context(&format!("invalid request definition {}", path.display())))
    }

    /// Loads a document referenced from another one, e.g. a hook's `requestPath`.
    pub async fn load_reference(&self, reference: &str) -> Result<RequestDefinition, MethodError> {
        self.load(&resolve_user_path(reference)).await
    }
}

#[cfg(test)]
mod tests {
    use super::DefinitionLoader;
    use crate::errors::MethodErrorKind;
    use crate::services::environment::MemoryEnvironment;
    use crate::services::logger::Logger;
    use std::sync::Arc;

    fn loader(env: MemoryEnvironment) -> DefinitionLoader {
        DefinitionLoader::new(Logger::new("test"), Arc::new(env))
    }

    #[test]
    fn substitutes_placeholders_before_parsing() {
        let loader = loader(MemoryEnvironment::new().with_var("API_TOKEN", "s3cr3t"));
        let definition = loader
            .parse("method: GET\nurl: http://localhost/x\nheaders:\n  X-Api-Key: key-${API_TOKEN}\n")
            .unwrap();
        assert_eq!(definition.headers.get("X-Api-Key").map(String::as_str), Some("key-s3cr3t"));
    }

    #[test]
    fn invalid_yaml_is_invalid_definition() {
        let err = loader(MemoryEnvironment::new()).parse("method: [\n").unwrap_err();
        assert_eq!(err.kind, MethodErrorKind::InvalidDefinition);
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let err = loader(MemoryEnvironment::new())
            .load_reference("/no/such/request.yaml")
            .await
            .unwrap_err();
        assert_eq!(err.kind, MethodErrorKind::Io);
    }
}
