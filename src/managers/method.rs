use crate::errors::MethodError;
use crate::managers::auth::{
    AuthenticationHookRunner, DefinitionRefresher, RequestDoer, ResultPrinter,
};
use crate::managers::executor::RequestExecutor;
use crate::managers::trigger::should_authenticate;
use crate::models::{RequestDefinition, RequestResult};
use crate::services::cache::{merge_cached, CredentialCache};
use crate::services::environment::EnvironmentSink;
use crate::services::loader::DefinitionLoader;
use crate::services::logger::Logger;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default)]
pub struct MethodOptions {
    /// Neither read nor write the sidecar file.
    pub no_cache: bool,
}

/// Runs one request document end to end: cache merge, call, optional
/// authentication, single retry, sidecar write.
pub struct MethodRunner {
    logger: Logger,
    loader: DefinitionLoader,
    executor: RequestExecutor,
    printer: Arc<dyn ResultPrinter>,
}

impl MethodRunner {
    pub fn new(
        logger: Logger,
        env: Arc<dyn EnvironmentSink>,
        printer: Arc<dyn ResultPrinter>,
    ) -> Result<Self, MethodError> {
        Ok(Self {
            loader: DefinitionLoader::new(logger.clone(), env),
            executor: RequestExecutor::new(logger.clone())?,
            logger: logger.child("method"),
            printer,
        })
    }

    pub async fn run(
        &self,
        path: &Path,
        options: MethodOptions,
    ) -> Result<RequestResult, MethodError> {
        let mut definition = self.loader.load(path).await?;
        let cache = CredentialCache::for_definition(self.logger.clone(), path);
        if !options.no_cache {
            if let Some(cached) = cache.read().await? {
                merge_cached(&mut definition, &cached);
            }
        }

        let mut result = self.executor.execute(&definition).await?;
        let mut retried = false;
        let triggered = should_authenticate(&result, definition.authentication_hook.as_ref())
            .map_err(|err| err.context("unable to validate authentication hook"))?;

        if let (true, Some(hook)) = (triggered, definition.authentication_hook.clone()) {
            self.logger.info(
                "Authentication hook triggered",
                Some(&serde_json::json!({"status": result.status().as_u16()})),
            );
            let headers = {
                let doer = LoaderRequestDoer {
                    loader: &self.loader,
                    executor: &self.executor,
                };
                let env = self.loader.environment();
                let runner = AuthenticationHookRunner::new(
                    &self.logger,
                    &doer,
                    env.as_ref(),
                    self.printer.as_ref(),
                );
                let mut refresher = ReloadingRefresher {
                    loader: &self.loader,
                    path: path.to_path_buf(),
                    definition: &mut definition,
                };
                runner
                    .run(&hook, &mut refresher)
                    .await
                    .map_err(|err| err.context("failed to authenticate"))?
            };
            definition.headers.extend(headers);
            result = self.executor.execute(&definition).await?;
            retried = true;
        }

        let status = result.status();
        let rejected = retried && (status.is_client_error() || status.is_server_error());
        if rejected {
            self.logger.warn(
                "Retry after authentication was rejected; cached headers left unchanged",
                Some(&serde_json::json!({"status": status.as_u16()})),
            );
        }
        if !options.no_cache && !rejected {
            cache.write(&definition.headers)?;
        }
        Ok(result)
    }
}

/// Fetches a hook's credential document: load, encode, execute. The nested
/// document's own hook is not consulted.
struct LoaderRequestDoer<'a> {
    loader: &'a DefinitionLoader,
    executor: &'a RequestExecutor,
}

#[async_trait]
impl RequestDoer for LoaderRequestDoer<'_> {
    async fn do_request(&self, request_path: &str) -> Result<RequestResult, MethodError> {
        let definition = self.loader.load_reference(request_path).await?;
        self.executor.execute(&definition).await
    }
}

struct ReloadingRefresher<'a> {
    loader: &'a DefinitionLoader,
    path: PathBuf,
    definition: &'a mut RequestDefinition,
}

#[async_trait]
impl DefinitionRefresher for ReloadingRefresher<'_> {
    async fn refresh_definition(&mut self) -> Result<(), MethodError> {
        *self.definition = self.loader.load(&self.path).await?;
        Ok(())
    }
}
