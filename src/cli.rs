use crate::errors::MethodError;
use crate::managers::method::{MethodOptions, MethodRunner};
use crate::models::RequestResult;
use crate::services::environment::ProcessEnvironment;
use crate::services::logger::{LogLevel, Logger};
use crate::utils::output::{render_request_result, ConsolePrinter};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "method",
    about = "Run a declarative HTTP request, authenticating through its hook when needed",
    version
)]
pub struct Cli {
    /// Request definition (YAML)
    pub file: PathBuf,

    /// Skip reading and writing the cached headers file
    #[arg(long)]
    pub no_cache: bool,

    /// Log level (error, warn, info, debug); overrides METHOD_LOGGING_LEVEL
    #[arg(long, value_parser = parse_level)]
    pub log_level: Option<LogLevel>,
}

fn parse_level(raw: &str) -> Result<LogLevel, String> {
    LogLevel::parse(raw).ok_or_else(|| format!("unknown log level '{}'", raw))
}

pub async fn run() -> Result<(), MethodError> {
    let cli = Cli::parse();
    let result = execute(&cli).await?;
    print!("{}", render_request_result(&result));
    Ok(())
}

pub async fn execute(cli: &Cli) -> Result<RequestResult, MethodError> {
    let mut logger = Logger::new("method");
    if let Some(level) = cli.log_level {
        logger.set_level(level);
    }
    let runner = MethodRunner::new(
        logger,
        Arc::new(ProcessEnvironment),
        Arc::new(ConsolePrinter),
    )?;
    runner
        .run(
            &cli.file,
            MethodOptions {
                no_cache: cli.no_cache,
            },
        )
        .await
}
