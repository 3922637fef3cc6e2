use bqserve::{
    create_executor, serve, Dispatcher, ExecutorMode, QueryLoader, QueryRegistry, ServerConfig,
};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bqserve")]
#[command(about = "Serve parameterized BigQuery queries as JSON over HTTP")]
#[command(version)]
struct Cli {
    /// Google Cloud project to run queries as
    #[arg(long, env = "BQSERVE_PROJECT", default_value = "")]
    project: String,

    /// YAML file, or directory of YAML files, with query definitions
    #[arg(long, env = "BQSERVE_QUERIES", default_value = "queries.yaml")]
    queries: PathBuf,

    /// URL path prefix for all queries, e.g. /query/
    #[arg(long, env = "BQSERVE_URL_PATH", default_value = "/")]
    url_path: String,

    /// Port to serve on
    #[arg(long, env = "BQSERVE_PORT", default_value_t = 8080)]
    port: u16,

    /// Service account key file; application default credentials when omitted
    #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS")]
    credentials: Option<String>,

    /// Query engine; `mock` serves empty results without contacting BigQuery
    #[arg(long, env = "BQSERVE_EXECUTOR", value_enum, default_value_t = ExecutorMode::BigQuery)]
    executor: ExecutorMode,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "bqserve exited with error");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> bqserve::Result<()> {
    let engine =
        create_executor(cli.executor, &cli.project, cli.credentials.as_deref()).await?;

    let queries = QueryLoader::new().load(&cli.queries)?;
    let registry = QueryRegistry::new(queries);
    info!(
        count = registry.len(),
        path = %cli.queries.display(),
        "Loaded queries"
    );

    let config = ServerConfig::new(&cli.url_path, cli.port);
    serve(config, Dispatcher::new(registry, engine)).await
}
