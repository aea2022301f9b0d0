use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use parley_answer::{Answerer, ProviderChain};
use parley_api::{build_router, config::Config, state::AppState};
use parley_source::{FetchPolicy, Fetcher, HttpPageSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!("Starting Member Data QA service");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    // Provider selection happens once, here
    let chain = ProviderChain::from_configs(config.provider_configs())?;
    match chain.active() {
        Some(active) => {
            for slot in chain.slots() {
                tracing::info!("{} API configured", slot.provider);
            }
            tracing::info!("Primary LLM provider: {}", active);
        }
        None => tracing::warn!(
            "No LLM API key found (GROQ_API_KEY, ANTHROPIC_API_KEY, or OPENAI_API_KEY). Using simple keyword search."
        ),
    }

    let source = HttpPageSource::new(config.source.base_url.clone(), config.source.timeout())?;
    tracing::info!("Message API: {}", source.base_url());
    let fetcher = Fetcher::new(Arc::new(source)).with_policy(FetchPolicy::from(&config.source));

    let state = Arc::new(AppState::new(
        config.clone(),
        fetcher,
        Answerer::new(Arc::new(chain)),
    ));

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("API docs: http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
