use medstock_core::{CoreConfig, MedicineService, MedicineStore, config::data_file_from_env_value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};

/// Main entry point for the medstock server
///
/// Serves the REST API over a single JSON data file. The data file is created with an empty
/// medicine list if it does not exist yet; its parent directory must already exist.
///
/// # Environment Variables
/// - `MEDSTOCK_REST_ADDR`: REST server address (default: "0.0.0.0:8000")
/// - `MEDSTOCK_DATA_FILE`: Path to the JSON data file (default: "data.json")
/// - `RUST_LOG`: Extra tracing filter directives
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medstock_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("medstock_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("MEDSTOCK_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());
    let data_file = data_file_from_env_value(std::env::var("MEDSTOCK_DATA_FILE").ok());

    let cfg = CoreConfig::new(data_file)?;
    let store = MedicineStore::new(&cfg);
    store.initialise_if_missing()?;

    tracing::info!("++ Starting medstock REST on {}", rest_addr);
    tracing::info!("++ Using data file {}", cfg.data_file().display());

    let app = router(AppState::new(MedicineService::with_store(store)));
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
