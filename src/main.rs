use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_mock::MockState;

/// Main entry point for the clinic development backend
///
/// Serves the in-memory REST backend the admin client talks to, with the OpenAPI
/// document at `/api-docs/openapi.json`.
///
/// # Environment Variables
/// - `CLINIC_MOCK_ADDR`: Server address (default: "0.0.0.0:3001")
/// - `CLINIC_MOCK_SEED`: Set to `0` or `false` to start with no demo patients
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If server startup or runtime fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_mock=info".parse()?)
                .add_directive("clinic_run=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("CLINIC_MOCK_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".into());
    let seed = seed_from_env_value(std::env::var("CLINIC_MOCK_SEED").ok());

    let state = MockState::new();
    if seed {
        state.seed_demo();
        tracing::info!(
            patients = state.db().patients().len(),
            "seeded demo data"
        );
    }

    tracing::info!("-- Starting clinic backend on {}", addr);
    let app = api_mock::router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn seed_from_env_value(value: Option<String>) -> bool {
    !matches!(
        value.as_deref().map(str::trim),
        Some("0") | Some("false") | Some("no")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeding_is_on_unless_disabled() {
        assert!(seed_from_env_value(None));
        assert!(seed_from_env_value(Some("1".into())));
        assert!(!seed_from_env_value(Some("0".into())));
        assert!(!seed_from_env_value(Some(" false ".into())));
    }
}
