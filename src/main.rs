use anyhow::Context;
use bookstore_db::Database;
use bookstore_kernel::{settings::Settings, InitCtx};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load bookstore settings")?;
    bookstore_telemetry::init(&settings.telemetry);

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.path.display(),
        "bookstore-app bootstrap starting"
    );

    let db = Database::open(&settings.database).context("failed to open document store")?;
    let registry = bookstore_app::build_registry(&db)?;

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    tracing::info!("bookstore-app bootstrap complete");

    let served =
        bookstore_http::start_server(&registry, &settings, bookstore_http::shutdown_signal()).await;

    registry.stop_all().await?;
    served
}
