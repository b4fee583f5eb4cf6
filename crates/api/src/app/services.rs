use std::sync::Arc;

use lomartex_infra::store::{
    ClientStore, InMemoryClientStore, InMemoryPackingListStore, PackingListStore,
    PostgresClientStore, PostgresPackingListStore, StoreError, connect, ensure_schema,
};
use lomartex_infra::AppConfig;
use lomartex_printing::{PrintCommand, SpoolDirectory, SurfaceProvider};

/// Everything the handlers need, shared behind one `Arc`.
pub struct AppServices {
    pub clients: Arc<dyn ClientStore>,
    pub packing_lists: Arc<dyn PackingListStore>,
    pub surfaces: Arc<dyn SurfaceProvider>,
}

impl AppServices {
    /// In-memory stores with the given print surfaces (dev and tests).
    pub fn in_memory(surfaces: Arc<dyn SurfaceProvider>) -> Self {
        Self {
            clients: Arc::new(InMemoryClientStore::new()),
            packing_lists: Arc::new(InMemoryPackingListStore::new()),
            surfaces,
        }
    }
}

/// Spool directory configured from the environment.
pub fn spool_from_config(config: &AppConfig) -> SpoolDirectory {
    SpoolDirectory::new(&config.spool_dir)
        .with_command(config.print_command.as_deref().and_then(PrintCommand::parse))
        .with_retain(config.retain_spool)
}

/// Postgres stores when `DATABASE_URL` is set, in-memory otherwise.
pub async fn build_services(config: &AppConfig) -> Result<AppServices, StoreError> {
    let spool = spool_from_config(config);
    tracing::info!(
        spool_dir = %spool.dir().display(),
        retain = spool.retains_files(),
        print_command = config.print_command.as_deref().unwrap_or(""),
        "print spool configured"
    );
    let surfaces: Arc<dyn SurfaceProvider> = Arc::new(spool);

    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set; using in-memory stores (data is lost on restart)");
        return Ok(AppServices::in_memory(surfaces));
    };

    let pool = connect(database_url).await?;
    ensure_schema(&pool).await?;
    tracing::info!("using postgres record stores");

    Ok(AppServices {
        clients: Arc::new(PostgresClientStore::new(pool.clone())),
        packing_lists: Arc::new(PostgresPackingListStore::new(pool)),
        surfaces,
    })
}
