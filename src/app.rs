//! Process bootstrap: choose a store, register modules, serve.

use std::sync::Arc;

use anyhow::Context;
use bookshelf_db::{Database, DbModule};
use bookshelf_kernel::settings::{Settings, StoreBackend};
use bookshelf_kernel::{InitCtx, ModuleRegistry};

use crate::modules;
use crate::modules::books::store::{MemoryBookStore, MongoBookStore, SharedStore};

/// Build the registry for `settings`: the `db` core module when MongoDB backs
/// the catalog, then the books module over the chosen store.
pub async fn build_registry(settings: &Settings) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();

    let store: SharedStore = match settings.database.backend {
        StoreBackend::Mongodb => {
            let database = Database::connect(&settings.database)
                .await
                .context("failed to configure the document store")?;
            let store = MongoBookStore::new(&database, &settings.database.collection);
            registry.register_core(Arc::new(DbModule::new(database)));
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("using the in-memory book store; data is lost on exit");
            Arc::new(MemoryBookStore::new())
        }
    };

    modules::register_all(&mut registry, store);
    Ok(registry)
}

/// Run the application until a shutdown signal arrives.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let registry = build_registry(&settings).await?;
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served = bookshelf_http::start_server(&registry, &settings).await;

    // Release the store even when serving failed.
    let stopped = registry.stop_all().await;
    served?;
    stopped?;

    tracing::info!("bookshelf shut down cleanly");
    Ok(())
}
