use anyhow::Result;
use tracing::{error, info};

use super::initdb::connect_and_migrate;
use super::serve::serve;
use crate::config::Settings;

pub async fn migrate_and_serve(settings: Settings, run_sweeper: bool) -> Result<()> {
    info!("Applying database migrations and starting server");

    match connect_and_migrate(&settings.database_url).await {
        Ok(db) => db.close().await?,
        Err(e) => {
            error!("Migration step failed: {}", e);
            return Err(e);
        }
    }

    serve(settings, run_sweeper).await
}
