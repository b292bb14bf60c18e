use anyhow::Result;
use chrono::Utc;
use scheduler::Sweeper;
use sea_orm::Database;
use tracing::info;

use crate::config::Settings;

/// Runs one sweep pass against the configured database.
pub async fn sweep_once(settings: &Settings) -> Result<()> {
    info!("Running a single booking sweep");
    let db = Database::connect(&settings.database_url).await?;

    let report = Sweeper::new(settings.timer_policy())
        .run_once(&db, Utc::now().naive_utc())
        .await?;

    println!("Declined bookings: {:?}", report.declined_bookings);
    println!("Escalated notifications: {:?}", report.escalated_notifications);
    println!("Suspended photographers: {:?}", report.suspended_photographers);

    db.close().await?;
    Ok(())
}
