use std::time::Duration;

use chrono::Utc;
use sea_orm::DatabaseConnection;
use tokio::{sync::watch, task::JoinHandle, time::MissedTickBehavior};
use tracing::{debug, error, info, trace};

use crate::policy::TimerPolicy;
use crate::sweep::Sweeper;

/// Spawns a background task that sweeps every `interval` until `shutdown`
/// flips to `true` or its sender is dropped.
pub fn spawn_sweeper(
    db: DatabaseConnection,
    policy: TimerPolicy,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let sweeper = Sweeper::new(policy);
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("Booking sweeper started, interval {:?}", interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    trace!("Sweeper tick");
                    let now = Utc::now().naive_utc();
                    match sweeper.run_once(&db, now).await {
                        Ok(report) => debug!("Sweep finished: {:?}", report),
                        Err(e) => error!("Sweep failed: {}", e),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Booking sweeper stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    #[tokio::test]
    async fn sweeper_stops_on_shutdown_signal() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let (tx, rx) = watch::channel(false);
        let handle = spawn_sweeper(db, TimerPolicy::default(), Duration::from_millis(10), rx);

        tokio::time::sleep(Duration::from_millis(30)).await;
        tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("sweeper did not stop")
            .expect("sweeper panicked");
    }
}
