use anyhow::{Context, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use std::path::PathBuf;
use tracing::{debug, info, trace};

/// File path of a `sqlite://` URL, if it names a file.
fn sqlite_file_path(database_url: &str) -> Option<PathBuf> {
    let rest = database_url.strip_prefix("sqlite://")?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path == ":memory:" {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

/// Connects and applies every pending migration.
pub async fn connect_and_migrate(database_url: &str) -> Result<DatabaseConnection> {
    trace!("Entering connect_and_migrate");

    if let Some(parent) = sqlite_file_path(database_url)
        .as_deref()
        .and_then(|path| path.parent())
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        debug!("Ensuring SQLite directory {} exists", parent.display());
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let db = Database::connect(database_url)
        .await
        .with_context(|| format!("Failed to connect to database '{}'", database_url))?;
    info!("Connected to database");

    let pending = Migrator::get_pending_migrations(&db).await?.len();
    info!("Applying {} pending migrations", pending);
    Migrator::up(&db, None)
        .await
        .context("Failed to run database migrations")?;
    debug!("All pending migrations have been applied");

    Ok(db)
}

pub async fn init_database(database_url: &str) -> Result<()> {
    info!("Initializing database");
    debug!("Database URL: {}", database_url);

    let db = connect_and_migrate(database_url).await?;
    db.close().await?;

    info!("Database initialization completed successfully!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_paths() {
        assert_eq!(
            sqlite_file_path("sqlite://data/snapbook.db?mode=rwc"),
            Some(PathBuf::from("data/snapbook.db"))
        );
        assert_eq!(
            sqlite_file_path("sqlite:///var/lib/snapbook.db"),
            Some(PathBuf::from("/var/lib/snapbook.db"))
        );
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("postgresql://localhost/snapbook"), None);
    }

    #[tokio::test]
    async fn migrates_in_memory_database() {
        let db = connect_and_migrate("sqlite::memory:").await.unwrap();
        let pending = Migrator::get_pending_migrations(&db).await.unwrap();
        assert!(pending.is_empty());
    }
}
