pub mod initdb;
pub mod migrate_and_serve;
pub mod serve;
pub mod sweep;

pub use initdb::init_database;
pub use migrate_and_serve::migrate_and_serve;
pub use serve::serve;
pub use sweep::sweep_once;
