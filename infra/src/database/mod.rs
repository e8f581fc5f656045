//! Database adapters.

pub mod connection;
pub mod mysql;

pub use connection::create_pool;
pub use mysql::{MySqlDownloadRepository, MySqlPostRepository, MySqlUserRepository};
