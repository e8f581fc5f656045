//! Repository interfaces for persistent state, plus in-memory mocks used by
//! service tests and local development.

pub mod download;
pub mod post;
pub mod user;

pub use download::{DownloadRepository, MockDownloadRepository};
pub use post::{MockPostRepository, PostRepository};
pub use user::{MockUserRepository, UserRepository};
