//! MySQL implementations of the core repository traits.

mod download_repository_impl;
mod post_repository_impl;
mod user_repository_impl;

pub use download_repository_impl::MySqlDownloadRepository;
pub use post_repository_impl::MySqlPostRepository;
pub use user_repository_impl::MySqlUserRepository;
