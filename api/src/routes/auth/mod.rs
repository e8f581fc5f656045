//! Account routes: registration, verification, login and password reset.

mod forgot_password;
mod login;
mod logout;
mod register;
mod reset_password;
mod verify;

pub use forgot_password::forgot_password;
pub use login::login;
pub use logout::logout;
pub use register::register;
pub use reset_password::reset_password;
pub use verify::verify;
