pub mod access;
pub mod authorizor;
mod platform;
mod session;
mod user;

pub use access::{require_complete, Capabilities};
pub use platform::Platform;
pub use session::SessionContext;
pub use user::User;
