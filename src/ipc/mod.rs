mod error;
mod handlers;
mod helpers;
mod router;
mod types;

pub use handlers::core::open_session;
pub use router::handle_request;
pub use types::{AppState, Request, Session};
