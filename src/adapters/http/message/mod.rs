//! Message endpoint - the single conversational API surface.

mod dto;
mod handlers;
mod routes;

pub use dto::MessageRequest;
pub use handlers::{post_message, MessageAppState};
pub use routes::{message_router, message_routes};
