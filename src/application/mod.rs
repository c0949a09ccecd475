//! Application layer - the Message Router.
//!
//! Orchestrates one conversation turn: validate configuration, call the
//! dialog collaborator, optionally call the search collaborator, and shape
//! the reply. There is deliberately no state machine beyond this linear
//! decision sequence.

mod render;
mod router;

pub use render::render_documents;
pub use router::{
    GuidanceOutput, MessageReply, MessageRouter, RouterSettings, SetupGuidance,
    CALL_DISCOVERY_FLAG, SEARCH_APOLOGY, SEARCH_NO_RESULTS, SEARCH_RESULT_LIMIT,
    WORKSPACE_GUIDANCE,
};
