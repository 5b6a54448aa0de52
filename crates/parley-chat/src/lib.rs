//! parley-chat: conversation state and session driver for the chat block
//!
//! This crate owns the chat core: the message data model, the conversation
//! store, and the session driver that runs one request at a time through a
//! [`transport::ResponseTransport`]. It knows nothing about rendering; the
//! shipped mock transport lives in `parley-mock`.

pub mod error;
pub mod events;
pub mod ids;
pub mod session;
pub mod store;
pub mod transport;
pub mod types;

pub use error::{Error, Result};
pub use events::ChatEvent;
pub use ids::{IdGenerator, SequenceIds, UuidIds};
pub use session::{CANCELLED_CONTENT, ChatSession, SessionConfig, SessionHandle};
pub use store::ConversationStore;
pub use transport::{Delivery, ResponseEvent, ResponseEventStream, ResponseTransport};
pub use types::{
    ChatStatus, Message, MessageDraft, MessageId, Role, ToolCallState, ToolInvocation,
};
