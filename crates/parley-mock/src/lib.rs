//! parley-mock: the shipped response transport
//!
//! A mock [`parley_chat::ResponseTransport`] that classifies input by
//! keyword and replays canned demo content, with simulated delays and
//! cooperative cancellation. There is no network and no real model behind
//! it; it exists so the chat block can be exercised end to end.

pub mod responder;
pub mod responses;
pub mod scenarios;

pub use responder::{MockResponder, sleep_cancellable};
pub use responses::ResponseKind;
pub use scenarios::{DEMO_SCENARIOS, DemoScenario};
