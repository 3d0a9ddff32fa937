// Gateway module for chat - follows the Train Station Pattern
// All external access must go through this gateway

mod relay;
mod transport;
mod types;

pub use relay::ChatRelay;
pub use transport::{ChatTransport, HttpTransport};
pub use types::{ChatRequest, HttpReply, SendOutcome};
