/// Runtime wiring and the interactive session - Gateway

mod client;
mod repl;

pub use client::ChatClient;
pub use repl::{parse_input, run_chat, Input};
