/// Client-local storage module - Gateway
mod token_store;

pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
