//! In-memory implementation of the session store.

mod code_generator;
mod event_log;
mod session_state;
mod store;

pub use code_generator::{CodeGenerator, RandomCodeGenerator};
pub use store::InMemorySessionStore;
