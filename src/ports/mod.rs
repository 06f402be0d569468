//! Ports - Interfaces between the core and the outside world.
//!
//! Following hexagonal architecture, ports define the contracts the
//! application layer depends on. Adapters implement these ports.
//!
//! - `SessionStore` - Atomic create/read/mutate/vote operations over all sessions
//! - `LiveConnection` - One subscriber's outbound channel

mod live_connection;
mod session_store;

pub use live_connection::{DeliveryError, LiveConnection};
pub use session_store::SessionStore;
