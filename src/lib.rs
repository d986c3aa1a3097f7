//! searchlink - client core for a streaming pattern-search protocol
//!
//! Module structure:
//! - ports: data contracts and seams (search wire types, document access)
//! - adapters: concrete port implementations (filesystem documents)
//! - store: accumulated results + preview extraction
//! - session: the poll-loop state machine and session manager
//! - fixes: applying suggested fixes to documents

pub mod adapters;
pub mod fixes;
pub mod logging;
pub mod ports;
pub mod session;
pub mod store;
