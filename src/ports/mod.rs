pub mod editor;
pub mod search;

pub use editor::{DocumentStore, EditError};
pub use search::{
    Batch, MatchLocation, Position, Query, Range, SearchError, SearchTransport, SessionId,
};
