pub mod manager;
mod run;

pub use manager::SessionManager;

use crate::ports::search::SessionId;
use crate::store::ViewResults;

/// View-facing events. `Results` carries the cumulative projection (never a
/// delta) and is emitted after every non-superseded batch, including the
/// final empty one, and after every fix/dismiss mutation. `Concluded` and
/// `Error` are terminal alternatives for a session.
#[derive(Debug, Clone)]
pub enum SearchMessage {
    Results {
        session_id: SessionId,
        results: ViewResults,
    },
    Concluded {
        session_id: SessionId,
    },
    Error {
        session_id: SessionId,
        message: String,
    },
}
