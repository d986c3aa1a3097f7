pub mod preview;
pub mod results;

pub use preview::{extract_preview, LineIndex, PreviewChunks};
pub use results::{FileGroup, ResultStore, ViewFile, ViewMatch, ViewResults};
