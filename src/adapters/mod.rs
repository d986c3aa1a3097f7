pub mod fs;

pub use fs::FsDocumentStore;
