//! Content module - front-matter parsing, documents and the content registry

mod date;
mod document;
mod error;
mod frontmatter;
pub mod loader;
mod registry;
mod summary;

pub use date::parse_date;
pub use document::{source_id, Document};
pub use error::{ContentError, IngestFailure};
pub use frontmatter::{Cover, Fence, FrontMatter};
pub use loader::{ContentLoader, Ingestion};
pub use registry::{ContentRegistry, Filter, TermCount};
pub use summary::Summary;
