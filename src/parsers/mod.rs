pub mod dom;
pub mod matcher;
pub mod registry;
pub mod stores;
pub mod traits;

pub use matcher::Matcher;
pub use registry::ParserRegistry;
pub use traits::{PageLayout, SourceParser};
