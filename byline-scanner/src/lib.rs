pub mod boundary;
pub mod error;
pub mod link;
pub mod resolver;
pub mod result;

pub use boundary::PostBoundary;
pub use error::ResolveError;
pub use link::{LinkClassification, classify, classify_href};
pub use resolver::{AuthorResolver, resolve_author};
pub use result::{LinkMatch, MatchSource, Resolution};
