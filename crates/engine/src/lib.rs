// docplace-engine: resolves model-proposed edit operations to exact ranges.
//
// `resolver::resolve` is the pure entry point. Everything else supports it
// (document model, outline, search helpers, strategies) or consumes its
// output (`apply`).

pub mod apply;
pub mod config;
pub mod document;
pub mod outline;
pub mod resolver;
pub mod search;
pub mod strategy;
pub mod types;

pub use config::ResolverConfig;
pub use document::Document;
pub use resolver::resolve;
pub use types::{EditOperation, OperationKind, ResolutionResult, Selection, Strategy};
