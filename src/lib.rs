pub mod config;
pub mod driver;
pub mod errors;
pub mod logger;
pub mod table;
pub mod transformer;

pub use driver::{run, transform_stream, Header, RunReport};
pub use errors::{AppError, ObfuscationError};
pub use table::{DuplicatePolicy, MappingEntry, ObfuscationTable};
pub use transformer::{LineTransformer, ReplacementScope, TransformStats};
