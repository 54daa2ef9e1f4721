//! Table metadata: the declared expectations a dataset is linted against.

mod column;
mod generate;
mod table;
mod types;
mod validate;

pub use column::ColumnMetadata;
pub use generate::generate_metadata;
pub use table::TableMetadata;
pub use types::SemanticType;
pub use validate::validate_metadata;
