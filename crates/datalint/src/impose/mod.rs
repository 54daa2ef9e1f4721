//! Type imposition: coercing raw columns toward declared semantic types.

mod conversion;
mod imposer;
pub(crate) mod parse;

pub use conversion::TypeConversionTable;
pub use imposer::{CoercionPolicy, TypeImposer, reconcile_columns};
