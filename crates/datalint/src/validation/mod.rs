//! Rule evaluation and the result log.

mod evaluators;
mod log;
mod outcome;

pub use evaluators::{
    CheckContext, EnumCheck, Evaluator, ExistsAndOrderCheck, NullCheck, PatternCheck, TypeCheck,
    ValidationEngine,
};
pub use log::{ColumnLog, LogEntry, TableRow, ValidationLog};
pub use outcome::{CheckKind, ExceptionInfo, Outcome};
