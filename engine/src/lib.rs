// Engine library root
// Expression evaluation, currency data and the headless value edit used by the front-ends.

pub mod config;
pub mod data;
pub mod error;
pub mod expression;
pub mod widget;

pub use error::{EngineError, ExprError};
pub use expression::{Evaluation, Evaluator};
pub use widget::{CommitSession, ValueEdit, ValueEditOptions};
