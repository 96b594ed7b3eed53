//! Runtime evaluation of numeric Lisp trees

mod config;
mod environment;
mod evaluator;
pub mod io;
mod value;

pub use config::EvalConfig;
pub use environment::{Environment, FrameId, Resolved, GLOBAL};
pub use evaluator::Evaluator;
pub use io::SharedBuffer;
pub use value::{format_value, NumType, Value};
