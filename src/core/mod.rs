pub mod applicator;
pub mod class_wrapper;
pub mod compose;
pub mod logging;

pub use crate::domain::method::{ClassDef, Instance, Method};
pub use crate::domain::ports::{Decorator, LogSink};
pub use crate::utils::error::Result;
