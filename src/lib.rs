pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{MemorySink, StdoutSink, TracingSink};
pub use app::presets::{log_classes, profiler, DecoratorKind, Preset};
pub use config::ProfilerConfig;
pub use crate::core::applicator::{decorate_classes, decorate_everything, decorate_methods_in_class};
pub use crate::core::class_wrapper::{DecoratedClass, Redecoration};
pub use crate::core::compose::{compose, DecoratorChain};
pub use crate::core::logging::{
    ArgsLogger, EntryExitLogger, FormatLimits, FormattedArgsLogger, TimingLogger, TimingPrecision,
};
pub use domain::method::{ClassDef, ClassProvider, Instance, Method};
pub use domain::model::{Arg, ArgStream, Call};
pub use domain::ports::{Decorator, LogSink};
pub use domain::registry::Registry;
pub use utils::error::{DecorError, Result};
