use crate::adapters::{StdoutSink, TracingSink};
use crate::config::{ProfilerConfig, SinkKind};
use crate::core::applicator::{decorate_classes, decorate_everything};
use crate::core::compose::DecoratorChain;
use crate::core::logging::{ArgsLogger, EntryExitLogger, FormattedArgsLogger, TimingLogger};
use crate::domain::ports::{Decorator, LogSink};
use crate::domain::registry::Registry;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecoratorKind {
    EntryExit,
    Timing,
    Args,
    FormattedArgs,
}

/// The two ready-made rules: which decorators, and which classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Entry/exit and formatted arguments on classes declared in the module.
    LogClasses,
    /// Entry/exit, formatted arguments and timing on every class visible
    /// from the module.
    Profiler,
}

impl Preset {
    pub fn decorators(self) -> &'static [DecoratorKind] {
        match self {
            Preset::LogClasses => &[DecoratorKind::EntryExit, DecoratorKind::FormattedArgs],
            Preset::Profiler => &[
                DecoratorKind::EntryExit,
                DecoratorKind::FormattedArgs,
                DecoratorKind::Timing,
            ],
        }
    }
}

pub fn sink_for(kind: SinkKind) -> Arc<dyn LogSink> {
    match kind {
        SinkKind::Stdout => Arc::new(StdoutSink),
        SinkKind::Tracing => Arc::new(TracingSink),
    }
}

pub fn build_decorator(
    kind: DecoratorKind,
    sink: Arc<dyn LogSink>,
    config: &ProfilerConfig,
) -> Arc<dyn Decorator> {
    match kind {
        DecoratorKind::EntryExit => Arc::new(EntryExitLogger::new(sink)),
        DecoratorKind::Timing => {
            Arc::new(TimingLogger::new(sink).with_precision(config.timing_precision()))
        }
        DecoratorKind::Args => Arc::new(ArgsLogger::new(sink)),
        DecoratorKind::FormattedArgs => {
            Arc::new(FormattedArgsLogger::new(sink).with_limits(config.format_limits()))
        }
    }
}

/// Builds a chain from `kinds`, outermost first, all writing to `sink`.
pub fn build_chain(
    kinds: &[DecoratorKind],
    sink: Arc<dyn LogSink>,
    config: &ProfilerConfig,
) -> DecoratorChain {
    kinds
        .iter()
        .map(|kind| build_decorator(*kind, sink.clone(), config))
        .collect()
}

/// Applies `preset` to `module`. A decorator list in the config replaces
/// the preset's decorators but keeps its class scope.
pub fn apply(
    registry: &mut Registry,
    module: &str,
    preset: Preset,
    sink: Arc<dyn LogSink>,
    config: &ProfilerConfig,
) -> Result<usize> {
    let kinds = config
        .decoration
        .decorators
        .as_deref()
        .unwrap_or(preset.decorators());
    let chain = build_chain(kinds, sink, config);
    tracing::debug!("Applying {:?} with {:?} to {}", preset, kinds, module);

    match preset {
        Preset::LogClasses => decorate_classes(registry, module, &chain),
        Preset::Profiler => decorate_everything(registry, module, &chain),
    }
}

/// Entry/exit and formatted-argument logging for every class declared in
/// `module`.
pub fn log_classes(
    registry: &mut Registry,
    module: &str,
    sink: Arc<dyn LogSink>,
    config: &ProfilerConfig,
) -> Result<usize> {
    let chain = build_chain(Preset::LogClasses.decorators(), sink, config);
    decorate_classes(registry, module, &chain)
}

/// Entry/exit, formatted-argument and timing logging for every class
/// visible from `module`.
pub fn profiler(
    registry: &mut Registry,
    module: &str,
    sink: Arc<dyn LogSink>,
    config: &ProfilerConfig,
) -> Result<usize> {
    let chain = build_chain(Preset::Profiler.decorators(), sink, config);
    decorate_everything(registry, module, &chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemorySink;
    use crate::domain::method::ClassDef;
    use serde_json::{json, Map};

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.define(
            ClassDef::builder("Shelf", "store")
                .method("stock", &["items"], |call| {
                    Ok(call
                        .positional(0)
                        .and_then(|a| a.as_value())
                        .and_then(|v| v.as_array())
                        .map(|items| json!(items.len()))
                        .unwrap_or(json!(0)))
                })
                .build(),
        );
        registry
    }

    fn memory() -> (MemorySink, Arc<dyn LogSink>) {
        let sink = MemorySink::new();
        let shared: Arc<dyn LogSink> = Arc::new(sink.clone());
        (sink, shared)
    }

    #[test]
    fn test_log_classes_preset() {
        let (lines, sink) = memory();
        let mut registry = registry();
        log_classes(&mut registry, "store", sink, &ProfilerConfig::default()).unwrap();

        let mut shelf = registry.instantiate("store", "Shelf", Map::new()).unwrap();
        let result = shelf
            .call("stock", vec![json!([0, 1, 2, 3, 4, 5, 6, 7]).into()])
            .unwrap();
        assert_eq!(result, json!(8));
        assert_eq!(
            lines.lines(),
            vec![
                "Shelf: Entering function stock",
                r#"Args: items=[0,1,2,"...",7]"#,
                "Shelf: Exiting function stock",
            ]
        );
    }

    #[test]
    fn test_profiler_preset_adds_timing() {
        let (lines, sink) = memory();
        let mut registry = registry();
        profiler(&mut registry, "store", sink, &ProfilerConfig::default()).unwrap();

        let mut shelf = registry.instantiate("store", "Shelf", Map::new()).unwrap();
        shelf.call("stock", vec![]).unwrap();
        assert_eq!(
            lines.lines(),
            vec![
                "Shelf: Entering function stock",
                "Function took: 0 seconds",
                "Shelf: Exiting function stock",
            ]
        );
    }

    #[test]
    fn test_config_decorators_override_preset() {
        let (lines, sink) = memory();
        let mut registry = registry();
        let mut config = ProfilerConfig::default();
        config.decoration.decorators = Some(vec![DecoratorKind::Args]);

        apply(&mut registry, "store", Preset::LogClasses, sink, &config).unwrap();

        let mut shelf = registry.instantiate("store", "Shelf", Map::new()).unwrap();
        shelf.call("stock", vec![json!([1, 2]).into()]).unwrap();
        assert_eq!(lines.lines(), vec!["Args: items=[1,2]"]);
    }

    #[test]
    fn test_build_chain_length() {
        let (_, sink) = memory();
        let chain = build_chain(
            Preset::Profiler.decorators(),
            sink,
            &ProfilerConfig::default(),
        );
        assert_eq!(chain.len(), 3);
    }
}
