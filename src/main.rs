use anyhow::Context;
use call_profiler::app::{demo, presets};
use call_profiler::utils::{logger, validation::Validate};
use call_profiler::{ClassProvider, CliConfig, DecoratedClass, DecorError, Redecoration};
use clap::Parser;
use serde_json::{json, Map};
use std::sync::Arc;

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    if let Err(e) = run(&config) {
        tracing::error!("❌ Profiling run failed: {:#}", e);
        match e.downcast_ref::<DecorError>() {
            Some(err) => {
                eprintln!("❌ {}", err.user_friendly_message());
                eprintln!("💡 {}", err.recovery_suggestion());
            }
            None => eprintln!("❌ {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: &CliConfig) -> anyhow::Result<()> {
    tracing::info!("Starting call-profiler demo");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = cli
        .load_profiler_config()
        .with_context(|| format!("loading configuration {:?}", cli.config))?;
    config.validate()?;

    let sink = presets::sink_for(config.output.sink);
    let mut registry = demo::demo_registry()?;

    let decorated = presets::apply(&mut registry, &cli.module, cli.preset, sink.clone(), &config)?;
    tracing::info!(
        "✅ {:?} applied to {} classes from module {}",
        cli.preset,
        decorated,
        cli.module
    );

    for result in demo::run_demo(&registry)? {
        tracing::debug!("Result: {}", result);
    }

    // 類別包裝器：實例化時才裝飾
    let kinds = config
        .decoration
        .decorators
        .clone()
        .unwrap_or_else(|| cli.preset.decorators().to_vec());
    let chain = presets::build_chain(&kinds, sink, &config);
    let mut wrapped = DecoratedClass::new(demo::Ledger::class_def(), Arc::new(chain))
        .with_policy(config.redecoration());

    for label in ["first", "second"] {
        let mut ledger = wrapped.instantiate(Map::new());
        ledger.call(
            "summarize",
            vec![json!([1, 2, 3]).into(), json!(label).into()],
        )?;
    }

    if config.redecoration() == Redecoration::EveryInstantiation {
        tracing::warn!(
            "Ledger was decorated {} times; wrappers compound on each instantiation",
            wrapped.decorations()
        );
    }

    Ok(())
}
