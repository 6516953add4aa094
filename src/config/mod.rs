pub mod toml_config;

pub use toml_config::{ProfilerConfig, SinkKind};

#[cfg(feature = "cli")]
use crate::app::presets::Preset;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "call-profiler")]
#[command(about = "Wraps every method of a module's classes in logging decorators")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Preset to apply when the config does not list decorators
    #[arg(long, value_enum, default_value = "log-classes")]
    pub preset: Preset,

    /// Module of the demo registry to decorate
    #[arg(long, default_value = "bank")]
    pub module: String,

    /// Send decorator output through tracing instead of stdout
    #[arg(long)]
    pub tracing_sink: bool,

    /// Report elapsed time with millisecond precision
    #[arg(long)]
    pub fractional_timing: bool,

    /// Emit tracing output as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the file named by `--config` (or defaults) and applies the
    /// command-line overrides on top.
    pub fn load_profiler_config(&self) -> crate::utils::error::Result<ProfilerConfig> {
        crate::utils::validation::validate_non_empty_string("module", &self.module)?;

        let mut config = match &self.config {
            Some(path) => ProfilerConfig::from_file(path)?,
            None => ProfilerConfig::default(),
        };

        // 應用命令列覆蓋設定
        if self.tracing_sink {
            config.output.sink = SinkKind::Tracing;
        }
        if self.fractional_timing {
            config.timing.precision = crate::core::logging::TimingPrecision::Fractional;
        }

        Ok(config)
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::core::logging::TimingPrecision;

    #[test]
    fn test_cli_overrides() {
        let cli = CliConfig::parse_from([
            "call-profiler",
            "--preset",
            "profiler",
            "--module",
            "reports",
            "--tracing-sink",
            "--fractional-timing",
        ]);
        assert_eq!(cli.preset, Preset::Profiler);
        assert_eq!(cli.module, "reports");

        let config = cli.load_profiler_config().unwrap();
        assert_eq!(config.output.sink, SinkKind::Tracing);
        assert_eq!(config.timing.precision, TimingPrecision::Fractional);
    }

    #[test]
    fn test_cli_defaults() {
        let cli = CliConfig::parse_from(["call-profiler"]);
        assert_eq!(cli.preset, Preset::LogClasses);
        assert_eq!(cli.module, "bank");
        assert_eq!(cli.load_profiler_config().unwrap(), ProfilerConfig::default());
    }

    #[test]
    fn test_blank_module_is_rejected() {
        let cli = CliConfig::parse_from(["call-profiler", "--module", " "]);
        assert!(cli.load_profiler_config().is_err());
    }
}
