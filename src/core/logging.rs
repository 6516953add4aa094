//! Decorators that log around a method call without touching its result.
//!
//! Every logger writes through a shared [`LogSink`]. None of them alters
//! the value the wrapped method returns; errors pass through unchanged.

use crate::domain::method::Method;
use crate::domain::model::{Arg, Call};
use crate::domain::ports::{Decorator, LogSink};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

const ELLIPSIS: &str = "...";

/// Logs `"<owner>: Entering function <name>"` and the matching exit line.
///
/// The owner is the receiver's class. Calls without a receiver fall back to
/// the calling module's name.
#[derive(Clone)]
pub struct EntryExitLogger {
    sink: Arc<dyn LogSink>,
}

impl EntryExitLogger {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }
}

fn owner_name(call: &Call<'_>) -> String {
    match call.owner_class() {
        Some(class) => class.to_string(),
        None => call.module.clone(),
    }
}

impl Decorator for EntryExitLogger {
    fn decorate(&self, method: Method) -> Method {
        let sink = self.sink.clone();
        method.wrap(move |inner, call| {
            let owner = owner_name(call);
            sink.log(&format!("{}: Entering function {}", owner, inner.name()));
            let result = inner.invoke(call)?;
            sink.log(&format!("{}: Exiting function {}", owner, inner.name()));
            Ok(result)
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingPrecision {
    /// Whole seconds, fraction dropped.
    #[default]
    Seconds,
    /// Seconds with three decimals.
    Fractional,
}

impl TimingPrecision {
    pub fn render(self, elapsed: Duration) -> String {
        match self {
            TimingPrecision::Seconds => elapsed.as_secs().to_string(),
            TimingPrecision::Fractional => format!("{:.3}", elapsed.as_secs_f64()),
        }
    }
}

/// Logs `"Function took: <n> seconds"` after each successful call.
#[derive(Clone)]
pub struct TimingLogger {
    sink: Arc<dyn LogSink>,
    precision: TimingPrecision,
}

impl TimingLogger {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            precision: TimingPrecision::default(),
        }
    }

    pub fn with_precision(mut self, precision: TimingPrecision) -> Self {
        self.precision = precision;
        self
    }
}

impl Decorator for TimingLogger {
    fn decorate(&self, method: Method) -> Method {
        let sink = self.sink.clone();
        let precision = self.precision;
        method.wrap(move |inner, call| {
            let start = Instant::now();
            let result = inner.invoke(call)?;
            let elapsed = start.elapsed();
            sink.log(&format!("Function took: {} seconds", precision.render(elapsed)));
            Ok(result)
        })
    }
}

/// Joins `name=value` pairs and keyword arguments into one log line.
/// Returns `None` when there is nothing to report.
fn args_line(params: &[String], rendered: &[String], call: &Call<'_>) -> Option<String> {
    let pairs: Vec<String> = params
        .iter()
        .zip(rendered)
        .map(|(name, value)| format!("{}={}", name, value))
        .collect();

    let mut line = if pairs.is_empty() {
        String::new()
    } else {
        format!("Args: {}", pairs.join(", "))
    };

    if !call.kwargs.is_empty() {
        let kwargs: Vec<String> = call
            .kwargs
            .iter()
            .map(|(name, arg)| format!("{:?}: {}", name, arg.render()))
            .collect();
        line.push_str(&format!(" Kargs: {{{}}}", kwargs.join(", ")));
    }

    if line.is_empty() {
        None
    } else {
        Some(line)
    }
}

/// Logs every positional argument next to its declared parameter name,
/// followed by the keyword arguments.
#[derive(Clone)]
pub struct ArgsLogger {
    sink: Arc<dyn LogSink>,
}

impl ArgsLogger {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }
}

impl Decorator for ArgsLogger {
    fn decorate(&self, method: Method) -> Method {
        let sink = self.sink.clone();
        method.wrap(move |inner, call| {
            let rendered: Vec<String> = call.args.iter().map(Arg::render).collect();
            if let Some(line) = args_line(inner.params(), &rendered, call) {
                sink.log(&line);
            }
            inner.invoke(call)
        })
    }
}

/// Limits used by [`FormattedArgsLogger`] when summarising arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatLimits {
    /// Arrays longer than this are summarised.
    pub max_list_len: usize,
    pub head: usize,
    pub tail: usize,
    /// Items pulled from a stream argument for the log line.
    pub stream_peek: usize,
}

impl Default for FormatLimits {
    fn default() -> Self {
        Self {
            max_list_len: 5,
            head: 3,
            tail: 1,
            stream_peek: 3,
        }
    }
}

impl FormatLimits {
    /// `[0,1,2,3,4,5,6,7]` becomes `[0,1,2,"...",7]` with the defaults.
    pub fn summarize(&self, value: &Value) -> Value {
        match value {
            Value::Array(items) if items.len() > self.max_list_len => {
                let tail_start = items
                    .len()
                    .saturating_sub(self.tail)
                    .max(self.head)
                    .min(items.len());
                let mut summary: Vec<Value> = items.iter().take(self.head).cloned().collect();
                summary.push(Value::String(ELLIPSIS.to_string()));
                summary.extend(items[tail_start..].iter().cloned());
                Value::Array(summary)
            }
            other => other.clone(),
        }
    }

    /// Pulls the first few items of a stream and renders them followed by
    /// the ellipsis marker. The stream's source iterator advances.
    pub fn peek_stream(&self, arg: &mut Arg) -> String {
        match arg.as_stream_mut() {
            Some(stream) => {
                let mut head = stream.peek(self.stream_peek);
                head.push(Value::String(ELLIPSIS.to_string()));
                Value::Array(head).to_string()
            }
            None => arg.render(),
        }
    }

    fn render(&self, arg: &mut Arg) -> String {
        if let Arg::Value(value) = &*arg {
            return self.summarize(value).to_string();
        }
        self.peek_stream(arg)
    }
}

/// Like [`ArgsLogger`], but long arrays are shortened and stream arguments
/// are peeked instead of printed as opaque.
#[derive(Clone)]
pub struct FormattedArgsLogger {
    sink: Arc<dyn LogSink>,
    limits: FormatLimits,
}

impl FormattedArgsLogger {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            limits: FormatLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: FormatLimits) -> Self {
        self.limits = limits;
        self
    }
}

impl Decorator for FormattedArgsLogger {
    fn decorate(&self, method: Method) -> Method {
        let sink = self.sink.clone();
        let limits = self.limits;
        method.wrap(move |inner, call| {
            let rendered: Vec<String> = call.args.iter_mut().map(|a| limits.render(a)).collect();
            if let Some(line) = args_line(inner.params(), &rendered, call) {
                sink.log(&line);
            }
            inner.invoke(call)
        })
    }
}
