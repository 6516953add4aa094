use serde_json::{Map, Value};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;

/// Lazy argument: the stream equivalent of passing a generator.
///
/// Items pulled with [`ArgStream::peek`] are kept in a lookahead buffer and
/// handed out again by `next()`, but the underlying iterator has advanced.
pub struct ArgStream {
    lookahead: VecDeque<Value>,
    source: Box<dyn Iterator<Item = Value> + Send>,
    pulled: usize,
}

impl ArgStream {
    pub fn new<I>(source: I) -> Self
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: Send + 'static,
    {
        Self {
            lookahead: VecDeque::new(),
            source: Box::new(source.into_iter()),
            pulled: 0,
        }
    }

    /// Returns up to `n` upcoming items, pulling from the source as needed.
    pub fn peek(&mut self, n: usize) -> Vec<Value> {
        while self.lookahead.len() < n {
            match self.source.next() {
                Some(item) => {
                    self.pulled += 1;
                    self.lookahead.push_back(item);
                }
                None => break,
            }
        }
        self.lookahead.iter().take(n).cloned().collect()
    }

    /// How many items have been taken from the source iterator so far.
    pub fn pulled_from_source(&self) -> usize {
        self.pulled
    }
}

impl Iterator for ArgStream {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        if let Some(item) = self.lookahead.pop_front() {
            return Some(item);
        }
        let item = self.source.next()?;
        self.pulled += 1;
        Some(item)
    }
}

impl fmt::Debug for ArgStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgStream")
            .field("lookahead", &self.lookahead)
            .field("pulled", &self.pulled)
            .finish()
    }
}

#[derive(Debug)]
pub enum Arg {
    Value(Value),
    Stream(ArgStream),
}

impl Arg {
    pub fn stream<I>(source: I) -> Self
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: Send + 'static,
    {
        Arg::Stream(ArgStream::new(source))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Arg::Value(v) => Some(v),
            Arg::Stream(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_value().and_then(Value::as_i64)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_value().and_then(Value::as_f64)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }

    pub fn as_stream_mut(&mut self) -> Option<&mut ArgStream> {
        match self {
            Arg::Stream(s) => Some(s),
            Arg::Value(_) => None,
        }
    }

    /// Plain rendering: compact JSON, streams are opaque.
    pub fn render(&self) -> String {
        match self {
            Arg::Value(v) => v.to_string(),
            Arg::Stream(_) => "<stream>".to_string(),
        }
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

/// The instance a method was invoked on.
pub struct Receiver<'a> {
    pub class: &'a str,
    pub fields: &'a mut Map<String, Value>,
}

/// One invocation of a method.
pub struct Call<'a> {
    /// Module the call is made from. Used when there is no receiver.
    pub module: String,
    pub receiver: Option<Receiver<'a>>,
    pub args: Vec<Arg>,
    pub kwargs: BTreeMap<String, Arg>,
}

impl<'a> Call<'a> {
    /// A call with no receiver, as for a free function.
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            receiver: None,
            args: Vec::new(),
            kwargs: BTreeMap::new(),
        }
    }

    pub fn on(mut self, class: &'a str, fields: &'a mut Map<String, Value>) -> Self {
        self.receiver = Some(Receiver { class, fields });
        self
    }

    pub fn arg(mut self, arg: impl Into<Arg>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn kwarg(mut self, name: impl Into<String>, arg: impl Into<Arg>) -> Self {
        self.kwargs.insert(name.into(), arg.into());
        self
    }

    pub fn with_args(mut self, args: Vec<Arg>) -> Self {
        self.args = args;
        self
    }

    pub fn with_kwargs(mut self, kwargs: BTreeMap<String, Arg>) -> Self {
        self.kwargs = kwargs;
        self
    }

    pub fn owner_class(&self) -> Option<&str> {
        self.receiver.as_ref().map(|r| r.class)
    }

    pub fn fields(&mut self) -> Option<&mut Map<String, Value>> {
        self.receiver.as_mut().map(|r| &mut *r.fields)
    }

    pub fn positional(&self, index: usize) -> Option<&Arg> {
        self.args.get(index)
    }

    pub fn positional_mut(&mut self, index: usize) -> Option<&mut Arg> {
        self.args.get_mut(index)
    }
}
