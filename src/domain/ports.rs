use crate::domain::method::Method;

/// Turns a method into another method with the same name and parameters.
pub trait Decorator: Send + Sync {
    fn decorate(&self, method: Method) -> Method;
}

impl<F> Decorator for F
where
    F: Fn(Method) -> Method + Send + Sync,
{
    fn decorate(&self, method: Method) -> Method {
        self(method)
    }
}

/// Where logging decorators write their lines.
pub trait LogSink: Send + Sync {
    fn log(&self, line: &str);
}

impl<F> LogSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn log(&self, line: &str) {
        self(line)
    }
}
