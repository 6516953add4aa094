use crate::domain::method::Method;
use crate::domain::ports::Decorator;
use std::sync::Arc;

/// An ordered list of decorators applied as one. The first decorator is
/// the outermost wrapper.
#[derive(Clone, Default)]
pub struct DecoratorChain {
    decorators: Vec<Arc<dyn Decorator>>,
}

impl DecoratorChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `decorator` as the innermost wrapper so far.
    pub fn then<D: Decorator + 'static>(mut self, decorator: D) -> Self {
        self.decorators.push(Arc::new(decorator));
        self
    }

    pub fn push(&mut self, decorator: Arc<dyn Decorator>) {
        self.decorators.push(decorator);
    }

    pub fn len(&self) -> usize {
        self.decorators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorators.is_empty()
    }
}

impl Decorator for DecoratorChain {
    fn decorate(&self, method: Method) -> Method {
        self.decorators
            .iter()
            .rev()
            .fold(method, |method, decorator| decorator.decorate(method))
    }
}

impl FromIterator<Arc<dyn Decorator>> for DecoratorChain {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Decorator>>>(iter: I) -> Self {
        Self {
            decorators: iter.into_iter().collect(),
        }
    }
}

/// Combines `decorators` into a single decorator.
///
/// `compose(vec![a, b])` applied to `f` gives `a(b(f))`.
pub fn compose(decorators: Vec<Arc<dyn Decorator>>) -> DecoratorChain {
    DecoratorChain { decorators }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Call;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    fn tagging(tag: &'static str, trace: Arc<Mutex<Vec<String>>>) -> Arc<dyn Decorator> {
        Arc::new(move |method: Method| {
            let trace = trace.clone();
            method.wrap(move |inner, call| {
                trace.lock().unwrap().push(format!("{} pre", tag));
                let result = inner.invoke(call);
                trace.lock().unwrap().push(format!("{} post", tag));
                result
            })
        })
    }

    #[test]
    fn test_first_decorator_is_outermost() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let chain = compose(vec![
            tagging("a", trace.clone()),
            tagging("b", trace.clone()),
            tagging("c", trace.clone()),
        ]);

        let body_trace = trace.clone();
        let method = chain.decorate(Method::new("f", &[], move |_| {
            body_trace.lock().unwrap().push("body".to_string());
            Ok(json!(1))
        }));

        assert_eq!(method.invoke(&mut Call::new("demo")).unwrap(), json!(1));
        assert_eq!(
            *trace.lock().unwrap(),
            vec!["a pre", "b pre", "c pre", "body", "c post", "b post", "a post"]
        );
    }

    #[test]
    fn test_empty_chain_is_identity() {
        let chain = DecoratorChain::new();
        assert!(chain.is_empty());

        let method = chain.decorate(Method::new("f", &["x"], |call| {
            Ok(call.positional(0).and_then(|a| a.as_value().cloned()).unwrap_or(Value::Null))
        }));
        let mut call = Call::new("demo").arg(json!("same"));
        assert_eq!(method.invoke(&mut call).unwrap(), json!("same"));
        assert_eq!(method.params(), ["x"]);
    }

    #[test]
    fn test_then_matches_compose() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let t1 = trace.clone();
        let t2 = trace.clone();
        let chain = DecoratorChain::new()
            .then(move |m: Method| {
                let t = t1.clone();
                m.wrap(move |inner, call| {
                    t.lock().unwrap().push("outer");
                    inner.invoke(call)
                })
            })
            .then(move |m: Method| {
                let t = t2.clone();
                m.wrap(move |inner, call| {
                    t.lock().unwrap().push("inner");
                    inner.invoke(call)
                })
            });
        assert_eq!(chain.len(), 2);

        let method = chain.decorate(Method::new("f", &[], |_| Ok(Value::Null)));
        method.invoke(&mut Call::new("demo")).unwrap();
        assert_eq!(*trace.lock().unwrap(), vec!["outer", "inner"]);
    }
}
