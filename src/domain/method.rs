use crate::domain::model::{Arg, Call};
use crate::utils::error::{DecorError, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub type MethodFn = dyn Fn(&mut Call<'_>) -> Result<Value> + Send + Sync;

/// A named callable plus the parameter names it declares.
///
/// Cloning is cheap: the function body is shared.
#[derive(Clone)]
pub struct Method {
    name: String,
    params: Vec<String>,
    func: Arc<MethodFn>,
}

impl Method {
    pub fn new<F>(name: impl Into<String>, params: &[&str], func: F) -> Self
    where
        F: Fn(&mut Call<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params: params.iter().map(|p| p.to_string()).collect(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn invoke(&self, call: &mut Call<'_>) -> Result<Value> {
        (self.func)(call)
    }

    /// Builds a new method with the same name and parameters whose body is
    /// `wrapper`, which receives the method being wrapped.
    pub fn wrap<W>(self, wrapper: W) -> Method
    where
        W: Fn(&Method, &mut Call<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        let name = self.name.clone();
        let params = self.params.clone();
        let inner = self;
        Method {
            name,
            params,
            func: Arc::new(move |call: &mut Call<'_>| wrapper(&inner, call)),
        }
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Methods of a class, ordered by name.
pub type MethodTable = BTreeMap<String, Method>;

/// Explicit registration of a class: its name, the module that declares it
/// and its method table.
#[derive(Debug, Clone)]
pub struct ClassDef {
    name: String,
    module: String,
    methods: MethodTable,
}

impl ClassDef {
    pub fn builder(name: impl Into<String>, module: impl Into<String>) -> ClassBuilder {
        ClassBuilder {
            class: ClassDef {
                name: name.into(),
                module: module.into(),
                methods: MethodTable::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn methods(&self) -> &MethodTable {
        &self.methods
    }

    pub fn method_names(&self) -> Vec<String> {
        self.methods.keys().cloned().collect()
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }

    /// Rebinds `name` to `method`, returning the previous binding.
    pub fn set_method(&mut self, name: &str, method: Method) -> Option<Method> {
        self.methods.insert(name.to_string(), method)
    }

    pub fn instantiate(&self, fields: Map<String, Value>) -> Instance {
        Instance {
            class: self.name.clone(),
            module: self.module.clone(),
            methods: self.methods.clone(),
            fields,
        }
    }
}

pub struct ClassBuilder {
    class: ClassDef,
}

impl ClassBuilder {
    pub fn method<F>(mut self, name: &str, params: &[&str], func: F) -> Self
    where
        F: Fn(&mut Call<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        self.class
            .methods
            .insert(name.to_string(), Method::new(name, params, func));
        self
    }

    pub fn build(self) -> ClassDef {
        self.class
    }
}

/// A type that knows how to describe itself as a [`ClassDef`].
pub trait ClassProvider {
    fn class_def() -> ClassDef;
}

/// An object built from a class. It dispatches through the method table
/// copied when it was constructed.
#[derive(Debug)]
pub struct Instance {
    class: String,
    module: String,
    methods: MethodTable,
    fields: Map<String, Value>,
}

impl Instance {
    pub fn class_name(&self) -> &str {
        &self.class
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn call(&mut self, name: &str, args: Vec<Arg>) -> Result<Value> {
        self.call_with(name, args, BTreeMap::new())
    }

    pub fn call_with(
        &mut self,
        name: &str,
        args: Vec<Arg>,
        kwargs: BTreeMap<String, Arg>,
    ) -> Result<Value> {
        let method = self
            .methods
            .get(name)
            .cloned()
            .ok_or_else(|| DecorError::MethodNotFound {
                class: self.class.clone(),
                method: name.to_string(),
            })?;

        let mut call = Call::new(self.module.clone())
            .on(&self.class, &mut self.fields)
            .with_args(args)
            .with_kwargs(kwargs);
        method.invoke(&mut call)
    }
}
