use crate::domain::method::{ClassDef, ClassProvider, Instance};
use crate::utils::error::{DecorError, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A binding in a module namespace that points at a class declared in
/// another module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRef {
    pub module: String,
    pub class: String,
}

#[derive(Debug, Clone)]
pub struct Module {
    name: String,
    classes: BTreeMap<String, ClassDef>,
    imports: BTreeMap<String, ClassRef>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            classes: BTreeMap::new(),
            imports: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self, name: &str) -> Option<&ClassDef> {
        self.classes.get(name)
    }

    pub fn class_mut(&mut self, name: &str) -> Option<&mut ClassDef> {
        self.classes.get_mut(name)
    }

    /// Classes whose declaring module is this one.
    pub fn defined_classes(&self) -> Vec<String> {
        self.classes
            .values()
            .filter(|c| c.module() == self.name)
            .map(|c| c.name().to_string())
            .collect()
    }

    /// Every class binding visible in the namespace: defined classes under
    /// their own name plus imports under their alias, ordered by binding
    /// name.
    pub fn namespace(&self) -> Vec<(String, ClassRef)> {
        let mut bindings: BTreeMap<String, ClassRef> = self.imports.clone();
        for class in self.classes.values() {
            bindings.insert(
                class.name().to_string(),
                ClassRef {
                    module: class.module().to_string(),
                    class: class.name().to_string(),
                },
            );
        }
        bindings.into_iter().collect()
    }
}

/// All registered modules.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    modules: BTreeMap<String, Module>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn module(&self, name: &str) -> Result<&Module> {
        self.modules
            .get(name)
            .ok_or_else(|| DecorError::ModuleNotFound {
                module: name.to_string(),
            })
    }

    pub fn module_mut(&mut self, name: &str) -> Result<&mut Module> {
        self.modules
            .get_mut(name)
            .ok_or_else(|| DecorError::ModuleNotFound {
                module: name.to_string(),
            })
    }

    pub fn module_names(&self) -> Vec<String> {
        self.modules.keys().cloned().collect()
    }

    /// Registers `class` in its declaring module, creating the module if
    /// needed. A class with the same name is replaced.
    pub fn define(&mut self, class: ClassDef) -> &mut Self {
        let module = self
            .modules
            .entry(class.module().to_string())
            .or_insert_with(|| Module::new(class.module()));
        module.classes.insert(class.name().to_string(), class);
        self
    }

    pub fn define_type<T: ClassProvider>(&mut self) -> &mut Self {
        self.define(T::class_def())
    }

    /// Binds `alias` in `into` to the class `class` of module `from`.
    pub fn import(&mut self, into: &str, alias: &str, from: &str, class: &str) -> Result<&mut Self> {
        self.class(from, class)?;
        let module = self
            .modules
            .entry(into.to_string())
            .or_insert_with(|| Module::new(into));
        module.imports.insert(
            alias.to_string(),
            ClassRef {
                module: from.to_string(),
                class: class.to_string(),
            },
        );
        Ok(self)
    }

    pub fn class(&self, module: &str, class: &str) -> Result<&ClassDef> {
        self.module(module)?
            .class(class)
            .ok_or_else(|| DecorError::ClassNotFound {
                module: module.to_string(),
                class: class.to_string(),
            })
    }

    pub fn class_mut(&mut self, module: &str, class: &str) -> Result<&mut ClassDef> {
        self.module_mut(module)?
            .class_mut(class)
            .ok_or_else(|| DecorError::ClassNotFound {
                module: module.to_string(),
                class: class.to_string(),
            })
    }

    pub fn instantiate(
        &self,
        module: &str,
        class: &str,
        fields: Map<String, Value>,
    ) -> Result<Instance> {
        Ok(self.class(module, class)?.instantiate(fields))
    }
}
