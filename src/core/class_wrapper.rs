use crate::core::applicator::decorate_methods_in_class;
use crate::domain::method::{ClassDef, Instance};
use crate::domain::ports::Decorator;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// When [`DecoratedClass`] decorates its class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Redecoration {
    /// On the first instantiation only.
    #[default]
    Once,
    /// On every instantiation. Wrappers compound: the n-th instance runs
    /// the decorator n times around each method.
    EveryInstantiation,
}

/// A class whose methods get decorated when it is instantiated rather
/// than when it is defined.
pub struct DecoratedClass {
    class: ClassDef,
    decorator: Arc<dyn Decorator>,
    policy: Redecoration,
    decorations: usize,
}

impl DecoratedClass {
    pub fn new(class: ClassDef, decorator: Arc<dyn Decorator>) -> Self {
        Self {
            class,
            decorator,
            policy: Redecoration::default(),
            decorations: 0,
        }
    }

    pub fn with_policy(mut self, policy: Redecoration) -> Self {
        self.policy = policy;
        self
    }

    pub fn class(&self) -> &ClassDef {
        &self.class
    }

    /// How many times the method table has been decorated so far.
    pub fn decorations(&self) -> usize {
        self.decorations
    }

    pub fn instantiate(&mut self, fields: Map<String, Value>) -> Instance {
        let due = match self.policy {
            Redecoration::Once => self.decorations == 0,
            Redecoration::EveryInstantiation => true,
        };
        if due {
            decorate_methods_in_class(&mut self.class, self.decorator.as_ref());
            self.decorations += 1;
        }
        self.class.instantiate(fields)
    }
}
