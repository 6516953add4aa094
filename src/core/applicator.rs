use crate::domain::method::ClassDef;
use crate::domain::ports::Decorator;
use crate::domain::registry::{ClassRef, Registry};
use crate::utils::error::Result;

/// Rebinds every method of `class` to `decorator`'s wrapped version, in
/// method-name order. Returns the number of methods rebound.
///
/// To apply several decorators, pass a [`DecoratorChain`](super::compose::DecoratorChain).
pub fn decorate_methods_in_class(class: &mut ClassDef, decorator: &dyn Decorator) -> usize {
    let mut rebound = 0;
    for name in class.method_names() {
        if let Some(method) = class.method(&name).cloned() {
            class.set_method(&name, decorator.decorate(method));
            rebound += 1;
        }
    }
    tracing::debug!("Decorated {} methods of {}", rebound, class.name());
    rebound
}

/// Decorates the classes declared in `module_name` itself. Classes the
/// module merely imports are left alone.
pub fn decorate_classes(
    registry: &mut Registry,
    module_name: &str,
    decorator: &dyn Decorator,
) -> Result<usize> {
    let classes = registry.module(module_name)?.defined_classes();

    for class in &classes {
        decorate_methods_in_class(registry.class_mut(module_name, class)?, decorator);
    }

    tracing::info!("Decorated {} classes in module {}", classes.len(), module_name);
    Ok(classes.len())
}

/// Decorates every class visible from `module_name`: the ones it declares
/// and the ones bound through imports, wherever they are declared.
///
/// Each binding is decorated, so a class bound under two names is wrapped
/// twice.
pub fn decorate_everything(
    registry: &mut Registry,
    module_name: &str,
    decorator: &dyn Decorator,
) -> Result<usize> {
    let bindings = registry.module(module_name)?.namespace();

    // resolve up front so a dangling binding fails before anything is rebound
    for (_, ClassRef { module, class }) in &bindings {
        registry.class(module, class)?;
    }

    for (alias, ClassRef { module, class }) in &bindings {
        tracing::debug!("Decorating {} ({}.{})", alias, module, class);
        decorate_methods_in_class(registry.class_mut(module, class)?, decorator);
    }

    tracing::info!(
        "Decorated {} classes visible from module {}",
        bindings.len(),
        module_name
    );
    Ok(bindings.len())
}
