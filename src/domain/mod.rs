// Domain layer: the method/class model, the registry that stands in for
// reflection, and the ports decorators and sinks implement.

pub mod method;
pub mod model;
pub mod ports;
pub mod registry;
