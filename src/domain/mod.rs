// Domain layer: shared models and ports (interfaces). No runtime dependencies beyond std/serde.

pub mod model;
pub mod ports;
