// Domain layer: configuration model, findings and ports. No I/O here.

pub mod model;
pub mod ports;
