// Domain layer: entity schemas and the ports the resolver talks through.

pub mod model;
pub mod ports;
