// Domain layer: row models and ports. Adapters and the generator live elsewhere.

pub mod model;
pub mod ports;
