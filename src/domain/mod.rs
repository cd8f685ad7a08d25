// Domain layer: models and ports. No external service dependencies here.

pub mod model;
pub mod ports;
