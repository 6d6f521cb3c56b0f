// Domain layer: the message model and the publishing port.

pub mod model;
pub mod ports;
