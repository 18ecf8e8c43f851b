pub mod building;
pub mod macros;
pub mod metrics;
pub mod sustainability;
pub mod trends;

pub use building::*;
pub use metrics::*;
pub use sustainability::*;
pub use trends::*;
