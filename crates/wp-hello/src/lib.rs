pub mod cli;
pub mod error;
pub mod module;
pub mod params;
pub mod telemetry;

pub use error::ModuleError;
pub use module::{InvocationResult, ModuleOutcome, invoke, run};
pub use params::{InvocationRequest, ModuleArgs};
