pub mod aggregation;
pub mod array;
pub mod config;
pub mod coordinates;
pub mod dimensions;
pub mod hemispheres;
pub mod longitude;
pub mod spatial;
pub mod stats;
pub mod temporal;

pub mod errors;

// Re-exported so downstream crates build arrays against the same ndarray version
pub use ndarray;
