pub mod concurrency;
pub mod conversions;
pub mod destination;
pub mod error;
mod macros;
pub mod masking;
pub mod pipeline;
pub mod source;
pub mod types;
pub mod workers;
