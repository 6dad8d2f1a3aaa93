pub mod base;
pub mod memory;
pub mod sqs;

pub use base::{QueueMessage, QueueSource};
