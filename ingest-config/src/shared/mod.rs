mod base;
mod batch;
mod connection;
mod queue;
mod worker;

pub use base::*;
pub use batch::*;
pub use connection::*;
pub use queue::*;
pub use worker::*;
