pub mod operation;
pub mod resumable;

pub use operation::{Continuation, Operation};
pub use resumable::Resumable;
