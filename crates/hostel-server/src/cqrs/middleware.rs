//! Marker traits separating writes from reads
//!
//! Every command and query struct in `features/` implements exactly one of
//! these alongside its `mediator::Request` impl.

/// A request that mutates state.
pub trait Command {}

/// A request that only reads state.
pub trait Query {}
