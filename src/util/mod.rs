//! Utility code; candidates for factoring out.

pub mod port_lock;
