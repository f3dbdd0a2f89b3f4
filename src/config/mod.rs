//! Configuration module for mdtoggle
//!
//! Typed editor options, recursive merging of option overrides, and
//! persistence of the options file to the platform config directory.

mod merge;
mod options;
mod persistence;

pub use merge::*;
pub use options::*;
pub use persistence::*;
