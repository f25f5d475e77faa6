#![allow(dead_code, unused_imports)]

pub mod channels;
pub mod probes;
pub mod strategies;

pub use channels::*;
pub use probes::*;
pub use strategies::*;
