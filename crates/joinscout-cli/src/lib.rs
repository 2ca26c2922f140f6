//! Library side of the `joinscout` binary: logging setup, run files and
//! report rendering.

pub mod logging;
pub mod report;
pub mod runs;
