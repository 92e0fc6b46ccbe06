//! File formats and DTOs for the `edgecloud` binary.

pub mod io;
