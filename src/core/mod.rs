//! Core utilities.

pub(crate) mod io;

pub(crate) use io::BufStream;
