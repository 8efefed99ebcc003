//! Host implementation backed by real child processes

pub mod process;

pub use process::HostProcessOperations;
