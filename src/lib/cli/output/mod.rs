//! Everything that builds and runs the command lines of the external tools
pub mod arguments;
pub mod executors;
