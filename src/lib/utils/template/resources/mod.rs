//! Files shipped along with the generated projects

/// The CMake functions that the generated `CMakeLists.txt` relies on
pub const HELPER_SCRIPT: &str = include_str!("Helper.cmake");
