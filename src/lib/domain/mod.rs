pub mod build_folder;
pub mod dependency_tree;
pub mod generator_options;
pub mod project_folder;
pub mod target;
