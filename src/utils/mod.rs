pub mod body;
pub mod data_path;
pub mod fs_atomic;
pub mod output;
pub mod template;
pub mod user_paths;
