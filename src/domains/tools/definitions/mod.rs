//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod check_image;
pub mod file_op;
pub mod food_menu;

pub use check_image::{CheckImageParams, CheckImageTool};
pub use file_op::{FileOperation, FileOperationParams, FileOperationTool, WriteMode};
pub use food_menu::{GetFoodMenuParams, GetFoodMenuTool};
