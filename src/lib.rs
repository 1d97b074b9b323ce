//! # lsb_embed 库
//!
//! 本库包含 LSB 隐写工具的核心逻辑：比特编解码、嵌入与提取算法，
//! 以及命令行层使用的文件和图像处理。

// 声明库包含的所有模块。

pub mod bits;
pub mod cli;
pub mod constants;
pub mod error;
pub mod handler;
pub mod steganography;

pub use error::{FormatError, StegoError};
pub use steganography::{LsbCount, embed, extract};
