//! # 错误类型模块
//!
//! 隐写核心 (`bits` 与 `steganography`) 只返回这里定义的类型化错误，
//! 由 `handler` 层再通过 `anyhow::Context` 附加文件路径等上下文信息。

use thiserror::Error;

/// 嵌入或提取过程中可能出现的错误。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// 载荷 (加上 32 位长度头部) 超出了图像的可用容量。
    #[error("Not enough space in the image: {required} bits required, but only {available} available")]
    Capacity { required: u64, available: u64 },

    /// 提取出的比特流格式不正确。
    #[error("Malformed hidden data: {0}")]
    Format(#[from] FormatError),

    /// 像素缓冲区与每像素通道数不匹配，或通道数少于 3。
    #[error("Invalid pixel layout: {len} samples with {channels} channels per pixel")]
    InvalidLayout { channels: usize, len: usize },

    /// LSB 位数只能是 1 或 2。
    #[error("Invalid LSB count '{0}', expected 1 or 2")]
    InvalidLsbCount(String),

    /// 载荷的比特长度无法用 32 位头部表示。
    #[error("Payload of {bits} bits cannot be described by a 32-bit length header")]
    PayloadTooLarge { bits: u64 },
}

/// 比特流层面的格式错误。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("bit count {bits} is not a multiple of 8")]
    Unaligned { bits: usize },

    #[error("a 32-bit length header is required, but only {available} bits are present")]
    MissingHeader { available: usize },

    #[error("header declares {declared} payload bits, but only {available} follow it")]
    Truncated { declared: u64, available: usize },

    #[error("invalid binary digit '{found}' at position {position}")]
    InvalidDigit { position: usize, found: char },
}

pub type Result<T> = std::result::Result<T, StegoError>;
