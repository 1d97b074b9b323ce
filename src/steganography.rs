//! # 隐写核心算法模块
//!
//! 像素以扁平的交错样本缓冲区给出 (`channels` 个样本为一个像素)。
//! 只有每个像素的前三个通道 (R, G, B) 携带数据，按像素顺序、通道顺序依次写入；
//! 其余通道原样保留。比特流的前 32 位是大端序的载荷比特长度。

use crate::bits::{Bits, bits_to_bytes};
use crate::constants::{COLOR_CHANNELS, HEADER_BITS};
use crate::error::{FormatError, Result, StegoError};
use log::debug;
use std::fmt;
use std::str::FromStr;

/// 每个颜色通道使用的最低有效位数。
///
/// 嵌入与提取必须使用相同的值；图像中不记录该值，不一致时只会得到错误的数据。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LsbCount {
    One,
    #[default]
    Two,
}

impl LsbCount {
    pub const fn bits(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }

    /// 低 k 位的掩码，即 `2^k - 1`。
    pub const fn value_mask(self) -> u8 {
        (1 << self.bits()) - 1
    }

    /// 清除低 k 位的掩码，即 `0xFF ^ (2^k - 1)`。
    pub const fn clear_mask(self) -> u8 {
        0xFF ^ self.value_mask()
    }
}

impl TryFrom<u8> for LsbCount {
    type Error = StegoError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            other => Err(StegoError::InvalidLsbCount(other.to_string())),
        }
    }
}

impl FromStr for LsbCount {
    type Err = StegoError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u8>()
            .map_err(|_| StegoError::InvalidLsbCount(s.to_string()))
            .and_then(Self::try_from)
    }
}

impl fmt::Display for LsbCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// 计算可用于隐写的比特数：`像素数 × 3 × k`。Alpha 通道不计入容量。
pub fn capacity_bits(pixel_count: usize, lsb: LsbCount) -> u64 {
    pixel_count as u64 * COLOR_CHANNELS as u64 * lsb.bits() as u64
}

fn check_layout(pixels: &[u8], channels: usize) -> Result<usize> {
    if channels < COLOR_CHANNELS || pixels.len() % channels != 0 {
        return Err(StegoError::InvalidLayout {
            channels,
            len: pixels.len(),
        });
    }
    Ok(pixels.len() / channels)
}

/// 将载荷嵌入到像素样本中，返回一个新的像素缓冲区。
///
/// 输出与输入长度、形状完全相同，只有承载了数据的像素的 RGB 通道低 k 位可能不同。
///
/// # Errors
///
/// * [`StegoError::InvalidLayout`] - 缓冲区与通道数不匹配。
/// * [`StegoError::Capacity`] - `32 + 载荷比特数` 超出可用容量。此时不产生任何输出。
pub fn embed(payload: &[u8], pixels: &[u8], channels: usize, lsb: LsbCount) -> Result<Vec<u8>> {
    let pixel_count = check_layout(pixels, channels)?;

    let payload_bits = Bits::from_bytes(payload);
    let required = HEADER_BITS as u64 + payload_bits.len() as u64;
    let available = capacity_bits(pixel_count, lsb);
    debug!("embed: {required} bits required, {available} bits available at {lsb} LSB");

    if required > available {
        return Err(StegoError::Capacity {
            required,
            available,
        });
    }

    let declared = u32::try_from(payload_bits.len()).map_err(|_| StegoError::PayloadTooLarge {
        bits: payload_bits.len() as u64,
    })?;

    let mut stream = Bits::from_bytes(&declared.to_be_bytes());
    stream.extend_from(&payload_bits);

    let mut groups = stream.groups(lsb.bits());
    let mut output = pixels.to_vec();

    // 容量检查保证像素不会先于比特流耗尽。
    'pixels: for pixel in output.chunks_exact_mut(channels) {
        for sample in &mut pixel[..COLOR_CHANNELS] {
            let Some(group) = groups.next() else {
                break 'pixels;
            };
            *sample = (*sample & lsb.clear_mask()) | group;
        }
    }

    Ok(output)
}

/// 从像素样本中提取隐藏的载荷。
///
/// 先收集所有像素 RGB 通道的低 k 位，再读取 32 位长度头部，最后取出头部声明的比特数。
///
/// # Errors
///
/// * [`StegoError::InvalidLayout`] - 缓冲区与通道数不匹配。
/// * [`FormatError::MissingHeader`] - 图像容量不足 32 位。
/// * [`FormatError::Truncated`] - 头部声明的长度超出了实际收集到的比特数。
/// * [`FormatError::Unaligned`] - 头部声明的长度不是 8 的整数倍。
pub fn extract(pixels: &[u8], channels: usize, lsb: LsbCount) -> Result<Vec<u8>> {
    let pixel_count = check_layout(pixels, channels)?;

    let mut stream = Bits::with_capacity(pixel_count * COLOR_CHANNELS * lsb.bits());
    for pixel in pixels.chunks_exact(channels) {
        for &sample in &pixel[..COLOR_CHANNELS] {
            stream.push_group(sample & lsb.value_mask(), lsb.bits());
        }
    }

    let bits = stream.as_slice();
    if bits.len() < HEADER_BITS {
        return Err(FormatError::MissingHeader {
            available: bits.len(),
        }
        .into());
    }

    let (header, body) = bits.split_at(HEADER_BITS);
    let declared = header
        .iter()
        .fold(0u32, |acc, &bit| (acc << 1) | u32::from(bit));
    debug!(
        "extract: header declares {declared} payload bits, {} bits collected after header",
        body.len()
    );

    let payload = usize::try_from(declared)
        .ok()
        .and_then(|len| body.get(..len))
        .ok_or(FormatError::Truncated {
            declared: u64::from(declared),
            available: body.len(),
        })?;

    Ok(bits_to_bytes(payload)?)
}
