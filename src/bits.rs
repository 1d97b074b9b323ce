//! # 比特编解码模块
//!
//! 在字节序列与比特序列之间互相转换。每个字节按最高位优先展开为 8 个比特，
//! 嵌入器和提取器共享这一种表示。

use crate::error::FormatError;
use std::fmt;
use std::str::FromStr;

/// 一个有序的比特序列。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bits(Vec<bool>);

impl Bits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// 将字节序列展开为比特序列，每个字节最高位在前。
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut bits = Self::with_capacity(data.len() * 8);
        for &byte in data {
            bits.push_group(byte, 8);
        }
        bits
    }

    /// 将比特序列按 8 位一组还原为字节。
    ///
    /// # Errors
    ///
    /// 如果长度不是 8 的整数倍，返回 [`FormatError::Unaligned`]。
    pub fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
        bits_to_bytes(&self.0)
    }

    /// 追加 `value` 的低 `width` 位，组内最高位在前。
    pub fn push_group(&mut self, value: u8, width: usize) {
        debug_assert!(width <= 8);
        self.0
            .extend((0..width).rev().map(|shift| (value >> shift) & 1 == 1));
    }

    pub fn extend_from(&mut self, other: &Bits) {
        self.0.extend_from_slice(&other.0);
    }

    /// 按 `width` 位一组依次读出无符号整数值。
    ///
    /// 末尾不足 `width` 位的一组按实际位数读出。
    pub fn groups(&self, width: usize) -> impl Iterator<Item = u8> + '_ {
        self.0.chunks(width).map(pack)
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0
            .iter()
            .try_for_each(|&bit| f.write_str(if bit { "1" } else { "0" }))
    }
}

impl FromStr for Bits {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .enumerate()
            .map(|(position, found)| match found {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(FormatError::InvalidDigit { position, found }),
            })
            .collect::<Result<Vec<bool>, _>>()
            .map(Self)
    }
}

/// 将字节序列转换为比特序列。对任意输入 (包括空序列) 都不会失败。
pub fn bytes_to_bits(data: &[u8]) -> Bits {
    Bits::from_bytes(data)
}

/// 将比特序列转换回字节序列。
///
/// # Errors
///
/// 如果比特数不是 8 的整数倍，返回 [`FormatError::Unaligned`]，而不是静默丢弃末尾的比特。
pub fn bits_to_bytes(bits: &[bool]) -> Result<Vec<u8>, FormatError> {
    if bits.len() % 8 != 0 {
        return Err(FormatError::Unaligned { bits: bits.len() });
    }
    Ok(bits.chunks_exact(8).map(pack).collect())
}

fn pack(group: &[bool]) -> u8 {
    group
        .iter()
        .fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_expand_most_significant_bit_first() {
        assert_eq!(bytes_to_bits(b"\x01\x02").to_string(), "0000000100000010");
    }

    #[test]
    fn bit_string_packs_back_to_bytes() {
        let bits: Bits = "0000000100000010".parse().unwrap();
        assert_eq!(bits.to_bytes().unwrap(), b"\x01\x02");
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(bytes_to_bits(&[]).is_empty());
        assert_eq!(bits_to_bytes(&[]).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn every_byte_value_survives_conversion() {
        let all: Vec<u8> = (0..=255).collect();
        let bits = bytes_to_bits(&all);
        assert_eq!(bits.len(), 256 * 8);
        assert_eq!(bits.to_bytes().unwrap(), all);
    }

    #[test]
    fn partial_trailing_group_is_rejected() {
        let bits: Bits = "000000010".parse().unwrap();
        assert_eq!(bits.to_bytes(), Err(FormatError::Unaligned { bits: 9 }));
    }

    #[test]
    fn non_binary_digit_is_rejected() {
        let err = "0102".parse::<Bits>().unwrap_err();
        assert_eq!(
            err,
            FormatError::InvalidDigit {
                position: 3,
                found: '2'
            }
        );
    }

    #[test]
    fn groups_read_fixed_width_values() {
        let bits = bytes_to_bits(&[0b1011_0001]);
        assert_eq!(bits.groups(2).collect::<Vec<_>>(), vec![0b10, 0b11, 0b00, 0b01]);
        assert_eq!(bits.groups(1).filter(|&b| b == 1).count(), 4);
    }

    #[test]
    fn push_group_keeps_only_low_bits() {
        let mut bits = Bits::new();
        bits.push_group(0b1111_1110, 2);
        bits.push_group(0b0000_0001, 1);
        assert_eq!(bits.to_string(), "101");
    }
}
