//! 浮点数 ↔ 定宽无符号整数量化
//!
//! 公式（满量程包含约定，除数为 `2^bits - 1`）：
//!
//! - 编码：`round((clamp(x) - x_min) * (2^bits - 1) / (x_max - x_min))`
//! - 解码：`x_int * (x_max - x_min) / (2^bits - 1) + x_min`
//!
//! 编码与解码必须使用同一除数，否则端点处往返会产生偏差。
//! 中间计算使用 f64，保证中点（如 `32767.5`）的舍入结果确定。

use crate::ProtocolError;

/// 量化位宽
///
/// 协议只使用 12 位和 16 位两种宽度。非法位宽只能在 `TryFrom<u8>`
/// 处出现，之后的量化函数不再需要处理错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub enum BitWidth {
    Bits12,
    Bits16,
}

impl BitWidth {
    /// 位数
    pub const fn bits(self) -> u8 {
        match self {
            BitWidth::Bits12 => 12,
            BitWidth::Bits16 => 16,
        }
    }

    /// 最大整数值 `2^bits - 1`（同时也是量化除数）
    pub const fn max_int(self) -> u32 {
        (1u32 << self.bits()) - 1
    }

    /// 字段掩码
    pub const fn mask(self) -> u32 {
        self.max_int()
    }
}

impl TryFrom<u8> for BitWidth {
    type Error = ProtocolError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            12 => Ok(BitWidth::Bits12),
            16 => Ok(BitWidth::Bits16),
            _ => Err(ProtocolError::UnsupportedBitWidth { bits }),
        }
    }
}

impl From<BitWidth> for u8 {
    fn from(width: BitWidth) -> Self {
        width.bits()
    }
}

/// 量化步长 `(x_max - x_min) / (2^bits - 1)`
///
/// 往返误差上界：`|uint_to_float(float_to_uint(x)) - x| <= step_size`。
pub fn step_size(x_min: f32, x_max: f32, bits: BitWidth) -> f32 {
    ((x_max as f64 - x_min as f64) / bits.max_int() as f64) as f32
}

/// 浮点数编码为无符号整数
///
/// 超出 `[x_min, x_max]` 的输入先被钳位；NaN 视为 `x_min`。
/// 结果保证不超过 `2^bits - 1`。
pub fn float_to_uint(x: f32, x_min: f32, x_max: f32, bits: BitWidth) -> u32 {
    let max_int = bits.max_int();
    let span = x_max as f64 - x_min as f64;
    if !(span > 0.0) {
        return 0;
    }

    let x = if x.is_nan() {
        x_min
    } else {
        x.clamp(x_min, x_max)
    };

    let scaled = ((x as f64 - x_min as f64) * max_int as f64 / span).round();
    // `as` 对负数和 NaN 饱和到 0
    (scaled as u32).min(max_int)
}

/// 无符号整数解码为浮点数
///
/// 高于 `2^bits - 1` 的输入按满量程处理。
pub fn uint_to_float(x_int: u32, x_min: f32, x_max: f32, bits: BitWidth) -> f32 {
    let max_int = bits.max_int();
    let span = x_max as f64 - x_min as f64;
    let x_int = x_int.min(max_int);
    (x_int as f64 * span / max_int as f64 + x_min as f64) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bit_width_from_u8() {
        assert_eq!(BitWidth::try_from(12).unwrap(), BitWidth::Bits12);
        assert_eq!(BitWidth::try_from(16).unwrap(), BitWidth::Bits16);
        assert_eq!(
            BitWidth::try_from(8),
            Err(ProtocolError::UnsupportedBitWidth { bits: 8 })
        );
        assert!(BitWidth::try_from(32).is_err());
    }

    #[test]
    fn test_bit_width_divisors() {
        assert_eq!(BitWidth::Bits12.max_int(), 4095);
        assert_eq!(BitWidth::Bits16.max_int(), 65535);
        assert_eq!(u8::from(BitWidth::Bits16), 16);
    }

    #[test]
    fn test_float_to_uint_boundary() {
        assert_eq!(float_to_uint(0.0, 0.0, 10.0, BitWidth::Bits12), 0);
        assert_eq!(float_to_uint(10.0, 0.0, 10.0, BitWidth::Bits12), 4095);
        assert_eq!(float_to_uint(-12.5, -12.5, 12.5, BitWidth::Bits16), 0);
        assert_eq!(float_to_uint(12.5, -12.5, 12.5, BitWidth::Bits16), 65535);
    }

    #[test]
    fn test_float_to_uint_rounds_midpoint() {
        // 12.5 * 65535 / 25 = 32767.5，四舍五入到 32768
        assert_eq!(float_to_uint(0.0, -12.5, 12.5, BitWidth::Bits16), 32768);
        // 5.0 * 4095 / 10 = 2047.5
        assert_eq!(float_to_uint(5.0, 0.0, 10.0, BitWidth::Bits12), 2048);
        // 30 * 4095 / 500 = 245.7
        assert_eq!(float_to_uint(30.0, 0.0, 500.0, BitWidth::Bits12), 246);
    }

    #[test]
    fn test_float_to_uint_clamps_out_of_range() {
        assert_eq!(float_to_uint(100.0, -12.5, 12.5, BitWidth::Bits16), 65535);
        assert_eq!(float_to_uint(-100.0, -12.5, 12.5, BitWidth::Bits16), 0);
        assert_eq!(
            float_to_uint(f32::INFINITY, 0.0, 5.0, BitWidth::Bits12),
            4095
        );
        assert_eq!(float_to_uint(f32::NAN, 0.0, 5.0, BitWidth::Bits12), 0);
    }

    #[test]
    fn test_float_to_uint_degenerate_span() {
        assert_eq!(float_to_uint(1.0, 2.0, 2.0, BitWidth::Bits12), 0);
        assert_eq!(float_to_uint(1.0, 3.0, 2.0, BitWidth::Bits12), 0);
    }

    #[test]
    fn test_uint_to_float_boundary() {
        let min = uint_to_float(0, 0.0, 10.0, BitWidth::Bits12);
        let max = uint_to_float(4095, 0.0, 10.0, BitWidth::Bits12);
        assert_eq!(min, 0.0);
        assert_eq!(max, 10.0);

        let min = uint_to_float(0, -12.5, 12.5, BitWidth::Bits16);
        let max = uint_to_float(65535, -12.5, 12.5, BitWidth::Bits16);
        assert_eq!(min, -12.5);
        assert_eq!(max, 12.5);
    }

    #[test]
    fn test_uint_to_float_saturates_oversized_input() {
        let v = uint_to_float(0xFFFF, 0.0, 10.0, BitWidth::Bits12);
        assert_eq!(v, 10.0);
    }

    #[test]
    fn test_position_midpoint_roundtrip() {
        let encoded = float_to_uint(0.0, -12.5, 12.5, BitWidth::Bits16);
        let decoded = uint_to_float(encoded, -12.5, 12.5, BitWidth::Bits16);
        assert!(decoded.abs() < 0.00039, "decoded = {}", decoded);
    }

    #[test]
    fn test_step_size() {
        let step = step_size(-12.5, 12.5, BitWidth::Bits16);
        assert!((step - 25.0 / 65535.0).abs() < 1e-9);
        let step = step_size(0.0, 5.0, BitWidth::Bits12);
        assert!((step - 5.0 / 4095.0).abs() < 1e-9);
    }

    proptest! {
        /// 16 位往返误差不超过一个量化步长
        #[test]
        fn roundtrip_within_one_step_16(x in -12.5f32..12.5f32) {
            let step = step_size(-12.5, 12.5, BitWidth::Bits16);
            let raw = float_to_uint(x, -12.5, 12.5, BitWidth::Bits16);
            let back = uint_to_float(raw, -12.5, 12.5, BitWidth::Bits16);
            prop_assert!((back - x).abs() <= step, "x = {}, back = {}", x, back);
        }

        /// 12 位往返误差不超过一个量化步长
        #[test]
        fn roundtrip_within_one_step_12(x in -50.0f32..50.0f32) {
            let step = step_size(-50.0, 50.0, BitWidth::Bits12);
            let raw = float_to_uint(x, -50.0, 50.0, BitWidth::Bits12);
            let back = uint_to_float(raw, -50.0, 50.0, BitWidth::Bits12);
            prop_assert!((back - x).abs() <= step, "x = {}, back = {}", x, back);
        }

        /// 任意输入都不会超出位宽
        #[test]
        fn encode_never_exceeds_width(x in proptest::num::f32::ANY) {
            prop_assert!(float_to_uint(x, -25.0, 25.0, BitWidth::Bits12) <= 4095);
            prop_assert!(float_to_uint(x, -12.5, 12.5, BitWidth::Bits16) <= 65535);
        }

        /// 编码单调不减
        #[test]
        fn encode_is_monotonic(a in 0.0f32..500.0f32, b in 0.0f32..500.0f32) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(
                float_to_uint(lo, 0.0, 500.0, BitWidth::Bits12)
                    <= float_to_uint(hi, 0.0, 500.0, BitWidth::Bits12)
            );
        }
    }
}
