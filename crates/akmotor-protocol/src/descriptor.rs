//! 指令参数描述符
//!
//! 每个指令槽位（位置、速度、KP、KD、力矩）对应一个静态的
//! `[min, max, bits]` 描述符。

use crate::ProtocolError;
use crate::constants::{
    KD_DESCRIPTOR, KP_DESCRIPTOR, POSITION_DESCRIPTOR, TORQUE_DESCRIPTOR, VELOCITY_DESCRIPTOR,
};
use crate::quantize::{BitWidth, float_to_uint, step_size, uint_to_float};
use std::fmt;

/// 指令槽位
///
/// 顺序与帧内字段顺序一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandSlot {
    Position = 0,
    Velocity = 1,
    Kp = 2,
    Kd = 3,
    Torque = 4,
}

impl CommandSlot {
    /// 全部槽位（按帧内顺序）
    pub const ALL: [CommandSlot; 5] = [
        CommandSlot::Position,
        CommandSlot::Velocity,
        CommandSlot::Kp,
        CommandSlot::Kd,
        CommandSlot::Torque,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            CommandSlot::Position => "position",
            CommandSlot::Velocity => "velocity",
            CommandSlot::Kp => "kp",
            CommandSlot::Kd => "kd",
            CommandSlot::Torque => "torque",
        }
    }
}

impl fmt::Display for CommandSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 参数描述符
///
/// 不变量：`min`、`max` 有限且 `max > min`。通过 [`ParamDescriptor::new`]
/// 构造时校验，反序列化同样经过校验。
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawDescriptor"))]
pub struct ParamDescriptor {
    min: f32,
    max: f32,
    bits: BitWidth,
}

impl ParamDescriptor {
    /// 创建描述符
    ///
    /// # 错误
    ///
    /// - `InvalidRange`: `min`/`max` 非有限值，或 `max <= min`
    /// - `UnsupportedBitWidth`: `bits` 不是 12 或 16
    pub fn new(min: f32, max: f32, bits: u8) -> Result<Self, ProtocolError> {
        let bits = BitWidth::try_from(bits)?;
        if !min.is_finite() || !max.is_finite() || max <= min {
            return Err(ProtocolError::InvalidRange { min, max });
        }
        Ok(Self { min, max, bits })
    }

    /// 仅供协议常量使用，调用方保证范围合法
    pub(crate) const fn new_const(min: f32, max: f32, bits: BitWidth) -> Self {
        Self { min, max, bits }
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn bits(&self) -> BitWidth {
        self.bits
    }

    /// 量化步长，同时也是往返误差上界
    pub fn step(&self) -> f32 {
        step_size(self.min, self.max, self.bits)
    }

    /// 钳位到 `[min, max]`，NaN 钳位到 `min`
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.min
        } else {
            value.clamp(self.min, self.max)
        }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn encode(&self, value: f32) -> u32 {
        float_to_uint(value, self.min, self.max, self.bits)
    }

    pub fn decode(&self, raw: u32) -> f32 {
        uint_to_float(raw, self.min, self.max, self.bits)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawDescriptor {
    min: f32,
    max: f32,
    bits: u8,
}

#[cfg(feature = "serde")]
impl TryFrom<RawDescriptor> for ParamDescriptor {
    type Error = ProtocolError;

    fn try_from(raw: RawDescriptor) -> Result<Self, Self::Error> {
        ParamDescriptor::new(raw.min, raw.max, raw.bits)
    }
}

/// 五个指令槽位的描述符表
///
/// 默认值为当前固件版本的协议常量。
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DescriptorTable {
    pub position: ParamDescriptor,
    pub velocity: ParamDescriptor,
    pub kp: ParamDescriptor,
    pub kd: ParamDescriptor,
    pub torque: ParamDescriptor,
}

impl DescriptorTable {
    pub fn get(&self, slot: CommandSlot) -> &ParamDescriptor {
        match slot {
            CommandSlot::Position => &self.position,
            CommandSlot::Velocity => &self.velocity,
            CommandSlot::Kp => &self.kp,
            CommandSlot::Kd => &self.kd,
            CommandSlot::Torque => &self.torque,
        }
    }
}

impl Default for DescriptorTable {
    fn default() -> Self {
        Self {
            position: POSITION_DESCRIPTOR,
            velocity: VELOCITY_DESCRIPTOR,
            kp: KP_DESCRIPTOR,
            kd: KD_DESCRIPTOR,
            torque: TORQUE_DESCRIPTOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_range() {
        assert!(ParamDescriptor::new(-1.0, 1.0, 12).is_ok());
        assert_eq!(
            ParamDescriptor::new(1.0, 1.0, 12),
            Err(ProtocolError::InvalidRange { min: 1.0, max: 1.0 })
        );
        assert!(ParamDescriptor::new(2.0, 1.0, 16).is_err());
        assert!(ParamDescriptor::new(f32::NEG_INFINITY, 1.0, 16).is_err());
    }

    #[test]
    fn test_new_validates_bits() {
        assert_eq!(
            ParamDescriptor::new(0.0, 1.0, 10),
            Err(ProtocolError::UnsupportedBitWidth { bits: 10 })
        );
    }

    #[test]
    fn test_default_table_matches_protocol() {
        let table = DescriptorTable::default();
        assert_eq!(table.position.min(), -12.5);
        assert_eq!(table.position.max(), 12.5);
        assert_eq!(table.position.bits(), BitWidth::Bits16);
        for slot in [
            CommandSlot::Velocity,
            CommandSlot::Kp,
            CommandSlot::Kd,
            CommandSlot::Torque,
        ] {
            assert_eq!(table.get(slot).bits(), BitWidth::Bits12, "{}", slot);
        }
        assert_eq!(table.get(CommandSlot::Kp).max(), 500.0);
        assert_eq!(table.get(CommandSlot::Torque).min(), -25.0);
    }

    #[test]
    fn test_clamp() {
        let d = KD_DESCRIPTOR;
        assert_eq!(d.clamp(2.5), 2.5);
        assert_eq!(d.clamp(9.0), 5.0);
        assert_eq!(d.clamp(-1.0), 0.0);
        assert_eq!(d.clamp(f32::NAN), 0.0);
        assert_eq!(d.clamp(d.clamp(9.0)), 5.0);
    }

    #[test]
    fn test_contains() {
        let d = POSITION_DESCRIPTOR;
        assert!(d.contains(-12.5));
        assert!(d.contains(12.5));
        assert!(!d.contains(12.6));
        assert!(!d.contains(f32::NAN));
    }

    #[test]
    fn test_slot_order() {
        let indices: Vec<usize> = CommandSlot::ALL.iter().map(|s| s.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        assert_eq!(CommandSlot::Kd.to_string(), "kd");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_rejects_invalid_descriptor() {
        let ok: Result<ParamDescriptor, _> =
            serde_json::from_str(r#"{"min": -1.0, "max": 1.0, "bits": 12}"#);
        assert!(ok.is_ok());

        let bad_bits: Result<ParamDescriptor, _> =
            serde_json::from_str(r#"{"min": -1.0, "max": 1.0, "bits": 8}"#);
        assert!(bad_bits.is_err());

        let bad_range: Result<ParamDescriptor, _> =
            serde_json::from_str(r#"{"min": 1.0, "max": -1.0, "bits": 16}"#);
        assert!(bad_range.is_err());
    }
}
