//! 指令帧打包
//!
//! 位域布局（MSB 在前）：
//!
//! ```text
//! Byte 0: Position [bit15~bit8]
//! Byte 1: Position [bit7~bit0]
//! Byte 2: Velocity [bit11~bit4]
//! Byte 3: Velocity [bit3~bit0] | Kp [bit11~bit8]
//! Byte 4: Kp [bit7~bit0]
//! Byte 5: Kd [bit11~bit4]
//! Byte 6: Kd [bit3~bit0] | Torque [bit11~bit8]
//! Byte 7: Torque [bit7~bit0]
//! ```

use crate::MotorFrame;
use crate::constants::{FRAME_LEN, INIT_KD, INIT_KP};
use crate::descriptor::{CommandSlot, DescriptorTable};
use crate::mode::sentinel_code;

/// 指令向量（物理量，按槽位顺序）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CommandVector {
    pub position: f32,
    pub velocity: f32,
    pub kp: f32,
    pub kd: f32,
    pub torque: f32,
}

impl CommandVector {
    pub const ZERO: CommandVector = CommandVector {
        position: 0.0,
        velocity: 0.0,
        kp: 0.0,
        kd: 0.0,
        torque: 0.0,
    };

    /// 上电预设：零位置、零速度、标称增益、零力矩
    pub const INIT: CommandVector = CommandVector {
        position: 0.0,
        velocity: 0.0,
        kp: INIT_KP,
        kd: INIT_KD,
        torque: 0.0,
    };

    pub fn new(position: f32, velocity: f32, kp: f32, kd: f32, torque: f32) -> Self {
        Self {
            position,
            velocity,
            kp,
            kd,
            torque,
        }
    }

    pub fn get(&self, slot: CommandSlot) -> f32 {
        match slot {
            CommandSlot::Position => self.position,
            CommandSlot::Velocity => self.velocity,
            CommandSlot::Kp => self.kp,
            CommandSlot::Kd => self.kd,
            CommandSlot::Torque => self.torque,
        }
    }

    pub fn set(&mut self, slot: CommandSlot, value: f32) {
        match slot {
            CommandSlot::Position => self.position = value,
            CommandSlot::Velocity => self.velocity = value,
            CommandSlot::Kp => self.kp = value,
            CommandSlot::Kd => self.kd = value,
            CommandSlot::Torque => self.torque = value,
        }
    }

    /// 逐槽位钳位到描述符范围
    pub fn clamped(&self, table: &DescriptorTable) -> Self {
        let mut out = *self;
        for slot in CommandSlot::ALL {
            out.set(slot, table.get(slot).clamp(self.get(slot)));
        }
        out
    }
}

/// 量化后的指令（各字段已按位宽掩码）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuantizedCommand {
    pub position: u16,
    pub velocity: u16,
    pub kp: u16,
    pub kd: u16,
    pub torque: u16,
}

impl QuantizedCommand {
    /// 钳位并量化整个指令向量
    pub fn quantize(values: &CommandVector, table: &DescriptorTable) -> Self {
        let q = |slot: CommandSlot| {
            let descriptor = table.get(slot);
            (descriptor.encode(values.get(slot)) & descriptor.bits().mask()) as u16
        };
        Self {
            position: q(CommandSlot::Position),
            velocity: q(CommandSlot::Velocity),
            kp: q(CommandSlot::Kp),
            kd: q(CommandSlot::Kd),
            torque: q(CommandSlot::Torque),
        }
    }

    /// 按指令帧布局打包为 8 字节
    pub fn to_bytes(&self) -> [u8; FRAME_LEN] {
        let p = self.position;
        let v = self.velocity & 0x0FFF;
        let kp = self.kp & 0x0FFF;
        let kd = self.kd & 0x0FFF;
        let t = self.torque & 0x0FFF;

        let mut data = [0u8; FRAME_LEN];
        data[0] = (p >> 8) as u8;
        data[1] = (p & 0xFF) as u8;
        data[2] = (v >> 4) as u8;
        data[3] = (((v & 0x0F) << 4) | (kp >> 8)) as u8;
        data[4] = (kp & 0xFF) as u8;
        data[5] = (kd >> 4) as u8;
        data[6] = (((kd & 0x0F) << 4) | (t >> 8)) as u8;
        data[7] = (t & 0xFF) as u8;
        data
    }

    /// 按指令帧布局解包（用于检查已发送的指令帧，不适用于回复帧）
    pub fn from_bytes(data: &[u8; FRAME_LEN]) -> Self {
        let b = data.map(u16::from);
        Self {
            position: (b[0] << 8) | b[1],
            velocity: (b[2] << 4) | (b[3] >> 4),
            kp: ((b[3] & 0x0F) << 8) | b[4],
            kd: (b[5] << 4) | (b[6] >> 4),
            torque: ((b[6] & 0x0F) << 8) | b[7],
        }
    }

    /// 打包结果与模式哨兵相同时，将 KD 下调一个量化步长
    ///
    /// Byte 0-6 全为 `0xFF` 意味着 KD 为 `0xFFF`，而 KD 的最低位位于
    /// Byte 6 的高半字节，下调后 Byte 6 变为 `0xEF`。返回是否做了调整。
    pub fn avoid_sentinel(&mut self) -> bool {
        if sentinel_code(&self.to_bytes()).is_none() {
            return false;
        }
        self.kd = self.kd.saturating_sub(1);
        true
    }

    /// 反量化为物理量
    pub fn dequantize(&self, table: &DescriptorTable) -> CommandVector {
        CommandVector {
            position: table.position.decode(self.position as u32),
            velocity: table.velocity.decode(self.velocity as u32),
            kp: table.kp.decode(self.kp as u32),
            kd: table.kd.decode(self.kd as u32),
            torque: table.torque.decode(self.torque as u32),
        }
    }
}

/// 电机指令帧
///
/// ```rust
/// use akmotor_protocol::{CommandVector, DescriptorTable, MotorCommand};
///
/// let table = DescriptorTable::default();
/// let cmd = MotorCommand::new(0x01, CommandVector::new(0.0, 0.0, 30.0, 0.5, 0.0));
/// let frame = cmd.to_frame(&table);
/// assert_eq!(frame.data, [0x80, 0x00, 0x80, 0x00, 0xF6, 0x19, 0xA8, 0x00]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorCommand {
    pub address: u16,
    pub values: CommandVector,
}

impl MotorCommand {
    pub fn new(address: u16, values: CommandVector) -> Self {
        Self { address, values }
    }

    /// 转换为 CAN 帧（保证不会与模式哨兵帧相同）
    pub fn to_frame(&self, table: &DescriptorTable) -> MotorFrame {
        let mut quantized = QuantizedCommand::quantize(&self.values, table);
        quantized.avoid_sentinel();
        MotorFrame::new_standard(self.address, &quantized.to_bytes())
    }
}
