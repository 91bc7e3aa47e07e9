//! 回复帧解析
//!
//! 回复帧布局与指令帧不对称：Byte 0 是电机自身的编号，其后依次为
//! 位置、速度、力矩（只回传这三项，KP/KD 只存在于指令中）。
//!
//! ```text
//! Byte 0: Motor ID
//! Byte 1: Position [bit15~bit8]
//! Byte 2: Position [bit7~bit0]
//! Byte 3: Velocity [bit11~bit4]
//! Byte 4: Velocity [bit3~bit0] | Torque [bit11~bit8]
//! Byte 5: Torque [bit7~bit0]
//! ```

use crate::constants::REPLY_MIN_LEN;
use crate::descriptor::DescriptorTable;
use crate::mode::sentinel_code;
use crate::{MotorFrame, ProtocolError};

/// 回复帧原始字段（未反量化）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplyFeedback {
    /// 回复方的电机编号（Byte 0）
    pub motor_id: u8,
    /// 16 位位置
    pub position: u16,
    /// 12 位速度
    pub velocity: u16,
    /// 12 位力矩
    pub torque: u16,
}

impl ReplyFeedback {
    /// 从原始字节解析
    ///
    /// # 错误
    ///
    /// - `InvalidLength`: 有效字节不足 6 个
    /// - `UnexpectedSentinel`: 除最后一个字节外全部为 `0xFF`（模式哨兵帧，不论长度）
    pub fn parse(data: &[u8]) -> Result<Self, ProtocolError> {
        if data.len() < REPLY_MIN_LEN {
            return Err(ProtocolError::InvalidLength {
                expected: REPLY_MIN_LEN,
                actual: data.len(),
            });
        }

        if let Some(code) = sentinel_code(data) {
            return Err(ProtocolError::UnexpectedSentinel { code });
        }

        let b: [u16; REPLY_MIN_LEN] = [
            data[0] as u16,
            data[1] as u16,
            data[2] as u16,
            data[3] as u16,
            data[4] as u16,
            data[5] as u16,
        ];

        Ok(Self {
            motor_id: data[0],
            position: (b[1] << 8) | b[2],
            velocity: (b[3] << 4) | (b[4] >> 4),
            torque: ((b[4] & 0x0F) << 8) | b[5],
        })
    }

    /// 反量化为物理量
    pub fn to_telemetry(&self, table: &DescriptorTable) -> Telemetry {
        Telemetry {
            position: table.position.decode(self.position as u32),
            velocity: table.velocity.decode(self.velocity as u32),
            torque: table.torque.decode(self.torque as u32),
        }
    }
}

impl TryFrom<MotorFrame> for ReplyFeedback {
    type Error = ProtocolError;

    fn try_from(frame: MotorFrame) -> Result<Self, Self::Error> {
        Self::parse(frame.data_slice())
    }
}

/// 遥测向量（位置、速度、力矩）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Telemetry {
    /// 位置（rad）
    pub position: f32,
    /// 速度（rad/s）
    pub velocity: f32,
    /// 力矩（N·m）
    pub torque: f32,
}

impl Telemetry {
    /// 解析回复帧并反量化
    pub fn from_frame(frame: &MotorFrame, table: &DescriptorTable) -> Result<Self, ProtocolError> {
        Ok(ReplyFeedback::parse(frame.data_slice())?.to_telemetry(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reply_layout() {
        let data = [0x01, 0x12, 0x34, 0xAB, 0xCD, 0xEF, 0x00, 0x00];
        let reply = ReplyFeedback::parse(&data).unwrap();
        assert_eq!(reply.motor_id, 0x01);
        assert_eq!(reply.position, 0x1234);
        assert_eq!(reply.velocity, 0xABC);
        assert_eq!(reply.torque, 0xDEF);
    }

    #[test]
    fn test_reply_is_not_command_layout() {
        // 同一组字节按回复布局解析时，位置取自 Byte 1-2 而不是 Byte 0-1
        let data = [0x80, 0x00, 0x80, 0x00, 0xF6, 0x19, 0xA8, 0x00];
        let reply = ReplyFeedback::parse(&data).unwrap();
        assert_eq!(reply.motor_id, 0x80);
        assert_eq!(reply.position, 0x0080);
        assert_eq!(reply.velocity, 0x00F);
        assert_eq!(reply.torque, 0x619);
    }

    #[test]
    fn test_decode_midscale_reply() {
        let table = DescriptorTable::default();
        // position = 0x8000, velocity = 0x800, torque = 0x800
        let frame = MotorFrame::new_standard(0x01, &[0x01, 0x80, 0x00, 0x80, 0x08, 0x00]);
        let telemetry = Telemetry::from_frame(&frame, &table).unwrap();
        assert!(telemetry.position.abs() <= table.position.step());
        assert!(telemetry.velocity.abs() <= table.velocity.step());
        assert!(telemetry.torque.abs() <= table.torque.step());
    }

    #[test]
    fn test_decode_full_scale_reply() {
        let table = DescriptorTable::default();
        let frame = MotorFrame::new_standard(0x01, &[0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0, 0]);
        let telemetry = Telemetry::from_frame(&frame, &table).unwrap();
        assert_eq!(telemetry.position, 12.5);
        assert_eq!(telemetry.velocity, 50.0);
        assert_eq!(telemetry.torque, 25.0);

        let frame = MotorFrame::new_standard(0x01, &[0x01, 0, 0, 0, 0, 0, 0, 0]);
        let telemetry = Telemetry::from_frame(&frame, &table).unwrap();
        assert_eq!(telemetry.position, -12.5);
        assert_eq!(telemetry.velocity, -50.0);
        assert_eq!(telemetry.torque, -25.0);
    }

    #[test]
    fn test_short_reply_rejected() {
        let frame = MotorFrame::new_standard(0x01, &[0x01, 0x80, 0x00]);
        assert_eq!(
            ReplyFeedback::try_from(frame),
            Err(ProtocolError::InvalidLength {
                expected: 6,
                actual: 3
            })
        );
    }

    #[test]
    fn test_six_byte_reply_accepted() {
        let frame = MotorFrame::new_standard(0x03, &[0x03, 0x00, 0x01, 0x00, 0x10, 0x02]);
        let reply = ReplyFeedback::try_from(frame).unwrap();
        assert_eq!(reply.position, 1);
        assert_eq!(reply.velocity, 1);
        assert_eq!(reply.torque, 2);
    }

    #[test]
    fn test_sentinel_reply_rejected() {
        let frame =
            MotorFrame::new_standard(0x01, &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFC]);
        assert_eq!(
            ReplyFeedback::try_from(frame),
            Err(ProtocolError::UnexpectedSentinel { code: 0xFC })
        );
    }

    #[test]
    fn test_truncated_sentinel_reply_rejected() {
        // 7 字节的哨兵同样不能被解析为满量程遥测
        let frame = MotorFrame::new_standard(0x01, &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE]);
        assert_eq!(
            ReplyFeedback::try_from(frame),
            Err(ProtocolError::UnexpectedSentinel { code: 0xFE })
        );

        let frame = MotorFrame::new_standard(0x01, &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFC]);
        assert_eq!(
            ReplyFeedback::try_from(frame),
            Err(ProtocolError::UnexpectedSentinel { code: 0xFC })
        );
    }
}
