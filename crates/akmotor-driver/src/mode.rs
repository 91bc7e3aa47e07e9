//! 电机模式状态机
//!
//! 本地镜像设备的模式（设备端才是权威状态）：
//!
//! ```text
//!              Enter                 Zero
//! Disabled ───────────▶ Enabled ───────────▶ Zeroing
//!    ▲                   │  ▲                   │
//!    └────── Exit ───────┘  └───────────────────┘
//! ```
//!
//! `Zeroing` 是瞬态，哨兵帧发送完成后立即回到 `Enabled`。

use crate::error::DriverError;
use akmotor_protocol::ModeRequest;

/// 电机模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MotorMode {
    /// 失能（初始状态）
    #[default]
    Disabled,
    /// 使能，接受运动指令
    Enabled,
    /// 置零中（瞬态）
    Zeroing,
}

impl MotorMode {
    /// 是否接受运动指令帧
    pub fn accepts_commands(self) -> bool {
        self == Self::Enabled
    }

    pub fn is_enabled(self) -> bool {
        self == Self::Enabled
    }

    /// 计算从当前模式到目标模式需要发送的哨兵帧
    ///
    /// | 当前       | 目标       | 哨兵   |
    /// |------------|------------|--------|
    /// | 任意静止态 | `Enabled`  | Enter  |
    /// | 任意静止态 | `Disabled` | Exit   |
    /// | `Enabled`  | `Zeroing`  | Zero   |
    ///
    /// 重复进入当前模式是允许的（会再次发送对应哨兵），
    /// 因为本地状态只是设备状态的镜像。
    pub fn transition(self, target: MotorMode) -> Result<ModeRequest, DriverError> {
        match (self, target) {
            (MotorMode::Zeroing, _) => Err(DriverError::InvalidTransition {
                from: self,
                to: target,
            }),
            (_, MotorMode::Enabled) => Ok(ModeRequest::Enter),
            (_, MotorMode::Disabled) => Ok(ModeRequest::Exit),
            (MotorMode::Enabled, MotorMode::Zeroing) => Ok(ModeRequest::Zero),
            (MotorMode::Disabled, MotorMode::Zeroing) => Err(DriverError::InvalidTransition {
                from: self,
                to: target,
            }),
        }
    }

    /// 哨兵帧发送完成后的静止模式
    pub fn settled_after(request: ModeRequest) -> MotorMode {
        match request {
            ModeRequest::Enter | ModeRequest::Zero => MotorMode::Enabled,
            ModeRequest::Exit => MotorMode::Disabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_disabled() {
        assert_eq!(MotorMode::default(), MotorMode::Disabled);
        assert!(!MotorMode::Disabled.accepts_commands());
        assert!(MotorMode::Enabled.accepts_commands());
        assert!(!MotorMode::Zeroing.accepts_commands());
    }

    #[test]
    fn test_valid_transitions() {
        assert_eq!(
            MotorMode::Disabled.transition(MotorMode::Enabled).unwrap(),
            ModeRequest::Enter
        );
        assert_eq!(
            MotorMode::Enabled.transition(MotorMode::Disabled).unwrap(),
            ModeRequest::Exit
        );
        assert_eq!(
            MotorMode::Enabled.transition(MotorMode::Zeroing).unwrap(),
            ModeRequest::Zero
        );
        // 重复进入
        assert_eq!(
            MotorMode::Enabled.transition(MotorMode::Enabled).unwrap(),
            ModeRequest::Enter
        );
        assert_eq!(
            MotorMode::Disabled.transition(MotorMode::Disabled).unwrap(),
            ModeRequest::Exit
        );
    }

    #[test]
    fn test_zeroing_requires_enabled() {
        assert!(matches!(
            MotorMode::Disabled.transition(MotorMode::Zeroing),
            Err(DriverError::InvalidTransition {
                from: MotorMode::Disabled,
                to: MotorMode::Zeroing
            })
        ));
    }

    #[test]
    fn test_zeroing_is_not_a_rest_state() {
        assert!(MotorMode::Zeroing.transition(MotorMode::Enabled).is_err());
        assert_eq!(
            MotorMode::settled_after(ModeRequest::Zero),
            MotorMode::Enabled
        );
        assert_eq!(
            MotorMode::settled_after(ModeRequest::Exit),
            MotorMode::Disabled
        );
    }
}
