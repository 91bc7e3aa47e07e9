//! MotorChannel 配置
//!
//! 协议常量（参数范围、模式码）随固件版本变化，因此全部放在配置里，
//! 默认值取自 `akmotor_protocol::constants`。

use akmotor_protocol::{CommandVector, DEFAULT_SETTLE_DELAY_MS, DescriptorTable, ModeCodes};
use std::time::Duration;

/// MotorChannel 配置
///
/// # Example
///
/// ```
/// use akmotor_driver::ChannelConfig;
///
/// // 默认配置（1000ms 稳定等待）
/// let config = ChannelConfig::default();
///
/// // 较新的固件只需要 500ms
/// let config = ChannelConfig {
///     settle_delay_ms: 500,
///     ..ChannelConfig::default()
/// };
/// assert_eq!(config.settle_delay().as_millis(), 500);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ChannelConfig {
    /// 五个指令槽位的描述符
    pub descriptors: DescriptorTable,
    /// 模式哨兵码
    pub mode_codes: ModeCodes,
    /// 发送模式哨兵帧后的稳定等待（毫秒）
    pub settle_delay_ms: u64,
    /// 构造时与置零后加载的指令预设
    pub init_preset: CommandVector,
    /// `init()` 进入使能后是否立即置零
    pub zero_on_init: bool,
    /// 校验回复帧 Byte 0 是否等于本通道地址的低 8 位
    pub verify_reply_id: bool,
    /// `commit` 是否额外要求本地模式为 `Enabled`（默认只检查 `powered`）
    pub require_enabled: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            descriptors: DescriptorTable::default(),
            mode_codes: ModeCodes::default(),
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            init_preset: CommandVector::INIT,
            zero_on_init: false,
            verify_reply_id: false,
            require_enabled: false,
        }
    }
}

impl ChannelConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// 从 TOML 文本加载，缺省字段使用默认值
    ///
    /// ```toml
    /// settle_delay_ms = 500
    /// zero_on_init = true
    ///
    /// [descriptors.velocity]
    /// min = -45.0
    /// max = 45.0
    /// bits = 12
    /// ```
    #[cfg(feature = "serde")]
    pub fn from_toml_str(s: &str) -> Result<Self, crate::DriverError> {
        Ok(toml::from_str(s)?)
    }
}
