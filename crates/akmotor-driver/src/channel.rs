//! 单电机通道
//!
//! `MotorChannel` 持有一个电机的指令向量、遥测向量和模式镜像。
//! 传输层不归通道所有，每次调用时以 `&mut` 传入，因此多个通道可以
//! 共享同一个适配器，测试时也可以替换为 `MockCanAdapter`。
//!
//! 所有操作都是同步的：`commit` 最多一次总线写入，`poll` 从不等待，
//! 模式切换额外包含一次稳定等待。

use crate::config::ChannelConfig;
use crate::error::DriverError;
use crate::mode::MotorMode;
use akmotor_can::CanAdapter;
use akmotor_protocol::{
    CommandSlot, CommandVector, ModeCommand, ModeRequest, MotorFrame, QuantizedCommand,
    ReplyFeedback, Telemetry,
};
use tracing::{debug, info, trace, warn};

/// 指令未发送的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// 本地 `powered` 标志为 false
    NotPowered,
    /// 设备未处于使能模式（仅在 `require_enabled` 打开时）
    NotEnabled,
}

/// 发送结果：区分"已发送"和"被跳过"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    Skipped(SkipReason),
}

impl SendOutcome {
    pub fn is_sent(self) -> bool {
        self == SendOutcome::Sent
    }
}

/// `set_command` 的钳位结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClampOutcome {
    pub slot: CommandSlot,
    /// 调用方请求的值
    pub requested: f32,
    /// 实际写入指令向量的值
    pub stored: f32,
}

impl ClampOutcome {
    /// 请求值是否被钳位（NaN 总是视为被钳位）
    pub fn is_clamped(&self) -> bool {
        self.requested != self.stored
    }
}

/// 单电机通道
///
/// # 示例
///
/// ```rust
/// use akmotor_can::MockCanAdapter;
/// use akmotor_driver::{ChannelConfig, MotorChannel, MotorMode};
///
/// let mut bus = MockCanAdapter::new();
/// let config = ChannelConfig {
///     settle_delay_ms: 0,
///     ..ChannelConfig::default()
/// };
/// let mut motor = MotorChannel::with_config(0x01, true, config);
///
/// motor.init(&mut bus)?;
/// assert_eq!(motor.mode(), MotorMode::Enabled);
///
/// let outcome = motor.set_position(&mut bus, 1.5)?;
/// assert!(outcome.is_sent());
/// # Ok::<(), akmotor_driver::DriverError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MotorChannel {
    address: u16,
    powered: bool,
    mode: MotorMode,
    commands: CommandVector,
    telemetry: Telemetry,
    config: ChannelConfig,
}

impl MotorChannel {
    /// 使用默认配置创建通道
    pub fn new(address: u16, powered: bool) -> Self {
        Self::with_config(address, powered, ChannelConfig::default())
    }

    pub fn with_config(address: u16, powered: bool, config: ChannelConfig) -> Self {
        let commands = config.init_preset.clamped(&config.descriptors);
        Self {
            address,
            powered,
            mode: MotorMode::Disabled,
            commands,
            telemetry: Telemetry::default(),
            config,
        }
    }

    pub fn address(&self) -> u16 {
        self.address
    }

    /// 修改总线地址（同一份代码驱动多个电机时使用）
    pub fn set_address(&mut self, address: u16) {
        debug!("Motor channel re-addressed: 0x{:X} -> 0x{:X}", self.address, address);
        self.address = address;
    }

    pub fn is_powered(&self) -> bool {
        self.powered
    }

    /// 只更新本地标志，不发送任何帧；调用方随后应调用 `set_mode`
    pub fn set_power(&mut self, powered: bool) {
        debug!("Motor 0x{:X} power flag set to {}", self.address, powered);
        self.powered = powered;
    }

    pub fn mode(&self) -> MotorMode {
        self.mode
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    pub fn commands(&self) -> &CommandVector {
        &self.commands
    }

    pub fn command(&self, slot: CommandSlot) -> f32 {
        self.commands.get(slot)
    }

    /// 最近一次成功解析的遥测（无回复时保持旧值）
    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    pub fn position(&self) -> f32 {
        self.telemetry.position
    }

    pub fn velocity(&self) -> f32 {
        self.telemetry.velocity
    }

    pub fn torque(&self) -> f32 {
        self.telemetry.torque
    }

    /// 写入一个指令槽位（钳位到描述符范围），不产生总线操作
    pub fn set_command(&mut self, slot: CommandSlot, value: f32) -> ClampOutcome {
        let stored = self.config.descriptors.get(slot).clamp(value);
        self.commands.set(slot, stored);

        let outcome = ClampOutcome {
            slot,
            requested: value,
            stored,
        };
        if outcome.is_clamped() {
            warn!(
                "Motor 0x{:X} {} command {} clamped to {}",
                self.address, slot, value, stored
            );
        }
        outcome
    }

    /// 打包并发送完整指令向量
    ///
    /// 未上电时不发送，返回 `SendOutcome::Skipped`。配置了 `require_enabled`
    /// 时，本地模式不是 `Enabled` 同样跳过。
    ///
    /// 打包结果与模式哨兵帧相同时，KD 下调一个量化步长后再发送，
    /// 存储的指令向量不变。
    pub fn commit<A: CanAdapter + ?Sized>(
        &mut self,
        bus: &mut A,
    ) -> Result<SendOutcome, DriverError> {
        if !self.powered {
            debug!("Motor 0x{:X} commit skipped: not powered", self.address);
            return Ok(SendOutcome::Skipped(SkipReason::NotPowered));
        }
        if self.config.require_enabled && !self.mode.accepts_commands() {
            debug!(
                "Motor 0x{:X} commit skipped: mode is {:?}",
                self.address, self.mode
            );
            return Ok(SendOutcome::Skipped(SkipReason::NotEnabled));
        }

        self.send_commands(bus)?;
        Ok(SendOutcome::Sent)
    }

    /// 非阻塞读取一帧回复
    ///
    /// - 无待处理帧：返回 `Ok(None)`，遥测保持不变
    /// - 回复帧过短或是哨兵帧：返回错误，遥测保持不变
    pub fn poll<A: CanAdapter + ?Sized>(
        &mut self,
        bus: &mut A,
    ) -> Result<Option<Telemetry>, DriverError> {
        let Some(frame) = bus.try_receive()? else {
            return Ok(None);
        };

        let reply = ReplyFeedback::try_from(frame)?;

        if self.config.verify_reply_id {
            let expected = (self.address & 0xFF) as u8;
            if reply.motor_id != expected {
                return Err(DriverError::UnexpectedSource {
                    expected,
                    actual: reply.motor_id,
                });
            }
        }

        let telemetry = reply.to_telemetry(&self.config.descriptors);
        self.telemetry = telemetry;

        trace!(
            "Motor 0x{:X} telemetry: p={:.4}, v={:.3}, t={:.3}",
            self.address, telemetry.position, telemetry.velocity, telemetry.torque
        );
        Ok(Some(telemetry))
    }

    /// 驱动模式状态机
    ///
    /// - `Enabled`: 发送 Enter 哨兵（需要上电）
    /// - `Disabled`: 发送 Exit 哨兵（总是允许）
    /// - `Zeroing`: 仅在 `Enabled` 下允许；先将指令向量清零并发送一帧零指令，
    ///   再发送 Zero 哨兵，完成后回到 `Enabled`
    ///
    /// 每个哨兵帧之后都会等待 `settle_delay`。
    pub fn set_mode<A: CanAdapter + ?Sized>(
        &mut self,
        bus: &mut A,
        target: MotorMode,
    ) -> Result<SendOutcome, DriverError> {
        let request = self.mode.transition(target)?;

        if request != ModeRequest::Exit && !self.powered {
            warn!(
                "Motor 0x{:X} {:?} request ignored: not powered",
                self.address, target
            );
            return Ok(SendOutcome::Skipped(SkipReason::NotPowered));
        }

        match request {
            ModeRequest::Zero => self.run_zeroing(bus)?,
            ModeRequest::Enter | ModeRequest::Exit => {
                self.send_sentinel(bus, request)?;
                self.mode = MotorMode::settled_after(request);
            },
        }

        info!("Motor 0x{:X} mode is now {:?}", self.address, self.mode);
        Ok(SendOutcome::Sent)
    }

    /// 上电初始化
    ///
    /// 上电时进入使能模式（`zero_on_init` 为真时随后置零并重新加载预设），
    /// 未上电时发送 Exit 哨兵。
    pub fn init<A: CanAdapter + ?Sized>(
        &mut self,
        bus: &mut A,
    ) -> Result<SendOutcome, DriverError> {
        if !self.powered {
            return self.set_mode(bus, MotorMode::Disabled);
        }

        let outcome = self.set_mode(&mut *bus, MotorMode::Enabled)?;
        if self.config.zero_on_init {
            self.set_mode(&mut *bus, MotorMode::Zeroing)?;
            self.commands = self.config.init_preset.clamped(&self.config.descriptors);
        }
        Ok(outcome)
    }

    /// 等价于 `set_mode(bus, MotorMode::Zeroing)`
    pub fn zero<A: CanAdapter + ?Sized>(
        &mut self,
        bus: &mut A,
    ) -> Result<SendOutcome, DriverError> {
        self.set_mode(bus, MotorMode::Zeroing)
    }

    /// 设置目标位置、发送并读取一次回复
    ///
    /// 未上电时直接返回，不修改指令向量。
    pub fn set_position<A: CanAdapter + ?Sized>(
        &mut self,
        bus: &mut A,
        position: f32,
    ) -> Result<SendOutcome, DriverError> {
        if !self.powered {
            return Ok(SendOutcome::Skipped(SkipReason::NotPowered));
        }

        self.set_command(CommandSlot::Position, position);
        let outcome = self.commit(&mut *bus)?;
        if outcome.is_sent() {
            self.poll(&mut *bus)?;
        }
        Ok(outcome)
    }

    fn run_zeroing<A: CanAdapter + ?Sized>(&mut self, bus: &mut A) -> Result<(), DriverError> {
        let previous_mode = self.mode;
        let previous_commands = self.commands;
        self.mode = MotorMode::Zeroing;
        // 设备要求置零前先收到一帧全零指令
        self.commands = CommandVector::ZERO.clamped(&self.config.descriptors);

        let result = match self.send_commands(&mut *bus) {
            Ok(()) => self.send_sentinel(&mut *bus, ModeRequest::Zero),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                self.mode = MotorMode::settled_after(ModeRequest::Zero);
                Ok(())
            },
            Err(e) => {
                warn!("Motor 0x{:X} zeroing aborted: {}", self.address, e);
                self.mode = previous_mode;
                self.commands = previous_commands;
                Err(e)
            },
        }
    }

    fn send_commands<A: CanAdapter + ?Sized>(&self, bus: &mut A) -> Result<(), DriverError> {
        let mut quantized = QuantizedCommand::quantize(&self.commands, &self.config.descriptors);
        if quantized.avoid_sentinel() {
            warn!(
                "Motor 0x{:X} command packed to a mode sentinel, kd lowered by one step",
                self.address
            );
        }

        let frame = MotorFrame::new_standard(self.address, &quantized.to_bytes());
        bus.send(frame)?;
        trace!(
            "Motor 0x{:X} command frame sent: {:02X?}",
            self.address,
            frame.data_slice()
        );
        Ok(())
    }

    fn send_sentinel<A: CanAdapter + ?Sized>(
        &self,
        bus: &mut A,
        request: ModeRequest,
    ) -> Result<(), DriverError> {
        let frame = ModeCommand::new(self.address, request).to_frame(&self.config.mode_codes);
        bus.send(frame)?;
        debug!(
            "Motor 0x{:X} {:?} sentinel sent (code 0x{:02X})",
            self.address, request, frame.data[7]
        );

        let delay = self.config.settle_delay();
        if !delay.is_zero() {
            spin_sleep::sleep(delay);
        }
        Ok(())
    }
}
