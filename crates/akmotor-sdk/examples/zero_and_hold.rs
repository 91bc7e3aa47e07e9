//! 置零并保持示例
//!
//! 使能电机、把当前位置设为零点，然后以固定周期发送目标位置并打印遥测。
//!
//! # 使用说明
//!
//! ```bash
//! cargo run --example zero_and_hold -- --interface can0 --id 1 --target 0.5
//! ```

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "zero_and_hold")]
#[command(about = "Zero an AK motor and hold a target position")]
struct Args {
    /// CAN 接口名称
    #[arg(short, long, default_value = "can0")]
    interface: String,

    /// 电机 CAN ID
    #[arg(long, default_value_t = 1)]
    id: u16,

    /// 目标位置（rad）
    #[arg(short, long, default_value_t = 0.0)]
    target: f32,

    /// 位置刚度 KP
    #[arg(long, default_value_t = 30.0)]
    kp: f32,

    /// 阻尼 KD
    #[arg(long, default_value_t = 0.5)]
    kd: f32,

    /// 跳过置零
    #[arg(long)]
    no_zero: bool,

    /// 模式切换后的等待时间（毫秒）
    #[arg(long, default_value_t = 1000)]
    settle_ms: u64,

    /// 控制周期（毫秒）
    #[arg(long, default_value_t = 10)]
    period_ms: u64,

    /// 发送次数
    #[arg(long, default_value_t = 500)]
    cycles: u32,
}

#[cfg(target_os = "linux")]
fn main() -> anyhow::Result<()> {
    use akmotor_sdk::can::SocketCanAdapter;
    use akmotor_sdk::prelude::*;
    use std::time::Duration;

    akmotor_sdk::init_logger();
    let args = Args::parse();

    println!("⏳ Opening {} ...", args.interface);
    let mut bus = SocketCanAdapter::new(args.interface.as_str())?;

    let config = ChannelConfig {
        settle_delay_ms: args.settle_ms,
        ..ChannelConfig::default()
    };
    let mut motor = MotorChannel::with_config(args.id, true, config);

    motor.init(&mut bus)?;
    println!("✅ Motor 0x{:X} enabled", motor.address());

    if !args.no_zero {
        motor.zero(&mut bus)?;
        println!("✅ Zero point set");
    }

    motor.set_command(CommandSlot::Kp, args.kp);
    motor.set_command(CommandSlot::Kd, args.kd);

    let period = Duration::from_millis(args.period_ms);
    for cycle in 0..args.cycles {
        motor.set_position(&mut bus, args.target)?;
        if cycle % 50 == 0 {
            let t = motor.telemetry();
            println!(
                "[{:4}] p={:+.4} rad  v={:+.3} rad/s  t={:+.3} N·m",
                cycle, t.position, t.velocity, t.torque
            );
        }
        std::thread::sleep(period);
    }

    motor.set_mode(&mut bus, MotorMode::Disabled)?;
    println!("✅ Motor disabled");
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn main() {
    let _ = Args::parse();
    eprintln!("zero_and_hold requires SocketCAN (Linux only)");
}
