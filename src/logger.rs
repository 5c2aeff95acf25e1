use tracing_subscriber::{EnvFilter, fmt};

/// 初始化日志系统
///
/// RUST_LOG 优先于 `default_level`（`--verbose` 时为 debug，否则 warn）
///
/// 示例:
/// - RUST_LOG=debug cloudprobe run
/// - RUST_LOG=cloudprobe::cloud=trace cloudprobe run
pub fn init_logger(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // try_init: 测试中可能被多次调用
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();

    tracing::debug!("Logger initialized");
}
