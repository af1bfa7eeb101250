//! 接收时钟抽象。

/// 接收时间来源。设备上报的时间戳不可信，规范化统一使用本地时钟。
pub trait Clock: Send + Sync {
    fn now_epoch_secs(&self) -> i64;
}

/// 系统时钟。
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_secs(&self) -> i64 {
        let now = std::time::SystemTime::now();
        let duration = now
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default();
        duration.as_secs() as i64
    }
}
