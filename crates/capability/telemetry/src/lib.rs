//! 日志初始化与接入链路内部计数。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 基础指标快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub messages_received: u64,
    pub dispatch_miss: u64,
    pub decode_failures: u64,
    pub measurements: u64,
    pub readings_archived: u64,
    pub publish_failures: u64,
    pub write_failures: u64,
}

/// 基础指标。
///
/// 计数仅在进程内累积，没有对外暴露面；守护进程停机时输出一条汇总日志。
pub struct TelemetryMetrics {
    messages_received: AtomicU64,
    dispatch_miss: AtomicU64,
    decode_failures: AtomicU64,
    measurements: AtomicU64,
    readings_archived: AtomicU64,
    publish_failures: AtomicU64,
    write_failures: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            messages_received: AtomicU64::new(0),
            dispatch_miss: AtomicU64::new(0),
            decode_failures: AtomicU64::new(0),
            measurements: AtomicU64::new(0),
            readings_archived: AtomicU64::new(0),
            publish_failures: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            messages_received: self.messages_received.load(Ordering::Relaxed),
            dispatch_miss: self.dispatch_miss.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            measurements: self.measurements.load(Ordering::Relaxed),
            readings_archived: self.readings_archived.load(Ordering::Relaxed),
            publish_failures: self.publish_failures.load(Ordering::Relaxed),
            write_failures: self.write_failures.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 记录入站消息接收次数。
pub fn record_message_received() {
    metrics().messages_received.fetch_add(1, Ordering::Relaxed);
}

/// 记录无 handler 可分发的消息次数。
pub fn record_dispatch_miss() {
    metrics().dispatch_miss.fetch_add(1, Ordering::Relaxed);
}

/// 记录报文解码失败次数。
pub fn record_decode_failure() {
    metrics().decode_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录规范化测量值产出次数。
pub fn record_measurement() {
    metrics().measurements.fetch_add(1, Ordering::Relaxed);
}

/// 记录原始报文归档次数。
pub fn record_reading_archived() {
    metrics().readings_archived.fetch_add(1, Ordering::Relaxed);
}

/// 记录总线发布失败次数。
pub fn record_publish_failure() {
    metrics().publish_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录时序库写入失败次数。
pub fn record_write_failure() {
    metrics().write_failures.fetch_add(1, Ordering::Relaxed);
}
