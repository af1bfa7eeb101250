//! 时序存储能力（InfluxDB v2 写入）。
//!
//! 分层：
//! - `traits`：存储接口（MeasurementSink）与空实现
//! - `line`：InfluxDB v2 Line Protocol 编码
//! - `influx`：HTTP 写入实现（写入队列 + 带外错误通道）
//! - `error`：统一的存储错误类型
//!
//! 写入对调用方永远不失败：点先入队，错误经带外通道由后台观察任务
//! 记录日志，不重试、不回传。

pub mod error;
pub mod influx;
pub mod line;
pub mod traits;

pub use error::StorageError;
pub use influx::{InfluxConfig, InfluxSink};
pub use line::{FieldValue, encode_point};
pub use traits::{MeasurementSink, NoopSink};
