//! 数据接入能力：topic 分发与设备报文规范化。
//!
//! 入站消息经 [`Router`] 按 topic 精确分发到设备家族处理器；
//! 处理器解码报文、覆盖接收时间戳、解析来源标签，然后按指标
//! 双路扇出（总线重发布 + 时序存储写入）。

pub mod clock;
pub mod handlers;
pub mod labels;
pub mod router;

pub use clock::{Clock, SystemClock};
pub use handlers::{ClimateHandler, ContactHandler, IngestContext, source_slug};
pub use labels::{SourceLabels, UNKNOWN_SOURCE};
pub use router::{RawMessageHandler, Router};

/// 接入错误。
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}
