//! topic 精确匹配分发。

use crate::IngestError;
use async_trait::async_trait;
use bridge_bus::InboundHandler;
use bridge_telemetry::{record_decode_failure, record_dispatch_miss, record_message_received};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// 设备报文处理器：每个设备家族一个实现。
#[async_trait]
pub trait RawMessageHandler: Send + Sync {
    async fn handle(&self, topic: &str, payload: &[u8]) -> Result<(), IngestError>;
}

/// 分发路由：启动时注册完成，运行期只读，查表无需加锁。
///
/// 只做精确字符串匹配，不支持通配符；未注册 topic 的消息
/// 静默丢弃（仅接收日志，无错误、无缺省处理器）。
#[derive(Default)]
pub struct Router {
    routes: HashMap<String, Arc<dyn RawMessageHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// 注册 topic 对应的处理器。
    pub fn route(mut self, topic: impl Into<String>, handler: Arc<dyn RawMessageHandler>) -> Self {
        self.routes.insert(topic.into(), handler);
        self
    }

    /// 已注册的 topic（用于启动时订阅）。
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }
}

#[async_trait]
impl InboundHandler for Router {
    async fn on_message(&self, topic: &str, payload: &[u8]) {
        record_message_received();
        info!(
            target: "bridge.ingest",
            topic = %topic,
            payload_size = payload.len(),
            "message_received"
        );

        let Some(handler) = self.routes.get(topic) else {
            record_dispatch_miss();
            return;
        };

        // 处理器错误到此为止，不回传给总线
        if let Err(err) = handler.handle(topic, payload).await {
            record_decode_failure();
            warn!(target: "bridge.ingest", topic = %topic, error = %err, "handler_failed");
        }
    }
}
