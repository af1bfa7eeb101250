//! 设备家族规范化处理器。
//!
//! 每类设备一个处理器：解码原始报文，覆盖时间戳，归档原始读数，
//! 然后按物理量逐个构造 [`Measurement`] 并双路扇出。重发布与存储
//! 互相独立，任何一路的失败都不影响另一路。

use crate::IngestError;
use crate::clock::Clock;
use crate::labels::SourceLabels;
use crate::router::RawMessageHandler;
use async_trait::async_trait;
use bridge_bus::Publisher;
use bridge_storage::{FieldValue, MeasurementSink};
use bridge_telemetry::{record_measurement, record_reading_archived};
use domain::{ClimateReading, ContactReading, Measurement, MeasurementValue};
use std::sync::Arc;
use tracing::error;

/// 接入上下文：启动时装配一次，注入各处理器。
pub struct IngestContext {
    pub publisher: Arc<dyn Publisher>,
    pub sink: Arc<dyn MeasurementSink>,
    pub labels: SourceLabels,
    pub clock: Arc<dyn Clock>,
    /// 规范化测量值重发布的 topic 前缀（`{prefix}/{metric}`）。
    pub publish_prefix: String,
}

impl IngestContext {
    /// 序列化并以保留消息重发布一条测量值。
    ///
    /// 编码失败只记录日志并跳过这一路，存储写入照常进行。
    fn publish_measurement(&self, metric: &str, measure: &Measurement) {
        let payload = match serde_json::to_vec(measure) {
            Ok(payload) => payload,
            Err(err) => {
                error!(
                    target: "bridge.ingest",
                    metric = %metric,
                    "measurement encode failed: {}", err
                );
                return;
            }
        };
        let topic = format!("{}/{}", self.publish_prefix.trim_end_matches('/'), metric);
        self.publisher.publish(&topic, payload, true);
    }

    /// 单个指标的双路扇出：重发布 + 存储。
    async fn fan_out(&self, metric: &str, measure: &Measurement) {
        self.publish_measurement(metric, measure);
        self.sink.store_measurement(metric, measure).await;
        record_measurement();
    }
}

/// topic 末段作为来源 slug。
pub fn source_slug(topic: &str) -> &str {
    match topic.rsplit_once('/') {
        Some((_, slug)) => slug,
        None => topic,
    }
}

/// 气候类传感器处理器：一条报文产出温度/湿度/气压三条测量值。
pub struct ClimateHandler {
    ctx: Arc<IngestContext>,
}

impl ClimateHandler {
    pub fn new(ctx: Arc<IngestContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl RawMessageHandler for ClimateHandler {
    async fn handle(&self, topic: &str, payload: &[u8]) -> Result<(), IngestError> {
        let mut reading: ClimateReading = serde_json::from_slice(payload)?;
        // 设备时间戳不可信，统一覆盖为接收时间
        reading.timestamp = self.ctx.clock.now_epoch_secs();

        self.ctx
            .sink
            .store_reading(
                source_slug(topic),
                vec![
                    ("battery", FieldValue::Float(reading.battery)),
                    ("humidity", FieldValue::Float(reading.humidity)),
                    ("pressure", FieldValue::Float(reading.pressure)),
                    ("temperature", FieldValue::Float(reading.temperature)),
                    ("voltage", FieldValue::Integer(reading.voltage)),
                    ("linkquality", FieldValue::Integer(reading.linkquality)),
                ],
                reading.timestamp,
            )
            .await;
        record_reading_archived();

        let location = self.ctx.labels.resolve(topic);
        let metrics = [
            ("temperature", reading.temperature),
            ("humidity", reading.humidity),
            ("pressure", reading.pressure),
        ];
        for (metric, value) in metrics {
            let measure = Measurement {
                value: MeasurementValue::Float(value),
                timestamp: reading.timestamp,
                location: location.to_string(),
            };
            self.ctx.fan_out(metric, &measure).await;
        }
        Ok(())
    }
}

/// 门磁类传感器处理器：一条报文产出一条布尔测量值。
pub struct ContactHandler {
    ctx: Arc<IngestContext>,
}

impl ContactHandler {
    pub fn new(ctx: Arc<IngestContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl RawMessageHandler for ContactHandler {
    async fn handle(&self, topic: &str, payload: &[u8]) -> Result<(), IngestError> {
        let mut reading: ContactReading = serde_json::from_slice(payload)?;
        reading.timestamp = self.ctx.clock.now_epoch_secs();

        self.ctx
            .sink
            .store_reading(
                source_slug(topic),
                vec![
                    ("battery", FieldValue::Float(reading.battery)),
                    ("contact", FieldValue::Boolean(reading.contact)),
                    ("voltage", FieldValue::Integer(reading.voltage)),
                    ("linkquality", FieldValue::Integer(reading.linkquality)),
                ],
                reading.timestamp,
            )
            .await;
        record_reading_archived();

        let location = self.ctx.labels.resolve(topic);
        let measure = Measurement {
            value: MeasurementValue::Bool(reading.contact),
            timestamp: reading.timestamp,
            location: location.to_string(),
        };
        self.ctx.fan_out("contact", &measure).await;
        Ok(())
    }
}
