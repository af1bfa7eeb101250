//! InfluxDB v2 HTTP 写入实现。

use crate::error::StorageError;
use crate::line::{FieldValue, encode_point};
use crate::traits::MeasurementSink;
use async_trait::async_trait;
use bridge_telemetry::record_write_failure;
use domain::{Measurement, MeasurementValue};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// InfluxDB 连接配置。
#[derive(Debug, Clone)]
pub struct InfluxConfig {
    pub host: String,
    pub port: u16,
    pub token: String,
    pub org: String,
    /// 规范化测量值写入的 bucket。
    pub bucket: String,
    /// 原始报文归档写入的 bucket。
    pub raw_bucket: String,
}

struct WriteRequest {
    bucket: String,
    line: String,
}

/// InfluxDB 写入器。
///
/// 点入队即返回；后台写入任务逐点 POST 并触发冲刷，失败送入
/// 带外错误通道，由观察任务记录日志。丢弃本写入器即关闭队列，
/// 写入任务把剩余的点冲刷完毕后退出。
pub struct InfluxSink {
    queue: mpsc::UnboundedSender<WriteRequest>,
    bucket: String,
    raw_bucket: String,
}

impl InfluxSink {
    /// 建立写入链路：启动写入任务与错误观察任务。
    pub fn connect(
        config: InfluxConfig,
    ) -> Result<(Self, tokio::task::JoinHandle<()>), StorageError> {
        if config.token.is_empty() {
            return Err(StorageError::new("influx token must not be empty"));
        }

        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        let (error_tx, mut error_rx) = mpsc::unbounded_channel::<StorageError>();

        // 带外错误通道：写入失败只在此记录，不回传调用方
        tokio::spawn(async move {
            while let Some(err) = error_rx.recv().await {
                record_write_failure();
                error!(target: "bridge.storage", "influx write failed: {}", err);
            }
        });

        let sink = Self {
            queue: queue_tx,
            bucket: config.bucket.clone(),
            raw_bucket: config.raw_bucket.clone(),
        };
        let handle = tokio::spawn(write_loop(config, queue_rx, error_tx));
        Ok((sink, handle))
    }

    fn enqueue(&self, bucket: String, line: String) {
        if self.queue.send(WriteRequest { bucket, line }).is_err() {
            warn!(target: "bridge.storage", "sink closed, point dropped");
        }
    }
}

#[async_trait]
impl MeasurementSink for InfluxSink {
    async fn store_measurement(&self, measurement: &str, measure: &Measurement) {
        info!(target: "bridge.storage", measurement = %measurement, "storing measurement");
        let value = match measure.value {
            MeasurementValue::Float(v) => FieldValue::Float(v),
            MeasurementValue::Bool(v) => FieldValue::Boolean(v),
        };
        let line = encode_point(
            measurement,
            &[("location", &measure.location)],
            &[("value", value)],
            measure.timestamp,
        );
        self.enqueue(self.bucket.clone(), line);
    }

    async fn store_reading(
        &self,
        source: &str,
        fields: Vec<(&'static str, FieldValue)>,
        timestamp: i64,
    ) {
        info!(target: "bridge.storage", source = %source, "storing reading");
        let line = encode_point(source, &[], &fields, timestamp);
        self.enqueue(self.raw_bucket.clone(), line);
    }
}

async fn write_loop(
    config: InfluxConfig,
    mut queue: mpsc::UnboundedReceiver<WriteRequest>,
    errors: mpsc::UnboundedSender<StorageError>,
) {
    let client = reqwest::Client::new();
    let url = format!("http://{}:{}/api/v2/write", config.host, config.port);
    let auth = format!("Token {}", config.token);

    while let Some(request) = queue.recv().await {
        let response = client
            .post(&url)
            .query(&[
                ("org", config.org.as_str()),
                ("bucket", request.bucket.as_str()),
                ("precision", "s"),
            ])
            .header("Authorization", auth.clone())
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(request.line)
            .send()
            .await;
        match response {
            Ok(response) if response.status().is_success() => {}
            Ok(response) => {
                let _ = errors.send(StorageError::new(format!(
                    "unexpected status {}",
                    response.status()
                )));
            }
            Err(err) => {
                let _ = errors.send(StorageError::from(err));
            }
        }
    }
    info!(target: "bridge.storage", "influx writer stopped");
}
