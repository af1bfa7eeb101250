//! 存储接口定义。

use crate::line::FieldValue;
use async_trait::async_trait;
use domain::Measurement;

/// 测量值存储接口。
///
/// 两个方法都只负责入队：写入错误经实现方的带外通道记录日志，
/// 永远不会回传给调用方。
#[async_trait]
pub trait MeasurementSink: Send + Sync {
    /// 存储一条规范化测量值：measurement 名为指标名，
    /// tag `location` 为来源标签，field `value` 为标量/布尔值。
    async fn store_measurement(&self, measurement: &str, measure: &Measurement);

    /// 归档一条原始设备报文：measurement 名为来源 slug，
    /// 每个报文成员一个 field，不带 tag。
    async fn store_reading(
        &self,
        source: &str,
        fields: Vec<(&'static str, FieldValue)>,
        timestamp: i64,
    );
}

/// 空存储（用于接线与测试）。
#[derive(Debug, Default)]
pub struct NoopSink;

#[async_trait]
impl MeasurementSink for NoopSink {
    async fn store_measurement(&self, _measurement: &str, _measure: &Measurement) {}

    async fn store_reading(
        &self,
        _source: &str,
        _fields: Vec<(&'static str, FieldValue)>,
        _timestamp: i64,
    ) {
    }
}
