use serde::{Deserialize, Serialize};

/// 气候类传感器原始报文（温度/湿度/气压 + 电量与链路诊断）。
///
/// 整个结构体使用 `#[serde(default)]`：设备缺失的字段解码为零值，
/// 未知字段忽略。`timestamp` 在接收侧总是被覆盖，设备时钟不可信。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClimateReading {
    pub battery: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub temperature: f64,
    pub voltage: i64,
    pub linkquality: i64,
    pub timestamp: i64,
}

/// 门磁类传感器原始报文（开合状态 + 电量与链路诊断）。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactReading {
    pub contact: bool,
    pub battery: f64,
    pub voltage: i64,
    pub linkquality: i64,
    pub timestamp: i64,
}

/// 测量值：按指标可以是数值或布尔。
///
/// `#[serde(untagged)]`：线上形式是裸 JSON 数值/布尔，不带类型标签。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MeasurementValue {
    Float(f64),
    Bool(bool),
}

/// 规范化后的测量值：单个标量/布尔 + 接收时间戳（Unix 秒）+ 来源标签。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: MeasurementValue,
    pub timestamp: i64,
    pub location: String,
}
