//! 应用运行配置加载。

use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mqtt_host: String,
    pub mqtt_port: u16,
    pub mqtt_client_id: Option<String>,
    pub mqtt_username: Option<String>,
    pub mqtt_password: Option<String>,
    pub publish_prefix: String,
    pub climate_topics: Vec<String>,
    pub contact_topics: Vec<String>,
    pub source_labels: Vec<(String, String)>,
    pub influx_host: String,
    pub influx_port: u16,
    pub influx_token: String,
    pub influx_org: String,
    pub influx_bucket: String,
    pub influx_raw_bucket: String,
    pub store_enabled: bool,
    pub disconnect_grace_ms: u64,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let influx_token = env::var("BRIDGE_INFLUX_TOKEN")
            .map_err(|_| ConfigError::Missing("BRIDGE_INFLUX_TOKEN".to_string()))?;
        let influx_org = env::var("BRIDGE_INFLUX_ORG")
            .map_err(|_| ConfigError::Missing("BRIDGE_INFLUX_ORG".to_string()))?;
        let mqtt_host = env::var("BRIDGE_MQTT_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let mqtt_port = read_u16_with_default("BRIDGE_MQTT_PORT", 1883)?;
        let mqtt_client_id = read_optional("BRIDGE_MQTT_CLIENT_ID");
        let mqtt_username = read_optional("BRIDGE_MQTT_USERNAME");
        let mqtt_password = read_optional("BRIDGE_MQTT_PASSWORD");
        let publish_prefix =
            env::var("BRIDGE_PUBLISH_PREFIX").unwrap_or_else(|_| "bridge".to_string());
        let climate_topics = read_list_with_default("BRIDGE_CLIMATE_TOPICS", "zigbee2mqtt/climate");
        let contact_topics = read_list_with_default("BRIDGE_CONTACT_TOPICS", "zigbee2mqtt/contact");
        let source_labels = parse_source_labels(
            "BRIDGE_SOURCE_LABELS",
            &env::var("BRIDGE_SOURCE_LABELS").unwrap_or_default(),
        )?;
        let influx_host =
            env::var("BRIDGE_INFLUX_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let influx_port = read_u16_with_default("BRIDGE_INFLUX_PORT", 8086)?;
        let influx_bucket =
            env::var("BRIDGE_INFLUX_BUCKET").unwrap_or_else(|_| "measurements".to_string());
        let influx_raw_bucket =
            env::var("BRIDGE_INFLUX_RAW_BUCKET").unwrap_or_else(|_| "readings".to_string());
        let store_enabled = read_bool_with_default("BRIDGE_STORE", true);
        let disconnect_grace_ms = read_u64_with_default("BRIDGE_DISCONNECT_GRACE_MS", 1000)?;

        Ok(Self {
            mqtt_host,
            mqtt_port,
            mqtt_client_id,
            mqtt_username,
            mqtt_password,
            publish_prefix,
            climate_topics,
            contact_topics,
            source_labels,
            influx_host,
            influx_port,
            influx_token,
            influx_org,
            influx_bucket,
            influx_raw_bucket,
            store_enabled,
            disconnect_grace_ms,
        })
    }
}

fn read_u16_with_default(key: &str, default: u16) -> Result<u16, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u16>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_u64_with_default(key: &str, default: u64) -> Result<u64, ConfigError> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(default),
    };
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

fn read_bool_with_default(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "on"),
        Err(_) => default,
    }
}

/// 读取逗号分隔的 topic 列表（空值退回默认）。
fn read_list_with_default(key: &str, default: &str) -> Vec<String> {
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    parse_list(&value)
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// 解析 `topic=Label,topic=Label` 形式的来源标签表。
fn parse_source_labels(key: &str, value: &str) -> Result<Vec<(String, String)>, ConfigError> {
    let mut labels = Vec::new();
    for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let Some((topic, label)) = entry.split_once('=') else {
            return Err(ConfigError::Invalid(key.to_string(), entry.to_string()));
        };
        let topic = topic.trim();
        let label = label.trim();
        if topic.is_empty() || label.is_empty() {
            return Err(ConfigError::Invalid(key.to_string(), entry.to_string()));
        }
        labels.push((topic.to_string(), label.to_string()));
    }
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::{parse_list, parse_source_labels};

    #[test]
    fn parse_list_trims_and_skips_empty() {
        assert_eq!(
            parse_list("zigbee2mqtt/a, zigbee2mqtt/b,,"),
            vec!["zigbee2mqtt/a".to_string(), "zigbee2mqtt/b".to_string()]
        );
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn parse_source_labels_accepts_pairs() {
        let labels = parse_source_labels(
            "BRIDGE_SOURCE_LABELS",
            "zigbee2mqtt/climate=Indoor, zigbee2mqtt/contact=Front Door",
        )
        .expect("labels");
        assert_eq!(
            labels,
            vec![
                ("zigbee2mqtt/climate".to_string(), "Indoor".to_string()),
                ("zigbee2mqtt/contact".to_string(), "Front Door".to_string()),
            ]
        );
    }

    #[test]
    fn parse_source_labels_rejects_missing_separator() {
        let result = parse_source_labels("BRIDGE_SOURCE_LABELS", "zigbee2mqtt/climate");
        assert!(result.is_err());
    }
}
