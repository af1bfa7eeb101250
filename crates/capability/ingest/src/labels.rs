//! topic → 来源标签静态映射。

use std::collections::HashMap;

/// 未配置映射时的来源标签。
pub const UNKNOWN_SOURCE: &str = "Unknown";

/// 来源标签表：启动时构建一次，运行期只读。
#[derive(Debug, Default)]
pub struct SourceLabels {
    labels: HashMap<String, String>,
}

impl SourceLabels {
    pub fn new(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            labels: pairs.into_iter().collect(),
        }
    }

    /// 解析 topic 对应的来源标签；总是有值，缺省为 [`UNKNOWN_SOURCE`]。
    pub fn resolve(&self, topic: &str) -> &str {
        self.labels
            .get(topic)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_SOURCE)
    }
}

#[cfg(test)]
mod tests {
    use super::{SourceLabels, UNKNOWN_SOURCE};

    #[test]
    fn resolves_configured_topic() {
        let labels = SourceLabels::new(vec![(
            "zigbee2mqtt/climate".to_string(),
            "Indoor".to_string(),
        )]);
        assert_eq!(labels.resolve("zigbee2mqtt/climate"), "Indoor");
    }

    #[test]
    fn falls_back_to_unknown() {
        let labels = SourceLabels::default();
        assert_eq!(labels.resolve("unmapped/xyz"), UNKNOWN_SOURCE);
    }
}
