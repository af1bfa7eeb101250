//! InfluxDB v2 Line Protocol 编码。
//!
//! 格式：`measurement,tag1=v1 field1=v1,field2=v2 timestamp`，
//! 时间戳精度为秒（写入请求携带 `precision=s`）。

/// 字段值：按 Line Protocol 规则渲染。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    /// 浮点数，原样输出。
    Float(f64),
    /// 整数，带 `i` 后缀。
    Integer(i64),
    /// 布尔，输出 `true`/`false`。
    Boolean(bool),
}

impl FieldValue {
    fn render(&self) -> String {
        match self {
            FieldValue::Float(v) => format!("{}", v),
            FieldValue::Integer(v) => format!("{}i", v),
            FieldValue::Boolean(v) => v.to_string(),
        }
    }
}

/// 编码单个数据点。
///
/// tag 按键名排序输出（规范形式）。`fields` 不得为空，InfluxDB
/// 要求每个点至少携带一个字段。
pub fn encode_point(
    measurement: &str,
    tags: &[(&str, &str)],
    fields: &[(&str, FieldValue)],
    timestamp: i64,
) -> String {
    debug_assert!(!fields.is_empty());

    let mut line = escape_name(measurement);

    let mut sorted_tags: Vec<_> = tags.to_vec();
    sorted_tags.sort_by_key(|(key, _)| *key);
    for (key, value) in sorted_tags {
        line.push(',');
        line.push_str(&escape_part(key));
        line.push('=');
        line.push_str(&escape_part(value));
    }

    line.push(' ');
    for (index, (key, value)) in fields.iter().enumerate() {
        if index > 0 {
            line.push(',');
        }
        line.push_str(&escape_part(key));
        line.push('=');
        line.push_str(&value.render());
    }

    line.push(' ');
    line.push_str(&timestamp.to_string());
    line
}

/// measurement 名转义：逗号与空格。
fn escape_name(s: &str) -> String {
    s.replace(',', "\\,").replace(' ', "\\ ")
}

/// tag 键/值与 field 键转义：逗号、等号与空格。
fn escape_part(s: &str) -> String {
    s.replace(',', "\\,")
        .replace('=', "\\=")
        .replace(' ', "\\ ")
}

#[cfg(test)]
mod tests {
    use super::{FieldValue, encode_point};

    #[test]
    fn encodes_tagged_float_point() {
        let line = encode_point(
            "temperature",
            &[("location", "Indoor")],
            &[("value", FieldValue::Float(21.5))],
            1_700_000_000,
        );
        assert_eq!(line, "temperature,location=Indoor value=21.5 1700000000");
    }

    #[test]
    fn encodes_boolean_point() {
        let line = encode_point(
            "contact",
            &[("location", "Front Door")],
            &[("value", FieldValue::Boolean(true))],
            1_700_000_000,
        );
        assert_eq!(
            line,
            "contact,location=Front\\ Door value=true 1700000000"
        );
    }

    #[test]
    fn encodes_multi_field_point_without_tags() {
        let line = encode_point(
            "climate",
            &[],
            &[
                ("battery", FieldValue::Float(3.1)),
                ("voltage", FieldValue::Integer(3000)),
            ],
            42,
        );
        assert_eq!(line, "climate battery=3.1,voltage=3000i 42");
    }

    #[test]
    fn sorts_tags_by_key() {
        let line = encode_point(
            "m",
            &[("zone", "b"), ("location", "a")],
            &[("value", FieldValue::Integer(1))],
            1,
        );
        assert_eq!(line, "m,location=a,zone=b value=1i 1");
    }

    #[test]
    fn escapes_special_characters() {
        let line = encode_point(
            "my measurement",
            &[("tag key", "tag,value")],
            &[("field=key", FieldValue::Integer(7))],
            9,
        );
        assert_eq!(
            line,
            "my\\ measurement,tag\\ key=tag\\,value field\\=key=7i 9"
        );
    }
}
