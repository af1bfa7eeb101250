use domain::{ClimateReading, ContactReading, Measurement, MeasurementValue};

#[test]
fn climate_reading_decodes_device_payload() {
    let payload = r#"{"temperature":21.5,"humidity":40.2,"pressure":1012.0,"battery":3.1,"voltage":3000}"#;
    let reading: ClimateReading = serde_json::from_str(payload).expect("decode");
    assert_eq!(reading.temperature, 21.5);
    assert_eq!(reading.humidity, 40.2);
    assert_eq!(reading.pressure, 1012.0);
    assert_eq!(reading.battery, 3.1);
    assert_eq!(reading.voltage, 3000);
    // 报文未携带的字段解码为零值
    assert_eq!(reading.linkquality, 0);
    assert_eq!(reading.timestamp, 0);
}

#[test]
fn contact_reading_decodes_device_payload() {
    let payload = r#"{"contact":true,"battery":2.9}"#;
    let reading: ContactReading = serde_json::from_str(payload).expect("decode");
    assert!(reading.contact);
    assert_eq!(reading.battery, 2.9);
    assert_eq!(reading.voltage, 0);
}

#[test]
fn climate_reading_rejects_non_json() {
    let result = serde_json::from_str::<ClimateReading>("not-json");
    assert!(result.is_err());
}

#[test]
fn climate_reading_ignores_unknown_fields() {
    let payload = r#"{"temperature":20.0,"power_outage_count":3}"#;
    let reading: ClimateReading = serde_json::from_str(payload).expect("decode");
    assert_eq!(reading.temperature, 20.0);
}

#[test]
fn measurement_serializes_float_as_bare_number() {
    let measure = Measurement {
        value: MeasurementValue::Float(21.5),
        timestamp: 1_700_000_000,
        location: "Indoor".to_string(),
    };
    let json = serde_json::to_string(&measure).expect("encode");
    assert_eq!(
        json,
        r#"{"value":21.5,"timestamp":1700000000,"location":"Indoor"}"#
    );
}

#[test]
fn measurement_serializes_bool_as_bare_boolean() {
    let measure = Measurement {
        value: MeasurementValue::Bool(true),
        timestamp: 1_700_000_000,
        location: "Front Door".to_string(),
    };
    let json = serde_json::to_string(&measure).expect("encode");
    assert_eq!(
        json,
        r#"{"value":true,"timestamp":1700000000,"location":"Front Door"}"#
    );
}

#[test]
fn measurement_round_trips() {
    let measure = Measurement {
        value: MeasurementValue::Float(1012.0),
        timestamp: 42,
        location: "Unknown".to_string(),
    };
    let json = serde_json::to_string(&measure).expect("encode");
    let back: Measurement = serde_json::from_str(&json).expect("decode");
    assert_eq!(back, measure);
}
