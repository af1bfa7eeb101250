use bridge_config::AppConfig;

#[test]
fn load_config_from_env() {
    // Rust 2024 中 set_var 需要显式标注 unsafe（测试进程内可控）。
    unsafe {
        std::env::set_var("BRIDGE_INFLUX_TOKEN", "token-1");
        std::env::set_var("BRIDGE_INFLUX_ORG", "home");
        std::env::set_var("BRIDGE_MQTT_PORT", "1884");
        std::env::set_var("BRIDGE_SOURCE_LABELS", "zigbee2mqtt/climate=Indoor");
    }

    let config = AppConfig::from_env().expect("config");
    assert_eq!(config.influx_token, "token-1");
    assert_eq!(config.influx_org, "home");
    assert_eq!(config.mqtt_port, 1884);
    assert_eq!(config.mqtt_host, "127.0.0.1");
    assert_eq!(config.publish_prefix, "bridge");
    assert_eq!(config.influx_bucket, "measurements");
    assert_eq!(config.influx_raw_bucket, "readings");
    assert!(config.store_enabled);
    assert_eq!(config.disconnect_grace_ms, 1000);
    assert_eq!(
        config.source_labels,
        vec![("zigbee2mqtt/climate".to_string(), "Indoor".to_string())]
    );
}
