//! 遥测桥接守护进程：装配配置、存储、总线与分发路由，运行至停机信号。

use bridge_bus::{BusClient, BusConfig, Publisher};
use bridge_config::AppConfig;
use bridge_ingest::{
    ClimateHandler, ContactHandler, IngestContext, Router, SourceLabels, SystemClock,
};
use bridge_storage::{InfluxConfig, InfluxSink, MeasurementSink, NoopSink};
use bridge_telemetry::{init_tracing, metrics};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    // 选择存储实现：未启用时使用空实现
    let (sink, sink_handle): (Arc<dyn MeasurementSink>, Option<tokio::task::JoinHandle<()>>) =
        if config.store_enabled {
            let (sink, handle) = InfluxSink::connect(InfluxConfig {
                host: config.influx_host.clone(),
                port: config.influx_port,
                token: config.influx_token.clone(),
                org: config.influx_org.clone(),
                bucket: config.influx_bucket.clone(),
                raw_bucket: config.influx_raw_bucket.clone(),
            })?;
            info!(
                "store: influx {}:{} org={} bucket={}",
                config.influx_host, config.influx_port, config.influx_org, config.influx_bucket
            );
            (Arc::new(sink), Some(handle))
        } else {
            info!("store: noop (BRIDGE_STORE=off)");
            (Arc::new(NoopSink), None)
        };

    // 建立总线会话：初始连接失败视为致命错误，由这里决定退出
    let (bus, eventloop) = BusClient::connect(BusConfig {
        host: config.mqtt_host.clone(),
        port: config.mqtt_port,
        client_id: config.mqtt_client_id.clone(),
        username: config.mqtt_username.clone(),
        password: config.mqtt_password.clone(),
    })
    .await?;

    // 装配接入上下文与分发路由（启动后只读）
    let publisher: Arc<dyn Publisher> = Arc::new(bus.clone());
    let ctx = Arc::new(IngestContext {
        publisher,
        sink,
        labels: SourceLabels::new(config.source_labels.clone()),
        clock: Arc::new(SystemClock),
        publish_prefix: config.publish_prefix.clone(),
    });
    let mut router = Router::new();
    for topic in &config.climate_topics {
        router = router.route(topic.clone(), Arc::new(ClimateHandler::new(ctx.clone())));
    }
    for topic in &config.contact_topics {
        router = router.route(topic.clone(), Arc::new(ContactHandler::new(ctx.clone())));
    }
    let router = Arc::new(router);

    let bus_handle = bus.spawn_loop(eventloop, router.clone());
    for topic in router.topics() {
        bus.subscribe(topic);
    }

    // 运行至收到停机信号
    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");

    // 先优雅断开总线，再释放存储引用，让写入队列冲刷完毕
    bus.disconnect(
        bus_handle,
        Duration::from_millis(config.disconnect_grace_ms),
    )
    .await;
    drop(router);
    drop(ctx);
    if let Some(handle) = sink_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }

    let snapshot = metrics().snapshot();
    info!(
        messages_received = snapshot.messages_received,
        dispatch_miss = snapshot.dispatch_miss,
        decode_failures = snapshot.decode_failures,
        measurements = snapshot.measurements,
        readings_archived = snapshot.readings_archived,
        publish_failures = snapshot.publish_failures,
        write_failures = snapshot.write_failures,
        "bridge stopped"
    );
    Ok(())
}
