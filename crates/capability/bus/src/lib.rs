//! 消息总线客户端（MQTT 连接、订阅、发布）。
//!
//! 入站消息统一交给唯一注册的 [`InboundHandler`]；发布与订阅均为
//! fire-and-forget：调用立即返回，结果由后台任务等待并仅记录日志。

use async_trait::async_trait;
use bridge_telemetry::record_publish_failure;
use rumqttc::{AsyncClient, ConnectReturnCode, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// 总线错误。
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("connect error: {0}")]
    Connect(String),
    #[error("connect rejected by broker: {0:?}")]
    Rejected(ConnectReturnCode),
}

/// 入站消息处理入口：总线收到的每条消息都经由它分发。
#[async_trait]
pub trait InboundHandler: Send + Sync {
    async fn on_message(&self, topic: &str, payload: &[u8]);
}

/// 出站发布抽象：入队即返回，结果只记录日志。
pub trait Publisher: Send + Sync {
    fn publish(&self, topic: &str, payload: Vec<u8>, retained: bool);
}

/// 总线连接配置。
#[derive(Debug, Clone)]
pub struct BusConfig {
    pub host: String,
    pub port: u16,
    pub client_id: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// MQTT 总线客户端。
#[derive(Clone)]
pub struct BusClient {
    client: AsyncClient,
}

impl BusClient {
    /// 建立会话并等待 ConnAck。
    ///
    /// 初始连接失败返回 [`BusError`]，由启动方决定如何收场；
    /// 连接建立后的断线由事件循环观测，这里不涉及。
    pub async fn connect(config: BusConfig) -> Result<(Self, EventLoop), BusError> {
        let client_id = client_id_for(&config);
        let mut options = MqttOptions::new(client_id, config.host.clone(), config.port);
        options.set_keep_alive(Duration::from_secs(30));
        if let (Some(username), Some(password)) = (config.username, config.password) {
            options.set_credentials(username, password);
        }

        let (client, mut eventloop) = AsyncClient::new(options, 10);
        loop {
            match eventloop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                    if ack.code != ConnectReturnCode::Success {
                        return Err(BusError::Rejected(ack.code));
                    }
                    info!(
                        target: "bridge.bus",
                        host = %config.host,
                        port = config.port,
                        "bus connected"
                    );
                    return Ok((Self { client }, eventloop));
                }
                Ok(_) => {}
                Err(err) => return Err(BusError::Connect(err.to_string())),
            }
        }
    }

    /// 启动事件循环后台任务，入站消息交给 `handler` 分发。
    pub fn spawn_loop(
        &self,
        mut eventloop: EventLoop,
        handler: Arc<dyn InboundHandler>,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match eventloop.poll().await {
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        // 每条消息由独立任务处理
                        let handler = handler.clone();
                        tokio::spawn(async move {
                            handler.on_message(&publish.topic, &publish.payload).await;
                        });
                    }
                    Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                        info!(target: "bridge.bus", "bus disconnected");
                        break;
                    }
                    Ok(_) => {}
                    Err(err) => {
                        error!(target: "bridge.bus", "connection lost: {}", err);
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        })
    }

    /// 订阅 topic。失败仅记录日志，不影响其余 topic。
    pub fn subscribe(&self, topic: &str) {
        info!(target: "bridge.bus", topic = %topic, "subscribing");
        let client = self.client.clone();
        let topic = topic.to_string();
        tokio::spawn(async move {
            if let Err(err) = client.subscribe(&topic, QoS::AtLeastOnce).await {
                warn!(target: "bridge.bus", topic = %topic, "subscribe failed: {}", err);
            }
        });
    }

    /// 优雅断开：先发 Disconnect（请求队列中的在途发布先被冲刷），
    /// 再在有界宽限期内等待事件循环退出。
    pub async fn disconnect(self, handle: tokio::task::JoinHandle<()>, grace: Duration) {
        if let Err(err) = self.client.disconnect().await {
            warn!(target: "bridge.bus", "disconnect request failed: {}", err);
        }
        let abort = handle.abort_handle();
        if tokio::time::timeout(grace, handle).await.is_err() {
            warn!(target: "bridge.bus", "disconnect grace elapsed before event loop stopped");
            abort.abort();
        }
    }
}

impl Publisher for BusClient {
    fn publish(&self, topic: &str, payload: Vec<u8>, retained: bool) {
        let client = self.client.clone();
        let topic = topic.to_string();
        tokio::spawn(async move {
            if let Err(err) = client
                .publish(&topic, QoS::AtMostOnce, retained, payload)
                .await
            {
                record_publish_failure();
                warn!(target: "bridge.bus", topic = %topic, "publish failed: {}", err);
            }
        });
    }
}

fn client_id_for(config: &BusConfig) -> String {
    match &config.client_id {
        Some(client_id) => client_id.clone(),
        None => format!("bridge-{}", uuid::Uuid::new_v4()),
    }
}

#[cfg(test)]
mod tests {
    use super::{BusConfig, client_id_for};

    fn config(client_id: Option<&str>) -> BusConfig {
        BusConfig {
            host: "127.0.0.1".to_string(),
            port: 1883,
            client_id: client_id.map(str::to_string),
            username: None,
            password: None,
        }
    }

    #[test]
    fn client_id_uses_configured_value() {
        assert_eq!(client_id_for(&config(Some("bridge-core"))), "bridge-core");
    }

    #[test]
    fn client_id_generates_unique_default() {
        let first = client_id_for(&config(None));
        let second = client_id_for(&config(None));
        assert!(first.starts_with("bridge-"));
        assert_ne!(first, second);
    }
}
