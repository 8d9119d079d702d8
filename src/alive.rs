use crate::config::{AliveConfig, Endpoint};
use crate::protocol;
use crate::protocol::messages::metadata;
use crate::status::Outcome;
use futures::future::{BoxFuture, FutureExt};
use log::{debug, error};
use std::io::Result;

pub const CHECK_NAME: &str = "KafkaAliveCheck";

/// Something that can fetch the topic list of a cluster.
pub trait TopicLister {
    fn list_topics(&mut self) -> BoxFuture<'_, Result<Vec<String>>>;
}

pub struct KafkaTopicLister {
    bootstrap: Vec<Endpoint>,
    client_id: String
}

impl KafkaTopicLister {
    pub fn new(config: &AliveConfig) -> Self {
        KafkaTopicLister {
            bootstrap: config.bootstrap.clone(),
            client_id: config.client_id.clone()
        }
    }
}

impl TopicLister for KafkaTopicLister {
    fn list_topics(&mut self) -> BoxFuture<'_, Result<Vec<String>>> {
        async move {
            let mut conn = protocol::connect_any(&self.bootstrap, &self.client_id).await?;
            let response = conn.send(&metadata::Request {
                topics: None,
                allow_auto_topic_creation: false
            }).await?;
            debug!("cluster {} answered from {} brokers",
                response.cluster_id.as_deref().unwrap_or("<unnamed>"), response.broker_count);
            for topic in response.topics.iter().filter(|t| t.error_code != 0) {
                debug!("topic {} ({} partitions) reported error code {}", topic.name, topic.partition_count, topic.error_code);
            }
            Ok(response.topic_names().map(String::from).collect())
        }.boxed()
    }
}

/// Runs the aliveness check. Any failure is critical; the topic list itself
/// only proves the cluster answered.
pub async fn check_alive<L: TopicLister>(lister: &mut L) -> Outcome {
    match lister.list_topics().await {
        Ok(topics) => {
            debug!("cluster reported {} topics", topics.len());
            Outcome::ok()
        },
        Err(e) => {
            error!("alive check failed: {:?}", e);
            Outcome::critical(format!("Error: {}", e))
        }
    }
}

pub async fn run(config: &AliveConfig) -> Outcome {
    check_alive(&mut KafkaTopicLister::new(config)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;
    use futures::future;
    use std::io::{Error, ErrorKind};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    struct FixedLister(Option<Result<Vec<String>>>);

    impl TopicLister for FixedLister {
        fn list_topics(&mut self) -> BoxFuture<'_, Result<Vec<String>>> {
            let result = self.0.take().unwrap_or_else(|| Ok(vec![]));
            future::ready(result).boxed()
        }
    }

    fn config_for(bootstrap: &str) -> AliveConfig {
        AliveConfig {
            bootstrap: crate::config::parse_endpoints(bootstrap).unwrap(),
            client_id: "check-kafka".into()
        }
    }

    fn frame(body: &[u8]) -> Vec<u8> {
        let mut frame = (body.len() as i32).to_be_bytes().to_vec();
        frame.extend_from_slice(body);
        frame
    }

    fn metadata_response(correlation_id: i32) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&correlation_id.to_be_bytes());
        body.extend_from_slice(&0i32.to_be_bytes());
        body.extend_from_slice(&0i32.to_be_bytes());
        body.extend_from_slice(&(-1i16).to_be_bytes());
        body.extend_from_slice(&(-1i32).to_be_bytes());
        body.extend_from_slice(&0i32.to_be_bytes());
        frame(&body)
    }

    /// Accepts one connection, reads one request and answers with `reply(correlation_id)`.
    async fn fake_broker<F>(reply: F) -> (std::net::SocketAddr, tokio::task::JoinHandle<Vec<u8>>)
        where F: FnOnce(i32) -> Vec<u8> + Send + 'static
    {
        let mut listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let broker = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let len = socket.read_i32().await.unwrap();
            let mut request = vec![0; len as usize];
            socket.read_exact(&mut request).await.unwrap();
            let correlation_id = i32::from_be_bytes([request[4], request[5], request[6], request[7]]);
            socket.write_all(&reply(correlation_id)).await.unwrap();
            request
        });
        (addr, broker)
    }

    async fn closed_port() -> std::net::SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    }

    #[tokio::test]
    async fn listing_topics_is_ok() {
        let mut lister = FixedLister(Some(Ok(vec!["orders".into()])));
        let outcome = check_alive(&mut lister).await;
        assert_eq!(outcome, Outcome::ok());
        assert_eq!(outcome.check_line(CHECK_NAME), "KafkaAliveCheck OK");
    }

    #[tokio::test]
    async fn failure_is_critical_with_error_text() {
        let err = Error::new(ErrorKind::ConnectionRefused, "connection refused");
        let mut lister = FixedLister(Some(Err(err)));
        let outcome = check_alive(&mut lister).await;
        assert_eq!(outcome.status, Status::Critical);
        assert_eq!(outcome.message.as_deref(), Some("Error: connection refused"));
    }

    #[tokio::test]
    async fn unreachable_broker_is_critical() {
        let addr = closed_port().await;
        let outcome = run(&config_for(&addr.to_string())).await;
        assert_eq!(outcome.status, Status::Critical);
        let message = outcome.message.unwrap();
        assert!(message.starts_with("Error: "));
        assert!(message.to_lowercase().contains("refused"), "unexpected message {}", message);
    }

    #[tokio::test]
    async fn cluster_without_topics_is_ok() {
        let (addr, broker) = fake_broker(metadata_response).await;
        let outcome = run(&config_for(&format!("127.0.0.1:{}", addr.port()))).await;
        let request = broker.await.unwrap();
        assert_eq!(&request[0..4], &[0, 3, 0, 6]);
        assert_eq!(&request[8..10], &[0, 11]);
        assert_eq!(&request[10..21], b"check-kafka");
        assert_eq!(outcome, Outcome::ok());
    }

    #[tokio::test]
    async fn truncated_response_is_critical() {
        let (addr, broker) = fake_broker(|correlation_id| frame(&correlation_id.to_be_bytes())).await;
        let outcome = run(&config_for(&addr.to_string())).await;
        broker.await.unwrap();
        assert_eq!(outcome.status, Status::Critical);
    }

    #[tokio::test]
    async fn oversized_response_is_critical() {
        let (addr, broker) = fake_broker(|_| i32::max_value().to_be_bytes().to_vec()).await;
        let outcome = run(&config_for(&addr.to_string())).await;
        broker.await.unwrap();
        assert_eq!(outcome.status, Status::Critical);
        assert!(outcome.message.unwrap().contains("invalid response size"));
    }

    #[tokio::test]
    async fn later_bootstrap_endpoint_is_tried() {
        let closed = closed_port().await;
        let (addr, broker) = fake_broker(metadata_response).await;
        let outcome = run(&config_for(&format!("{},{}", closed, addr))).await;
        broker.await.unwrap();
        assert_eq!(outcome, Outcome::ok());
    }
}
