use tokio::sync::mpsc;

use crate::common::{NetworkCommand, NetworkEvent};

use super::client::ChatClient;

/// Vòng lặp mạng chạy ngầm: nhận lệnh từ UI, gửi request, báo kết quả lên UI.
pub struct NetworkWorker {
    client: ChatClient,
    event_sender: mpsc::Sender<NetworkEvent>,
    command_receiver: mpsc::Receiver<NetworkCommand>,
}

impl NetworkWorker {
    pub fn new(
        client: ChatClient,
        event_sender: mpsc::Sender<NetworkEvent>,
        command_receiver: mpsc::Receiver<NetworkCommand>,
    ) -> Self {
        Self {
            client,
            event_sender,
            command_receiver,
        }
    }

    /// Runs until the UI drops its command sender.
    pub async fn run(mut self) {
        log::info!("Network worker started (endpoint {})", self.client.endpoint());

        while let Some(command) = self.command_receiver.recv().await {
            self.handle_command(command);
        }

        log::info!("Command channel closed; network worker stopping");
    }

    fn handle_command(&self, command: NetworkCommand) {
        match command {
            NetworkCommand::Deliver(text) => {
                // Each delivery runs on its own task, so replies may arrive out of
                // submission order.
                let client = self.client.clone();
                let event_sender = self.event_sender.clone();
                tokio::spawn(async move {
                    let event = match client.deliver(&text).await {
                        Ok(reply) => NetworkEvent::ReplyReceived(reply),
                        Err(err) => NetworkEvent::DeliveryFailed(err.to_string()),
                    };
                    if let Err(err) = event_sender.send(event).await {
                        log::warn!("Failed to notify UI about delivery result: {err}");
                    }
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tokio::time::timeout;
    use wiremock::matchers::{body_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn next_event(rx: &mut mpsc::Receiver<NetworkEvent>) -> NetworkEvent {
        timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("event within timeout")
            .expect("channel open")
    }

    #[tokio::test]
    async fn deliver_command_reports_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(json!({ "message": "patient" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "response": "Please provide your sex" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (event_tx, mut event_rx) = mpsc::channel(8);
        let worker = NetworkWorker::new(
            ChatClient::new(format!("{}/chat", server.uri())),
            event_tx,
            cmd_rx,
        );
        let handle = tokio::spawn(worker.run());

        cmd_tx
            .send(NetworkCommand::Deliver("patient".to_string()))
            .await
            .expect("send command");

        assert_eq!(
            next_event(&mut event_rx).await,
            NetworkEvent::ReplyReceived("Please provide your sex".to_string())
        );

        drop(cmd_tx);
        timeout(Duration::from_secs(5), handle)
            .await
            .expect("worker stops")
            .expect("worker task");
    }

    #[tokio::test]
    async fn failed_delivery_is_reported_as_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (event_tx, mut event_rx) = mpsc::channel(8);
        tokio::spawn(
            NetworkWorker::new(
                ChatClient::new(format!("{}/chat", server.uri())),
                event_tx,
                cmd_rx,
            )
            .run(),
        );

        cmd_tx
            .send(NetworkCommand::Deliver("hello".to_string()))
            .await
            .expect("send command");

        match next_event(&mut event_rx).await {
            NetworkEvent::DeliveryFailed(reason) => {
                assert!(reason.starts_with("invalid reply payload"), "{reason}")
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn every_command_produces_one_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "ok" })))
            .expect(3)
            .mount(&server)
            .await;

        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (event_tx, mut event_rx) = mpsc::channel(8);
        tokio::spawn(
            NetworkWorker::new(
                ChatClient::new(format!("{}/chat", server.uri())),
                event_tx,
                cmd_rx,
            )
            .run(),
        );

        for text in ["a", "b", "c"] {
            cmd_tx
                .send(NetworkCommand::Deliver(text.to_string()))
                .await
                .expect("send command");
        }
        for _ in 0..3 {
            assert_eq!(
                next_event(&mut event_rx).await,
                NetworkEvent::ReplyReceived("ok".to_string())
            );
        }
    }
}
