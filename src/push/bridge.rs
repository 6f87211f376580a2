//! Push Bridge
//!
//! Subscribes to the user's private channel and turns incoming
//! `notification.received` events into local updates and alerts. A failed
//! subscription is not fatal: the system keeps operating on polling alone.

use std::sync::Arc;
use tokio::sync::Mutex;

use super::messages::{private_user_channel, user_channel};
use super::transport::PushTransport;
use crate::alert::AlertGate;
use crate::center::NotificationCenter;
use crate::model::PushPayload;
use crate::sync::SyncTarget;

/// Bridges push events into the notification store and the alert gate.
pub struct PushBridge {
    transport: Arc<dyn PushTransport>,
    center: Arc<NotificationCenter>,
    gate: Arc<AlertGate>,
    target: SyncTarget,
    user_id: String,
    task: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl PushBridge {
    /// Create a bridge for one user session.
    pub fn new(
        transport: Arc<dyn PushTransport>,
        center: Arc<NotificationCenter>,
        gate: Arc<AlertGate>,
        target: SyncTarget,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            center,
            gate,
            target,
            user_id: user_id.into(),
            task: Mutex::new(None),
        }
    }

    /// Subscribe to the user's channel and start handling events.
    ///
    /// Subscription failure is swallowed: the bridge logs it and leaves the
    /// system on polling alone.
    pub async fn connect(&self) {
        let channel = user_channel(&self.user_id);

        let mut rx = match self.transport.subscribe(&channel).await {
            Ok(rx) => rx,
            Err(e) => {
                tracing::warn!(channel, error = %e, "Push unavailable, staying on polling");
                return;
            }
        };

        let center = Arc::clone(&self.center);
        let gate = Arc::clone(&self.gate);
        let target = self.target;

        let task = tokio::spawn(async move {
            while let Some(data) = rx.recv().await {
                Self::handle_event(&center, &gate, target, data).await;
            }
            tracing::debug!("Push event stream ended");
        });

        *self.task.lock().await = Some(task);
    }

    /// Tear down the subscription. Unsubscription errors are swallowed.
    pub async fn disconnect(&self) {
        if let Some(task) = self.task.lock().await.take() {
            task.abort();
        }

        let channel = private_user_channel(&self.user_id);
        if let Err(e) = self.transport.unsubscribe(&channel).await {
            tracing::debug!(channel, error = %e, "Push unsubscribe failed, ignoring");
        }
    }

    async fn handle_event(
        center: &NotificationCenter,
        gate: &AlertGate,
        target: SyncTarget,
        data: serde_json::Value,
    ) {
        let payload: PushPayload = match serde_json::from_value(data) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed push payload, dropping");
                return;
            }
        };
        let notification = payload.into_notification();

        match target {
            SyncTarget::Badge => center.bump_unread().await,
            SyncTarget::Inbox => center.fetch_list().await,
        }

        gate.notify(&notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::ToastSink;
    use crate::backend::{BackendConfig, NotificationApi};
    use crate::push::transport::PushError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// In-process transport: events are injected through a channel.
    struct FakeTransport {
        sender: StdMutex<Option<mpsc::UnboundedSender<serde_json::Value>>>,
        subscribed: StdMutex<Vec<String>>,
        unsubscribed: StdMutex<Vec<String>>,
        fail_subscribe: bool,
    }

    impl FakeTransport {
        fn new(fail_subscribe: bool) -> Self {
            Self {
                sender: StdMutex::new(None),
                subscribed: StdMutex::new(Vec::new()),
                unsubscribed: StdMutex::new(Vec::new()),
                fail_subscribe,
            }
        }

        fn emit(&self, data: serde_json::Value) {
            self.sender
                .lock()
                .unwrap()
                .as_ref()
                .unwrap()
                .send(data)
                .unwrap();
        }
    }

    #[async_trait]
    impl PushTransport for FakeTransport {
        async fn subscribe(
            &self,
            channel: &str,
        ) -> Result<mpsc::UnboundedReceiver<serde_json::Value>, PushError> {
            if self.fail_subscribe {
                return Err(PushError::Unavailable("auth rejected".into()));
            }
            self.subscribed.lock().unwrap().push(channel.to_string());
            let (tx, rx) = mpsc::unbounded_channel();
            *self.sender.lock().unwrap() = Some(tx);
            Ok(rx)
        }

        async fn unsubscribe(&self, channel: &str) -> Result<(), PushError> {
            self.unsubscribed.lock().unwrap().push(channel.to_string());
            Ok(())
        }
    }

    fn center_for(base_url: String) -> Arc<NotificationCenter> {
        Arc::new(NotificationCenter::new(Arc::new(NotificationApi::new(
            BackendConfig {
                base_url,
                token: "t".to_string(),
                request_timeout_ms: 2000,
            },
        ))))
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn test_badge_event_bumps_unread_and_toasts() {
        let transport = Arc::new(FakeTransport::new(false));
        let center = center_for("http://127.0.0.1:9".into());
        let (toast, mut toasts) = ToastSink::channel();
        let gate = Arc::new(AlertGate::new(vec![Box::new(toast)]));

        let bridge = PushBridge::new(
            transport.clone(),
            center.clone(),
            gate,
            SyncTarget::Badge,
            "42",
        );
        bridge.connect().await;

        assert_eq!(transport.subscribed.lock().unwrap().as_slice(), ["user.42"]);

        transport.emit(json!({"id": 7, "title": "hello", "message": "world"}));
        settle().await;

        assert_eq!(center.unread().await, 1);
        assert_eq!(toasts.recv().await.unwrap().title, "hello");
    }

    #[tokio::test]
    async fn test_wrapped_payload_and_duplicate_alert_suppression() {
        let transport = Arc::new(FakeTransport::new(false));
        let center = center_for("http://127.0.0.1:9".into());
        let (toast, mut toasts) = ToastSink::channel();
        let gate = Arc::new(AlertGate::new(vec![Box::new(toast)]));

        let bridge = PushBridge::new(
            transport.clone(),
            center.clone(),
            gate,
            SyncTarget::Badge,
            "42",
        );
        bridge.connect().await;

        transport.emit(json!({"notification": {"id": 7, "title": "a", "message": "m"}}));
        transport.emit(json!({"id": 7, "title": "a", "message": "m"}));
        settle().await;

        // Both events counted, but only one alert fired.
        assert_eq!(center.unread().await, 2);
        assert!(toasts.recv().await.is_some());
        assert!(toasts.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_inbox_event_triggers_list_refetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/notifications"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 7, "title": "a", "message": "m"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let transport = Arc::new(FakeTransport::new(false));
        let center = center_for(server.uri());
        let gate = Arc::new(AlertGate::new(Vec::new()));

        let bridge = PushBridge::new(
            transport.clone(),
            center.clone(),
            gate,
            SyncTarget::Inbox,
            "42",
        );
        bridge.connect().await;

        transport.emit(json!({"id": 7, "title": "a", "message": "m"}));
        settle().await;

        assert_eq!(center.items().await.len(), 1);
        server.verify().await;
    }

    #[tokio::test]
    async fn test_subscribe_failure_is_silent() {
        let transport = Arc::new(FakeTransport::new(true));
        let center = center_for("http://127.0.0.1:9".into());
        let gate = Arc::new(AlertGate::new(Vec::new()));

        let bridge = PushBridge::new(
            transport.clone(),
            center.clone(),
            gate,
            SyncTarget::Badge,
            "42",
        );
        // Must not panic or error; polling carries on.
        bridge.connect().await;
        assert_eq!(center.unread().await, 0);
    }

    #[tokio::test]
    async fn test_malformed_payload_is_dropped() {
        let transport = Arc::new(FakeTransport::new(false));
        let center = center_for("http://127.0.0.1:9".into());
        let gate = Arc::new(AlertGate::new(Vec::new()));

        let bridge = PushBridge::new(
            transport.clone(),
            center.clone(),
            gate,
            SyncTarget::Badge,
            "42",
        );
        bridge.connect().await;

        transport.emit(json!({"unexpected": true}));
        transport.emit(json!({"id": 1, "title": "a", "message": "m"}));
        settle().await;

        // Only the well-formed event counted.
        assert_eq!(center.unread().await, 1);
    }

    #[tokio::test]
    async fn test_disconnect_uses_private_channel_name() {
        let transport = Arc::new(FakeTransport::new(false));
        let center = center_for("http://127.0.0.1:9".into());
        let gate = Arc::new(AlertGate::new(Vec::new()));

        let bridge = PushBridge::new(
            transport.clone(),
            center,
            gate,
            SyncTarget::Badge,
            "42",
        );
        bridge.connect().await;
        bridge.disconnect().await;

        assert_eq!(
            transport.unsubscribed.lock().unwrap().as_slice(),
            ["private-user.42"]
        );
    }
}
