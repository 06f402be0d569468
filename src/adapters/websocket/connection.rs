//! `LiveConnection` over an axum WebSocket.

use std::borrow::Cow;
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::ws::{CloseFrame, Message, WebSocket};
use futures::stream::SplitSink;
use futures::SinkExt;

use crate::domain::event::LiveEvent;
use crate::ports::{DeliveryError, LiveConnection};

use super::messages::encode_event;

/// Outbound half of a viewer's WebSocket.
///
/// Each send is bounded by `send_timeout`; a slow viewer surfaces as
/// `DeliveryError::TimedOut` and is pruned by the registry.
pub struct WsConnection {
    sink: SplitSink<WebSocket, Message>,
    send_timeout: Duration,
}

impl WsConnection {
    pub fn new(sink: SplitSink<WebSocket, Message>, send_timeout: Duration) -> Self {
        Self { sink, send_timeout }
    }
}

#[async_trait]
impl LiveConnection for WsConnection {
    async fn deliver(&mut self, event: &LiveEvent) -> Result<(), DeliveryError> {
        let text = encode_event(event)?;
        match tokio::time::timeout(self.send_timeout, self.sink.send(Message::Text(text))).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(DeliveryError::Transport(e.to_string())),
            Err(_) => Err(DeliveryError::TimedOut),
        }
    }

    async fn close(&mut self, code: u16, reason: &str) {
        let frame = CloseFrame {
            code,
            reason: Cow::Owned(reason.to_string()),
        };
        let sent =
            tokio::time::timeout(self.send_timeout, self.sink.send(Message::Close(Some(frame))))
                .await;
        if !matches!(sent, Ok(Ok(()))) {
            tracing::debug!(code, "close frame not delivered");
        }
    }
}
