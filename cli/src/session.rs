//! One participant connection: a WebSocket plus a headless reconciled board.
//!
//! Every event the server pushes is applied to the local [`Scene`] through the
//! same [`Reconciler`] a drawing client uses, so what the CLI prints is what
//! any participant would see.

use std::time::Duration;

use canvas::reconciler::Reconciler;
use canvas::surface::Scene;
use frames::codec::{decode_binary, decode_text, encode_binary, encode_text};
use frames::{ClientEvent, Encoding, ServerEvent};
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::CliError;

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// How long to wait for the server to answer a request it always answers.
pub const REPLY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Session {
    stream: WsStream,
    encoding: Encoding,
    board: Reconciler<Scene>,
}

impl Session {
    pub async fn connect(ws_url: &str, encoding: Encoding) -> Result<Self, CliError> {
        let (stream, _) = connect_async(ws_url).await.map_err(|e| CliError::WsConnect(Box::new(e)))?;
        Ok(Self { stream, encoding, board: Reconciler::new(Scene::new()) })
    }

    pub fn board(&self) -> &Reconciler<Scene> {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Reconciler<Scene> {
        &mut self.board
    }

    /// Join `board_id` and wait for its snapshot to land on the local scene.
    pub async fn join(&mut self, board_id: &str) -> Result<(), CliError> {
        let join = self.board.join(board_id);
        self.send(&join).await?;
        self.wait_for(|event| matches!(event, ServerEvent::InitState(_)), REPLY_TIMEOUT).await?;
        Ok(())
    }

    /// Send a request produced by the reconciler. `None` means the local
    /// action had nothing to report.
    pub async fn send_opt(&mut self, event: Option<ClientEvent>) -> Result<bool, CliError> {
        match event {
            Some(event) => self.send(&event).await.map(|()| true),
            None => Ok(false),
        }
    }

    pub async fn send(&mut self, event: &ClientEvent) -> Result<(), CliError> {
        let msg = match self.encoding {
            Encoding::Json => Message::Text(encode_text(event)?.into()),
            Encoding::Protobuf => Message::Binary(encode_binary(event)?.into()),
        };
        tracing::debug!(event = event.name(), board_id = event.board_id(), "cli: send");
        self.stream.send(msg).await.map_err(|e| CliError::Ws(Box::new(e)))
    }

    /// Receive the next event, apply it to the local board, and return it.
    pub async fn next_event(&mut self) -> Result<ServerEvent, CliError> {
        loop {
            let Some(msg) = self.stream.next().await else {
                return Err(CliError::WsClosed);
            };
            let event: ServerEvent = match msg.map_err(|e| CliError::Ws(Box::new(e)))? {
                Message::Text(text) => decode_text(text.as_str())?,
                Message::Binary(bytes) => decode_binary(&bytes)?,
                Message::Close(_) => return Err(CliError::WsClosed),
                _ => continue,
            };
            tracing::debug!(event = event.name(), "cli: recv");
            self.board.apply(event.clone());
            return Ok(event);
        }
    }

    /// Apply events until one matches `done`.
    pub async fn wait_for(
        &mut self,
        done: impl Fn(&ServerEvent) -> bool,
        limit: Duration,
    ) -> Result<ServerEvent, CliError> {
        tokio::time::timeout(limit, async {
            loop {
                let event = self.next_event().await?;
                if done(&event) {
                    return Ok::<_, CliError>(event);
                }
            }
        })
        .await
        .map_err(|_| CliError::Timeout)?
    }

    /// Close politely. Requests already sent are processed by the server
    /// before it sees the close.
    pub async fn close(mut self) -> Result<(), CliError> {
        self.stream.close(None).await.map_err(|e| CliError::Ws(Box::new(e)))?;
        let drain = async { while self.stream.next().await.is_some() {} };
        if tokio::time::timeout(REPLY_TIMEOUT, drain).await.is_err() {
            tracing::warn!("cli: server did not acknowledge close");
        }
        Ok(())
    }
}
