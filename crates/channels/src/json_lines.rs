//! JSON-lines channel — an editor host speaking over a byte stream.
//!
//! Each line in is one [`HostInbound`] JSON object; each message out is one
//! [`HostOutbound`] JSON object followed by `\n`. `chatrelay serve` runs this
//! over stdin/stdout.

use crate::protocol::{HostInbound, HostOutbound};
use crate::{ChannelError, HostChannel};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{Mutex, mpsc};
use tracing::debug;

pub struct JsonLinesChannel<R, W> {
    /// Taken by `start`; a channel can only be started once.
    reader: Mutex<Option<R>>,
    writer: Mutex<W>,
}

impl<R, W> JsonLinesChannel<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: Mutex::new(Some(reader)),
            writer: Mutex::new(writer),
        }
    }

    /// Give back the writer, e.g. to inspect what was sent.
    pub fn into_writer(self) -> W {
        self.writer.into_inner()
    }
}

impl JsonLinesChannel<tokio::io::Stdin, tokio::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout())
    }
}

#[async_trait]
impl<R, W> HostChannel for JsonLinesChannel<R, W>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send,
{
    fn name(&self) -> &str {
        "json-lines"
    }

    async fn start(
        &self,
    ) -> Result<mpsc::Receiver<Result<HostInbound, ChannelError>>, ChannelError> {
        let reader = self
            .reader
            .lock()
            .await
            .take()
            .ok_or_else(|| ChannelError::ConnectionLost("channel already started".into()))?;

        let (tx, rx) = mpsc::channel(32);

        tokio::spawn(async move {
            let mut lines = BufReader::new(reader).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        let item = serde_json::from_str::<HostInbound>(&line)
                            .map_err(|e| ChannelError::InvalidMessage(e.to_string()));
                        if tx.send(item).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => {
                        debug!("Host closed the input stream");
                        break;
                    }
                    Err(e) => {
                        let _ = tx.send(Err(ChannelError::ConnectionLost(e.to_string()))).await;
                        break;
                    }
                }
            }
        });

        Ok(rx)
    }

    async fn send(&self, message: &HostOutbound) -> Result<(), ChannelError> {
        let mut line = serde_json::to_string(message)
            .map_err(|e| ChannelError::DeliveryFailed(e.to_string()))?;
        line.push('\n');

        let mut writer = self.writer.lock().await;
        writer
            .write_all(line.as_bytes())
            .await
            .map_err(|e| ChannelError::DeliveryFailed(e.to_string()))?;
        writer
            .flush()
            .await
            .map_err(|e| ChannelError::DeliveryFailed(e.to_string()))
    }
}
