use crate::error::Result;
use futures::{SinkExt, StreamExt};
use std::future::Future;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

/// Frames buffered in each direction between the socket and the session
const FRAME_BUFFER: usize = 64;

/// Both halves of an open connection.
///
/// Dropping `outbound` asks the transport to close the connection. The
/// transport closes `inbound` once the connection is gone, whichever side
/// ended it.
pub struct Link {
    pub outbound: mpsc::Sender<String>,
    pub inbound: mpsc::Receiver<String>,
}

pub trait Transport {
    /// Open a connection to `address`. Messages arrive on the returned
    /// inbound channel in the order the peer sent them.
    fn open(&self, address: &str) -> impl Future<Output = Result<Link>> + Send;
}

/// WebSocket transport carrying one text frame per message
#[derive(Debug, Clone, Copy, Default)]
pub struct WsTransport;

impl Transport for WsTransport {
    async fn open(&self, address: &str) -> Result<Link> {
        let (ws_stream, _) = tokio_tungstenite::connect_async(address).await?;
        let (mut ws_write, mut ws_read) = ws_stream.split();

        let (outbound, mut outbound_rx) = mpsc::channel::<String>(FRAME_BUFFER);
        let (inbound_tx, inbound) = mpsc::channel::<String>(FRAME_BUFFER);

        tokio::spawn(async move {
            while let Some(text) = outbound_rx.recv().await {
                if let Err(e) = ws_write.send(Message::Text(text.into())).await {
                    tracing::warn!("Failed to send frame: {}", e);
                    break;
                }
            }
            let _ = ws_write.close().await;
        });

        tokio::spawn(async move {
            while let Some(frame) = ws_read.next().await {
                let text = match frame {
                    Ok(Message::Text(text)) => text.as_str().to_owned(),
                    Ok(Message::Binary(bytes)) => String::from_utf8_lossy(&bytes).into_owned(),
                    Ok(Message::Close(_)) => break,
                    Ok(_) => continue,
                    Err(e) => {
                        tracing::debug!("WebSocket read ended: {}", e);
                        break;
                    }
                };
                if inbound_tx.send(text).await.is_err() {
                    break;
                }
            }
            // inbound_tx drops here, which closes the session's inbound channel
        });

        Ok(Link { outbound, inbound })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_websocket_frames_both_ways() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();

            ws.send(Message::Text("hello".into())).await.unwrap();
            ws.send(Message::Binary(vec![0x68, 0xff, 0x69].into()))
                .await
                .unwrap();
            ws.send(Message::Ping(Vec::<u8>::new().into())).await.unwrap();

            let mut received = Vec::new();
            while let Some(Ok(frame)) = ws.next().await {
                if let Message::Text(text) = frame {
                    received.push(text.as_str().to_owned());
                    break;
                }
            }

            let _ = ws.close(None).await;
            received
        });

        let mut link = WsTransport.open(&format!("ws://{}", addr)).await.unwrap();
        link.outbound.send("from client".to_string()).await.unwrap();

        let mut got = Vec::new();
        loop {
            let next = tokio::time::timeout(Duration::from_secs(2), link.inbound.recv())
                .await
                .expect("inbound channel never closed");
            match next {
                Some(text) => got.push(text),
                None => break,
            }
        }

        assert_eq!(got, vec!["hello".to_string(), "h\u{FFFD}i".to_string()]);
        assert_eq!(server.await.unwrap(), vec!["from client".to_string()]);
    }

    #[tokio::test]
    async fn test_websocket_refused_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = WsTransport.open(&format!("ws://{}", addr)).await;
        assert!(matches!(result, Err(crate::error::ClawsError::Transport(_))));
    }
}
