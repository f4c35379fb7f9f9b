use crate::transcript::{Category, Transcript};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Forward every inbound message to the transcript as a server entry, in
/// receive order, until the transport closes the channel.
///
/// The handle resolves with the number of messages forwarded.
pub fn spawn_reader(mut inbound: mpsc::Receiver<String>, transcript: Transcript) -> JoinHandle<usize> {
    tokio::spawn(async move {
        let mut forwarded = 0;
        while let Some(message) = inbound.recv().await {
            if let Err(e) = transcript.append_throttled(Category::Server, message).await {
                tracing::debug!("Reader stopped early: {}", e);
                break;
            }
            forwarded += 1;
        }
        tracing::debug!("Reader finished after {} messages", forwarded);
        forwarded
    })
}
