/// Conversion worker bridge
///
/// This module owns the message channel between the UI and the background
/// worker that runs the portrait conversion. The UI sends raw image bytes;
/// the worker answers with exactly one tagged reply per request.

use iced::futures::channel::mpsc;
use iced::futures::{SinkExt, Stream, StreamExt};
use iced::stream;

use crate::convert;

/// Outcome of one conversion request
#[derive(Debug, Clone)]
pub enum Reply {
    /// PNG-encoded portrait bytes
    Result(Vec<u8>),
    /// Human-readable description of the failure
    Error(String),
}

/// Events the worker emits to the UI
#[derive(Debug, Clone)]
pub enum Event {
    /// The worker has started and accepts requests
    Ready(Connection),
    /// One request finished, successfully or not
    Finished(Reply),
}

/// Sender half of the request channel, held by the UI
#[derive(Debug, Clone)]
pub struct Connection(mpsc::Sender<Vec<u8>>);

impl Connection {
    /// Hand one image buffer to the worker. Fire-and-forget: the reply
    /// arrives later as an [`Event::Finished`].
    pub fn send(&mut self, bytes: Vec<u8>) {
        if let Err(e) = self.0.try_send(bytes) {
            eprintln!("❌ Could not send image to converter: {}", e);
        }
    }
}

/// Create a request channel. The UI keeps the [`Connection`], the worker
/// loop consumes the receiver.
pub fn connection_pair(capacity: usize) -> (Connection, mpsc::Receiver<Vec<u8>>) {
    let (sender, receiver) = mpsc::channel(capacity);
    (Connection(sender), receiver)
}

/// A conversion function the worker loop can be built around.
/// Production uses [`convert::portrait`]; tests substitute fakes.
pub type Converter = fn(Vec<u8>) -> Result<Vec<u8>, String>;

/// Start the conversion worker. Subscribed once at startup; the stream
/// lives for the rest of the session.
pub fn start() -> impl Stream<Item = Event> {
    stream::channel(8, |mut output| async move {
        // The protocol carries at most one outstanding request
        let (connection, requests) = connection_pair(1);

        if let Ok(json) = convert::PortraitParams::default().to_json() {
            println!("🎛  Portrait parameters: {}", json);
        }

        let _ = output.send(Event::Ready(connection)).await;

        serve(run_portrait, requests, output).await;
    })
}

/// The production converter: portrait conversion with default parameters
fn run_portrait(bytes: Vec<u8>) -> Result<Vec<u8>, String> {
    convert::portrait(&bytes, &convert::PortraitParams::default()).map_err(|e| e.to_string())
}

/// Answer each request with exactly one reply. Conversion failures are
/// turned into [`Reply::Error`] so the loop survives to serve the next
/// request; only a closed channel ends it.
async fn serve(
    converter: Converter,
    mut requests: mpsc::Receiver<Vec<u8>>,
    mut output: mpsc::Sender<Event>,
) {
    while let Some(bytes) = requests.next().await {
        // Spawn blocking because the conversion is CPU-intensive
        let reply = match tokio::task::spawn_blocking(move || converter(bytes)).await {
            Ok(Ok(converted)) => Reply::Result(converted),
            Ok(Err(detail)) => Reply::Error(detail),
            Err(e) => Reply::Error(format!("Task join error: {}", e)),
        };

        if output.send(Event::Finished(reply)).await.is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start_serve(converter: Converter) -> (Connection, mpsc::Receiver<Event>) {
        let (connection, requests) = connection_pair(1);
        let (events, incoming) = mpsc::channel(8);
        tokio::spawn(serve(converter, requests, events));
        (connection, incoming)
    }

    #[tokio::test]
    async fn test_successful_conversion_replies_with_result() {
        let (mut connection, mut events) = start_serve(|bytes| Ok(bytes));

        connection.send(b"some image".to_vec());

        match events.next().await {
            Some(Event::Finished(Reply::Result(bytes))) => {
                assert_eq!(bytes, b"some image".to_vec());
            }
            other => panic!("expected a result reply, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_conversion_replies_with_error() {
        let (mut connection, mut events) =
            start_serve(|_| Err("bad header".to_string()));

        connection.send(b"not an image".to_vec());

        match events.next().await {
            Some(Event::Finished(Reply::Error(detail))) => {
                assert_eq!(detail, "bad header");
            }
            other => panic!("expected an error reply, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_one_reply_per_request_in_order() {
        let (mut connection, mut events) = start_serve(|bytes| Ok(bytes));

        connection.send(b"first".to_vec());
        match events.next().await {
            Some(Event::Finished(Reply::Result(bytes))) => assert_eq!(bytes, b"first".to_vec()),
            other => panic!("expected a result reply, got {:?}", other),
        }

        connection.send(b"second".to_vec());
        match events.next().await {
            Some(Event::Finished(Reply::Result(bytes))) => assert_eq!(bytes, b"second".to_vec()),
            other => panic!("expected a result reply, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_worker_survives_a_panicking_converter() {
        fn panicking(bytes: Vec<u8>) -> Result<Vec<u8>, String> {
            if bytes == b"boom".to_vec() {
                panic!("converter blew up");
            }
            Ok(bytes)
        }

        let (mut connection, mut events) = start_serve(panicking);

        connection.send(b"boom".to_vec());
        match events.next().await {
            Some(Event::Finished(Reply::Error(_))) => {}
            other => panic!("expected an error reply, got {:?}", other),
        }

        // The loop must still service the next request
        connection.send(b"fine".to_vec());
        match events.next().await {
            Some(Event::Finished(Reply::Result(bytes))) => assert_eq!(bytes, b"fine".to_vec()),
            other => panic!("expected a result reply, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_serve_ends_when_requests_close() {
        let (connection, mut events) = start_serve(|bytes| Ok(bytes));

        drop(connection);

        assert!(events.next().await.is_none());
    }
}
