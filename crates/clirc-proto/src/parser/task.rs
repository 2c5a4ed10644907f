//! Tokio task driving the state machine between bounded queues.

use bytes::Bytes;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, trace, warn};

use crate::error::{ParseError, StreamError};
use crate::message::Message;

use super::machine::{Machine, Step};

/// The parser task.
///
/// Consumes byte chunks from a bounded input queue, drives the state
/// machine as far as the buffered input allows, and publishes every
/// outcome on the message or error queue, in the order the terminating
/// line feeds appear in the input stream.
///
/// The task suspends in exactly three places: awaiting the next chunk,
/// awaiting space on the message queue, and awaiting space on the error
/// queue. Each suspension also observes the cancellation signal.
///
/// # Example
///
/// ```no_run
/// use bytes::Bytes;
/// use clirc_proto::Parser;
/// use tokio::sync::{broadcast, mpsc};
///
/// #[tokio::main]
/// async fn main() {
///     let (chunk_tx, chunk_rx) = mpsc::channel::<Bytes>(16);
///     let (msg_tx, mut msg_rx) = mpsc::channel(16);
///     let (err_tx, mut err_rx) = mpsc::channel(16);
///     let (cancel_tx, cancel_rx) = broadcast::channel(1);
///
///     tokio::spawn(Parser::new(chunk_rx, msg_tx, err_tx).run(cancel_rx));
///
///     chunk_tx.send(Bytes::from_static(b"PING :srv\r\n")).await.unwrap();
///     let msg = msg_rx.recv().await.unwrap();
///     assert_eq!(msg.command, "PING");
///     drop(cancel_tx);
///     let _ = err_rx.recv().await;
/// }
/// ```
pub struct Parser {
    machine: Machine,
    input: mpsc::Receiver<Bytes>,
    messages: mpsc::Sender<Message>,
    errors: mpsc::Sender<ParseError>,
}

impl Parser {
    /// Wire a parser to its input source and output sinks.
    pub fn new(
        input: mpsc::Receiver<Bytes>,
        messages: mpsc::Sender<Message>,
        errors: mpsc::Sender<ParseError>,
    ) -> Self {
        Parser {
            machine: Machine::new(),
            input,
            messages,
            errors,
        }
    }

    /// Run until the input closes or the cancellation signal fires.
    ///
    /// Any `recv` completion on the cancellation channel, including the
    /// sender being dropped, stops the parser; a partially accumulated
    /// message is dropped silently. Closing the input channel at a line
    /// boundary ends the run cleanly; closing it mid-line is a structural
    /// fault and returns [`StreamError::TruncatedInput`] without emitting
    /// a parse error (there is no complete line to attribute one to).
    pub async fn run(mut self, mut cancel: broadcast::Receiver<()>) -> Result<(), StreamError> {
        loop {
            match self.machine.step() {
                Step::Message(msg) => {
                    trace!(message = %msg, "line parsed");
                    tokio::select! {
                        biased;
                        _ = cancel.recv() => return Ok(()),
                        sent = self.messages.send(msg) => {
                            if sent.is_err() {
                                return Err(StreamError::MessageSinkClosed);
                            }
                        }
                    }
                }
                Step::Error(err) => {
                    debug!(reason = %err.reason, "malformed line, resynchronised");
                    tokio::select! {
                        biased;
                        _ = cancel.recv() => return Ok(()),
                        sent = self.errors.send(err) => {
                            if sent.is_err() {
                                return Err(StreamError::ErrorSinkClosed);
                            }
                        }
                    }
                }
                Step::NeedInput => {
                    tokio::select! {
                        biased;
                        _ = cancel.recv() => return Ok(()),
                        chunk = self.input.recv() => match chunk {
                            Some(chunk) => self.machine.feed(&chunk),
                            None => {
                                if self.machine.has_partial_input() {
                                    warn!("input stream closed in the middle of a message");
                                    return Err(StreamError::TruncatedInput);
                                }
                                return Ok(());
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Harness {
        chunks: mpsc::Sender<Bytes>,
        messages: mpsc::Receiver<Message>,
        errors: mpsc::Receiver<ParseError>,
        cancel: broadcast::Sender<()>,
        parser: tokio::task::JoinHandle<Result<(), StreamError>>,
    }

    fn spawn_parser(capacity: usize) -> Harness {
        let (chunk_tx, chunk_rx) = mpsc::channel(capacity);
        let (msg_tx, msg_rx) = mpsc::channel(capacity);
        let (err_tx, err_rx) = mpsc::channel(capacity);
        let (cancel_tx, cancel_rx) = broadcast::channel(1);
        let parser = tokio::spawn(Parser::new(chunk_rx, msg_tx, err_tx).run(cancel_rx));
        Harness {
            chunks: chunk_tx,
            messages: msg_rx,
            errors: err_rx,
            cancel: cancel_tx,
            parser,
        }
    }

    #[tokio::test]
    async fn test_clean_shutdown_at_line_boundary() {
        let mut h = spawn_parser(8);
        h.chunks.send(Bytes::from_static(b"PING\r\n")).await.unwrap();
        assert_eq!(h.messages.recv().await.unwrap().command, "PING");
        drop(h.chunks);
        assert!(h.parser.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_truncated_input_is_fatal() {
        let mut h = spawn_parser(8);
        h.chunks
            .send(Bytes::from_static(b"PRIVMSG #chan :cut off"))
            .await
            .unwrap();
        drop(h.chunks);
        assert!(matches!(
            h.parser.await.unwrap(),
            Err(StreamError::TruncatedInput)
        ));
        // no parse error is attributable to the unfinished line
        assert!(h.errors.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_cancellation_drops_partial_message() {
        let mut h = spawn_parser(8);
        h.chunks
            .send(Bytes::from_static(b"PRIVMSG #chan :never finished"))
            .await
            .unwrap();
        h.cancel.send(()).unwrap();
        assert!(h.parser.await.unwrap().is_ok());
        assert!(h.messages.recv().await.is_none());
    }
}
