//! Scriptable transport for exercising the protocol without hardware.

use std::collections::VecDeque;
use std::time::Duration;

use crate::error::TransportError;
use crate::transport::Transport;

enum ReadStep {
    Data(Vec<u8>),
    Timeout,
    Error(String),
}

/// A [`Transport`] that replays a scripted sequence of read outcomes
/// and records every write. Once the script is exhausted, further
/// reads behave as timeouts.
#[derive(Default)]
pub struct MockTransport {
    reads: VecDeque<ReadStep>,
    written: Vec<Vec<u8>>,
    short_write: bool,
    fail_write: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a chunk to be returned by the next unanswered read.
    pub fn chunk(mut self, data: &[u8]) -> Self {
        self.reads.push_back(ReadStep::Data(data.to_vec()));
        self
    }

    /// Queue a read that elapses without data.
    pub fn timeout(mut self) -> Self {
        self.reads.push_back(ReadStep::Timeout);
        self
    }

    /// Queue a hard read failure.
    pub fn error(mut self, message: &str) -> Self {
        self.reads.push_back(ReadStep::Error(message.to_string()));
        self
    }

    /// Make every write report one byte fewer than requested.
    pub fn short_write(mut self) -> Self {
        self.short_write = true;
        self
    }

    /// Make every write fail outright.
    pub fn fail_write(mut self) -> Self {
        self.fail_write = true;
        self
    }

    /// Every payload written so far, in order.
    pub fn written(&self) -> &[Vec<u8>] {
        &self.written
    }
}

impl Transport for MockTransport {
    fn write(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        if self.fail_write {
            return Err(TransportError::WriteFailed {
                written: 0,
                expected: data.len(),
                message: "scripted write failure".to_string(),
            });
        }
        self.written.push(data.to_vec());
        if self.short_write {
            Ok(data.len().saturating_sub(1))
        } else {
            Ok(data.len())
        }
    }

    fn read_timeout(
        &mut self,
        buf: &mut [u8],
        _timeout: Duration,
    ) -> Result<usize, TransportError> {
        match self.reads.pop_front() {
            Some(ReadStep::Data(data)) => {
                assert!(
                    data.len() <= buf.len(),
                    "scripted chunk larger than the read buffer"
                );
                buf[..data.len()].copy_from_slice(&data);
                Ok(data.len())
            }
            Some(ReadStep::Timeout) | None => Ok(0),
            Some(ReadStep::Error(message)) => Err(TransportError::ReadFailed { message }),
        }
    }
}
