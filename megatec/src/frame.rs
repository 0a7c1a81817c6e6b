//! Request/response framing for the Q1 status query.
//!
//! The UPS does not declare a response length up front. A response
//! arrives as a series of HID reports; end-of-message is inferred from
//! a trailing NUL byte. That is a heuristic, not a guaranteed framing
//! boundary: a report boundary could in principle place a NUL
//! mid-message on some protocol variant. The behavior matches the
//! devices this was written against; see the repository design notes
//! before changing it.

use std::thread::sleep;
use std::time::Duration;

use log::{debug, trace};

use crate::error::{Error, ProtocolError, TransportError};
use crate::transport::Transport;

/// End-of-message sentinel.
const TERMINATOR: u8 = 0x00;

/// HID report payload size requested per read.
const CHUNK_SIZE: usize = 64;

const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_SETTLE: Duration = Duration::from_secs(1);
const DEFAULT_MAX_TOTAL_BYTES: usize = 1024;

/// A fixed command payload, sent to the device verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command(&'static [u8]);

impl Command {
    /// The Q1 status query: "Q1" followed by a carriage return.
    pub const STATUS_QUERY: Command = Command(&[0x51, 0x31, 0x0D]);

    pub fn bytes(&self) -> &'static [u8] {
        self.0
    }
}

/// Performs one request/response exchange and returns the complete,
/// terminator-delimited message.
#[derive(Debug, Clone, Copy)]
pub struct FrameAssembler {
    /// Timeout applied to each individual read.
    pub read_timeout: Duration,
    /// Delay between the command write and the first read, giving the
    /// UPS time to prepare its response.
    pub settle: Duration,
    /// Cap on the assembled message length.
    pub max_total_bytes: usize,
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self {
            read_timeout: DEFAULT_READ_TIMEOUT,
            settle: DEFAULT_SETTLE,
            max_total_bytes: DEFAULT_MAX_TOTAL_BYTES,
        }
    }
}

impl FrameAssembler {
    /// Write `command` once and accumulate reads until a chunk leaves
    /// the message ending in the NUL terminator.
    ///
    /// The terminator is left in the returned message; stripping it is
    /// the parser's concern. No retries are performed: any timeout,
    /// read failure, or overflow ends the exchange.
    pub fn exchange<T: Transport>(
        &self,
        transport: &mut T,
        command: Command,
    ) -> Result<Vec<u8>, Error> {
        let payload = command.bytes();
        let written = transport.write(payload)?;
        if written < payload.len() {
            return Err(TransportError::WriteFailed {
                written,
                expected: payload.len(),
                message: "short write".to_string(),
            }
            .into());
        }
        trace!("command sent ({} bytes)", written);

        if !self.settle.is_zero() {
            sleep(self.settle);
        }

        let mut message = Vec::new();
        let mut chunk = [0u8; CHUNK_SIZE];
        loop {
            let read = transport.read_timeout(&mut chunk, self.read_timeout)?;
            if read == 0 {
                return Err(TransportError::ReadTimeout {
                    timeout_ms: self.read_timeout.as_millis() as u64,
                }
                .into());
            }
            if message.len() + read > self.max_total_bytes {
                return Err(ProtocolError::BufferOverflow {
                    max_total_bytes: self.max_total_bytes,
                }
                .into());
            }
            message.extend_from_slice(&chunk[..read]);
            if message.last() == Some(&TERMINATOR) {
                break;
            }
        }

        debug!("assembled {} byte response", message.len());
        Ok(message)
    }
}
