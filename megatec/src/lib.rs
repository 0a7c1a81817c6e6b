//! Megatec Q1 protocol for USB HID UPS devices.
//!
//! A status poll is two steps: [`FrameAssembler::exchange`] sends the
//! [`Command::STATUS_QUERY`] and assembles the NUL-terminated response
//! from one or more HID reports, then [`UpsStatus::parse`] decodes the
//! response into a telemetry record. Both steps either fully succeed or
//! fail with a typed error; no partial record is ever produced.

pub mod error;
pub mod frame;
pub mod mock;
pub mod status;
pub mod transport;

pub use error::{Error, ParseError, ProtocolError, Result, TransportError};
pub use frame::{Command, FrameAssembler};
pub use status::UpsStatus;
pub use transport::{HidSession, HidTransport, Transport};
