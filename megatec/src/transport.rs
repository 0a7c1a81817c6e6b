//! HID transport for the UPS.
//!
//! The protocol core only needs three things from the device: a way to
//! write a command, a way to read a chunk with a timeout, and a scoped
//! open/close. [`Transport`] captures the first two so the framing and
//! parsing layers can be exercised without hardware; [`HidSession`] and
//! [`HidTransport`] provide the hidapi-backed implementation.

use std::time::Duration;

use hidapi::{HidApi, HidDevice};
use log::{debug, trace};

use crate::error::TransportError;

/// One read/write endpoint to the UPS.
///
/// `read_timeout` returns `Ok(0)` when the timeout elapsed with no data
/// (hidapi's convention); hard I/O failures are `Err(ReadFailed)`.
pub trait Transport {
    fn write(&mut self, data: &[u8]) -> Result<usize, TransportError>;

    fn read_timeout(
        &mut self,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, TransportError>;
}

/// Process-wide HID library scope.
///
/// The underlying library requires a process-level init/exit pair
/// around all device operations; `HidApi` carries that pair as an RAII
/// value, so holding a `HidSession` for the duration of the polling
/// session guarantees teardown on every exit path.
pub struct HidSession {
    api: HidApi,
}

impl HidSession {
    pub fn new() -> Result<Self, TransportError> {
        let api = HidApi::new().map_err(|err| TransportError::OpenFailed {
            vendor_id: 0,
            product_id: 0,
            message: err.to_string(),
        })?;
        Ok(Self { api })
    }

    /// Open the UPS by vendor/product id. Fails if no matching device
    /// is present.
    pub fn open(&self, vendor_id: u16, product_id: u16) -> Result<HidTransport, TransportError> {
        let device =
            self.api
                .open(vendor_id, product_id)
                .map_err(|err| TransportError::OpenFailed {
                    vendor_id,
                    product_id,
                    message: err.to_string(),
                })?;
        debug!("opened UPS device {:04x}:{:04x}", vendor_id, product_id);
        Ok(HidTransport { device })
    }
}

/// An open HID device. Closed when dropped.
pub struct HidTransport {
    device: HidDevice,
}

impl Transport for HidTransport {
    fn write(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        trace!("writing {} bytes to UPS", data.len());
        self.device
            .write(data)
            .map_err(|err| TransportError::WriteFailed {
                written: 0,
                expected: data.len(),
                message: err.to_string(),
            })
    }

    fn read_timeout(
        &mut self,
        buf: &mut [u8],
        timeout: Duration,
    ) -> Result<usize, TransportError> {
        let millis = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);
        let read = self
            .device
            .read_timeout(buf, millis)
            .map_err(|err| TransportError::ReadFailed {
                message: err.to_string(),
            })?;
        trace!("read {} bytes from UPS", read);
        Ok(read)
    }
}
