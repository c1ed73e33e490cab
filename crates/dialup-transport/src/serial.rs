//! Serial port transport for the modem line.
//!
//! [`SerialTransport`] implements the [`Transport`] trait over a real
//! serial port. The modem engine switches the transport between blocking
//! reads (waiting for command input) and polling reads (online mode,
//! where escape timing needs a steady cadence); both modes are handled
//! here via [`Transport::set_timeout`].

use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_serial::{SerialPort, SerialPortBuilderExt, SerialStream};
use tracing::{debug, info, trace};

use dialup_core::{Error, Result, Transport};

use crate::settings::SerialSettings;

/// A serial line carrying the AT command conversation.
pub struct SerialTransport {
    port: SerialStream,
    /// Port path, for logging.
    name: String,
    /// Current read mode; see [`Transport::set_timeout`].
    timeout: Option<Duration>,
}

impl SerialTransport {
    /// Open the serial port described by `settings` (no parity, no flow
    /// control, as modem lines are wired).
    pub async fn open(settings: &SerialSettings) -> Result<Self> {
        debug!(
            port = %settings.port,
            baudrate = settings.baudrate,
            stopbits = settings.stopbits,
            "opening serial port"
        );

        let port = tokio_serial::new(&settings.port, settings.baudrate)
            .data_bits(tokio_serial::DataBits::Eight)
            .stop_bits(settings.stop_bits())
            .parity(tokio_serial::Parity::None)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| Error::Transport(format!("cannot open {}: {e}", settings.port)))?;

        info!(port = %settings.port, baudrate = settings.baudrate, "serial port opened");

        Ok(SerialTransport {
            port,
            name: settings.port.clone(),
            timeout: None,
        })
    }

    /// The path of the underlying port.
    pub fn port_name(&self) -> &str {
        &self.name
    }

    async fn read_some(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.port
            .read(buf)
            .await
            .map_err(|e| Error::Transport(format!("read from {}: {e}", self.name)))
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn read(&mut self, max_len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; max_len];
        let n = match self.timeout {
            // Blocking mode: wait until at least one byte arrives.
            None => self.read_some(&mut buf).await?,
            // Polling mode: return immediately, empty if the line is idle.
            Some(Duration::ZERO) => {
                if self.bytes_available()? == 0 {
                    0
                } else {
                    self.read_some(&mut buf).await?
                }
            }
            // Bounded wait: empty result on timeout.
            Some(limit) => match tokio::time::timeout(limit, self.port.read(&mut buf)).await {
                Ok(result) => result
                    .map_err(|e| Error::Transport(format!("read from {}: {e}", self.name)))?,
                Err(_) => 0,
            },
        };
        buf.truncate(n);
        if !buf.is_empty() {
            trace!(port = %self.name, bytes = buf.len(), "read");
        }
        Ok(buf)
    }

    fn bytes_available(&self) -> Result<usize> {
        let n = self
            .port
            .bytes_to_read()
            .map_err(|e| Error::Transport(format!("bytes_to_read on {}: {e}", self.name)))?;
        Ok(n as usize)
    }

    async fn write(&mut self, data: &[u8]) -> Result<()> {
        trace!(port = %self.name, bytes = data.len(), "write");
        self.port
            .write_all(data)
            .await
            .map_err(|e| Error::Transport(format!("write to {}: {e}", self.name)))?;
        self.port
            .flush()
            .await
            .map_err(|e| Error::Transport(format!("flush {}: {e}", self.name)))
    }

    fn set_timeout(&mut self, timeout: Option<Duration>) {
        trace!(port = %self.name, ?timeout, "timeout mode changed");
        self.timeout = timeout;
    }
}
