//! Standard output channel.

use std::io::{self, Write};
use std::sync::Mutex;

use async_trait::async_trait;

use super::NotificationChannel;
use crate::Result;
use crate::notification::message::AlertMessage;

/// Writes the alert body to standard output. Always enabled.
///
/// Write failures (closed pipe, full disk) are returned as [`crate::Error::Io`]
/// instead of panicking.
pub struct ConsoleChannel {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleChannel {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Write to `writer` instead of standard output.
    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    /// Write one line and flush it.
    pub fn write_line(&self, line: &str) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| crate::Error::Other("console writer lock poisoned".to_string()))?;
        writeln!(writer, "{line}")?;
        writer.flush()?;
        Ok(())
    }
}

impl Default for ConsoleChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConsoleChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleChannel").finish_non_exhaustive()
    }
}

#[async_trait]
impl NotificationChannel for ConsoleChannel {
    fn channel_type(&self) -> &'static str {
        "console"
    }

    fn is_enabled(&self) -> bool {
        true
    }

    async fn send(&self, message: &AlertMessage) -> Result<()> {
        self.write_line(&message.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    /// Collects everything written to it.
    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Behaves like stdout redirected to a full device.
    struct FullDevice;

    impl Write for FullDevice {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from_raw_os_error(28))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_console_always_enabled() {
        let channel = ConsoleChannel::new();
        assert!(channel.is_enabled());
        assert_eq!(channel.channel_type(), "console");
    }

    #[tokio::test]
    async fn test_send_writes_body_line() {
        let buffer = SharedBuffer::default();
        let channel = ConsoleChannel::with_writer(buffer.clone());
        let message = AlertMessage::failure(chrono::Local::now(), "https://example.com", 1, 500);

        channel.send(&message).await.unwrap();

        let written = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert_eq!(written, format!("{}\n", message.body));
    }

    #[tokio::test]
    async fn test_write_failure_is_reported_and_swallowed() {
        let channel = ConsoleChannel::with_writer(FullDevice);
        let message = AlertMessage::test(chrono::Local::now());

        let err = channel.send(&message).await.unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));

        channel.deliver(&message).await;
    }
}
