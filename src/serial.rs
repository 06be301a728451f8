// 🔌 Serial commands for an attached device (coin dispenser etc.)
// Line-framed text; the port itself is any io::Write

use std::io::Write;

use crate::error::SerialError;

/// Baud rate the device firmware expects
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Frame terminator
pub const LINE_END: &str = "\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerialCommand {
    /// Select the machine model: `CONFIG:<model>`
    Configure { model: String },
    /// Free text typed by the operator
    Raw(String),
}

impl SerialCommand {
    /// Encode as one line-terminated frame
    pub fn encode(&self) -> Result<String, SerialError> {
        let body = match self {
            SerialCommand::Configure { model } => {
                let model = model.trim();
                if model.is_empty() {
                    return Err(SerialError::InvalidCommand("empty model".to_string()));
                }
                format!("CONFIG:{}", model)
            }
            SerialCommand::Raw(text) => {
                if text.is_empty() {
                    return Err(SerialError::InvalidCommand("empty command".to_string()));
                }
                text.clone()
            }
        };

        if body.contains(['\n', '\r']) {
            return Err(SerialError::InvalidCommand(format!(
                "line break inside frame: {:?}",
                body
            )));
        }

        Ok(format!("{}{}", body, LINE_END))
    }
}

/// SerialTransport - Sends frames to the device
pub trait SerialTransport {
    fn send(&mut self, command: &SerialCommand) -> Result<(), SerialError>;
}

/// Writes frames to any writer (an opened device node, a socket, a buffer)
pub struct LineTransport<W: Write> {
    writer: W,
    frames_sent: usize,
}

impl<W: Write> LineTransport<W> {
    pub fn new(writer: W) -> Self {
        LineTransport {
            writer,
            frames_sent: 0,
        }
    }

    pub fn frames_sent(&self) -> usize {
        self.frames_sent
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SerialTransport for LineTransport<W> {
    fn send(&mut self, command: &SerialCommand) -> Result<(), SerialError> {
        let frame = command.encode()?;
        self.writer.write_all(frame.as_bytes())?;
        self.writer.flush()?;
        self.frames_sent += 1;

        tracing::info!(frame = frame.trim_end(), "serial frame sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_frames() {
        let config = SerialCommand::Configure {
            model: "MX-200".to_string(),
        };
        assert_eq!(config.encode().unwrap(), "CONFIG:MX-200\n");
        assert_eq!(
            SerialCommand::Raw("DISPENSE 250".to_string()).encode().unwrap(),
            "DISPENSE 250\n"
        );
    }

    #[test]
    fn test_reject_bad_frames() {
        assert!(SerialCommand::Raw(String::new()).encode().is_err());
        assert!(SerialCommand::Raw("a\nb".to_string()).encode().is_err());
        assert!(SerialCommand::Configure {
            model: "  ".to_string()
        }
        .encode()
        .is_err());
    }

    #[test]
    fn test_line_transport_writes_frames() {
        let mut transport = LineTransport::new(Vec::new());
        transport
            .send(&SerialCommand::Configure {
                model: "A".to_string(),
            })
            .unwrap();
        transport.send(&SerialCommand::Raw("PING".to_string())).unwrap();

        assert_eq!(transport.frames_sent(), 2);
        assert_eq!(transport.into_inner(), b"CONFIG:A\nPING\n".to_vec());
    }

    #[test]
    fn test_failed_encode_writes_nothing() {
        let mut transport = LineTransport::new(Vec::new());
        assert!(transport.send(&SerialCommand::Raw(String::new())).is_err());
        assert_eq!(transport.frames_sent(), 0);
        assert!(transport.into_inner().is_empty());
    }
}
