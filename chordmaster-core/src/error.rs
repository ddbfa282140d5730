//! Conditions that keep a round from starting.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The MIDI subsystem is missing or access was denied.
    TransportUnavailable(String),
    /// The transport works but no input port is connected.
    NoDevicesConnected,
    /// The requested port index is not in the current port list.
    InvalidPort { index: usize, available: usize },
    /// The driver refused to open the port.
    Connection(String),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransportUnavailable(reason) => write!(f, "MIDI unavailable: {}", reason),
            Self::NoDevicesConnected => write!(f, "no MIDI input device connected"),
            Self::InvalidPort { index, available } => write!(
                f,
                "invalid MIDI port index {} ({} available)",
                index, available
            ),
            Self::Connection(reason) => write!(f, "MIDI connection failed: {}", reason),
        }
    }
}

impl std::error::Error for GameError {}

/// What the input transport can currently deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportStatus {
    Unavailable(String),
    NoDevices,
    Connected { port: String },
}

impl TransportStatus {
    /// `Ok` only when a device is connected and rounds may start.
    pub fn ready(&self) -> Result<(), GameError> {
        match self {
            Self::Unavailable(reason) => Err(GameError::TransportUnavailable(reason.clone())),
            Self::NoDevices => Err(GameError::NoDevicesConnected),
            Self::Connected { .. } => Ok(()),
        }
    }
}
