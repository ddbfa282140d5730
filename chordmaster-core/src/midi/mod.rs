//! MIDI input transport: port discovery, connection, and note parsing.
//!
//! All channels of the connected port are merged into one note stream.
//! Events are delivered in the order the driver produced them, each stamped
//! with the instant the driver callback received it.

use midir::{MidiInput, MidiInputConnection};
use std::sync::mpsc::{self, Receiver};
use std::time::Instant;

use chordmaster_types::NoteEvent;

use crate::error::{GameError, TransportStatus};

const CLIENT_NAME: &str = "chordmaster";

/// Information about an available MIDI port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiPortInfo {
    pub index: usize,
    pub name: String,
}

/// A note event plus the instant it arrived from the driver. Scoring uses
/// `received`, not the time the event loop got around to draining it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedNote {
    pub event: NoteEvent,
    pub received: Instant,
}

/// MIDI input manager
pub struct MidiInputManager {
    midi_in: Option<MidiInput>,
    init_error: Option<String>,
    connection: Option<MidiInputConnection<()>>,
    event_receiver: Option<Receiver<TimedNote>>,
    connected_port_name: Option<String>,
    available_ports: Vec<MidiPortInfo>,
}

impl MidiInputManager {
    pub fn new() -> Self {
        let (midi_in, init_error) = match MidiInput::new(CLIENT_NAME) {
            Ok(midi_in) => (Some(midi_in), None),
            Err(e) => {
                log::warn!("MIDI input unavailable: {}", e);
                (None, Some(e.to_string()))
            }
        };
        Self {
            midi_in,
            init_error,
            connection: None,
            event_receiver: None,
            connected_port_name: None,
            available_ports: Vec::new(),
        }
    }

    /// Refresh the list of available MIDI input ports
    pub fn refresh_ports(&mut self) {
        self.available_ports.clear();

        if let Some(ref midi_in) = self.midi_in {
            let ports = midi_in.ports();
            for (index, port) in ports.iter().enumerate() {
                if let Ok(name) = midi_in.port_name(port) {
                    self.available_ports.push(MidiPortInfo { index, name });
                }
            }
        }
    }

    /// Get list of available MIDI input ports
    pub fn list_ports(&self) -> &[MidiPortInfo] {
        &self.available_ports
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn connected_port_name(&self) -> Option<&str> {
        self.connected_port_name.as_deref()
    }

    /// Whether rounds can start, and why not.
    pub fn status(&self) -> TransportStatus {
        if let Some(ref reason) = self.init_error {
            return TransportStatus::Unavailable(reason.clone());
        }
        match self.connected_port_name {
            Some(ref port) if self.connection.is_some() => {
                TransportStatus::Connected { port: port.clone() }
            }
            _ => TransportStatus::NoDevices,
        }
    }

    /// Connect to a MIDI input port by index
    pub fn connect(&mut self, port_index: usize) -> Result<(), GameError> {
        self.disconnect();

        // midir consumes the MidiInput on connect, so open a fresh one
        let midi_in = MidiInput::new(CLIENT_NAME)
            .map_err(|e| GameError::TransportUnavailable(e.to_string()))?;
        let ports = midi_in.ports();

        if ports.is_empty() {
            return Err(GameError::NoDevicesConnected);
        }
        let port = ports.get(port_index).ok_or(GameError::InvalidPort {
            index: port_index,
            available: ports.len(),
        })?;
        let port_name = midi_in
            .port_name(port)
            .unwrap_or_else(|_| "Unknown".to_string());

        let (tx, rx) = mpsc::channel();
        self.event_receiver = Some(rx);

        let connection = midi_in
            .connect(
                port,
                "chordmaster-input",
                move |_timestamp, message, _| {
                    if let Some(note) = stamp_midi_message(message, Instant::now()) {
                        let _ = tx.send(note);
                    }
                },
                (),
            )
            .map_err(|e| GameError::Connection(e.to_string()))?;

        log::info!("connected to MIDI input {:?}", port_name);
        self.connection = Some(connection);
        self.connected_port_name = Some(port_name);
        self.init_error = None;

        // Recreate MidiInput for future port listing
        self.midi_in = MidiInput::new(CLIENT_NAME).ok();

        Ok(())
    }

    /// Disconnect from the current MIDI input port
    pub fn disconnect(&mut self) {
        if let Some(conn) = self.connection.take() {
            conn.close();
            log::info!(
                "disconnected from MIDI input {:?}",
                self.connected_port_name.as_deref().unwrap_or("?")
            );
        }
        self.event_receiver = None;
        self.connected_port_name = None;
    }

    /// Drain pending note events (non-blocking), oldest first.
    pub fn poll_events(&self) -> Vec<TimedNote> {
        let mut events = Vec::new();
        if let Some(ref rx) = self.event_receiver {
            while let Ok(event) = rx.try_recv() {
                events.push(event);
            }
        }
        events
    }
}

impl Default for MidiInputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MidiInputManager {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Parse `data` and stamp the result with its arrival time.
pub fn stamp_midi_message(data: &[u8], received: Instant) -> Option<TimedNote> {
    parse_midi_message(data).map(|event| TimedNote { event, received })
}

/// Parse a raw MIDI message into a note event.
///
/// Note-on with velocity 0 counts as note-off. Other messages, and messages
/// with data bytes outside 0..=127, are ignored.
pub fn parse_midi_message(data: &[u8]) -> Option<NoteEvent> {
    let (&status, rest) = data.split_first()?;
    let &[note, velocity, ..] = rest else {
        return None;
    };
    if note > 0x7F || velocity > 0x7F {
        return None;
    }

    match status & 0xF0 {
        0x80 => Some(NoteEvent::off(note)),
        0x90 if velocity == 0 => Some(NoteEvent::off(note)),
        0x90 => Some(NoteEvent::on(note)),
        _ => None,
    }
}
