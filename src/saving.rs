use bincode::{deserialize_from, serialize_into};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::{Deserialize, Serialize};
use std::fs::File;

use crate::engine::{AngleMode, Calculator};
use crate::history::{HISTORY_LIMIT, History, HistoryEntry};

/// The session fields that outlive a single calculation: the calculation
/// history, the (host-owned) dark-mode flag, the memory register and the
/// angle mode. Everything else in the calculator is transient.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct SessionState {
    pub history: Vec<HistoryEntry>,
    pub dark_mode: bool,
    pub memory: f64,
    pub degrees: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState {
            history: Vec::new(),
            dark_mode: false,
            memory: 0.0,
            degrees: true,
        }
    }
}

impl SessionState {
    pub fn capture(calculator: &Calculator, dark_mode: bool) -> Self {
        SessionState {
            history: calculator.history.entries().to_vec(),
            dark_mode,
            memory: calculator.memory,
            degrees: calculator.angle_mode == AngleMode::Degrees,
        }
    }

    pub fn restore(&self) -> Calculator {
        let angle_mode = if self.degrees {
            AngleMode::Degrees
        } else {
            AngleMode::Radians
        };
        Calculator::restore(
            self.memory,
            angle_mode,
            History::from_entries(self.history.clone()),
        )
    }
}

pub fn save_session(session: &SessionState, filename: &str) -> std::io::Result<()> {
    let file = File::create(filename)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut writer = std::io::BufWriter::new(encoder);

    serialize_into(&mut writer, session)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    Ok(())
}

pub fn load_session(filename: &str) -> std::io::Result<SessionState> {
    let file = File::open(filename)?;
    let decoder = GzDecoder::new(file);
    let mut reader = std::io::BufReader::new(decoder);

    let session: SessionState = deserialize_from(&mut reader)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    Ok(session)
}

/// Render the session in the original browser-storage layout: four
/// independent keys, with the memory register stored as a numeric string and
/// the angle mode as a `"true"`/`"false"` flag.
pub fn session_to_json(session: &SessionState) -> serde_json::Value {
    serde_json::json!({
        "history": session.history,
        "dark-mode": session.dark_mode,
        "memory": session.memory.to_string(),
        "angle-degrees": if session.degrees { "true" } else { "false" },
    })
}

/// Read a session back from the browser-storage layout. Missing or
/// malformed keys fall back to their defaults rather than failing the load.
pub fn session_from_json(value: &serde_json::Value) -> SessionState {
    let mut history = value
        .get("history")
        .and_then(|v| serde_json::from_value::<Vec<HistoryEntry>>(v.clone()).ok())
        .unwrap_or_default();
    history.truncate(HISTORY_LIMIT);

    let dark_mode = value
        .get("dark-mode")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    let memory = value
        .get("memory")
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);
    let degrees = value
        .get("angle-degrees")
        .and_then(|v| v.as_str())
        .map(|s| s == "true")
        .unwrap_or(true);

    SessionState {
        history,
        dark_mode,
        memory,
        degrees,
    }
}

pub fn export_session_json(session: &SessionState, filename: &str) -> std::io::Result<()> {
    let file = File::create(filename)?;
    let writer = std::io::BufWriter::new(file);

    serde_json::to_writer_pretty(writer, &session_to_json(session))
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    Ok(())
}

pub fn import_session_json(filename: &str) -> std::io::Result<SessionState> {
    let file = File::open(filename)?;
    let reader = std::io::BufReader::new(file);

    let value: serde_json::Value = serde_json::from_reader(reader)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    Ok(session_from_json(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{BinaryOp, Command, MemoryOp};

    fn sample_session() -> SessionState {
        let mut calculator = Calculator::create();
        for command in [
            Command::Digit('1'),
            Command::Operator(BinaryOp::Add),
            Command::Digit('2'),
            Command::Equals,
            Command::Memory(MemoryOp::Store),
        ] {
            calculator.apply(command).unwrap();
        }
        calculator.toggle_angle_mode();
        SessionState::capture(&calculator, true)
    }

    #[test]
    fn test_binary_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.bin.gz");
        let path = path.to_str().unwrap();

        let session = sample_session();
        save_session(&session, path).unwrap();
        let loaded = load_session(path).unwrap();

        assert_eq!(loaded, session);
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        assert!(load_session("/nonexistent/session.bin.gz").is_err());
    }

    #[test]
    fn test_json_layout_round_trip() {
        let session = sample_session();
        let value = session_to_json(&session);

        // Stored in the original key-value shape.
        assert_eq!(value["memory"], "3");
        assert_eq!(value["angle-degrees"], "false");
        assert_eq!(value["dark-mode"], true);
        assert_eq!(value["history"][0]["calculation"], "1+2");
        assert_eq!(value["history"][0]["result"], "3");

        assert_eq!(session_from_json(&value), session);
    }

    #[test]
    fn test_json_missing_keys_fall_back_to_defaults() {
        let session = session_from_json(&serde_json::json!({}));
        assert_eq!(session, SessionState::default());

        let session = session_from_json(&serde_json::json!({
            "memory": "not a number",
            "angle-degrees": 42,
        }));
        assert_eq!(session.memory, 0.0);
        assert!(session.degrees);
    }

    #[test]
    fn test_json_import_caps_history() {
        let entries: Vec<serde_json::Value> = (0..15)
            .map(|i| {
                serde_json::json!({"calculation": format!("{}+0", i), "result": i.to_string()})
            })
            .collect();
        let session = session_from_json(&serde_json::json!({ "history": entries }));
        assert_eq!(session.history.len(), HISTORY_LIMIT);
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let path = path.to_str().unwrap();

        let session = sample_session();
        export_session_json(&session, path).unwrap();
        let loaded = import_session_json(path).unwrap();

        assert_eq!(loaded, session);
    }

    #[test]
    fn test_restore_rebuilds_calculator() {
        let session = sample_session();
        let calculator = session.restore();

        assert_eq!(calculator.display, "0");
        assert_eq!(calculator.memory, 3.0);
        assert_eq!(calculator.angle_mode, AngleMode::Radians);
        assert_eq!(calculator.history.get(0).unwrap().result, "3");
    }
}
