use crate::{ProtocolError, Result};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use taskfarm_core::TaskSpec;

/// Message tags on the coordinator/worker wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    /// Coordinator -> worker: an assignment or the stop sentinel.
    Assign = 1,
    /// Worker -> coordinator: a completion summary.
    Done = 2,
}

impl Tag {
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Tag::Assign),
            2 => Ok(Tag::Done),
            other => Err(ProtocolError::InvalidTag(other)),
        }
    }

    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

/// One dispatched work item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Index into the coordinator's priority-sorted task list.
    pub task_index: u32,
    pub spec: TaskSpec,
}

/// Payload of an `Assign`-tagged message: either real work or the
/// distinguished "no more work for you" sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AssignFrame {
    Work(Assignment),
    Stop,
}

impl AssignFrame {
    pub fn encode(&self) -> Result<Bytes> {
        Ok(Bytes::from(bincode::serialize(self)?))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Payload of a `Done`-tagged message. The sender is identified by the
/// transport, not by anything in the payload; there is no correlation id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub summary: String,
}

impl Completion {
    pub fn encode(&self) -> Result<Bytes> {
        Ok(Bytes::from(bincode::serialize(self)?))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskfarm_core::{FieldMap, FieldValue, Priority};

    #[test]
    fn test_tag_conversion() {
        assert_eq!(Tag::from_u8(1).unwrap(), Tag::Assign);
        assert_eq!(Tag::from_u8(2).unwrap(), Tag::Done);
        assert!(matches!(Tag::from_u8(9), Err(ProtocolError::InvalidTag(9))));
        assert_eq!(Tag::Assign.as_u8(), 1);
    }

    #[test]
    fn test_assignment_roundtrip() {
        let mut fields = FieldMap::new();
        fields.insert("data_points".to_string(), FieldValue::Int(500));
        let frame = AssignFrame::Work(Assignment {
            task_index: 3,
            spec: TaskSpec::new("data_aggregation", "sensor_data", Priority::High, fields),
        });

        let bytes = frame.encode().unwrap();
        assert_eq!(AssignFrame::decode(&bytes).unwrap(), frame);
    }

    #[test]
    fn test_stop_roundtrip() {
        let bytes = AssignFrame::Stop.encode().unwrap();
        assert_eq!(AssignFrame::decode(&bytes).unwrap(), AssignFrame::Stop);
    }

    #[test]
    fn test_completion_roundtrip() {
        let done = Completion {
            summary: "model_critical - training complete - 50 epochs".to_string(),
        };
        let bytes = done.encode().unwrap();
        assert_eq!(Completion::decode(&bytes).unwrap(), done);
    }

    #[test]
    fn test_garbage_is_an_error() {
        // A truncated frame must surface as a decode error, never as a
        // silently misread message.
        let mut fields = FieldMap::new();
        fields.insert("epochs".to_string(), FieldValue::Int(50));
        let frame = AssignFrame::Work(Assignment {
            task_index: 0,
            spec: TaskSpec::new("model_training", "m", Priority::Low, fields),
        });
        let bytes = frame.encode().unwrap();
        assert!(AssignFrame::decode(&bytes[..bytes.len() / 2]).is_err());
    }
}
