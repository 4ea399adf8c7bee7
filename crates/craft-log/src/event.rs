use crate::level::Level;

/// The `type` field of a log record (spec.md §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EventType {
    Null = 0,
    Message = 1,
    RecursiveSpanBegin = 2,
    RecursiveSpanEnd = 3,
    StringValue = 4,
    TimeValue = 5,
    IntValue = 6,
    FloatValue = 7,
}

impl EventType {
    pub(crate) fn from_u8(value: u8) -> Option<EventType> {
        Some(match value {
            0 => EventType::Null,
            1 => EventType::Message,
            2 => EventType::RecursiveSpanBegin,
            3 => EventType::RecursiveSpanEnd,
            4 => EventType::StringValue,
            5 => EventType::TimeValue,
            6 => EventType::IntValue,
            7 => EventType::FloatValue,
            _ => return None,
        })
    }
}

/// The payload carried alongside a message, per spec.md §6's record types.
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    Null,
    /// A `StringValue` event's payload.
    Text(String),
    /// Seconds since the Unix epoch.
    Time(u64),
    Int(i64),
    Float(f32),
}

impl Data {
    pub(crate) fn type_tag(&self) -> EventType {
        match self {
            Data::Null => EventType::Null,
            Data::Text(_) => EventType::StringValue,
            Data::Time(_) => EventType::TimeValue,
            Data::Int(_) => EventType::IntValue,
            Data::Float(_) => EventType::FloatValue,
        }
    }

    pub(crate) fn encode(&self) -> Vec<u8> {
        match self {
            Data::Null => Vec::new(),
            Data::Text(s) => s.as_bytes().to_vec(),
            Data::Time(secs) => secs.to_le_bytes().to_vec(),
            Data::Int(v) => v.to_le_bytes().to_vec(),
            Data::Float(v) => v.to_le_bytes().to_vec(),
        }
    }

    pub(crate) fn decode(kind: EventType, bytes: &[u8]) -> Option<Data> {
        Some(match kind {
            EventType::Null | EventType::Message | EventType::RecursiveSpanBegin | EventType::RecursiveSpanEnd => {
                Data::Null
            }
            EventType::StringValue => Data::Text(String::from_utf8_lossy(bytes).into_owned()),
            EventType::TimeValue => Data::Time(u64::from_le_bytes(bytes.try_into().ok()?)),
            EventType::IntValue => Data::Int(i64::from_le_bytes(bytes.try_into().ok()?)),
            EventType::FloatValue => Data::Float(f32::from_le_bytes(bytes.try_into().ok()?)),
        })
    }
}

/// A single log record, matching the field list in spec.md §6.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub time_microseconds: u64,
    pub thread_id: u32,
    pub level: Level,
    pub kind: EventType,
    pub category: String,
    pub message: String,
    pub data: Data,
}
