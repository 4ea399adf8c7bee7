//! The binary log file format from spec.md §6: a 16-byte magic, a 4-byte
//! little-endian version, then a stream of length-prefixed records.

use std::io::{self, Read, Write};

use crate::event::{Data, Event, EventType};
use crate::level::Level;

pub const MAGIC: &[u8; 16] = b"AxeLogBinaryFile";
pub const VERSION: u32 = 2;

pub fn write_header(w: &mut impl Write) -> io::Result<()> {
    w.write_all(MAGIC)?;
    w.write_all(&VERSION.to_le_bytes())
}

pub fn read_header(r: &mut impl Read) -> io::Result<u32> {
    let mut magic = [0u8; 16];
    r.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "bad craft log magic"));
    }
    let mut version = [0u8; 4];
    r.read_exact(&mut version)?;
    Ok(u32::from_le_bytes(version))
}

/// Serialize one record's body (everything after `size`), returning it so
/// the caller can prefix it with the record length.
fn encode_body(event: &Event) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&event.time_microseconds.to_le_bytes());
    body.extend_from_slice(&event.thread_id.to_le_bytes());
    body.push(event.level as u8);
    body.push(event.kind as u8);

    let category = event.category.as_bytes();
    body.extend_from_slice(&(category.len() as u32).to_le_bytes());
    body.extend_from_slice(category);

    let message = event.message.as_bytes();
    body.extend_from_slice(&(message.len() as u32).to_le_bytes());
    body.extend_from_slice(message);

    let data = event.data.encode();
    body.extend_from_slice(&(data.len() as u32).to_le_bytes());
    body.extend_from_slice(&data);

    body
}

pub fn write_event(w: &mut impl Write, event: &Event) -> io::Result<()> {
    let body = encode_body(event);
    w.write_all(&(body.len() as u64).to_le_bytes())?;
    w.write_all(&body)
}

/// Read one record. Returns `Ok(None)` cleanly at end of stream.
pub fn read_event(r: &mut impl Read) -> io::Result<Option<Event>> {
    let mut size_buf = [0u8; 8];
    match r.read_exact(&mut size_buf) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e),
    }
    let size = u64::from_le_bytes(size_buf) as usize;
    let mut body = vec![0u8; size];
    r.read_exact(&mut body)?;

    let mut cursor = &body[..];
    let time_microseconds = read_u64(&mut cursor)?;
    let thread_id = read_u32(&mut cursor)?;
    let level = Level::from_u8(read_u8(&mut cursor)?)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "bad level byte"))?;
    let kind = EventType::from_u8(read_u8(&mut cursor)?)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "bad event type byte"))?;
    let category = read_string(&mut cursor)?;
    let message = read_string(&mut cursor)?;
    let data_bytes = read_bytes(&mut cursor)?;
    let data = Data::decode(kind, &data_bytes)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "bad data payload for event type"))?;

    Ok(Some(Event {
        time_microseconds,
        thread_id,
        level,
        kind,
        category,
        message,
        data,
    }))
}

fn read_u8(cursor: &mut &[u8]) -> io::Result<u8> {
    if cursor.is_empty() {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated record"));
    }
    let v = cursor[0];
    *cursor = &cursor[1..];
    Ok(v)
}

fn read_u32(cursor: &mut &[u8]) -> io::Result<u32> {
    if cursor.len() < 4 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated record"));
    }
    let (head, rest) = cursor.split_at(4);
    *cursor = rest;
    Ok(u32::from_le_bytes(head.try_into().unwrap()))
}

fn read_u64(cursor: &mut &[u8]) -> io::Result<u64> {
    if cursor.len() < 8 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated record"));
    }
    let (head, rest) = cursor.split_at(8);
    *cursor = rest;
    Ok(u64::from_le_bytes(head.try_into().unwrap()))
}

fn read_bytes(cursor: &mut &[u8]) -> io::Result<Vec<u8>> {
    let len = read_u32(cursor)? as usize;
    if cursor.len() < len {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated record"));
    }
    let (head, rest) = cursor.split_at(len);
    *cursor = rest;
    Ok(head.to_vec())
}

fn read_string(cursor: &mut &[u8]) -> io::Result<String> {
    Ok(String::from_utf8_lossy(&read_bytes(cursor)?).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_events() -> Vec<Event> {
        vec![
            Event {
                time_microseconds: 1_700_000_000_000_000,
                thread_id: 7,
                level: Level::Info,
                kind: EventType::Message,
                category: "task".into(),
                message: "compiling foo.cpp".into(),
                data: Data::Null,
            },
            Event {
                time_microseconds: 1_700_000_000_000_500,
                thread_id: 7,
                level: Level::Debug,
                kind: EventType::RecursiveSpanBegin,
                category: "Section".into(),
                message: "compile".into(),
                data: Data::Null,
            },
            Event {
                time_microseconds: 1_700_000_000_001_000,
                thread_id: 7,
                level: Level::Info,
                kind: EventType::IntValue,
                category: "exec".into(),
                message: "killed".into(),
                data: Data::Int(1),
            },
            Event {
                time_microseconds: 1_700_000_000_002_000,
                thread_id: 7,
                level: Level::Debug,
                kind: EventType::RecursiveSpanEnd,
                category: "Section".into(),
                message: String::new(),
                data: Data::Null,
            },
        ]
    }

    #[test]
    fn header_roundtrips() {
        let mut buf = Vec::new();
        write_header(&mut buf).unwrap();
        let version = read_header(&mut &buf[..]).unwrap();
        assert_eq!(version, VERSION);
    }

    #[test]
    fn events_roundtrip_exactly() {
        let events = sample_events();
        let mut buf = Vec::new();
        for event in &events {
            write_event(&mut buf, event).unwrap();
        }

        let mut cursor = &buf[..];
        let mut read_back = Vec::new();
        while let Some(event) = read_event(&mut cursor).unwrap() {
            read_back.push(event);
        }
        assert_eq!(read_back, events);
    }

    #[test]
    fn reading_past_end_of_stream_is_none() {
        let mut cursor = &b""[..];
        assert!(read_event(&mut cursor).unwrap().is_none());
    }
}
