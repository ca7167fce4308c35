//! Message types
//!
//! - Bridge → Controller: API requests and link notifications
//! - Controller → Bridge: replies and link control

use heapless::Vec;

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};
use crate::wire::{WireDate, WireDose, WireLogEntry, WireStatus, WireTime};

// Message type IDs: Bridge → Controller
pub const MSG_GET_STATUS: u8 = 0x01;
pub const MSG_GET_DOSES: u8 = 0x02;
pub const MSG_SET_TIME: u8 = 0x03;
pub const MSG_SET_DATE: u8 = 0x04;
pub const MSG_REPLACE_DOSES: u8 = 0x05;
pub const MSG_ADD_DOSE: u8 = 0x06;
pub const MSG_DELETE_DOSE: u8 = 0x07;
pub const MSG_SET_ALARM: u8 = 0x08;
pub const MSG_UNLOCK_TIME: u8 = 0x09;
pub const MSG_GET_LOGS: u8 = 0x0A;
pub const MSG_LINK_UP: u8 = 0x10;
pub const MSG_LINK_DOWN: u8 = 0x11;

// Message type IDs: Controller → Bridge
pub const MSG_STATUS: u8 = 0x80;
pub const MSG_DOSES: u8 = 0x81;
pub const MSG_ACK: u8 = 0x82;
pub const MSG_ERROR: u8 = 0x83;
pub const MSG_LOGS: u8 = 0x84;
pub const MSG_LINK_ENABLE: u8 = 0x90;

/// Most doses carried in one frame
pub const MAX_WIRE_DOSES: usize = 10;

/// Most log entries carried in one reply
pub const MAX_WIRE_LOGS: usize = 20;

/// Configuration API calls
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Request {
    GetStatus,
    GetDoses,
    /// Requires time editing to be unlocked
    SetTime(WireTime),
    /// Requires time editing to be unlocked
    SetDate(WireDate),
    /// Clear the schedule and add each entry; invalid entries are skipped
    ReplaceDoses(Vec<WireTime, MAX_WIRE_DOSES>),
    AddDose(WireTime),
    DeleteDose(u8),
    SetAlarm(bool),
    UnlockTime(bool),
    GetLogs,
}

/// Frames sent by the bridge
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BridgeMessage {
    Request(Request),
    /// Network joined with this IPv4 address
    LinkUp([u8; 4]),
    LinkDown,
}

impl BridgeMessage {
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        let p = frame.payload.as_slice();
        let request = match frame.msg_type {
            MSG_GET_STATUS => Request::GetStatus,
            MSG_GET_DOSES => Request::GetDoses,
            MSG_SET_TIME => Request::SetTime(WireTime::from_bytes(p)?),
            MSG_SET_DATE => Request::SetDate(WireDate::from_bytes(p)?),
            MSG_REPLACE_DOSES => {
                let (&count, rest) = p.split_first().ok_or(FrameError::InvalidMessage)?;
                let count = count as usize;
                if count > MAX_WIRE_DOSES || rest.len() < count * WireTime::LEN {
                    return Err(FrameError::InvalidMessage);
                }
                let mut times = Vec::new();
                for chunk in rest.chunks_exact(WireTime::LEN).take(count) {
                    times
                        .push(WireTime::from_bytes(chunk)?)
                        .map_err(|_| FrameError::InvalidMessage)?;
                }
                Request::ReplaceDoses(times)
            }
            MSG_ADD_DOSE => Request::AddDose(WireTime::from_bytes(p)?),
            MSG_DELETE_DOSE => Request::DeleteDose(first(p)?),
            MSG_SET_ALARM => Request::SetAlarm(first(p)? != 0),
            MSG_UNLOCK_TIME => Request::UnlockTime(first(p)? != 0),
            MSG_GET_LOGS => Request::GetLogs,
            MSG_LINK_UP => match p {
                [a, b, c, d, ..] => return Ok(BridgeMessage::LinkUp([*a, *b, *c, *d])),
                _ => return Err(FrameError::InvalidMessage),
            },
            MSG_LINK_DOWN => return Ok(BridgeMessage::LinkDown),
            _ => return Err(FrameError::InvalidMessage),
        };
        Ok(BridgeMessage::Request(request))
    }

    pub fn to_frame(&self, seq: u8) -> Result<Frame, FrameError> {
        let request = match self {
            BridgeMessage::LinkUp(addr) => return Frame::new(seq, MSG_LINK_UP, addr),
            BridgeMessage::LinkDown => return Ok(Frame::empty(seq, MSG_LINK_DOWN)),
            BridgeMessage::Request(request) => request,
        };
        match request {
            Request::GetStatus => Ok(Frame::empty(seq, MSG_GET_STATUS)),
            Request::GetDoses => Ok(Frame::empty(seq, MSG_GET_DOSES)),
            Request::SetTime(t) => Frame::new(seq, MSG_SET_TIME, &t.to_bytes()),
            Request::SetDate(d) => Frame::new(seq, MSG_SET_DATE, &d.to_bytes()),
            Request::ReplaceDoses(times) => {
                let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
                payload
                    .push(times.len() as u8)
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                for t in times {
                    payload
                        .extend_from_slice(&t.to_bytes())
                        .map_err(|_| FrameError::PayloadTooLarge)?;
                }
                Frame::new(seq, MSG_REPLACE_DOSES, &payload)
            }
            Request::AddDose(t) => Frame::new(seq, MSG_ADD_DOSE, &t.to_bytes()),
            Request::DeleteDose(id) => Frame::new(seq, MSG_DELETE_DOSE, &[*id]),
            Request::SetAlarm(on) => Frame::new(seq, MSG_SET_ALARM, &[*on as u8]),
            Request::UnlockTime(on) => Frame::new(seq, MSG_UNLOCK_TIME, &[*on as u8]),
            Request::GetLogs => Ok(Frame::empty(seq, MSG_GET_LOGS)),
        }
    }
}

/// Why a request was refused
///
/// The bridge maps these to HTTP status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ErrorCode {
    /// Time editing is locked (403)
    Locked = 1,
    /// Value out of range (400)
    InvalidValue = 2,
    /// Too close to an existing dose (400)
    Conflict = 3,
    /// No such dose (404)
    NotFound = 4,
    /// Schedule full (400)
    Full = 5,
    /// Hardware or storage failure (500)
    Internal = 6,
}

impl ErrorCode {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(ErrorCode::Locked),
            2 => Some(ErrorCode::InvalidValue),
            3 => Some(ErrorCode::Conflict),
            4 => Some(ErrorCode::NotFound),
            5 => Some(ErrorCode::Full),
            6 => Some(ErrorCode::Internal),
            _ => None,
        }
    }

    /// Matching HTTP status
    pub fn http_status(self) -> u16 {
        match self {
            ErrorCode::Locked => 403,
            ErrorCode::NotFound => 404,
            ErrorCode::Internal => 500,
            _ => 400,
        }
    }
}

/// Frames sent by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply {
    Status(WireStatus),
    Doses(Vec<WireDose, MAX_WIRE_DOSES>),
    Ack,
    Error(ErrorCode),
    Logs {
        /// Entries ever recorded
        total: u16,
        /// Most recent entries, oldest first
        entries: Vec<WireLogEntry, MAX_WIRE_LOGS>,
    },
    /// Start or stop the bridge's network service
    LinkEnable(bool),
}

impl Reply {
    pub fn to_frame(&self, seq: u8) -> Result<Frame, FrameError> {
        match self {
            Reply::Status(status) => Frame::new(seq, MSG_STATUS, &status.to_bytes()),
            Reply::Doses(doses) => {
                let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
                payload
                    .push(doses.len() as u8)
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                for dose in doses {
                    payload
                        .extend_from_slice(&dose.to_bytes())
                        .map_err(|_| FrameError::PayloadTooLarge)?;
                }
                Frame::new(seq, MSG_DOSES, &payload)
            }
            Reply::Ack => Ok(Frame::empty(seq, MSG_ACK)),
            Reply::Error(code) => Frame::new(seq, MSG_ERROR, &[*code as u8]),
            Reply::Logs { total, entries } => {
                let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
                payload
                    .extend_from_slice(&total.to_le_bytes())
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                payload
                    .push(entries.len() as u8)
                    .map_err(|_| FrameError::PayloadTooLarge)?;
                for entry in entries {
                    payload
                        .extend_from_slice(&entry.to_bytes())
                        .map_err(|_| FrameError::PayloadTooLarge)?;
                }
                Frame::new(seq, MSG_LOGS, &payload)
            }
            Reply::LinkEnable(on) => Frame::new(seq, MSG_LINK_ENABLE, &[*on as u8]),
        }
    }

    /// Parse a controller frame (bridge side, and tests)
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        let p = frame.payload.as_slice();
        match frame.msg_type {
            MSG_STATUS => Ok(Reply::Status(WireStatus::from_bytes(p)?)),
            MSG_DOSES => {
                let (&count, rest) = p.split_first().ok_or(FrameError::InvalidMessage)?;
                let count = count as usize;
                if count > MAX_WIRE_DOSES || rest.len() < count * WireDose::LEN {
                    return Err(FrameError::InvalidMessage);
                }
                let mut doses = Vec::new();
                for chunk in rest.chunks_exact(WireDose::LEN).take(count) {
                    doses
                        .push(WireDose::from_bytes(chunk)?)
                        .map_err(|_| FrameError::InvalidMessage)?;
                }
                Ok(Reply::Doses(doses))
            }
            MSG_ACK => Ok(Reply::Ack),
            MSG_ERROR => ErrorCode::from_byte(first(p)?)
                .map(Reply::Error)
                .ok_or(FrameError::InvalidMessage),
            MSG_LOGS => {
                if p.len() < 3 {
                    return Err(FrameError::InvalidMessage);
                }
                let total = u16::from_le_bytes([p[0], p[1]]);
                let count = p[2] as usize;
                let rest = &p[3..];
                if count > MAX_WIRE_LOGS || rest.len() < count * WireLogEntry::LEN {
                    return Err(FrameError::InvalidMessage);
                }
                let mut entries = Vec::new();
                for chunk in rest.chunks_exact(WireLogEntry::LEN).take(count) {
                    entries
                        .push(WireLogEntry::from_bytes(chunk)?)
                        .map_err(|_| FrameError::InvalidMessage)?;
                }
                Ok(Reply::Logs { total, entries })
            }
            MSG_LINK_ENABLE => Ok(Reply::LinkEnable(first(p)? != 0)),
            _ => Err(FrameError::InvalidMessage),
        }
    }
}

fn first(payload: &[u8]) -> Result<u8, FrameError> {
    payload.first().copied().ok_or(FrameError::InvalidMessage)
}
