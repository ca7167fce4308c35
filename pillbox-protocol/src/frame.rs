//! Frame encoding and decoding
//!
//! - START (1 byte): 0x7E synchronization byte
//! - LENGTH (1 byte): payload length (0-240)
//! - SEQ (1 byte): request sequence number, echoed by the reply
//! - TYPE (1 byte): message type identifier
//! - PAYLOAD (0-240 bytes)
//! - CHECKSUM (1 byte): XOR of LENGTH, SEQ, TYPE, and all PAYLOAD bytes

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_START: u8 = 0x7E;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 240;

/// Header bytes before the payload
const HEADER_LEN: usize = 4;

/// Maximum complete frame size
pub const MAX_FRAME_SIZE: usize = HEADER_LEN + MAX_PAYLOAD_SIZE + 1;

/// Errors from frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Checksum mismatch
    InvalidChecksum,
    /// Length byte out of range
    InvalidLength,
    /// Unknown message type or malformed payload
    InvalidMessage,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// A parsed or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub seq: u8,
    pub msg_type: u8,
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    pub fn new(seq: u8, msg_type: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self {
            seq,
            msg_type,
            payload,
        })
    }

    /// Frame with no payload
    pub fn empty(seq: u8, msg_type: u8) -> Self {
        Self {
            seq,
            msg_type,
            payload: Vec::new(),
        }
    }

    fn checksum(length: u8, seq: u8, msg_type: u8, payload: &[u8]) -> u8 {
        payload
            .iter()
            .fold(length ^ seq ^ msg_type, |acc, &byte| acc ^ byte)
    }

    /// Bytes this frame occupies on the wire
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.payload.len() + 1
    }

    /// Encode into `buffer`, returning the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = self.encoded_len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        let length = self.payload.len() as u8;
        let end = HEADER_LEN + self.payload.len();
        buffer[0] = FRAME_START;
        buffer[1] = length;
        buffer[2] = self.seq;
        buffer[3] = self.msg_type;
        buffer[HEADER_LEN..end].copy_from_slice(&self.payload);
        buffer[end] = Self::checksum(length, self.seq, self.msg_type, &self.payload);

        Ok(frame_len)
    }

    /// Encode into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        Vec::from_slice(&buffer[..len]).map_err(|_| FrameError::BufferTooSmall)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Sync,
    Length,
    Seq,
    Type,
    Payload,
    Checksum,
}

/// Byte-at-a-time frame parser
///
/// Bytes before a START byte are skipped; any error resynchronizes on the
/// next START byte.
#[derive(Debug, Clone)]
pub struct FrameParser {
    stage: Stage,
    length: u8,
    seq: u8,
    msg_type: u8,
    payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    pub const fn new() -> Self {
        Self {
            stage: Stage::Sync,
            length: 0,
            seq: 0,
            msg_type: 0,
            payload: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        self.stage = Stage::Sync;
        self.length = 0;
        self.seq = 0;
        self.msg_type = 0;
        self.payload.clear();
    }

    /// Feed one byte
    ///
    /// Returns `Ok(Some(frame))` when a frame completes, `Ok(None)` when
    /// more bytes are needed.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.stage {
            Stage::Sync => {
                if byte == FRAME_START {
                    self.payload.clear();
                    self.stage = Stage::Length;
                }
            }
            Stage::Length => {
                if byte as usize > MAX_PAYLOAD_SIZE {
                    self.reset();
                    return Err(FrameError::InvalidLength);
                }
                self.length = byte;
                self.stage = Stage::Seq;
            }
            Stage::Seq => {
                self.seq = byte;
                self.stage = Stage::Type;
            }
            Stage::Type => {
                self.msg_type = byte;
                self.stage = if self.length == 0 {
                    Stage::Checksum
                } else {
                    Stage::Payload
                };
            }
            Stage::Payload => {
                // Length was bounded at Stage::Length
                let _ = self.payload.push(byte);
                if self.payload.len() == self.length as usize {
                    self.stage = Stage::Checksum;
                }
            }
            Stage::Checksum => {
                let expected = Frame::checksum(self.length, self.seq, self.msg_type, &self.payload);
                if byte != expected {
                    self.reset();
                    return Err(FrameError::InvalidChecksum);
                }
                let frame = Frame {
                    seq: self.seq,
                    msg_type: self.msg_type,
                    payload: core::mem::take(&mut self.payload),
                };
                self.reset();
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_all(parser: &mut FrameParser, bytes: &[u8]) -> Option<Frame> {
        let mut found = None;
        for &b in bytes {
            if let Ok(Some(frame)) = parser.feed(b) {
                found = Some(frame);
            }
        }
        found
    }

    #[test]
    fn test_encode_layout() {
        let frame = Frame::new(9, 0x03, &[8, 30, 1]).unwrap();
        let mut buf = [0u8; 16];
        let len = frame.encode(&mut buf).unwrap();

        assert_eq!(len, 8);
        assert_eq!(&buf[..7], &[FRAME_START, 3, 9, 0x03, 8, 30, 1]);
        assert_eq!(buf[7], 3 ^ 9 ^ 0x03 ^ 8 ^ 30 ^ 1);
    }

    #[test]
    fn test_parse_skips_garbage_before_start() {
        let frame = Frame::new(1, 0x06, &[6, 0, 1]).unwrap();
        let encoded = frame.encode_to_vec().unwrap();

        let mut stream: Vec<u8, 32> = Vec::new();
        stream.extend_from_slice(&[0x00, 0x13, 0x37]).unwrap();
        stream.extend_from_slice(&encoded).unwrap();

        let mut parser = FrameParser::new();
        assert_eq!(parse_all(&mut parser, &stream), Some(frame));
    }

    #[test]
    fn test_empty_payload() {
        let frame = Frame::empty(200, 0x01);
        let encoded = frame.encode_to_vec().unwrap();
        assert_eq!(encoded.len(), 5);

        let mut parser = FrameParser::new();
        assert_eq!(parse_all(&mut parser, &encoded), Some(frame));
    }

    #[test]
    fn test_bad_checksum_then_recovery() {
        let good = Frame::new(2, 0x07, &[1]).unwrap();
        let mut bad = good.encode_to_vec().unwrap();
        let last = bad.len() - 1;
        bad[last] ^= 0xFF;

        let mut parser = FrameParser::new();
        let mut errors = 0;
        for &b in bad.iter() {
            if parser.feed(b).is_err() {
                errors += 1;
            }
        }
        assert_eq!(errors, 1);

        let encoded = good.encode_to_vec().unwrap();
        assert_eq!(parse_all(&mut parser, &encoded), Some(good));
    }

    #[test]
    fn test_length_out_of_range() {
        let mut parser = FrameParser::new();
        parser.feed(FRAME_START).unwrap();
        assert_eq!(parser.feed(241), Err(FrameError::InvalidLength));
    }

    #[test]
    fn test_payload_too_large() {
        let big = [0u8; MAX_PAYLOAD_SIZE + 1];
        assert_eq!(Frame::new(0, 0, &big), Err(FrameError::PayloadTooLarge));
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let frame = Frame::new(0, 0x01, &[1, 2, 3]).unwrap();
        let mut buf = [0u8; 4];
        assert_eq!(frame.encode(&mut buf), Err(FrameError::BufferTooSmall));
    }

    proptest::proptest! {
        #[test]
        fn prop_parser_survives_arbitrary_bytes(bytes in proptest::collection::vec(proptest::num::u8::ANY, 0..512)) {
            let mut parser = FrameParser::new();
            for b in bytes {
                let _ = parser.feed(b);
            }
        }
    }
}
