//! Record extraction from an undelimited byte stream.
//!
//! The host writes [`RECORD_LEN`]-byte records back-to-back with no start
//! byte or checksum. The decoder buffers whatever arrives, hands out every
//! complete record in arrival order and keeps any trailing partial record
//! for the next poll. Alignment is never re-established: if the host tears a
//! write, every following record is shifted until the stream happens to line
//! up again.

use heapless::Vec;

use crate::record::{TelemetryRecord, RECORD_LEN};

/// Bytes the decoder can hold between polls
pub const DECODER_CAPACITY: usize = 256;

/// Errors reported by the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Not enough room for the offered bytes
    BufferFull,
}

/// Decoder state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeState {
    /// Less than one full record buffered
    WaitBytes,
    /// At least one full record ready to unpack
    Decode,
}

/// Buffered decoder for fixed-length telemetry records
#[derive(Debug, Clone)]
pub struct RecordDecoder {
    buffer: Vec<u8, DECODER_CAPACITY>,
    /// Read cursor into `buffer`
    cursor: usize,
}

impl Default for RecordDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordDecoder {
    /// Create an empty decoder
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            cursor: 0,
        }
    }

    /// Drop all buffered bytes
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    /// Current state of the decoder
    pub fn state(&self) -> DecodeState {
        if self.pending() >= RECORD_LEN {
            DecodeState::Decode
        } else {
            DecodeState::WaitBytes
        }
    }

    /// Number of buffered bytes not yet consumed
    pub fn pending(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    /// Number of bytes that can be pushed without overflowing
    pub fn spare_capacity(&self) -> usize {
        DECODER_CAPACITY - self.pending()
    }

    /// Append as many of `bytes` as fit, returning how many were taken
    pub fn push(&mut self, bytes: &[u8]) -> usize {
        self.compact();
        let take = bytes.len().min(self.spare_capacity());
        // Cannot fail: `take` is bounded by the spare capacity
        let _ = self.buffer.extend_from_slice(&bytes[..take]);
        take
    }

    /// Append all of `bytes` or none of them
    pub fn try_push(&mut self, bytes: &[u8]) -> Result<(), DecodeError> {
        if bytes.len() > self.spare_capacity() {
            return Err(DecodeError::BufferFull);
        }
        self.push(bytes);
        Ok(())
    }

    /// Unpack the next complete record, if one is buffered
    pub fn next_record(&mut self) -> Option<TelemetryRecord> {
        match self.state() {
            DecodeState::WaitBytes => None,
            DecodeState::Decode => {
                let record = TelemetryRecord::from_slice(&self.buffer[self.cursor..])?;
                self.cursor += RECORD_LEN;
                if self.cursor == self.buffer.len() {
                    self.reset();
                }
                Some(record)
            }
        }
    }

    /// Iterate over every complete record currently buffered
    pub fn records(&mut self) -> Records<'_> {
        Records { decoder: self }
    }

    /// Push `bytes` and return the last complete record now available
    ///
    /// Earlier records in the same batch are consumed and discarded, since
    /// each one only overwrites the previous widget targets.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<Option<TelemetryRecord>, DecodeError> {
        self.try_push(bytes)?;
        Ok(self.records().last())
    }

    /// Move unconsumed bytes to the front of the buffer
    fn compact(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let len = self.pending();
        self.buffer.copy_within(self.cursor.., 0);
        self.buffer.truncate(len);
        self.cursor = 0;
    }
}

/// Draining iterator returned by [`RecordDecoder::records`]
pub struct Records<'a> {
    decoder: &'a mut RecordDecoder,
}

impl Iterator for Records<'_> {
    type Item = TelemetryRecord;

    fn next(&mut self) -> Option<Self::Item> {
        self.decoder.next_record()
    }
}
