//! Telemetry record layout for the host link.
//!
//! Record format (little-endian, no header, no delimiter):
//! - CPU_LOAD (1 byte): signed percentage
//! - GPU_LOAD (1 byte): signed percentage
//! - MEM_LOAD (1 byte): signed percentage
//! - DISK_LOAD (1 byte): signed percentage
//! - NET_IN (4 bytes): inbound bytes per second, unsigned
//! - NET_OUT (4 bytes): outbound bytes per second, unsigned
//! - TEMPERATURE (4 bytes): IEEE-754 single precision, degrees

/// Length of one encoded record in bytes
pub const RECORD_LEN: usize = 16;

const NET_IN_OFFSET: usize = 4;
const NET_OUT_OFFSET: usize = 8;
const TEMPERATURE_OFFSET: usize = 12;

/// One decoded telemetry sample from the host
///
/// Loads are passed through as sent; range clamping happens in the widgets.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetryRecord {
    /// Aggregate CPU load (0-100)
    pub cpu_load: i8,
    /// GPU load (0-100)
    pub gpu_load: i8,
    /// Memory usage (0-100)
    pub mem_load: i8,
    /// Storage usage (0-100)
    pub disk_load: i8,
    /// Network receive rate in bytes/sec
    pub net_in_bps: u32,
    /// Network transmit rate in bytes/sec
    pub net_out_bps: u32,
    /// Temperature in degrees
    pub temperature: f32,
}

impl TelemetryRecord {
    /// Unpack a record from exactly [`RECORD_LEN`] bytes
    pub fn decode(bytes: &[u8; RECORD_LEN]) -> Self {
        Self {
            cpu_load: bytes[0] as i8,
            gpu_load: bytes[1] as i8,
            mem_load: bytes[2] as i8,
            disk_load: bytes[3] as i8,
            net_in_bps: u32::from_le_bytes(word(bytes, NET_IN_OFFSET)),
            net_out_bps: u32::from_le_bytes(word(bytes, NET_OUT_OFFSET)),
            temperature: f32::from_le_bytes(word(bytes, TEMPERATURE_OFFSET)),
        }
    }

    /// Unpack a record from the front of `bytes`
    ///
    /// Returns `None` when fewer than [`RECORD_LEN`] bytes are given.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let head: &[u8; RECORD_LEN] = bytes.get(..RECORD_LEN)?.try_into().ok()?;
        Some(Self::decode(head))
    }

    /// Pack this record into its wire form
    pub fn encode(&self) -> [u8; RECORD_LEN] {
        let mut out = [0u8; RECORD_LEN];
        out[0] = self.cpu_load as u8;
        out[1] = self.gpu_load as u8;
        out[2] = self.mem_load as u8;
        out[3] = self.disk_load as u8;
        out[NET_IN_OFFSET..NET_IN_OFFSET + 4].copy_from_slice(&self.net_in_bps.to_le_bytes());
        out[NET_OUT_OFFSET..NET_OUT_OFFSET + 4].copy_from_slice(&self.net_out_bps.to_le_bytes());
        out[TEMPERATURE_OFFSET..TEMPERATURE_OFFSET + 4]
            .copy_from_slice(&self.temperature.to_le_bytes());
        out
    }

    /// The four load fields in gauge order (cpu, gpu, mem, disk)
    pub fn loads(&self) -> [i8; 4] {
        [self.cpu_load, self.gpu_load, self.mem_load, self.disk_load]
    }
}

fn word(bytes: &[u8; RECORD_LEN], offset: usize) -> [u8; 4] {
    [
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_layout() {
        let mut raw = [0u8; RECORD_LEN];
        raw[0] = 42;
        raw[1] = 7;
        raw[2] = 100;
        raw[3] = 0xF6; // -10
        raw[4..8].copy_from_slice(&1536u32.to_le_bytes());
        raw[8..12].copy_from_slice(&1_048_576u32.to_le_bytes());
        raw[12..16].copy_from_slice(&47.5f32.to_le_bytes());

        let record = TelemetryRecord::decode(&raw);

        assert_eq!(record.cpu_load, 42);
        assert_eq!(record.gpu_load, 7);
        assert_eq!(record.mem_load, 100);
        assert_eq!(record.disk_load, -10);
        assert_eq!(record.net_in_bps, 1536);
        assert_eq!(record.net_out_bps, 1_048_576);
        assert_eq!(record.temperature, 47.5);
    }

    #[test]
    fn test_encode_matches_decode() {
        let record = TelemetryRecord {
            cpu_load: 12,
            gpu_load: 34,
            mem_load: 56,
            disk_load: 78,
            net_in_bps: 0xDEAD_BEEF,
            net_out_bps: 5335,
            temperature: -3.25,
        };

        let raw = record.encode();
        assert_eq!(raw[4], 0xEF); // little-endian low byte first
        assert_eq!(TelemetryRecord::decode(&raw), record);
    }

    #[test]
    fn test_from_slice_short_input() {
        let raw = [0u8; RECORD_LEN - 1];
        assert!(TelemetryRecord::from_slice(&raw).is_none());
    }

    #[test]
    fn test_from_slice_ignores_trailing_bytes() {
        let mut raw = [0u8; RECORD_LEN + 3];
        raw[0] = 99;
        let record = TelemetryRecord::from_slice(&raw).unwrap();
        assert_eq!(record.cpu_load, 99);
    }

    #[test]
    fn test_loads_order() {
        let record = TelemetryRecord {
            cpu_load: 1,
            gpu_load: 2,
            mem_load: 3,
            disk_load: 4,
            net_in_bps: 0,
            net_out_bps: 0,
            temperature: 0.0,
        };
        assert_eq!(record.loads(), [1, 2, 3, 4]);
    }
}
