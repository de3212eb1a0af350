/// Tag and length of the trailing CRC field; part of the checksummed bytes.
pub const CRC_PREFIX: &str = "6304";

const POLYNOMIAL: u16 = 0x1021;
const INITIAL: u16 = 0xFFFF;

/// CRC-16/CCITT-FALSE: poly 0x1021, init 0xFFFF, MSB first, no reflection,
/// no final XOR.
pub fn crc16_ccitt_false(data: &[u8]) -> u16 {
    let mut crc = INITIAL;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ POLYNOMIAL
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// Checksum as the four uppercase hex digits carried in field 63.
pub fn crc16_hex(data: &[u8]) -> String {
    format!("{:04X}", crc16_ccitt_false(data))
}
