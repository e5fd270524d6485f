use crc::{Crc, CRC_16_IBM_SDLC};

/// CRC-16/X25: polynomial 0x1021 bit-reflected, init 0xFFFF, xorout 0xFFFF.
/// The same FCS variant PPP uses (RFC 1662 appendix C).
pub const X25: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_SDLC);

/// Frame check sequence over `data`.
pub fn crc16(data: &[u8]) -> u16 {
    X25.checksum(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_check_string() {
        // Standard CRC-16/X-25 check value.
        assert_eq!(crc16(b"123456789"), 0x906E);
    }

    #[test]
    fn empty_input() {
        // init 0xFFFF xor final 0xFFFF with no data in between.
        assert_eq!(crc16(b""), 0x0000);
    }

    #[test]
    fn stateless_across_calls() {
        let first = crc16(b"hello");
        let second = crc16(b"interleaved");
        assert_eq!(crc16(b"hello"), first);
        assert_eq!(crc16(b"interleaved"), second);
    }

    #[test]
    fn incremental_digest_matches_oneshot() {
        let mut digest = X25.digest();
        digest.update(b"123");
        digest.update(b"456789");
        assert_eq!(digest.finalize(), crc16(b"123456789"));
    }

    #[test]
    fn single_bit_sensitivity() {
        let base = crc16(b"hello");
        let mut corrupted = *b"hello";
        for byte in 0..corrupted.len() {
            for bit in 0..8 {
                corrupted[byte] ^= 1 << bit;
                assert_ne!(crc16(&corrupted), base, "bit {bit} of byte {byte}");
                corrupted[byte] ^= 1 << bit;
            }
        }
    }
}
