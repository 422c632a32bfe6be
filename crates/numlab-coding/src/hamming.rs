// ─────────────────────────────────────────────────────────────────────
// NumLab — Hamming(7,4) code
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Hamming(7,4) code.
//!
//! Codeword bit positions 1..7 are `[p1, p2, d1, p3, d2, d3, d4]`; parity
//! bits sit at the powers of two so the syndrome reads directly as the
//! 1-based position of a flipped bit. At most one error is corrected; two
//! flips are silently miscorrected, which is inherent to the code.

use log::debug;
use numlab_types::error::{NumLabError, NumLabResult};

pub type DataBits = [u8; 4];
pub type Codeword = [u8; 7];

/// Result of decoding one received word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    pub data: DataBits,
    /// 1-based position of the bit that was flipped back, if any.
    pub corrected: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Hamming74;

fn check_bits(bits: &[u8]) -> NumLabResult<()> {
    if let Some((i, b)) = bits.iter().enumerate().find(|(_, b)| **b > 1) {
        return Err(NumLabError::InvalidInput(format!(
            "bit {} has value {b}, expected 0 or 1",
            i + 1
        )));
    }
    Ok(())
}

impl Hamming74 {
    pub fn encode(&self, data: DataBits) -> NumLabResult<Codeword> {
        check_bits(&data)?;
        let [d1, d2, d3, d4] = data;
        let p1 = d1 ^ d2 ^ d4;
        let p2 = d1 ^ d3 ^ d4;
        let p3 = d2 ^ d3 ^ d4;
        Ok([p1, p2, d1, p3, d2, d3, d4])
    }

    /// Syndrome as the 1-based error position, 0 when all checks pass.
    pub fn syndrome(&self, received: &Codeword) -> NumLabResult<usize> {
        check_bits(received)?;
        let r = received;
        let s1 = r[0] ^ r[2] ^ r[4] ^ r[6];
        let s2 = r[1] ^ r[2] ^ r[5] ^ r[6];
        let s3 = r[3] ^ r[4] ^ r[5] ^ r[6];
        Ok(s1 as usize + 2 * s2 as usize + 4 * s3 as usize)
    }

    pub fn decode(&self, received: &Codeword) -> NumLabResult<Decoded> {
        let position = self.syndrome(received)?;
        let mut word = *received;
        let corrected = if position != 0 {
            debug!("hamming: correcting bit {position}");
            word[position - 1] ^= 1;
            Some(position)
        } else {
            None
        };
        Ok(Decoded {
            data: [word[2], word[4], word[5], word[6]],
            corrected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let code = Hamming74.encode([1, 0, 1, 1]).unwrap();
        // p1 = 1⊕0⊕1 = 0, p2 = 1⊕1⊕1 = 1, p3 = 0⊕1⊕1 = 0
        assert_eq!(code, [0, 1, 1, 0, 0, 1, 1]);
    }

    #[test]
    fn test_corrects_flip_at_index_four() {
        let mut code = Hamming74.encode([1, 0, 1, 1]).unwrap();
        code[4] ^= 1;
        let decoded = Hamming74.decode(&code).unwrap();
        assert_eq!(decoded.data, [1, 0, 1, 1]);
        assert_eq!(decoded.corrected, Some(5));
    }

    #[test]
    fn test_clean_word_has_zero_syndrome() {
        for n in 0u8..16 {
            let data = [(n >> 3) & 1, (n >> 2) & 1, (n >> 1) & 1, n & 1];
            let code = Hamming74.encode(data).unwrap();
            assert_eq!(Hamming74.syndrome(&code).unwrap(), 0);
            assert_eq!(Hamming74.decode(&code).unwrap().corrected, None);
        }
    }

    #[test]
    fn test_double_error_is_miscorrected() {
        let data = [1, 1, 0, 0];
        let mut code = Hamming74.encode(data).unwrap();
        code[0] ^= 1;
        code[1] ^= 1;
        let decoded = Hamming74.decode(&code).unwrap();
        assert!(decoded.corrected.is_some());
        // positions 1 and 2 flipped → syndrome 3 → data bit d1 flipped wrongly
        assert_ne!(decoded.data, data);
    }

    #[test]
    fn test_non_binary_rejected() {
        assert!(Hamming74.encode([0, 2, 0, 0]).is_err());
        assert!(Hamming74.decode(&[0, 0, 0, 0, 0, 0, 3]).is_err());
    }
}
