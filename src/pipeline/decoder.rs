//! Frame decoder for peripheral notification payloads
//!
//! A PlantSense peripheral notifies opaque byte chunks containing text:
//! zero or more lines (split on `\n` or `\r\n`), each line holding zero or
//! more comma-separated millivolt readings. Chunk boundaries are arbitrary
//! (a token may be cut in half by the notification MTU), so malformed tokens
//! are expected traffic, not errors.
//!
//! Every successfully parsed token is stamped with the wall clock *at the
//! moment of parsing*; the payload carries no time of its own. Several
//! values from one chunk can therefore share a timestamp.

use crate::types::{Sample, SharedClock};

/// Decodes raw payload chunks into timestamped samples.
///
/// Stateless apart from its clock handle: no reassembly is attempted across
/// chunks, and an entirely unparsable chunk simply yields no samples.
pub struct FrameDecoder {
    clock: SharedClock,
}

impl FrameDecoder {
    /// Create a decoder stamping samples from the given clock
    pub fn new(clock: SharedClock) -> Self {
        Self { clock }
    }

    /// Decode one payload chunk into zero or more samples, in payload order.
    ///
    /// Tokens that do not parse as a finite float are skipped silently.
    /// Invalid UTF-8 sequences decode lossily into replacement characters,
    /// which then fail the numeric parse and are skipped like any other
    /// malformed token.
    pub fn decode(&self, payload: &[u8]) -> Vec<Sample> {
        let text = String::from_utf8_lossy(payload);
        let mut samples = Vec::new();

        for line in text.split('\n') {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            for token in line.split(',') {
                let Ok(v) = token.trim().parse::<f64>() else {
                    continue;
                };
                if !v.is_finite() {
                    continue;
                }
                samples.push(Sample::new(self.clock.now_ms(), v));
            }
        }

        samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ManualClock;
    use std::sync::Arc;

    fn decoder_at(start_ms: i64) -> (FrameDecoder, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start_ms));
        (FrameDecoder::new(clock.clone()), clock)
    }

    #[test]
    fn test_mixed_valid_invalid_tokens() {
        let (decoder, _) = decoder_at(0);
        let samples = decoder.decode(b"1.5,foo,2.3\n,,3.1");
        let values: Vec<f64> = samples.iter().map(|s| s.v).collect();
        assert_eq!(values, vec![1.5, 2.3, 3.1]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let (decoder, _) = decoder_at(0);
        let samples = decoder.decode(b"1.0\r\n2.0\r\n");
        let values: Vec<f64> = samples.iter().map(|s| s.v).collect();
        assert_eq!(values, vec![1.0, 2.0]);
    }

    #[test]
    fn test_empty_and_garbage_chunks_yield_nothing() {
        let (decoder, _) = decoder_at(0);
        assert!(decoder.decode(b"").is_empty());
        assert!(decoder.decode(b"\n\n  \n").is_empty());
        assert!(decoder.decode(b"hello,world\nnot numbers").is_empty());
    }

    #[test]
    fn test_non_finite_values_skipped() {
        let (decoder, _) = decoder_at(0);
        let samples = decoder.decode(b"inf,-inf,nan,7.5");
        let values: Vec<f64> = samples.iter().map(|s| s.v).collect();
        assert_eq!(values, vec![7.5]);
    }

    #[test]
    fn test_invalid_utf8_is_absorbed() {
        let (decoder, _) = decoder_at(0);
        let samples = decoder.decode(&[0xff, 0xfe, b'4', b'.', b'2']);
        // The lossy replacement character fuses with the digits into one
        // unparsable token; nothing valid remains.
        assert!(samples.is_empty());

        let samples = decoder.decode(&[0xff, b',', b'4', b'.', b'2']);
        let values: Vec<f64> = samples.iter().map(|s| s.v).collect();
        assert_eq!(values, vec![4.2]);
    }

    #[test]
    fn test_values_in_one_chunk_share_decode_time() {
        let (decoder, clock) = decoder_at(5_000);
        let samples = decoder.decode(b"1.0,2.0,3.0");
        assert_eq!(samples.len(), 3);
        assert!(samples.iter().all(|s| s.t == 5_000));

        clock.advance(100);
        let later = decoder.decode(b"4.0");
        assert_eq!(later[0].t, 5_100);
    }

    #[test]
    fn test_partial_token_at_chunk_boundary() {
        let (decoder, _) = decoder_at(0);
        // "12.5,43" split mid-token across two notifications: the cut halves
        // still parse as numbers on their own, which is accepted behavior for
        // this framing; only non-numeric fragments disappear.
        let first = decoder.decode(b"12.5,4");
        let second = decoder.decode(b"3.7\n");
        assert_eq!(first.iter().map(|s| s.v).collect::<Vec<_>>(), vec![12.5, 4.0]);
        assert_eq!(second.iter().map(|s| s.v).collect::<Vec<_>>(), vec![3.7]);
    }
}
