//! Minimal RFC 1950 (zlib) framing around the DEFLATE body: a 2-byte
//! header, optionally a 4-byte big-endian preset-dictionary id, the
//! compressed payload, and a 4-byte big-endian Adler-32 trailer.
//!
//! This crate parses the trailer but does not verify it — Adler-32 is an
//! external collaborator's job (see `SPEC_FULL.md`), and this module just
//! hands the 4 bytes back to the caller to check against whatever running
//! checksum they've been keeping over the decompressed output.

use crate::error::{safety_check, InvalidFormat};
use crate::inflate::{InflateStatus, Inflater};
use crate::io::{ByteSink, ByteSource};

/// The parsed fixed portion of a zlib stream's 2-byte header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZlibHeader {
    pub compression_method: u8,
    pub compression_info: u8,
    pub flags: u8,
    /// `Some(id)` when FDICT is set. A nonzero preset dictionary is rejected
    /// by [`ZlibDecoder`] — this crate never asks the caller for dictionary
    /// bytes it has no way to request.
    pub dict_id: Option<u32>,
}

pub struct ZlibFramer;

impl ZlibFramer {
    /// Parse the header from the front of `source` without consuming
    /// anything until enough bytes are confirmed present — including the
    /// 4 extra DICTID bytes when FDICT is set, which can only be known
    /// after reading the first 2 bytes. Returns `None` (not an error) if
    /// the source doesn't yet have enough bytes.
    pub fn parse_header<S: ByteSource + ?Sized>(
        source: &mut S,
    ) -> Result<Option<ZlibHeader>, InvalidFormat> {
        let (cmf, flg) = match (source.peek(0), source.peek(1)) {
            (Some(cmf), Some(flg)) => (cmf, flg),
            _ => return Ok(None),
        };

        let compression_method = cmf & 0x0F;
        let compression_info = cmf >> 4;
        safety_check!(compression_method == 8, "zlib CMF does not name the deflate method");
        safety_check!(
            (((cmf as u16) << 8) | flg as u16) % 31 == 0,
            "zlib header check (FCHECK) failed"
        );

        let fdict = (flg & 0x20) != 0;
        let header_len = if fdict { 6 } else { 2 };
        if source.remaining() < header_len {
            return Ok(None);
        }

        for _ in 0..2 {
            source.next_byte();
        }
        let dict_id = if fdict {
            let mut b = [0u8; 4];
            for slot in b.iter_mut() {
                *slot = source.next_byte().expect("remaining() already checked");
            }
            Some(u32::from_be_bytes(b))
        } else {
            None
        };

        Ok(Some(ZlibHeader {
            compression_method,
            compression_info,
            flags: flg,
            dict_id,
        }))
    }

    /// Parse the 4-byte big-endian Adler-32 trailer, non-consuming on short
    /// input for the same reason as `parse_header`.
    pub fn parse_trailer<S: ByteSource + ?Sized>(source: &mut S) -> Option<u32> {
        if source.remaining() < 4 {
            return None;
        }
        let mut b = [0u8; 4];
        for slot in b.iter_mut() {
            *slot = source.next_byte().expect("remaining() already checked");
        }
        Some(u32::from_be_bytes(b))
    }
}

#[derive(PartialEq, Eq, Clone, Copy)]
enum ZlibPhase {
    Header,
    Body,
    Trailer,
    Done,
}

/// A convenience wrapper composing [`ZlibFramer`] around an [`Inflater`]
/// for callers who just want whole-stream zlib decompression without
/// driving the header/trailer split themselves.
pub struct ZlibDecoder {
    phase: ZlibPhase,
    inflater: Inflater,
    pub trailer_adler32: Option<u32>,
}

impl ZlibDecoder {
    pub fn new() -> Self {
        ZlibDecoder {
            phase: ZlibPhase::Header,
            inflater: Inflater::new(),
            trailer_adler32: None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.phase == ZlibPhase::Done
    }

    pub fn inflate<S: ByteSource + ?Sized, O: ByteSink + ?Sized>(
        &mut self,
        input: &mut S,
        output: &mut O,
    ) -> Result<InflateStatus, InvalidFormat> {
        if self.phase == ZlibPhase::Header {
            match ZlibFramer::parse_header(input)? {
                None => return Ok(InflateStatus::NeedMoreInput),
                Some(header) => {
                    safety_check!(
                        header.dict_id.is_none(),
                        "preset dictionaries are not supported"
                    );
                    self.phase = ZlibPhase::Body;
                }
            }
        }

        if self.phase == ZlibPhase::Body {
            match self.inflater.inflate(input, output)? {
                InflateStatus::Done => self.phase = ZlibPhase::Trailer,
                other => return Ok(other),
            }
        }

        if self.phase == ZlibPhase::Trailer {
            match ZlibFramer::parse_trailer(input) {
                None => return Ok(InflateStatus::NeedMoreInput),
                Some(adler32) => {
                    self.trailer_adler32 = Some(adler32);
                    self.phase = ZlibPhase::Done;
                }
            }
        }

        Ok(InflateStatus::Done)
    }
}

impl Default for ZlibDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{SliceSource, VecSink};

    #[test]
    fn header_rejects_non_deflate_method() {
        let mut src = SliceSource::new(&[0x01, 0x00]);
        assert!(ZlibFramer::parse_header(&mut src).is_err());
    }

    #[test]
    fn header_reports_short_input_without_consuming() {
        let mut src = SliceSource::new(&[0x78]);
        assert_eq!(ZlibFramer::parse_header(&mut src).unwrap(), None);
        assert_eq!(src.remaining(), 1);
    }

    #[test]
    fn full_zlib_round_trip() {
        // 0x78 0x9C: CMF=0x78 (CM=8, CINFO=7), FLG=0x9C, FCHECK makes
        // (0x78<<8|0x9C) % 31 == 0. Body: BFINAL=1, BTYPE=00 stored, empty.
        let mut data = vec![0x78, 0x9C, 0x01, 0x00, 0x00, 0xFF, 0xFF];
        data.extend_from_slice(&1u32.to_be_bytes());
        let mut src = SliceSource::new(&data);
        let mut sink = VecSink::new();
        let mut decoder = ZlibDecoder::new();
        let status = decoder.inflate(&mut src, &mut sink).unwrap();
        assert_eq!(status, InflateStatus::Done);
        assert!(sink.buf.is_empty());
        assert_eq!(decoder.trailer_adler32, Some(1));
    }

    #[test]
    fn nonzero_preset_dictionary_is_rejected() {
        // FLG with FDICT set (bit 5) requires recomputed FCHECK; use
        // CMF=0x78, FLG=0xBB (FDICT set, check passes: 0x78BB % 31 == 0).
        let mut data = vec![0x78, 0xBB];
        data.extend_from_slice(&42u32.to_be_bytes());
        let mut src = SliceSource::new(&data);
        let mut sink = VecSink::new();
        let mut decoder = ZlibDecoder::new();
        assert!(decoder.inflate(&mut src, &mut sink).is_err());
    }
}
