//! A streaming, pull-mode DEFLATE (RFC 1951) and zlib (RFC 1950) decoder.
//!
//! The defining property of this crate is that decoding never blocks on or
//! owns an I/O source: every call to [`Inflater::inflate`] or
//! [`ZlibDecoder::inflate`] borrows a [`ByteSource`]/[`ByteSink`] pair,
//! makes as much progress as the bytes on hand allow, and returns
//! [`InflateStatus::NeedMoreInput`] or [`InflateStatus::NeedMoreOutput`]
//! rather than looping on the caller's behalf. The caller owns the event
//! loop; this crate owns only the bit-level state needed to resume exactly
//! where it left off.
//!
//! What this crate does not do, by design: it does not read files or
//! sockets (bring your own [`ByteSource`]), does not verify the Adler-32
//! trailer of a zlib stream (it only hands the 4 bytes back — compute and
//! compare with whatever checksum crate you already use), does not support
//! preset dictionaries or gzip framing, and does not encode.

mod bitstream;
mod constants;
mod error;
mod huffman;
mod inflate;
mod io;
mod window;
mod zlib;

pub use error::InvalidFormat;
pub use inflate::{InflateStatus, Inflater};
pub use io::{ByteSink, ByteSource, SliceSink, SliceSource, VecSink};
pub use zlib::{ZlibDecoder, ZlibFramer, ZlibHeader};
