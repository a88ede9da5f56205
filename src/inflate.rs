//! The resumable DEFLATE state machine.
//!
//! Grounded in the teacher's `decompress_deflate.rs` for the overall shape
//! of a block loop driving a history window, but restructured from a single
//! run-to-completion function into an explicit, step-at-a-time phase enum:
//! each call to [`Inflater::inflate`] makes as much progress as the input
//! and output it's given allow, then returns a status the caller re-invokes
//! against once more of either is available. Nothing here ever blocks or
//! loops on I/O itself — the phase fields are exactly the state a coroutine
//! would otherwise have captured in its suspended stack.

use std::sync::OnceLock;

use crate::bitstream::BitReader;
use crate::constants::*;
use crate::error::{safety_check, InvalidFormat};
use crate::huffman::HuffmanTable;
use crate::io::{ByteSink, ByteSource};
use crate::window::HistoryWindow;

/// Result of a call to [`Inflater::inflate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InflateStatus {
    /// The input was fully consumed before a block boundary; call again
    /// with more input appended.
    NeedMoreInput,
    /// The output sink filled up before decoding could finish; call again
    /// once the caller has drained what was written.
    NeedMoreOutput,
    /// The final block has been fully decoded and flushed.
    Done,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Phase {
    ReadNextBlock,
    ProcessStoredBlock,
    ReadDynamicHeader,
    ProcessLenSymbol,
    ProcessDistSymbol,
    ProcessCopy,
    Done,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum DynStage {
    Counts,
    PrecodeLens,
    Lengths,
}

enum LitLenTable {
    Fixed,
    Dynamic(HuffmanTable),
}

impl LitLenTable {
    fn get(&self) -> &HuffmanTable {
        match self {
            LitLenTable::Fixed => fixed_litlen_table(),
            LitLenTable::Dynamic(t) => t,
        }
    }
}

enum DistTable {
    Fixed,
    Dynamic(HuffmanTable),
}

impl DistTable {
    fn get(&self) -> &HuffmanTable {
        match self {
            DistTable::Fixed => fixed_dist_table(),
            DistTable::Dynamic(t) => t,
        }
    }
}

enum StepResult {
    Continue,
    NeedMoreInput,
    Done,
}

/// A streaming, pull-mode DEFLATE (RFC 1951) decompressor.
///
/// Decoding never owns or blocks on an input/output pair: each call to
/// [`inflate`](Self::inflate) borrows a [`ByteSource`] and [`ByteSink`] just
/// long enough to make progress, then hands control back. All state needed
/// to resume sits in `self`.
pub struct Inflater {
    phase: Phase,
    bit_acc: u64,
    bit_count: u32,
    final_block: bool,

    stored_header_buf: [u8; 4],
    stored_header_progress: u8,
    stored_remaining: u16,

    dyn_stage: DynStage,
    dyn_hlit: usize,
    dyn_hdist: usize,
    dyn_hclen: usize,
    dyn_precode_idx: usize,
    dyn_precode_lens: [u8; NUM_PRECODE_SYMS],
    precode_table: HuffmanTable,
    dyn_lens: Vec<u8>,
    dyn_lens_idx: usize,

    litlen_table: LitLenTable,
    dist_table: DistTable,

    litlen_extra_pending: Option<usize>,
    dist_extra_pending: Option<usize>,
    pending_length: usize,
    pending_distance: usize,

    history: HistoryWindow,
}

impl Inflater {
    pub fn new() -> Self {
        Inflater {
            phase: Phase::ReadNextBlock,
            bit_acc: 0,
            bit_count: 0,
            final_block: false,
            stored_header_buf: [0; 4],
            stored_header_progress: 0,
            stored_remaining: 0,
            dyn_stage: DynStage::Counts,
            dyn_hlit: 0,
            dyn_hdist: 0,
            dyn_hclen: 0,
            dyn_precode_idx: 0,
            dyn_precode_lens: [0; NUM_PRECODE_SYMS],
            precode_table: HuffmanTable::empty(),
            dyn_lens: Vec::new(),
            dyn_lens_idx: 0,
            litlen_table: LitLenTable::Fixed,
            dist_table: DistTable::Fixed,
            litlen_extra_pending: None,
            dist_extra_pending: None,
            pending_length: 0,
            pending_distance: 0,
            history: HistoryWindow::new(),
        }
    }

    /// Reset to the initial state so the same allocation (window buffer,
    /// scratch vectors) can decode another stream from scratch.
    pub fn reset(&mut self) {
        *self = Inflater::new();
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Decode as much as `input` and `output` allow right now.
    pub fn inflate<S: ByteSource + ?Sized, O: ByteSink + ?Sized>(
        &mut self,
        input: &mut S,
        output: &mut O,
    ) -> Result<InflateStatus, InvalidFormat> {
        loop {
            if !self.history.write_to(output) {
                return Ok(InflateStatus::NeedMoreOutput);
            }
            if self.phase == Phase::Done {
                return Ok(InflateStatus::Done);
            }

            let mut bits = BitReader::new(self.bit_acc, self.bit_count, input);
            let result = self.step(&mut bits);
            let (acc, count) = bits.into_parts();
            self.bit_acc = acc;
            self.bit_count = count;

            match result? {
                StepResult::Continue => continue,
                StepResult::NeedMoreInput => return Ok(InflateStatus::NeedMoreInput),
                StepResult::Done => {
                    self.phase = Phase::Done;
                    continue;
                }
            }
        }
    }

    fn step<S: ByteSource + ?Sized>(
        &mut self,
        bits: &mut BitReader<S>,
    ) -> Result<StepResult, InvalidFormat> {
        match self.phase {
            Phase::ReadNextBlock => self.read_next_block(bits),
            Phase::ProcessStoredBlock => self.process_stored_block(bits),
            Phase::ReadDynamicHeader => self.read_dynamic_header(bits),
            Phase::ProcessLenSymbol => self.process_len_symbol(bits),
            Phase::ProcessDistSymbol => self.process_dist_symbol(bits),
            Phase::ProcessCopy => self.process_copy(),
            Phase::Done => Ok(StepResult::Done),
        }
    }

    fn read_next_block<S: ByteSource + ?Sized>(
        &mut self,
        bits: &mut BitReader<S>,
    ) -> Result<StepResult, InvalidFormat> {
        if !bits.ensure(3) {
            return Ok(StepResult::NeedMoreInput);
        }
        let header = bits.peek(3);
        bits.consume(3);
        self.final_block = (header & 1) != 0;
        match header >> 1 {
            BLOCKTYPE_STORED => {
                bits.align_to_byte();
                self.stored_header_progress = 0;
                self.phase = Phase::ProcessStoredBlock;
            }
            BLOCKTYPE_STATIC => {
                self.litlen_table = LitLenTable::Fixed;
                self.dist_table = DistTable::Fixed;
                self.phase = Phase::ProcessLenSymbol;
            }
            BLOCKTYPE_DYNAMIC => {
                self.dyn_stage = DynStage::Counts;
                self.phase = Phase::ReadDynamicHeader;
            }
            _ => return Err(InvalidFormat::new("reserved block type 3")),
        }
        Ok(StepResult::Continue)
    }

    fn process_stored_block<S: ByteSource + ?Sized>(
        &mut self,
        bits: &mut BitReader<S>,
    ) -> Result<StepResult, InvalidFormat> {
        if self.stored_header_progress < 4 {
            let mut tmp = [0u8; 4];
            let want = 4 - self.stored_header_progress as usize;
            let got = bits.read_aligned(&mut tmp[..want]);
            let at = self.stored_header_progress as usize;
            self.stored_header_buf[at..at + got].copy_from_slice(&tmp[..got]);
            self.stored_header_progress += got as u8;
            if self.stored_header_progress < 4 {
                return Ok(StepResult::NeedMoreInput);
            }
            let len = u16::from_le_bytes([self.stored_header_buf[0], self.stored_header_buf[1]]);
            let nlen = u16::from_le_bytes([self.stored_header_buf[2], self.stored_header_buf[3]]);
            safety_check!(len == !nlen, "stored block LEN does not match ~NLEN");
            self.stored_remaining = len;
        }

        let mut scratch = [0u8; 512];
        while self.stored_remaining > 0 {
            let want = (self.stored_remaining as usize)
                .min(scratch.len())
                .min(self.history.write_available());
            if want == 0 {
                // Window filled within this single call (LEN can exceed the
                // window's own size); let the outer loop drain and resume.
                return Ok(StepResult::Continue);
            }
            let got = bits.read_aligned(&mut scratch[..want]);
            if got == 0 {
                return Ok(StepResult::NeedMoreInput);
            }
            let written = self.history.write_from(&scratch[..got]);
            debug_assert_eq!(written, got);
            self.stored_remaining -= got as u16;
        }

        self.stored_header_progress = 0;
        if self.final_block {
            return Ok(StepResult::Done);
        }
        self.phase = Phase::ReadNextBlock;
        Ok(StepResult::Continue)
    }

    fn read_dynamic_header<S: ByteSource + ?Sized>(
        &mut self,
        bits: &mut BitReader<S>,
    ) -> Result<StepResult, InvalidFormat> {
        if self.dyn_stage == DynStage::Counts {
            if !bits.ensure(5 + 5 + 4) {
                return Ok(StepResult::NeedMoreInput);
            }
            self.dyn_hlit = bits.take(5) as usize + 257;
            self.dyn_hdist = bits.take(5) as usize + 1;
            self.dyn_hclen = bits.take(4) as usize + 4;
            safety_check!(self.dyn_hlit <= MAX_HLIT, "HLIT exceeds the literal/length alphabet");
            safety_check!(self.dyn_hdist <= MAX_HDIST, "HDIST exceeds the distance alphabet");
            self.dyn_precode_lens = [0; NUM_PRECODE_SYMS];
            self.dyn_precode_idx = 0;
            self.dyn_stage = DynStage::PrecodeLens;
        }

        if self.dyn_stage == DynStage::PrecodeLens {
            while self.dyn_precode_idx < self.dyn_hclen {
                if !bits.ensure(3) {
                    return Ok(StepResult::NeedMoreInput);
                }
                let len = bits.take(3) as u8;
                let order = PRECODE_LENS_ORDER[self.dyn_precode_idx] as usize;
                self.dyn_precode_lens[order] = len;
                self.dyn_precode_idx += 1;
            }
            self.precode_table =
                HuffmanTable::build(&self.dyn_precode_lens, MAX_PRECODE_CODEWORD_LEN)?;
            self.dyn_lens = vec![0u8; self.dyn_hlit + self.dyn_hdist];
            self.dyn_lens_idx = 0;
            self.dyn_stage = DynStage::Lengths;
        }

        while self.dyn_lens_idx < self.dyn_lens.len() {
            let decoded = match self.precode_table.lookup(bits)? {
                Some(d) => d,
                None => return Ok(StepResult::NeedMoreInput),
            };
            match decoded.symbol {
                0..=15 => {
                    bits.consume(decoded.length as u32);
                    self.dyn_lens[self.dyn_lens_idx] = decoded.symbol as u8;
                    self.dyn_lens_idx += 1;
                }
                16 => {
                    if !bits.ensure(decoded.length as u32 + 2) {
                        return Ok(StepResult::NeedMoreInput);
                    }
                    safety_check!(self.dyn_lens_idx > 0, "repeat-previous code with no previous length");
                    bits.consume(decoded.length as u32);
                    let count = bits.take(2) as usize + 3;
                    let prev = self.dyn_lens[self.dyn_lens_idx - 1];
                    safety_check!(
                        self.dyn_lens_idx + count <= self.dyn_lens.len(),
                        "code-length repeat run overflows the alphabet"
                    );
                    for _ in 0..count {
                        self.dyn_lens[self.dyn_lens_idx] = prev;
                        self.dyn_lens_idx += 1;
                    }
                }
                17 => {
                    if !bits.ensure(decoded.length as u32 + 3) {
                        return Ok(StepResult::NeedMoreInput);
                    }
                    bits.consume(decoded.length as u32);
                    let count = bits.take(3) as usize + 3;
                    safety_check!(
                        self.dyn_lens_idx + count <= self.dyn_lens.len(),
                        "code-length zero run overflows the alphabet"
                    );
                    for _ in 0..count {
                        self.dyn_lens[self.dyn_lens_idx] = 0;
                        self.dyn_lens_idx += 1;
                    }
                }
                18 => {
                    if !bits.ensure(decoded.length as u32 + 7) {
                        return Ok(StepResult::NeedMoreInput);
                    }
                    bits.consume(decoded.length as u32);
                    let count = bits.take(7) as usize + 11;
                    safety_check!(
                        self.dyn_lens_idx + count <= self.dyn_lens.len(),
                        "code-length zero run overflows the alphabet"
                    );
                    for _ in 0..count {
                        self.dyn_lens[self.dyn_lens_idx] = 0;
                        self.dyn_lens_idx += 1;
                    }
                }
                _ => return Err(InvalidFormat::new("invalid code-length symbol")),
            }
        }

        let litlen_lens = &self.dyn_lens[..self.dyn_hlit];
        let dist_lens = &self.dyn_lens[self.dyn_hlit..];
        self.litlen_table =
            LitLenTable::Dynamic(HuffmanTable::build(litlen_lens, MAX_LITLEN_CODEWORD_LEN)?);
        self.dist_table =
            DistTable::Dynamic(HuffmanTable::build(dist_lens, MAX_OFFSET_CODEWORD_LEN)?);
        self.dyn_lens = Vec::new();
        self.phase = Phase::ProcessLenSymbol;
        Ok(StepResult::Continue)
    }

    fn process_len_symbol<S: ByteSource + ?Sized>(
        &mut self,
        bits: &mut BitReader<S>,
    ) -> Result<StepResult, InvalidFormat> {
        if let Some(idx) = self.litlen_extra_pending.take() {
            return self.finish_len_extra(bits, idx);
        }

        let decoded = match self.litlen_table.get().lookup(bits)? {
            Some(d) => d,
            None => return Ok(StepResult::NeedMoreInput),
        };
        match decoded.symbol {
            0..=255 => {
                bits.consume(decoded.length as u32);
                self.history.write(decoded.symbol as u8);
                Ok(StepResult::Continue)
            }
            256 => {
                bits.consume(decoded.length as u32);
                if self.final_block {
                    Ok(StepResult::Done)
                } else {
                    self.phase = Phase::ReadNextBlock;
                    Ok(StepResult::Continue)
                }
            }
            257..=285 => {
                bits.consume(decoded.length as u32);
                let idx = (decoded.symbol - 257) as usize;
                self.finish_len_extra(bits, idx)
            }
            _ => Err(InvalidFormat::new("invalid literal/length symbol")),
        }
    }

    fn finish_len_extra<S: ByteSource + ?Sized>(
        &mut self,
        bits: &mut BitReader<S>,
        idx: usize,
    ) -> Result<StepResult, InvalidFormat> {
        safety_check!(idx < LENGTH_BASE.len(), "invalid length symbol");
        let extra_bits = LENGTH_EXTRA_BITS[idx] as u32;
        if !bits.ensure(extra_bits) {
            self.litlen_extra_pending = Some(idx);
            return Ok(StepResult::NeedMoreInput);
        }
        let extra = bits.take(extra_bits);
        self.pending_length = LENGTH_BASE[idx] as usize + extra as usize;
        self.phase = Phase::ProcessDistSymbol;
        Ok(StepResult::Continue)
    }

    fn process_dist_symbol<S: ByteSource + ?Sized>(
        &mut self,
        bits: &mut BitReader<S>,
    ) -> Result<StepResult, InvalidFormat> {
        if let Some(idx) = self.dist_extra_pending.take() {
            return self.finish_dist_extra(bits, idx);
        }

        let decoded = match self.dist_table.get().lookup(bits)? {
            Some(d) => d,
            None => return Ok(StepResult::NeedMoreInput),
        };
        let idx = decoded.symbol as usize;
        bits.consume(decoded.length as u32);
        self.finish_dist_extra(bits, idx)
    }

    fn finish_dist_extra<S: ByteSource + ?Sized>(
        &mut self,
        bits: &mut BitReader<S>,
        idx: usize,
    ) -> Result<StepResult, InvalidFormat> {
        safety_check!(idx < DIST_BASE.len(), "invalid distance symbol");
        let extra_bits = DIST_EXTRA_BITS[idx] as u32;
        if !bits.ensure(extra_bits) {
            self.dist_extra_pending = Some(idx);
            return Ok(StepResult::NeedMoreInput);
        }
        let extra = bits.take(extra_bits);
        let distance = DIST_BASE[idx] as usize + extra as usize;
        safety_check!(
            distance <= self.history.history_size(),
            "distance refers before the start of the output"
        );
        self.pending_distance = distance;
        self.phase = Phase::ProcessCopy;
        Ok(StepResult::Continue)
    }

    fn process_copy(&mut self) -> Result<StepResult, InvalidFormat> {
        let n = self.history.write_copy(self.pending_distance, self.pending_length);
        if n < self.pending_length {
            self.pending_length -= n;
            return Ok(StepResult::Continue);
        }
        self.phase = Phase::ProcessLenSymbol;
        Ok(StepResult::Continue)
    }
}

impl Default for Inflater {
    fn default() -> Self {
        Self::new()
    }
}

fn fixed_litlen_table() -> &'static HuffmanTable {
    static TABLE: OnceLock<HuffmanTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut lens = [0u8; NUM_LITLEN_SYMS];
        lens[0..144].fill(8);
        lens[144..256].fill(9);
        lens[256..280].fill(7);
        lens[280..288].fill(8);
        HuffmanTable::build(&lens, MAX_LITLEN_CODEWORD_LEN).expect("fixed literal/length code is always valid")
    })
}

fn fixed_dist_table() -> &'static HuffmanTable {
    static TABLE: OnceLock<HuffmanTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        let lens = [5u8; NUM_OFFSET_SYMS];
        HuffmanTable::build(&lens, MAX_OFFSET_CODEWORD_LEN).expect("fixed distance code is always valid")
    })
}
