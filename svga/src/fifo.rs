//! FIFO command queue.
//!
//! The FIFO is a region of memory shared with the adapter. Its first four
//! words are control slots holding byte offsets:
//!
//! ```text
//!  word 0   MIN       first byte of the ring
//!  word 1   MAX       one past the last byte of the ring
//!  word 2   NEXT_CMD  where the driver writes next
//!  word 3   STOP      where the adapter reads next
//!  [MIN, MAX)         command words
//! ```
//!
//! The driver is the only producer and owns NEXT_CMD. The adapter is the
//! only consumer and owns STOP, so STOP is re-read at every check. When the
//! next write would catch up with STOP the driver raises SYNC and spins on
//! BUSY until the adapter has drained the ring.
//!
//! Multi-word commands get no atomicity here; each word is individually
//! ring-safe and committed as soon as NEXT_CMD moves.

use core::ptr::NonNull;
use core::sync::atomic::{fence, Ordering};

use log::{trace, warn};

use crate::error::{Result, SvgaError};
use crate::pio::PortIo;
use crate::port::RegisterPort;
use crate::regs::{fifo, reg};

/// Size of one command word in bytes.
pub const WORD_SIZE: u32 = core::mem::size_of::<u32>() as u32;

/// First usable ring offset after FIFO init.
pub const RING_START: u32 = fifo::NUM_REGS as u32 * WORD_SIZE;

/// Smallest ring that can hold a word without NEXT_CMD wrapping onto STOP.
pub const MIN_RING_WORDS: u32 = 2;

/// Smallest FIFO region accepted by [`FifoQueue::init`].
pub const MIN_FIFO_BYTES: u32 = RING_START + MIN_RING_WORDS * WORD_SIZE;

// ═══════════════════════════════════════════════════════════════════════════
// MEMORY
// ═══════════════════════════════════════════════════════════════════════════

/// Word-addressed access to the FIFO region.
pub trait FifoMemory {
    /// Region length in 32-bit words.
    fn len_words(&self) -> usize;

    /// Read word `index`.
    fn load(&self, index: usize) -> u32;

    /// Write word `index`.
    fn store(&mut self, index: usize, value: u32);
}

/// FIFO region mapped from the adapter's memory BAR.
pub struct MappedFifo {
    base: NonNull<u32>,
    words: usize,
}

// Safety: the mapping is device memory owned by this driver instance.
unsafe impl Send for MappedFifo {}

impl MappedFifo {
    /// Wrap a mapped FIFO region.
    ///
    /// # Safety
    /// `base` must be valid for volatile reads and writes of `len_bytes`
    /// bytes for the lifetime of the returned value, and nothing else in
    /// this address space may write to the ring.
    pub unsafe fn new(base: NonNull<u32>, len_bytes: usize) -> Self {
        Self {
            base,
            words: len_bytes / WORD_SIZE as usize,
        }
    }
}

impl FifoMemory for MappedFifo {
    fn len_words(&self) -> usize {
        self.words
    }

    #[inline]
    fn load(&self, index: usize) -> u32 {
        debug_assert!(index < self.words);
        unsafe { core::ptr::read_volatile(self.base.as_ptr().add(index)) }
    }

    #[inline]
    fn store(&mut self, index: usize, value: u32) {
        debug_assert!(index < self.words);
        unsafe { core::ptr::write_volatile(self.base.as_ptr().add(index), value) }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// DRAIN
// ═══════════════════════════════════════════════════════════════════════════

/// How to wait for the adapter to drain the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainPolicy {
    /// Spin-loop hints between BUSY polls.
    pub pause_spins: u32,
    /// Give up after this many polls. `None` waits forever.
    pub max_polls: Option<u32>,
}

impl DrainPolicy {
    /// Poll until the adapter drains, however long that takes.
    pub const UNBOUNDED: Self = Self {
        pause_spins: 0,
        max_polls: None,
    };

    /// Fail with [`SvgaError::DrainTimeout`] after `max_polls` busy reads.
    pub const fn bounded(max_polls: u32) -> Self {
        Self {
            pause_spins: 0,
            max_polls: Some(max_polls),
        }
    }

    pub const fn with_pause(mut self, spins: u32) -> Self {
        self.pause_spins = spins;
        self
    }
}

impl Default for DrainPolicy {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

/// Ask the adapter to process everything queued so far.
pub fn request_sync<P: PortIo>(regs: &RegisterPort<P>) {
    regs.write(reg::SYNC, 1);
}

/// Spin on BUSY until it reads zero.
///
/// Returns the number of BUSY reads performed.
pub fn wait_until_drained<P: PortIo>(
    regs: &RegisterPort<P>,
    policy: &DrainPolicy,
) -> Result<u32> {
    let mut polls: u32 = 0;
    loop {
        polls = polls.saturating_add(1);
        if regs.read(reg::BUSY) == 0 {
            return Ok(polls);
        }
        if let Some(max) = policy.max_polls {
            if polls >= max {
                warn!("SVGA: adapter still busy after {} polls", polls);
                return Err(SvgaError::DrainTimeout { polls });
            }
        }
        for _ in 0..policy.pause_spins {
            core::hint::spin_loop();
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// QUEUE
// ═══════════════════════════════════════════════════════════════════════════

/// Producer-side counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FifoStats {
    /// Words committed to the ring.
    pub words: u64,
    /// SYNC requests issued (ring full or explicit flush).
    pub syncs: u32,
    /// Times NEXT_CMD wrapped from MAX back to MIN.
    pub wraps: u32,
}

/// Producer half of the command FIFO.
pub struct FifoQueue<M: FifoMemory> {
    mem: M,
    drain: DrainPolicy,
    stats: FifoStats,
}

impl<M: FifoMemory> FifoQueue<M> {
    /// Adopt a ring whose control words are already set up.
    pub fn new(mem: M, drain: DrainPolicy) -> Result<Self> {
        let queue = Self {
            mem,
            drain,
            stats: FifoStats::default(),
        };
        queue.validate()?;
        Ok(queue)
    }

    /// Lay out an empty ring covering the whole region.
    ///
    /// MIN sits right after the control words, MAX at the end of the
    /// region, and NEXT_CMD = STOP = MIN. The ring needs two slots: with
    /// one, NEXT_CMD wraps onto STOP and the word is never seen.
    pub fn init(mut mem: M, drain: DrainPolicy) -> Result<Self> {
        let len_bytes = mem.len_words() * WORD_SIZE as usize;
        if len_bytes < MIN_FIFO_BYTES as usize || len_bytes > u32::MAX as usize {
            return Err(SvgaError::FifoTooSmall);
        }
        mem.store(fifo::MIN, RING_START);
        mem.store(fifo::MAX, len_bytes as u32);
        mem.store(fifo::NEXT_CMD, RING_START);
        mem.store(fifo::STOP, RING_START);
        fence(Ordering::SeqCst);

        Ok(Self {
            mem,
            drain,
            stats: FifoStats::default(),
        })
    }

    fn validate(&self) -> Result<()> {
        let len = self.mem.len_words() * WORD_SIZE as usize;
        if len < RING_START as usize {
            return Err(SvgaError::FifoTooSmall);
        }
        let (min, max) = (self.min(), self.max());
        let bounds_ok = min % WORD_SIZE == 0
            && max % WORD_SIZE == 0
            && min >= RING_START
            && min < max
            && max - min >= MIN_RING_WORDS * WORD_SIZE
            && max as usize <= len;
        let in_ring = |offset: u32| offset >= min && offset < max && offset % WORD_SIZE == 0;
        if !bounds_ok || !in_ring(self.next_cmd()) || !in_ring(self.stop()) {
            return Err(SvgaError::InvalidFifoBounds { min, max, len });
        }
        Ok(())
    }

    pub fn min(&self) -> u32 {
        self.mem.load(fifo::MIN)
    }

    pub fn max(&self) -> u32 {
        self.mem.load(fifo::MAX)
    }

    pub fn next_cmd(&self) -> u32 {
        self.mem.load(fifo::NEXT_CMD)
    }

    /// Adapter read offset, freshly read.
    pub fn stop(&self) -> u32 {
        self.mem.load(fifo::STOP)
    }

    /// Ring capacity in words.
    pub fn capacity_words(&self) -> usize {
        (self.max().saturating_sub(self.min()) / WORD_SIZE) as usize
    }

    pub fn stats(&self) -> FifoStats {
        self.stats
    }

    pub fn drain_policy(&self) -> DrainPolicy {
        self.drain
    }

    pub fn set_drain_policy(&mut self, drain: DrainPolicy) {
        self.drain = drain;
    }

    pub fn memory(&self) -> &M {
        &self.mem
    }

    /// Would writing one more word run into the adapter's read pointer?
    ///
    /// Either the slot after NEXT_CMD is STOP, or NEXT_CMD is the last slot
    /// and the wrap target MIN is STOP.
    pub fn would_collide(&self) -> bool {
        let next = self.next_cmd();
        let stop = self.stop();
        next.wrapping_add(WORD_SIZE) == stop
            || (next == self.max().wrapping_sub(WORD_SIZE) && stop == self.min())
    }

    /// Append one command word.
    ///
    /// Blocks in [`wait_until_drained`] when the ring is full. Only a
    /// bounded drain policy can make this fail, in which case nothing is
    /// written.
    pub fn write_word<P: PortIo>(&mut self, regs: &RegisterPort<P>, value: u32) -> Result<()> {
        if self.would_collide() {
            trace!(
                "SVGA: FIFO full (next={:#x} stop={:#x}), syncing",
                self.next_cmd(),
                self.stop()
            );
            self.sync(regs)?;
        }

        let next = self.next_cmd();
        self.mem.store((next / WORD_SIZE) as usize, value);
        fence(Ordering::SeqCst);

        let mut next = next + WORD_SIZE;
        if next == self.max() {
            next = self.min();
            self.stats.wraps += 1;
        }
        self.mem.store(fifo::NEXT_CMD, next);
        self.stats.words += 1;
        Ok(())
    }

    /// Append a command and its operands word by word.
    pub fn write_words<P: PortIo>(
        &mut self,
        regs: &RegisterPort<P>,
        words: &[u32],
    ) -> Result<()> {
        for &word in words {
            self.write_word(regs, word)?;
        }
        Ok(())
    }

    /// Raise SYNC and wait for the adapter to go idle.
    pub fn sync<P: PortIo>(&mut self, regs: &RegisterPort<P>) -> Result<u32> {
        self.stats.syncs += 1;
        request_sync(regs);
        wait_until_drained(regs, &self.drain)
    }
}
