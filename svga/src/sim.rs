//! Simulated SVGA adapter for unit tests.
//!
//! `SimAdapter` answers port I/O like the virtual hardware: it latches the
//! register index, implements the ID negotiation rules for a fixed version
//! ceiling, and drains the shared FIFO when SYNC is requested. It journals
//! every register access so tests can assert exact sequencing.

use std::cell::RefCell;
use std::rc::Rc;

use crate::fifo::FifoMemory;
use crate::pio::PortIo;
use crate::port::RegisterPortPair;
use crate::regs::{fifo, id, reg};
use crate::serial::{COM1, COM1_LSR, LSR_TX_EMPTY};

/// One register transaction as seen by the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read(u32),
    Write(u32, u32),
}

/// FIFO region shared between the driver under test and the simulator.
#[derive(Debug, Clone)]
pub struct SimFifo {
    words: Rc<RefCell<Vec<u32>>>,
}

impl SimFifo {
    pub fn new(len_bytes: usize) -> Self {
        Self {
            words: Rc::new(RefCell::new(vec![0; len_bytes / 4])),
        }
    }

    /// Region laid out as the adapter would after FIFO init.
    pub fn with_ring(len_bytes: usize) -> Self {
        let sim = Self::new(len_bytes);
        let min = (fifo::NUM_REGS * 4) as u32;
        sim.set_control(min, len_bytes as u32, min, min);
        sim
    }

    pub fn set_control(&self, min: u32, max: u32, next_cmd: u32, stop: u32) {
        let mut words = self.words.borrow_mut();
        words[fifo::MIN] = min;
        words[fifo::MAX] = max;
        words[fifo::NEXT_CMD] = next_cmd;
        words[fifo::STOP] = stop;
    }

    pub fn word(&self, index: usize) -> u32 {
        self.words.borrow()[index]
    }

    pub fn set_word(&self, index: usize, value: u32) {
        self.words.borrow_mut()[index] = value;
    }

    pub fn min(&self) -> u32 {
        self.word(fifo::MIN)
    }

    pub fn max(&self) -> u32 {
        self.word(fifo::MAX)
    }

    pub fn next_cmd(&self) -> u32 {
        self.word(fifo::NEXT_CMD)
    }

    pub fn stop(&self) -> u32 {
        self.word(fifo::STOP)
    }
}

impl FifoMemory for SimFifo {
    fn len_words(&self) -> usize {
        self.words.borrow().len()
    }

    fn load(&self, index: usize) -> u32 {
        self.word(index)
    }

    fn store(&mut self, index: usize, value: u32) {
        self.set_word(index, value);
    }
}

struct State {
    /// `None` models an absent adapter: every read floats high.
    ceiling: Option<u32>,
    id_reg: u32,
    selected: u32,
    regs: [u32; 32],
    journal: Vec<Access>,
    raw_ports: Vec<(u16, u32)>,
    fifo: Option<SimFifo>,
    drain_rate: usize,
    stuck_busy: bool,
    sync_pending: bool,
    consumed: Vec<u32>,
    serial: Vec<u8>,
}

impl State {
    fn write_reg(&mut self, index: u32, value: u32) {
        match index {
            reg::ID => match self.ceiling {
                Some(ceiling) if ceiling != id::V0 => {
                    self.id_reg = if (id::V0..=ceiling).contains(&value) {
                        value
                    } else {
                        ceiling
                    };
                }
                _ => {}
            },
            reg::SYNC => {
                if value != 0 {
                    self.sync_pending = true;
                }
                self.regs[reg::SYNC as usize] = value;
            }
            _ => {
                if let Some(slot) = self.regs.get_mut(index as usize) {
                    *slot = value;
                }
            }
        }
    }

    fn read_reg(&mut self, index: u32) -> u32 {
        if self.ceiling.is_none() {
            return id::INVALID;
        }
        match index {
            reg::ID => self.id_reg,
            reg::BUSY => {
                if self.stuck_busy {
                    return 1;
                }
                if !self.sync_pending {
                    return 0;
                }
                let rate = self.drain_rate;
                self.drain(rate);
                let busy = self
                    .fifo
                    .as_ref()
                    .map(|f| f.stop() != f.next_cmd())
                    .unwrap_or(false);
                if !busy {
                    self.sync_pending = false;
                }
                busy as u32
            }
            _ => self.regs.get(index as usize).copied().unwrap_or(0),
        }
    }

    fn drain(&mut self, words: usize) {
        let Some(ring) = self.fifo.as_ref() else {
            return;
        };
        let (min, max, next) = (ring.min(), ring.max(), ring.next_cmd());
        let mut stop = ring.stop();
        let mut taken = 0;
        while stop != next && taken < words {
            self.consumed.push(ring.word(stop as usize / 4));
            stop += 4;
            if stop == max {
                stop = min;
            }
            taken += 1;
        }
        ring.set_word(fifo::STOP, stop);
    }
}

/// Handle to a simulated adapter. Clones share state.
#[derive(Clone)]
pub struct SimAdapter {
    state: Rc<RefCell<State>>,
}

impl SimAdapter {
    pub const PAIR: RegisterPortPair = RegisterPortPair::new(0xC040, 0xC041);

    /// Adapter supporting versions up to `ceiling`.
    pub fn new(ceiling: u32) -> Self {
        Self::build(Some(ceiling))
    }

    /// Nothing behind the ports.
    pub fn absent() -> Self {
        Self::build(None)
    }

    fn build(ceiling: Option<u32>) -> Self {
        Self {
            state: Rc::new(RefCell::new(State {
                ceiling,
                id_reg: id::V0,
                selected: 0,
                regs: [0; 32],
                journal: Vec::new(),
                raw_ports: Vec::new(),
                fifo: None,
                drain_rate: usize::MAX,
                stuck_busy: false,
                sync_pending: false,
                consumed: Vec::new(),
                serial: Vec::new(),
            })),
        }
    }

    /// Attach the FIFO region the adapter consumes from.
    pub fn with_fifo(self, ring: &SimFifo) -> Self {
        self.state.borrow_mut().fifo = Some(ring.clone());
        self
    }

    /// Words consumed per BUSY poll while a SYNC is pending.
    pub fn set_drain_rate(&self, words: usize) {
        self.state.borrow_mut().drain_rate = words;
    }

    /// Keep BUSY raised forever.
    pub fn set_stuck_busy(&self, stuck: bool) {
        self.state.borrow_mut().stuck_busy = stuck;
    }

    pub fn set_reg(&self, index: u32, value: u32) {
        self.state.borrow_mut().regs[index as usize] = value;
    }

    pub fn reg(&self, index: u32) -> u32 {
        self.state.borrow().regs[index as usize]
    }

    /// Consume up to `words` pending commands outside of a SYNC.
    pub fn consume(&self, words: usize) {
        self.state.borrow_mut().drain(words);
    }

    pub fn journal(&self) -> Vec<Access> {
        self.state.borrow().journal.clone()
    }

    pub fn clear_journal(&self) {
        let mut state = self.state.borrow_mut();
        state.journal.clear();
        state.raw_ports.clear();
    }

    /// Every `outl` as (port, value).
    pub fn raw_ports(&self) -> Vec<(u16, u32)> {
        self.state.borrow().raw_ports.clone()
    }

    pub fn sync_writes(&self) -> usize {
        self.journal()
            .iter()
            .filter(|a| **a == Access::Write(reg::SYNC, 1))
            .count()
    }

    pub fn busy_polls(&self) -> usize {
        self.journal()
            .iter()
            .filter(|a| **a == Access::Read(reg::BUSY))
            .count()
    }

    /// Command words the adapter has consumed, in order.
    pub fn consumed(&self) -> Vec<u32> {
        self.state.borrow().consumed.clone()
    }

    pub fn serial_output(&self) -> Vec<u8> {
        self.state.borrow().serial.clone()
    }
}

impl PortIo for SimAdapter {
    fn outl(&mut self, port: u16, value: u32) {
        let mut state = self.state.borrow_mut();
        state.raw_ports.push((port, value));
        if port == Self::PAIR.index {
            state.selected = value;
        } else if port == Self::PAIR.value {
            let index = state.selected;
            state.journal.push(Access::Write(index, value));
            state.write_reg(index, value);
        }
    }

    fn inl(&mut self, port: u16) -> u32 {
        let mut state = self.state.borrow_mut();
        if port != Self::PAIR.value {
            return 0xFFFF_FFFF;
        }
        let index = state.selected;
        state.journal.push(Access::Read(index));
        state.read_reg(index)
    }

    fn outb(&mut self, port: u16, value: u8) {
        if port == COM1 {
            self.state.borrow_mut().serial.push(value);
        }
    }

    fn inb(&mut self, port: u16) -> u8 {
        if port == COM1_LSR {
            LSR_TX_EMPTY
        } else {
            0xFF
        }
    }
}
