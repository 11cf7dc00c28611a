//! Readiness-driven read/write transfer of one period at a time.

use crate::device::{PcmDevice, Readiness, ReadinessWait};
use crate::error::{Error, Result};
use crate::hw::options::TransferOptions;
use crate::params::{Access, Direction};
use crate::sizing::PeriodLayout;
use nix::errno::Errno;
use serde::Serialize;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tracing::{debug, error, trace, warn};

/// Cooperative stop request, observed at every readiness wait.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
enum PeriodBuffer {
    Interleaved(Vec<u8>),
    NonInterleaved(Vec<Vec<u8>>),
}

/// The buffer and geometry for one substream's transfers.
#[derive(Debug)]
pub struct TransferSession {
    buffer: PeriodBuffer,
    frames: usize,
    direction: Direction,
    access: Access,
}

impl TransferSession {
    pub fn new(layout: &PeriodLayout, direction: Direction, access: Access) -> Result<Self> {
        // Playback sends the initial contents as is, so start from silence.
        let buffer = match access {
            Access::RwInterleaved => {
                PeriodBuffer::Interleaved(layout.silence(layout.buffer_bytes()))
            }
            Access::RwNoninterleaved => PeriodBuffer::NonInterleaved(
                (0..layout.channels)
                    .map(|_| layout.silence(layout.channel_bytes()))
                    .collect(),
            ),
            _ => return Err(Error::UnsupportedAccessMode(vec![access])),
        };
        Ok(Self {
            buffer,
            frames: layout.frames,
            direction,
            access,
        })
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn frames_per_period(&self) -> usize {
        self.frames
    }

    pub fn byte_len(&self) -> usize {
        match &self.buffer {
            PeriodBuffer::Interleaved(buf) => buf.len(),
            PeriodBuffer::NonInterleaved(bufs) => bufs.iter().map(Vec::len).sum(),
        }
    }

    fn op(&self) -> &'static str {
        match (&self.buffer, self.direction) {
            (PeriodBuffer::Interleaved(_), Direction::Playback) => "WRITEI_FRAMES",
            (PeriodBuffer::Interleaved(_), Direction::Capture) => "READI_FRAMES",
            (PeriodBuffer::NonInterleaved(_), Direction::Playback) => "WRITEN_FRAMES",
            (PeriodBuffer::NonInterleaved(_), Direction::Capture) => "READN_FRAMES",
        }
    }

    fn transfer<D: PcmDevice>(&mut self, device: &mut D) -> std::result::Result<usize, Errno> {
        match &mut self.buffer {
            PeriodBuffer::Interleaved(buf) => {
                device.transfer_interleaved(self.direction, buf, self.frames)
            }
            PeriodBuffer::NonInterleaved(bufs) => {
                device.transfer_noninterleaved(self.direction, bufs, self.frames)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Prepared,
    Running,
    Recovering,
    Stopped,
}

/// Counters of one transfer loop run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransferStats {
    pub waits: u64,
    pub timeouts: u64,
    pub interrupts: u64,
    pub transfers: u64,
    pub frames: u64,
    pub xruns: u64,
}

/// How a failed transfer is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferFault {
    Underrun,
    Overrun,
    Interrupted,
    Other(Errno),
}

impl TransferFault {
    pub fn classify(errno: Errno, direction: Direction) -> Self {
        match (errno, direction) {
            (Errno::EPIPE, Direction::Playback) => TransferFault::Underrun,
            (Errno::EPIPE, Direction::Capture) => TransferFault::Overrun,
            (Errno::EINTR, _) => TransferFault::Interrupted,
            (errno, _) => TransferFault::Other(errno),
        }
    }
}

/// Drives one substream from prepare until cancellation or a fatal error.
pub struct TransferLoop<'a, D: PcmDevice> {
    device: &'a mut D,
    session: TransferSession,
    options: TransferOptions,
    cancel: CancelToken,
    state: LoopState,
    stats: TransferStats,
}

impl<'a, D: PcmDevice> TransferLoop<'a, D> {
    pub fn new(
        device: &'a mut D,
        session: TransferSession,
        options: TransferOptions,
        cancel: CancelToken,
    ) -> Self {
        Self {
            device,
            session,
            options,
            cancel,
            state: LoopState::Idle,
            stats: TransferStats::default(),
        }
    }

    /// Runs until the cancel token fires or the wait bound is reached.
    ///
    /// The readiness registration and the session buffer are released on
    /// every return path, since both are owned by this call.
    pub fn run(mut self) -> Result<TransferStats> {
        let direction = self.session.direction();
        let mut waiter = self
            .device
            .readiness(direction)
            .map_err(|errno| Error::Wait {
                op: <D::Waiter as ReadinessWait>::OP,
                errno,
            })?;

        let result = self.drive(&mut waiter);
        self.enter(LoopState::Stopped);
        match &result {
            Ok(stats) => debug!(?stats, "transfer loop stopped"),
            Err(err) => error!(%err, stats = ?self.stats, "transfer loop aborted"),
        }
        result
    }

    fn drive(&mut self, waiter: &mut D::Waiter) -> Result<TransferStats> {
        self.prepare()?;
        self.enter(LoopState::Prepared);

        self.start()?;
        self.enter(LoopState::Running);

        loop {
            if self.cancel.is_cancelled() {
                return Ok(self.stats);
            }
            if let Some(max) = self.options.max_waits {
                if self.stats.waits >= max {
                    return Ok(self.stats);
                }
            }

            self.stats.waits += 1;
            match waiter.wait(self.options.wait_timeout) {
                Ok(Readiness::Timeout) => {
                    self.stats.timeouts += 1;
                    continue;
                }
                Ok(Readiness::Error) => return Err(Error::ReadinessError),
                Ok(Readiness::Ready) => (),
                Err(Errno::EINTR) => {
                    self.stats.interrupts += 1;
                    continue;
                }
                Err(errno) => {
                    return Err(Error::Wait {
                        op: <D::Waiter as ReadinessWait>::OP,
                        errno,
                    });
                }
            }

            self.stats.transfers += 1;
            match self.session.transfer(&mut *self.device) {
                Ok(frames) => {
                    trace!(frames, "period transferred");
                    self.stats.frames += frames as u64;
                }
                Err(errno) => match TransferFault::classify(errno, self.session.direction()) {
                    TransferFault::Interrupted => self.stats.interrupts += 1,
                    fault @ (TransferFault::Underrun | TransferFault::Overrun) => {
                        warn!(?fault, "xrun, preparing the substream again");
                        self.enter(LoopState::Recovering);
                        self.prepare()?;
                        self.start()?;
                        self.stats.xruns += 1;
                        self.enter(LoopState::Running);
                    }
                    TransferFault::Other(errno) => {
                        return Err(Error::Transfer {
                            op: self.session.op(),
                            errno,
                        });
                    }
                },
            }
        }
    }

    fn enter(&mut self, state: LoopState) {
        trace!(from = ?self.state, to = ?state, "transfer state");
        self.state = state;
    }

    /// A prepared capture substream never becomes readable by itself, so
    /// capture is started even when auto-start is configured.
    fn start(&mut self) -> Result<()> {
        if !self.options.explicit_start && self.session.direction() == Direction::Playback {
            return Ok(());
        }
        self.device
            .start()
            .map_err(|errno| Error::DeviceRejected { op: "START", errno })
    }

    fn prepare(&mut self) -> Result<()> {
        self.device
            .prepare()
            .map_err(|errno| Error::DeviceRejected {
                op: "PREPARE",
                errno,
            })
    }
}
