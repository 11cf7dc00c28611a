use crate::params::{Direction, HwParams};
use nix::errno::Errno;
use std::time::Duration;

/// Outcome of one bounded wait for transfer readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    Timeout,
    Error,
}

/// A readiness registration for one substream and direction.
///
/// Dropping the value releases the registration.
pub trait ReadinessWait {
    /// Name of the wait primitive, used in error messages.
    const OP: &'static str;

    fn wait(&mut self, timeout: Duration) -> Result<Readiness, Errno>;
}

/// The PCM substream as seen by the negotiator and the transfer loop.
///
/// Every operation is synchronous. Errors are the raw error numbers the
/// device reported; the caller classifies them.
pub trait PcmDevice {
    type Waiter: ReadinessWait;

    /// Narrows `params` to what the device supports without committing.
    fn refine(&mut self, params: &mut HwParams) -> Result<(), Errno>;

    /// Fixes `params` and allocates device-side buffers.
    fn commit(&mut self, params: &mut HwParams) -> Result<(), Errno>;

    fn prepare(&mut self) -> Result<(), Errno>;

    fn start(&mut self) -> Result<(), Errno>;

    /// Moves `frames` frames of channel-interleaved samples through `buf`.
    fn transfer_interleaved(
        &mut self,
        direction: Direction,
        buf: &mut [u8],
        frames: usize,
    ) -> Result<usize, Errno>;

    /// Moves `frames` frames through one buffer per channel.
    fn transfer_noninterleaved(
        &mut self,
        direction: Direction,
        bufs: &mut [Vec<u8>],
        frames: usize,
    ) -> Result<usize, Errno>;

    /// Registers for read readiness (capture) or write readiness (playback).
    fn readiness(&mut self, direction: Direction) -> Result<Self::Waiter, Errno>;
}
