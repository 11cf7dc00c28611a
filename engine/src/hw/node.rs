use super::epoll::EpollWaiter;
use super::ioctl::*;
use crate::device::PcmDevice;
use crate::error::{Error, Result};
use crate::params::{Direction, HwParams, IntervalParam, PcmClass, PcmSubclass};
use nix::errno::Errno;
use nix::libc;
use serde::Serialize;
use std::{
    ffi::CStr,
    fmt,
    fs::File,
    os::fd::{AsRawFd, RawFd},
};
use tracing::{debug, warn};

/// Identity of the substream behind a PCM character device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubstreamInfo {
    pub device: u32,
    pub subdevice: u32,
    pub direction: Direction,
    pub card: i32,
    pub id: String,
    pub name: String,
    pub subname: String,
    pub class: Option<PcmClass>,
    pub subclass: Option<PcmSubclass>,
    pub subdevices_count: u32,
    pub subdevices_avail: u32,
}

fn c_string(bytes: &[u8]) -> String {
    CStr::from_bytes_until_nul(bytes)
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned())
}

impl From<&PcmInfo> for SubstreamInfo {
    fn from(info: &PcmInfo) -> Self {
        let direction = Direction::from_raw(info.stream as u32).unwrap_or_else(|| {
            warn!(stream = info.stream, "unknown stream direction, assuming playback");
            Direction::Playback
        });
        Self {
            device: info.device,
            subdevice: info.subdevice,
            direction,
            card: info.card,
            id: c_string(&info.id),
            name: c_string(&info.name),
            subname: c_string(&info.subname),
            class: PcmClass::from_raw(info.dev_class as u32),
            subclass: PcmSubclass::from_raw(info.dev_subclass as u32),
            subdevices_count: info.subdevices_count,
            subdevices_avail: info.subdevices_avail,
        }
    }
}

/// PCM protocol version reported by `PVERSION`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProtocolVersion(pub u32);

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            (self.0 >> 16) & 0xff,
            (self.0 >> 8) & 0xff,
            self.0 & 0xff
        )
    }
}

/// Frame geometry fixed by `HW_PARAMS`, used to validate transfer buffers.
#[derive(Debug, Clone, Copy)]
struct FrameGeometry {
    channels: usize,
    sample_bytes: usize,
}

impl FrameGeometry {
    /// Whether `len` bytes hold `frames` frames of `width` bytes each.
    fn fits(len: usize, frames: usize, width: usize) -> bool {
        frames.checked_mul(width).is_some_and(|needed| len >= needed)
    }
}

/// An open PCM character device such as `/dev/snd/pcmC0D0p`.
#[derive(Debug)]
pub struct PcmNode {
    path: String,
    file: File,
    info: SubstreamInfo,
    committed: bool,
    geometry: Option<FrameGeometry>,
}

impl PcmNode {
    pub fn open(path: &str) -> Result<Self> {
        let file = File::options().read(true).open(path)?;

        let mut raw = PcmInfo::new();
        unsafe { pcm_info(file.as_raw_fd(), &mut raw) }
            .map_err(|errno| Error::DeviceRejected { op: "INFO", errno })?;
        let info = SubstreamInfo::from(&raw);
        debug!(path, ?info, "opened PCM substream");

        Ok(Self {
            path: path.to_string(),
            file,
            info,
            committed: false,
            geometry: None,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn info(&self) -> &SubstreamInfo {
        &self.info
    }

    pub fn direction(&self) -> Direction {
        self.info.direction
    }

    pub fn fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }

    pub fn protocol_version(&self) -> Result<ProtocolVersion> {
        let mut version: libc::c_int = 0;
        unsafe { pcm_pversion(self.fd(), &mut version) }.map_err(|errno| {
            Error::DeviceRejected {
                op: "PVERSION",
                errno,
            }
        })?;
        Ok(ProtocolVersion(version as u32))
    }

    fn geometry(&self) -> std::result::Result<FrameGeometry, Errno> {
        if !self.committed {
            return Err(Errno::EBADFD);
        }
        self.geometry.ok_or(Errno::EINVAL)
    }
}

impl Drop for PcmNode {
    fn drop(&mut self) {
        if self.committed {
            let fd = self.fd();
            if let Err(errno) = unsafe { pcm_drop(fd) } {
                debug!(%errno, "ioctl(DROP) on close");
            }
            if let Err(errno) = unsafe { pcm_hw_free(fd) } {
                warn!(%errno, "ioctl(HW_FREE) on close");
            }
        }
    }
}

impl PcmDevice for PcmNode {
    type Waiter = EpollWaiter;

    fn refine(&mut self, params: &mut HwParams) -> std::result::Result<(), Errno> {
        unsafe { pcm_hw_refine(self.fd(), params) }.map(|_| ())
    }

    fn commit(&mut self, params: &mut HwParams) -> std::result::Result<(), Errno> {
        unsafe { pcm_hw_params(self.fd(), params) }?;
        self.committed = true;

        // Transfers are refused when the frame layout is not fixed.
        let channels = params.interval(IntervalParam::Channels).value();
        let frame_bits = params.interval(IntervalParam::FrameBits).value();
        self.geometry = match (channels, frame_bits) {
            (Some(channels), Some(frame_bits))
                if channels > 0 && frame_bits >= channels.saturating_mul(8) =>
            {
                Some(FrameGeometry {
                    channels: channels as usize,
                    sample_bytes: frame_bits as usize / 8 / channels as usize,
                })
            }
            _ => {
                warn!("committed parameters leave the frame geometry open");
                None
            }
        };
        Ok(())
    }

    fn prepare(&mut self) -> std::result::Result<(), Errno> {
        unsafe { pcm_prepare(self.fd()) }.map(|_| ())
    }

    fn start(&mut self) -> std::result::Result<(), Errno> {
        unsafe { pcm_start(self.fd()) }.map(|_| ())
    }

    fn transfer_interleaved(
        &mut self,
        direction: Direction,
        buf: &mut [u8],
        frames: usize,
    ) -> std::result::Result<usize, Errno> {
        let geometry = self.geometry()?;
        if !FrameGeometry::fits(buf.len(), frames, geometry.channels * geometry.sample_bytes) {
            return Err(Errno::EINVAL);
        }

        let mut xfer = XferI {
            result: 0,
            buf: buf.as_mut_ptr().cast(),
            frames: frames as libc::c_ulong,
        };
        match direction {
            Direction::Playback => unsafe { pcm_writei_frames(self.fd(), &mut xfer) }?,
            Direction::Capture => unsafe { pcm_readi_frames(self.fd(), &mut xfer) }?,
        };
        Ok(xfer.result.max(0) as usize)
    }

    fn transfer_noninterleaved(
        &mut self,
        direction: Direction,
        bufs: &mut [Vec<u8>],
        frames: usize,
    ) -> std::result::Result<usize, Errno> {
        let geometry = self.geometry()?;
        if bufs.len() != geometry.channels
            || bufs
                .iter()
                .any(|buf| !FrameGeometry::fits(buf.len(), frames, geometry.sample_bytes))
        {
            return Err(Errno::EINVAL);
        }

        let mut pointers: Vec<*mut libc::c_void> =
            bufs.iter_mut().map(|buf| buf.as_mut_ptr().cast()).collect();
        let mut xfer = XferN {
            result: 0,
            bufs: pointers.as_mut_ptr(),
            frames: frames as libc::c_ulong,
        };
        match direction {
            Direction::Playback => unsafe { pcm_writen_frames(self.fd(), &mut xfer) }?,
            Direction::Capture => unsafe { pcm_readn_frames(self.fd(), &mut xfer) }?,
        };
        Ok(xfer.result.max(0) as usize)
    }

    fn readiness(&mut self, direction: Direction) -> std::result::Result<EpollWaiter, Errno> {
        EpollWaiter::new(&self.file, direction)
    }
}
