//! Error types for negotiation and transfer.

use crate::params::{Access, Format};
use nix::errno::Errno;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Opening the character device failed.
    #[error("open(2): {reason}", reason = .errno.desc())]
    Open { errno: Errno },

    /// The device declined an ioctl, including refine and commit of parameters.
    #[error("ioctl({op}): {reason}", reason = .errno.desc())]
    DeviceRejected { op: &'static str, errno: Errno },

    /// Neither read/write access mode survived refinement.
    #[error("no read/write access mode, device permits {0:?}")]
    UnsupportedAccessMode(Vec<Access>),

    /// The negotiated sample format, by raw value, has no 1, 2 or 4 byte container.
    #[error("sample format {} is not transferable", format_label(*.0))]
    UnsupportedFormat(u32),

    /// A parameter that must be fixed after commit is still a range.
    #[error("{0} is not narrowed to a single value")]
    AmbiguousNegotiation(&'static str),

    /// A transfer failed for a reason other than xrun or signal delivery.
    #[error("ioctl({op}): {reason}", reason = .errno.desc())]
    Transfer { op: &'static str, errno: Errno },

    /// Waiting for readiness failed.
    #[error("{op}: {reason}", reason = .errno.desc())]
    Wait { op: &'static str, errno: Errno },

    /// The readiness notification reported an error condition on the device.
    #[error("EPOLLERR")]
    ReadinessError,
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let errno = err
            .raw_os_error()
            .map_or(Errno::UnknownErrno, Errno::from_raw);
        Error::Open { errno }
    }
}

fn format_label(raw: u32) -> String {
    Format::from_raw(raw)
        .map(|format| format.label().to_string())
        .unwrap_or_else(|| format!("#{raw}"))
}
