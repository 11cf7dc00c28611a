//! Kernel-backed PCM substreams: ioctl plumbing, epoll readiness and the
//! environment knobs of the transfer loop.

pub mod config;
mod epoll;
mod ioctl;
mod node;
pub mod options;

pub use self::epoll::EpollWaiter;
pub use self::node::{PcmNode, ProtocolVersion, SubstreamInfo};
pub use self::options::TransferOptions;
