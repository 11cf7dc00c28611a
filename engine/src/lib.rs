pub mod device;
pub mod error;
pub mod hw;
pub mod negotiate;
pub mod params;
pub mod sizing;
pub mod transfer;

pub use device::{PcmDevice, Readiness, ReadinessWait};
pub use error::{Error, Result};
pub use hw::{PcmNode, SubstreamInfo, TransferOptions};
pub use negotiate::{NegotiatedConfig, negotiate, refine_unconstrained};
pub use sizing::{PeriodLayout, size_one_period};
pub use transfer::{CancelToken, LoopState, TransferFault, TransferLoop, TransferSession, TransferStats};
