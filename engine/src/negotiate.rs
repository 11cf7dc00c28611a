use crate::device::PcmDevice;
use crate::error::{Error, Result};
use crate::params::{Access, Format, HwParams, IntervalParam, MaskParam};
use tracing::{debug, info};

/// A committed parameter set, fully resolved for read/write transfer.
#[derive(Debug, Clone)]
pub struct NegotiatedConfig {
    params: HwParams,
}

impl NegotiatedConfig {
    pub fn new(params: HwParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &HwParams {
        &self.params
    }

    /// The read/write access mode to transfer with. Interleaved wins when
    /// both remain permitted.
    pub fn access(&self) -> Result<Access> {
        select_access(&self.params)
    }

    /// The single sample format left in the format mask.
    pub fn format(&self) -> Result<Format> {
        let mask = self.params.mask(MaskParam::Format);
        let index = mask
            .single()
            .ok_or(Error::AmbiguousNegotiation("format"))?;
        Format::from_raw(index as u32).ok_or(Error::UnsupportedFormat(index as u32))
    }

    pub fn channels(&self) -> Result<u32> {
        self.fixed(IntervalParam::Channels, "channels")
    }

    pub fn period_frames(&self) -> Result<u32> {
        self.fixed(IntervalParam::PeriodSize, "period-size")
    }

    pub fn rate(&self) -> Option<u32> {
        self.params.interval(IntervalParam::Rate).value()
    }

    pub fn periods(&self) -> Option<u32> {
        self.params.interval(IntervalParam::Periods).value()
    }

    fn fixed(&self, param: IntervalParam, name: &'static str) -> Result<u32> {
        self.params
            .interval(param)
            .value()
            .ok_or(Error::AmbiguousNegotiation(name))
    }
}

fn select_access(params: &HwParams) -> Result<Access> {
    if params.permits_access(Access::RwInterleaved) {
        Ok(Access::RwInterleaved)
    } else if params.permits_access(Access::RwNoninterleaved) {
        Ok(Access::RwNoninterleaved)
    } else {
        Err(Error::UnsupportedAccessMode(params.accesses()))
    }
}

/// Asks the device what it supports, starting from a fully open parameter set.
pub fn refine_unconstrained<D: PcmDevice>(device: &mut D) -> Result<HwParams> {
    let mut params = HwParams::unconstrained();
    device
        .refine(&mut params)
        .map_err(|errno| Error::DeviceRejected {
            op: "HW_REFINE",
            errno,
        })?;
    debug!(changed = ?params.changed(), "refined parameters");
    Ok(params)
}

/// Refines an unconstrained parameter set, restricts access to read/write
/// transfer and commits the result.
///
/// Device errors are never retried: a refused refine or commit means the
/// combination is infeasible for the substream.
pub fn negotiate<D: PcmDevice>(device: &mut D) -> Result<NegotiatedConfig> {
    let mut params = refine_unconstrained(device)?;

    // Memory-mapped access is not driven by this engine.
    select_access(&params)?;
    let access = params.mask_mut(MaskParam::Access);
    access.clear_all();
    access.set(Access::RwInterleaved.raw() as usize);
    access.set(Access::RwNoninterleaved.raw() as usize);

    device
        .commit(&mut params)
        .map_err(|errno| Error::DeviceRejected {
            op: "HW_PARAMS",
            errno,
        })?;

    let config = NegotiatedConfig::new(params);
    info!(
        access = ?config.access().ok(),
        format = ?config.format().ok(),
        channels = ?config.channels().ok(),
        rate = ?config.rate(),
        period_frames = ?config.period_frames().ok(),
        "committed hardware parameters"
    );
    Ok(config)
}
