//! Typed view of the kernel PCM hardware parameter set (`snd_pcm_hw_params`).
//!
//! The structure is handed to `HW_REFINE` and `HW_PARAMS` as-is, so its layout
//! follows the kernel ABI. Masks and intervals are reached through the dense
//! [`MaskParam`] and [`IntervalParam`] enums instead of raw offsets.

mod consts;
mod interval;
mod mask;

pub use self::consts::*;
pub use self::interval::Interval;
pub use self::mask::{MASK_MAX, Mask};

use nix::libc;

/// Parameters negotiated as enumerant sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskParam {
    Access,
    Format,
    Subformat,
}

impl MaskParam {
    pub const ALL: [MaskParam; 3] = [MaskParam::Access, MaskParam::Format, MaskParam::Subformat];

    fn slot(self) -> usize {
        self as usize
    }

    pub fn param(self) -> HwParam {
        match self {
            MaskParam::Access => HwParam::Access,
            MaskParam::Format => HwParam::Format,
            MaskParam::Subformat => HwParam::Subformat,
        }
    }

    /// Number of enumerants the kernel defines for the parameter.
    pub fn width(self) -> usize {
        match self {
            MaskParam::Access => Access::ALL.len(),
            MaskParam::Format => Format::DsdU32Be.raw() as usize + 1,
            MaskParam::Subformat => Subformat::ALL.len(),
        }
    }
}

/// Parameters negotiated as numeric ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntervalParam {
    SampleBits,
    FrameBits,
    Channels,
    Rate,
    PeriodTime,
    PeriodSize,
    PeriodBytes,
    Periods,
    BufferTime,
    BufferSize,
    BufferBytes,
    TickTime,
}

impl IntervalParam {
    pub const ALL: [IntervalParam; 12] = [
        IntervalParam::SampleBits,
        IntervalParam::FrameBits,
        IntervalParam::Channels,
        IntervalParam::Rate,
        IntervalParam::PeriodTime,
        IntervalParam::PeriodSize,
        IntervalParam::PeriodBytes,
        IntervalParam::Periods,
        IntervalParam::BufferTime,
        IntervalParam::BufferSize,
        IntervalParam::BufferBytes,
        IntervalParam::TickTime,
    ];

    fn slot(self) -> usize {
        self as usize
    }

    pub fn param(self) -> HwParam {
        match self {
            IntervalParam::SampleBits => HwParam::SampleBits,
            IntervalParam::FrameBits => HwParam::FrameBits,
            IntervalParam::Channels => HwParam::Channels,
            IntervalParam::Rate => HwParam::Rate,
            IntervalParam::PeriodTime => HwParam::PeriodTime,
            IntervalParam::PeriodSize => HwParam::PeriodSize,
            IntervalParam::PeriodBytes => HwParam::PeriodBytes,
            IntervalParam::Periods => HwParam::Periods,
            IntervalParam::BufferTime => HwParam::BufferTime,
            IntervalParam::BufferSize => HwParam::BufferSize,
            IntervalParam::BufferBytes => HwParam::BufferBytes,
            IntervalParam::TickTime => HwParam::TickTime,
        }
    }
}

const RESERVED_MASKS: usize = 5;
const RESERVED_INTERVALS: usize = 9;

/// One substream's parameter set, binary compatible with `struct snd_pcm_hw_params`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct HwParams {
    flags: u32,
    masks: [Mask; 3],
    mres: [Mask; RESERVED_MASKS],
    intervals: [Interval; 12],
    ires: [Interval; RESERVED_INTERVALS],
    rmask: u32,
    cmask: u32,
    info: u32,
    msbits: u32,
    rate_num: u32,
    rate_den: u32,
    fifo_size: libc::c_ulong,
    reserved: [u8; 64],
}

impl Default for HwParams {
    fn default() -> Self {
        Self {
            flags: 0,
            masks: [Mask::default(); 3],
            mres: [Mask::default(); RESERVED_MASKS],
            intervals: [Interval::unbounded(); 12],
            ires: [Interval::unbounded(); RESERVED_INTERVALS],
            rmask: 0,
            cmask: 0,
            info: 0,
            msbits: 0,
            rate_num: 0,
            rate_den: 0,
            fifo_size: 0,
            reserved: [0; 64],
        }
    }
}

impl HwParams {
    /// A parameter set permitting everything, ready for the first refine.
    pub fn unconstrained() -> Self {
        let mut params = Self::default();
        params.reset_to_unconstrained();
        params
    }

    pub fn reset_to_unconstrained(&mut self) {
        self.rmask = 0;
        for param in MaskParam::ALL {
            self.masks[param.slot()].fill();
            self.mark_requested(param.param());
        }
        for param in IntervalParam::ALL {
            self.intervals[param.slot()].reset_unbounded();
            self.mark_requested(param.param());
        }
        self.cmask = 0;
        self.info = 0;
    }

    pub fn mask(&self, param: MaskParam) -> &Mask {
        &self.masks[param.slot()]
    }

    pub fn mask_mut(&mut self, param: MaskParam) -> &mut Mask {
        &mut self.masks[param.slot()]
    }

    pub fn interval(&self, param: IntervalParam) -> &Interval {
        &self.intervals[param.slot()]
    }

    pub fn interval_mut(&mut self, param: IntervalParam) -> &mut Interval {
        &mut self.intervals[param.slot()]
    }

    pub fn mark_requested(&mut self, param: HwParam) {
        self.rmask |= 1 << param.raw();
    }

    pub fn unmark_requested(&mut self, param: HwParam) {
        self.rmask &= !(1 << param.raw());
    }

    pub fn is_requested(&self, param: HwParam) -> bool {
        self.rmask & (1 << param.raw()) != 0
    }

    pub fn is_changed(&self, param: HwParam) -> bool {
        self.cmask & (1 << param.raw()) != 0
    }

    /// Parameters the device altered in its last response.
    pub fn changed(&self) -> Vec<HwParam> {
        HwParam::ALL
            .iter()
            .copied()
            .filter(|param| self.is_changed(*param))
            .collect()
    }

    pub fn requested_mask(&self) -> u32 {
        self.rmask
    }

    pub fn changed_mask(&self) -> u32 {
        self.cmask
    }

    pub fn flags(&self) -> Vec<HwParamsFlag> {
        flags_in(HwParamsFlag::ALL, self.flags, HwParamsFlag::raw)
    }

    pub fn set_flag(&mut self, flag: HwParamsFlag, on: bool) {
        if on {
            self.flags |= 1 << flag.raw();
        } else {
            self.flags &= !(1 << flag.raw());
        }
    }

    /// Capabilities reported by the device, not negotiated.
    pub fn info(&self) -> Vec<InfoFlag> {
        flags_in(InfoFlag::ALL, self.info, InfoFlag::raw)
    }

    pub fn has_info(&self, flag: InfoFlag) -> bool {
        self.info & (1 << flag.raw()) != 0
    }

    pub fn significant_bits(&self) -> u32 {
        self.msbits
    }

    /// Exact rate as numerator and denominator, when the device reported one.
    pub fn rate_fraction(&self) -> Option<(u32, u32)> {
        if self.rate_num > 0 && self.rate_den > 0 {
            Some((self.rate_num, self.rate_den))
        } else {
            None
        }
    }

    pub fn fifo_size(&self) -> u64 {
        self.fifo_size as u64
    }

    pub fn permits_access(&self, access: Access) -> bool {
        self.mask(MaskParam::Access).test(access.raw() as usize)
    }

    pub fn accesses(&self) -> Vec<Access> {
        self.enumerants(MaskParam::Access, Access::from_raw)
    }

    pub fn formats(&self) -> Vec<Format> {
        self.enumerants(MaskParam::Format, Format::from_raw)
    }

    pub fn subformats(&self) -> Vec<Subformat> {
        self.enumerants(MaskParam::Subformat, Subformat::from_raw)
    }

    fn enumerants<T>(&self, param: MaskParam, decode: fn(u32) -> Option<T>) -> Vec<T> {
        self.mask(param)
            .iter()
            .take_while(|index| *index < param.width())
            .filter_map(|index| decode(index as u32))
            .collect()
    }

    /// Fills the device-reported outputs; used by devices emulated in tests.
    pub fn set_outputs(&mut self, cmask: u32, info: u32, msbits: u32, rate: Option<(u32, u32)>) {
        self.cmask = cmask;
        self.info = info;
        self.msbits = msbits;
        let (num, den) = rate.unwrap_or((0, 0));
        self.rate_num = num;
        self.rate_den = den;
    }
}
