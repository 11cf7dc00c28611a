//! Text and JSON renderings of what the programs learn about a substream.
//!
//! The text layout is indented in two-space steps: a section header at one
//! step, its fields at two, and the members of a set at three.

use pcm_engine::hw::ProtocolVersion;
use pcm_engine::params::{
    Access, Format, HwParam, HwParams, HwParamsFlag, InfoFlag, Interval, IntervalParam, Subformat,
};
use pcm_engine::{NegotiatedConfig, PeriodLayout, SubstreamInfo, TransferStats};
use serde::Serialize;
use std::fmt::{self, Display, Write};

fn optional<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

pub fn write_substream(
    w: &mut impl Write,
    info: &SubstreamInfo,
    version: Option<ProtocolVersion>,
) -> fmt::Result {
    writeln!(w, "  Substream information:")?;
    writeln!(w, "    device:       {}", info.device)?;
    writeln!(w, "    subdevice:    {}", info.subdevice)?;
    writeln!(w, "    direction:    {}", info.direction)?;
    writeln!(w, "    card:         {}", info.card)?;
    writeln!(w, "    id:           '{}'", info.id)?;
    writeln!(w, "    name:         '{}'", info.name)?;
    writeln!(w, "    subname:      '{}'", info.subname)?;
    writeln!(w, "    dev-class:    {}", optional(info.class))?;
    writeln!(w, "    dev-subclass: {}", optional(info.subclass))?;
    writeln!(w, "    subdevices-count:   {}", info.subdevices_count)?;
    writeln!(w, "    subdevices-avail:   {}", info.subdevices_avail)?;
    if let Some(version) = version {
        writeln!(w, "    protocol-version:   {version}")?;
    }
    Ok(())
}

fn write_set<T: Display>(w: &mut impl Write, name: &str, members: &[T]) -> fmt::Result {
    writeln!(w, "    {name}:")?;
    for member in members {
        writeln!(w, "      {member}")?;
    }
    Ok(())
}

/// Dumps a refined parameter set: what changed, what is still permitted and
/// what the device reported alongside.
pub fn write_refined(w: &mut impl Write, params: &HwParams) -> fmt::Result {
    writeln!(w, "  Changed parameters:")?;
    for param in params.changed() {
        writeln!(w, "    {param}")?;
    }

    writeln!(w, "  Runtime parameters:")?;
    write_set(w, HwParam::Access.label(), &params.accesses())?;
    write_set(w, HwParam::Format.label(), &params.formats())?;
    write_set(w, HwParam::Subformat.label(), &params.subformats())?;
    for param in IntervalParam::ALL {
        writeln!(w, "    {}:", param.param())?;
        writeln!(w, "      {}", params.interval(param))?;
    }

    let flags = params.flags();
    if !flags.is_empty() {
        write_set(w, "flags", &flags)?;
    }
    write_set(w, "info", &params.info())?;

    if params.significant_bits() > 0 {
        writeln!(w, "    most-significant-bits:    {}", params.significant_bits())?;
    }
    if let Some((num, den)) = params.rate_fraction() {
        writeln!(w, "    rate_num: {num}")?;
        writeln!(w, "    rate_den: {den}")?;
    }
    Ok(())
}

pub fn write_negotiated(w: &mut impl Write, negotiated: &NegotiatedReport) -> fmt::Result {
    writeln!(w, "  Negotiated configuration:")?;
    writeln!(w, "    access:       {}", negotiated.access)?;
    writeln!(w, "    format:       {}", negotiated.format)?;
    writeln!(w, "    channels:     {}", negotiated.channels)?;
    writeln!(w, "    rate:         {}", optional(negotiated.rate))?;
    writeln!(w, "    period-size:  {}", negotiated.period_frames)?;
    writeln!(w, "    periods:      {}", optional(negotiated.periods))?;
    writeln!(w, "    period-bytes: {}", negotiated.period_bytes)
}

pub fn write_stats(w: &mut impl Write, stats: &TransferStats) -> fmt::Result {
    writeln!(w, "  Transfer statistics:")?;
    writeln!(w, "    waits:        {}", stats.waits)?;
    writeln!(w, "    timeouts:     {}", stats.timeouts)?;
    writeln!(w, "    interrupts:   {}", stats.interrupts)?;
    writeln!(w, "    transfers:    {}", stats.transfers)?;
    writeln!(w, "    frames:       {}", stats.frames)?;
    writeln!(w, "    xruns:        {}", stats.xruns)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateFraction {
    pub num: u32,
    pub den: u32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct IntervalEntry {
    pub param: HwParam,
    pub range: Interval,
}

/// JSON form of [`write_refined`].
#[derive(Debug, Clone, Serialize)]
pub struct RefinedReport {
    pub changed: Vec<HwParam>,
    pub access: Vec<Access>,
    pub format: Vec<Format>,
    pub subformat: Vec<Subformat>,
    pub intervals: Vec<IntervalEntry>,
    pub flags: Vec<HwParamsFlag>,
    pub info: Vec<InfoFlag>,
    pub most_significant_bits: Option<u32>,
    pub rate: Option<RateFraction>,
}

impl From<&HwParams> for RefinedReport {
    fn from(params: &HwParams) -> Self {
        Self {
            changed: params.changed(),
            access: params.accesses(),
            format: params.formats(),
            subformat: params.subformats(),
            intervals: IntervalParam::ALL
                .iter()
                .map(|param| IntervalEntry {
                    param: param.param(),
                    range: *params.interval(*param),
                })
                .collect(),
            flags: params.flags(),
            info: params.info(),
            most_significant_bits: Some(params.significant_bits()).filter(|bits| *bits > 0),
            rate: params
                .rate_fraction()
                .map(|(num, den)| RateFraction { num, den }),
        }
    }
}

/// The committed configuration as the transfer loop will use it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NegotiatedReport {
    pub access: Access,
    pub format: Format,
    pub channels: usize,
    pub rate: Option<u32>,
    pub period_frames: usize,
    pub periods: Option<u32>,
    pub period_bytes: usize,
}

impl NegotiatedReport {
    pub fn new(config: &NegotiatedConfig, layout: &PeriodLayout) -> pcm_engine::Result<Self> {
        Ok(Self {
            access: config.access()?,
            format: layout.format,
            channels: layout.channels,
            rate: config.rate(),
            period_frames: layout.frames,
            periods: config.periods(),
            period_bytes: layout.buffer_bytes(),
        })
    }
}

/// Everything `refine-pcm-params` prints, as one JSON document.
#[derive(Debug, Clone, Serialize)]
pub struct CapsDocument<'a> {
    pub path: &'a str,
    pub substream: &'a SubstreamInfo,
    pub protocol_version: Option<String>,
    pub refined: RefinedReport,
}

/// Everything `pcm-simple-rw` prints, as one JSON document.
#[derive(Debug, Clone, Serialize)]
pub struct RunDocument<'a> {
    pub path: &'a str,
    pub substream: &'a SubstreamInfo,
    pub protocol_version: Option<String>,
    pub negotiated: NegotiatedReport,
    pub stats: TransferStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcm_engine::params::{Direction, MaskParam, PcmClass};

    fn substream() -> SubstreamInfo {
        SubstreamInfo {
            device: 0,
            subdevice: 0,
            direction: Direction::Playback,
            card: 1,
            id: "USB Audio".to_string(),
            name: "USB Audio".to_string(),
            subname: "subdevice #0".to_string(),
            class: Some(PcmClass::Generic),
            subclass: None,
            subdevices_count: 1,
            subdevices_avail: 1,
        }
    }

    fn refined() -> HwParams {
        let mut params = HwParams::unconstrained();
        let access = params.mask_mut(MaskParam::Access);
        access.clear_all();
        access.set(Access::RwInterleaved.raw() as usize);
        let format = params.mask_mut(MaskParam::Format);
        format.clear_all();
        format.set(Format::S16Le.raw() as usize);
        format.set(Format::S32Le.raw() as usize);
        *params.interval_mut(IntervalParam::Channels) = Interval::single(2);
        params.set_outputs(
            1 << HwParam::Access.raw() | 1 << HwParam::Channels.raw(),
            1 << InfoFlag::Interleaved.raw(),
            24,
            Some((48_000, 1)),
        );
        params
    }

    #[test]
    fn substream_lines_are_aligned() {
        let mut out = String::new();
        write_substream(&mut out, &substream(), Some(ProtocolVersion(0x0002_000f))).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "  Substream information:");
        assert_eq!(lines[3], "    direction:    playback");
        assert_eq!(lines[5], "    id:           'USB Audio'");
        assert_eq!(lines[8], "    dev-class:    generic");
        assert_eq!(lines[9], "    dev-subclass: -");
        assert_eq!(lines[12], "    protocol-version:   2.0.15");
    }

    #[test]
    fn refined_dump_lists_permitted_members() {
        let mut out = String::new();
        write_refined(&mut out, &refined()).unwrap();
        assert!(out.starts_with("  Changed parameters:\n    access\n    channels\n"));
        assert!(out.contains("    access:\n      readwrite-interleaved\n    format:\n"));
        assert!(out.contains("      s16-le\n      s32-le\n"));
        assert!(out.contains("    channels:\n      [2, 2], integer, \n"));
        assert!(out.contains("    info:\n      interleaved\n"));
        assert!(out.contains("    most-significant-bits:    24\n"));
        assert!(out.ends_with("    rate_num: 48000\n    rate_den: 1\n"));
        assert!(!out.contains("flags:"));
    }

    #[test]
    fn refined_json_uses_labels() {
        let value = serde_json::to_value(RefinedReport::from(&refined())).unwrap();
        assert_eq!(value["changed"], serde_json::json!(["access", "channels"]));
        assert_eq!(value["access"], serde_json::json!(["readwrite-interleaved"]));
        assert_eq!(value["format"], serde_json::json!(["s16-le", "s32-le"]));
        assert_eq!(value["intervals"][2]["param"], "channels");
        assert_eq!(value["intervals"][2]["range"]["min"], 2);
        assert_eq!(value["rate"], serde_json::json!({"num": 48000, "den": 1}));
        assert_eq!(value["most_significant_bits"], 24);
    }

    #[test]
    fn stats_are_listed() {
        let stats = TransferStats {
            waits: 5,
            timeouts: 3,
            interrupts: 0,
            transfers: 2,
            frames: 256,
            xruns: 1,
        };
        let mut out = String::new();
        write_stats(&mut out, &stats).unwrap();
        assert!(out.contains("    transfers:    2\n"));
        assert!(out.ends_with("    xruns:        1\n"));
    }
}
