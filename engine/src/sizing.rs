use crate::error::{Error, Result};
use crate::negotiate::NegotiatedConfig;
use crate::params::Format;
use serde::Serialize;

/// Byte geometry of one period of audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodLayout {
    pub format: Format,
    pub sample_bytes: usize,
    pub channels: usize,
    pub frames: usize,
}

impl PeriodLayout {
    pub fn new(format: Format, channels: usize, frames: usize) -> Result<Self> {
        let sample_bytes = format
            .physical_bytes()
            .ok_or(Error::UnsupportedFormat(format.raw()))?;
        // Every byte count derived from the layout stays representable.
        sample_bytes
            .checked_mul(channels)
            .and_then(|frame| frame.checked_mul(frames))
            .ok_or(Error::AmbiguousNegotiation("period-bytes"))?;
        Ok(Self {
            format,
            sample_bytes,
            channels,
            frames,
        })
    }

    pub fn frame_bytes(&self) -> usize {
        self.sample_bytes * self.channels
    }

    /// Bytes one channel occupies when channels are kept in separate buffers.
    pub fn channel_bytes(&self) -> usize {
        self.sample_bytes * self.frames
    }

    pub fn buffer_bytes(&self) -> usize {
        self.frame_bytes() * self.frames
    }

    /// One sample of silence in the container's byte order.
    pub fn silent_sample(&self) -> &'static [u8] {
        static ZERO: [u8; 4] = [0; 4];
        match self.format {
            Format::U8 => &[0x80],
            Format::U16Le => &[0x00, 0x80],
            Format::U16Be => &[0x80, 0x00],
            Format::U24Le => &[0x00, 0x00, 0x80, 0x00],
            Format::U24Be => &[0x00, 0x80, 0x00, 0x00],
            Format::U32Le => &[0x00, 0x00, 0x00, 0x80],
            Format::U32Be => &[0x80, 0x00, 0x00, 0x00],
            _ => ZERO.get(..self.sample_bytes).unwrap_or(&ZERO),
        }
    }

    /// A buffer of `bytes` bytes holding silence.
    pub fn silence(&self, bytes: usize) -> Vec<u8> {
        self.silent_sample().iter().copied().cycle().take(bytes).collect()
    }
}

/// Sizes a transfer buffer holding exactly one period of the negotiated stream.
pub fn size_one_period(config: &NegotiatedConfig) -> Result<PeriodLayout> {
    let format = config.format()?;
    let channels = config.channels()?;
    let frames = config.period_frames()?;
    PeriodLayout::new(format, channels as usize, frames as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{HwParams, Interval, IntervalParam, MaskParam};

    fn config(format: u32, channels: Interval, period: Interval) -> NegotiatedConfig {
        let mut params = HwParams::unconstrained();
        let formats = params.mask_mut(MaskParam::Format);
        formats.clear_all();
        formats.set(format as usize);
        *params.interval_mut(IntervalParam::Channels) = channels;
        *params.interval_mut(IntervalParam::PeriodSize) = period;
        NegotiatedConfig::new(params)
    }

    #[test]
    fn stereo_s16_period_of_256_frames() {
        let layout = size_one_period(&config(
            Format::S16Le.raw(),
            Interval::single(2),
            Interval::single(256),
        ))
        .unwrap();
        assert_eq!(layout.sample_bytes, 2);
        assert_eq!(layout.frame_bytes(), 4);
        assert_eq!(layout.buffer_bytes(), 1024);
        assert_eq!(layout.channel_bytes() * layout.channels, layout.buffer_bytes());
    }

    #[test]
    fn width_follows_container_size() {
        let cases = [
            (Format::U8, 1),
            (Format::S16Be, 2),
            (Format::U16Le, 2),
            (Format::S24Le, 4),
            (Format::U24Be, 4),
            (Format::S32Be, 4),
            (Format::U32Le, 4),
        ];
        for (format, width) in cases {
            let layout = PeriodLayout::new(format, 1, 1).unwrap();
            assert_eq!(layout.buffer_bytes(), width, "{format}");
        }
    }

    #[test]
    fn float_is_rejected() {
        let result = size_one_period(&config(
            Format::FloatLe.raw(),
            Interval::single(2),
            Interval::single(256),
        ));
        assert!(matches!(result, Err(Error::UnsupportedFormat(14))));
    }

    #[test]
    fn unsigned_silence_sits_at_midpoint() {
        let s8 = PeriodLayout::new(Format::S8, 2, 2).unwrap();
        assert_eq!(s8.silence(s8.buffer_bytes()), vec![0; 4]);

        let u16be = PeriodLayout::new(Format::U16Be, 1, 2).unwrap();
        assert_eq!(u16be.silence(u16be.buffer_bytes()), vec![0x80, 0, 0x80, 0]);

        let u24le = PeriodLayout::new(Format::U24Le, 1, 1).unwrap();
        assert_eq!(u24le.silence(4), vec![0, 0, 0x80, 0]);
    }

    #[test]
    fn overflowing_period_is_rejected() {
        assert!(matches!(
            PeriodLayout::new(Format::S32Le, usize::MAX / 2, 4),
            Err(Error::AmbiguousNegotiation("period-bytes"))
        ));
        assert!(matches!(
            size_one_period(&config(
                Format::S32Le.raw(),
                Interval::single(u32::MAX),
                Interval::single(u32::MAX),
            )),
            Err(Error::AmbiguousNegotiation("period-bytes"))
        ));
    }

    #[test]
    fn packed_24_bit_is_rejected() {
        assert!(matches!(
            PeriodLayout::new(Format::S24_3Le, 2, 64),
            Err(Error::UnsupportedFormat(32))
        ));
    }

    #[test]
    fn open_or_empty_intervals_are_ambiguous() {
        let mut open = Interval::single(2);
        open.set_open_max(true);
        let result = size_one_period(&config(Format::S16Le.raw(), open, Interval::single(256)));
        assert!(matches!(result, Err(Error::AmbiguousNegotiation("channels"))));

        let mut empty = Interval::single(256);
        empty.set_empty(true);
        let result = size_one_period(&config(Format::S16Le.raw(), Interval::single(2), empty));
        assert!(matches!(
            result,
            Err(Error::AmbiguousNegotiation("period-size"))
        ));

        let result = size_one_period(&config(
            Format::S16Le.raw(),
            Interval::single(2),
            Interval::unbounded(),
        ));
        assert!(matches!(
            result,
            Err(Error::AmbiguousNegotiation("period-size"))
        ));
    }
}
