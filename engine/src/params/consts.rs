use serde::{Serialize, Serializer};
use std::fmt;

/// Declares a kernel enumeration with its raw values and display labels.
macro_rules! kernel_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident = $value:literal => $label:literal,)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant = $value,)*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            pub fn from_raw(value: u32) -> Option<Self> {
                match value {
                    $($value => Some($name::$variant),)*
                    _ => None,
                }
            }

            pub fn raw(self) -> u32 {
                self as u32
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)*
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }
    };
}

kernel_enum! {
    /// `SNDRV_PCM_HW_PARAM_*`, also the bit positions in the request and change masks.
    HwParam {
        Access = 0 => "access",
        Format = 1 => "format",
        Subformat = 2 => "subformat",
        SampleBits = 8 => "sample-bits",
        FrameBits = 9 => "frame-bits",
        Channels = 10 => "channels",
        Rate = 11 => "rate",
        PeriodTime = 12 => "period-time",
        PeriodSize = 13 => "period-size",
        PeriodBytes = 14 => "period-bytes",
        Periods = 15 => "periods",
        BufferTime = 16 => "buffer-time",
        BufferSize = 17 => "buffer-size",
        BufferBytes = 18 => "buffer-bytes",
        TickTime = 19 => "tick-time",
    }
}

kernel_enum! {
    /// `SNDRV_PCM_ACCESS_*`.
    Access {
        MmapInterleaved = 0 => "mmap-interleaved",
        MmapNoninterleaved = 1 => "mmap-noninterleaved",
        MmapComplex = 2 => "mmap-complex",
        RwInterleaved = 3 => "readwrite-interleaved",
        RwNoninterleaved = 4 => "readwrite-noninterleaved",
    }
}

kernel_enum! {
    /// `SNDRV_PCM_FORMAT_*`. Values 29 and 30 are unassigned.
    Format {
        S8 = 0 => "s8",
        U8 = 1 => "u8",
        S16Le = 2 => "s16-le",
        S16Be = 3 => "s16-be",
        U16Le = 4 => "u16-le",
        U16Be = 5 => "u16-be",
        S24Le = 6 => "s24-le",
        S24Be = 7 => "s24-be",
        U24Le = 8 => "u24-le",
        U24Be = 9 => "u24-be",
        S32Le = 10 => "s32-le",
        S32Be = 11 => "s32-be",
        U32Le = 12 => "u32-le",
        U32Be = 13 => "u32-be",
        FloatLe = 14 => "float-le",
        FloatBe = 15 => "float-be",
        Float64Le = 16 => "float64-le",
        Float64Be = 17 => "float64-be",
        Iec958SubframeLe = 18 => "iec958subframe-le",
        Iec958SubframeBe = 19 => "iec958subframe-be",
        MuLaw = 20 => "mu-law",
        ALaw = 21 => "a-law",
        ImaAdpcm = 22 => "ima-adpcm",
        Mpeg = 23 => "mpg",
        Gsm = 24 => "gsm",
        S20Le = 25 => "s20-le",
        S20Be = 26 => "s20-be",
        U20Le = 27 => "u20-le",
        U20Be = 28 => "u20-be",
        Special = 31 => "special",
        S24_3Le = 32 => "s24-3le",
        S24_3Be = 33 => "s24-3be",
        U24_3Le = 34 => "u24-3le",
        U24_3Be = 35 => "u24-3be",
        S20_3Le = 36 => "s20-3le",
        S20_3Be = 37 => "s20-3be",
        U20_3Le = 38 => "u20-3le",
        U20_3Be = 39 => "u20-3be",
        S18_3Le = 40 => "s18-3le",
        S18_3Be = 41 => "s18-3be",
        U18_3Le = 42 => "u18-3le",
        U18_3Be = 43 => "u18-3be",
        G723_24 = 44 => "g723-24",
        G723_24_1b = 45 => "g723-241b",
        G723_40 = 46 => "g723-40",
        G723_40_1b = 47 => "g723-401b",
        DsdU8 = 48 => "dsd-u8",
        DsdU16Le = 49 => "dsd-u16-le",
        DsdU32Le = 50 => "dsd-u32-le",
        DsdU16Be = 51 => "dsd-u16-be",
        DsdU32Be = 52 => "dsd-u32-be",
    }
}

impl Format {
    /// Bytes one sample occupies in a read/write transfer buffer.
    ///
    /// Only the linear integer families with 8, 16, 24-in-32 and 32 bit
    /// containers are transferable by this engine.
    pub fn physical_bytes(self) -> Option<usize> {
        match self {
            Format::S8 | Format::U8 => Some(1),
            Format::S16Le | Format::S16Be | Format::U16Le | Format::U16Be => Some(2),
            Format::S24Le
            | Format::S24Be
            | Format::U24Le
            | Format::U24Be
            | Format::S32Le
            | Format::S32Be
            | Format::U32Le
            | Format::U32Be => Some(4),
            _ => None,
        }
    }
}

kernel_enum! {
    /// `SNDRV_PCM_SUBFORMAT_*`.
    Subformat {
        Std = 0 => "std",
        MsbitsMax = 1 => "msbits-max",
        Msbits20 = 2 => "msbits-20",
        Msbits24 = 3 => "msbits-24",
    }
}

kernel_enum! {
    /// `SNDRV_PCM_STREAM_*`.
    Direction {
        Playback = 0 => "playback",
        Capture = 1 => "capture",
    }
}

kernel_enum! {
    /// `SNDRV_PCM_CLASS_*`.
    PcmClass {
        Generic = 0 => "generic",
        Multi = 1 => "multi",
        Modem = 2 => "modem",
        Digitizer = 3 => "digitizer",
    }
}

kernel_enum! {
    /// `SNDRV_PCM_SUBCLASS_*`.
    PcmSubclass {
        GenericMix = 0 => "generic-mix",
        MultiMix = 1 => "multi-mix",
    }
}

kernel_enum! {
    /// Bit positions of `snd_pcm_hw_params.flags` (`SNDRV_PCM_HW_PARAMS_*`).
    HwParamsFlag {
        NoResample = 0 => "noresample",
        ExportBuffer = 1 => "export-buffer",
        NoPeriodWakeup = 2 => "no-period-wakeup",
        DrainSilence = 3 => "drain-silence",
    }
}

kernel_enum! {
    /// Bit positions of `snd_pcm_hw_params.info` (`SNDRV_PCM_INFO_*`).
    InfoFlag {
        Mmap = 0 => "mmap",
        MmapValid = 1 => "mmap-valid",
        Double = 2 => "double",
        Batch = 4 => "batch",
        SyncApplptr = 5 => "sync-applptr",
        PerfectDrain = 6 => "perfect-drain",
        Interleaved = 8 => "interleaved",
        NonInterleaved = 9 => "non-interleaved",
        Complex = 10 => "complex",
        BlockTransfer = 16 => "block-transfer",
        Overrange = 17 => "overrange",
        Resume = 18 => "resume",
        Pause = 19 => "pause",
        HalfDuplex = 20 => "half-duplex",
        JointDuplex = 21 => "joint-duplex",
        SyncStart = 22 => "sync-start",
        NoPeriodWakeup = 23 => "no-period-wakeup",
        HasLinkAtime = 24 => "has-link-atime",
        HasLinkAbsoluteAtime = 25 => "has-link-absolute-atime",
        HasLinkEstimatedAtime = 26 => "has-link-estimated-atime",
        HasLinkSynchronizedAtime = 27 => "has-link-synchronized-atime",
        ExplicitSync = 28 => "explicit-sync",
        NoRewinds = 29 => "no-rewinds",
        DrainTrigger = 30 => "drain-trigger",
        FifoInFrames = 31 => "fifo-in-frames",
    }
}

/// Flags of a bit field word that are known to [`InfoFlag`] or [`HwParamsFlag`].
pub fn flags_in<T: Copy>(all: &'static [T], word: u32, bit: fn(T) -> u32) -> Vec<T> {
    all.iter()
        .copied()
        .filter(|flag| word & (1 << bit(*flag)) != 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_labels_follow_raw_values() {
        assert_eq!(Format::from_raw(2), Some(Format::S16Le));
        assert_eq!(Format::S16Le.label(), "s16-le");
        assert_eq!(Format::from_raw(29), None);
        assert_eq!(Format::from_raw(30), None);
        assert_eq!(Format::from_raw(31), Some(Format::Special));
        assert_eq!(Format::from_raw(52).map(Format::label), Some("dsd-u32-be"));
        assert_eq!(Format::from_raw(53), None);
    }

    #[test]
    fn every_listed_value_round_trips() {
        for format in Format::ALL {
            assert_eq!(Format::from_raw(format.raw()), Some(*format));
        }
        for access in Access::ALL {
            assert_eq!(Access::from_raw(access.raw()), Some(*access));
        }
        for flag in InfoFlag::ALL {
            assert_eq!(InfoFlag::from_raw(flag.raw()), Some(*flag));
        }
    }

    #[test]
    fn physical_width_table() {
        let one = [Format::S8, Format::U8];
        let two = [Format::S16Le, Format::S16Be, Format::U16Le, Format::U16Be];
        let four = [
            Format::S24Le,
            Format::S24Be,
            Format::U24Le,
            Format::U24Be,
            Format::S32Le,
            Format::S32Be,
            Format::U32Le,
            Format::U32Be,
        ];

        for format in Format::ALL {
            let expected = if one.contains(format) {
                Some(1)
            } else if two.contains(format) {
                Some(2)
            } else if four.contains(format) {
                Some(4)
            } else {
                None
            };
            assert_eq!(format.physical_bytes(), expected, "{format}");
        }
        assert_eq!(Format::FloatLe.physical_bytes(), None);
        assert_eq!(Format::S24_3Le.physical_bytes(), None);
    }

    #[test]
    fn info_flags_decode_from_word() {
        let word = (1 << 0) | (1 << 8) | (1 << 19);
        let flags = flags_in(InfoFlag::ALL, word, InfoFlag::raw);
        assert_eq!(
            flags,
            vec![InfoFlag::Mmap, InfoFlag::Interleaved, InfoFlag::Pause]
        );
    }

    #[test]
    fn labels_render_through_display() {
        assert_eq!(Direction::Capture.to_string(), "capture");
        assert_eq!(PcmClass::Digitizer.to_string(), "digitizer");
        assert_eq!(PcmSubclass::MultiMix.to_string(), "multi-mix");
        assert_eq!(HwParamsFlag::ExportBuffer.to_string(), "export-buffer");
        assert_eq!(Subformat::Std.to_string(), "std");
    }

    #[test]
    fn serialized_as_labels() {
        assert_eq!(
            serde_json::to_string(&Access::RwInterleaved).unwrap(),
            "\"readwrite-interleaved\""
        );
        assert_eq!(
            serde_json::to_string(&[Format::S24_3Le, Format::DsdU32Be]).unwrap(),
            "[\"s24-3le\",\"dsd-u32-be\"]"
        );
    }
}
