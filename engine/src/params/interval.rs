use serde::{Serialize, Serializer, ser::SerializeStruct};
use std::fmt;

const OPEN_MIN: u32 = 1 << 0;
const OPEN_MAX: u32 = 1 << 1;
const INTEGER: u32 = 1 << 2;
const EMPTY: u32 = 1 << 3;

/// Numeric range of a negotiable parameter, laid out as the kernel `snd_interval`.
///
/// The kernel packs the four booleans into bit-fields of one `unsigned int`;
/// the constants above follow the little-endian allocation order.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    min: u32,
    max: u32,
    flags: u32,
}

impl Default for Interval {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl Interval {
    pub fn unbounded() -> Self {
        Self {
            min: 0,
            max: u32::MAX,
            flags: 0,
        }
    }

    /// A closed integer interval holding exactly `value`.
    pub fn single(value: u32) -> Self {
        Self {
            min: value,
            max: value,
            flags: INTEGER,
        }
    }

    pub fn reset_unbounded(&mut self) {
        *self = Self::unbounded();
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn open_min(&self) -> bool {
        self.flags & OPEN_MIN != 0
    }

    pub fn open_max(&self) -> bool {
        self.flags & OPEN_MAX != 0
    }

    pub fn integer_only(&self) -> bool {
        self.flags & INTEGER != 0
    }

    pub fn empty(&self) -> bool {
        self.flags & EMPTY != 0
    }

    /// The value of a non-empty, closed interval narrowed to one point.
    pub fn value(&self) -> Option<u32> {
        if self.empty() || self.open_min() || self.open_max() || self.min != self.max {
            None
        } else {
            Some(self.min)
        }
    }

    pub fn set_range(&mut self, min: u32, max: u32) {
        self.min = min;
        self.max = max;
    }

    pub fn set_open_min(&mut self, open: bool) {
        self.set_flag(OPEN_MIN, open);
    }

    pub fn set_open_max(&mut self, open: bool) {
        self.set_flag(OPEN_MAX, open);
    }

    pub fn set_integer_only(&mut self, integer: bool) {
        self.set_flag(INTEGER, integer);
    }

    pub fn set_empty(&mut self, empty: bool) {
        self.set_flag(EMPTY, empty);
    }

    fn set_flag(&mut self, flag: u32, on: bool) {
        if on {
            self.flags |= flag;
        } else {
            self.flags &= !flag;
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}, {}{}, ",
            if self.open_min() { '(' } else { '[' },
            self.min,
            self.max,
            if self.open_max() { ')' } else { ']' },
        )?;
        if self.integer_only() {
            write!(f, "integer, ")?;
        }
        if self.empty() {
            write!(f, "empty, ")?;
        }
        Ok(())
    }
}

impl Serialize for Interval {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Interval", 6)?;
        state.serialize_field("min", &self.min)?;
        state.serialize_field("max", &self.max)?;
        state.serialize_field("open_min", &self.open_min())?;
        state.serialize_field("open_max", &self.open_max())?;
        state.serialize_field("integer", &self.integer_only())?;
        state.serialize_field("empty", &self.empty())?;
        state.end()
    }
}
