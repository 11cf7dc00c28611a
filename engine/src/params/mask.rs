use serde::Serialize;

/// Number of enumerants a mask can describe.
pub const MASK_MAX: usize = 256;

const WORD_BITS: usize = u32::BITS as usize;
const MASK_WORDS: usize = MASK_MAX.div_ceil(WORD_BITS);

/// Bit vector of permitted enumerants, laid out as the kernel `snd_mask`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Mask {
    bits: [u32; MASK_WORDS],
}

impl Default for Mask {
    fn default() -> Self {
        Self {
            bits: [0; MASK_WORDS],
        }
    }
}

impl Mask {
    /// A mask permitting every enumerant, as the kernel expects before refine.
    pub fn any() -> Self {
        let mut mask = Self::default();
        mask.fill();
        mask
    }

    fn locate(index: usize) -> (usize, u32) {
        debug_assert!(index < MASK_MAX, "mask index {index} out of range");
        (index / WORD_BITS, 1 << (index % WORD_BITS))
    }

    pub fn test(&self, index: usize) -> bool {
        let (word, bit) = Self::locate(index);
        self.bits[word] & bit != 0
    }

    pub fn set(&mut self, index: usize) {
        let (word, bit) = Self::locate(index);
        self.bits[word] |= bit;
    }

    pub fn reset(&mut self, index: usize) {
        let (word, bit) = Self::locate(index);
        self.bits[word] &= !bit;
    }

    pub fn clear_all(&mut self) {
        self.bits = [0; MASK_WORDS];
    }

    pub fn fill(&mut self) {
        self.bits = [u32::MAX; MASK_WORDS];
    }

    /// Permits exactly the enumerants `0..width`.
    pub fn fill_all(&mut self, width: usize) {
        debug_assert!(width <= MASK_MAX);
        self.clear_all();
        for index in 0..width {
            self.set(index);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|word| *word == 0)
    }

    pub fn count(&self) -> usize {
        self.bits.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Indices of permitted enumerants in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..MASK_MAX).filter(move |index| self.test(*index))
    }

    /// The only permitted enumerant, if exactly one remains.
    pub fn single(&self) -> Option<usize> {
        let mut iter = self.iter();
        match (iter.next(), iter.next()) {
            (Some(index), None) => Some(index),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_all_permits_every_index_below_width() {
        for width in [1, 5, 31, 32, 33, 53, MASK_MAX] {
            let mut mask = Mask::default();
            mask.fill_all(width);
            assert!((0..width).all(|i| mask.test(i)), "width {width}");
            assert_eq!(mask.count(), width);
        }
    }

    #[test]
    fn fill_all_leaves_upper_bits_clear() {
        let mut mask = Mask::any();
        mask.fill_all(5);
        assert!(!mask.test(5));
        assert!(!mask.test(MASK_MAX - 1));
    }

    #[test]
    fn bits_cross_word_boundary() {
        let mut mask = Mask::default();
        mask.set(31);
        mask.set(32);
        assert!(mask.test(31));
        assert!(mask.test(32));
        assert!(!mask.test(16));
        assert_eq!(mask.iter().collect::<Vec<_>>(), vec![31, 32]);
    }

    #[test]
    fn single_requires_exactly_one_bit() {
        let mut mask = Mask::default();
        assert!(mask.is_empty());
        assert_eq!(mask.single(), None);
        mask.set(2);
        assert_eq!(mask.single(), Some(2));
        mask.set(3);
        assert_eq!(mask.single(), None);
        mask.reset(2);
        assert_eq!(mask.single(), Some(3));
    }

    #[test]
    fn any_is_full() {
        assert_eq!(Mask::any().count(), MASK_MAX);
        let mut mask = Mask::any();
        mask.clear_all();
        assert!(mask.is_empty());
    }
}
