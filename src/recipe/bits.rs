//! Bit-vector identity of an ingredient subset.

const WORD_BITS: usize = 64;

/// Collision-free identity of an ingredient subset.
///
/// All identities built for one catalog have the same word count, so
/// equality and hashing depend only on which bits are set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct RecipeBits {
    words: Vec<u64>,
}

impl RecipeBits {
    /// Empty identity for a catalog of `len` ingredients.
    pub fn empty(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(WORD_BITS)],
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.words
            .get(index / WORD_BITS)
            .is_some_and(|w| w & (1u64 << (index % WORD_BITS)) != 0)
    }

    /// Flips bit `index` in place.
    ///
    /// # Panics
    ///
    /// Panics if `index` is beyond the catalog length used at construction.
    pub fn toggle(&mut self, index: usize) {
        self.words[index / WORD_BITS] ^= 1u64 << (index % WORD_BITS);
    }

    /// Copy with bit `index` flipped.
    pub fn toggled(&self, index: usize) -> Self {
        let mut next = self.clone();
        next.toggle(index);
        next
    }

    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Set positions in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(wi, &word)| {
            (0..WORD_BITS)
                .filter(move |b| word & (1u64 << b) != 0)
                .map(move |b| wi * WORD_BITS + b)
        })
    }
}

impl FromIterator<usize> for RecipeBits {
    /// Builds an identity sized to the largest index; prefer
    /// [`RecipeBits::empty`] plus [`toggle`](RecipeBits::toggle) when the
    /// catalog length is known.
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        let mut bits = Self::default();
        for index in iter {
            let word = index / WORD_BITS;
            if word >= bits.words.len() {
                bits.words.resize(word + 1, 0);
            }
            bits.words[word] |= 1u64 << (index % WORD_BITS);
        }
        bits
    }
}
