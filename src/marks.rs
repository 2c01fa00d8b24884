//! Acceptance marks.
//!
//! A generalized Büchi automaton has `k` acceptance sets, numbered `0..k`.
//! Every state (state-based acceptance) or every transition (transition-based
//! acceptance) carries the set of acceptance-set indices it belongs to. A cycle
//! is accepting iff the union of the marks along it covers all `k` sets.

use std::fmt;

/// A set of acceptance-set indices backed by a vector of u64 words.
///
/// Trailing zero words are never stored, so two `Marks` holding the same
/// indices compare equal regardless of how they were built.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct Marks {
    words: Vec<u64>,
}

impl Marks {
    const BITS_PER_WORD: usize = 64;

    /// Creates an empty mark set.
    pub fn empty() -> Self {
        Self { words: Vec::new() }
    }

    /// Creates the mark set `{0, 1, ..., sets - 1}`.
    pub fn full(sets: usize) -> Self {
        let mut marks = Self::empty();
        marks.extend(0..sets);
        marks
    }

    /// Creates a mark set holding exactly one index.
    pub fn single(index: usize) -> Self {
        let mut marks = Self::empty();
        marks.insert(index);
        marks
    }

    #[inline]
    fn word_and_bit(index: usize) -> (usize, usize) {
        (index / Self::BITS_PER_WORD, index % Self::BITS_PER_WORD)
    }

    fn trim(&mut self) {
        while self.words.last() == Some(&0) {
            self.words.pop();
        }
    }

    /// Returns the number of indices in the set.
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns true if no index is set.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Returns true if `index` is in the set.
    pub fn contains(&self, index: usize) -> bool {
        let (word, bit) = Self::word_and_bit(index);
        self.words.get(word).is_some_and(|w| w & (1 << bit) != 0)
    }

    /// Adds `index` to the set. Returns true if it was not already present.
    pub fn insert(&mut self, index: usize) -> bool {
        let (word, bit) = Self::word_and_bit(index);
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        let mask = 1u64 << bit;
        let was_clear = self.words[word] & mask == 0;
        self.words[word] |= mask;
        was_clear
    }

    /// Adds all indices from an iterator.
    pub fn extend(&mut self, iter: impl IntoIterator<Item = usize>) {
        for index in iter {
            self.insert(index);
        }
    }

    /// Adds every index of `other` to this set.
    pub fn union_with(&mut self, other: &Marks) {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        for (w, o) in self.words.iter_mut().zip(&other.words) {
            *w |= o;
        }
    }

    /// Removes every index of `other` from this set.
    pub fn difference_with(&mut self, other: &Marks) {
        for (w, o) in self.words.iter_mut().zip(&other.words) {
            *w &= !o;
        }
        self.trim();
    }

    /// Returns true if the two sets share at least one index.
    pub fn intersects(&self, other: &Marks) -> bool {
        self.words.iter().zip(&other.words).any(|(a, b)| a & b != 0)
    }

    /// Returns true if the set contains all of `0..sets`.
    pub fn covers(&self, sets: usize) -> bool {
        let full_words = sets / Self::BITS_PER_WORD;
        let rest = sets % Self::BITS_PER_WORD;
        if self.words.len() < full_words + usize::from(rest > 0) {
            return false;
        }
        if self.words[..full_words].iter().any(|&w| w != u64::MAX) {
            return false;
        }
        if rest > 0 {
            let mask = (1u64 << rest) - 1;
            return self.words[full_words] & mask == mask;
        }
        true
    }

    /// Returns the largest index in the set, if any.
    pub fn max(&self) -> Option<usize> {
        let last = self.words.len().checked_sub(1)?;
        let word = self.words[last];
        Some(last * Self::BITS_PER_WORD + (Self::BITS_PER_WORD - 1 - word.leading_zeros() as usize))
    }

    /// Returns an iterator over the indices in ascending order.
    pub fn iter(&self) -> MarksIter<'_> {
        MarksIter {
            marks: self,
            word_idx: 0,
            current_word: self.words.first().copied().unwrap_or(0),
        }
    }
}

impl FromIterator<usize> for Marks {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut marks = Marks::empty();
        marks.extend(iter);
        marks
    }
}

impl fmt::Display for Marks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, index) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", index)?;
        }
        write!(f, "}}")
    }
}

/// Iterator over the indices of a [`Marks`] set.
pub struct MarksIter<'a> {
    marks: &'a Marks,
    word_idx: usize,
    current_word: u64,
}

impl Iterator for MarksIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current_word != 0 {
                let bit = self.current_word.trailing_zeros() as usize;
                self.current_word &= self.current_word - 1;
                return Some(self.word_idx * Marks::BITS_PER_WORD + bit);
            }
            self.word_idx += 1;
            if self.word_idx >= self.marks.words.len() {
                return None;
            }
            self.current_word = self.marks.words[self.word_idx];
        }
    }
}
