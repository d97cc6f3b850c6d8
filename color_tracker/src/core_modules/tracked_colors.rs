// THEORY:
// The tracked color set is the operator's short list of reference colors. It
// has a fixed capacity and an unusual overflow rule: registering a color while
// the set is full does not evict the oldest entry, it empties the whole set and
// drops the new color too. The operator "resets" tracking by clicking once more
// after the set fills up.

use crate::core_modules::color_sample::ColorSample;
use std::convert::Infallible;

/// Outcome of offering a color to the set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// The color was appended at `index` (zero-based insertion order).
    Added { index: usize, sample: ColorSample },
    /// The set was full; it is now empty and nothing was added.
    Cleared { dropped: usize },
}

#[derive(Debug, Clone)]
pub struct TrackedColorSet {
    capacity: usize,
    colors: Vec<ColorSample>,
}

impl TrackedColorSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            colors: Vec::with_capacity(capacity),
        }
    }

    /// Appends `sample` if there is room, otherwise clears the set.
    pub fn register(&mut self, sample: ColorSample) -> Registration {
        match self.register_with(|| Ok::<_, Infallible>(sample)) {
            Ok(registration) => registration,
            Err(never) => match never {},
        }
    }

    /// Like [`register`](Self::register), but the color is only produced when
    /// there is room for it. A full set is cleared without calling `sample`.
    pub fn register_with<E>(
        &mut self,
        sample: impl FnOnce() -> Result<ColorSample, E>,
    ) -> Result<Registration, E> {
        if self.is_full() {
            return Ok(Registration::Cleared {
                dropped: self.reset(),
            });
        }
        let sample = sample()?;
        self.colors.push(sample);
        Ok(Registration::Added {
            index: self.colors.len() - 1,
            sample,
        })
    }

    /// Empties the set, returning how many colors were dropped.
    pub fn reset(&mut self) -> usize {
        let dropped = self.colors.len();
        self.colors.clear();
        dropped
    }

    pub fn is_full(&self) -> bool {
        self.colors.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// The most recently registered color.
    pub fn latest(&self) -> Option<&ColorSample> {
        self.colors.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColorSample> {
        self.colors.iter()
    }

    pub fn as_slice(&self) -> &[ColorSample] {
        &self.colors
    }
}
