//! Sides and per-side data storage.
//!
//! ## Side
//!
//! The base game is strictly two-sided: `Blue` and `Red`.
//!
//! ## SideMap
//!
//! Fixed-size per-side storage indexed by `Side`. Serializes as an object
//! with `blue` and `red` keys.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two competing sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Moves first by default.
    Blue,
    /// Moves second by default.
    Red,
}

impl Side {
    /// Both sides in index order.
    pub const ALL: [Side; 2] = [Side::Blue, Side::Red];

    /// The opposing side.
    #[must_use]
    pub const fn other(self) -> Side {
        match self {
            Side::Blue => Side::Red,
            Side::Red => Side::Blue,
        }
    }

    /// Raw index (Blue = 0, Red = 1).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::Blue => 0,
            Side::Red => 1,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Blue => write!(f, "Blue"),
            Side::Red => write!(f, "Red"),
        }
    }
}

/// Per-side data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use santorini_engine::core::{Side, SideMap};
///
/// let mut score: SideMap<i32> = SideMap::new(|_| 0);
/// score[Side::Red] += 3;
/// assert_eq!(score[Side::Blue], 0);
/// assert_eq!(score[Side::Red], 3);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMap<T> {
    pub blue: T,
    pub red: T,
}

impl<T> SideMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(Side) -> T) -> Self {
        Self {
            blue: factory(Side::Blue),
            red: factory(Side::Red),
        }
    }

    /// Create a map from explicit values.
    pub const fn from_values(blue: T, red: T) -> Self {
        Self { blue, red }
    }

    /// Create a map with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            blue: value.clone(),
            red: value,
        }
    }

    /// Get a reference to a side's data.
    #[must_use]
    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Blue => &self.blue,
            Side::Red => &self.red,
        }
    }

    /// Get a mutable reference to a side's data.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Blue => &mut self.blue,
            Side::Red => &mut self.red,
        }
    }

    /// Iterate over (Side, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        [(Side::Blue, &self.blue), (Side::Red, &self.red)].into_iter()
    }

    /// Transform every entry.
    pub fn map<U>(self, mut f: impl FnMut(Side, T) -> U) -> SideMap<U> {
        SideMap {
            blue: f(Side::Blue, self.blue),
            red: f(Side::Red, self.red),
        }
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &Self::Output {
        self.get(side)
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        self.get_mut(side)
    }
}
