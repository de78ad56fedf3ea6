//! Seats, per-seat storage and turn direction.
//!
//! ## SeatId
//!
//! Positional slot at the table for the current game (0-based). A seat is
//! not an identity: with seat shuffling enabled the same strategy can sit in
//! different seats from one game to the next.
//!
//! ## SeatMap
//!
//! Per-seat data backed by a `Vec` for O(1) access, indexable by `SeatId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Seat identifier supporting up to 255 seats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeatId(pub u8);

impl SeatId {
    /// Create a new seat ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all seats of a table with `seat_count` seats.
    ///
    /// ```
    /// use mao_sim::core::SeatId;
    ///
    /// let seats: Vec<_> = SeatId::all(3).collect();
    /// assert_eq!(seats, vec![SeatId::new(0), SeatId::new(1), SeatId::new(2)]);
    /// ```
    pub fn all(seat_count: usize) -> impl Iterator<Item = SeatId> {
        (0..seat_count as u8).map(SeatId)
    }

    /// The seat reached by moving one place in `direction`, wrapping around.
    ///
    /// ```
    /// use mao_sim::core::{Direction, SeatId};
    ///
    /// assert_eq!(SeatId::new(3).step(Direction::Forward, 4), SeatId::new(0));
    /// assert_eq!(SeatId::new(0).step(Direction::Backward, 4), SeatId::new(3));
    /// ```
    #[must_use]
    pub fn step(self, direction: Direction, seat_count: usize) -> SeatId {
        let n = seat_count as i64;
        let next = (i64::from(self.0) + i64::from(direction.sign())).rem_euclid(n);
        SeatId(next as u8)
    }
}

impl std::fmt::Display for SeatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seat {}", self.0)
    }
}

/// Direction of play around the table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Increasing seat index (+1).
    #[default]
    Forward,
    /// Decreasing seat index (-1).
    Backward,
}

impl Direction {
    /// `+1` or `-1`.
    #[must_use]
    pub const fn sign(self) -> i8 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }

    /// The opposite direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// Per-seat data storage with O(1) access.
///
/// ```
/// use mao_sim::core::{SeatId, SeatMap};
///
/// let mut hand_sizes: SeatMap<usize> = SeatMap::with_value(4, 3);
/// hand_sizes[SeatId::new(1)] -= 1;
/// assert_eq!(hand_sizes.as_slice(), &[3, 2, 3, 3]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatMap<T> {
    data: Vec<T>,
}

impl<T> SeatMap<T> {
    /// Create a new SeatMap with values from a factory function.
    pub fn new(seat_count: usize, factory: impl Fn(SeatId) -> T) -> Self {
        assert!(seat_count <= 255, "At most 255 seats supported");

        let data = (0..seat_count as u8).map(|i| factory(SeatId(i))).collect();
        Self { data }
    }

    /// Create a new SeatMap with all entries set to the same value.
    pub fn with_value(seat_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(seat_count, |_| value.clone())
    }

    /// Create a new SeatMap with default values.
    pub fn with_default(seat_count: usize) -> Self
    where
        T: Default,
    {
        Self::new(seat_count, |_| T::default())
    }

    /// Get the number of seats.
    #[must_use]
    pub fn seat_count(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn get(&self, seat: SeatId) -> &T {
        &self.data[seat.index()]
    }

    pub fn get_mut(&mut self, seat: SeatId) -> &mut T {
        &mut self.data[seat.index()]
    }

    /// Iterate over (SeatId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (SeatId, &T)> {
        self.data.iter().enumerate().map(|(i, v)| (SeatId(i as u8), v))
    }

    /// Iterate over (SeatId, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SeatId, &mut T)> {
        self.data.iter_mut().enumerate().map(|(i, v)| (SeatId(i as u8), v))
    }

    /// Iterate over the values only, in seat order.
    pub fn values(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl<T> Index<SeatId> for SeatMap<T> {
    type Output = T;

    fn index(&self, seat: SeatId) -> &Self::Output {
        self.get(seat)
    }
}

impl<T> IndexMut<SeatId> for SeatMap<T> {
    fn index_mut(&mut self, seat: SeatId) -> &mut Self::Output {
        self.get_mut(seat)
    }
}
