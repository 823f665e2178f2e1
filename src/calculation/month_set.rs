//! Calendar month coverage within a single year.
//!
//! Overlapping periods must never credit the same month twice, so coverage is
//! tracked as a set of months (a 12-bit mask) and merged by union.

use serde::{Serialize, Serializer};

const ALL_MONTHS: u16 = 0x0FFF;

/// A set of calendar months (1 through 12) within one year.
///
/// # Example
///
/// ```
/// use inps_contributions::calculation::MonthSet;
///
/// let first_half = MonthSet::range(1, 6);
/// let from_april = MonthSet::range(4, 12);
/// let merged = first_half.union(from_april);
///
/// assert_eq!(merged.len(), 12);
/// assert_eq!(first_half.len() + from_april.len(), 15);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MonthSet(u16);

impl MonthSet {
    /// Returns an empty set.
    pub const fn empty() -> Self {
        MonthSet(0)
    }

    /// Returns the set of all twelve months.
    pub const fn full() -> Self {
        MonthSet(ALL_MONTHS)
    }

    /// Returns the inclusive range `from..=to`; empty if `from > to`.
    ///
    /// Months outside 1..=12 are ignored.
    pub fn range(from: u32, to: u32) -> Self {
        let mut set = Self::empty();
        set.insert_range(from, to);
        set
    }

    /// Returns months `1..=count`, with `count` clamped to 12.
    pub fn first_n(count: u32) -> Self {
        Self::range(1, count.min(12))
    }

    /// Adds a single month.
    pub fn insert(&mut self, month: u32) {
        if (1..=12).contains(&month) {
            self.0 |= 1 << (month - 1);
        }
    }

    /// Adds every month of the inclusive range `from..=to`.
    pub fn insert_range(&mut self, from: u32, to: u32) {
        for month in from.max(1)..=to.min(12) {
            self.insert(month);
        }
    }

    /// Returns the union of two sets.
    pub fn union(self, other: MonthSet) -> Self {
        MonthSet(self.0 | other.0)
    }

    /// Returns true if the month is in the set.
    pub fn contains(self, month: u32) -> bool {
        (1..=12).contains(&month) && self.0 & (1 << (month - 1)) != 0
    }

    /// Number of months in the set.
    pub fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Returns true if no month is in the set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates over the months in ascending order.
    pub fn iter(self) -> impl Iterator<Item = u32> {
        (1..=12).filter(move |month| self.contains(*month))
    }

    /// Returns the months as a sorted vector.
    pub fn to_vec(self) -> Vec<u32> {
        self.iter().collect()
    }
}

impl Serialize for MonthSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_full() {
        assert!(MonthSet::empty().is_empty());
        assert_eq!(MonthSet::full().len(), 12);
        assert_eq!(MonthSet::full().to_vec(), (1..=12).collect::<Vec<_>>());
    }

    #[test]
    fn test_range() {
        let set = MonthSet::range(9, 12);
        assert_eq!(set.to_vec(), vec![9, 10, 11, 12]);
        assert!(MonthSet::range(5, 4).is_empty());
    }

    #[test]
    fn test_overlapping_ranges_do_not_double_count() {
        let mut set = MonthSet::range(1, 6);
        set.insert_range(4, 12);
        assert_eq!(set.len(), 12);
    }

    #[test]
    fn test_first_n_clamps_to_twelve() {
        assert_eq!(MonthSet::first_n(5).to_vec(), vec![1, 2, 3, 4, 5]);
        assert_eq!(MonthSet::first_n(30), MonthSet::full());
        assert!(MonthSet::first_n(0).is_empty());
    }

    #[test]
    fn test_out_of_range_months_ignored() {
        let mut set = MonthSet::empty();
        set.insert(0);
        set.insert(13);
        set.insert_range(0, 2);
        assert_eq!(set.to_vec(), vec![1, 2]);
        assert!(!set.contains(13));
    }

    #[test]
    fn test_union() {
        let merged = MonthSet::range(1, 3).union(MonthSet::range(7, 12));
        assert_eq!(merged.len(), 9);
        assert!(!merged.contains(5));
    }

    #[test]
    fn test_serializes_as_month_list() {
        let json = serde_json::to_string(&MonthSet::range(8, 10)).unwrap();
        assert_eq!(json, "[8,9,10]");
    }
}
