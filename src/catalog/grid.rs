//! The weekly time grid.

use crate::error::CatalogError;

/// One (day, hour) cell of the weekly grid.
///
/// Ordered day-major, so sorting slots yields chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSlot {
    pub day: u32,
    pub hour: u32,
}

impl TimeSlot {
    pub fn new(day: u32, hour: u32) -> Self {
        Self { day, hour }
    }
}

/// A bounded grid of one-hour slots: days `0..days`, hours `hour_start..hour_end`.
///
/// # Examples
///
/// ```
/// use u_timetable::catalog::TimeGrid;
///
/// let grid = TimeGrid::new(5, 8, 20);
/// assert_eq!(grid.hours_per_day(), 12);
/// assert_eq!(grid.slot_count(), 60);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeGrid {
    pub days: u32,
    pub hour_start: u32,
    pub hour_end: u32,
}

impl Default for TimeGrid {
    /// Monday to Saturday, 07:00 to 20:00.
    fn default() -> Self {
        Self {
            days: 6,
            hour_start: 7,
            hour_end: 20,
        }
    }
}

impl TimeGrid {
    pub fn new(days: u32, hour_start: u32, hour_end: u32) -> Self {
        Self {
            days,
            hour_start,
            hour_end,
        }
    }

    pub fn hours_per_day(&self) -> u32 {
        self.hour_end.saturating_sub(self.hour_start)
    }

    pub fn slot_count(&self) -> usize {
        self.days as usize * self.hours_per_day() as usize
    }

    pub fn days(&self) -> std::ops::Range<u32> {
        0..self.days
    }

    pub fn hours(&self) -> std::ops::Range<u32> {
        self.hour_start..self.hour_end
    }

    /// Every slot, day-major then hour.
    pub fn slots(&self) -> impl Iterator<Item = TimeSlot> + '_ {
        self.days()
            .flat_map(move |day| self.hours().map(move |hour| TimeSlot::new(day, hour)))
    }

    pub fn contains(&self, slot: TimeSlot) -> bool {
        slot.day < self.days && self.hours().contains(&slot.hour)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.days == 0 {
            return Err(CatalogError::InvalidGrid("grid has no days".into()));
        }
        if self.hour_end <= self.hour_start {
            return Err(CatalogError::InvalidGrid(format!(
                "hour range {}..{} is empty",
                self.hour_start, self.hour_end
            )));
        }
        if self.hour_end > 24 {
            return Err(CatalogError::InvalidGrid(format!(
                "hour_end {} is past midnight",
                self.hour_end
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid() {
        let grid = TimeGrid::default();
        assert_eq!(grid.days, 6);
        assert_eq!(grid.hours_per_day(), 13);
        assert!(grid.validate().is_ok());
    }

    #[test]
    fn test_slots_are_day_major() {
        let grid = TimeGrid::new(2, 8, 10);
        let slots: Vec<_> = grid.slots().collect();
        assert_eq!(
            slots,
            vec![
                TimeSlot::new(0, 8),
                TimeSlot::new(0, 9),
                TimeSlot::new(1, 8),
                TimeSlot::new(1, 9),
            ]
        );
        let mut sorted = slots.clone();
        sorted.sort();
        assert_eq!(sorted, slots);
    }

    #[test]
    fn test_contains() {
        let grid = TimeGrid::new(5, 8, 20);
        assert!(grid.contains(TimeSlot::new(4, 19)));
        assert!(!grid.contains(TimeSlot::new(5, 8)));
        assert!(!grid.contains(TimeSlot::new(0, 20)));
    }

    #[test]
    fn test_invalid_grids() {
        assert!(TimeGrid::new(0, 8, 20).validate().is_err());
        assert!(TimeGrid::new(5, 8, 8).validate().is_err());
        assert!(TimeGrid::new(5, 8, 25).validate().is_err());
    }
}
