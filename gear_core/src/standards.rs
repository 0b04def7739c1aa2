//! # Standards Table
//!
//! Preferred module series (DIN 780 / ISO 54, series I and II) and the
//! DIN 3975/3996-derived bounds used by the engine and validator.
//!
//! The table is plain immutable data. A single instance is built on first use
//! and shared by reference; callers that need different bounds construct their
//! own [`StandardsTable`] and pass it to
//! [`solve_with`](crate::calculations::solve_with) /
//! [`validate_with`](crate::validation::validate_with).
//!
//! ## Example
//!
//! ```rust
//! use gear_core::standards::StandardsTable;
//!
//! let table = StandardsTable::din();
//! assert_eq!(table.nearest_module(2.03), 2.0);
//! assert_eq!(table.nearest_module_not_above(1.99), Some(1.75));
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// DIN 780 preferred modules in mm, series I and II merged, ascending.
pub const DIN_780_MODULES_MM: [f64; 36] = [
    0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0, 1.125, 1.25, 1.375, 1.5, 1.75, 2.0, 2.25, 2.5, 2.75,
    3.0, 3.5, 4.0, 4.5, 5.0, 5.5, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 14.0, 16.0, 18.0, 20.0,
    22.0, 25.0,
];

/// Modules closer than this are considered equal when snapping (mm)
pub const MODULE_SNAP_TOLERANCE_MM: f64 = 0.001;

static DIN_TABLE: Lazy<StandardsTable> = Lazy::new(StandardsTable::default);

/// Closed interval `[min, max]` used for the table's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Range { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Read-only lookup of preferred modules and standard-derived bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardsTable {
    /// Preferred modules, ascending (mm)
    pub modules_mm: Vec<f64>,

    /// Pressure angles the engine accepts at all (deg)
    pub pressure_angle_limits_deg: Range,

    /// Pressure angles considered normal practice (deg)
    pub pressure_angle_usual_deg: Range,

    /// Modules the validator considers normal (mm)
    pub module_usual_mm: Range,

    /// Lead angle must lie strictly inside this interval or the engine rejects it (deg)
    pub lead_angle_limits_deg: Range,

    /// Lead angles below `min` are hard to cut, above `max` weaken the thread (deg)
    pub lead_angle_usual_deg: Range,

    /// Wheel tooth count below which undercut becomes likely
    pub min_wheel_teeth: u32,

    /// Smallest practical bore (mm)
    pub min_bore_mm: f64,

    /// Bores at or above this diameter take a DIN 6885 keyway (mm)
    pub keyway_min_bore_mm: f64,
}

impl Default for StandardsTable {
    fn default() -> Self {
        StandardsTable {
            modules_mm: DIN_780_MODULES_MM.to_vec(),
            pressure_angle_limits_deg: Range::new(5.0, 35.0),
            pressure_angle_usual_deg: Range::new(14.5, 25.0),
            module_usual_mm: Range::new(0.3, 25.0),
            lead_angle_limits_deg: Range::new(0.0, 85.0),
            lead_angle_usual_deg: Range::new(1.0, 45.0),
            min_wheel_teeth: 18,
            min_bore_mm: 3.0,
            keyway_min_bore_mm: 6.0,
        }
    }
}

impl StandardsTable {
    /// Shared DIN table, built once per process.
    pub fn din() -> &'static StandardsTable {
        &DIN_TABLE
    }

    /// Nearest preferred module. Ties resolve to the smaller module.
    ///
    /// Returns `module_mm` unchanged when the table is empty.
    pub fn nearest_module(&self, module_mm: f64) -> f64 {
        let mut best: Option<f64> = None;
        for &candidate in &self.modules_mm {
            let closer = match best {
                Some(b) => (candidate - module_mm).abs() < (b - module_mm).abs(),
                None => true,
            };
            if closer {
                best = Some(candidate);
            }
        }
        best.unwrap_or(module_mm)
    }

    /// Largest preferred module that does not exceed `module_mm`.
    pub fn nearest_module_not_above(&self, module_mm: f64) -> Option<f64> {
        self.modules_mm
            .iter()
            .copied()
            .filter(|&m| m <= module_mm + MODULE_SNAP_TOLERANCE_MM)
            .fold(None, |best: Option<f64>, m| match best {
                Some(b) if b >= m => Some(b),
                _ => Some(m),
            })
    }

    /// True when `module_mm` is (within tolerance) one of the preferred modules
    pub fn is_standard_module(&self, module_mm: f64) -> bool {
        self.modules_mm
            .iter()
            .any(|&m| (m - module_mm).abs() <= MODULE_SNAP_TOLERANCE_MM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modules_ascending() {
        let table = StandardsTable::din();
        assert!(table.modules_mm.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(table.modules_mm.first(), Some(&0.3));
        assert_eq!(table.modules_mm.last(), Some(&25.0));
    }

    #[test]
    fn test_nearest_module() {
        let table = StandardsTable::din();
        assert_eq!(table.nearest_module(2.03125), 2.0);
        assert_eq!(table.nearest_module(1.2), 1.25);
        assert_eq!(table.nearest_module(0.01), 0.3);
        assert_eq!(table.nearest_module(100.0), 25.0);
    }

    #[test]
    fn test_nearest_module_tie_prefers_smaller() {
        // 1.625 is equidistant from 1.5 and 1.75
        let table = StandardsTable::din();
        assert_eq!(table.nearest_module(1.625), 1.5);
    }

    #[test]
    fn test_nearest_module_not_above() {
        let table = StandardsTable::din();
        assert_eq!(table.nearest_module_not_above(2.03125), Some(2.0));
        assert_eq!(table.nearest_module_not_above(2.0), Some(2.0));
        assert_eq!(table.nearest_module_not_above(0.2), None);
    }

    #[test]
    fn test_is_standard_module() {
        let table = StandardsTable::din();
        assert!(table.is_standard_module(1.125));
        assert!(!table.is_standard_module(1.1));
    }

    #[test]
    fn test_range_contains() {
        let range = Range::new(14.5, 25.0);
        assert!(range.contains(20.0));
        assert!(range.contains(14.5));
        assert!(!range.contains(30.0));
    }
}
