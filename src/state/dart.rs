//! Dart input validation.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Highest numbered board segment.
pub const MAX_SEGMENT: u8 = 20;

/// The bull.
pub const BULL: u8 = 25;

/// Highest multiplier (treble).
pub const MAX_MULTIPLIER: u8 = 3;

/// A single dart as entered by the player.
///
/// Segment 0 is a miss. Multiplier 0 is accepted because the server uses
/// it for misses as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dart {
    pub segment: u8,
    pub multiplier: u8,
}

impl Dart {
    pub fn new(segment: u8, multiplier: u8) -> Result<Self> {
        let dart = Self {
            segment,
            multiplier,
        };
        if dart.is_valid() {
            Ok(dart)
        } else {
            Err(Error::InvalidDart {
                segment,
                multiplier,
            })
        }
    }

    pub fn miss() -> Self {
        Self {
            segment: 0,
            multiplier: 0,
        }
    }

    /// Check segment and multiplier are on the board.
    pub fn is_valid(&self) -> bool {
        (self.segment <= MAX_SEGMENT || self.segment == BULL) && self.multiplier <= MAX_MULTIPLIER
    }

    /// Face value for display. Bust and checkout rules stay on the server.
    pub fn points(&self) -> u16 {
        match self.segment {
            0 => 0,
            BULL if self.multiplier == 2 => 50,
            BULL => 25,
            s => u16::from(s) * u16::from(self.multiplier),
        }
    }

    /// Short label such as `T20`, `D16` or `5`.
    pub fn label(&self) -> String {
        match self.multiplier {
            2 => format!("D{}", self.segment),
            3 => format!("T{}", self.segment),
            _ => self.segment.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        assert!(Dart::new(20, 3).is_ok());
        assert!(Dart::new(25, 2).is_ok());
        assert!(Dart::new(0, 0).is_ok());
        assert_eq!(
            Dart::new(21, 1),
            Err(Error::InvalidDart {
                segment: 21,
                multiplier: 1
            })
        );
        assert!(Dart::new(20, 4).is_err());
    }

    #[test]
    fn test_points() {
        assert_eq!(Dart::new(20, 3).unwrap().points(), 60);
        assert_eq!(Dart::new(25, 1).unwrap().points(), 25);
        assert_eq!(Dart::new(25, 2).unwrap().points(), 50);
        assert_eq!(Dart::miss().points(), 0);
    }

    #[test]
    fn test_label() {
        assert_eq!(Dart::new(20, 3).unwrap().label(), "T20");
        assert_eq!(Dart::new(16, 2).unwrap().label(), "D16");
        assert_eq!(Dart::new(5, 1).unwrap().label(), "5");
    }
}
