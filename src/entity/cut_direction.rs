//! Definition of [`CutDirection`] and its circular arithmetic.

/// Direction to cut a note, as stored in documents.
///
/// The eight directional values form a circle in 45 degree steps. [`CutDirection::Any`] lies outside that circle and is left unchanged by every rotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum CutDirection {
    /// Self explanatory.
    #[default]
    Up = 0,
    /// Self explanatory.
    Down = 1,
    /// Self explanatory.
    Left = 2,
    /// Self explanatory.
    Right = 3,
    /// Self explanatory.
    UpLeft = 4,
    /// Self explanatory.
    UpRight = 5,
    /// Self explanatory.
    DownLeft = 6,
    /// Self explanatory.
    DownRight = 7,
    /// Dot note, may be cut in any direction.
    Any = 8,
}

impl CutDirection {
    /// Directional values in clockwise order, starting from [`CutDirection::Up`].
    pub const CLOCKWISE: [Self; 8] = [
        Self::Up,
        Self::UpRight,
        Self::Right,
        Self::DownRight,
        Self::Down,
        Self::DownLeft,
        Self::Left,
        Self::UpLeft,
    ];

    /// Converts the integer stored in documents. Unknown values fall back to [`CutDirection::Up`].
    #[must_use]
    pub const fn from_i32(value: i32) -> Self {
        match value {
            1 => Self::Down,
            2 => Self::Left,
            3 => Self::Right,
            4 => Self::UpLeft,
            5 => Self::UpRight,
            6 => Self::DownLeft,
            7 => Self::DownRight,
            8 => Self::Any,
            _ => Self::Up,
        }
    }

    /// The integer stored in documents.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Up => "Up",
            Self::Down => "Down",
            Self::Left => "Left",
            Self::Right => "Right",
            Self::UpLeft => "UpLeft",
            Self::UpRight => "UpRight",
            Self::DownLeft => "DownLeft",
            Self::DownRight => "DownRight",
            Self::Any => "Any",
        }
    }

    /// Position on the clockwise circle, `None` for [`CutDirection::Any`].
    #[must_use]
    pub fn clockwise_index(self) -> Option<usize> {
        Self::CLOCKWISE.iter().position(|&dir| dir == self)
    }

    fn from_clockwise_index(index: i64) -> Self {
        let len = Self::CLOCKWISE.len() as i64;
        Self::CLOCKWISE
            .get(index.rem_euclid(len) as usize)
            .copied()
            .unwrap_or(Self::Any)
    }

    /// Rotates by `steps` of 45 degrees.
    #[must_use]
    pub fn rotate(self, steps: i32, clockwise: bool) -> Self {
        let Some(index) = self.clockwise_index() else {
            return self;
        };
        let steps = i64::from(steps);
        Self::from_clockwise_index(index as i64 + if clockwise { steps } else { -steps })
    }

    /// Finds the direction halfway along the shorter arc from `self` to `target`.
    ///
    /// When both arcs are equally long, the clockwise one is taken. An odd number of steps is rounded down unless `round_up`. If either end is [`CutDirection::Any`], `self` is returned.
    #[must_use]
    pub fn midway_to(self, target: Self, round_up: bool) -> Self {
        let (Some(from), Some(to)) = (self.clockwise_index(), target.clockwise_index()) else {
            return self;
        };
        let len = Self::CLOCKWISE.len() as i64;
        let distance = (to as i64 - from as i64).rem_euclid(len);
        let clockwise = distance <= len / 2;
        let half = (distance.min(len - distance) + i64::from(round_up)) / 2;
        Self::from_clockwise_index(from as i64 + if clockwise { half } else { -half })
    }

    /// Whether `target` is at most `intervals` steps of 45 degrees away along the circle.
    ///
    /// Equal directions are always within any non-negative interval, [`CutDirection::Any`] included. Otherwise [`CutDirection::Any`] is within nothing.
    #[must_use]
    pub fn is_within(self, target: Self, intervals: i32) -> bool {
        if intervals < 0 {
            return false;
        }
        if self == target {
            return true;
        }
        let (Some(from), Some(to)) = (self.clockwise_index(), target.clockwise_index()) else {
            return false;
        };
        let len = Self::CLOCKWISE.len();
        let distance = from.abs_diff(to);
        let circular = distance.min(len - distance);
        circular <= intervals as usize
    }
}

#[cfg(test)]
mod tests {
    use super::{CutDirection::*, *};

    #[test]
    fn full_rotation_is_identity() {
        for dir in CutDirection::CLOCKWISE {
            assert_eq!(dir.rotate(8, true), dir);
            assert_eq!(dir.rotate(8, false), dir);
            assert_eq!(dir.rotate(-16, true), dir);
        }
    }

    #[test]
    fn any_is_fixed() {
        for steps in [-9, -1, 0, 1, 3, 8, 100] {
            assert_eq!(Any.rotate(steps, true), Any);
            assert_eq!(Any.rotate(steps, false), Any);
        }
        assert_eq!(Any.midway_to(Up, false), Any);
        assert_eq!(Up.midway_to(Any, false), Up);
    }

    #[test]
    fn rotate_steps() {
        assert_eq!(Up.rotate(1, true), UpRight);
        assert_eq!(Up.rotate(1, false), UpLeft);
        assert_eq!(Left.rotate(2, true), Up);
        assert_eq!(DownLeft.rotate(3, false), Right);
    }

    #[test]
    fn midway() {
        assert_eq!(Up.midway_to(Right, false), UpRight);
        assert_eq!(Up.midway_to(Left, false), UpLeft);
        // Opposite ends tie, so the clockwise arc is taken.
        assert_eq!(Up.midway_to(Down, false), Right);
        assert_eq!(Down.midway_to(Up, false), Left);
        // Three steps apart: round down or up.
        assert_eq!(Up.midway_to(DownRight, false), UpRight);
        assert_eq!(Up.midway_to(DownRight, true), Right);
        assert_eq!(Up.midway_to(DownLeft, true), Left);
        assert_eq!(Right.midway_to(Right, true), Right);
    }

    #[test]
    fn within() {
        for dir in [Up, Down, Left, Right, UpLeft, UpRight, DownLeft, DownRight, Any] {
            assert!(dir.is_within(dir, 0));
        }
        assert!(Up.is_within(UpLeft, 1));
        assert!(!Up.is_within(Left, 1));
        assert!(Up.is_within(Down, 4));
        assert!(UpLeft.is_within(UpRight, 2));
        assert!(!Any.is_within(Up, 8));
        assert!(!Up.is_within(Up, -1));
    }

    #[test]
    fn integers() {
        for value in 0..=8 {
            assert_eq!(CutDirection::from_i32(value).as_i32(), value);
        }
        assert_eq!(CutDirection::from_i32(42), Up);
        assert_eq!(DownRight.name(), "DownRight");
    }
}
