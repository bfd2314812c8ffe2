//! Float definition usable as a de-duplication key.

/// `f32` compared and hashed at the precision it is written to documents with.
///
/// Two values equal each other when they produce the same number in the output (3 decimal places). Non-finite values are written as `0`, so they equal `0.0`.
#[derive(Debug, Clone, Copy, Default)]
#[repr(transparent)]
pub struct ShapeF32(f32);

impl ShapeF32 {
    /// Wraps a float.
    #[inline]
    #[must_use]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Gets the internal value.
    #[inline]
    #[must_use]
    pub const fn as_f32(self) -> f32 {
        self.0
    }

    fn key(self) -> i64 {
        let value = f64::from(self.0);
        if value.is_finite() {
            (value * 1000.0).round() as i64
        } else {
            0
        }
    }
}

impl PartialEq for ShapeF32 {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for ShapeF32 {}

impl std::hash::Hash for ShapeF32 {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for ShapeF32 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ShapeF32 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key().cmp(&other.key())
    }
}

impl From<f32> for ShapeF32 {
    fn from(value: f32) -> Self {
        Self(value)
    }
}

impl From<ShapeF32> for f32 {
    fn from(value: ShapeF32) -> Self {
        value.as_f32()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::ShapeF32;

    #[test]
    fn equal_at_written_precision() {
        assert_eq!(ShapeF32::new(0.0), ShapeF32::new(-0.0));
        assert_eq!(ShapeF32::new(0.1), ShapeF32::new(0.1000001));
        assert_ne!(ShapeF32::new(0.1), ShapeF32::new(0.102));
        assert_eq!(ShapeF32::new(f32::NAN), ShapeF32::new(0.0));

        let set: HashSet<_> = [1.0, 1.0, 1.0004, 2.5].map(ShapeF32::new).into();
        assert_eq!(set.len(), 2);
    }
}
