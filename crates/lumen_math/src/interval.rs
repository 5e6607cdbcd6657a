/// A closed range of ray parameters (or of one coordinate axis).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Contains nothing (min > max).
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    /// Contains everything.
    pub const UNIVERSE: Interval = Interval {
        min: f32::NEG_INFINITY,
        max: f32::INFINITY,
    };

    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Ray parameters strictly in front of an origin offset by `epsilon`.
    pub fn forward(epsilon: f32) -> Self {
        Self::new(epsilon, f32::INFINITY)
    }

    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// Inclusive containment.
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Exclusive containment.
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Same interval with its upper end pulled in to `max`.
    pub fn with_max(&self, max: f32) -> Interval {
        Interval::new(self.min, self.max.min(max))
    }

    /// Grow by `delta / 2` on each side.
    pub fn expand(&self, delta: f32) -> Interval {
        let padding = delta / 2.0;
        Interval::new(self.min - padding, self.max + padding)
    }

    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_vs_surrounds() {
        let interval = Interval::new(0.0, 10.0);

        assert!(interval.contains(0.0));
        assert!(interval.contains(10.0));
        assert!(!interval.surrounds(0.0));
        assert!(!interval.surrounds(10.0));
        assert!(interval.surrounds(5.0));
        assert!(!interval.contains(10.1));
    }

    #[test]
    fn test_forward() {
        let interval = Interval::forward(1e-4);
        assert!(!interval.surrounds(0.0));
        assert!(interval.surrounds(1.0));
        assert!(interval.surrounds(1e30));
    }

    #[test]
    fn test_with_max_only_shrinks() {
        let interval = Interval::new(0.0, 5.0);
        assert_eq!(interval.with_max(3.0).max, 3.0);
        assert_eq!(interval.with_max(8.0).max, 5.0);
    }

    #[test]
    fn test_empty_and_universe() {
        assert!(!Interval::EMPTY.contains(0.0));
        assert!(Interval::UNIVERSE.contains(-1e10));
        assert_eq!(
            Interval::surrounding(&Interval::EMPTY, &Interval::new(1.0, 2.0)),
            Interval::new(1.0, 2.0)
        );
    }

    #[test]
    fn test_expand() {
        let expanded = Interval::new(0.0, 10.0).expand(4.0);
        assert_eq!(expanded.min, -2.0);
        assert_eq!(expanded.max, 12.0);
    }
}
