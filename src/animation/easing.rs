/// Easing curves mapping linear progress in [0, 1] to eased progress
///
/// Every curve maps 0 to 0 and 1 to 1 exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    QuadraticIn,
    QuadraticOut,
    QuadraticInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
}

impl Easing {
    /// Input outside [0, 1] is clamped
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadraticIn => t * t,
            Easing::QuadraticOut => t * (2.0 - t),
            Easing::QuadraticInOut => {
                let k = t * 2.0;
                if k < 1.0 {
                    0.5 * k * k
                } else {
                    let k = k - 1.0;
                    -0.5 * (k * (k - 2.0) - 1.0)
                }
            }
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => {
                let k = t - 1.0;
                k * k * k + 1.0
            }
            Easing::CubicInOut => {
                let k = t * 2.0;
                if k < 1.0 {
                    0.5 * k * k * k
                } else {
                    let k = k - 2.0;
                    0.5 * (k * k * k + 2.0)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 7] = [
        Easing::Linear,
        Easing::QuadraticIn,
        Easing::QuadraticOut,
        Easing::QuadraticInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
    ];

    #[test]
    fn test_endpoints_are_exact() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{:?}", easing);
            assert_eq!(easing.apply(1.0), 1.0, "{:?}", easing);
        }
    }

    #[test]
    fn test_in_out_curves_are_symmetric() {
        assert_eq!(Easing::QuadraticInOut.apply(0.5), 0.5);
        assert_eq!(Easing::CubicInOut.apply(0.5), 0.5);
        let a = Easing::CubicInOut.apply(0.25);
        let b = Easing::CubicInOut.apply(0.75);
        assert!((a + b - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_curves_are_monotonic() {
        for easing in ALL {
            let mut previous = 0.0;
            for step in 1..=100 {
                let value = easing.apply(step as f32 / 100.0);
                assert!(value >= previous, "{:?} decreases at step {}", easing, step);
                previous = value;
            }
        }
    }

    #[test]
    fn test_out_of_range_input_is_clamped() {
        assert_eq!(Easing::CubicIn.apply(-1.0), 0.0);
        assert_eq!(Easing::QuadraticOut.apply(3.0), 1.0);
    }
}
