//! The escape-time test.  A point belongs to the Mandelbrot set if
//! the orbit of zero under `z -> z * z + c` stays bounded forever; we
//! can only afford a finite number of steps, so a point that survives
//! the whole budget is declared bounded.

use num::Complex;

/// The outcome of iterating a single point.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Escape {
    /// The orbit never left the radius-2 disc within the budget.
    Bounded,
    /// The orbit left the disc after this many squaring steps.  Always
    /// at least 1 and strictly less than the budget.
    Escaped(u32),
}

impl Escape {
    /// True when the point is considered part of the set.
    pub fn is_bounded(self) -> bool {
        self == Escape::Bounded
    }
}

/// Iterate `c` at most `budget` times.  The magnitude is checked
/// before each step, so an escape detected only after the final step
/// still counts as bounded, and a budget of zero classifies every
/// point as bounded.
#[inline]
pub fn evaluate(c: Complex<f64>, budget: u32) -> Escape {
    let mut z = Complex {
        re: 0.0_f64,
        im: 0.0_f64,
    };
    let mut i = 0;
    while i < budget && z.norm_sqr() < 4.0_f64 {
        z = z * z + c;
        i += 1;
    }
    if i == budget {
        Escape::Bounded
    } else {
        Escape::Escaped(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::distributions::{Distribution, Uniform};

    #[test]
    fn origin_never_escapes() {
        for budget in &[1, 2, 10, 1000] {
            assert_eq!(evaluate(Complex::new(0.0, 0.0), *budget), Escape::Bounded);
        }
    }

    #[test]
    fn minus_one_cycles_and_stays_bounded() {
        for budget in &[2, 3, 1000] {
            assert_eq!(evaluate(Complex::new(-1.0, 0.0), *budget), Escape::Bounded);
        }
    }

    #[test]
    fn one_escapes_on_the_second_step() {
        // 0 -> 1 -> 2, and |2| is already out.
        assert_eq!(evaluate(Complex::new(1.0, 0.0), 4), Escape::Escaped(2));
        assert_eq!(evaluate(Complex::new(1.0, 0.0), 1000), Escape::Escaped(2));
    }

    #[test]
    fn far_points_escape_after_one_step() {
        assert_eq!(evaluate(Complex::new(10.0, 0.0), 1000), Escape::Escaped(1));
        assert_eq!(evaluate(Complex::new(-3.0, 2.5), 2), Escape::Escaped(1));
    }

    #[test]
    fn escape_on_the_last_step_counts_as_bounded() {
        assert_eq!(evaluate(Complex::new(10.0, 0.0), 1), Escape::Bounded);
        assert_eq!(evaluate(Complex::new(1.0, 0.0), 2), Escape::Bounded);
    }

    #[test]
    fn zero_budget_is_bounded() {
        assert_eq!(evaluate(Complex::new(10.0, 0.0), 0), Escape::Bounded);
        assert!(evaluate(Complex::new(0.5, 0.5), 0).is_bounded());
    }

    #[test]
    fn one_plus_i_escapes() {
        // 0 -> 1+i -> 1+3i
        assert_eq!(evaluate(Complex::new(1.0, 1.0), 1000), Escape::Escaped(2));
        assert_eq!(evaluate(Complex::new(1.0, -1.0), 1000), Escape::Escaped(2));
    }

    #[test]
    fn conjugates_escape_together() {
        let mut rng = rand::thread_rng();
        let range = Uniform::new_inclusive(-2.0_f64, 2.0_f64);
        for _ in 0..500 {
            let c = Complex::new(range.sample(&mut rng), range.sample(&mut rng));
            assert_eq!(evaluate(c, 500), evaluate(c.conj(), 500), "at {}", c);
        }
    }

    #[test]
    fn escape_count_stays_below_budget() {
        let range = Uniform::new_inclusive(-2.5_f64, 2.5_f64);
        let mut rng = rand::thread_rng();
        for _ in 0..500 {
            let c = Complex::new(range.sample(&mut rng), range.sample(&mut rng));
            if let Escape::Escaped(i) = evaluate(c, 64) {
                assert!(i >= 1 && i < 64);
            }
        }
    }
}
