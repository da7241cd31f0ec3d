//! Linear rescaling of raw scores onto a display range.
//!
//! A [`LinearScale`] is a plain value built for one scoring pass; nothing is
//! shared between calls.

/// Minimum and maximum of `values`, or `(0, 0)` when there are none.
pub fn extent<I>(values: I) -> (u32, u32)
where
    I: IntoIterator<Item = u32>,
{
    values
        .into_iter()
        .fold(None, |acc: Option<(u32, u32)>, value| match acc {
            None => Some((value, value)),
            Some((min, max)) => Some((min.min(value), max.max(value))),
        })
        .unwrap_or((0, 0))
}

/// Maps the domain `[d0, d1]` linearly onto the range `[r0, r1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Interpolated value for `x`. Values outside the domain extrapolate.
    ///
    /// A single-point domain maps everything to the first range value.
    pub fn apply(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            return r0;
        }
        r0 + (x - d0) / span * (r1 - r0)
    }
}
