/// Hook receiving intermediate values of a QASS computation.
///
/// Every method has an empty default body, so implementors override only
/// what they want to inspect. The engine calls the hook synchronously and
/// never depends on what it does.
pub trait ScoringObserver {
    /// Matrix after tuning-factor rescaling, one call per component.
    fn rescaled(&mut self, _component: usize, _matrix: &[Vec<f64>]) {}

    /// Aggregate standings of one component.
    fn ratings(&mut self, _component: usize, _student_ratings: &[f64], _mean_rating: f64) {}

    /// Contributions of one component.
    fn contributions(&mut self, _component: usize, _contributions: &[f64]) {}

    /// Final per-student contributions after components were merged.
    /// Single-component runs report the component's own contributions.
    fn merged(&mut self, _contributions: &[f64]) {}

    /// The two sides of a split-join check that passed.
    fn invariant(&mut self, _check: &'static str, _expected: f64, _actual: f64) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ScoringObserver for NoopObserver {}
