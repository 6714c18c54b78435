/// When a search may stop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TargetPolicy {
    /// Stop as soon as the target vertex is settled.
    #[default]
    StopAtTarget,
    /// Keep going until every reachable vertex is settled.
    Exhaust,
}

/// Tuning knobs for a single shortest path search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub target_policy: TargetPolicy,
    /// Give up after settling this many vertices without reaching the target.
    /// When the target is already settled the search ends successfully instead.
    pub max_settled: Option<usize>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_target_policy(mut self, target_policy: TargetPolicy) -> Self {
        self.target_policy = target_policy;
        self
    }

    /// Shorthand for [`TargetPolicy::Exhaust`].
    pub fn exhaust(self) -> Self {
        self.with_target_policy(TargetPolicy::Exhaust)
    }

    pub fn with_max_settled(mut self, max_settled: usize) -> Self {
        self.max_settled = Some(max_settled);
        self
    }
}
