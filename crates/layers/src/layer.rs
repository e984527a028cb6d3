use foundation::math::Projection;

/// Identifies one feature overlay on the host map.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u64);

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "layer-{}", self.0)
    }
}

/// An overlay whose features are drawn under a single projection.
pub trait Layer {
    fn id(&self) -> LayerId;

    fn projection(&self) -> Projection;
}
