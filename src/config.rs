//! Engine configuration.

/// Default cap on tree depth.
pub const DEFAULT_MAX_DEPTH: u32 = 1024;

/// Tunables for an [`Engine`](crate::Engine).
///
/// ```ignore
/// let config = EngineConfig::default().with_max_depth(64);
/// let engine = Engine::with_config(body().into(), HeadlessBackend::new(), config);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Deepest depth a node may be mounted at. The root is depth 1.
    pub max_depth: u32,
    /// Return identities of dismounted nodes to the reuse pool.
    ///
    /// Turning this off makes every identity unique for the whole session,
    /// which helps when tracking down a handle kept past its dismount.
    pub recycle_ids: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            recycle_ids: true,
        }
    }
}

impl EngineConfig {
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_recycle_ids(mut self, recycle_ids: bool) -> Self {
        self.recycle_ids = recycle_ids;
        self
    }
}
