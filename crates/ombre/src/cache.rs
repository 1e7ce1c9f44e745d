use crate::color::Rgba;
use crate::gradient::Paint;
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

/// Memoizes parsed gradient descriptors.
///
/// Keys combine the caller's base color with the raw descriptor, since the base color seeds the
/// first stop. Concurrent parses of the same key may both insert; the last writer wins. Entries
/// are never evicted.
#[derive(Debug, Default)]
pub struct GradientCache {
    entries: Mutex<FxHashMap<String, Paint>>,
}

impl GradientCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache, created on first use.
    pub fn shared() -> Arc<Self> {
        static SHARED: OnceLock<Arc<GradientCache>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(Self::new())).clone()
    }

    pub fn key(base: Rgba, descriptor: &str) -> String {
        format!("{}{}", base.to_hex(), descriptor)
    }

    pub fn get(&self, key: &str) -> Option<Paint> {
        self.lock().get(key).cloned()
    }

    pub fn insert(&self, key: String, paint: Paint) {
        self.lock().insert(key, paint);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    // A panic while holding the lock cannot leave a half-written map entry behind.
    fn lock(&self) -> MutexGuard<'_, FxHashMap<String, Paint>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
