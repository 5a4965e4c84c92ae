//! Level cache
//!
//! Keeps decoded levels shared behind `Arc`s so repeated requests for the same
//! world/stage skip decoding. The cache is an ordinary value owned by the
//! caller; [`LevelLoader`] itself holds no state.

use crate::asset::{AssetReader, FsAssetReader};
use crate::level::LevelDefinition;
use crate::loader::LevelLoader;
use crate::Result;
use crobot_config::LoaderConfig;
use crobot_core::{LevelKey, StageId, WorldId};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of levels to keep in cache (0 = unbounded)
    pub max_levels: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_levels: crobot_config::DEFAULT_MAX_CACHED_LEVELS,
        }
    }
}

impl From<&LoaderConfig> for CacheConfig {
    fn from(config: &LoaderConfig) -> Self {
        Self {
            max_levels: config.max_cached_levels,
        }
    }
}

/// Cache entry with metadata
#[derive(Debug, Clone)]
struct CacheEntry {
    /// The cached level
    level: Arc<LevelDefinition>,

    /// Insertion sequence number, used for eviction order
    inserted: u64,
}

/// Level cache with oldest-first eviction
pub struct LevelCache<R> {
    /// Decoder used on cache misses
    loader: LevelLoader<R>,

    /// Cached levels indexed by world/stage
    cache: DashMap<LevelKey, CacheEntry>,

    /// Level most recently handed out by `get`
    current: RwLock<Option<Arc<LevelDefinition>>>,

    /// Cache configuration
    config: CacheConfig,

    /// Next insertion sequence number
    sequence: AtomicU64,
}

impl LevelCache<FsAssetReader> {
    /// Build a filesystem-backed cache from loader configuration
    pub fn from_config(config: &LoaderConfig) -> Self {
        let reader = FsAssetReader::new(&config.assets_root);
        let loader = LevelLoader::with_levels_dir(reader, config.levels_dir.clone());
        Self::new(loader, CacheConfig::from(config))
    }
}

impl<R: AssetReader> LevelCache<R> {
    /// Create a new level cache
    pub fn new(loader: LevelLoader<R>, config: CacheConfig) -> Self {
        Self {
            loader,
            cache: DashMap::new(),
            current: RwLock::new(None),
            config,
            sequence: AtomicU64::new(0),
        }
    }

    /// Create a new level cache with default config
    pub fn with_defaults(loader: LevelLoader<R>) -> Self {
        Self::new(loader, CacheConfig::default())
    }

    pub fn loader(&self) -> &LevelLoader<R> {
        &self.loader
    }

    /// Get a level from cache or load it
    ///
    /// On success the level also becomes [`current`](Self::current). A failed
    /// load clears `current` but leaves other cached levels alone.
    pub fn get(&self, world: WorldId, stage: StageId) -> Result<Arc<LevelDefinition>> {
        let key = LevelKey::new(world, stage);

        let cached = self.cache.get(&key).map(|entry| Arc::clone(&entry.level));
        let level = match cached {
            Some(level) => {
                tracing::trace!(level = %key, "level cache hit");
                level
            }
            None => match self.load_level(key) {
                Ok(level) => level,
                Err(e) => {
                    tracing::warn!(level = %key, error = %e, "level load failed");
                    *self.current.write() = None;
                    return Err(e);
                }
            },
        };

        *self.current.write() = Some(Arc::clone(&level));
        Ok(level)
    }

    /// Decode a level and publish it
    fn load_level(&self, key: LevelKey) -> Result<Arc<LevelDefinition>> {
        tracing::debug!(level = %key, "level cache miss");
        let level = Arc::new(self.loader.load(key.world, key.stage)?);

        self.evict_if_needed();

        // A concurrent loader may have published first; keep its copy
        let level = match self.cache.entry(key) {
            Entry::Occupied(existing) => Arc::clone(&existing.get().level),
            Entry::Vacant(slot) => {
                let inserted = self.sequence.fetch_add(1, Ordering::Relaxed);
                slot.insert(CacheEntry {
                    level: Arc::clone(&level),
                    inserted,
                });
                level
            }
        };

        Ok(level)
    }

    /// The level most recently returned by a successful [`get`](Self::get)
    pub fn current(&self) -> Option<Arc<LevelDefinition>> {
        self.current.read().clone()
    }

    /// Reload a level from its asset (refresh cache)
    pub fn reload(&self, world: WorldId, stage: StageId) -> Result<Arc<LevelDefinition>> {
        self.remove(world, stage);
        self.get(world, stage)
    }

    /// Remove a level from cache
    pub fn remove(&self, world: WorldId, stage: StageId) -> Option<Arc<LevelDefinition>> {
        self.cache
            .remove(&LevelKey::new(world, stage))
            .map(|(_, entry)| entry.level)
    }

    /// Check whether a level is cached
    pub fn contains(&self, world: WorldId, stage: StageId) -> bool {
        self.cache.contains_key(&LevelKey::new(world, stage))
    }

    /// Clear all cached levels
    pub fn clear(&self) {
        self.cache.clear();
        *self.current.write() = None;
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let mut total_tiles = 0;
        for entry in self.cache.iter() {
            total_tiles += entry.level.tiles().len();
        }

        CacheStats {
            num_levels: self.cache.len(),
            total_tiles,
        }
    }

    /// Drop the oldest entries until there is room for one more
    fn evict_if_needed(&self) {
        if self.config.max_levels == 0 || self.cache.len() < self.config.max_levels {
            return;
        }

        let mut entries: Vec<(LevelKey, u64)> = self
            .cache
            .iter()
            .map(|entry| (*entry.key(), entry.inserted))
            .collect();
        entries.sort_by_key(|&(_, inserted)| inserted);

        let excess = (entries.len() + 1).saturating_sub(self.config.max_levels);
        for (key, _) in entries.into_iter().take(excess) {
            tracing::debug!(level = %key, "evicting cached level");
            self.cache.remove(&key);
        }
    }

    /// Preload levels into cache
    pub fn preload(&self, keys: &[LevelKey]) -> Result<()> {
        for key in keys {
            self.get(key.world, key.stage)?;
        }
        Ok(())
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of levels in cache
    pub num_levels: usize,

    /// Tiles held across all cached levels
    pub total_tiles: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::MemoryAssetReader;
    use crate::LevelError;

    fn tiled(data: &str, width: i32) -> String {
        format!(
            r#"{{"width": {}, "height": 1, "layers": [{{"encoding": "csv", "data": "{}"}}]}}"#,
            width, data
        )
    }

    fn reader() -> MemoryAssetReader {
        MemoryAssetReader::new()
            .with_asset("levels/world1_stage1.json", tiled("1,2", 2))
            .with_asset("levels/world1_stage2.json", tiled("3", 1))
            .with_asset("levels/world1_stage3.json", tiled("4,5,6", 3))
            .with_asset("levels/world2_stage1.json", r#"{"layers": []}"#)
    }

    fn cache(max_levels: usize) -> LevelCache<MemoryAssetReader> {
        LevelCache::new(LevelLoader::new(reader()), CacheConfig { max_levels })
    }

    #[test]
    fn test_cache_hit() {
        let cache = cache(0);

        let level1 = cache.get(1, 1).unwrap();
        let level2 = cache.get(1, 1).unwrap();

        // Should be the same Arc pointer
        assert!(Arc::ptr_eq(&level1, &level2));
        assert!(cache.contains(1, 1));
    }

    #[test]
    fn test_current_tracks_last_get() {
        let cache = cache(0);
        assert!(cache.current().is_none());

        cache.get(1, 1).unwrap();
        cache.get(1, 2).unwrap();
        assert_eq!(cache.current().unwrap().key(), LevelKey::new(1, 2));

        cache.get(1, 1).unwrap();
        assert_eq!(cache.current().unwrap().key(), LevelKey::new(1, 1));
    }

    #[test]
    fn test_failure_clears_current() {
        let cache = cache(0);
        cache.get(1, 1).unwrap();

        assert!(matches!(cache.get(2, 1), Err(LevelError::Schema(_))));
        assert!(cache.current().is_none());
        assert!(cache.contains(1, 1));
        assert!(!cache.contains(2, 1));

        assert!(matches!(cache.get(7, 7), Err(LevelError::NotFound { .. })));
    }

    #[test]
    fn test_cache_stats() {
        let cache = cache(0);
        cache.get(1, 1).unwrap();
        cache.get(1, 3).unwrap();

        assert_eq!(
            cache.stats(),
            CacheStats {
                num_levels: 2,
                total_tiles: 5
            }
        );

        cache.clear();
        assert_eq!(cache.stats().num_levels, 0);
        assert!(cache.current().is_none());
    }

    #[test]
    fn test_eviction_oldest_first() {
        let cache = cache(2);
        cache.get(1, 1).unwrap();
        cache.get(1, 2).unwrap();
        cache.get(1, 3).unwrap();

        assert!(!cache.contains(1, 1));
        assert!(cache.contains(1, 2));
        assert!(cache.contains(1, 3));
        assert_eq!(cache.stats().num_levels, 2);
    }

    #[test]
    fn test_cache_reload() {
        let cache = cache(0);
        let level1 = cache.get(1, 1).unwrap();
        let level2 = cache.reload(1, 1).unwrap();

        assert!(!Arc::ptr_eq(&level1, &level2));
        assert_eq!(level1, level2);
    }

    #[test]
    fn test_preload() {
        let cache = cache(0);
        cache
            .preload(&[LevelKey::new(1, 1), LevelKey::new(1, 2)])
            .unwrap();
        assert_eq!(cache.stats().num_levels, 2);

        assert!(cache.preload(&[LevelKey::new(5, 5)]).is_err());
    }

    #[test]
    fn test_concurrent_gets_share_level() {
        let cache = Arc::new(cache(0));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.get(1, 3).unwrap())
            })
            .collect();

        let levels: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for level in &levels[1..] {
            assert!(Arc::ptr_eq(&levels[0], level));
        }
    }

    #[test]
    fn test_from_config() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("stages")).unwrap();
        std::fs::write(temp_dir.path().join("stages/world1_stage1.json"), tiled("9", 1)).unwrap();

        let config = LoaderConfig {
            assets_root: temp_dir.path().to_path_buf(),
            levels_dir: "stages".into(),
            max_cached_levels: 1,
        };
        let cache = LevelCache::from_config(&config);

        assert_eq!(cache.get(1, 1).unwrap().tiles(), &[9]);
        assert_eq!(cache.loader().levels_dir(), "stages");
    }
}
