//! `MasterStore`: fingerprinted, two-tier cache over product/inspector/skill
//! /vacation masters.
//!
//! Grounded on the teacher's `config::ConfigManager` (a single-tier,
//! DB-backed cache) generalized to the spec's fingerprint + two-tier
//! contract; the `tokio::try_join!` concurrent-load pattern follows the
//! teacher's existing async engine stack.

use crate::domain::{
 Inspector, ProductMaster, ProductProcessRate, SkillMatrix, SkillRow, VacationSchedule,
};
use crate::error::{MasterError, MasterResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime};
use tracing::{instrument, warn};

/// `(path, modification_time, size)` — a cached entry is valid only while
/// this matches the current state of the backing input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
 pub path: PathBuf,
 pub modified_unix_nanos: i128,
 pub size: u64,
}

impl Fingerprint {
 pub fn read(path: &std::path::Path) -> std::io::Result<Self> {
 let metadata = std::fs::metadata(path)?;
 let modified = metadata.modified()?;
 let modified_unix_nanos = modified
.duration_since(SystemTime::UNIX_EPOCH)
.map(|d| d.as_nanos() as i128)
.unwrap_or(0);
 Ok(Self {
 path: path.to_path_buf(),
 modified_unix_nanos,
 size: metadata.len(),
 })
 }

 fn cache_key(&self, input_name: &str) -> String {
 let mut hasher = Sha256::new();
 hasher.update(input_name.as_bytes());
 hasher.update(self.path.to_string_lossy().as_bytes());
 hasher.update(self.modified_unix_nanos.to_le_bytes());
 hasher.update(self.size.to_le_bytes());
 format!("{:x}", hasher.finalize())
 }
}

/// Provider of the four raw master inputs. Fingerprinting (a cheap stat) is
/// split from parsing so `MasterStore` can detect staleness without paying
/// for a full re-parse on every fetch.
#[async_trait]
pub trait MasterLoader: Send + Sync {
 async fn product_fingerprint(&self) -> MasterResult<Fingerprint>;
 async fn load_products(&self) -> MasterResult<Vec<ProductProcessRate>>;

 async fn inspector_fingerprint(&self) -> MasterResult<Fingerprint>;
 async fn load_inspectors(&self) -> MasterResult<Vec<Inspector>>;

 async fn skill_fingerprint(&self) -> MasterResult<Fingerprint>;
 async fn load_skills(&self) -> MasterResult<Vec<SkillRow>>;

 async fn vacation_fingerprint(&self) -> MasterResult<Fingerprint>;
 async fn load_vacations(&self) -> MasterResult<Vec<(String, NaiveDate)>>;
}

/// Immutable, shareable bundle of all four masters, ready for the engine to
/// consume.
#[derive(Clone)]
pub struct MasterSnapshot {
 pub products: ProductMaster,
 pub inspectors: Vec<Inspector>,
 pub skills: SkillMatrix,
 pub vacations: VacationSchedule,
}

#[derive(Clone)]
struct CacheEntry<T> {
 fingerprint: Fingerprint,
 cached_at: Instant,
 value: Arc<T>,
}

#[derive(Default)]
struct MemoryCache {
 products: Option<CacheEntry<Vec<ProductProcessRate>>>,
 inspectors: Option<CacheEntry<Vec<Inspector>>>,
 skills: Option<CacheEntry<Vec<SkillRow>>>,
 vacations: Option<CacheEntry<Vec<(String, NaiveDate)>>>,
}

/// Two-tier (in-memory + on-disk) fingerprint-invalidated cache over the
/// four master inputs.
pub struct MasterStore<L: MasterLoader> {
 loader: L,
 memory: Mutex<MemoryCache>,
 disk_cache_dir: Option<PathBuf>,
 ttl: Duration,
}

impl<L: MasterLoader> MasterStore<L> {
 pub fn new(loader: L) -> Self {
 Self {
 loader,
 memory: Mutex::new(MemoryCache::default()),
 disk_cache_dir: dirs::cache_dir().map(|d| d.join("lot_dispatch").join("master")),
 ttl: Duration::from_secs(300),
 }
 }

 pub fn with_ttl(mut self, ttl: Duration) -> Self {
 self.ttl = ttl;
 self
 }

 pub fn with_disk_cache_dir(mut self, dir: Option<PathBuf>) -> Self {
 self.disk_cache_dir = dir;
 self
 }

 /// Load every master input, preferring concurrent reads and falling back
 /// to sequential reads if the concurrent attempt fails.
 #[instrument(skip(self))]
 pub async fn load_all(&self) -> MasterResult<MasterSnapshot> {
 let concurrent = tokio::try_join!(
 self.products(),
 self.inspectors(),
 self.skills(),
 self.vacations(),
 );

 let (products, inspectors, skills, vacations) = match concurrent {
 Ok(results) => results,
 Err(err) => {
 warn!(error = %err, "concurrent master load failed, falling back to sequential");
 let products = self.products().await?;
 let inspectors = self.inspectors().await?;
 let skills = self.skills().await?;
 let vacations = self.vacations().await?;
 (products, inspectors, skills, vacations)
 }
 };

 Ok(MasterSnapshot {
 products: ProductMaster::from_rows((*products).clone()),
 inspectors: (*inspectors).clone(),
 skills: SkillMatrix::from_rows((*skills).iter().map(|r| SkillRow {
 product_number: r.product_number.clone(),
 process_number: r.process_number.clone(),
 inspector_id: r.inspector_id.clone(),
 level: r.level,
 })),
 vacations: VacationSchedule::from_absences((*vacations).clone()),
 })
 }

 async fn products(&self) -> MasterResult<Arc<Vec<ProductProcessRate>>> {
 let fingerprint = self.loader.product_fingerprint().await?;
 self.fetch(
 "products",
 fingerprint,
 |c| c.products.clone(),
 |c, e| c.products = Some(e),
 || self.loader.load_products(),
 )
.await
 }

 async fn inspectors(&self) -> MasterResult<Arc<Vec<Inspector>>> {
 let fingerprint = self.loader.inspector_fingerprint().await?;
 self.fetch(
 "inspectors",
 fingerprint,
 |c| c.inspectors.clone(),
 |c, e| c.inspectors = Some(e),
 || self.loader.load_inspectors(),
 )
.await
 }

 async fn skills(&self) -> MasterResult<Arc<Vec<SkillRow>>> {
 let fingerprint = self.loader.skill_fingerprint().await?;
 self.fetch(
 "skills",
 fingerprint,
 |c| c.skills.clone(),
 |c, e| c.skills = Some(e),
 || self.loader.load_skills(),
 )
.await
 }

 async fn vacations(&self) -> MasterResult<Arc<Vec<(String, NaiveDate)>>> {
 let fingerprint = self.loader.vacation_fingerprint().await?;
 self.fetch(
 "vacations",
 fingerprint,
 |c| c.vacations.clone(),
 |c, e| c.vacations = Some(e),
 || self.loader.load_vacations(),
 )
.await
 }

 /// Shared fetch path: memory (fingerprint + TTL) → disk (fingerprint) →
 /// loader, writing back to both tiers on a miss.
 async fn fetch<T, Fut>(
 &self,
 input_name: &str,
 fingerprint: Fingerprint,
 read_memory: impl Fn(&MemoryCache) -> Option<CacheEntry<T>>,
 write_memory: impl Fn(&mut MemoryCache, CacheEntry<T>),
 load: impl FnOnce() -> Fut,
 ) -> MasterResult<Arc<T>>
 where
 T: Serialize + for<'de> Deserialize<'de>,
 Fut: std::future::Future<Output = MasterResult<T>>,
 {
 if let Some(entry) = self.memory_if_fresh(&fingerprint, &read_memory) {
 return Ok(entry.value);
 }

 let value = match self.read_disk_cache::<T>(input_name, &fingerprint) {
 Some(value) => Arc::new(value),
 None => {
 let value = load().await?;
 self.write_disk_cache(input_name, &fingerprint, &value)?;
 Arc::new(value)
 }
 };

 let entry = CacheEntry {
 fingerprint,
 cached_at: Instant::now(),
 value: value.clone(),
 };
 let mut guard = self.memory.lock().expect("master cache mutex poisoned");
 write_memory(&mut guard, entry);
 Ok(value)
 }

 fn memory_if_fresh<T>(
 &self,
 fingerprint: &Fingerprint,
 read_memory: &impl Fn(&MemoryCache) -> Option<CacheEntry<T>>,
 ) -> Option<CacheEntry<T>> {
 let guard = self.memory.lock().expect("master cache mutex poisoned");
 let entry = read_memory(&guard)?;
 if &entry.fingerprint == fingerprint && entry.cached_at.elapsed() < self.ttl {
 Some(entry)
 } else {
 None
 }
 }

 /// On-disk cache path for `input_name` under the current `fingerprint`;
 /// a changed fingerprint always yields a different path, so a stale
 /// snapshot is never reused.
 pub fn disk_cache_path(&self, input_name: &str, fingerprint: &Fingerprint) -> Option<PathBuf> {
 self.disk_cache_dir.as_ref().map(|dir| {
 dir.join(format!(
 "{}-{}.json",
 input_name,
 fingerprint.cache_key(input_name)
 ))
 })
 }

 fn read_disk_cache<T: for<'de> Deserialize<'de>>(
 &self,
 input_name: &str,
 fingerprint: &Fingerprint,
 ) -> Option<T> {
 let path = self.disk_cache_path(input_name, fingerprint)?;
 let bytes = std::fs::read(path).ok()?;
 serde_json::from_slice(&bytes).ok()
 }

 fn write_disk_cache<T: Serialize>(
 &self,
 input_name: &str,
 fingerprint: &Fingerprint,
 value: &T,
 ) -> MasterResult<()> {
 let Some(path) = self.disk_cache_path(input_name, fingerprint) else {
 return Ok(());
 };
 if let Some(parent) = path.parent() {
 std::fs::create_dir_all(parent).map_err(|e| MasterError::CacheIo(e.to_string()))?;
 }
 let bytes = serde_json::to_vec(value)?;
 std::fs::write(path, bytes).map_err(|e| MasterError::CacheIo(e.to_string()))?;
 Ok(())
 }
}
