use crate::roster::AthleteTable;
use crate::roster::Loader;
use crate::roster::RosterError;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::SystemTime;
use tracing::info;

struct CacheEntry {
    path: PathBuf,
    modified: SystemTime,
    table: Arc<AthleteTable>,
}

/// Holds the last loaded table, keyed by file path and modification time.
///
/// A different path, a changed modification time or [`TableCache::invalidate`] forces
/// the next lookup to read the file again. Failed loads are not cached.
pub struct TableCache {
    entry: Mutex<Option<CacheEntry>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self {
            entry: Mutex::new(None),
        }
    }

    /// Cached table for `path`, loading it first when the cache is cold or stale.
    /// Blocks while loading; call from a blocking context.
    pub fn get_or_load(&self, loader: &Loader, path: &Path) -> Result<Arc<AthleteTable>, RosterError> {
        let modified = std::fs::metadata(path)
            .and_then(|metadata| metadata.modified())
            .ok();

        let mut entry = self.entry.lock().unwrap_or_else(PoisonError::into_inner);
        if let (Some(cached), Some(modified)) = (entry.as_ref(), modified) {
            if cached.path == path && cached.modified == modified {
                return Ok(Arc::clone(&cached.table));
            }
        }

        let table = Arc::new(loader.load(path)?);
        info!(file = %path.display(), rows = table.len(), "Roster cache refreshed");
        *entry = modified.map(|modified| CacheEntry {
            path: path.to_path_buf(),
            modified,
            table: Arc::clone(&table),
        });
        Ok(table)
    }

    pub fn invalidate(&self) {
        let mut entry = self.entry.lock().unwrap_or_else(PoisonError::into_inner);
        if entry.take().is_some() {
            info!("Roster cache invalidated");
        }
    }

    pub fn is_cached(&self, path: &Path) -> bool {
        self.entry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|cached| cached.path == path)
            .unwrap_or(false)
    }
}

impl Default for TableCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::fixture::Workbook;
    use std::time::Duration;

    fn roster(regions: &[&str]) -> Workbook {
        let mut rows: Vec<&[&str]> = vec![&["wilayah_domisili"]];
        for region in regions {
            rows.push(std::slice::from_ref(region));
        }
        Workbook::new().sheet("Sheet1", &rows)
    }

    #[test]
    fn reuses_table_until_invalidated() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("atlet.xlsx");
        roster(&["Jakarta Barat"]).write_to(&path);

        let cache = TableCache::new();
        let loader = Loader::default();
        let first = cache.get_or_load(&loader, &path).unwrap();
        let second = cache.get_or_load(&loader, &path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(cache.is_cached(&path));

        cache.invalidate();
        assert!(!cache.is_cached(&path));
        let third = cache.get_or_load(&loader, &path).unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
    }

    #[test]
    fn reloads_when_file_changes() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("atlet.xlsx");
        roster(&["Jakarta Barat"]).write_to(&path);

        let cache = TableCache::new();
        let loader = Loader::default();
        assert_eq!(cache.get_or_load(&loader, &path).unwrap().len(), 1);

        roster(&["Jakarta Barat", "Jakarta Timur"]).write_to(&path);
        let later = SystemTime::now() + Duration::from_secs(5);
        std::fs::File::options()
            .write(true)
            .open(&path)
            .and_then(|file| file.set_modified(later))
            .unwrap();
        assert_eq!(cache.get_or_load(&loader, &path).unwrap().len(), 2);
    }

    #[test]
    fn failed_loads_are_not_cached() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("missing.xlsx");
        let cache = TableCache::new();
        assert!(cache.get_or_load(&Loader::default(), &path).is_err());
        assert!(!cache.is_cached(&path));
    }
}
