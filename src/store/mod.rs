//! Data access for exported model folders.
//!
//! A model is a folder of files written by the matrix export:
//! `sectors.csv` and `indicators.csv` with the matrix metadata, `A.bin`,
//! `B.bin`, `C.bin`, `D.bin`, `L.bin`, `U.bin` with the numeric matrices,
//! and optionally `B_dqi.csv`, `D_dqi.csv`, `U_dqi.csv` with data quality
//! matrices. A [`Catalog`] holds one [`ModelStore`] per sub-folder of the
//! data directory and is shared as router state.

mod dqi;
mod matio;

pub use dqi::DqiMatrix;
pub use matio::Matrix;

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use csv::StringRecord;

use crate::models::{Indicator, ModelInfo, Sector};

/// Numeric matrices of the export, by file name stem.
const NUMERIC_MATRICES: [&str; 6] = ["A", "B", "C", "D", "L", "U"];

/// Data quality matrices of the export, by file name stem.
const DQI_MATRICES: [&str; 3] = ["B_dqi", "D_dqi", "U_dqi"];

/// One exported model folder.
///
/// Sectors and indicators are loaded eagerly; matrices are read on first
/// access and cached for the lifetime of the store.
pub struct ModelStore {
    folder: PathBuf,
    sectors: Vec<Sector>,
    indicators: Vec<Indicator>,
    matrices: Mutex<HashMap<String, Arc<Matrix>>>,
    dqi_matrices: Mutex<HashMap<String, Arc<DqiMatrix>>>,
}

impl ModelStore {
    pub fn open(folder: &Path) -> Result<Self> {
        let mut sectors = read_sectors(&folder.join("sectors.csv"))?;
        sectors.sort_by_key(|s| s.index);
        let mut indicators = read_indicators(&folder.join("indicators.csv"))?;
        indicators.sort_by_key(|i| i.index);
        Ok(Self {
            folder: folder.to_path_buf(),
            sectors,
            indicators,
            matrices: Mutex::new(HashMap::new()),
            dqi_matrices: Mutex::new(HashMap::new()),
        })
    }

    /// Sectors in matrix index order.
    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    /// Sectors sorted by display name, the order of the demand table.
    pub fn sectors_by_name(&self) -> Vec<Sector> {
        let mut sectors = self.sectors.clone();
        sectors.sort_by(|a, b| a.name.cmp(&b.name));
        sectors
    }

    /// Indicators in matrix index order.
    pub fn indicators(&self) -> &[Indicator] {
        &self.indicators
    }

    /// Load a numeric matrix by name. `None` for names outside the export
    /// set or files missing from the folder.
    pub fn matrix(&self, name: &str) -> Result<Option<Arc<Matrix>>> {
        if !NUMERIC_MATRICES.contains(&name) {
            return Ok(None);
        }
        let mut cache = self.matrices.lock().expect("matrix cache lock poisoned");
        if let Some(matrix) = cache.get(name) {
            return Ok(Some(matrix.clone()));
        }
        let path = self.folder.join(format!("{name}.bin"));
        if !path.is_file() {
            return Ok(None);
        }
        let matrix = Arc::new(Matrix::read(&path)?);
        cache.insert(name.to_string(), matrix.clone());
        Ok(Some(matrix))
    }

    /// Load a data quality matrix by name, with the same contract as
    /// [`ModelStore::matrix`].
    pub fn dqi_matrix(&self, name: &str) -> Result<Option<Arc<DqiMatrix>>> {
        if !DQI_MATRICES.contains(&name) {
            return Ok(None);
        }
        let mut cache = self
            .dqi_matrices
            .lock()
            .expect("DQI matrix cache lock poisoned");
        if let Some(matrix) = cache.get(name) {
            return Ok(Some(matrix.clone()));
        }
        let path = self.folder.join(format!("{name}.csv"));
        if !path.is_file() {
            return Ok(None);
        }
        let matrix = Arc::new(DqiMatrix::read(&path)?);
        cache.insert(name.to_string(), matrix.clone());
        Ok(Some(matrix))
    }
}

/// All models found in a data folder, keyed by sub-folder name.
pub struct Catalog {
    models: BTreeMap<String, ModelStore>,
}

impl Catalog {
    /// Scan a data folder and open every model sub-folder. Folders that do
    /// not load are skipped with a warning.
    pub fn open(folder: &Path) -> Result<Self> {
        let entries = fs::read_dir(folder)
            .with_context(|| format!("reading data folder {}", folder.display()))?;
        let mut models = BTreeMap::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let id = entry.file_name().to_string_lossy().into_owned();
            match ModelStore::open(&path) {
                Ok(store) => {
                    models.insert(id, store);
                }
                Err(e) => {
                    tracing::warn!("Skipping model folder {}: {:#}", path.display(), e);
                }
            }
        }
        Ok(Self { models })
    }

    /// Model ids in sorted order.
    pub fn models(&self) -> Vec<ModelInfo> {
        self.models
            .keys()
            .map(|id| ModelInfo { id: id.clone() })
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&ModelStore> {
        self.models.get(id)
    }

    /// The model backing the single-model routes: first id in sorted order.
    pub fn default_model(&self) -> Option<&ModelStore> {
        self.models.values().next()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

fn field<'a>(record: &'a StringRecord, idx: usize, path: &Path) -> Result<&'a str> {
    record
        .get(idx)
        .ok_or_else(|| anyhow!("{}: missing column {}", path.display(), idx))
}

fn read_sectors(path: &Path) -> Result<Vec<Sector>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("reading sectors from {}", path.display()))?;
    let mut sectors = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("reading {}", path.display()))?;
        sectors.push(Sector {
            index: field(&record, 0, path)?
                .parse()
                .with_context(|| format!("{}: invalid sector index", path.display()))?,
            id: field(&record, 1, path)?.to_string(),
            name: field(&record, 2, path)?.to_string(),
            code: field(&record, 3, path)?.to_string(),
            location: field(&record, 4, path)?.to_string(),
            description: record
                .get(5)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        });
    }
    Ok(sectors)
}

fn read_indicators(path: &Path) -> Result<Vec<Indicator>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("reading indicators from {}", path.display()))?;
    let mut indicators = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("reading {}", path.display()))?;
        indicators.push(Indicator {
            index: field(&record, 0, path)?
                .parse()
                .with_context(|| format!("{}: invalid indicator index", path.display()))?,
            id: field(&record, 1, path)?.to_string(),
            name: field(&record, 2, path)?.to_string(),
            code: field(&record, 3, path)?.to_string(),
            unit: field(&record, 4, path)?.to_string(),
            group: record
                .get(5)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        });
    }
    Ok(indicators)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_model(folder: &Path) {
        fs::create_dir_all(folder).unwrap();
        fs::write(
            folder.join("sectors.csv"),
            "Index,ID,Name,Code,Location,Description\n\
             0,1111a0/oilseed farming/us,Oilseed farming,1111A0,US,\n\
             1,1111b0/grain farming/us,Grain farming,1111B0,US,Cereals\n",
        )
        .unwrap();
        fs::write(
            folder.join("indicators.csv"),
            "Index,ID,Name,Code,Unit,Group\n\
             0,ghg,Greenhouse gases,GHG,kg CO2 eq,Emissions\n",
        )
        .unwrap();
        Matrix::from_rows(&[vec![0.1, 0.2], vec![0.3, 0.4]])
            .unwrap()
            .write(&folder.join("A.bin"))
            .unwrap();
    }

    #[test]
    fn opens_a_model_folder() {
        let dir = tempfile::tempdir().unwrap();
        write_model(dir.path());
        let store = ModelStore::open(dir.path()).unwrap();

        assert_eq!(store.sectors().len(), 2);
        assert_eq!(store.sectors()[0].name, "Oilseed farming");
        assert_eq!(store.sectors()[0].description, None);
        assert_eq!(store.sectors()[1].description.as_deref(), Some("Cereals"));
        assert_eq!(store.indicators().len(), 1);
        assert_eq!(store.indicators()[0].unit, "kg CO2 eq");
    }

    #[test]
    fn sectors_by_name_sorts_for_the_demand_table() {
        let dir = tempfile::tempdir().unwrap();
        write_model(dir.path());
        let store = ModelStore::open(dir.path()).unwrap();

        let names: Vec<_> = store
            .sectors_by_name()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["Grain farming", "Oilseed farming"]);
    }

    #[test]
    fn matrix_access_is_cached_and_bounded_to_known_names() {
        let dir = tempfile::tempdir().unwrap();
        write_model(dir.path());
        let store = ModelStore::open(dir.path()).unwrap();

        let first = store.matrix("A").unwrap().unwrap();
        let second = store.matrix("A").unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        // L.bin was not exported
        assert!(store.matrix("L").unwrap().is_none());
        // sectors.csv is not addressable as a matrix
        assert!(store.matrix("sectors").unwrap().is_none());
        assert!(store.dqi_matrix("A").unwrap().is_none());
    }

    #[test]
    fn catalog_lists_models_sorted_and_picks_the_first_as_default() {
        let dir = tempfile::tempdir().unwrap();
        write_model(&dir.path().join("useeio2"));
        write_model(&dir.path().join("useeio1"));
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let catalog = Catalog::open(dir.path()).unwrap();
        let ids: Vec<_> = catalog.models().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, ["useeio1", "useeio2"]);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.default_model().is_some());
    }

    #[test]
    fn catalog_skips_folders_that_do_not_load() {
        let dir = tempfile::tempdir().unwrap();
        write_model(&dir.path().join("good"));
        fs::create_dir_all(dir.path().join("broken")).unwrap();

        let catalog = Catalog::open(dir.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("good").is_some());
        assert!(catalog.get("broken").is_none());
    }
}
