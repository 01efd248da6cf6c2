use serde::{Deserialize, Serialize};

/// An industry sector of an input-output model.
///
/// Sectors index the columns of the model matrices. `sectors.csv` stores one
/// row per sector with the columns `Index, ID, Name, Code, Location,
/// Description`; the id is an opaque key such as
/// `1111a0/oilseed farming/us`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sector {
    /// Zero-based matrix index of the sector.
    pub index: usize,
    pub id: String,
    pub name: String,
    pub code: String,
    pub location: String,
    pub description: Option<String>,
}
