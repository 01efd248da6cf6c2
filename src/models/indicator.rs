use serde::{Deserialize, Serialize};

/// An impact assessment indicator of an input-output model.
///
/// Indicators index the rows of the characterization matrix `C`.
/// `indicators.csv` stores one row per indicator with the columns
/// `Index, ID, Name, Code, Unit, Group`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Indicator {
    /// Zero-based matrix index of the indicator.
    pub index: usize,
    pub id: String,
    pub name: String,
    pub code: String,
    /// Reference unit of the indicator results (e.g. `kg CO2 eq`).
    pub unit: String,
    pub group: Option<String>,
}
