//! Domain models for demandview.
//!
//! These mirror the metadata files of an exported input-output model folder:
//!
//! - [`Sector`]: one row of `sectors.csv`, a column of the direct
//!   requirements matrix. The demand table renders its `name` and
//!   `location`.
//! - [`Indicator`]: one row of `indicators.csv`, an impact assessment
//!   category with a reference unit.
//! - [`ModelInfo`]: a model id as listed by the `/api/models` route, one per
//!   model folder in the data directory.

mod indicator;
mod model_info;
mod sector;

pub use indicator::*;
pub use model_info::*;
pub use sector::*;
