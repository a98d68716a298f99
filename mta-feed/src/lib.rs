/*! Raw data model for the MTA accessibility feeds.

The upstream agency publishes three datasets the pipeline consumes: the ENE
equipment feed (JSON array of elevator/escalator records), the subway station
registry (GeoJSON), and the stations-and-complexes registry (CSV). This crate
holds the serde structures for the equipment and complex records plus the
readers that turn raw bytes into them.

Two conventions carried over from the upstream files:

- saved equipment snapshots start with a `//` comment line marking them as
  generated, which plain JSON parsers reject, so [read_equipment_json] strips
  it;
- the complexes CSV uses human-readable headers (`Complex ID`, `Stop Name`…)
  and leaves coordinate cells blank for a handful of rows, which are skipped
  rather than treated as errors.
*/

mod error;
mod objects;
mod readers;
mod serde_helpers;

#[cfg(test)]
mod tests;

pub use error::Error;
pub use objects::{ComplexRow, EquipmentRecord};
pub use readers::{complexes_to_geojson, read_complex_csv, read_equipment_json};
