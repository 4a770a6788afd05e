//! Heritable traits, reproduction, speciation, and lineage tracking.

pub mod lineage;
pub mod reproduction;
pub mod speciation;
pub mod traits;

pub use lineage::{Lineage, LineageTracker};
pub use reproduction::{reproduction_probability, spawn_offspring};
pub use speciation::{Species, SpeciesRegistry};
pub use traits::{TraitKind, TraitRange, TraitVector};
