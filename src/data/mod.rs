//! Data layer: records, loading, normalization, filtering and transforms.
//!
//! Architecture (one pass per page render):
//! ```text
//!  outcome_data.csv / DegreeConferred.csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  csv → header check → RawTable
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ normalize │  year/number coercion, key cleanup → *Dataset
//!   └───────────┘
//!        │
//!        ▼
//!   ┌──────────┐      ┌───────┐
//!   │  filter   │ ◄── │ rules │  reserved-CIP overrides
//!   └──────────┘      └───────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ transform │  fraction → percent, series grouping
//!   └───────────┘
//! ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod rules;
pub mod transform;
