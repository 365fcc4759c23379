//! Adapters between the outside world and the core: CSV fixtures in,
//! checkout summaries out.

pub mod csv;
pub mod summary;
