//! Set-membership ingestion and combination enumeration for UpSet-style
//! set visualisation.
//!
//! A dataset is a CSV payload whose set memberships are binary indicator
//! columns. Loading produces typed [`Attribute`]s, [`Set`]s with single-bit
//! identifiers, and a membership [`SetMask`] per row. A [`Session`] owns one
//! dataset, tracks which sets are active, and enumerates the [`Subset`] of
//! rows for every non-empty combination of active sets.

pub mod config;
pub mod data;
pub mod error;
pub mod state;

pub use config::{AppConfig, SessionConfig};
pub use data::description::{DatasetDescription, MetaDefinition, MetaType, SetBlock};
pub use data::diagnostics::{Diagnostic, DiagnosticKind};
pub use data::loader::{load_dataset, load_description, DatasetCatalog};
pub use data::mask::{assign_row_bitmasks, SetMask, MAX_SETS};
pub use data::model::{Attribute, AttributeType, AttributeValue, Dataset, Set, Subset};
pub use data::subsets::{enumerate_subsets, MAX_ACTIVE_SETS};
pub use error::{LoadError, SessionError};
pub use state::{EnumerationRequest, Session, SessionEvent};
