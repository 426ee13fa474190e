pub mod column;
pub mod config;
pub mod crosser;
pub mod error;
pub mod frame;
pub mod join;
pub mod key_discovery;
pub mod quality;
pub mod registry;
pub mod suggestions;
pub mod table;
pub mod value;

pub use column::{Column, ColumnKind};
pub use config::CrosserConfig;
pub use crosser::{Crossing, DataCrosser};
pub use error::{CrossError, Result};
pub use join::{join_tables, JoinMode, JoinOptions, Suffixes};
pub use key_discovery::{discover_candidates, discover_candidates_with, CandidateKeyPair, MatchOrigin};
pub use quality::{evaluate_quality, QualityReport};
pub use registry::{DatasetInfo, DatasetRegistry};
pub use suggestions::{column_name_hints, suggest_crossings, ColumnHint, CrossingSuggestion, HintReason};
pub use table::Table;
pub use value::Value;
