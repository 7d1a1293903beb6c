pub mod catalog;
pub mod config;
pub mod document;
pub mod error;
pub mod interpolation;
pub mod lint;
pub mod locate;
pub mod schema;
pub mod steps;
pub mod suggest;
pub mod types;

pub use catalog::{CatalogCache, PathCatalog, StepPaths};
pub use config::{ConfigLoader, ConfigValidator, EngineConfig, LoggingSettings, PipecheckConfig};
pub use document::{PipelineDocument, StepRef};
pub use error::{AppError, DefaultErrorReporter, ErrorReporter, InterpolationError, PathError};
pub use interpolation::{
    BooleanInterpolator, InterpolationEngine, Interpolator, InterpolatorRegistry, Variables,
};
pub use lint::{has_errors, LintRegistry, LintResult, LintSeverity};
pub use locate::locate;
pub use schema::{FieldPathSet, JsonPath, SchemaDescription};
pub use steps::{StepKind, StepRegistry};
pub use suggest::suggest;
pub use types::*;
