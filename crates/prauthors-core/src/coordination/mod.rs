//! Source selection and resolution

pub mod plan;
pub mod resolver;

pub use plan::{SourceOutcome, SourcePlan, Strategy};
pub use resolver::AuthorResolver;
