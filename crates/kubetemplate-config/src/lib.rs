//! Template rendering for kubetemplate.
//!
//! This crate handles:
//! - Template parameters (namespace, capacity, local disk path, custom values)
//! - Rendering Go-template manifests into raw multi-document YAML
//! - Password generation exposed to templates as `GeneratePassword`

pub mod error;
pub mod parameters;
pub mod password;
pub mod template;

pub use error::{ConfigError, ConfigResult};
pub use parameters::{TemplateParameters, TemplateParametersBuilder};
pub use password::generate_password;
pub use template::{render_file, render_str};
