//! Seams towards the host build tool.

use crate::types::{DependencyNotation, ModuleId};

/// The host's dependency declaration API.
///
/// The engine never mutates the host's project model directly; it describes every
/// declaration through this trait and the host decides how to apply it.
///
/// ```rust
/// # use besu_dist_protocol::{DependencyHandler, DependencyNotation, ModuleId};
/// #[derive(Default)]
/// struct Printer(Vec<String>);
///
/// impl DependencyHandler for Printer {
///     fn add(&mut self, configuration: &str, notation: DependencyNotation) {
///         self.0.push(format!("{configuration} {notation}"));
///     }
///
///     fn reject(&mut self, module: &ModuleId, reason: &str) {
///         self.0.push(format!("reject {module}: {reason}"));
///     }
/// }
/// ```
pub trait DependencyHandler {
    /// Add a dependency to the named configuration.
    fn add(&mut self, configuration: &str, notation: DependencyNotation);

    /// Reject every candidate for `module` during component selection.
    fn reject(&mut self, module: &ModuleId, reason: &str);
}
