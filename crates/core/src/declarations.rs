//! Dependency declarations a plugin project receives
//!
//! The merged dependency set is declared with strict versions so nothing else in
//! the plugin's graph can move a library away from the version Besu ships.

use std::collections::BTreeMap;

use besu_dist_protocol::{
    configurations, DependencyCoordinate, DependencyHandler, DependencyNotation, ModuleId,
};
use serde::Serialize;

use crate::catalog::bom_coordinate;
use crate::coordinates::CoordinateRemapper;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub configuration: String,
    pub notation: DependencyNotation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub module: ModuleId,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DependencyPlan {
    pub declarations: Vec<Declaration>,
    pub rejections: Vec<Rejection>,
}

impl DependencyPlan {
    pub fn build(
        besu_version: &str,
        merged: &[DependencyCoordinate],
        annotation_processors: &[ModuleId],
        remapper: &CoordinateRemapper,
    ) -> Self {
        let mut plan = Self::default();

        let platform = DependencyNotation::EnforcedPlatform(bom_coordinate(besu_version));
        for configuration in configurations::PLATFORM_TARGETS {
            plan.declare(configuration, platform.clone());
        }

        for dependency in merged {
            let notation = DependencyNotation::Strict(dependency.clone());
            plan.declare(configurations::COMPILE_ONLY, notation.clone());
            plan.declare(configurations::TEST_IMPLEMENTATION, notation.clone());

            if annotation_processors.contains(&dependency.module_id()) {
                plan.declare(configurations::ANNOTATION_PROCESSOR, notation);
            }
        }

        plan.rejections = remapper
            .old_coordinates()
            .map(|module| Rejection {
                module: module.clone(),
                reason: format!("Excluded Besu old coordinate: {}", module),
            })
            .collect();

        plan
    }

    fn declare(&mut self, configuration: &str, notation: DependencyNotation) {
        self.declarations.push(Declaration {
            configuration: configuration.to_string(),
            notation,
        });
    }

    /// Hand every declaration and rejection to the host
    pub fn apply(&self, handler: &mut dyn DependencyHandler) {
        for declaration in &self.declarations {
            handler.add(&declaration.configuration, declaration.notation.clone());
        }
        for rejection in &self.rejections {
            handler.reject(&rejection.module, &rejection.reason);
        }
    }

    pub fn for_configuration<'a>(
        &'a self,
        configuration: &'a str,
    ) -> impl Iterator<Item = &'a DependencyNotation> + 'a {
        self.declarations
            .iter()
            .filter(move |d| d.configuration == configuration)
            .map(|d| &d.notation)
    }
}

/// A [`DependencyHandler`] that keeps declarations grouped by configuration
#[derive(Debug, Default)]
pub struct RecordingHandler {
    pub declarations: BTreeMap<String, Vec<DependencyNotation>>,
    pub rejections: Vec<(ModuleId, String)>,
}

impl DependencyHandler for RecordingHandler {
    fn add(&mut self, configuration: &str, notation: DependencyNotation) {
        self.declarations
            .entry(configuration.to_string())
            .or_default()
            .push(notation);
    }

    fn reject(&mut self, module: &ModuleId, reason: &str) {
        self.rejections.push((module.clone(), reason.to_string()));
    }
}
