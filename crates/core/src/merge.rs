//! Union of the BOM and the provided catalog

use std::collections::HashSet;

use besu_dist_protocol::{DependencyCoordinate, ModuleId, ProvidedDependency};

use crate::coordinates::CoordinateRemapper;

/// Merge the BOM with the provided catalog.
///
/// BOM entries come first and win: a provided entry is only added when the BOM
/// has no entry with the same remapped `group:name`. Provided entries are not
/// checked against each other, so classifier variants of one module all stay.
/// Entries keep the coordinates they were declared with.
pub fn merge_dependencies(
    bom: &[DependencyCoordinate],
    provided: &[ProvidedDependency],
    remapper: &CoordinateRemapper,
) -> Vec<DependencyCoordinate> {
    let key = |coordinate: &DependencyCoordinate| remapper.remap(&coordinate.module_id());

    let managed: HashSet<ModuleId> = bom.iter().map(key).collect();
    let mut merged = bom.to_vec();

    merged.extend(
        provided
            .iter()
            .filter(|dependency| !managed.contains(&key(&dependency.coordinate)))
            .map(|dependency| dependency.coordinate.clone()),
    );

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remapper() -> CoordinateRemapper {
        CoordinateRemapper::parse("org.new:lib org.old:lib\n", "test").unwrap()
    }

    fn provided(group: &str, name: &str, version: &str) -> ProvidedDependency {
        ProvidedDependency {
            coordinate: DependencyCoordinate::new(group, name, version),
            filename: format!("{}-{}.jar", name, version),
        }
    }

    #[test]
    fn test_bom_version_wins() {
        let bom = vec![DependencyCoordinate::new("g", "a", "1.0")];
        let provided = vec![provided("g", "a", "0.9"), provided("g", "b", "2.0")];

        let merged = merge_dependencies(&bom, &provided, &remapper());

        assert_eq!(
            merged,
            vec![
                DependencyCoordinate::new("g", "a", "1.0"),
                DependencyCoordinate::new("g", "b", "2.0"),
            ]
        );
    }

    #[test]
    fn test_merged_size() {
        let bom = vec![
            DependencyCoordinate::new("g", "a", "1"),
            DependencyCoordinate::new("g", "b", "1"),
        ];
        let provided = vec![
            provided("g", "b", "2"),
            provided("g", "c", "2"),
            provided("h", "a", "2"),
        ];

        let merged = merge_dependencies(&bom, &provided, &remapper());
        let bom_keys: HashSet<_> = bom.iter().map(|d| d.module_id()).collect();
        let gap_fillers = provided
            .iter()
            .filter(|p| !bom_keys.contains(&p.coordinate.module_id()))
            .count();

        assert_eq!(merged.len(), bom.len() + gap_fillers);
        assert!(merged.contains(&DependencyCoordinate::new("h", "a", "2")));
    }

    #[test]
    fn test_classifier_is_not_part_of_identity() {
        let bom = vec![DependencyCoordinate::new("io.netty", "epoll", "4")];
        let mut classified = provided("io.netty", "epoll", "4");
        classified.coordinate.classifier = Some("linux-x86_64".into());

        let merged = merge_dependencies(&bom, &[classified], &remapper());
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].classifier, None);
    }

    #[test]
    fn test_renamed_module_is_not_added_twice() {
        let bom = vec![DependencyCoordinate::new("org.new", "lib", "2.0")];
        let provided = vec![provided("org.old", "lib", "1.0")];

        let merged = merge_dependencies(&bom, &provided, &remapper());
        assert_eq!(merged, bom);
    }

    #[test]
    fn test_provided_classifier_variants_are_all_kept() {
        let mut x86 = provided("io.netty", "netty-transport-native-epoll", "4.1.100");
        x86.coordinate.classifier = Some("linux-x86_64".into());
        let mut arm = provided("io.netty", "netty-transport-native-epoll", "4.1.100");
        arm.coordinate.classifier = Some("linux-aarch_64".into());

        let merged = merge_dependencies(&[], &[x86.clone(), arm.clone()], &remapper());
        assert_eq!(merged, vec![x86.coordinate, arm.coordinate]);
    }
}
