//! Breadth-first reference solver.

use std::collections::VecDeque;

use crate::error::{Error, Result};
use crate::metadata::{Requirement, Unit};
use crate::platform::TargetEnvironment;
use crate::ports::Solver;

/// Reference solver: satisfies requirements breadth-first, never
/// backtracks.
///
/// A requirement already met by a selected unit adds nothing. Otherwise the
/// highest applicable version wins, ties going to the unit listed first.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedySolver;

fn best_candidate<'a>(
    available: &'a [Unit],
    requirement: &Requirement,
    applicable: impl Fn(&Unit) -> bool,
) -> Option<&'a Unit> {
    available
        .iter()
        .filter(|u| u.satisfies(requirement) && applicable(u))
        .fold(None, |best: Option<&Unit>, u| match best {
            Some(b) if b.version >= u.version => Some(b),
            _ => Some(u),
        })
}

impl Solver for GreedySolver {
    fn resolve(
        &self,
        available: &[Unit],
        roots: &[Requirement],
        environment: &TargetEnvironment,
    ) -> Result<Vec<Unit>> {
        let properties = environment.properties();
        let mut selected: Vec<&Unit> = Vec::new();
        let mut queue: VecDeque<&Requirement> =
            roots.iter().filter(|r| r.applies_to(&properties)).collect();

        while let Some(requirement) = queue.pop_front() {
            if selected.iter().any(|u| u.satisfies(requirement)) {
                continue;
            }
            let Some(unit) = best_candidate(available, requirement, |u| u.applies_to(&properties))
            else {
                if requirement.optional {
                    continue;
                }
                return Err(Error::Unsatisfied {
                    environment: environment.to_string(),
                    requirement: requirement.to_string(),
                });
            };
            if unit.singleton {
                if let Some(other) = selected.iter().find(|u| u.singleton && u.id == unit.id) {
                    return Err(Error::Conflict {
                        environment: environment.to_string(),
                        first: other.to_string(),
                        second: unit.to_string(),
                    });
                }
            }
            selected.push(unit);
            queue.extend(unit.requires.iter().filter(|r| r.applies_to(&properties)));
        }
        Ok(selected.into_iter().cloned().collect())
    }

    fn collect(&self, available: &[Unit], roots: &[Requirement]) -> Result<Vec<Unit>> {
        let mut selected: Vec<&Unit> = Vec::new();
        let mut queue: VecDeque<&Requirement> = roots.iter().collect();

        while let Some(requirement) = queue.pop_front() {
            if selected.iter().any(|u| u.satisfies(requirement)) {
                continue;
            }
            let Some(unit) = best_candidate(available, requirement, |_| true) else {
                if requirement.optional {
                    continue;
                }
                return Err(Error::Unsatisfied {
                    environment: "all environments".to_string(),
                    requirement: requirement.to_string(),
                });
            };
            selected.push(unit);
            queue.extend(unit.requires.iter());
        }
        Ok(selected.into_iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::VersionRange;

    fn unit(id: &str, version: &str) -> Unit {
        Unit::new(id, version.parse().unwrap())
    }

    fn req(id: &str, range: &str) -> Requirement {
        Requirement::unit(id, range.parse().unwrap())
    }

    fn linux() -> TargetEnvironment {
        TargetEnvironment::new("linux", "gtk", "x86")
    }

    fn ids(units: &[Unit]) -> Vec<String> {
        units.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn highest_version_then_first_listed() {
        let available = vec![
            unit("a", "1.0.0").with_property("repo", "first"),
            unit("a", "2.0.0").with_property("repo", "first"),
            unit("a", "2.0.0").with_property("repo", "second"),
        ];
        let result = GreedySolver.resolve(&available, &[req("a", "")], &linux()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].version.to_string(), "2.0.0");
        assert_eq!(result[0].properties["repo"], "first");
    }

    #[test]
    fn follows_transitive_requirements() {
        let available = vec![
            unit("app", "1.0.0").with_requirement(req("lib", "[1.0.0,2.0.0)")),
            unit("lib", "1.5.0").with_requirement(req("base", "")),
            unit("lib", "2.0.0"),
            unit("base", "1.0.0"),
        ];
        let result = GreedySolver.resolve(&available, &[req("app", "")], &linux()).unwrap();
        assert_eq!(ids(&result), ["app 1.0.0", "lib 1.5.0", "base 1.0.0"]);
    }

    #[test]
    fn filtered_units_are_invisible_in_other_environments() {
        let available =
            vec![unit("swt.gtk", "1.0.0").with_filter("(osgi.os=linux)".parse().unwrap())];
        let roots = [req("swt.gtk", "")];
        assert!(GreedySolver.resolve(&available, &roots, &linux()).is_ok());
        let win = TargetEnvironment::new("win32", "win32", "x86");
        let err = GreedySolver.resolve(&available, &roots, &win).unwrap_err();
        assert!(matches!(
            err,
            Error::Unsatisfied {
                ref environment,
                ..
            } if environment == "win32/win32/x86"
        ));
    }

    #[test]
    fn optional_requirements_may_stay_open() {
        let roots = [Requirement::unit("missing", VersionRange::any()).optional()];
        assert!(GreedySolver.resolve(&[], &roots, &linux()).unwrap().is_empty());
    }

    #[test]
    fn singleton_versions_conflict_unless_collected() {
        let available = vec![unit("s", "1.0.0").singleton(), unit("s", "2.0.0").singleton()];
        let roots = [req("s", "[1.0.0,1.0.0]"), req("s", "[2.0.0,2.0.0]")];

        let err = GreedySolver.resolve(&available, &roots, &linux()).unwrap_err();
        assert!(matches!(err, Error::Conflict { .. }));

        let collected = GreedySolver.collect(&available, &roots).unwrap();
        assert_eq!(ids(&collected), ["s 1.0.0", "s 2.0.0"]);
    }
}
