//! Version constraint satisfaction
//!
//! Collects every constraint written for one package and checks whether a
//! single version could satisfy all of them.

use reqlint_core::types::VersionSpec;

/// Constraints collected for one package, tagged with their line numbers
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    constraints: Vec<(usize, VersionSpec)>,
}

/// Two constraints that no version satisfies together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// Line of the earlier constraint
    pub first_line: usize,
    pub first: VersionSpec,
    /// Line of the constraint that cannot be met alongside it
    pub line: usize,
    pub spec: VersionSpec,
}

impl ConstraintSet {
    /// Create an empty constraint set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a constraint found on `line`
    pub fn add(&mut self, line: usize, spec: VersionSpec) {
        self.constraints.push((line, spec));
    }

    /// Every constraint that clashes with an earlier one, paired with the
    /// first earlier constraint it clashes with
    pub fn conflicts(&self) -> Vec<Conflict> {
        let mut found = Vec::new();

        for (later, (line, spec)) in self.constraints.iter().enumerate() {
            let clash = self.constraints[..later]
                .iter()
                .find(|(_, earlier)| !earlier.intersects(spec));

            if let Some((first_line, first)) = clash {
                found.push(Conflict {
                    first_line: *first_line,
                    first: first.clone(),
                    line: *line,
                    spec: spec.clone(),
                });
            }
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use reqlint_core::types::Version;
    use std::str::FromStr;

    fn exact(s: &str) -> VersionSpec {
        VersionSpec::Exact(Version::from_str(s).unwrap())
    }

    fn min(s: &str) -> VersionSpec {
        VersionSpec::Minimum(Version::from_str(s).unwrap())
    }

    #[test]
    fn test_bare_entries_never_conflict() {
        let mut set = ConstraintSet::new();
        assert!(set.conflicts().is_empty());

        set.add(1, VersionSpec::Any);
        set.add(2, VersionSpec::Any);
        set.add(3, exact("1.0"));
        assert!(set.conflicts().is_empty());
    }

    #[test]
    fn test_conflicting_pins() {
        let mut set = ConstraintSet::new();
        set.add(3, exact("1.0"));
        set.add(7, exact("1.1"));

        assert_eq!(
            set.conflicts(),
            vec![Conflict {
                first_line: 3,
                first: exact("1.0"),
                line: 7,
                spec: exact("1.1"),
            }]
        );
    }

    #[test]
    fn test_pin_below_floor() {
        let mut set = ConstraintSet::new();
        set.add(1, min("2.0"));
        set.add(2, exact("1.5"));
        assert_eq!(set.conflicts().len(), 1);

        let mut set = ConstraintSet::new();
        set.add(1, min("2.0"));
        set.add(2, exact("2.0.0"));
        assert!(set.conflicts().is_empty());
    }

    #[test]
    fn test_floors_always_combine() {
        let mut set = ConstraintSet::new();
        set.add(1, min("1.0"));
        set.add(2, min("3.0"));
        set.add(3, min("2.0"));
        assert!(set.conflicts().is_empty());
    }

    #[test]
    fn test_conflicts_reports_each_offender_once() {
        let mut set = ConstraintSet::new();
        set.add(1, exact("1.0"));
        set.add(2, exact("2.0"));
        set.add(3, exact("3.0"));

        let lines: Vec<_> = set.conflicts().iter().map(|c| (c.first_line, c.line)).collect();
        assert_eq!(lines, vec![(1, 2), (1, 3)]);
    }

    proptest! {
        #[test]
        fn pin_conflicts_only_below_a_floor(
            floors in prop::collection::vec((0u64..5, 0u64..5), 1..5),
            pin in (0u64..5, 0u64..5),
        ) {
            let mut set = ConstraintSet::new();
            for (i, (major, minor)) in floors.iter().enumerate() {
                set.add(i + 1, VersionSpec::Minimum(Version::new(&[*major, *minor])));
            }
            let pinned = Version::new(&[pin.0, pin.1]);
            set.add(99, VersionSpec::Exact(pinned.clone()));

            let highest_floor = floors
                .iter()
                .map(|(major, minor)| Version::new(&[*major, *minor]))
                .max()
                .unwrap();
            prop_assert_eq!(set.conflicts().is_empty(), pinned >= highest_floor);
        }
    }
}
