//! Common utilities for benchmarks

use criterion::Criterion;
use pprof::criterion::{Output, PProfProfiler};

/// Configure criterion with flamegraph profiling support
pub fn criterion_config() -> Criterion {
    Criterion::default()
        .warm_up_time(std::time::Duration::from_secs(3))
        .measurement_time(std::time::Duration::from_secs(10))
        .sample_size(100)
        .with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)))
}

/// Group headers used by generated manifests
const GROUPS: [&str; 5] = [
    "# ===== Core =====",
    "# Web",
    "# Data / ML",
    "# PDF / Office",
    "# Testing",
];

/// Generate a manifest with `count` requirements spread over a few groups
///
/// Names are written in mixed case and out of order, spacing is uneven, and
/// every form (bare, `==`, `>=`) appears, so formatting and every rule have
/// work to do.
pub fn create_manifest_content(count: usize) -> String {
    let per_group = (count / GROUPS.len()).max(1);
    let mut out = String::new();

    for i in 0..count {
        if i % per_group == 0 {
            if i > 0 {
                out.push_str("\n\n");
            }
            out.push_str(GROUPS[(i / per_group) % GROUPS.len()]);
            out.push('\n');
        }

        let name = format!("Package_{:04}", (i * 7919) % count.max(1));
        let line = match i % 4 {
            0 => name,
            1 => format!("{} == {}.{}.{}", name, i % 10, i % 7, i % 3),
            2 => format!("{}>={}.0rc{}", name, i % 5, i % 3 + 1),
            _ => format!("{}=={}.{}.post{}  # pinned", name, i % 9, i % 4, i % 2),
        };
        out.push_str(&line);
        out.push('\n');
    }

    out
}

/// Version strings covering every part of the version grammar
pub fn create_version_strings(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| match i % 5 {
            0 => format!("{}.{}.{}", i % 10, i % 20, i % 30),
            1 => format!("{}.{}rc{}", i % 10, i % 20, i % 4),
            2 => format!("{}!{}.{}.post{}", i % 2, i % 10, i % 20, i % 3),
            3 => format!("{}.{}.dev{}", i % 10, i % 20, i % 5),
            _ => format!("{}.{}+local.{}", i % 10, i % 20, i % 7),
        })
        .collect()
}
