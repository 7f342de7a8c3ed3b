//! Resolving identifier walks into drawable line segments.

use std::collections::HashMap;

use glam::Vec3;
use tracing::{info, warn};

use crate::model::Constellation;

/// A constellation with its identifiers resolved to positions.
#[derive(Clone, Debug)]
pub struct ResolvedConstellation {
    /// Display name.
    pub name: String,
    /// Line segments as endpoint pairs, ready for a line list buffer.
    pub segments: Vec<[Vec3; 2]>,
    /// Anchor for the constellation label: the first resolvable star.
    pub label_anchor: Option<Vec3>,
}

/// The aggregate result of resolving every constellation.
#[derive(Clone, Debug, Default)]
pub struct ResolvedSky {
    /// Constellations that produced at least one segment.
    pub constellations: Vec<ResolvedConstellation>,
    /// Identifiers referenced by some constellation but absent from the
    /// position lookup, sorted and deduplicated.
    pub missing: Vec<u32>,
    /// Total segment count across all constellations.
    pub segment_count: usize,
}

/// Resolve constellation identifier walks against the star position lookup.
///
/// A segment is emitted only when two consecutive identifiers both resolve.
/// An unresolved identifier breaks the polyline; later resolvable pairs in
/// the same constellation still connect. Constellations with no resolvable
/// segment are dropped entirely.
pub fn resolve(
    constellations: &[Constellation],
    positions: &HashMap<u32, Vec3>,
) -> ResolvedSky {
    let mut resolved = Vec::new();
    let mut missing = Vec::new();
    let mut segment_count = 0usize;

    for constellation in constellations {
        let mut segments = Vec::new();
        let mut prev: Option<Vec3> = None;

        for &hip in &constellation.lines {
            match positions.get(&hip) {
                Some(&pos) => {
                    if let Some(prev_pos) = prev {
                        segments.push([prev_pos, pos]);
                    }
                    prev = Some(pos);
                }
                None => {
                    missing.push(hip);
                    // Break the line here; the next resolvable star starts a
                    // fresh polyline rather than bridging the gap.
                    prev = None;
                }
            }
        }

        let label_anchor = constellation
            .lines
            .iter()
            .find_map(|hip| positions.get(hip).copied());

        if segments.is_empty() {
            warn!(
                "Constellation '{}' produced no drawable segments",
                constellation.name
            );
            continue;
        }
        segment_count += segments.len();
        resolved.push(ResolvedConstellation {
            name: constellation.name.clone(),
            segments,
            label_anchor,
        });
    }

    missing.sort_unstable();
    missing.dedup();
    if !missing.is_empty() {
        warn!(
            "{} identifiers referenced by constellations are missing from the catalog: {:?}",
            missing.len(),
            missing
        );
    }
    info!(
        "Resolved {} constellations into {} line segments",
        resolved.len(),
        segment_count
    );

    ResolvedSky {
        constellations: resolved,
        missing,
        segment_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(entries: &[(u32, [f32; 3])]) -> HashMap<u32, Vec3> {
        entries
            .iter()
            .map(|&(hip, p)| (hip, Vec3::from_array(p)))
            .collect()
    }

    fn figure(name: &str, lines: &[u32]) -> Constellation {
        Constellation {
            name: name.to_string(),
            lines: lines.to_vec(),
        }
    }

    #[test]
    fn test_fully_resolved_walk() {
        let positions = lookup(&[
            (1, [0.0, 0.0, 0.0]),
            (2, [1.0, 0.0, 0.0]),
            (3, [1.0, 1.0, 0.0]),
        ]);
        let sky = resolve(&[figure("Triangle", &[1, 2, 3])], &positions);

        assert_eq!(sky.constellations.len(), 1);
        assert_eq!(sky.segment_count, 2);
        assert!(sky.missing.is_empty());
        assert_eq!(
            sky.constellations[0].label_anchor,
            Some(Vec3::new(0.0, 0.0, 0.0))
        );
    }

    #[test]
    fn test_missing_identifier_breaks_the_line() {
        let positions = lookup(&[
            (1, [0.0, 0.0, 0.0]),
            (2, [1.0, 0.0, 0.0]),
            (4, [2.0, 0.0, 0.0]),
            (5, [3.0, 0.0, 0.0]),
        ]);
        // 3 is unresolved: 1-2 connects, then 4-5 connects, but never 2-4.
        let sky = resolve(&[figure("Broken", &[1, 2, 3, 4, 5])], &positions);

        assert_eq!(sky.segment_count, 2);
        let segments = &sky.constellations[0].segments;
        assert_eq!(segments[0], [Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)]);
        assert_eq!(
            segments[1],
            [Vec3::new(2.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0)]
        );
        assert_eq!(sky.missing, vec![3]);
    }

    #[test]
    fn test_segment_exists_iff_both_endpoints_resolve() {
        let positions = lookup(&[(1, [0.0, 0.0, 0.0])]);
        // Only one endpoint of each pair resolves.
        let sky = resolve(&[figure("Lonely", &[1, 2, 1, 2])], &positions);
        assert!(sky.constellations.is_empty());
        assert_eq!(sky.segment_count, 0);
        assert_eq!(sky.missing, vec![2]);
    }

    #[test]
    fn test_missing_identifiers_deduplicated_and_sorted() {
        let positions = lookup(&[(10, [0.0, 0.0, 0.0])]);
        let sky = resolve(
            &[
                figure("A", &[99, 10, 7]),
                figure("B", &[7, 99, 10]),
            ],
            &positions,
        );
        assert_eq!(sky.missing, vec![7, 99]);
    }

    #[test]
    fn test_label_anchor_skips_unresolved_head() {
        let positions = lookup(&[(2, [5.0, 0.0, 0.0]), (3, [6.0, 0.0, 0.0])]);
        let sky = resolve(&[figure("Offset", &[1, 2, 3])], &positions);
        assert_eq!(
            sky.constellations[0].label_anchor,
            Some(Vec3::new(5.0, 0.0, 0.0))
        );
    }

    #[test]
    fn test_unresolvable_constellation_dropped() {
        let positions = lookup(&[]);
        let sky = resolve(&[figure("Ghost", &[1, 2, 3])], &positions);
        assert!(sky.constellations.is_empty());
        assert_eq!(sky.missing, vec![1, 2, 3]);
    }

    #[test]
    fn test_fixture_segment_count_matches_hand_computation() {
        // Two figures sharing a lookup: 4-star walk (3 segments) plus a
        // 5-star walk with one hole (2 + 1 segments after the break).
        let positions = lookup(&[
            (1, [0.0, 0.0, 0.0]),
            (2, [1.0, 0.0, 0.0]),
            (3, [2.0, 0.0, 0.0]),
            (4, [3.0, 0.0, 0.0]),
            (6, [5.0, 0.0, 0.0]),
            (7, [6.0, 0.0, 0.0]),
            (8, [7.0, 0.0, 0.0]),
        ]);
        let sky = resolve(
            &[
                figure("Chain", &[1, 2, 3, 4]),
                figure("Gapped", &[6, 7, 5, 8, 6]),
            ],
            &positions,
        );
        assert_eq!(sky.segment_count, 3 + 1 + 1);
        assert_eq!(sky.missing, vec![5]);
    }
}
