use glam::DVec2;

use crate::map::spatial::SpatialGrid;

/// Default maximum grouping radius in braille pixels
/// (about 80 browser pixels at terminal resolution)
pub const DEFAULT_CLUSTER_RADIUS: f64 = 24.0;

/// A set of markers drawn as one icon. Singletons are groups of one.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerGroup {
    /// Indices into the point slice handed to the clusterer, in input order
    pub members: Vec<usize>,
    /// Mean screen position of the members
    pub center: DVec2,
}

impl MarkerGroup {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_cluster(&self) -> bool {
        self.members.len() > 1
    }
}

/// Partitions projected markers into groups. Called again on every pan or
/// zoom, so implementations must not keep state between calls.
pub trait Clusterer {
    fn cluster(&self, points: &[DVec2], max_radius: f64) -> Vec<MarkerGroup>;
}

/// Greedy clustering in input order: each point joins the nearest existing
/// group whose anchor lies within `max_radius`, otherwise it founds a new one.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyClusterer;

struct Building {
    anchor: DVec2,
    sum: DVec2,
    members: Vec<usize>,
}

impl Clusterer for GreedyClusterer {
    fn cluster(&self, points: &[DVec2], max_radius: f64) -> Vec<MarkerGroup> {
        let mut grid: SpatialGrid<Building> = SpatialGrid::new(max_radius);
        let radius_sq = max_radius * max_radius;

        for (idx, &p) in points.iter().enumerate() {
            let nearest = grid
                .query_radius(p, max_radius)
                .into_iter()
                .filter_map(|g| grid.get(g).map(|b| (g, b.anchor.distance_squared(p))))
                .filter(|&(_, d)| d <= radius_sq)
                // Ties go to the earliest group so output is deterministic
                .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

            match nearest.and_then(|(g, _)| grid.get_mut(g)) {
                Some(group) => {
                    group.sum += p;
                    group.members.push(idx);
                }
                None => {
                    grid.insert(
                        p,
                        Building {
                            anchor: p,
                            sum: p,
                            members: vec![idx],
                        },
                    );
                }
            }
        }

        grid.into_items()
            .into_iter()
            .map(|b| MarkerGroup {
                center: b.sum / b.members.len() as f64,
                members: b.members,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_far_points_stay_single() {
        let points = [DVec2::new(0.0, 0.0), DVec2::new(100.0, 0.0), DVec2::new(0.0, 100.0)];
        let groups = GreedyClusterer.cluster(&points, 24.0);
        assert_eq!(groups.len(), 3);
        assert!(groups.iter().all(|g| !g.is_cluster()));
    }

    #[test]
    fn test_close_points_merge() {
        let points = [
            DVec2::new(10.0, 10.0),
            DVec2::new(14.0, 10.0),
            DVec2::new(200.0, 200.0),
            DVec2::new(10.0, 16.0),
        ];
        let groups = GreedyClusterer.cluster(&points, 24.0);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].members, vec![0, 1, 3]);
        assert_eq!(groups[1].members, vec![2]);
        assert!((groups[0].center.x - 34.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_every_point_in_exactly_one_group() {
        let points: Vec<DVec2> = (0..200)
            .map(|i| DVec2::new((i * 37 % 300) as f64, (i * 53 % 180) as f64))
            .collect();
        let groups = GreedyClusterer.cluster(&points, 24.0);

        let mut seen = vec![0u32; points.len()];
        for g in &groups {
            assert!(!g.is_empty());
            for &m in &g.members {
                seen[m] += 1;
            }
        }
        assert!(seen.iter().all(|&n| n == 1));
    }

    #[test]
    fn test_members_within_radius_of_first_member() {
        let points: Vec<DVec2> = (0..100).map(|i| DVec2::new(i as f64 * 3.0, 0.0)).collect();
        for g in GreedyClusterer.cluster(&points, 24.0) {
            let anchor = points[g.members[0]];
            assert!(g.members.iter().all(|&m| points[m].distance(anchor) <= 24.0));
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(GreedyClusterer.cluster(&[], 24.0).is_empty());
    }
}
