use std::fmt;

use crate::models::Blueprint;

/// Post-processing applied to the points of every blueprint handed out by a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlueprintFilter {
    /// Hands the blueprint back untouched.
    #[default]
    Identity,
    /// Collapses every run of consecutive equal points into one.
    Redundancy,
    /// Keeps the points at even indices once there are at least three points.
    Undersampling,
}

impl BlueprintFilter {
    pub fn apply(&self, blueprint: Blueprint) -> Blueprint {
        match self {
            BlueprintFilter::Identity => blueprint,
            BlueprintFilter::Redundancy => remove_consecutive_duplicates(blueprint),
            BlueprintFilter::Undersampling => keep_even_indices(blueprint),
        }
    }
}

impl fmt::Display for BlueprintFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlueprintFilter::Identity => "identity",
            BlueprintFilter::Redundancy => "redundancy",
            BlueprintFilter::Undersampling => "undersampling",
        };
        f.write_str(name)
    }
}

fn remove_consecutive_duplicates(mut blueprint: Blueprint) -> Blueprint {
    if blueprint.points.windows(2).any(|pair| pair[0] == pair[1]) {
        blueprint.points.dedup();
    }
    blueprint
}

fn keep_even_indices(mut blueprint: Blueprint) -> Blueprint {
    if blueprint.points.len() < 3 {
        return blueprint;
    }
    blueprint.points = blueprint.points.into_iter().step_by(2).collect();
    blueprint
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Point;

    fn bp(coords: &[(i32, i32)]) -> Blueprint {
        let points = coords.iter().map(|&(x, y)| Point::new(x, y)).collect();
        Blueprint::new("author", "shape", points)
    }

    fn coords(blueprint: &Blueprint) -> Vec<(i32, i32)> {
        blueprint.points.iter().map(|p| (p.x, p.y)).collect()
    }

    #[test]
    fn identity_returns_input() {
        let input = bp(&[(0, 0), (0, 0), (3, 4)]);

        assert_eq!(BlueprintFilter::Identity.apply(input.clone()), input);
    }

    #[test]
    fn identity_is_default() {
        assert_eq!(BlueprintFilter::default(), BlueprintFilter::Identity);
    }

    #[test]
    fn redundancy_keeps_empty_and_single_point() {
        let empty = bp(&[]);
        let single = bp(&[(1, 1)]);

        assert_eq!(BlueprintFilter::Redundancy.apply(empty.clone()), empty);
        assert_eq!(BlueprintFilter::Redundancy.apply(single.clone()), single);
    }

    #[test]
    fn redundancy_removes_consecutive_duplicates_only() {
        let input = bp(&[(0, 0), (0, 0), (1, 1), (1, 1), (2, 2)]);

        let result = BlueprintFilter::Redundancy.apply(input);

        assert_eq!(coords(&result), vec![(0, 0), (1, 1), (2, 2)]);
        assert_eq!(result.author, "author");
        assert_eq!(result.name, "shape");
    }

    #[test]
    fn redundancy_collapses_long_runs() {
        let input = bp(&[(7, 7), (7, 7), (7, 7), (7, 7)]);

        assert_eq!(
            coords(&BlueprintFilter::Redundancy.apply(input)),
            vec![(7, 7)]
        );
    }

    #[test]
    fn redundancy_keeps_non_consecutive_duplicates() {
        let input = bp(&[(0, 0), (1, 1), (0, 0)]);

        assert_eq!(BlueprintFilter::Redundancy.apply(input.clone()), input);
    }

    #[test]
    fn redundancy_is_idempotent() {
        let input = bp(&[(0, 0), (0, 0), (1, 1), (0, 0), (0, 0), (2, 2), (2, 2)]);

        let once = BlueprintFilter::Redundancy.apply(input);
        let twice = BlueprintFilter::Redundancy.apply(once.clone());

        assert_eq!(once, twice);
        assert!(once.points.windows(2).all(|pair| pair[0] != pair[1]));
        assert_eq!(coords(&once), vec![(0, 0), (1, 1), (0, 0), (2, 2)]);
    }

    #[test]
    fn undersampling_keeps_short_blueprints() {
        for input in [bp(&[]), bp(&[(5, 5)]), bp(&[(1, 1), (2, 2)])] {
            assert_eq!(BlueprintFilter::Undersampling.apply(input.clone()), input);
        }
    }

    #[test]
    fn undersampling_keeps_even_indexed_points() {
        let input = bp(&[(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)]);

        assert_eq!(
            coords(&BlueprintFilter::Undersampling.apply(input)),
            vec![(0, 0), (2, 2), (4, 4)]
        );
    }

    #[test]
    fn undersampling_with_three_points_drops_the_middle() {
        let input = bp(&[(0, 0), (1, 1), (2, 2)]);

        assert_eq!(
            coords(&BlueprintFilter::Undersampling.apply(input)),
            vec![(0, 0), (2, 2)]
        );
    }

    #[test]
    fn undersampling_is_position_based() {
        let input = bp(&[(0, 0), (0, 0), (0, 0), (1, 1)]);

        assert_eq!(
            coords(&BlueprintFilter::Undersampling.apply(input)),
            vec![(0, 0), (0, 0)]
        );
    }

    #[test]
    fn displays_profile_names() {
        assert_eq!(BlueprintFilter::Redundancy.to_string(), "redundancy");
        assert_eq!(BlueprintFilter::Undersampling.to_string(), "undersampling");
        assert_eq!(BlueprintFilter::Identity.to_string(), "identity");
    }
}
