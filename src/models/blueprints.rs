use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Point {
        Point { x, y }
    }
}

/// A named, ordered list of points owned by an author.
///
/// The pair `(author, name)` identifies a blueprint. The order of `points` is the drawing
/// order and is preserved through storage.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq, Hash)]
pub struct Blueprint {
    pub author: String,
    pub name: String,
    pub points: Vec<Point>,
}

impl Blueprint {
    pub fn new(author: impl Into<String>, name: impl Into<String>, points: Vec<Point>) -> Self {
        Self {
            author: author.into(),
            name: name.into(),
            points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_points_in_order() {
        let bp = Blueprint::new("john", "house", vec![Point::new(2, 2), Point::new(0, 1)]);

        let value = serde_json::to_value(&bp).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "author": "john",
                "name": "house",
                "points": [{ "x": 2, "y": 2 }, { "x": 0, "y": 1 }],
            })
        );
    }
}
