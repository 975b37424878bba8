//! Entity, position, and task label types.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque unique entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(Uuid);

impl EntityId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for EntityId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Grid position of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: i64,
    /// Vertical coordinate.
    pub y: i64,
}

impl Position {
    /// Create a position.
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.x, self.y)
    }
}

/// Inclusive rectangular region used for spatial queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    /// Left edge (inclusive).
    pub min_x: i64,
    /// Right edge (inclusive).
    pub max_x: i64,
    /// Lower edge (inclusive).
    pub min_y: i64,
    /// Upper edge (inclusive).
    pub max_y: i64,
}

impl Area {
    /// Area of `width` x `height` centred on `center`. Half extents round down.
    ///
    /// Edges saturate at the `i64` range, so any centre yields a valid area.
    #[must_use]
    pub const fn around(center: Position, width: u32, height: u32) -> Self {
        let half_w = (width / 2) as i64;
        let half_h = (height / 2) as i64;
        Self {
            min_x: center.x.saturating_sub(half_w),
            max_x: center.x.saturating_add(half_w),
            min_y: center.y.saturating_sub(half_h),
            max_y: center.y.saturating_add(half_h),
        }
    }

    /// Whether `pos` lies inside the area, edges included.
    #[must_use]
    pub const fn contains(&self, pos: Position) -> bool {
        pos.x >= self.min_x && pos.x <= self.max_x && pos.y >= self.min_y && pos.y <= self.max_y
    }
}

/// Label of a task, unique only within one cycle of one entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskLabel(String);

impl TaskLabel {
    /// Label for the `ordinal`-th task of a cycle (1-based).
    #[must_use]
    pub fn ordinal(ordinal: usize) -> Self {
        Self(format!("task-{ordinal}"))
    }

    /// Borrow the label text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskLabel {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for TaskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored entity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// Position on the map.
    pub position: Position,
    /// Running tasks mapped to their absolute deadline (ms since epoch).
    #[serde(default)]
    pub active_tasks: HashMap<TaskLabel, u128>,
}

impl Entity {
    /// New entity with a fresh id and no active tasks.
    #[must_use]
    pub fn new(position: Position) -> Self {
        Self {
            id: EntityId::new(),
            position,
            active_tasks: HashMap::new(),
        }
    }

    /// The immutable part of the record the scheduler carries around.
    #[must_use]
    pub const fn handle(&self) -> EntityHandle {
        EntityHandle {
            id: self.id,
            position: self.position,
        }
    }
}

/// Copyable reference to an entity: id plus position snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityHandle {
    /// Entity identifier.
    pub id: EntityId,
    /// Position at load time.
    pub position: Position,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_around_rounds_half_extent_down() {
        let area = Area::around(Position::new(10, 20), 5, 32);
        assert_eq!(area.min_x, 8);
        assert_eq!(area.max_x, 12);
        assert_eq!(area.min_y, 4);
        assert_eq!(area.max_y, 36);
    }

    #[test]
    fn test_area_around_saturates_at_range_ends() {
        let high = Area::around(Position::new(i64::MAX, i64::MAX), 32, 32);
        assert_eq!(high.max_x, i64::MAX);
        assert_eq!(high.min_x, i64::MAX - 16);
        assert!(high.contains(Position::new(i64::MAX, i64::MAX - 3)));

        let low = Area::around(Position::new(i64::MIN, 0), 32, 32);
        assert_eq!(low.min_x, i64::MIN);
        assert_eq!(low.max_x, i64::MIN + 16);
        assert_eq!((low.min_y, low.max_y), (-16, 16));
        assert!(low.contains(Position::new(i64::MIN, 0)));
    }

    #[test]
    fn test_area_contains_edges() {
        let area = Area::around(Position::new(0, 0), 4, 4);
        assert!(area.contains(Position::new(2, -2)));
        assert!(!area.contains(Position::new(3, 0)));
    }

    #[test]
    fn test_entity_id_parse() {
        let id = EntityId::new();
        let parsed: EntityId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<EntityId>().is_err());
    }

    #[test]
    fn test_ordinal_labels() {
        assert_eq!(TaskLabel::ordinal(3).as_str(), "task-3");
    }
}
