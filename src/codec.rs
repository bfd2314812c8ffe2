//! Shared data tables of indexed (`4.x.x`) documents.
//!
//! An indexed document stores each object as a slim timing record plus integer indices into data tables, such as `colorNotesData`. Reading resolves an index with [`DataRows`]. Writing collects every shape record into a [`DataTable`], which keeps one row per distinct shape in the order shapes are first seen.

pub mod shape_float;

use std::collections::{HashMap, hash_map::Entry};

use serde_json::Value;

use crate::{
    entity::{CutDirection, GridPosition},
    json::{self, Object},
};

pub use self::shape_float::ShapeF32;

/// A row of a data table: the spatial or visual part of an object, without any timing.
pub trait Shape: Clone + Eq + std::hash::Hash {
    /// Reads the shape from a data table row. Missing fields take the object's defaults.
    fn from_fragment(fragment: &Object) -> Self;

    /// Writes the shape as a data table row.
    fn to_fragment(&self) -> Object;
}

/// Rows of a data table in a parsed document, resolved by index.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataRows<'a> {
    rows: &'a [Value],
}

impl<'a> DataRows<'a> {
    /// Takes the rows of the array field `key` of `doc`, empty if missing.
    #[must_use]
    pub fn new(doc: &'a Object, key: &str) -> Self {
        Self {
            rows: json::array(doc, key),
        }
    }

    /// Gets the row at `index`. A missing, negative or out of range index, and a row which is not an object, all resolve to `None`.
    #[must_use]
    pub fn resolve(&self, index: Option<i32>) -> Option<&'a Object> {
        let index = usize::try_from(index?).ok()?;
        self.rows.get(index)?.as_object()
    }

    /// Resolves the row at `index` into a shape, `None` if it cannot be resolved.
    #[must_use]
    pub fn shape<S: Shape>(&self, index: Option<i32>) -> Option<S> {
        self.resolve(index).map(S::from_fragment)
    }

    /// Number of rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there is no row.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A data table under construction, de-duplicating its rows by structural equality.
#[derive(Debug, Clone)]
pub struct DataTable<S> {
    rows: Vec<S>,
    indices: HashMap<S, usize>,
}

impl<S> Default for DataTable<S> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            indices: HashMap::new(),
        }
    }
}

impl<S: Shape> DataTable<S> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the index of `shape`, appending it as a new row if no equal row exists yet.
    pub fn intern(&mut self, shape: S) -> usize {
        match self.indices.entry(shape) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let index = self.rows.len();
                self.rows.push(entry.key().clone());
                entry.insert(index);
                index
            }
        }
    }

    /// Distinct rows in first-seen order.
    #[must_use]
    pub fn rows(&self) -> &[S] {
        &self.rows
    }

    /// Number of distinct rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether nothing was interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Writes the rows as a JSON array.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Array(
            self.rows
                .iter()
                .map(|shape| Value::Object(shape.to_fragment()))
                .collect(),
        )
    }
}

/// All data tables written with the objects of one difficulty document.
#[derive(Debug, Clone, Default)]
pub struct ShapeTables {
    /// `colorNotesData`, shared by notes and the ends of arcs and chains.
    pub notes: DataTable<NoteShape>,
    /// `bombNotesData`.
    pub bombs: DataTable<BombShape>,
    /// `obstaclesData`.
    pub obstacles: DataTable<ObstacleShape>,
    /// `arcsData`.
    pub arcs: DataTable<ArcShape>,
    /// `chainsData`.
    pub chains: DataTable<ChainShape>,
}

/// Row of `colorNotesData`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NoteShape {
    /// `x`, `y`
    pub position: GridPosition,
    /// `c`
    pub color: i32,
    /// `d`
    pub direction: CutDirection,
    /// `a`
    pub angle_offset: ShapeF32,
}

impl Shape for NoteShape {
    fn from_fragment(fragment: &Object) -> Self {
        Self {
            position: read_position(fragment, "x", "y"),
            color: json::get_i32(fragment, "c", 0),
            direction: CutDirection::from_i32(json::get_i32(fragment, "d", 0)),
            angle_offset: ShapeF32::new(json::get_f32(fragment, "a", 0.0)),
        }
    }

    fn to_fragment(&self) -> Object {
        json::object([
            ("x", Value::from(self.position.x)),
            ("y", Value::from(self.position.y)),
            ("c", Value::from(self.color)),
            ("d", Value::from(self.direction.as_i32())),
            ("a", json::number(self.angle_offset.as_f32())),
        ])
    }
}

/// Row of `bombNotesData`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BombShape {
    /// `x`, `y`
    pub position: GridPosition,
}

impl Shape for BombShape {
    fn from_fragment(fragment: &Object) -> Self {
        Self {
            position: read_position(fragment, "x", "y"),
        }
    }

    fn to_fragment(&self) -> Object {
        json::object([
            ("x", Value::from(self.position.x)),
            ("y", Value::from(self.position.y)),
        ])
    }
}

/// Row of `obstaclesData`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObstacleShape {
    /// `d`
    pub duration: ShapeF32,
    /// `x`, `y`
    pub position: GridPosition,
    /// `w`
    pub width: i32,
    /// `h`
    pub height: i32,
}

impl Default for ObstacleShape {
    fn default() -> Self {
        Self::from_fragment(&Object::new())
    }
}

impl Shape for ObstacleShape {
    fn from_fragment(fragment: &Object) -> Self {
        Self {
            duration: ShapeF32::new(json::get_f32(fragment, "d", 0.0)),
            position: read_position(fragment, "x", "y"),
            width: json::get_i32(fragment, "w", 1),
            height: json::get_i32(fragment, "h", 5),
        }
    }

    fn to_fragment(&self) -> Object {
        json::object([
            ("d", json::number(self.duration.as_f32())),
            ("x", Value::from(self.position.x)),
            ("y", Value::from(self.position.y)),
            ("w", Value::from(self.width)),
            ("h", Value::from(self.height)),
        ])
    }
}

/// Row of `arcsData`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ArcShape {
    /// `m`
    pub head_multiplier: ShapeF32,
    /// `tm`
    pub tail_multiplier: ShapeF32,
    /// `a`
    pub mid_anchor_mode: i32,
}

impl Shape for ArcShape {
    fn from_fragment(fragment: &Object) -> Self {
        Self {
            head_multiplier: ShapeF32::new(json::get_f32(fragment, "m", 0.0)),
            tail_multiplier: ShapeF32::new(json::get_f32(fragment, "tm", 0.0)),
            mid_anchor_mode: json::get_i32(fragment, "a", 0),
        }
    }

    fn to_fragment(&self) -> Object {
        json::object([
            ("m", json::number(self.head_multiplier.as_f32())),
            ("tm", json::number(self.tail_multiplier.as_f32())),
            ("a", Value::from(self.mid_anchor_mode)),
        ])
    }
}

/// Row of `chainsData`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainShape {
    /// `tx`, `ty`
    pub tail_position: GridPosition,
    /// `c`
    pub segment_count: i32,
    /// `s`
    pub squish: ShapeF32,
}

impl Default for ChainShape {
    fn default() -> Self {
        Self::from_fragment(&Object::new())
    }
}

impl Shape for ChainShape {
    fn from_fragment(fragment: &Object) -> Self {
        Self {
            tail_position: read_position(fragment, "tx", "ty"),
            segment_count: json::get_i32(fragment, "c", 0),
            squish: ShapeF32::new(json::get_f32(fragment, "s", 1.0)),
        }
    }

    fn to_fragment(&self) -> Object {
        json::object([
            ("tx", Value::from(self.tail_position.x)),
            ("ty", Value::from(self.tail_position.y)),
            ("c", Value::from(self.segment_count)),
            ("s", json::number(self.squish.as_f32())),
        ])
    }
}

fn read_position(fragment: &Object, x: &str, y: &str) -> GridPosition {
    GridPosition::new(json::get_i32(fragment, x, 0), json::get_i32(fragment, y, 0))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn intern_in_first_seen_order() {
        let shape = |x| BombShape {
            position: GridPosition::new(x, 0),
        };
        let mut table = DataTable::new();
        let indices: Vec<_> = [2, 0, 2, 2, 1, 0]
            .into_iter()
            .map(|x| table.intern(shape(x)))
            .collect();
        assert_eq!(indices, [0, 1, 0, 0, 2, 1]);
        assert_eq!(table.rows(), &[shape(2), shape(0), shape(1)]);
        assert_eq!(
            table.to_json(),
            json!([{ "x": 2, "y": 0 }, { "x": 0, "y": 0 }, { "x": 1, "y": 0 }])
        );
    }

    #[test]
    fn float_formatting_does_not_split_rows() {
        let mut table = DataTable::new();
        let a = table.intern(ArcShape {
            head_multiplier: ShapeF32::new(1.0),
            tail_multiplier: ShapeF32::new(0.5),
            mid_anchor_mode: 0,
        });
        let b = table.intern(ArcShape {
            head_multiplier: ShapeF32::new(1.000_01),
            tail_multiplier: ShapeF32::new(0.5),
            mid_anchor_mode: 0,
        });
        assert_eq!(a, b);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn resolve_out_of_range() {
        let doc = json!({ "colorNotesData": [{ "x": 1, "y": 2, "c": 1, "d": 8 }, 3] });
        let doc = doc.as_object().unwrap();
        let rows = DataRows::new(doc, "colorNotesData");
        assert_eq!(rows.len(), 2);
        let shape: NoteShape = rows.shape(Some(0)).unwrap();
        assert_eq!(shape.position, GridPosition::new(1, 2));
        assert_eq!(shape.direction, CutDirection::Any);
        assert!(rows.resolve(Some(1)).is_none());
        assert!(rows.resolve(Some(2)).is_none());
        assert!(rows.resolve(Some(-1)).is_none());
        assert!(rows.resolve(None).is_none());
        assert!(DataRows::new(doc, "bombNotesData").is_empty());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let obstacle = ObstacleShape::default();
        assert_eq!((obstacle.width, obstacle.height), (1, 5));
        assert_eq!(ChainShape::default().squish.as_f32(), 1.0);
    }
}
