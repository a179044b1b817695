// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! `geometry`: types whose examples refer to each other, a free function,
//! and a type re-exported from `draft`.

use doccheck_interp::{
    Args, AsAny, ClassRef, NativeClass, NativeFunction, Namespace, Object, RuntimeError, Value,
};

const MODULE: &str = "geometry";

const POINT_DOC: &str = "\
A point on the integer grid.

>>example1: cls(0, 0)
>>example2: Point(x=3, y=4)
>>test: cls.example2.x == 3 and cls.example2.y == 4
>>test: cls.DIMENSIONS == 2
>>error: cls(1)
>>error: cls(1, 2, 3)";

const NORM_DOC: &str = "\
Distance from the origin.
>>test: cls.example2.norm() == 5.0
>>test: cls.example1.norm() == 0
>>test: Point(10000000000, 0).norm() > 0";

const TRANSLATE_DOC: &str = "\
Move by `dx`, `dy`.
>>test: cls.example1.translate(3, 4) == cls.example2
>>test: cls.example1.translate(1, 1) != cls.example2
>>error: cls.example1.translate('a', 1)
>>error: cls(9223372036854775807, 0).translate(1, 0)";

const SEGMENT_DOC: &str = "\
A segment between two points, sharing them.

>>example1: cls(Point.example1, Point.example2)
>>test: cls.example1.start is Point.example1
>>test: cls.example1.end == Point(3, 4)
>>error: cls(Point.example1, 7)
>>error: cls(Point.example2, Point(3, 4))";

const LENGTH_DOC: &str = ">>test: Segment.example1.length() == 5.0";

const MIDPOINT_DOC: &str = "\
>>test: cls.example1.midpoint() == (1.5, 2.0)
>>test: round(cls.example1.midpoint()[1]) == 2";

const DISTANCE_DOC: &str = "\
Euclidean distance between two points.
>>test: distance(Point.example1, Point.example2) == 5.0
>>test: cls(Point.example2, Point.example2) == 0
>>error: distance(Point.example1)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Point {
    x: i64,
    y: i64,
}

/// Lengths are computed in `f64`, so any two grid points have one.
fn length(dx: f64, dy: f64) -> f64 {
    (dx * dx + dy * dy).sqrt()
}

impl Point {
    fn norm(self) -> f64 {
        length(self.x as f64, self.y as f64)
    }

    fn distance(self, other: Point) -> f64 {
        length(other.x as f64 - self.x as f64, other.y as f64 - self.y as f64)
    }

    fn translate(self, dx: i64, dy: i64) -> Result<Point, RuntimeError> {
        match (self.x.checked_add(dx), self.y.checked_add(dy)) {
            (Some(x), Some(y)) => Ok(Point { x, y }),
            _ => Err(RuntimeError::Overflow(format!(
                "{} translated by ({}, {}) leaves the grid",
                self.repr(),
                dx,
                dy
            ))),
        }
    }
}

fn point_arg(args: &Args, index: usize, name: &str, func: &str) -> Result<Point, RuntimeError> {
    match args.require(index, name, func)? {
        Value::Object(o) => AsAny::as_any(&**o).downcast_ref::<Point>().copied(),
        _ => None,
    }
    .ok_or_else(|| {
        RuntimeError::TypeError(format!("{}() argument '{}' must be Point", func, name))
    })
}

fn point_of(value: &Value) -> Option<Point> {
    match value {
        Value::Object(o) => AsAny::as_any(&**o).downcast_ref::<Point>().copied(),
        _ => None,
    }
}

impl Object for Point {
    fn type_name(&self) -> &str {
        "Point"
    }

    fn get_attr(&self, name: &str) -> Option<Value> {
        match name {
            "x" => Some(Value::Int(self.x)),
            "y" => Some(Value::Int(self.y)),
            _ => None,
        }
    }

    fn has_method(&self, name: &str) -> bool {
        matches!(name, "norm" | "translate")
    }

    fn call_method(&self, name: &str, args: Args) -> Result<Value, RuntimeError> {
        match name {
            "norm" => {
                args.expect_at_most(&[], name)?;
                Ok(Value::Float(self.norm()))
            }
            "translate" => {
                args.expect_at_most(&["dx", "dy"], name)?;
                let dx = args.int(0, "dx", name)?;
                let dy = args.int(1, "dy", name)?;
                self.translate(dx, dy).map(Value::object)
            }
            _ => Err(RuntimeError::AttributeError {
                ty: "Point".to_string(),
                attr: name.to_string(),
            }),
        }
    }

    fn equals(&self, other: &Value) -> bool {
        point_of(other) == Some(*self)
    }

    fn repr(&self) -> String {
        format!("Point({}, {})", self.x, self.y)
    }
}

/// Endpoints are kept as the values passed in, so `start is` holds.
struct Segment {
    start: Value,
    end: Value,
}

impl Segment {
    fn endpoints(&self) -> Result<(Point, Point), RuntimeError> {
        match (point_of(&self.start), point_of(&self.end)) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(RuntimeError::TypeError("segment endpoints must be Points".to_string())),
        }
    }
}

impl Object for Segment {
    fn type_name(&self) -> &str {
        "Segment"
    }

    fn get_attr(&self, name: &str) -> Option<Value> {
        match name {
            "start" => Some(self.start.clone()),
            "end" => Some(self.end.clone()),
            _ => None,
        }
    }

    fn has_method(&self, name: &str) -> bool {
        matches!(name, "length" | "midpoint")
    }

    fn call_method(&self, name: &str, args: Args) -> Result<Value, RuntimeError> {
        args.expect_at_most(&[], name)?;
        let (a, b) = self.endpoints()?;
        match name {
            "length" => Ok(Value::Float(a.distance(b))),
            "midpoint" => Ok(Value::tuple(vec![
                Value::Float((a.x as f64 + b.x as f64) / 2.0),
                Value::Float((a.y as f64 + b.y as f64) / 2.0),
            ])),
            _ => Err(RuntimeError::AttributeError {
                ty: "Segment".to_string(),
                attr: name.to_string(),
            }),
        }
    }

    fn repr(&self) -> String {
        format!("Segment({}, {})", self.start.repr(), self.end.repr())
    }
}

fn point_class() -> ClassRef {
    NativeClass::new("Point")
        .in_module(MODULE)
        .doc(POINT_DOC)
        .constructor(|args| {
            args.expect_at_most(&["x", "y"], "Point")?;
            Ok(Value::object(Point {
                x: args.int(0, "x", "Point")?,
                y: args.int(1, "y", "Point")?,
            }))
        })
        .method("norm", Some(NORM_DOC))
        .method("translate", Some(TRANSLATE_DOC))
        .attr("DIMENSIONS", Value::Int(2))
        .build()
}

fn segment_class() -> ClassRef {
    NativeClass::new("Segment")
        .in_module(MODULE)
        .doc(SEGMENT_DOC)
        .constructor(|args| {
            args.expect_at_most(&["start", "end"], "Segment")?;
            let start = point_arg(&args, 0, "start", "Segment")?;
            let end = point_arg(&args, 1, "end", "Segment")?;
            if start == end {
                return Err(RuntimeError::host(
                    "DegenerateSegmentError",
                    format!("segment from {} to itself", start.repr()),
                ));
            }
            Ok(Value::object(Segment {
                start: args.require(0, "start", "Segment")?.clone(),
                end: args.require(1, "end", "Segment")?.clone(),
            }))
        })
        .method("length", Some(LENGTH_DOC))
        .method("midpoint", Some(MIDPOINT_DOC))
        .build()
}

fn distance() -> NativeFunction {
    NativeFunction::new("distance", |args| {
        args.expect_at_most(&["a", "b"], "distance")?;
        let a = point_arg(&args, 0, "a", "distance")?;
        let b = point_arg(&args, 1, "b", "distance")?;
        Ok(Value::Float(a.distance(b)))
    })
    .in_module(MODULE)
    .doc(DISTANCE_DOC)
}

pub(super) fn namespace(draft_class: ClassRef) -> Namespace {
    let mut ns = Namespace::new(MODULE);
    ns.bind_class(point_class());
    ns.bind_class(segment_class());
    ns.bind_function(distance());
    // Visible to expressions here, but declared in `draft`.
    ns.bind_class(draft_class);
    ns.bind("ORIGIN_LABEL", Value::str("origin"));
    ns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances() {
        let a = Point { x: 0, y: 0 };
        let b = Point { x: 3, y: 4 };
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.norm(), 5.0);
    }

    #[test]
    fn far_points_do_not_overflow() {
        let far = Point { x: 10_000_000_000, y: 0 };
        assert_eq!(far.norm(), 1e10);
        let corner = Point { x: i64::MIN, y: i64::MIN };
        assert!(corner.distance(Point { x: i64::MAX, y: 0 }) > 0.0);
        let err = Point { x: i64::MAX, y: 0 }.translate(1, 0).unwrap_err();
        assert_eq!(err.kind(), "OverflowError");
        assert_eq!(far.translate(-1, 2).unwrap(), Point { x: 9_999_999_999, y: 2 });
    }

    #[test]
    fn segment_rejects_non_points() {
        let class = segment_class();
        let origin = Value::object(Point { x: 0, y: 0 });
        let err = class
            .construct(Args::new(vec![origin, Value::Int(7)]))
            .unwrap_err();
        assert_eq!(err.kind(), "TypeError");
    }

    #[test]
    fn segment_needs_distinct_endpoints() {
        let class = segment_class();
        let p = || Value::object(Point { x: 3, y: 4 });
        let err = class.construct(Args::new(vec![p(), p()])).unwrap_err();
        assert_eq!(err.detail(), "DegenerateSegmentError: segment from Point(3, 4) to itself");
    }
}
