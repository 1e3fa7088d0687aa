//! Side-by-side comparison of shape properties.

use hypersolid_math::{Float, MathError, ratio_from_ln};
use serde::Serialize;

use crate::shape::{PropertyValue, Shape, ShapeKind, Solid};
use crate::{CompareError, Limits};

/// Properties compared when none are requested.
pub const DEFAULT_PROPERTIES: &[&str] = &["volume", "surface_area"];

/// Value of one property for one shape.
#[derive(Serialize, Debug, Copy, Clone, PartialEq)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum PropertyCell {
    /// The property has a value.
    Value(PropertyValue),
    /// The shape does not have the property.
    NotApplicable,
    /// The value is too large to represent; only its logarithm is known.
    Overflow {
        /// Natural logarithm of the value.
        ln_value: Float,
    },
}
impl PropertyCell {
    /// Returns the value as a float, if there is one.
    pub fn as_float(self) -> Option<Float> {
        match self {
            PropertyCell::Value(v) => v.as_float(),
            PropertyCell::NotApplicable | PropertyCell::Overflow { .. } => None,
        }
    }
}

/// Ratio `values[numerator] / values[denominator]` within one row.
#[derive(Serialize, Debug, Copy, Clone, PartialEq)]
pub struct Ratio {
    /// Index of the shape in the numerator.
    pub numerator: usize,
    /// Index of the shape in the denominator.
    pub denominator: usize,
    /// Ratio, or `None` if either side is missing or non-numeric, or the
    /// denominator is zero.
    pub value: Option<Float>,
}

/// One property compared across all shapes.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PropertyRow {
    /// Name of the property.
    pub property: String,
    /// Value for each shape, in the same order as the shapes.
    pub values: Vec<PropertyCell>,
    /// Every ordered pair of distinct shapes.
    pub ratios: Vec<Ratio>,
}
impl PropertyRow {
    /// Returns the ratio `values[numerator] / values[denominator]`.
    pub fn ratio(&self, numerator: usize, denominator: usize) -> Option<Float> {
        self.ratios
            .iter()
            .find(|r| r.numerator == numerator && r.denominator == denominator)
            .and_then(|r| r.value)
    }
}

/// Identification of a compared shape.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ShapeSummary {
    /// Human-readable name.
    pub name: String,
    /// Kind of shape.
    pub kind: ShapeKind,
    /// Number of dimensions.
    pub ndim: u8,
}

/// Result of [`compare()`].
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ComparisonTable {
    /// Compared shapes.
    pub shapes: Vec<ShapeSummary>,
    /// One row per requested property.
    pub rows: Vec<PropertyRow>,
}
impl ComparisonTable {
    /// Returns the row for `property`.
    pub fn row(&self, property: &str) -> Option<&PropertyRow> {
        self.rows.iter().find(|row| row.property == property)
    }
}

/// Measurement that is computed in log space and compared by log ratio.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Measure {
    Volume,
    SurfaceArea,
}
impl Measure {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "volume" => Some(Self::Volume),
            "surface_area" | "surface" => Some(Self::SurfaceArea),
            _ => None,
        }
    }

    fn ln(self, shape: &Shape) -> Float {
        match self {
            Measure::Volume => shape.ln_volume(),
            Measure::SurfaceArea => shape.ln_surface_area(),
        }
    }

    fn cell(self, shape: &Shape) -> PropertyCell {
        let value = match self {
            Measure::Volume => shape.volume(),
            Measure::SurfaceArea => shape.surface_area(),
        };
        match value {
            Ok(x) => PropertyCell::Value(PropertyValue::Real(x)),
            Err(MathError::NumericOverflow { ln_value }) => PropertyCell::Overflow { ln_value },
            Err(e) => {
                log::warn!("error computing {self:?} of {}: {e}", shape.name());
                PropertyCell::NotApplicable
            }
        }
    }
}

/// Compares `properties` across `shapes`.
///
/// Volume and surface area ratios are computed from logarithms, so two shapes
/// whose volumes both overflow still have a finite ratio. Property names that
/// a shape does not have produce [`PropertyCell::NotApplicable`]. If
/// `properties` is empty, [`DEFAULT_PROPERTIES`] are compared.
pub fn compare<S: AsRef<str>>(
    shapes: &[Shape],
    properties: &[S],
    limits: &Limits,
) -> Result<ComparisonTable, CompareError> {
    if shapes.len() > limits.max_shapes {
        return Err(CompareError::TooManyShapes {
            count: shapes.len(),
            max: limits.max_shapes,
        });
    }

    let property_names: Vec<&str> = if properties.is_empty() {
        DEFAULT_PROPERTIES.to_vec()
    } else {
        properties.iter().map(|p| p.as_ref()).collect()
    };

    let extra_properties: Vec<_> = shapes.iter().map(|s| s.extra_properties()).collect();

    let rows = property_names
        .into_iter()
        .map(|property| {
            let measure = Measure::from_name(property);

            let values: Vec<PropertyCell> = match measure {
                Some(m) => shapes.iter().map(|s| m.cell(s)).collect(),
                None => extra_properties
                    .iter()
                    .map(|props| match props.get(property) {
                        Some(&v) => PropertyCell::Value(v),
                        None => PropertyCell::NotApplicable,
                    })
                    .collect(),
            };
            if !shapes.is_empty() && values.iter().all(|v| *v == PropertyCell::NotApplicable) {
                log::warn!("no compared shape has a property named {property:?}");
            }

            let ratios = pairs(shapes.len())
                .map(|(i, j)| {
                    let value = match measure {
                        Some(m) => log_ratio(m.ln(&shapes[i]), m.ln(&shapes[j])),
                        None => plain_ratio(values[i], values[j]),
                    };
                    Ratio {
                        numerator: i,
                        denominator: j,
                        value,
                    }
                })
                .collect();

            PropertyRow {
                property: property.to_owned(),
                values,
                ratios,
            }
        })
        .collect();

    Ok(ComparisonTable {
        shapes: shapes
            .iter()
            .map(|s| ShapeSummary {
                name: s.name(),
                kind: s.kind(),
                ndim: s.ndim(),
            })
            .collect(),
        rows,
    })
}

/// Returns every ordered pair of distinct indices below `n`.
fn pairs(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n).flat_map(move |i| (0..n).filter(move |&j| j != i).map(move |j| (i, j)))
}

fn log_ratio(ln_numerator: Float, ln_denominator: Float) -> Option<Float> {
    ratio_from_ln(ln_numerator, ln_denominator)
        .inspect_err(|e| log::debug!("ratio not representable: {e}"))
        .ok()
}

fn plain_ratio(numerator: PropertyCell, denominator: PropertyCell) -> Option<Float> {
    let n = numerator.as_float()?;
    let d = denominator.as_float()?;
    (d != 0.0).then(|| n / d)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::shape::{HyperCube, HyperSphere, Simplex};

    fn sphere_and_cube() -> Vec<Shape> {
        vec![
            HyperSphere::new(3, 2.0).unwrap().into(),
            HyperCube::new(3, 2.0).unwrap().into(),
        ]
    }

    #[test]
    fn test_sphere_vs_cube_volume() {
        let table = compare(&sphere_and_cube(), &["volume"], &Limits::default()).unwrap();
        let row = table.row("volume").unwrap();
        assert_relative_eq!(row.values[0].as_float().unwrap(), 33.5103, max_relative = 1e-5);
        assert_eq!(row.values[1], PropertyCell::Value(PropertyValue::Real(8.0)));
        assert_relative_eq!(row.ratio(0, 1).unwrap(), 4.1888, max_relative = 1e-4);
        assert_relative_eq!(row.ratio(1, 0).unwrap(), 1.0 / 4.18879, max_relative = 1e-4);
        assert_eq!(row.ratios.len(), 2);
        assert_eq!(table.shapes[0].name, "Sphere");
        assert_eq!(table.shapes[1].kind, ShapeKind::Cube);
    }

    #[test]
    fn test_default_properties() {
        let table = compare::<&str>(&sphere_and_cube(), &[], &Limits::default()).unwrap();
        let names: Vec<_> = table.rows.iter().map(|r| r.property.as_str()).collect();
        assert_eq!(names, ["volume", "surface_area"]);
    }

    #[test]
    fn test_extra_properties_and_missing_ones() {
        let shapes: Vec<Shape> = vec![
            HyperCube::new(3, 1.0).unwrap().into(),
            Simplex::new(3, 1.0).unwrap().into(),
            HyperSphere::new(3, 1.0).unwrap().into(),
        ];
        let table = compare(&shapes, &["vertices", "bogus"], &Limits::default()).unwrap();

        let vertices = table.row("vertices").unwrap();
        assert_eq!(vertices.values[0], PropertyCell::Value(PropertyValue::Count(8)));
        assert_eq!(vertices.values[1], PropertyCell::Value(PropertyValue::Count(4)));
        assert_eq!(vertices.values[2], PropertyCell::NotApplicable);
        assert_eq!(vertices.ratio(0, 1), Some(2.0));
        assert_eq!(vertices.ratio(0, 2), None);
        assert_eq!(vertices.ratios.len(), 6);

        let bogus = table.row("bogus").unwrap();
        assert!(bogus.values.iter().all(|v| *v == PropertyCell::NotApplicable));
        assert!(bogus.ratios.iter().all(|r| r.value.is_none()));
    }

    #[test]
    fn test_overflowing_volumes_have_finite_ratio() {
        let shapes: Vec<Shape> = vec![
            HyperCube::new(100, 2e10).unwrap().into(),
            HyperCube::new(100, 1e10).unwrap().into(),
        ];
        let table = compare(&shapes, &["volume"], &Limits::default()).unwrap();
        let row = table.row("volume").unwrap();
        assert!(matches!(row.values[0], PropertyCell::Overflow { .. }));
        assert!(matches!(row.values[1], PropertyCell::Overflow { .. }));
        // 2^100
        assert_relative_eq!(row.ratio(0, 1).unwrap(), 2.0_f64.powi(100), max_relative = 1e-9);
    }

    #[test]
    fn test_too_many_shapes() {
        let circle: Shape = HyperSphere::new(2, 1.0).unwrap().into();
        let shapes = vec![circle; 21];
        assert_eq!(
            compare(&shapes, &["volume"], &Limits::default()),
            Err(CompareError::TooManyShapes { count: 21, max: 20 }),
        );
        assert!(compare(&shapes[..20], &["volume"], &Limits::default()).is_ok());
    }

    #[test]
    fn test_pairs() {
        let expected = [(0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1)];
        assert_eq!(pairs(3).collect::<Vec<_>>(), expected);
        assert_eq!(pairs(1).count(), 0);
    }
}
