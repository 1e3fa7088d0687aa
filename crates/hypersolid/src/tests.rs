use approx::{assert_abs_diff_eq, assert_relative_eq};
use hypersolid_math::adaptive_simpson;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

use crate::*;

#[test]
fn test_compare_sphere_and_cube() {
    let limits = Limits::default();
    let shapes = [
        create_shape(ShapeKind::Sphere, 3, &[2.0], &limits).unwrap(),
        create_shape(ShapeKind::Cube, 3, &[2.0], &limits).unwrap(),
    ];
    let table = compare(&shapes, &["volume"], &limits).unwrap();
    let row = table.row("volume").unwrap();
    assert_abs_diff_eq!(row.values[0].as_float().unwrap(), 33.5103, epsilon = 1e-4);
    assert_eq!(row.values[1].as_float(), Some(8.0));
    assert_abs_diff_eq!(row.ratio(0, 1).unwrap(), 4.1888, epsilon = 1e-4);

    let json = serde_json::to_value(&table).unwrap();
    assert_eq!(json["shapes"][0]["name"], "Sphere");
    assert_eq!(json["shapes"][1]["kind"], "cube");
    assert_eq!(json["rows"][0]["values"][1], json!({"status": "value", "value": 8.0}));
}

#[test]
fn test_shape_request_from_json() {
    let request: ShapeRequest =
        serde_json::from_value(json!({"type": "Tesseract", "ndim": 4, "params": [2.0]})).unwrap();
    let shape = request.build(&Limits::default()).unwrap();
    assert_eq!(shape.kind(), ShapeKind::Cube);
    assert_eq!(shape.volume(), Ok(16.0));

    let unknown: ShapeRequest =
        serde_json::from_value(json!({"type": "dodecahedron", "ndim": 3, "params": [1.0]}))
            .unwrap();
    assert_eq!(
        unknown.build(&Limits::default()),
        Err(ShapeValidationError::UnknownShapeType("dodecahedron".to_owned())),
    );
    assert_eq!(
        unknown.build(&Limits::default()).unwrap_err().to_string(),
        "unknown shape type \"dodecahedron\"; \
         expected one of: sphere, cube, ellipsoid, simplex, pyramid",
    );
}

#[test]
fn test_too_many_dimensions() {
    let limits = Limits::default();
    for kind in [ShapeKind::Sphere, ShapeKind::Cube, ShapeKind::Simplex] {
        assert_eq!(
            create_shape(kind, 101, &[1.0], &limits),
            Err(ShapeValidationError::TooManyDimensions { ndim: 101, max: 100 }),
        );
        assert!(create_shape(kind, 100, &[1.0], &limits).is_ok());
    }

    let raised = Limits {
        max_ndim: 150,
        ..limits
    };
    assert!(create_shape(ShapeKind::Sphere, 101, &[1.0], &raised).is_ok());
}

#[test]
fn test_too_many_tiles() {
    let request = TilingRequest::new(
        Region::new(10.0, 10.0),
        TilingSpec::Triangular { tile_size: 0.01 },
    );
    let err = generate_tiling(&request, &Limits::default()).unwrap_err();
    assert!(matches!(
        err,
        TilingError::TooManyTiles { estimated, max: 10_000 } if estimated > 1e6,
    ));

    let generous = Limits {
        max_tiles: 5_000_000,
        ..Limits::default()
    };
    let request = TilingRequest::new(
        Region::new(10.0, 10.0),
        TilingSpec::Square { tile_size: 0.1 },
    );
    assert_eq!(generate_tiling(&request, &generous).unwrap().tiles().len(), 10_000);
}

#[test]
fn test_tiling_validation() {
    let limits = Limits::default();
    let square = TilingSpec::Square { tile_size: 1.0 };

    let mut request = TilingRequest::new(Region::new(5.0, 5.0), square.clone());
    request.ndim = 3;
    assert_eq!(
        generate_tiling(&request, &limits),
        Err(TilingError::UnsupportedDimension(3)),
    );

    for region in [
        Region::new(0.0, 5.0),
        Region::new(5.0, -1.0),
        Region::new(Float::NAN, 5.0),
        Region::from_corners([0.0, 0.0], [Float::INFINITY, 1.0]),
    ] {
        let request = TilingRequest::new(region, square.clone());
        assert!(matches!(
            generate_tiling(&request, &limits),
            Err(TilingError::InvalidRegion { .. }),
        ));
    }

    let request = TilingRequest::new(Region::new(5.0, 5.0), TilingSpec::Square { tile_size: 0.0 });
    assert_eq!(
        generate_tiling(&request, &limits),
        Err(TilingError::InvalidTileSize(0.0)),
    );
}

#[test]
fn test_circle_packing_from_json() {
    let request: TilingRequest = serde_json::from_value(json!({
        "region": {"min": [0, 0], "max": [20.0, 17.320508075688775]},
        "pattern": "hexagonal",
        "tile_size": 1,
        "mode": "circle_packing",
    }))
    .unwrap();
    assert_eq!(request.ndim, 2);

    let pattern = generate_tiling(&request, &Limits::default()).unwrap();
    let analysis = analyze(&pattern);
    assert_abs_diff_eq!(analysis.coverage_efficiency, 0.9069, epsilon = 1e-3);

    let json = serde_json::to_value(&pattern).unwrap();
    assert_eq!(json["pattern"], "hexagonal");
    assert_eq!(json["mode"], "circle_packing");
    assert_eq!(json["tiles"][0]["outline"], json!({"shape": "disk", "radius": 1.0}));
    assert!(pattern.tiles().iter().any(|t| t.center == cgmath::point2(1.0, 1.0)));

    let json = serde_json::to_value(&analysis).unwrap();
    assert_eq!(json["symmetry_group"], "p6m");
    assert_eq!(json["schlafli"], serde_json::Value::Null);
}

#[test]
fn test_square_tiling_json() {
    let request = TilingRequest::new(Region::new(2.0, 1.0), TilingSpec::Square { tile_size: 1.0 });
    let pattern = generate_tiling(&request, &Limits::default()).unwrap();
    let json = serde_json::to_value(&pattern).unwrap();
    assert_eq!(
        json["tiles"][1],
        json!({
            "id": 1,
            "center": {"x": 1.5, "y": 0.5},
            "outline": {
                "shape": "polygon",
                "vertices": [
                    {"x": 1.0, "y": 0.0},
                    {"x": 2.0, "y": 0.0},
                    {"x": 2.0, "y": 1.0},
                    {"x": 1.0, "y": 1.0},
                ],
            },
            "neighbors": [0],
        }),
    );

    let analysis = serde_json::to_value(analyze(&pattern)).unwrap();
    assert_eq!(analysis["schlafli"], "{4,4}");
    assert_eq!(analysis["pattern"], "square");
}

#[test]
fn test_unified_error() {
    let err: Error = TilingError::NoSeeds.into();
    assert_eq!(err.to_string(), "voronoi tiling requires at least one seed");
    let err: Error = CompareError::TooManyShapes { count: 30, max: 20 }.into();
    assert!(matches!(err, Error::Compare(_)));
}

#[test]
fn test_cross_sections_integrate_to_volume() {
    let limits = Limits::default();
    let simplex_height = 2.0 * (4.0 / 6.0_f64).sqrt();
    let cases = [
        ("sphere", 3, vec![1.5], 1, -1.5, 1.5),
        ("cube", 4, vec![2.0], 3, 0.0, 2.0),
        ("ellipsoid", 3, vec![1.0, 2.0, 3.0], 0, -1.0, 1.0),
        ("simplex", 3, vec![2.0], 2, 0.0, simplex_height),
        ("pyramid", 4, vec![2.0, 3.0], 3, 0.0, 3.0),
    ];
    for (kind, ndim, params, axis, lo, hi) in cases {
        let shape = Shape::from_name(kind, ndim, &params, &limits).unwrap();
        let slice = |t| shape.cross_section(axis, t).unwrap();
        let integral = adaptive_simpson(slice, lo, hi, 1e-12);
        assert_relative_eq!(integral, shape.volume().unwrap(), max_relative = 1e-9);
        assert_eq!(shape.cross_section(axis, hi + 0.1), Ok(0.0), "{kind}");
    }
}

#[test]
fn test_point_queries_through_shape() {
    let limits = Limits::default();
    let ellipse = create_shape(ShapeKind::Ellipsoid, 2, &[3.0, 4.0], &limits).unwrap();
    assert_eq!(ellipse.contains_point(&[2.0, 2.0]), Ok(true));
    assert_eq!(ellipse.contains_point(&[4.0, 4.0]), Ok(false));

    let err: Error = ellipse.contains_point(&[1.0]).unwrap_err().into();
    assert!(matches!(
        err,
        Error::Query(QueryError::DimensionMismatch { expected: 2, got: 1 }),
    ));
    assert_eq!(
        err.to_string(),
        "point has 1 coordinates, but the shape has 2 dimensions",
    );
}

#[test]
fn test_ball_profile() {
    let profile = ball_profile(20).unwrap();
    assert_eq!(profile.entries.len(), 20);
    assert_eq!(profile.peak_volume_ndim, Some(5));
    assert_eq!(profile.peak_surface_area_ndim, Some(7));
}

proptest! {
    #[test]
    fn proptest_square_coverage(
        width in 1.0..20.0_f64,
        height in 1.0..20.0_f64,
        tile_size in 0.5..3.0_f64,
    ) {
        let spec = TilingSpec::Square { tile_size };
        let request = TilingRequest::new(Region::new(width, height), spec);
        let pattern = generate_tiling(&request, &Limits::default()).unwrap();
        let analysis = analyze(&pattern);
        prop_assert!((analysis.coverage_efficiency - 1.0).abs() < 1e-6);
        prop_assert!(analysis.coordination_number <= 4.0);
    }

    #[test]
    fn proptest_voronoi_partitions_region(
        count in 1..60_usize,
        seed: u64,
        x0 in -50.0..50.0_f64,
        y0 in -50.0..50.0_f64,
        width in 0.5..30.0_f64,
        height in 0.5..30.0_f64,
    ) {
        let region = Region::from_corners([x0, y0], [x0 + width, y0 + height]);
        let spec = TilingSpec::Voronoi { seeds: SeedSource::Random { count, seed } };
        let request = TilingRequest::new(region, spec);
        let pattern = generate_tiling(&request, &Limits::default()).unwrap();
        prop_assert_eq!(pattern.tiles().len(), count);

        let total: Float = pattern.tiles().iter().map(Tile::area).sum();
        prop_assert!((total - region.area()).abs() < 1e-6);
        for tile in pattern.tiles() {
            for &n in &tile.neighbors {
                prop_assert!(pattern.tiles()[n].neighbors.contains(&tile.id));
            }
        }
    }
}
