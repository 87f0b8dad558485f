use super::*;

fn canvas() -> Canvas {
    Canvas {
        width: 1080,
        height: 1920,
    }
}

#[test]
fn coord_parse_accepts_pixels_and_percent() {
    assert_eq!("108".parse::<Coord>().unwrap(), Coord::Px(108.0));
    assert_eq!(" 10% ".parse::<Coord>().unwrap(), Coord::Percent(10.0));
    assert_eq!("12.5%".parse::<Coord>().unwrap(), Coord::Percent(12.5));
    assert!("abc".parse::<Coord>().is_err());
    assert!("%".parse::<Coord>().is_err());
}

#[test]
fn percent_resolves_against_axis_extent() {
    let (x, y) = Position::parse("10%", "20%").unwrap().resolve(canvas());
    assert_eq!((x, y), (108, 384));
    assert_eq!(Coord::Percent(33.3).resolve(1080), 359);
}

#[test]
fn place_clamps_y_but_not_x() {
    let c = canvas();
    let (x, y) = place(Position::px(-50.0, 1900.0), 100, c);
    assert_eq!(x, -50);
    assert_eq!(y, 1820);

    let (_, y) = place(Position::px(0.0, -30.0), 100, c);
    assert_eq!(y, 0);
}

#[test]
fn taller_than_canvas_pins_to_top() {
    assert_eq!(clamp_y(500, 2500, canvas()), 0);
}

#[test]
fn center_over_image() {
    let img = ImagePlacement {
        x: 100,
        y: 200,
        width: 400,
        height: 300,
    };
    assert_eq!(center_over(img, 200, 100, canvas()), (200, 300));
}

#[test]
fn width_only_size_preserves_aspect() {
    let c = canvas();
    let (w, h) = SizeSpec::Width(Coord::Percent(50.0)).resolve(c, 200, 100).unwrap();
    assert_eq!((w, h), (540, 270));

    let exact = SizeSpec::Exact {
        width: Coord::Px(64.0),
        height: Coord::Percent(10.0),
    };
    assert_eq!(exact.resolve(c, 1, 1).unwrap(), (64, 192));
}

#[test]
fn non_positive_size_is_rejected() {
    let err = SizeSpec::Width(Coord::Px(0.0)).resolve(canvas(), 10, 10).unwrap_err();
    assert!(matches!(err, PromoError::Validation(_)));
}

#[test]
fn coord_serde_accepts_number_or_percent_string() {
    let p: Position = serde_json::from_str(r#"{"x": 12, "y": "40%"}"#).unwrap();
    assert_eq!(p, Position {
        x: Coord::Px(12.0),
        y: Coord::Percent(40.0)
    });
}
