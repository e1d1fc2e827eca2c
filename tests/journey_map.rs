use journeymap::{Journey, MapView, Mode, plan};

#[test]
fn toggle_round_trip_restores_mode_and_output() {
    let journey = Journey::sample();
    let mut view = MapView::new(Mode::Horizontal);
    let before = journey.render_svg(view.mode(), "white").unwrap();

    assert_eq!(view.toggle_mode(), Mode::Vertical);
    assert_eq!(view.toggle_mode(), Mode::Horizontal);

    let after = journey.render_svg(view.mode(), "white").unwrap();
    assert_eq!(before, after);
}

#[test]
fn toggling_only_touches_the_mode_flag() {
    let journey = Journey::sample();
    let snapshot = journey.to_json().unwrap();

    let mut view = MapView::new(Mode::Vertical);
    view.toggle_mode();
    journey.render_svg(view.mode(), "white").unwrap();

    assert_eq!(journey.to_json().unwrap(), snapshot);
}

#[test]
fn json_input_renders_the_same_as_in_memory_data() {
    let journey = Journey::sample();
    let reloaded = Journey::from_json(&journey.to_json().unwrap()).unwrap();

    for mode in [Mode::Horizontal, Mode::Vertical] {
        assert_eq!(plan(&journey, mode), plan(&reloaded, mode));
        assert_eq!(
            journey.render_svg(mode, "white").unwrap(),
            reloaded.render_svg(mode, "white").unwrap()
        );
    }
}

#[test]
fn transposed_modes_share_structure_for_equivalent_input() {
    let journey = Journey::sample();
    let horizontal = plan(&journey, Mode::Horizontal);
    let vertical = plan(&journey, Mode::Vertical);

    assert_eq!(horizontal.stages.len(), vertical.stages.len());
    assert_eq!(
        horizontal.axis_segments.len(),
        vertical.axis_segments.len()
    );
    for (h, v) in horizontal.stages.iter().zip(&vertical.stages) {
        assert_eq!(h.side, v.side);
        assert_eq!(h.touchpoints.len(), v.touchpoints.len());
        assert_eq!(h.compaction == 0.0, v.compaction == 0.0);
    }

    let h_canvas = horizontal.canvas();
    let v_canvas = vertical.canvas();
    assert!(h_canvas.width > h_canvas.height);
    assert!(v_canvas.height > v_canvas.width);
}
