//! 命令引擎端到端测试：按命令行的方式驱动引擎

use zdraft_command::{
    ActionType, CommandEngine, CommandError, CommandState, EditorKind, EditorPayload, TablePayload, TextPayload,
};
use zdraft_core::geometry::{Geometry, Line};
use zdraft_core::math::Point2;
use zdraft_core::settings::DraftSettings;
use zdraft_core::units::DrawingUnit;

fn engine() -> CommandEngine {
    let mut settings = DraftSettings::default();
    settings.snap.enabled = false;
    CommandEngine::new(settings)
}

fn run(engine: &mut CommandEngine, inputs: &[&str]) {
    for input in inputs {
        engine.handle_value_input(input);
    }
}

fn geometries(engine: &CommandEngine) -> Vec<Geometry> {
    engine.document().entities().map(|e| e.geometry.clone()).collect()
}

fn assert_point(actual: Point2, x: f64, y: f64) {
    assert!(
        (actual - Point2::new(x, y)).norm() < 1e-9,
        "expected ({x}, {y}), got ({}, {})",
        actual.x,
        actual.y
    );
}

#[test]
fn cancel_is_idempotent() {
    let mut engine = engine();
    run(&mut engine, &["LINE", "0,0"]);
    assert_eq!(engine.snapshot().step, 2);

    engine.cancel_command();
    let first = engine.snapshot();
    engine.cancel_command();
    assert_eq!(engine.snapshot(), first);
    assert_eq!(first.active_command, None);
    assert_eq!(first.step, 0);
    assert!(first.temp_points.is_empty());
    assert!(engine.document().is_empty());
}

#[test]
fn cancel_keeps_entities_from_earlier_iterations() {
    let mut engine = engine();
    run(&mut engine, &["L", "0,0", "10,0", "10,10"]);
    engine.cancel_command();
    assert_eq!(engine.document().len(), 2);
}

#[test]
fn line_round_trip() {
    let mut engine = engine();
    run(&mut engine, &["line", "0,0", "@10,5", ""]);

    let shapes = geometries(&engine);
    assert_eq!(shapes.len(), 1);
    match &shapes[0] {
        Geometry::Line(l) => {
            assert_point(l.start, 0.0, 0.0);
            assert_point(l.end, 10.0, 5.0);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(engine.is_idle());
}

#[test]
fn line_chain_closes_to_first_point() {
    let mut engine = engine();
    run(&mut engine, &["L", "0,0", "10,0", "10,10"]);
    let snap = engine.snapshot();
    assert_eq!(snap.step, 2);
    assert_eq!(
        snap.state,
        CommandState::Line {
            chain_start: Some(Point2::new(0.0, 0.0)),
            segments: 2
        }
    );

    run(&mut engine, &["c"]);
    let shapes = geometries(&engine);
    assert_eq!(shapes.len(), 3);
    match &shapes[2] {
        Geometry::Line(l) => {
            assert_point(l.start, 10.0, 10.0);
            assert_point(l.end, 0.0, 0.0);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(engine.is_idle());
}

#[test]
fn rectangle_corners_and_winding() {
    let mut engine = engine();
    run(&mut engine, &["REC", "2,3", "@10,5"]);
    // 第二步键入 "w,h" 按宽高解释
    run(&mut engine, &["RECT", "0,0", "30,15"]);

    let shapes = geometries(&engine);
    let expected = [
        [(2.0, 3.0), (12.0, 3.0), (12.0, 8.0), (2.0, 8.0)],
        [(0.0, 0.0), (30.0, 0.0), (30.0, 15.0), (0.0, 15.0)],
    ];
    for (shape, corners) in shapes.iter().zip(expected) {
        let Geometry::Polyline(pl) = shape else {
            panic!("expected polyline, got {shape:?}");
        };
        assert!(pl.closed);
        let points: Vec<Point2> = pl.points().collect();
        assert_eq!(points.len(), 4);
        for (p, (x, y)) in points.iter().zip(corners) {
            assert_point(*p, x, y);
        }
    }
}

#[test]
fn circle_through_three_four_five() {
    let mut engine = engine();
    run(&mut engine, &["C", "0,0", "3,4"]);
    match &geometries(&engine)[0] {
        Geometry::Circle(c) => assert!((c.radius - 5.0).abs() < 1e-9),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn degenerate_circle_is_ignored() {
    let mut engine = engine();
    run(&mut engine, &["C", "1,1", "1,1"]);
    assert_eq!(engine.snapshot().step, 2);
    assert!(engine.document().is_empty());
}

#[test]
fn unknown_command_leaves_state_unchanged() {
    let mut engine = engine();
    run(&mut engine, &["FROB"]);
    assert!(engine.is_idle());
    assert!(engine.messages().iter().any(|m| m.contains("FROB")));

    assert_eq!(
        engine.start_command_by_name("nope"),
        Err(CommandError::UnknownCommand("nope".to_string()))
    );
    assert!(engine.is_idle());
}

#[test]
fn aliases_are_case_insensitive() {
    let mut engine = engine();
    assert_eq!(engine.start_command_by_name("pl"), Ok(ActionType::DrawPolyline));
    assert_eq!(engine.start_command_by_name("Rect"), Ok(ActionType::DrawRectangle));
    assert_eq!(engine.start_command_by_name("dimradius"), Ok(ActionType::DimRadius));

    assert!(engine.registry_mut().add_alias("ww", "line"));
    assert_eq!(engine.start_command_by_name("WW"), Ok(ActionType::DrawLine));
}

#[test]
fn malformed_value_is_ignored() {
    let mut engine = engine();
    run(&mut engine, &["CIRCLE", "0,0"]);
    let before = engine.snapshot();

    run(&mut engine, &["abc,1", "@1,", "1<x"]);
    assert_eq!(engine.snapshot(), before);
    assert_eq!(engine.messages().len(), 3);
    assert!(engine.document().is_empty());
}

#[test]
fn typed_values_follow_drawing_units() {
    let mut settings = DraftSettings::default();
    settings.snap.enabled = false;
    settings.units = DrawingUnit::Centimeter;
    let mut engine = CommandEngine::new(settings);

    run(&mut engine, &["C", "1,1", "2"]);
    match &geometries(&engine)[0] {
        Geometry::Circle(c) => {
            assert_point(c.center, 10.0, 10.0);
            assert!((c.radius - 20.0).abs() < 1e-9);
        }
        other => panic!("unexpected {other:?}"),
    }

    engine.set_units(DrawingUnit::Millimeter);
    run(&mut engine, &["C", "0,0", "2"]);
    assert!(matches!(&geometries(&engine)[1], Geometry::Circle(c) if (c.radius - 2.0).abs() < 1e-9));
}

#[test]
fn length_angle_from_last_point() {
    let mut engine = engine();
    run(&mut engine, &["L", "5,5"]);
    engine.handle_length_angle(10.0, 90.0);
    run(&mut engine, &["10<180", ""]);

    let shapes = geometries(&engine);
    assert_eq!(shapes.len(), 2);
    let Geometry::Line(second) = &shapes[1] else {
        panic!("expected line");
    };
    assert_point(second.start, 5.0, 15.0);
    assert_point(second.end, -5.0, 15.0);
}

#[test]
fn snapped_click_lands_on_endpoint() {
    let mut engine = CommandEngine::default();
    engine.document_mut().add(Geometry::Line(Line::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0))));

    engine.start_command(ActionType::DrawLine);
    engine.handle_command_input(Point2::new(10.3, 0.2));
    let snap = engine.snapshot();
    assert_eq!(snap.temp_points.len(), 1);
    assert_point(snap.temp_points[0], 10.0, 0.0);
    assert!(engine.snap_marker().is_some());
}

#[test]
fn move_applies_to_whole_selection() {
    let mut engine = engine();
    run(&mut engine, &["L", "0,0", "10,0", ""]);
    run(&mut engine, &["C", "50,50", "5"]);

    run(&mut engine, &["M"]);
    engine.pick(Point2::new(5.0, 0.0));
    engine.pick(Point2::new(55.0, 50.0));
    run(&mut engine, &["", "0,0", "@0,100"]);

    let shapes = geometries(&engine);
    match (&shapes[0], &shapes[1]) {
        (Geometry::Line(l), Geometry::Circle(c)) => {
            assert_point(l.start, 0.0, 100.0);
            assert_point(c.center, 50.0, 150.0);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(engine.is_idle());
}

#[test]
fn trim_removes_middle_piece() {
    let mut engine = engine();
    run(&mut engine, &["L", "0,0", "30,0", ""]);
    run(&mut engine, &["L", "10,-10", "10,10", ""]);
    run(&mut engine, &["L", "20,-10", "20,10", ""]);

    run(&mut engine, &["TR", ""]);
    engine.pick(Point2::new(15.0, 0.0));
    assert_eq!(engine.active_command(), Some(ActionType::Trim));
    run(&mut engine, &[""]);

    let horizontal: Vec<Line> = geometries(&engine)
        .into_iter()
        .filter_map(|g| match g {
            Geometry::Line(l) if l.start.y.abs() < 1e-9 && l.end.y.abs() < 1e-9 => Some(l),
            _ => None,
        })
        .collect();
    assert_eq!(horizontal.len(), 2);
    let total: f64 = horizontal.iter().map(|l| (l.end - l.start).norm()).sum();
    assert!((total - 20.0).abs() < 1e-9);
    assert!(engine.is_idle());
}

#[test]
fn extend_reaches_boundary() {
    let mut engine = engine();
    run(&mut engine, &["L", "0,0", "5,0", ""]);
    run(&mut engine, &["L", "8,-10", "8,10", ""]);

    run(&mut engine, &["EX", ""]);
    engine.pick(Point2::new(4.0, 0.0));

    let Geometry::Line(l) = &geometries(&engine)[0] else {
        panic!("expected line");
    };
    assert_point(l.end, 8.0, 0.0);
    assert_eq!(engine.snapshot().step, 2);
}

#[test]
fn text_waits_for_editor_and_rejects_double_submit() {
    let mut engine = engine();
    run(&mut engine, &["TEXT", "3,4"]);
    assert_eq!(
        engine.pending_editor(),
        Some(&EditorKind::Text {
            position: Point2::new(3.0, 4.0)
        })
    );
    assert_eq!(
        engine.snapshot().state,
        CommandState::Text {
            position: Some(Point2::new(3.0, 4.0)),
            awaiting_editor: true
        }
    );

    // 编辑器打开时命令行输入不影响状态
    run(&mut engine, &["10,10", ""]);
    assert_eq!(engine.active_command(), Some(ActionType::Text));

    let outcome = engine.submit_text(TextPayload::new("注释")).unwrap();
    assert_eq!(outcome.created.len(), 1);
    assert!(engine.is_idle());
    assert_eq!(
        engine.submit_text(TextPayload::new("again")),
        Err(CommandError::EditorNotPending)
    );
    assert_eq!(engine.document().len(), 1);
}

#[test]
fn cancelling_text_discards_continuation() {
    let mut engine = engine();
    run(&mut engine, &["MT", "0,0"]);
    engine.cancel_command();

    assert!(engine.pending_editor().is_none());
    assert_eq!(
        engine.submit_text(TextPayload::new("late")),
        Err(CommandError::EditorNotPending)
    );
    assert!(engine.document().is_empty());
}

#[test]
fn table_payload_must_match_request() {
    let mut engine = engine();
    run(&mut engine, &["TB", "0,0"]);
    assert_eq!(
        engine.submit_text(TextPayload::new("x")),
        Err(CommandError::PayloadMismatch)
    );

    let outcome = engine
        .submit_table(TablePayload::new(2, 2).with_cells(["a", "b", "c", "d"]))
        .unwrap();
    assert_eq!(outcome.created.len(), 1);
    assert!(matches!(&geometries(&engine)[0], Geometry::Table(t) if t.rows() == 2));
}

#[test]
fn double_click_edits_existing_text() {
    let mut engine = engine();
    run(&mut engine, &["T", "0,0"]);
    engine.submit_text(TextPayload::new("hello")).unwrap();

    assert!(engine.double_click(Point2::new(0.5, 0.5)));
    assert!(matches!(engine.pending_editor(), Some(EditorKind::EditEntity { .. })));
    engine.submit_text(TextPayload::new("world")).unwrap();

    let shapes = geometries(&engine);
    assert_eq!(shapes.len(), 1);
    assert!(matches!(&shapes[0], Geometry::Text(t) if t.content == "world"));
    assert!(!engine.double_click(Point2::new(500.0, 500.0)));
}

#[test]
fn dimension_continue_chains_from_last_linear() {
    let mut engine = engine();
    run(&mut engine, &["DLI", "0,0", "10,0", "5,8"]);
    run(&mut engine, &["DCO", "25,0", "30,0", ""]);

    let measurements: Vec<f64> = geometries(&engine)
        .iter()
        .filter_map(|g| match g {
            Geometry::Dimension(d) => Some(d.measurement()),
            _ => None,
        })
        .collect();
    assert_eq!(measurements.len(), 3);
    for (m, expected) in measurements.iter().zip([10.0, 15.0, 5.0]) {
        assert!((m - expected).abs() < 1e-9);
    }
    assert_eq!(
        engine.messages(),
        ["标注文字 = 10.00", "标注文字 = 15.00", "标注文字 = 5.00"]
    );
}

#[test]
fn cancel_editor_closes_pending_command() {
    let mut engine = engine();
    run(&mut engine, &["TB", "0,0"]);
    assert!(matches!(
        engine.pending_editor_content(),
        Some(EditorPayload::Table(t)) if t.rows == 3 && t.cols == 3
    ));

    assert!(engine.cancel_editor());
    assert!(engine.is_idle());
    assert!(engine.pending_editor_content().is_none());
    assert!(!engine.cancel_editor());
}

#[test]
fn double_click_offers_current_content() {
    let mut engine = engine();
    run(&mut engine, &["T", "0,0"]);
    engine.submit_text(TextPayload::new("旧内容")).unwrap();

    assert!(engine.double_click(Point2::new(0.5, 0.5)));
    assert!(matches!(
        engine.pending_editor_content(),
        Some(EditorPayload::Text(t)) if t.text == "旧内容"
    ));
}

#[test]
fn view_scale_narrows_pick_tolerance() {
    let mut engine = engine();
    let id = engine
        .document_mut()
        .add(Geometry::Line(Line::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0))));

    // 10 像素 / 每单位 10 像素 = 1 个单位
    engine.set_view_scale(10.0);
    engine.pick(Point2::new(5.0, 5.0));
    assert!(engine.selection().is_empty());

    // 非法比例被忽略
    engine.set_view_scale(0.0);
    engine.pick(Point2::new(5.0, 0.5));
    assert!(engine.selection().contains(&id));
}

#[test]
fn mouse_move_snaps_cursor_once_per_frame() {
    let mut engine = CommandEngine::default();
    let id = engine
        .document_mut()
        .add(Geometry::Line(Line::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0))));

    engine.begin_frame();
    engine.mouse_move(Point2::new(10.3, 0.2));
    assert_point(engine.snapshot().cursor, 10.0, 0.0);
    assert_eq!(engine.hovered(), Some(id));

    // 同一帧内只更新光标，不重新计算悬停
    engine.mouse_move(Point2::new(80.0, 80.0));
    assert_point(engine.snapshot().cursor, 80.0, 80.0);
    assert_eq!(engine.hovered(), Some(id));
    assert!(engine.is_idle());
}

#[test]
fn typed_length_extends_along_last_segment() {
    let mut engine = engine();
    run(&mut engine, &["LINE", "0,0", "25"]);
    assert_eq!(
        geometries(&engine),
        vec![Geometry::Line(Line::new(Point2::new(0.0, 0.0), Point2::new(25.0, 0.0)))]
    );

    run(&mut engine, &["@0,10", "5"]);
    match &geometries(&engine)[2] {
        Geometry::Line(line) => {
            assert_point(line.start, 25.0, 10.0);
            assert_point(line.end, 25.0, 15.0);
        }
        other => panic!("expected line, got {other:?}"),
    }
    assert!(engine.messages().is_empty());
}

#[test]
fn typed_length_follows_cursor() {
    let mut engine = engine();
    run(&mut engine, &["PLINE", "0,0"]);
    engine.begin_frame();
    engine.mouse_move(Point2::new(0.0, 50.0));
    run(&mut engine, &["10", ""]);

    match geometries(&engine).as_slice() {
        [Geometry::Polyline(pl)] => {
            assert_eq!(pl.vertices.len(), 2);
            assert_point(pl.vertices[1].point, 0.0, 10.0);
        }
        other => panic!("expected one polyline, got {other:?}"),
    }
}

#[test]
fn value_at_point_step_is_reported() {
    let mut engine = engine();
    run(&mut engine, &["LINE", "5"]);
    assert_eq!(engine.snapshot().step, 1);
    assert!(engine.document().is_empty());
    assert_eq!(engine.messages().len(), 1);
    assert!(engine.messages()[0].contains('5'));
}

#[test]
fn snapshot_lists_step_keywords() {
    let mut engine = engine();
    assert!(engine.snapshot().keywords.is_empty());

    run(&mut engine, &["LINE", "0,0", "@10,0"]);
    assert!(engine.snapshot().keywords.is_empty());
    run(&mut engine, &["@0,10"]);
    assert_eq!(engine.snapshot().keywords, vec!["close"]);

    run(&mut engine, &["zzz"]);
    let message = engine.messages().last().unwrap();
    assert!(message.contains("ZZZ") && message.contains("close"), "{message}");
}

#[test]
fn typed_major_axis_runs_along_x() {
    let mut engine = engine();
    run(&mut engine, &["EL", "5,5", "10", "3"]);
    match geometries(&engine).as_slice() {
        [Geometry::Ellipse(e)] => {
            assert_point(e.center, 5.0, 5.0);
            assert!((e.radius_x - 10.0).abs() < 1e-9);
            assert!((e.radius_y - 3.0).abs() < 1e-9);
            assert!(e.rotation.abs() < 1e-9);
        }
        other => panic!("expected one ellipse, got {other:?}"),
    }
}
