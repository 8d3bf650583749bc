mod common;

use std::time::Duration;

use approx::assert_relative_eq;
use birdflow::field::{is_nil, BatchStatus, InterpolationBatch};
use birdflow::{BirdFlow, FieldSample, FlowSettings, ViewBounds};
use nalgebra::Vector3;

use common::{identity_projection, measurement, radar_specs, small_settings, unit_scale_view};

const T0: &str = "2013-04-05 10:00:00+00";
const T1: &str = "2013-04-05 10:20:00+00";
const T2: &str = "2013-04-05 10:40:00+00";

fn assembled_engine() -> BirdFlow {
    let rows = vec![
        // t0: strong eastward flow at the west radar, still air in the east
        measurement("west", T0, 1, Some(10.0), Some(0.0), Some(5.0)),
        measurement("east", T0, 1, Some(0.0), Some(0.0), Some(1.0)),
        // t1: everything drifts north (upwards on screen after negation)
        measurement("west", T1, 1, Some(0.0), Some(4.0), Some(2.0)),
        measurement("east", T1, 1, Some(0.0), Some(4.0), Some(2.0)),
        // t2 exists only for altitude band 2
        measurement("south", T2, 2, Some(1.0), Some(1.0), None),
    ];
    BirdFlow::assemble_seeded(
        rows,
        &radar_specs(),
        &identity_projection,
        unit_scale_view(),
        small_settings(),
        42,
    )
    .unwrap()
}

#[test]
fn test_engine_assembles_at_range_start() {
    let engine = assembled_engine();
    assert_eq!(engine.cursor().current(), engine.cursor().min());
    assert_eq!(engine.cursor().band(), 1);
    assert_eq!(engine.index().timestamps().len(), 3);
    assert_eq!(engine.radars().len(), 3);
}

#[test]
fn test_first_tick_commits_the_initial_field() {
    let mut engine = assembled_engine();
    assert!(engine.interpolation_pending());
    engine.tick();
    assert!(!engine.interpolation_pending());

    // midpoint of the two equidistant radars: the weighted average of
    // (10, 0, 5) and (0, 0, 1)
    let v = engine.sample(50.0, 0.0);
    assert_relative_eq!(v.x, 5.0, epsilon = 1e-9);
    assert_relative_eq!(v.z, 3.0, epsilon = 1e-9);
}

#[test]
fn test_out_of_view_sampling_yields_the_undefined_vector() {
    let mut engine = assembled_engine();
    engine.tick();
    assert!(is_nil(&engine.sample(-5.0, 10.0)));
    assert!(is_nil(&engine.sample(2000.0, 10.0)));
    assert!(is_nil(&engine.sample(f64::NAN, 10.0)));
}

#[test]
fn test_navigation_recomputes_the_field() {
    let mut engine = assembled_engine();
    engine.tick();
    let before = engine.sample(50.0, 0.0);

    engine.next();
    assert!(engine.interpolation_pending());
    engine.tick();
    let after = engine.sample(50.0, 0.0);

    // t1 has pure northward flow: u goes to zero, v negates to -4
    assert_relative_eq!(before.x, 5.0, epsilon = 1e-9);
    assert_relative_eq!(after.x, 0.0, epsilon = 1e-9);
    assert_relative_eq!(after.y, -4.0, epsilon = 1e-9);
}

#[test]
fn test_altitude_switch_to_empty_slice_gives_undefined_field() {
    let mut engine = assembled_engine();
    engine.tick();
    assert!(!engine.field().is_undefined());

    // band 2 has no rows at t0
    engine.set_altitude(2);
    engine.tick();
    assert!(engine.field().is_undefined());
    assert!(is_nil(&engine.sample(50.0, 50.0)));
}

#[test]
fn test_advance_wraps_and_retreat_clamps() {
    let mut engine = assembled_engine();
    let min = engine.cursor().min();
    let max = engine.cursor().max();

    engine.next();
    engine.next();
    assert_eq!(engine.cursor().current(), max);
    engine.next();
    assert_eq!(engine.cursor().current(), min);

    engine.previous();
    assert_eq!(engine.cursor().current(), min);
}

#[test]
fn test_particles_respawn_inside_the_view() {
    let mut engine = assembled_engine();
    let max_age = engine.settings().max_particle_age;
    let count = engine.settings().particle_count;
    for _ in 0..(max_age * 3) {
        engine.tick();
        engine.commit_particles();
    }
    let view = *engine.view();
    let particles = engine.tick();
    assert_eq!(particles.len(), count);
    for p in particles {
        assert!(p.age <= max_age);
    }
    // respawns land inside the view, so live young particles exist there
    assert!(particles
        .iter()
        .any(|p| p.x >= view.min_x && p.x < view.max_x));
}

#[test]
fn test_superseded_batch_never_overwrites_newer_request() {
    // a wide view so one zero-budget slice cannot finish the batch
    let view = ViewBounds::new(0.0, 400.0, 0.0, 1000.0, 400.0, 1000.0).unwrap();
    let samples = |u: f64| {
        vec![
            FieldSample {
                x: 10.0,
                y: 10.0,
                vector: Vector3::new(u, 0.0, 1.0),
            },
            FieldSample {
                x: 390.0,
                y: 10.0,
                vector: Vector3::new(u, 0.0, 1.0),
            },
        ]
    };

    let mut stale = InterpolationBatch::new(1, samples(111.0), &view, 1000.0);
    assert!(matches!(
        stale.run_slice(Duration::ZERO),
        BatchStatus::Yielded
    ));

    // a newer request supersedes generation 1; its batch runs to completion
    let fresh = InterpolationBatch::new(2, samples(7.0), &view, 1000.0);
    let committed = fresh.run_to_completion(Duration::from_millis(50), Duration::ZERO);

    // the stale batch is identified by its token and dropped unfinished
    assert_eq!(stale.generation(), 1);
    assert!(stale.progress() < 1.0 || committed.sample(200.0, 10.0).x != 111.0);
    assert_relative_eq!(committed.sample(10.0, 10.0).x, 7.0, epsilon = 1e-9);
}

#[test]
fn test_no_torn_grid_while_batch_in_flight() {
    let rows = vec![
        measurement("west", T0, 1, Some(10.0), Some(0.0), Some(5.0)),
        measurement("east", T0, 1, Some(0.0), Some(0.0), Some(1.0)),
    ];
    let mut engine = BirdFlow::assemble_seeded(
        rows,
        &radar_specs(),
        &identity_projection,
        unit_scale_view(),
        small_settings(),
        7,
    )
    .unwrap();

    // before any tick the initial batch is pending: the exposed field is the
    // all-undefined placeholder, not a partial grid
    assert!(engine.interpolation_pending());
    assert!(engine.field().is_undefined());
    assert!(is_nil(&engine.sample(50.0, 0.0)));

    engine.tick();
    assert!(!engine.field().is_undefined());
}

#[test]
fn test_settings_tuning_flows_through() {
    let rows = vec![measurement("west", T0, 1, Some(1.0), Some(0.0), None)];
    let settings = FlowSettings {
        particle_count: 7,
        max_particle_age: 10,
        ..FlowSettings::default()
    };
    let mut engine = BirdFlow::assemble_seeded(
        rows,
        &radar_specs(),
        &identity_projection,
        unit_scale_view(),
        settings,
        11,
    )
    .unwrap();
    assert_eq!(engine.tick().len(), 7);
}
