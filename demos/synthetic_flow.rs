use birdflow::birdflow::BirdFlow;
use birdflow::birdflow_errors::BirdFlowError;
use birdflow::measurements::Measurement;
use birdflow::radars::metadata_reader::RadarSpec;
use birdflow::settings::FlowSettings;
use birdflow::time::parse_interval_start_time;
use birdflow::view::ViewBounds;

/// Minimal driver: build a small synthetic dataset, assemble the engine and
/// run a handful of animation frames, printing where the flow carries a few
/// probe particles.
///
/// Usage:
///   synthetic_flow [frames]
fn main() -> Result<(), BirdFlowError> {
    let frames: u32 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(30);

    let radars = vec![
        RadarSpec {
            id: "NW".to_string(),
            coordinates: [1.0, 1.0],
        },
        RadarSpec {
            id: "NE".to_string(),
            coordinates: [8.0, 1.0],
        },
        RadarSpec {
            id: "S".to_string(),
            coordinates: [4.5, 6.0],
        },
    ];

    // two time frames of south-westerly migration, strongest in the north
    let mut rows = Vec::new();
    for (time, strength) in [
        ("2013-04-05 10:00:00+00", 8.0),
        ("2013-04-05 10:20:00+00", 5.0),
    ] {
        for (radar, factor) in [("NW", 1.0), ("NE", 0.8), ("S", 0.4)] {
            rows.push(Measurement {
                radar_id: radar.to_string(),
                timestamp: parse_interval_start_time(time)?,
                altitude_band: 1,
                avg_u_speed: Some(strength * factor),
                avg_v_speed: Some(strength * factor * 0.5),
                avg_bird_density: Some(10.0 * factor),
            });
        }
    }

    // project the ~[0,9]x[0,7] degree box onto a 900x700 pixel view
    let view = ViewBounds::from_extent(900.0, 700.0)?;
    let project = |lon: f64, lat: f64| (lon * 100.0, lat * 100.0);

    let settings = FlowSettings {
        particle_count: 200,
        ..FlowSettings::default()
    };
    let mut engine = BirdFlow::assemble(rows, &radars, &project, view, settings)?;

    for frame in 0..frames {
        let particles = engine.tick();
        if frame % 10 == 0 {
            let probe = &particles[0];
            println!(
                "frame {frame:3}: particle age {:2} at ({:7.2}, {:7.2}) -> ({:7.2}, {:7.2})",
                probe.age, probe.x, probe.y, probe.xt, probe.yt
            );
        }
        engine.commit_particles();

        // hop to the second time frame halfway through
        if frame == frames / 2 {
            engine.next();
            println!(
                "time advanced to {}",
                birdflow::time::format_interval_start_time(engine.cursor().current())
            );
        }
    }

    let center = engine.sample(450.0, 350.0);
    println!(
        "field at view center: u {:.3} v {:.3} density {:.3}",
        center.x, center.y, center.z
    );
    Ok(())
}
