use birdflow::measurements::Measurement;
use birdflow::radars::metadata_reader::RadarSpec;
use birdflow::settings::FlowSettings;
use birdflow::time::parse_interval_start_time;
use birdflow::view::ViewBounds;
use birdflow::AltitudeBand;

/// Identity projection: geographic degrees are already view pixels.
pub fn identity_projection(lon: f64, lat: f64) -> (f64, f64) {
    (lon, lat)
}

pub fn radar_specs() -> Vec<RadarSpec> {
    vec![
        RadarSpec {
            id: "west".to_string(),
            coordinates: [0.0, 0.0],
        },
        RadarSpec {
            id: "east".to_string(),
            coordinates: [100.0, 0.0],
        },
        RadarSpec {
            id: "south".to_string(),
            coordinates: [50.0, 90.0],
        },
    ]
}

pub fn measurement(
    radar: &str,
    time: &str,
    band: AltitudeBand,
    u: Option<f64>,
    v: Option<f64>,
    density: Option<f64>,
) -> Measurement {
    Measurement {
        radar_id: radar.to_string(),
        timestamp: parse_interval_start_time(time).unwrap(),
        altitude_band: band,
        avg_u_speed: u,
        avg_v_speed: v,
        avg_bird_density: density,
    }
}

/// A view whose height equals the vector denominator, so interpolated
/// vectors pass through unscaled and assertions stay exact.
pub fn unit_scale_view() -> ViewBounds {
    ViewBounds::new(0.0, 101.0, 0.0, 1000.0, 101.0, 1000.0).unwrap()
}

pub fn small_settings() -> FlowSettings {
    FlowSettings {
        particle_count: 25,
        ..FlowSettings::default()
    }
}
