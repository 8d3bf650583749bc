use std::io::Read;

use log::{debug, warn};

use crate::birdflow_errors::BirdFlowError;
use crate::measurements::{Measurement, RawMeasurementRecord};

/// Read the aggregated measurement feed from a CSV source.
///
/// Rows whose timestamp or altitude band cannot be parsed are dropped with a
/// warning instead of failing the whole load; a feed with a handful of bad
/// rows still animates. Transport-level CSV errors are still fatal.
///
/// Argument
/// --------
/// * `reader`: CSV source with a header row naming the feed columns
///
/// Return
/// ------
/// * all usable rows, in feed order
pub fn read_measurements<R: Read>(reader: R) -> Result<Vec<Measurement>, BirdFlowError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut measurements = Vec::new();
    let mut dropped = 0usize;

    for record in csv_reader.deserialize::<RawMeasurementRecord>() {
        let record = record?;
        match Measurement::from_record(&record) {
            Ok(measurement) => measurements.push(measurement),
            Err(err) => {
                warn!(
                    "dropping measurement row for radar {}: {err}",
                    record.radar_id
                );
                dropped += 1;
            }
        }
    }

    debug!(
        "measurement feed read: {} rows kept, {dropped} dropped",
        measurements.len()
    );
    Ok(measurements)
}

#[cfg(test)]
mod csv_reader_test {
    use super::*;

    const HEADER: &str =
        "radar_id,interval_start_time,altitude_band,avg_u_speed,avg_v_speed,avg_bird_density\n";

    #[test]
    fn test_read_feed() {
        let feed = format!(
            "{HEADER}\
             6234,2013-04-05 10:20:00+00,1,3.4,-1.2,12.5\n\
             6260,2013-04-05 10:20:00+00,2,-0.5,0.9,4.0\n"
        );
        let rows = read_measurements(feed.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].radar_id, "6234");
        assert_eq!(rows[1].altitude_band, 2);
    }

    #[test]
    fn test_unkeyable_rows_are_dropped_not_fatal() {
        let feed = format!(
            "{HEADER}\
             6234,not-a-time,1,3.4,-1.2,12.5\n\
             6260,2013-04-05 10:20:00+00,1,-0.5,0.9,4.0\n"
        );
        let rows = read_measurements(feed.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].radar_id, "6260");
    }

    #[test]
    fn test_blank_numerics_survive() {
        let feed = format!(
            "{HEADER}\
             6234,2013-04-05 10:20:00+00,1,,,\n"
        );
        let rows = read_measurements(feed.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].has_velocity());
        assert_eq!(rows[0].avg_bird_density, None);
    }
}
