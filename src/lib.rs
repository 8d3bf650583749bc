pub mod birdflow;
pub mod birdflow_errors;
pub mod constants;
pub mod field;
pub mod measurements;
pub mod particles;
pub mod radars;
pub mod settings;
pub mod time;
pub mod time_cursor;
pub mod view;

pub use birdflow::BirdFlow;
pub use birdflow_errors::BirdFlowError;
pub use constants::{AltitudeBand, Pixel, RadarId};
pub use field::{FieldGrid, FieldSample, IdwInterpolator, InterpolationBatch};
pub use measurements::index::{MeasurementIndex, TimeIndex};
pub use measurements::Measurement;
pub use particles::{Particle, ParticleSystem};
pub use radars::{Projection, RadarSite, Radars};
pub use settings::FlowSettings;
pub use time_cursor::TimeCursor;
pub use view::ViewBounds;
