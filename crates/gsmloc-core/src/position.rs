use crate::types::{Accuracy, AccuracyLevel, PositionField, PositionFields, PositionResult};

/// Builds a [`PositionResult`] from whatever coordinates a lookup produced.
///
/// Every coordinate that is `Some` sets its own flag. Accuracy is
/// [`AccuracyLevel::None`] when nothing was found and a fixed
/// [`AccuracyLevel::PostalCode`] otherwise; a cell lookup says nothing finer
/// about its own precision.
#[must_use]
pub fn synthesize(
    timestamp: i64,
    latitude: Option<f64>,
    longitude: Option<f64>,
    altitude: Option<f64>,
) -> PositionResult {
    let fields: PositionFields = [
        (PositionField::Latitude, latitude),
        (PositionField::Longitude, longitude),
        (PositionField::Altitude, altitude),
    ]
    .into_iter()
    .filter_map(|(field, value)| value.map(|_| field))
    .collect();

    let level = if fields.is_empty() {
        AccuracyLevel::None
    } else {
        AccuracyLevel::PostalCode
    };

    PositionResult {
        timestamp,
        fields,
        latitude,
        longitude,
        altitude,
        accuracy: Accuracy::new(level, 0.0, 0.0),
    }
}
