use serde::de::Error;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

pub const MAX_LATITUDE: f32 = 90.0;
pub const MAX_LONGITUDE: f32 = 180.0;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CoordinateError {
    #[error("Coordinate value is not a finite number")]
    NotFinite,
    #[error("Latitude {0} is outside of [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("Longitude {0} is outside of [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// A single marker location, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize)]
pub struct CoordinateRecord {
    #[serde(deserialize_with = "latitude_from_number")]
    pub latitude: f32,
    #[serde(deserialize_with = "longitude_from_number")]
    pub longitude: f32,
}

impl CoordinateRecord {
    pub fn new(latitude: f32, longitude: f32) -> Result<Self, CoordinateError> {
        Ok(Self {
            latitude: validate_latitude(latitude as f64)?,
            longitude: validate_longitude(longitude as f64)?,
        })
    }
}

impl std::fmt::Display for CoordinateRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

pub fn validate_latitude(value: f64) -> Result<f32, CoordinateError> {
    validate_degrees(value, MAX_LATITUDE).ok_or(if value.is_finite() {
        CoordinateError::LatitudeOutOfRange(value)
    } else {
        CoordinateError::NotFinite
    })
}

pub fn validate_longitude(value: f64) -> Result<f32, CoordinateError> {
    validate_degrees(value, MAX_LONGITUDE).ok_or(if value.is_finite() {
        CoordinateError::LongitudeOutOfRange(value)
    } else {
        CoordinateError::NotFinite
    })
}

fn validate_degrees(value: f64, limit: f32) -> Option<f32> {
    (value.is_finite() && value.abs() <= limit as f64).then_some(value as f32)
}

fn latitude_from_number<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    validate_latitude(f64::deserialize(deserializer)?).map_err(D::Error::custom)
}

fn longitude_from_number<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    validate_longitude(f64::deserialize(deserializer)?).map_err(D::Error::custom)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn deserialize_coordinate_list() {
        let json = r#"[
            {"latitude": 49.35, "longitude": 20.21},
            {"latitude": -33.86, "longitude": 151.2, "name": "ignored"}
        ]"#;
        let records: Vec<CoordinateRecord> = serde_json::from_str(json).unwrap();

        assert_eq!(
            records,
            vec![
                CoordinateRecord {
                    latitude: 49.35,
                    longitude: 20.21,
                },
                CoordinateRecord {
                    latitude: -33.86,
                    longitude: 151.2,
                },
            ]
        );
    }

    #[test]
    fn integers_are_accepted() {
        let record: CoordinateRecord =
            serde_json::from_str(r#"{"latitude": 0, "longitude": -180}"#).unwrap();

        assert_eq!(record, CoordinateRecord::new(0.0, -180.0).unwrap());
    }

    #[rstest]
    #[case(r#"{"latitude": 91.0, "longitude": 0.0}"#)]
    #[case(r#"{"latitude": 0.0, "longitude": 180.5}"#)]
    #[case(r#"{"latitude": "12", "longitude": 0.0}"#)]
    #[case(r#"{"latitude": null, "longitude": 0.0}"#)]
    #[case(r#"{"longitude": 0.0}"#)]
    fn malformed_records_are_rejected(#[case] json: &str) {
        assert!(serde_json::from_str::<CoordinateRecord>(json).is_err());
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert_eq!(
            CoordinateRecord::new(f32::NAN, 0.0),
            Err(CoordinateError::NotFinite)
        );
        assert_eq!(
            CoordinateRecord::new(0.0, f32::INFINITY),
            Err(CoordinateError::NotFinite)
        );
    }

    #[test]
    fn out_of_range_error_names_the_value() {
        let err = CoordinateRecord::new(-90.5, 0.0).unwrap_err();

        assert_eq!(err, CoordinateError::LatitudeOutOfRange(-90.5));
        assert_eq!(err.to_string(), "Latitude -90.5 is outside of [-90, 90]");
    }
}
