use glam::{Mat4, Quat, Vec3};
use globe_common::CoordinateRecord;

use crate::render::geometry::project;

pub const COLUMN_HEIGHT: f32 = 5.0;
pub const COLUMN_RADIUS: f32 = 0.03;
pub const COLUMN_RADIAL_SEGMENTS: u32 = 8;
pub const COLUMN_ALPHA: f32 = 0.8;

/// A column standing on the globe surface, expressed in the globe's local space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Marker {
    pub record: CoordinateRecord,
    pub anchor: Vec3,
    pub normal: Vec3,
    pub orientation: Quat,
}

impl Marker {
    pub fn new(record: CoordinateRecord, radius: f32) -> Self {
        let (anchor, normal) = project(record.latitude, record.longitude, radius);
        // Column geometry points up the Y axis
        let orientation = Quat::from_rotation_arc(Vec3::Y, normal);

        Self {
            record,
            anchor,
            normal,
            orientation,
        }
    }

    /// Rotation is applied before the translation to the anchor point.
    pub fn local_transform(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.anchor)
    }

    pub fn tip(&self) -> Vec3 {
        self.local_transform()
            .transform_point3(Vec3::new(0.0, COLUMN_HEIGHT, 0.0))
    }
}

pub fn build_markers(records: &[CoordinateRecord], radius: f32) -> Vec<Marker> {
    records
        .iter()
        .map(|record| Marker::new(*record, radius))
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rstest::rstest;

    use super::*;
    use crate::data::globe::GLOBE_RADIUS;

    fn record(latitude: f32, longitude: f32) -> CoordinateRecord {
        CoordinateRecord::new(latitude, longitude).unwrap()
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(90.0, 0.0)]
    #[case(-90.0, 0.0)]
    #[case(49.35, 20.21)]
    #[case(-33.86, 151.2)]
    #[case(12.0, -180.0)]
    fn column_stands_on_surface_along_normal(#[case] latitude: f32, #[case] longitude: f32) {
        let marker = Marker::new(record(latitude, longitude), GLOBE_RADIUS);

        let base = marker.local_transform().transform_point3(Vec3::ZERO);
        assert_relative_eq!(base, marker.anchor, epsilon = 1e-5);
        assert_relative_eq!(base.length(), GLOBE_RADIUS, epsilon = 1e-4);

        assert_relative_eq!(
            marker.tip(),
            marker.anchor + marker.normal * COLUMN_HEIGHT,
            epsilon = 1e-4
        );
    }

    #[test]
    fn south_pole_column_points_down() {
        let marker = Marker::new(record(-90.0, 0.0), GLOBE_RADIUS);

        assert_relative_eq!(marker.normal, Vec3::NEG_Y, epsilon = 1e-6);
        assert_relative_eq!(
            marker.tip(),
            Vec3::new(0.0, -GLOBE_RADIUS - COLUMN_HEIGHT, 0.0),
            epsilon = 1e-4
        );
    }

    #[test]
    fn one_marker_per_record_in_order() {
        let records = vec![record(0.0, 0.0), record(10.0, 20.0), record(-5.0, 170.0)];

        let markers = build_markers(&records, GLOBE_RADIUS);

        assert_eq!(markers.len(), records.len());
        markers
            .iter()
            .zip(records.iter())
            .for_each(|(marker, record)| assert_eq!(marker.record, *record));
    }

    #[test]
    fn no_records_no_markers() {
        assert!(build_markers(&[], GLOBE_RADIUS).is_empty());
    }
}
