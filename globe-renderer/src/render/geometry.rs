use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use super::data::{ColumnVertex, GlobeVertex};

pub struct Mesh<V> {
    pub vertices: Vec<V>,
    pub indices: Vec<u32>,
}

/// Returns the point on a sphere of the given radius together with its outward normal.
///
/// Longitude is negated so that markers line up with the equirectangular texture
/// wrapped by [`sphere_mesh`].
pub fn project(latitude_deg: f32, longitude_deg: f32, radius: f32) -> (Vec3, Vec3) {
    let latitude = latitude_deg.to_radians();
    let longitude = (-longitude_deg).to_radians();
    let x = radius * latitude.cos() * longitude.cos();
    let y = radius * latitude.sin();
    let z = radius * latitude.cos() * longitude.sin();
    let position = Vec3::new(x, y, z);
    (position, position.normalize())
}

/// UV sphere with the poles on the Y axis. Texture `u` grows eastwards starting at
/// the antimeridian, texture `v` grows southwards starting at the north pole.
pub fn sphere_mesh(radius: f32, width_segments: u32, height_segments: u32) -> Mesh<GlobeVertex> {
    let row_len = width_segments + 1;

    let vertices = (0..=height_segments)
        .flat_map(|iy| {
            let v = iy as f32 / height_segments as f32;
            // Pole rows are a single point; centre their texels on the triangle fan
            let u_offset = if iy == 0 {
                0.5 / width_segments as f32
            } else if iy == height_segments {
                -0.5 / width_segments as f32
            } else {
                0.0
            };

            (0..=width_segments).map(move |ix| {
                let u = ix as f32 / width_segments as f32;
                let (phi, theta) = (u * TAU, v * PI);
                let position = Vec3::new(
                    -radius * phi.cos() * theta.sin(),
                    radius * theta.cos(),
                    radius * phi.sin() * theta.sin(),
                );
                GlobeVertex::new(position, Vec2::new(u + u_offset, v))
            })
        })
        .collect::<Vec<_>>();

    let indices = (0..height_segments)
        .flat_map(|iy| {
            (0..width_segments).flat_map(move |ix| {
                let a = iy * row_len + ix + 1;
                let b = iy * row_len + ix;
                let c = (iy + 1) * row_len + ix;
                let d = (iy + 1) * row_len + ix + 1;

                let mut triangles = Vec::with_capacity(6);
                if iy != 0 {
                    triangles.extend([a, b, d]);
                }
                if iy != height_segments - 1 {
                    triangles.extend([b, c, d]);
                }
                triangles
            })
        })
        .collect::<Vec<_>>();

    Mesh { vertices, indices }
}

/// Closed cylinder along the Y axis with its base at the origin and its top at `height`.
pub fn column_mesh(radius: f32, height: f32, radial_segments: u32) -> Mesh<ColumnVertex> {
    let half_height = 0.5 * height;
    let ring = |y: f32| {
        (0..=radial_segments).map(move |x| {
            let theta = x as f32 / radial_segments as f32 * TAU;
            Vec3::new(radius * theta.sin(), y, radius * theta.cos())
        })
    };

    let mut positions: Vec<Vec3> = ring(half_height).chain(ring(-half_height)).collect();
    let mut indices = vec![];

    let row_len = radial_segments + 1;
    for x in 0..radial_segments {
        let a = x;
        let b = row_len + x;
        let c = row_len + x + 1;
        let d = x + 1;
        indices.extend([a, b, d, b, c, d]);
    }

    for y in [half_height, -half_height] {
        let centre = positions.len() as u32;
        positions.push(Vec3::new(0.0, y, 0.0));
        positions.extend(ring(y));
        for x in 0..radial_segments {
            indices.extend([centre, centre + 1 + x, centre + 2 + x]);
        }
    }

    // Shift so the column grows from its base instead of its centre
    let vertices = positions
        .into_iter()
        .map(|position| ColumnVertex::new(position + Vec3::new(0.0, half_height, 0.0)))
        .collect();

    Mesh { vertices, indices }
}
