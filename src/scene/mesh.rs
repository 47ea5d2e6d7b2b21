use std::f32::consts::{PI, TAU};

use glam::{Mat3, Mat4, Vec3};

/// Interleaved vertex as uploaded to the GPU.
///
/// WGSL layout: `position: vec3<f32>` @0, `normal: vec3<f32>` @12,
/// `uv: vec2<f32>` @24; stride 32 bytes.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Object-space unit normal.
    pub normal: [f32; 3],
    /// Texture coordinate.
    pub uv: [f32; 2],
}

/// Indexed triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertices.
    pub vertices: Vec<MeshVertex>,
    /// Triangle indices, three per face, counter-clockwise.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Mesh from separate attribute streams. Missing normals are computed
    /// from faces, missing UVs are zero.
    #[must_use]
    pub fn from_attributes(
        positions: &[[f32; 3]],
        normals: Option<&[[f32; 3]]>,
        uvs: Option<&[[f32; 2]]>,
        indices: Option<Vec<u32>>,
    ) -> Self {
        let indices =
            indices.unwrap_or_else(|| (0..positions.len() as u32).collect());
        let computed;
        let normals = match normals {
            Some(n) if n.len() == positions.len() => n,
            _ => {
                computed = face_normals(positions, &indices);
                &computed[..]
            }
        };
        let vertices = positions
            .iter()
            .enumerate()
            .map(|(i, &position)| MeshVertex {
                position,
                normal: normals[i],
                uv: uvs.and_then(|uv| uv.get(i)).copied().unwrap_or([0.0; 2]),
            })
            .collect();
        Self { vertices, indices }
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty() || self.vertices.is_empty()
    }

    /// Axis-aligned bounds after applying `transform`.
    #[must_use]
    pub fn bounds(&self, transform: Mat4) -> Option<Bounds> {
        Bounds::from_points(
            self.vertices
                .iter()
                .map(|v| transform.transform_point3(Vec3::from(v.position))),
        )
    }

    /// Bake `transform` into positions and normals.
    #[must_use]
    pub fn transformed(mut self, transform: Mat4) -> Self {
        let normal_matrix = Mat3::from_mat4(transform).inverse().transpose();
        for v in &mut self.vertices {
            v.position = transform.transform_point3(Vec3::from(v.position)).into();
            v.normal = (normal_matrix * Vec3::from(v.normal))
                .normalize_or_zero()
                .into();
        }
        self
    }

    /// Cube centered on the origin with edge length `size`, one quad per
    /// face so normals stay flat.
    #[must_use]
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        let faces: [(Vec3, Vec3, Vec3); 6] = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];

        let mut mesh = Self::default();
        for (normal, u, v) in faces {
            let base = mesh.vertices.len() as u32;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let p = (normal + u * su + v * sv) * h;
                mesh.vertices.push(MeshVertex {
                    position: p.into(),
                    normal: normal.into(),
                    uv: [(su + 1.0) / 2.0, (1.0 - sv) / 2.0],
                });
            }
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        mesh
    }

    /// UV sphere of `radius` with `segments` around and `rings` from pole
    /// to pole.
    #[must_use]
    pub fn sphere(radius: f32, segments: u32, rings: u32) -> Self {
        let segments = segments.max(3);
        let rings = rings.max(2);
        let mut mesh = Self::default();

        for ring in 0..=rings {
            let v = ring as f32 / rings as f32;
            let phi = v * PI;
            for segment in 0..=segments {
                let u = segment as f32 / segments as f32;
                let theta = u * TAU;
                let normal = Vec3::new(
                    -theta.cos() * phi.sin(),
                    phi.cos(),
                    theta.sin() * phi.sin(),
                );
                mesh.vertices.push(MeshVertex {
                    position: (normal * radius).into(),
                    normal: normal.into(),
                    uv: [u, v],
                });
            }
        }

        let stride = segments + 1;
        for ring in 0..rings {
            for segment in 0..segments {
                let a = ring * stride + segment;
                let b = a + stride;
                if ring != 0 {
                    mesh.indices.extend_from_slice(&[a + 1, a, b + 1]);
                }
                if ring != rings - 1 {
                    mesh.indices.extend_from_slice(&[a, b, b + 1]);
                }
            }
        }
        mesh
    }

    /// Unit quad in the XY plane facing +Z, centered on the origin.
    #[must_use]
    pub fn quad() -> Self {
        let corners = [
            ([-0.5, -0.5, 0.0], [0.0, 1.0]),
            ([0.5, -0.5, 0.0], [1.0, 1.0]),
            ([0.5, 0.5, 0.0], [1.0, 0.0]),
            ([-0.5, 0.5, 0.0], [0.0, 0.0]),
        ];
        Self {
            vertices: corners
                .iter()
                .map(|&(position, uv)| MeshVertex {
                    position,
                    normal: [0.0, 0.0, 1.0],
                    uv,
                })
                .collect(),
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }
}

fn face_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut accum = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let pa = Vec3::from(positions[a]);
        let n = (Vec3::from(positions[b]) - pa).cross(Vec3::from(positions[c]) - pa);
        accum[a] += n;
        accum[b] += n;
        accum[c] += n;
    }
    accum
        .into_iter()
        .map(|n| n.normalize_or(Vec3::Y).into())
        .collect()
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Bounds {
    /// Tight bounds of `points`, or `None` if there are none.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            Some(acc.map_or(Self { min: p, max: p }, |b: Self| Self {
                min: b.min.min(p),
                max: b.max.max(p),
            }))
        })
    }

    /// Smallest box containing both.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Edge lengths.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_flat_faces_and_edge_length() {
        let cube = MeshData::cube(2.0);
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.triangle_count(), 12);
        let bounds = cube.bounds(Mat4::IDENTITY).unwrap();
        assert_eq!(bounds.min, Vec3::splat(-1.0));
        assert_eq!(bounds.max, Vec3::splat(1.0));
    }

    #[test]
    fn cube_winding_faces_outward() {
        let cube = MeshData::cube(1.0);
        for tri in cube.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from(cube.vertices[i as usize].position));
            let n = (b - a).cross(c - a);
            let expected = Vec3::from(cube.vertices[tri[0] as usize].normal);
            assert!(n.dot(expected) > 0.0);
        }
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let sphere = MeshData::sphere(0.5, 16, 16);
        assert_eq!(sphere.vertices.len(), 17 * 17);
        // two triangles per quad minus one at each pole row
        assert_eq!(sphere.triangle_count(), 16 * 16 * 2 - 2 * 16);
        for v in &sphere.vertices {
            assert!((Vec3::from(v.position).length() - 0.5).abs() < 1e-5);
        }
    }

    #[test]
    fn missing_normals_are_computed() {
        let mesh = MeshData::from_attributes(
            &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            None,
            None,
            None,
        );
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        for v in &mesh.vertices {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn bounds_union_and_center() {
        let a = Bounds::from_points([Vec3::ZERO, Vec3::ONE]).unwrap();
        let b = Bounds::from_points([Vec3::splat(-3.0)]).unwrap();
        let u = a.union(b);
        assert_eq!(u.center(), Vec3::splat(-1.0));
        assert_eq!(u.size(), Vec3::splat(4.0));
        assert!(Bounds::from_points(std::iter::empty()).is_none());
    }
}
