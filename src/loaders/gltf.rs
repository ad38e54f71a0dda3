use std::path::{Path, PathBuf};

use glam::{Mat4, Vec3};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to load glTF file {path}: {source}")]
    Import {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },

    #[error("no mesh positions found in {0}")]
    NoGeometry(PathBuf),
}

/// Load every mesh vertex of a glTF file as a world-space point,
/// keeping at most `max_points`
pub fn load_points(path: impl AsRef<Path>, max_points: usize) -> Result<Vec<Vec3>, LoadError> {
    let path = path.as_ref();
    log::info!("Loading glTF file: {}", path.display());

    let (document, buffers, _images) = gltf::import(path).map_err(|source| LoadError::Import {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!(
        "glTF loaded: {} scenes, {} nodes, {} meshes",
        document.scenes().count(),
        document.nodes().count(),
        document.meshes().count()
    );

    let mut points = Vec::new();
    for scene in document.scenes() {
        for node in scene.nodes() {
            collect_node(&node, &buffers, Mat4::IDENTITY, &mut points);
        }
    }

    if points.is_empty() {
        return Err(LoadError::NoGeometry(path.to_path_buf()));
    }

    let total = points.len();
    let points = subsample(points, max_points);
    log::info!("Extracted {} of {} vertices", points.len(), total);
    Ok(points)
}

/// Walk the node tree, flattening transforms into the positions
fn collect_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    parent_transform: Mat4,
    points: &mut Vec<Vec3>,
) {
    let global_transform =
        parent_transform * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| &data[..]));
            match reader.read_positions() {
                Some(positions) => points.extend(
                    positions.map(|p| global_transform.transform_point3(Vec3::from_array(p))),
                ),
                None => log::warn!("Mesh {:?} primitive has no positions", mesh.name()),
            }
        }
    }

    for child in node.children() {
        collect_node(&child, buffers, global_transform, points);
    }
}

/// Keep every n-th point so at most `max_points` remain
pub fn subsample(points: Vec<Vec3>, max_points: usize) -> Vec<Vec3> {
    if max_points == 0 {
        return Vec::new();
    }
    if points.len() <= max_points {
        return points;
    }
    let stride = points.len().div_ceil(max_points);
    points.into_iter().step_by(stride).collect()
}

/// Axis-aligned bounds, `None` for an empty slice
pub fn bounds(points: &[Vec3]) -> Option<(Vec3, Vec3)> {
    let first = *points.first()?;
    Some(
        points
            .iter()
            .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))),
    )
}

/// Center on x/z, rest the lowest point on y = 0 and scale uniformly to `height`
pub fn normalize_to_height(points: &mut [Vec3], height: f32) {
    let Some((min, max)) = bounds(points) else {
        return;
    };
    let extent = max.y - min.y;
    let scale = if extent > f32::EPSILON { height / extent } else { 1.0 };
    let anchor = Vec3::new((min.x + max.x) * 0.5, min.y, (min.z + max.z) * 0.5);

    for p in points.iter_mut() {
        *p = (*p - anchor) * scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn subsample_caps_count() {
        let points: Vec<Vec3> = (0..1000).map(|i| Vec3::splat(i as f32)).collect();

        let kept = subsample(points.clone(), 300);
        assert!(kept.len() <= 300);
        assert_eq!(kept[0], points[0]);

        assert_eq!(subsample(points.clone(), 5000).len(), 1000);
        assert!(subsample(points, 0).is_empty());
    }

    #[test]
    fn normalize_rests_on_ground() {
        let mut points = vec![
            Vec3::new(2.0, 1.0, 4.0),
            Vec3::new(4.0, 5.0, 6.0),
            Vec3::new(3.0, 3.0, 5.0),
        ];

        normalize_to_height(&mut points, 2.0);

        let (min, max) = bounds(&points).unwrap();
        assert_relative_eq!(min.y, 0.0);
        assert_relative_eq!(max.y, 2.0);
        assert_relative_eq!(min.x, -max.x);
        assert_relative_eq!(min.z, -max.z);
    }

    #[test]
    fn normalize_flat_model() {
        let mut points = vec![Vec3::new(-1.0, 3.0, 0.0), Vec3::new(1.0, 3.0, 0.0)];
        normalize_to_height(&mut points, 5.0);
        assert_eq!(points[0], Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn bounds_of_empty() {
        assert!(bounds(&[]).is_none());
    }

    #[test]
    fn missing_file_is_import_error() {
        let err = load_points("does/not/exist.gltf", 100).unwrap_err();
        assert!(matches!(err, LoadError::Import { .. }));
    }
}
