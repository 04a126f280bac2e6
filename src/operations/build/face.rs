use tracing::warn;

use crate::math::{try_unit, Vector3};

use super::Piece;

/// Sine of the angle below which a face counts as parallel to its segment.
const FACE_PARALLEL_TOLERANCE: f64 = 1e-3;

/// Repairs faces that are zero, non-finite or parallel to their segment.
///
/// The replacement is "up" (+Z), or +Y for segments that themselves run
/// vertically. Returns the number of faces reset.
pub(super) fn repair_faces(pieces: &mut [Piece]) -> usize {
    let mut resets = 0;
    for piece in pieces.iter_mut() {
        let Some(dir) = try_unit(&(piece.end - piece.start)) else {
            continue;
        };
        if usable_face(&piece.face, &dir).is_some() {
            piece.face = piece.face.normalize();
            continue;
        }
        let face = default_face(&dir);
        warn!(
            tag = %piece.tag,
            face = ?piece.face,
            "degenerate face, reset to {:?}",
            face
        );
        piece.face = face;
        resets += 1;
    }
    resets
}

/// The default face for a segment running along `dir`.
#[must_use]
pub(super) fn default_face(dir: &Vector3) -> Vector3 {
    usable_face(&Vector3::z(), dir).unwrap_or_else(Vector3::y)
}

fn usable_face(face: &Vector3, dir: &Vector3) -> Option<Vector3> {
    let unit = try_unit(face)?;
    (unit.cross(dir).norm() >= FACE_PARALLEL_TOLERANCE).then_some(unit)
}
