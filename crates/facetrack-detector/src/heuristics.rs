//! Geometric heuristics over landmark model output.
//!
//! None of this is calibrated: position and size are threshold buckets and
//! head pose is three `atan2` estimates from fixed mesh points.

use facetrack_models::{BoundingBox, FaceData, FaceSize, HeadPose, Landmark, Position};

use crate::estimator::FaceEstimate;

/// Box-to-frame area ratio below which a face is Small.
pub const SMALL_FACE_RATIO: f64 = 0.15;

/// Box-to-frame area ratio above which a face is Large.
pub const LARGE_FACE_RATIO: f64 = 0.4;

/// Mesh index of the nose tip.
pub const NOSE_TIP: usize = 1;

/// Mesh index of the left eye point.
pub const LEFT_EYE: usize = 145;

/// Mesh index of the right eye point.
pub const RIGHT_EYE: usize = 374;

/// Bucket the box center into a third of the frame.
///
/// Checks run in a fixed order (left, right, top, bottom) and the first match
/// wins, so a top-left face reports `Left`.
pub fn classify_position(bbox: &BoundingBox, frame_width: f64, frame_height: f64) -> Position {
    let (cx, cy) = bbox.center();

    if cx < frame_width / 3.0 {
        Position::Left
    } else if cx > 2.0 * frame_width / 3.0 {
        Position::Right
    } else if cy < frame_height / 3.0 {
        Position::Top
    } else if cy > 2.0 * frame_height / 3.0 {
        Position::Bottom
    } else {
        Position::Center
    }
}

/// Bucket the box by its share of the frame area. Both thresholds are
/// exclusive, so exact boundary ratios are Medium.
pub fn classify_size(bbox: &BoundingBox, frame_width: f64, frame_height: f64) -> FaceSize {
    let ratio = bbox.area() / (frame_width * frame_height);

    if ratio < SMALL_FACE_RATIO {
        FaceSize::Small
    } else if ratio > LARGE_FACE_RATIO {
        FaceSize::Large
    } else {
        FaceSize::Medium
    }
}

/// Estimate pitch, yaw and roll from the nose tip and the two eye points.
///
/// Returns a zero pose if the mesh is too short to contain all three.
pub fn estimate_head_pose(mesh: &[Landmark]) -> HeadPose {
    let (Some(nose), Some(left), Some(right)) =
        (mesh.get(NOSE_TIP), mesh.get(LEFT_EYE), mesh.get(RIGHT_EYE))
    else {
        return HeadPose::ZERO;
    };

    let mid_x = (left.x + right.x) / 2.0;
    let mid_y = (left.y + right.y) / 2.0;
    let mid_z = (left.z + right.z) / 2.0;

    HeadPose {
        pitch: (nose.y - mid_y).atan2(nose.z - mid_z),
        yaw: (nose.x - mid_x).atan2(nose.z - mid_z),
        roll: (right.y - left.y).atan2(right.x - left.x),
    }
}

/// Build the descriptive struct for one face.
///
/// `None` when the model gave no mesh or no bounding box for it.
pub fn describe_face(face: &FaceEstimate, frame_width: u32, frame_height: u32) -> Option<FaceData> {
    let mesh = face.mesh.as_ref()?;
    let bbox = face.bounding_box?;
    let (w, h) = (f64::from(frame_width), f64::from(frame_height));

    Some(FaceData {
        position: classify_position(&bbox, w, h),
        size: classify_size(&bbox, w, h),
        confidence: face.face_in_view_confidence.unwrap_or(0.0),
        landmarks: mesh.len(),
        bounding_box: bbox,
        head_pose: estimate_head_pose(mesh),
    })
}
