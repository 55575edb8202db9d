//! Face description models.
//!
//! These mirror the JSON the browser client has always posted, so field names
//! stay camelCase on the wire.

use serde::{Deserialize, Serialize};

/// Where the face centroid sits in the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Left,
    Right,
    Top,
    Bottom,
    Center,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Left => "Left",
            Position::Right => "Right",
            Position::Top => "Top",
            Position::Bottom => "Bottom",
            Position::Center => "Center",
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Face size bucket relative to the frame area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceSize {
    Small,
    Medium,
    Large,
}

impl FaceSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaceSize::Small => "Small",
            FaceSize::Medium => "Medium",
            FaceSize::Large => "Large",
        }
    }
}

impl std::fmt::Display for FaceSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Axis-aligned face box in frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    /// `[x, y]` of the top-left corner
    pub top_left: [f64; 2],
    /// `[x, y]` of the bottom-right corner
    pub bottom_right: [f64; 2],
}

impl BoundingBox {
    pub fn new(top_left: [f64; 2], bottom_right: [f64; 2]) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    pub fn width(&self) -> f64 {
        self.bottom_right[0] - self.top_left[0]
    }

    pub fn height(&self) -> f64 {
        self.bottom_right[1] - self.top_left[1]
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Midpoint of the box as `(x, y)`.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.top_left[0] + self.bottom_right[0]) / 2.0,
            (self.top_left[1] + self.bottom_right[1]) / 2.0,
        )
    }
}

/// Coarse head orientation in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HeadPose {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

impl HeadPose {
    pub const ZERO: HeadPose = HeadPose {
        pitch: 0.0,
        yaw: 0.0,
        roll: 0.0,
    };
}

/// One mesh point as produced by the landmark model.
///
/// Serialized as a bare `[x, y, z]` array, which is the model's native shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<[f64; 3]> for Landmark {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Landmark> for [f64; 3] {
    fn from(l: Landmark) -> Self {
        [l.x, l.y, l.z]
    }
}

/// Descriptive struct derived from the first detected face.
///
/// This is the `faceData` object of a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceData {
    pub position: Position,
    pub size: FaceSize,
    /// Model confidence, passed through unchanged
    pub confidence: f64,
    /// Number of mesh points
    pub landmarks: usize,
    pub bounding_box: BoundingBox,
    pub head_pose: HeadPose,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_data_wire_format() {
        let data = FaceData {
            position: Position::Center,
            size: FaceSize::Medium,
            confidence: 0.98,
            landmarks: 468,
            bounding_box: BoundingBox::new([100.0, 80.0], [300.0, 320.0]),
            head_pose: HeadPose::ZERO,
        };

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["position"], "Center");
        assert_eq!(json["size"], "Medium");
        assert_eq!(json["landmarks"], 468);
        assert_eq!(json["boundingBox"]["topLeft"][0], 100.0);
        assert_eq!(json["boundingBox"]["bottomRight"][1], 320.0);
        assert_eq!(json["headPose"]["roll"], 0.0);
    }

    #[test]
    fn test_bounding_box_geometry() {
        let bbox = BoundingBox::new([10.0, 20.0], [30.0, 60.0]);
        assert_eq!(bbox.width(), 20.0);
        assert_eq!(bbox.height(), 40.0);
        assert_eq!(bbox.area(), 800.0);
        assert_eq!(bbox.center(), (20.0, 40.0));
    }

    #[test]
    fn test_landmark_is_a_bare_array() {
        let landmark: Landmark = serde_json::from_str("[1.5, 2.0, -3.25]").unwrap();
        assert_eq!(landmark, Landmark::new(1.5, 2.0, -3.25));
        assert_eq!(serde_json::to_string(&landmark).unwrap(), "[1.5,2.0,-3.25]");
    }
}
