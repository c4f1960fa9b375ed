use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Which of the two remote inference calls produced a result or error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Stage {
    #[strum(serialize = "detect")]
    Detect,
    #[strum(serialize = "predictDepth")]
    PredictDepth,
}

/// Corner coordinates of a detected object, as reported by the detection
/// service. Ordering (x1 <= x2, y1 <= y2) is trusted upstream.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub class_name: String,
    pub confidence: f64,
}

/// Response body of `POST {detection_base}/detect`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DetectionResult {
    pub detection_count: usize,
    pub detections: Vec<Detection>,
    /// Opaque metadata blob; echoed verbatim into the depth request.
    pub image_info: serde_json::Value,
    /// Base64 overlay, present when the request asked for `include_image`.
    pub annotated_image: Option<String>,
}

/// Center point of a detection's bounding box, the query location for the
/// depth lookup. Derived 1:1 from a `Detection`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Midpoint {
    pub x: i64,
    pub y: i64,
    pub class_name: String,
    pub confidence: f64,
    pub bbox: BoundingBox,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DepthPoint {
    pub x: i64,
    pub y: i64,
    pub class_name: String,
    pub confidence: f64,
    pub depth_value: f64,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct DepthStats {
    pub min_depth: f64,
    pub max_depth: f64,
    pub mean_depth: f64,
    pub std_depth: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DepthImages {
    pub depth_visualization: Option<String>,
}

/// Response body of `POST {depth_base}/predict_depth`. `depth_at_objects`
/// corresponds positionally to the midpoint sequence that was sent.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DepthResult {
    pub depth_at_objects: Vec<DepthPoint>,
    pub depth_stats: DepthStats,
    pub images: Option<DepthImages>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_response_decodes_with_extra_fields() {
        // The live service also sends `success` and per-detection `class_id`.
        let body = r#"{
            "success": true,
            "detection_count": 1,
            "detections": [
                {
                    "class_id": 16,
                    "class_name": "dog",
                    "confidence": 0.87,
                    "bbox": {"x1": 10, "y1": 20, "x2": 110, "y2": 220}
                }
            ],
            "image_info": {
                "filename": "dog.jpg",
                "original_size": [480, 640],
                "processed_size": [640, 640]
            },
            "annotated_image": "data:image/jpeg;base64,AAAA"
        }"#;

        let result: DetectionResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.detection_count, 1);
        assert_eq!(result.detections.len(), 1);
        assert_eq!(result.detections[0].class_name, "dog");
        assert_eq!(result.detections[0].bbox.x2, 110.0);
        assert_eq!(result.image_info["filename"], "dog.jpg");
        assert!(result.annotated_image.is_some());
    }

    #[test]
    fn depth_response_decodes_without_images() {
        let body = r#"{
            "depth_at_objects": [
                {"x": 60, "y": 120, "class_name": "dog", "confidence": 0.87, "depth_value": 3.25}
            ],
            "depth_stats": {"min_depth": 0.1, "max_depth": 9.5, "mean_depth": 4.2, "std_depth": 1.7}
        }"#;

        let result: DepthResult = serde_json::from_str(body).unwrap();
        assert_eq!(result.depth_at_objects.len(), 1);
        assert_eq!(result.depth_at_objects[0].depth_value, 3.25);
        assert_eq!(result.depth_stats.std_depth, 1.7);
        assert!(result.images.is_none());
    }

    #[test]
    fn stage_labels_match_wire_names() {
        assert_eq!(Stage::Detect.to_string(), "detect");
        assert_eq!(Stage::PredictDepth.to_string(), "predictDepth");
    }
}
