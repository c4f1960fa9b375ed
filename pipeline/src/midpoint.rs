use shared::{Detection, Midpoint};

/// Derives the bounding-box center of each detection, in input order.
///
/// Pure and total: an empty slice yields an empty vector, and the input is
/// never mutated. Halfway values round to the nearest even integer so the
/// result is reproducible across platforms.
pub fn derive_midpoints(detections: &[Detection]) -> Vec<Midpoint> {
    detections
        .iter()
        .map(|detection| Midpoint {
            x: ((detection.bbox.x1 + detection.bbox.x2) / 2.0).round_ties_even() as i64,
            y: ((detection.bbox.y1 + detection.bbox.y2) / 2.0).round_ties_even() as i64,
            class_name: detection.class_name.clone(),
            confidence: detection.confidence,
            bbox: detection.bbox,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::BoundingBox;

    fn detection(name: &str, confidence: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> Detection {
        Detection {
            bbox: BoundingBox { x1, y1, x2, y2 },
            class_name: name.into(),
            confidence,
        }
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(derive_midpoints(&[]), vec![]);
    }

    #[test]
    fn centers_are_derived_in_input_order() {
        let detections = vec![
            detection("cat", 0.9, 0.0, 0.0, 10.0, 10.0),
            detection("dog", 0.5, 4.0, 4.0, 6.0, 6.0),
        ];

        let midpoints = derive_midpoints(&detections);
        assert_eq!(midpoints.len(), 2);

        assert_eq!((midpoints[0].x, midpoints[0].y), (5, 5));
        assert_eq!(midpoints[0].class_name, "cat");
        assert_eq!(midpoints[0].confidence, 0.9);
        assert_eq!(midpoints[0].bbox, detections[0].bbox);

        assert_eq!((midpoints[1].x, midpoints[1].y), (5, 5));
        assert_eq!(midpoints[1].class_name, "dog");
        assert_eq!(midpoints[1].confidence, 0.5);
        assert_eq!(midpoints[1].bbox, detections[1].bbox);
    }

    #[test]
    fn halfway_values_round_to_even() {
        let midpoints = derive_midpoints(&[
            detection("a", 1.0, 0.0, 0.0, 5.0, 7.0),   // centers 2.5, 3.5
            detection("b", 1.0, -5.0, -7.0, 0.0, 0.0), // centers -2.5, -3.5
        ]);

        assert_eq!((midpoints[0].x, midpoints[0].y), (2, 4));
        assert_eq!((midpoints[1].x, midpoints[1].y), (-2, -4));
    }

    #[test]
    fn input_detections_are_left_untouched() {
        let detections = vec![detection("cat", 0.9, 1.0, 2.0, 3.0, 4.0)];
        let before = detections.clone();
        let _ = derive_midpoints(&detections);
        assert_eq!(detections, before);
    }
}
