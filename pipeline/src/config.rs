/// Base addresses of the two inference services, supplied by the host at
/// construction time. The addresses are opaque strings; a malformed value
/// surfaces as a transport failure on the first call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub detection_base_url: String,
    pub depth_base_url: String,
}

impl PipelineConfig {
    pub fn new(detection_base_url: impl Into<String>, depth_base_url: impl Into<String>) -> Self {
        Self {
            detection_base_url: detection_base_url.into(),
            depth_base_url: depth_base_url.into(),
        }
    }

    pub fn detect_endpoint(&self) -> String {
        format!("{}/detect", self.detection_base_url)
    }

    pub fn depth_endpoint(&self) -> String {
        format!("{}/predict_depth", self.depth_base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_append_fixed_suffixes() {
        let config = PipelineConfig::new("http://127.0.0.1:5000", "http://localhost:5050");
        assert_eq!(config.detect_endpoint(), "http://127.0.0.1:5000/detect");
        assert_eq!(config.depth_endpoint(), "http://localhost:5050/predict_depth");
    }
}
