// Posture monitor: landmark scoring and baseline comparison.
// Landmark extraction runs in an external pose service behind `PoseEstimator`.

pub mod comparison;
pub mod estimator;
pub mod handlers;
pub mod image;
pub mod landmarks;
pub mod scoring;
pub mod settings;
