pub mod annotator;
pub mod color_sample;
pub mod hsv;
pub mod mask_builder;
pub mod processing_mode;
pub mod region;
pub mod region_extractor;
pub mod tracked_colors;
