use color_tracker::core_modules::color_sample::sample;
use color_tracker::core_modules::hsv::Hsv;
use color_tracker::core_modules::mask_builder::build_mask;
use color_tracker::core_modules::region_extractor::region_extractor::extract_regions;
use color_tracker::core_modules::region_extractor::{DEFAULT_MIN_AREA, SelectionPolicy};
use color_tracker::{ColorSample, ProcessedFrame, ProcessingMode, Registration, TrackerConfig, TrackingSession};
use image::{Rgb, RgbImage};

const COLOR_A: Rgb<u8> = Rgb([40, 160, 60]);
const COLOR_B: Rgb<u8> = Rgb([250, 200, 20]);

fn synthetic_frame(block_side: u32) -> RgbImage {
    let mut frame = RgbImage::from_pixel(100, 100, COLOR_A);
    for y in 40..40 + block_side {
        for x in 40..40 + block_side {
            frame.put_pixel(x, y, COLOR_B);
        }
    }
    frame
}

#[test]
fn block_above_threshold_is_found_as_one_region() {
    let frame = synthetic_frame(20);
    let reference = sample(&frame, 50, 50).unwrap();
    let mask = build_mask(&frame, &reference);
    let regions = extract_regions(&mask, DEFAULT_MIN_AREA, SelectionPolicy::AllQualifying);

    assert_eq!(regions.len(), 1);
    let bbox = regions[0].bounding_box;
    assert!(bbox.x.abs_diff(40) <= 3 && bbox.y.abs_diff(40) <= 3);
    assert!(bbox.width.abs_diff(20) <= 6 && bbox.height.abs_diff(20) <= 6);
    assert!(regions[0].area > DEFAULT_MIN_AREA);
}

#[test]
fn block_below_threshold_yields_no_region() {
    let frame = synthetic_frame(8);
    let reference = sample(&frame, 44, 44).unwrap();
    let mask = build_mask(&frame, &reference);
    assert!(extract_regions(&mask, DEFAULT_MIN_AREA, SelectionPolicy::AllQualifying).is_empty());
    assert!(extract_regions(&mask, DEFAULT_MIN_AREA, SelectionPolicy::Largest).is_empty());
}

#[test]
fn tracker_session_reports_the_block() {
    let mut session = TrackingSession::new(TrackerConfig::default()).unwrap();
    session.set_mode(ProcessingMode::Tracker);
    session.process(synthetic_frame(20)).unwrap();
    session.register_color_at(50, 50).unwrap();

    let output = session.process(synthetic_frame(20)).unwrap();
    assert_eq!(output.dimensions(), (100, 100));
    let detections = session.last_detections();
    assert_eq!(detections.len(), 1);
    assert_eq!(detections[0].regions.len(), 1);
    assert!(detections[0].regions[0].area > DEFAULT_MIN_AREA);
}

#[test]
fn fourth_registration_with_capacity_three_clears_the_set() {
    let config = TrackerConfig {
        capacity: 3,
        ..TrackerConfig::default()
    };
    let mut session = TrackingSession::new(config).unwrap();
    session.set_mode(ProcessingMode::Tracker);
    session.process(synthetic_frame(20)).unwrap();

    let clicks = [(5, 5), (50, 50), (95, 95)];
    for (x, y) in clicks {
        assert!(matches!(
            session.register_color_at(x, y).unwrap(),
            Registration::Added { .. }
        ));
    }
    let expected: Vec<ColorSample> = [COLOR_A, COLOR_B, COLOR_A]
        .into_iter()
        .map(|rgb| Hsv::from_rgb(rgb).into())
        .collect();
    assert_eq!(session.tracked_colors().as_slice(), expected.as_slice());

    assert_eq!(
        session.register_color_at(50, 50).unwrap(),
        Registration::Cleared { dropped: 3 }
    );
    assert_eq!(session.tracked_colors().len(), 0);
}

#[test]
fn repeating_a_mode_command_is_idempotent() {
    let mut session = TrackingSession::new(TrackerConfig::default()).unwrap();
    for mode in ProcessingMode::ALL {
        session.set_mode(mode);
        session.set_mode(mode);
        assert_eq!(session.mode(), mode);
    }
}

#[test]
fn channel_modes_output_the_constant_components() {
    let color = Rgb([200, 100, 50]);
    let expected = Hsv::from_rgb(color);
    assert_eq!(
        expected,
        Hsv {
            hue: 10,
            saturation: 191,
            value: 200
        }
    );

    let mut session = TrackingSession::new(TrackerConfig::default()).unwrap();
    for (mode, level) in [
        (ProcessingMode::Hue, expected.hue),
        (ProcessingMode::Saturation, expected.saturation),
        (ProcessingMode::Value, expected.value),
    ] {
        session.set_mode(mode);
        let output = session.process(RgbImage::from_pixel(32, 24, color)).unwrap();
        let ProcessedFrame::Single(channel) = output else {
            panic!("{mode} must produce a single-channel image");
        };
        assert_eq!(channel.dimensions(), (32, 24));
        assert!(channel.pixels().all(|p| p.0 == [level]), "{mode}");
    }
}

#[test]
fn clicking_a_uniform_frame_tracks_the_whole_frame() {
    let frame = RgbImage::from_pixel(80, 60, Rgb([40, 160, 90]));
    let mut session = TrackingSession::new(TrackerConfig::default()).unwrap();
    session.set_mode(ProcessingMode::Tracker);
    session.process(frame.clone()).unwrap();
    session.register_color_at(10, 10).unwrap();
    session.process(frame).unwrap();

    let regions = &session.last_detections()[0].regions;
    assert_eq!(regions.len(), 1);
    let bbox = regions[0].bounding_box;
    assert_eq!((bbox.x, bbox.y, bbox.width, bbox.height), (0, 0, 80, 60));
}
