use armor_vision::lightbar::LightBarSearchParams;
use armor_vision::matching::ArmorMatchParams;
use armor_vision::tracking::TrackerParams;
use armor_vision::{
    load_frame, ArmorPipeline, ColorMask, Command, ConfigError, DebugCanvas, PipelineConfig,
    PipelineError, PixelOffset,
};
use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

const RED: Rgb<u8> = Rgb([235, 30, 20]);

fn empty_frame() -> RgbImage {
    RgbImage::new(320, 240)
}

fn plate_frame() -> RgbImage {
    let mut frame = empty_frame();
    draw_filled_rect_mut(&mut frame, Rect::at(100, 100).of_size(6, 31), RED);
    draw_filled_rect_mut(&mut frame, Rect::at(160, 100).of_size(6, 31), RED);
    frame
}

fn pipeline() -> ArmorPipeline {
    ArmorPipeline::from_config(&PipelineConfig::default()).expect("pipeline")
}

#[test]
fn empty_frames_stay_in_standby_on_full_frame() {
    let mut pipeline = pipeline();
    for _ in 0..3 {
        let report = pipeline.process_frame(&empty_frame(), None).expect("frame");
        assert_eq!(report.contours, 0);
        assert_eq!(report.pairs, 0);
        assert_eq!(report.decision.command, Command::Standby);
        assert_eq!((report.decision.x, report.decision.y), (0, 0));
        assert_eq!(pipeline.pending_roi(), None);
    }
}

#[test]
fn plate_is_acquired_followed_through_roi_and_released() {
    let mut pipeline = pipeline();

    let reports: Vec<_> = (0..3)
        .map(|_| pipeline.process_frame(&plate_frame(), None).expect("frame"))
        .collect();
    assert_eq!(reports[0].pairs, 1);
    assert_eq!(reports[0].decision.command, Command::Standby);
    assert_eq!(reports[1].decision.command, Command::Standby);

    let locked = reports[2].decision;
    assert_eq!(locked.command, Command::Track);
    assert!((locked.x - 132).abs() <= 1, "x = {}", locked.x);
    assert!((locked.y - 115).abs() <= 1, "y = {}", locked.y);
    let roi = pipeline.pending_roi().expect("roi after lock");
    assert_eq!(locked.roi, Some(roi));

    // The next frame is cropped; coordinates still come back in the full frame.
    let followed = pipeline.process_frame(&plate_frame(), None).expect("frame");
    assert_eq!(followed.offset, roi.origin());
    assert_ne!(followed.offset, PixelOffset::ZERO);
    assert_eq!(followed.decision.command, Command::Fire);
    assert!((followed.decision.x - locked.x).abs() <= 1);
    assert!((followed.decision.y - locked.y).abs() <= 1);

    for _ in 0..5 {
        let lost = pipeline.process_frame(&empty_frame(), None).expect("frame");
        assert_eq!(lost.decision.command, Command::Track);
        let widened = lost.decision.roi.expect("widened roi");
        assert!(widened.width > roi.width);
    }
    let released = pipeline.process_frame(&empty_frame(), None).expect("frame");
    assert_eq!(released.decision.command, Command::Standby);
    assert_eq!(pipeline.pending_roi(), None);
}

#[test]
fn reset_returns_to_full_frame_search() {
    let mut pipeline = pipeline();
    for _ in 0..3 {
        pipeline.process_frame(&plate_frame(), None).expect("frame");
    }
    assert!(pipeline.tracker().is_tracking());
    pipeline.reset();
    assert!(!pipeline.tracker().is_tracking());
    assert_eq!(pipeline.pending_roi(), None);
    let report = pipeline.process_frame(&plate_frame(), None).expect("frame");
    assert_eq!(report.frame, 0);
    assert_eq!(report.offset, PixelOffset::ZERO);
}

#[test]
fn debug_canvas_is_annotated() {
    let mut pipeline = pipeline();
    let frame = plate_frame();
    let mut canvas = DebugCanvas::new(frame.clone());
    pipeline
        .process_frame(&frame, Some(&mut canvas))
        .expect("frame");
    // Two markers (outline and dot each) plus one pair outline.
    assert_eq!(canvas.annotations(), 5);
}

struct TinyMask;

impl ColorMask for TinyMask {
    fn apply(&self, _image: &RgbImage) -> GrayImage {
        GrayImage::new(1, 1)
    }
}

#[test]
fn wrong_sized_mask_is_an_error() {
    let mut pipeline = ArmorPipeline::new(
        TinyMask,
        LightBarSearchParams::default(),
        ArmorMatchParams::default(),
        TrackerParams::default(),
    );
    let err = pipeline.process_frame(&empty_frame(), None).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::MaskSizeMismatch {
            mask_width: 1,
            crop_width: 320,
            ..
        }
    ));
}

#[test]
fn process_mask_accepts_prebinarized_crops() {
    let mut pipeline = pipeline();
    let mut mask = GrayImage::new(100, 60);
    draw_filled_rect_mut(&mut mask, Rect::at(10, 10).of_size(6, 31), image::Luma([255]));
    draw_filled_rect_mut(&mut mask, Rect::at(70, 10).of_size(6, 31), image::Luma([255]));
    let offset = PixelOffset::new(200, 100);
    let mut last = None;
    for _ in 0..3 {
        last = Some(pipeline.process_mask(&mask, offset, None));
    }
    let decision = last.expect("report").decision;
    assert_eq!(decision.command, Command::Track);
    assert!((decision.x - 242).abs() <= 1);
    assert!((decision.y - 125).abs() <= 1);
}

#[test]
fn unreadable_frame_is_an_image_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = load_frame(dir.path().join("missing.png")).unwrap_err();
    assert!(matches!(missing, PipelineError::Image(_)));

    let garbage = dir.path().join("garbage.png");
    std::fs::write(&garbage, b"not a png").expect("write");
    assert!(matches!(load_frame(&garbage), Err(PipelineError::Image(_))));
}

#[test]
fn saved_frame_loads_back() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("plate.png");
    plate_frame().save(&path).expect("save");
    assert_eq!(load_frame(&path).expect("load"), plate_frame());
}

#[test]
fn bad_config_file_is_a_config_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("armor.json");
    std::fs::write(&path, "{ not json").expect("write");
    let err = ArmorPipeline::from_config_file(&path).err().expect("error");
    assert!(matches!(err, PipelineError::Config(ConfigError::Json(_))));

    let missing = ArmorPipeline::from_config_file(dir.path().join("none.json")).err();
    assert!(matches!(missing, Some(PipelineError::Config(ConfigError::Io(_)))));
}

#[test]
fn config_file_with_worker_pool_builds() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("armor.json");
    std::fs::write(&path, r#"{ "worker_threads": 2 }"#).expect("write");
    let mut pipeline = ArmorPipeline::from_config_file(&path).expect("pipeline");
    let report = pipeline.process_frame(&plate_frame(), None).expect("frame");
    assert_eq!(report.pairs, 1);
}
