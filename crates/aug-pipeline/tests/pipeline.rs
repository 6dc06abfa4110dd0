//! End-to-end pipeline tests: determinism, target synchronization, and
//! config-file loading.

use aug_core::{BoundingBox, Image, Keypoint, Mask};
use aug_pipeline::{CoordinateSpace, PipelineConfig, Targets};
use std::io::Write;

fn gradient_image(w: u32, h: u32, ch: u32) -> Image<f32> {
    let mut img = Image::<f32>::new(w, h, ch);
    {
        let data = img.data_mut();
        let len = data.len() as f32;
        for (i, v) in data.iter_mut().enumerate() {
            *v = i as f32 / len;
        }
    }
    img
}

fn rotate_resize_config() -> PipelineConfig {
    PipelineConfig::from_yaml(
        "
transforms:
  - name: rotate
    params:
      limit: [-90, 90]
      border_mode: constant
  - name: resize
    params: {height: 64, width: 64}
",
    )
    .unwrap()
}

#[test]
fn test_same_seed_is_bit_identical() {
    let pipeline = PipelineConfig::from_yaml(
        "
transforms:
  - name: rotate
    probability: 0.7
    params: {limit: [-45, 45]}
  - name: gauss_noise
    probability: 0.9
  - name: random_crop
    params: {height: 16, width: 16}
",
    )
    .unwrap()
    .build()
    .unwrap();

    let targets = || {
        Targets::new(gradient_image(32, 32, 3))
            .with_mask(Mask::filled(32, 32, 1, &[2]))
            .with_bboxes(vec![BoundingBox::new(4.0, 4.0, 20.0, 20.0).with_label(1)])
            .with_keypoints(vec![Keypoint::new(10.0, 10.0)])
    };

    for seed in [0u64, 1, 42, 9999] {
        let a = pipeline.apply(targets(), seed).unwrap();
        let b = pipeline.apply(targets(), seed).unwrap();
        assert_eq!(a.image, b.image);
        assert_eq!(a.mask, b.mask);
        assert_eq!(a.bboxes, b.bboxes);
        assert_eq!(a.keypoints, b.keypoints);
    }
}

#[test]
fn test_different_seeds_diverge() {
    let pipeline = rotate_resize_config().build().unwrap();
    let targets = || Targets::new(gradient_image(32, 32, 3));
    let a = pipeline.apply(targets(), 1).unwrap();
    let b = pipeline.apply(targets(), 2).unwrap();
    // Angles differ, so the warped images differ.
    assert_ne!(a.image, b.image);
}

#[test]
fn test_rotate_then_resize_shape_and_boxes() {
    let pipeline = rotate_resize_config().build().unwrap();
    for seed in 0..50 {
        let targets = Targets::new(gradient_image(32, 32, 3))
            .with_bboxes(vec![BoundingBox::new(0.0, 0.0, 16.0, 16.0).with_label(3)]);
        let out = pipeline.apply(targets, seed).unwrap();
        // Output size never depends on the sampled angle.
        assert_eq!(out.image.dimensions(), (64, 64));
        let boxes = out.bboxes.unwrap();
        assert_eq!(boxes.len(), 1);
        let b = &boxes[0];
        assert!(b.validate().is_ok());
        assert!(b.x_min >= 0.0 && b.x_max <= 64.0);
        assert!(b.y_min >= 0.0 && b.y_max <= 64.0);
        assert!(b.area() > 0.0);
        assert_eq!(b.label, Some(3));
    }
}

#[test]
fn test_keypoint_tracks_quarter_turn_analytically() {
    let pipeline = PipelineConfig::from_yaml(
        "
transforms:
  - name: rotate
    params:
      limit: [90, 90]
      border_mode: constant
",
    )
    .unwrap()
    .build()
    .unwrap();

    let targets =
        Targets::new(gradient_image(8, 8, 1)).with_keypoints(vec![Keypoint::new(1.0, 1.0)]);
    let out = pipeline.apply(targets, 0).unwrap();
    let kp = &out.keypoints.unwrap()[0];
    // Quarter turn about (4, 4): (1, 1) -> (7, 1).
    assert!((kp.x - 7.0).abs() < 1e-9);
    assert!((kp.y - 1.0).abs() < 1e-9);
}

#[test]
fn test_mask_labels_survive_geometry() {
    let pipeline = PipelineConfig::from_yaml(
        "
transforms:
  - name: rotate
    params: {limit: [-60, 60], border_mode: constant}
  - name: resize
    params: {height: 48, width: 48}
",
    )
    .unwrap()
    .build()
    .unwrap();

    let mut mask = Mask::new(32, 32, 1);
    for y in 10..20 {
        for x in 10..20 {
            mask.set_pixel(x, y, &[5]);
        }
    }
    let targets = Targets::new(gradient_image(32, 32, 3)).with_mask(mask);
    let out = pipeline.apply(targets, 7).unwrap();
    let out_mask = out.mask.unwrap();
    assert_eq!(out_mask.dimensions(), (48, 48));
    // Nearest-neighbor everywhere: only the original labels appear.
    for v in out_mask.data() {
        assert!(*v == 0 || *v == 5, "unexpected label {v}");
    }
    assert!(out_mask.data().iter().any(|v| *v == 5));
}

#[test]
fn test_pixel_transforms_leave_coordinates_alone() {
    let pipeline = PipelineConfig::from_yaml(
        "
transforms:
  - name: gauss_noise
  - name: random_brightness_contrast
  - name: solarize
",
    )
    .unwrap()
    .build()
    .unwrap();

    let boxes = vec![BoundingBox::new(2.0, 3.0, 10.0, 12.0)];
    let kps = vec![Keypoint::new(5.0, 5.0).with_angle(0.25)];
    let targets = Targets::new(gradient_image(16, 16, 3))
        .with_bboxes(boxes.clone())
        .with_keypoints(kps.clone());
    let out = pipeline.apply(targets, 3).unwrap();
    assert_eq!(out.bboxes.unwrap(), boxes);
    assert_eq!(out.keypoints.unwrap(), kps);
    assert_eq!(out.image.dimensions(), (16, 16));
}

#[test]
fn test_normalized_boxes_are_resize_invariant() {
    let pipeline = PipelineConfig::from_yaml(
        "
coordinate_space: normalized
transforms:
  - name: resize
    params: {height: 64, width: 64}
",
    )
    .unwrap()
    .build()
    .unwrap();

    let targets = Targets::new(gradient_image(32, 16, 3))
        .with_bboxes(vec![BoundingBox::new(0.25, 0.25, 0.5, 0.75)]);
    let out = pipeline.apply(targets, 0).unwrap();
    let b = &out.bboxes.unwrap()[0];
    assert!((b.x_min - 0.25).abs() < 1e-9);
    assert!((b.y_max - 0.75).abs() < 1e-9);
}

#[test]
fn test_one_of_mode_applies_single_step() {
    let pipeline = PipelineConfig::from_yaml(
        "
mode: one_of
transforms:
  - name: horizontal_flip
    probability: 0.5
  - name: vertical_flip
    probability: 0.5
",
    )
    .unwrap()
    .build()
    .unwrap();

    let mut img = Image::<f32>::new(4, 4, 1);
    img.set_pixel(0, 0, &[1.0]);
    for seed in 0..20 {
        let out = pipeline.apply(Targets::new(img.clone()), seed).unwrap();
        let h = out.image.pixel(3, 0) == [1.0];
        let v = out.image.pixel(0, 3) == [1.0];
        assert!(h ^ v, "exactly one flip must run");
    }
}

#[test]
fn test_crop_too_large_aborts_invocation() {
    let pipeline = PipelineConfig::from_yaml(
        "
transforms:
  - name: random_crop
    params: {height: 64, width: 64}
",
    )
    .unwrap()
    .build()
    .unwrap();
    let targets = Targets::new(gradient_image(32, 32, 3));
    assert!(pipeline.apply(targets, 0).is_err());
}

#[test]
fn test_config_file_loads_and_runs() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "
transforms:
  - name: pad_if_needed
    params: {{min_height: 48, min_width: 48, border_mode: constant, fill: 0.5}}
  - name: center_crop
    params: {{height: 40, width: 40}}
"
    )
    .unwrap();

    let pipeline = PipelineConfig::from_file(file.path()).unwrap().build().unwrap();
    let targets = Targets::new(gradient_image(32, 32, 3));
    let out = pipeline.apply(targets, 11).unwrap();
    assert_eq!(out.image.dimensions(), (40, 40));
}

#[test]
fn test_coordinate_space_default_is_absolute() {
    let config = PipelineConfig::from_yaml("transforms: []").unwrap();
    assert_eq!(config.coordinate_space, CoordinateSpace::Absolute);
}
