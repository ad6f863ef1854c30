//! Tests for command-line parsing, batch processing and the crop/paste/guide commands

#[cfg(test)]
mod tests {
    use clap::Parser;
    use crackmask::io::cli::{
        Cli, Command, CrackArgs, CrackProcessor, CropArgs, GuideArgs, PasteArgs, crop_command,
        crop_output_paths, guide_command, guide_output_path, modified_output_path, paste_command,
        reprojected_stencil_path, stencil_output_path,
    };
    use crackmask::CrackError;
    use crackmask::io::configuration::{DEFAULT_CROP_SIZE, DEFAULT_NUM_CRACKS, DEFAULT_SEED};
    use crackmask::io::patch::CropRecord;
    use crackmask::spatial::{PixelBox, RegionMask};
    use image::{GrayImage, Luma, Rgb, RgbImage};
    use log::LevelFilter;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn parse_crack(args: &[&str]) -> CrackArgs {
        let mut argv = vec!["crackmask", "crack"];
        argv.extend_from_slice(args);
        match Cli::parse_from(argv).command {
            Command::Crack(args) => args,
            other => panic!("expected crack command, got {other:?}"),
        }
    }

    fn write_region(path: &Path, width: u32, height: u32) {
        let region = RegionMask::from_fn(width, height, |x, y| {
            (width / 4..3 * width / 4).contains(&x) && (height / 4..3 * height / 4).contains(&y)
        });
        region.to_gray().save(path).unwrap();
    }

    // Tests crack parsing with only the target argument
    // Verified by changing default values to ensure defaults are used
    #[test]
    fn test_crack_parse_minimal_args() {
        let args = parse_crack(&["mask.png"]);

        assert_eq!(args.target, PathBuf::from("mask.png"));
        assert_eq!(args.seed, DEFAULT_SEED);
        assert_eq!(args.num_cracks, DEFAULT_NUM_CRACKS);
        assert_eq!(args.spec(), crackmask::CrackSpec::default());
        assert!(args.skip_existing());
    }

    // Tests crack parsing with every option
    // Verified by swapping two short flags
    #[test]
    fn test_crack_parse_all_args() {
        let args = parse_crack(&[
            "masks/",
            "-n",
            "7",
            "--min-length",
            "10",
            "--max-length",
            "20",
            "-b",
            "0.5",
            "-t",
            "2.0",
            "-r",
            "9",
            "-s",
            "123",
            "--no-skip",
        ]);

        let spec = args.spec();
        assert_eq!(spec.num_cracks, 7);
        assert_eq!((spec.min_length, spec.max_length), (10, 20));
        assert!((spec.branch_prob - 0.5).abs() < f64::EPSILON);
        assert!((spec.thickness_scale - 2.0).abs() < f64::EPSILON);
        assert_eq!(spec.max_retries, 9);
        assert_eq!(args.seed, 123);
        assert!(!args.skip_existing());
    }

    // Tests the verbosity flags map onto log levels
    // Verified by letting verbose override quiet
    #[test]
    fn test_verbosity_flags() {
        let normal = Cli::parse_from(["crackmask", "crack", "m.png"]);
        assert!(normal.should_show_progress());
        assert_eq!(normal.log_level(), LevelFilter::Info);

        let quiet = Cli::parse_from(["crackmask", "crack", "m.png", "-q"]);
        assert!(!quiet.should_show_progress());
        assert_eq!(quiet.log_level(), LevelFilter::Error);

        let verbose = Cli::parse_from(["crackmask", "-v", "guide", "s.png"]);
        assert_eq!(verbose.log_level(), LevelFilter::Debug);

        let both = Cli::parse_from(["crackmask", "crop", "a.png", "b.png", "-q", "-v"]);
        assert_eq!(both.log_level(), LevelFilter::Error);
    }

    #[test]
    fn test_crop_and_paste_parsing() {
        match Cli::parse_from(["crackmask", "crop", "img.png", "mask.png"]).command {
            Command::Crop(args) => {
                assert_eq!(args.out_dir, PathBuf::from("."));
                assert_eq!(args.crop_size, DEFAULT_CROP_SIZE);
                assert_eq!(args.seed, DEFAULT_SEED);
            }
            other => panic!("expected crop command, got {other:?}"),
        }

        // A stencil output without a stencil is meaningless
        assert!(
            Cli::try_parse_from([
                "crackmask",
                "paste",
                "a.png",
                "b.png",
                "c.json",
                "--stencil-output",
                "d.png",
            ])
            .is_err()
        );
        assert!(Cli::try_parse_from(["crackmask"]).is_err());
    }

    // Tests output names of each command
    // Verified by keeping the cropped mask suffix in the stencil name
    #[test]
    fn test_output_path_generation() {
        assert_eq!(
            stencil_output_path(Path::new("data/wall_cropped_mask.png")),
            PathBuf::from("data/wall_crack_mask.png")
        );
        assert_eq!(
            stencil_output_path(Path::new("data/mask.png")),
            PathBuf::from("data/mask_crack_mask.png")
        );
        assert_eq!(
            modified_output_path(Path::new("data/photo.jpg")),
            PathBuf::from("data/photo_modified.jpg")
        );
        assert_eq!(
            reprojected_stencil_path(Path::new("data/photo.jpg")),
            PathBuf::from("data/photo_crack_mask_full.png")
        );
        assert_eq!(
            guide_output_path(Path::new("wall_crack_mask.png")),
            PathBuf::from("wall_crack_mask_guide.png")
        );

        let (image, mask, coords) = crop_output_paths(Path::new("in/wall.jpg"), Path::new("out"));
        assert_eq!(image, PathBuf::from("out/wall_cropped.png"));
        assert_eq!(mask, PathBuf::from("out/wall_cropped_mask.png"));
        assert_eq!(coords, PathBuf::from("out/wall_crop_coords.json"));
    }

    // Tests error handling for missing targets
    // Verified by removing error return for nonexistent files
    #[test]
    fn test_process_nonexistent_target() {
        let mut processor = CrackProcessor::new(parse_crack(&["nonexistent.png"]), false);
        assert!(processor.process().is_err());
    }

    // Tests error handling for non-PNG files
    // Verified by removing file type validation
    #[test]
    fn test_process_invalid_file_type() {
        let temp_dir = TempDir::new().unwrap();
        let txt_file = temp_dir.path().join("mask.txt");
        fs::write(&txt_file, "not a png").unwrap();

        let mut processor =
            CrackProcessor::new(parse_crack(&[txt_file.to_str().unwrap()]), false);
        assert!(processor.process().is_err());
    }

    #[test]
    fn test_process_rejects_invalid_spec() {
        let temp_dir = TempDir::new().unwrap();
        let mask = temp_dir.path().join("mask.png");
        write_region(&mask, 32, 32);

        let args = parse_crack(&[
            mask.to_str().unwrap(),
            "--min-length",
            "50",
            "--max-length",
            "10",
        ]);
        let mut processor = CrackProcessor::new(args, false);
        assert!(processor.process().is_err());
        assert!(!stencil_output_path(&mask).exists());
    }

    // Tests a mask is turned into a stencil of the same size
    // Verified by writing the stencil under the mask's own name
    #[test]
    fn test_process_single_mask() {
        let temp_dir = TempDir::new().unwrap();
        let mask = temp_dir.path().join("wall_cropped_mask.png");
        write_region(&mask, 64, 48);

        let args = parse_crack(&[mask.to_str().unwrap(), "--min-length", "20", "--max-length", "30"]);
        let mut processor = CrackProcessor::new(args, false);
        processor.process().unwrap();

        let output = temp_dir.path().join("wall_crack_mask.png");
        let stencil = image::open(&output).unwrap().to_luma8();
        assert_eq!(stencil.dimensions(), (64, 48));
        assert!(stencil.pixels().any(|p| p.0[0] == 255));
        // Nothing outside the region
        assert_eq!(stencil.get_pixel(0, 0).0[0], 0);
        assert_eq!(stencil.get_pixel(63, 47).0[0], 0);
    }

    // Tests skip logic when the stencil already exists
    // Verified by removing skip check
    #[test]
    fn test_skip_existing_output() {
        let temp_dir = TempDir::new().unwrap();
        let mask = temp_dir.path().join("mask.png");
        let output = temp_dir.path().join("mask_crack_mask.png");
        write_region(&mask, 32, 32);
        fs::write(&output, "existing").unwrap();

        let mut processor = CrackProcessor::new(parse_crack(&[mask.to_str().unwrap()]), false);
        processor.process().unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "existing");

        let processor = CrackProcessor::new(
            parse_crack(&[mask.to_str().unwrap(), "--no-skip"]),
            false,
        );
        assert_eq!(processor.collect_files().unwrap(), vec![mask]);
    }

    // Tests directory scans skip stencils and non-PNG files
    // Verified by treating stencils as inputs
    #[test]
    fn test_collect_files_from_directory() {
        let temp_dir = TempDir::new().unwrap();
        write_region(&temp_dir.path().join("b.png"), 16, 16);
        write_region(&temp_dir.path().join("a.png"), 16, 16);
        write_region(&temp_dir.path().join("c_crack_mask.png"), 16, 16);
        write_region(&temp_dir.path().join("d_crack_mask_full.png"), 16, 16);
        fs::write(temp_dir.path().join("notes.txt"), "ignore me").unwrap();

        let processor = CrackProcessor::new(
            parse_crack(&[temp_dir.path().to_str().unwrap(), "--no-skip"]),
            false,
        );
        let files = processor.collect_files().unwrap();
        assert_eq!(
            files,
            vec![temp_dir.path().join("a.png"), temp_dir.path().join("b.png")]
        );
    }

    // Tests processing empty directories
    // Verified by adding error for empty directories
    #[test]
    fn test_process_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let mut processor =
            CrackProcessor::new(parse_crack(&[temp_dir.path().to_str().unwrap()]), true);
        assert!(processor.process().is_ok());
    }

    // Tests a crop pasted back unchanged restores the original
    // Verified by pasting at the window's end corner
    #[test]
    fn test_crop_then_paste_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let image_path = temp_dir.path().join("wall.png");
        let mask_path = temp_dir.path().join("wall_mask.png");
        let out_dir = temp_dir.path().join("patches");

        let original = RgbImage::from_fn(40, 30, |x, y| Rgb([(x * 6) as u8, (y * 8) as u8, 90]));
        original.save(&image_path).unwrap();
        let mask = GrayImage::from_fn(40, 30, |x, y| {
            if (10..20).contains(&x) && (5..15).contains(&y) {
                Luma([255])
            } else {
                Luma([0])
            }
        });
        mask.save(&mask_path).unwrap();

        crop_command(&CropArgs {
            image: image_path.clone(),
            mask: mask_path,
            out_dir: out_dir.clone(),
            crop_size: DEFAULT_CROP_SIZE,
            seed: DEFAULT_SEED,
        })
        .unwrap();

        let (patch_path, patch_mask_path, coords_path) = crop_output_paths(&image_path, &out_dir);
        let record = CropRecord::read(&coords_path).unwrap();
        assert_eq!(
            record.crop_coords,
            PixelBox {
                x_start: 10,
                y_start: 5,
                x_end: 20,
                y_end: 15,
            }
        );
        let patch_mask = image::open(&patch_mask_path).unwrap().to_luma8();
        assert_eq!(patch_mask.dimensions(), (10, 10));
        assert!(patch_mask.pixels().all(|p| p.0[0] == 255));

        let output = temp_dir.path().join("restored.png");
        paste_command(&PasteArgs {
            original: image_path,
            patch: patch_path,
            coords: coords_path,
            output: Some(output.clone()),
            stencil: None,
            stencil_output: None,
        })
        .unwrap();

        let restored = image::open(&output).unwrap().to_rgb8();
        assert_eq!(restored, original);
    }

    // Tests a patch-local stencil lands at its window on a full-size canvas
    #[test]
    fn test_paste_reprojects_stencil() {
        let temp_dir = TempDir::new().unwrap();
        let image_path = temp_dir.path().join("wall.png");
        let patch_path = temp_dir.path().join("wall_cropped.png");
        let stencil_path = temp_dir.path().join("wall_cropped_crack.png");
        let coords_path = temp_dir.path().join("wall_crop_coords.json");

        RgbImage::new(20, 20).save(&image_path).unwrap();
        RgbImage::from_pixel(5, 5, Rgb([200, 0, 0]))
            .save(&patch_path)
            .unwrap();
        GrayImage::from_pixel(5, 5, Luma([255]))
            .save(&stencil_path)
            .unwrap();
        CropRecord {
            crop_coords: PixelBox {
                x_start: 2,
                y_start: 3,
                x_end: 7,
                y_end: 8,
            },
        }
        .write(&coords_path)
        .unwrap();

        paste_command(&PasteArgs {
            original: image_path.clone(),
            patch: patch_path,
            coords: coords_path,
            output: None,
            stencil: Some(stencil_path),
            stencil_output: None,
        })
        .unwrap();

        let modified = image::open(modified_output_path(&image_path))
            .unwrap()
            .to_rgb8();
        assert_eq!(*modified.get_pixel(2, 3), Rgb([200, 0, 0]));
        assert_eq!(*modified.get_pixel(7, 8), Rgb([0, 0, 0]));

        let canvas = image::open(reprojected_stencil_path(&image_path))
            .unwrap()
            .to_luma8();
        assert_eq!(canvas.dimensions(), (20, 20));
        assert_eq!(canvas.get_pixel(6, 7).0[0], 255);
        assert_eq!(canvas.get_pixel(1, 3).0[0], 0);
    }

    // Tests the crop, crack and paste chain keeps the patch stencil intact
    // Verified by writing the reprojected stencil under the crack output name
    #[test]
    fn test_crop_crack_paste_chain_keeps_patch_stencil() {
        let temp_dir = TempDir::new().unwrap();
        let image_path = temp_dir.path().join("wall.png");
        let mask_path = temp_dir.path().join("wall_mask.png");
        RgbImage::from_pixel(40, 40, Rgb([120, 120, 120]))
            .save(&image_path)
            .unwrap();
        GrayImage::from_fn(40, 40, |x, y| {
            if (10..30).contains(&x) && (10..30).contains(&y) {
                Luma([255])
            } else {
                Luma([0])
            }
        })
        .save(&mask_path)
        .unwrap();

        crop_command(&CropArgs {
            image: image_path.clone(),
            mask: mask_path,
            out_dir: temp_dir.path().to_path_buf(),
            crop_size: DEFAULT_CROP_SIZE,
            seed: DEFAULT_SEED,
        })
        .unwrap();
        let (patch_path, patch_mask_path, coords_path) =
            crop_output_paths(&image_path, temp_dir.path());

        let mut processor = CrackProcessor::new(
            parse_crack(&[
                patch_mask_path.to_str().unwrap(),
                "--min-length",
                "5",
                "--max-length",
                "10",
            ]),
            false,
        );
        processor.process().unwrap();
        let patch_stencil_path = stencil_output_path(&patch_mask_path);
        let patch_stencil = image::open(&patch_stencil_path).unwrap().to_luma8();
        assert_eq!(patch_stencil.dimensions(), (20, 20));

        paste_command(&PasteArgs {
            original: image_path.clone(),
            patch: patch_path,
            coords: coords_path,
            output: None,
            stencil: Some(patch_stencil_path.clone()),
            stencil_output: None,
        })
        .unwrap();

        let after = image::open(&patch_stencil_path).unwrap().to_luma8();
        assert_eq!(after, patch_stencil);
        let canvas = image::open(reprojected_stencil_path(&image_path))
            .unwrap()
            .to_luma8();
        assert_eq!(canvas.dimensions(), (40, 40));
        assert_ne!(reprojected_stencil_path(&image_path), patch_stencil_path);
    }

    // Tests an explicit stencil output equal to the stencil input is refused
    #[test]
    fn test_paste_refuses_to_overwrite_stencil_input() {
        let temp_dir = TempDir::new().unwrap();
        let image_path = temp_dir.path().join("wall.png");
        let stencil_path = temp_dir.path().join("wall_crack_mask.png");
        let coords_path = temp_dir.path().join("wall_crop_coords.json");
        RgbImage::new(20, 20).save(&image_path).unwrap();
        GrayImage::from_pixel(5, 5, Luma([255]))
            .save(&stencil_path)
            .unwrap();
        fs::write(&coords_path, r#"{"crop_coords": [2, 3, 7, 8]}"#).unwrap();

        let result = paste_command(&PasteArgs {
            original: image_path.clone(),
            patch: image_path.clone(),
            coords: coords_path,
            output: None,
            stencil: Some(stencil_path.clone()),
            stencil_output: Some(stencil_path.clone()),
        });
        assert!(matches!(
            result,
            Err(CrackError::InvalidParameter {
                parameter: "stencil_output",
                ..
            })
        ));
        assert!(!modified_output_path(&image_path).exists());
        let untouched = image::open(&stencil_path).unwrap().to_luma8();
        assert_eq!(untouched.dimensions(), (5, 5));
    }

    // Tests a zero crop size is a parameter error, not an encoder failure
    #[test]
    fn test_crop_rejects_zero_size() {
        let temp_dir = TempDir::new().unwrap();
        let image_path = temp_dir.path().join("wall.png");
        let mask_path = temp_dir.path().join("wall_mask.png");
        RgbImage::new(10, 10).save(&image_path).unwrap();
        write_region(&mask_path, 10, 10);

        let result = crop_command(&CropArgs {
            image: image_path.clone(),
            mask: mask_path,
            out_dir: temp_dir.path().to_path_buf(),
            crop_size: 0,
            seed: DEFAULT_SEED,
        });
        assert!(matches!(
            result,
            Err(CrackError::InvalidParameter {
                parameter: "crop_size",
                ..
            })
        ));
        let (patch_path, _, _) = crop_output_paths(&image_path, temp_dir.path());
        assert!(!patch_path.exists());
    }

    #[test]
    fn test_paste_rejects_window_outside_image() {
        let temp_dir = TempDir::new().unwrap();
        let image_path = temp_dir.path().join("small.png");
        let coords_path = temp_dir.path().join("coords.json");
        RgbImage::new(8, 8).save(&image_path).unwrap();
        fs::write(&coords_path, r#"{"crop_coords": [4, 4, 12, 12]}"#).unwrap();

        let result = paste_command(&PasteArgs {
            original: image_path.clone(),
            patch: image_path,
            coords: coords_path,
            output: Some(temp_dir.path().join("out.png")),
            stencil: None,
            stencil_output: None,
        });
        assert!(result.is_err());
        assert!(!temp_dir.path().join("out.png").exists());
    }

    #[test]
    fn test_guide_command_writes_edge_map() {
        let temp_dir = TempDir::new().unwrap();
        let stencil_path = temp_dir.path().join("wall_crack_mask.png");
        let mut stencil = GrayImage::new(20, 20);
        for y in 8..12 {
            for x in 8..12 {
                stencil.put_pixel(x, y, Luma([255]));
            }
        }
        stencil.save(&stencil_path).unwrap();

        guide_command(&GuideArgs {
            stencil: stencil_path.clone(),
            output: None,
        })
        .unwrap();

        let guide = image::open(guide_output_path(&stencil_path))
            .unwrap()
            .to_luma8();
        assert_eq!(guide.dimensions(), (20, 20));
        assert!((0..9).any(|x| guide.get_pixel(x, 10).0[0] == 255));
        assert_eq!(guide.get_pixel(10, 10).0[0], 0);
    }
}
