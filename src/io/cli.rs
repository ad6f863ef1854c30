//! Command-line interface for crack synthesis and patch compositing

use crate::algorithm::executor::{CrackSpec, CrackSynthesizer};
use crate::collaborators::refiner::guidance_image;
use crate::io::configuration::{
    CROP_COORDS_SUFFIX, CROPPED_IMAGE_SUFFIX, CROPPED_MASK_SUFFIX, DEFAULT_BRANCH_PROB,
    DEFAULT_CROP_SIZE, DEFAULT_MAX_LENGTH, DEFAULT_MAX_RETRIES, DEFAULT_MIN_LENGTH,
    DEFAULT_NUM_CRACKS, DEFAULT_SEED, DEFAULT_THICKNESS_SCALE, FULL_STENCIL_SUFFIX, GUIDE_SUFFIX,
    MODIFIED_SUFFIX, OUTPUT_SUFFIX,
};
use crate::io::error::{Result, invalid_parameter, io_error};
use crate::io::image::{
    load_gray, load_image, load_region_mask, save_gray, save_image, save_stencil,
};
use crate::io::logging;
use crate::io::patch::{CropRecord, paste_patch, random_crop_from_mask, reproject_stencil};
use crate::io::progress::ProgressManager;
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use rand::{SeedableRng, rngs::StdRng};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "crackmask")]
#[command(
    author,
    version,
    about = "Grow procedural crack stencils inside segmented regions"
)]
/// Command-line arguments for the crack tools
pub struct Cli {
    /// Operation to run
    #[command(subcommand)]
    pub command: Command,

    /// Suppress progress output and informational messages
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log every crack as it is grown
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available operations
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Grow crack stencils for a mask PNG or a directory of masks
    Crack(CrackArgs),
    /// Cut a patch around the masked region of an image
    Crop(CropArgs),
    /// Paste a patch back into the full-size image
    Paste(PasteArgs),
    /// Build the guidance edge map for a crack stencil
    Guide(GuideArgs),
}

/// Arguments of the `crack` operation
#[derive(Args, Debug)]
pub struct CrackArgs {
    /// Region mask PNG or directory of region masks
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Number of crack seeds per mask
    #[arg(short, long, default_value_t = DEFAULT_NUM_CRACKS)]
    pub num_cracks: usize,

    /// Shortest main-body length in steps
    #[arg(long, default_value_t = DEFAULT_MIN_LENGTH)]
    pub min_length: usize,

    /// Longest main-body length in steps
    #[arg(long, default_value_t = DEFAULT_MAX_LENGTH)]
    pub max_length: usize,

    /// Probability of each additional branch per seed
    #[arg(short, long, default_value_t = DEFAULT_BRANCH_PROB)]
    pub branch_prob: f64,

    /// Multiplier applied to stroke thickness
    #[arg(short, long, default_value_t = DEFAULT_THICKNESS_SCALE)]
    pub thickness_scale: f64,

    /// Direction changes tried per step before a branch stops
    #[arg(short = 'r', long, default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: usize,

    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Process masks even if their stencil exists
    #[arg(long)]
    pub no_skip: bool,
}

impl CrackArgs {
    /// Synthesis parameters described by these arguments
    pub const fn spec(&self) -> CrackSpec {
        CrackSpec {
            num_cracks: self.num_cracks,
            min_length: self.min_length,
            max_length: self.max_length,
            branch_prob: self.branch_prob,
            thickness_scale: self.thickness_scale,
            max_retries: self.max_retries,
        }
    }

    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }
}

/// Arguments of the `crop` operation
#[derive(Args, Debug)]
pub struct CropArgs {
    /// Full-size image
    pub image: PathBuf,

    /// Binary mask of the target region
    pub mask: PathBuf,

    /// Directory receiving the patch, its mask and the coordinate record
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Edge length of the patch cut from large regions
    #[arg(short, long, default_value_t = DEFAULT_CROP_SIZE)]
    pub crop_size: u32,

    /// Random seed for the crop window
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

/// Arguments of the `paste` operation
#[derive(Args, Debug)]
pub struct PasteArgs {
    /// Full-size image to paste into
    pub original: PathBuf,

    /// Patch to insert
    pub patch: PathBuf,

    /// JSON record written by `crop`
    pub coords: PathBuf,

    /// Output image (defaults to `<original>_modified.<ext>`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Patch-local crack stencil to reproject onto a full-size canvas
    #[arg(long)]
    pub stencil: Option<PathBuf>,

    /// Output of the reprojected stencil (defaults to `<original>_crack_mask_full.png`)
    #[arg(long, requires = "stencil")]
    pub stencil_output: Option<PathBuf>,
}

/// Arguments of the `guide` operation
#[derive(Args, Debug)]
pub struct GuideArgs {
    /// Crack stencil
    pub stencil: PathBuf,

    /// Output edge map (defaults to `<stencil>_guide.png`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Log level implied by the verbosity flags
    pub const fn log_level(&self) -> LevelFilter {
        logging::level_for(self.quiet, self.verbose)
    }

    /// Run the selected operation, installing the console logger first
    ///
    /// # Errors
    ///
    /// Returns an error if the operation fails; see the individual commands
    pub fn run(self) -> Result<()> {
        let level = self.log_level();
        let show_progress = self.should_show_progress();

        match self.command {
            Command::Crack(args) => {
                let mut processor = CrackProcessor::new(args, show_progress);
                logging::init(level, processor.multi_progress());
                processor.process()
            }
            Command::Crop(args) => {
                logging::init(level, None);
                crop_command(&args)
            }
            Command::Paste(args) => {
                logging::init(level, None);
                paste_command(&args)
            }
            Command::Guide(args) => {
                logging::init(level, None);
                guide_command(&args)
            }
        }
    }
}

/// Orchestrates batch crack synthesis with progress tracking
pub struct CrackProcessor {
    args: CrackArgs,
    progress_manager: Option<ProgressManager>,
}

impl CrackProcessor {
    /// Create a processor for the given arguments
    pub fn new(args: CrackArgs, show_progress: bool) -> Self {
        let progress_manager = show_progress.then(ProgressManager::new);

        Self {
            args,
            progress_manager,
        }
    }

    /// Handle for routing log output around the progress bars
    pub fn multi_progress(&self) -> Option<indicatif::MultiProgress> {
        self.progress_manager
            .as_ref()
            .map(|pm| pm.multi_progress().clone())
    }

    /// Synthesize stencils for every selected mask
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The crack parameters are invalid
    /// - The target is neither a PNG file nor a directory
    /// - A mask cannot be read or a stencil cannot be written
    pub fn process(&mut self) -> Result<()> {
        self.args.spec().validate()?;
        let files = self.collect_files()?;

        if files.is_empty() {
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len(), self.args.num_cracks);
        }

        for (index, file) in files.iter().enumerate() {
            self.process_file(file, index)?;
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    /// Masks selected by the target argument, sorted by path
    ///
    /// # Errors
    ///
    /// Returns an error if the target is not a PNG file or a readable directory
    pub fn collect_files(&self) -> Result<Vec<PathBuf>> {
        if self.args.target.is_file() {
            if is_png(&self.args.target) {
                if self.should_process_file(&self.args.target) {
                    Ok(vec![self.args.target.clone()])
                } else {
                    Ok(vec![])
                }
            } else {
                Err(io_error("Target file must be a PNG image"))
            }
        } else if self.args.target.is_dir() {
            let mut files = Vec::new();
            for entry in std::fs::read_dir(&self.args.target)? {
                let path = entry?.path();
                if is_png(&path) && !is_stencil_output(&path) && self.should_process_file(&path) {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(io_error("Target must be a PNG file or directory"))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.args.skip_existing() {
            return true;
        }

        let output_path = stencil_output_path(input_path);
        if output_path.exists() {
            log::info!("Skipping: {} (output exists)", input_path.display());
            false
        } else {
            true
        }
    }

    fn process_file(&mut self, input_path: &Path, index: usize) -> Result<()> {
        let start_time = Instant::now();
        let output_path = stencil_output_path(input_path);
        let spec = self.args.spec();

        let region = load_region_mask(input_path)?;
        let mut synthesizer = CrackSynthesizer::new(&region, spec, self.args.seed)?;

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_mask(index, input_path, spec.num_cracks);
        }

        while synthesizer.grow_next_crack() {
            if let Some(ref mut pm) = self.progress_manager {
                pm.record_cracks(
                    index,
                    synthesizer.cracks_processed(),
                    synthesizer.report().cracks_skipped,
                );
            }
        }

        let (stencil, report) = synthesizer.finish();
        save_stencil(&stencil, &output_path)?;

        log::info!(
            "Crack mask saved to {} ({}/{} cracks, {} branches, {:.2?})",
            output_path.display(),
            report.cracks_grown,
            report.cracks_requested,
            report.growth.branches,
            start_time.elapsed()
        );

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_mask(index);
        }

        Ok(())
    }
}

fn is_png(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("png")
}

fn is_stencil_output(path: &Path) -> bool {
    path.file_stem().is_some_and(|stem| {
        let stem = stem.to_string_lossy();
        stem.ends_with(OUTPUT_SUFFIX) || stem.ends_with(FULL_STENCIL_SUFFIX)
    })
}

fn sibling_path(input_path: &Path, file_name: String) -> PathBuf {
    if let Some(parent) = input_path.parent() {
        parent.join(file_name)
    } else {
        PathBuf::from(file_name)
    }
}

/// Where the stencil for a mask is written
///
/// A trailing `_cropped_mask` is dropped from the stem so that a mask cut
/// by `crop` yields `<image>_crack_mask.png`.
pub fn stencil_output_path(input_path: &Path) -> PathBuf {
    let stem = input_path.file_stem().unwrap_or_default().to_string_lossy();
    let base = stem
        .strip_suffix(CROPPED_MASK_SUFFIX)
        .unwrap_or(stem.as_ref());
    sibling_path(input_path, format!("{base}{OUTPUT_SUFFIX}.png"))
}

/// Where a composited image is written when no output is given
pub fn modified_output_path(original: &Path) -> PathBuf {
    let stem = original.file_stem().unwrap_or_default().to_string_lossy();
    let extension = original.extension().map_or_else(
        || "png".to_string(),
        |ext| ext.to_string_lossy().to_string(),
    );
    sibling_path(original, format!("{stem}{MODIFIED_SUFFIX}.{extension}"))
}

/// Where a reprojected stencil is written when no output is given
///
/// The name differs from [`stencil_output_path`] so the patch stencil that
/// `crack` wrote next to the image survives the paste.
pub fn reprojected_stencil_path(original: &Path) -> PathBuf {
    let stem = original.file_stem().unwrap_or_default().to_string_lossy();
    sibling_path(original, format!("{stem}{FULL_STENCIL_SUFFIX}.png"))
}

/// Where a guidance edge map is written when no output is given
pub fn guide_output_path(stencil: &Path) -> PathBuf {
    let stem = stencil.file_stem().unwrap_or_default().to_string_lossy();
    sibling_path(stencil, format!("{stem}{GUIDE_SUFFIX}.png"))
}

/// Output paths of a crop: (`image`, `mask`, `coords`)
pub fn crop_output_paths(image: &Path, out_dir: &Path) -> (PathBuf, PathBuf, PathBuf) {
    let stem = image.file_stem().unwrap_or_default().to_string_lossy();
    (
        out_dir.join(format!("{stem}{CROPPED_IMAGE_SUFFIX}.png")),
        out_dir.join(format!("{stem}{CROPPED_MASK_SUFFIX}.png")),
        out_dir.join(format!("{stem}{CROP_COORDS_SUFFIX}.json")),
    )
}

/// Cut a patch around the masked region and record where it came from
///
/// # Errors
///
/// Returns an error if an input cannot be read, the mask is empty or does
/// not match the image, or an output cannot be written
pub fn crop_command(args: &CropArgs) -> Result<()> {
    if args.crop_size < 1 {
        return Err(invalid_parameter(
            "crop_size",
            &args.crop_size,
            &"must be at least 1",
        ));
    }

    let image = load_image(&args.image)?;
    let mask = load_gray(&args.mask)?;
    let mut rng = StdRng::seed_from_u64(args.seed);

    let crop = random_crop_from_mask(&image, &mask, args.crop_size, &mut rng)?;

    let (image_path, mask_path, coords_path) = crop_output_paths(&args.image, &args.out_dir);

    save_image(&crop.image, &image_path)?;
    save_gray(&crop.mask, &mask_path)?;
    CropRecord {
        crop_coords: crop.window,
    }
    .write(&coords_path)?;

    log::info!("Cropped image saved to {}", image_path.display());
    log::info!("Cropped mask saved to {}", mask_path.display());
    log::info!(
        "Crop coordinates {:?} saved to {}",
        <[u32; 4]>::from(crop.window),
        coords_path.display()
    );
    Ok(())
}

/// Paste a patch (and optionally its stencil) back at its recorded window
///
/// # Errors
///
/// Returns an error if an input cannot be read, the record does not fit
/// the original image, or an output cannot be written
pub fn paste_command(args: &PasteArgs) -> Result<()> {
    let stencil = args.stencil.as_ref().map(|input| {
        let output = args
            .stencil_output
            .clone()
            .unwrap_or_else(|| reprojected_stencil_path(&args.original));
        (input, output)
    });
    if let Some((input, output)) = &stencil {
        if *input == output {
            return Err(invalid_parameter(
                "stencil_output",
                &output.display(),
                &"would overwrite the patch stencil being reprojected",
            ));
        }
    }

    let original = load_image(&args.original)?;
    let patch = load_image(&args.patch)?;
    let record = CropRecord::read(&args.coords)?;

    let composited = paste_patch(&original, &patch, &record.crop_coords)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| modified_output_path(&args.original));
    save_image(&composited, &output)?;
    log::info!(
        "Modified image saved to {} (region {:?})",
        output.display(),
        <[u32; 4]>::from(record.crop_coords)
    );

    if let Some((stencil_path, stencil_output)) = stencil {
        let patch_stencil = load_gray(stencil_path)?;
        let canvas = reproject_stencil(
            &patch_stencil,
            &record.crop_coords,
            original.width(),
            original.height(),
        )?;
        save_gray(&canvas, &stencil_output)?;
        log::info!("Full-size stencil saved to {}", stencil_output.display());
    }

    Ok(())
}

/// Write the guidance edge map for a stencil
///
/// # Errors
///
/// Returns an error if the stencil cannot be read or the map cannot be written
pub fn guide_command(args: &GuideArgs) -> Result<()> {
    let stencil = load_gray(&args.stencil)?;
    let guide = guidance_image(&stencil);
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| guide_output_path(&args.stencil));
    save_gray(&guide, &output)?;
    log::info!("Guidance image saved to {}", output.display());
    Ok(())
}
