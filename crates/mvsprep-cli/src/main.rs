use argh::FromArgs;
use std::path::PathBuf;

use mvsprep::{
    config::{load_grid, GenerationConfig},
    depth::{convert_disparity_pfm, depth_from_settings},
    geometry::camera::deduce_fovx,
    io::settings::read_generation_settings,
    pipeline::{build_calibration, generate_cams_dir},
};

#[derive(FromArgs)]
/// Prepare MVSNet camera directories for a grid camera rig
struct Args {
    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Cams(CamsArgs),
    Disp2Depth(Disp2DepthArgs),
    Info(InfoArgs),
}

#[derive(FromArgs)]
/// Generate the camera files, pair.txt and generation_settings.json
#[argh(subcommand, name = "cams")]
struct CamsArgs {
    /// directory to create
    #[argh(option, short = 'o')]
    cams_dir: PathBuf,

    /// JSON configuration file, flags override its values
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// JSON file holding the camera grid rows (default: 4x4 ReVeRy layout)
    #[argh(option, short = 'g')]
    grid: Option<PathBuf>,

    /// maximum number of neighbours per camera (default: 10)
    #[argh(option, short = 'n')]
    max_neighbours: Option<usize>,

    /// minimum neighbour score, 1.0 keeps the adjacent cameras only (default: 1.0)
    #[argh(option, short = 'm')]
    min_score: Option<f64>,

    /// distance between two adjacent cameras (default: 0.3)
    #[argh(option, short = 'b')]
    baseline: Option<f64>,

    /// vertical field of view in degrees (default: 60)
    #[argh(option, short = 'f')]
    fovy: Option<f64>,

    /// image width in pixels (default: 1920)
    #[argh(option, short = 'W')]
    image_width: Option<u32>,

    /// image height in pixels (default: 1080)
    #[argh(option, short = 'H')]
    image_height: Option<u32>,

    /// smallest depth hypothesis (default: 1.0)
    #[argh(option, short = 'd')]
    depth_min: Option<f64>,

    /// distance between two depth hypotheses (default: 0.5)
    #[argh(option, short = 'i')]
    depth_interval: Option<f64>,
}

#[derive(FromArgs)]
/// Convert disparities to depths with the settings of a cams directory
#[argh(subcommand, name = "disp2depth")]
struct Disp2DepthArgs {
    /// generation_settings.json of the cams directory
    #[argh(option, short = 's')]
    settings: PathBuf,

    /// a single disparity value to convert
    #[argh(option, short = 'd')]
    disparity: Option<f64>,

    /// disparity map to convert (PFM)
    #[argh(option, short = 'i')]
    input: Option<PathBuf>,

    /// depth map to write (PFM)
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,
}

#[derive(FromArgs)]
/// Print the rig layout, the intrinsics and the neighbours of a configuration
#[argh(subcommand, name = "info")]
struct InfoArgs {
    /// JSON configuration file
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// JSON file holding the camera grid rows
    #[argh(option, short = 'g')]
    grid: Option<PathBuf>,
}

fn load_config(
    config: Option<&PathBuf>,
    grid: Option<&PathBuf>,
) -> Result<GenerationConfig, Box<dyn std::error::Error>> {
    let mut config = match config {
        Some(path) => GenerationConfig::from_json_file(path)?,
        None => GenerationConfig::default(),
    };
    if let Some(path) = grid {
        config.grid = load_grid(path)?;
    }
    Ok(config)
}

fn run_cams(args: CamsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(args.config.as_ref(), args.grid.as_ref())?;

    if let Some(v) = args.max_neighbours {
        config.max_neighbours = v;
    }
    if let Some(v) = args.min_score {
        config.min_neighbour_score = v;
    }
    if let Some(v) = args.baseline {
        config.baseline = v;
    }
    if let Some(v) = args.fovy {
        config.fovy_degrees = v;
    }
    if let Some(v) = args.image_width {
        config.image_width = v;
    }
    if let Some(v) = args.image_height {
        config.image_height = v;
    }
    if let Some(v) = args.depth_min {
        config.depth_min = v;
    }
    if let Some(v) = args.depth_interval {
        config.depth_interval = v;
    }

    log::info!("camera layout:\n{}", config.grid);

    let files = generate_cams_dir(&args.cams_dir, &config)?;
    log::info!(
        "generated {} camera files, {} and {}",
        files.cam_files.len(),
        files.pair_file.display(),
        files.settings_file.display()
    );

    Ok(())
}

/// The disparity map to convert and where to write its depth map, if any.
fn map_paths(args: &Disp2DepthArgs) -> Result<Option<(&PathBuf, &PathBuf)>, &'static str> {
    match (&args.input, &args.output) {
        (Some(input), Some(output)) => Ok(Some((input, output))),
        (Some(_), None) => Err("--input requires --output"),
        (None, Some(_)) => Err("--output requires --input"),
        (None, None) if args.disparity.is_none() => {
            Err("nothing to convert, pass --disparity or --input")
        }
        (None, None) => Ok(None),
    }
}

fn run_disp2depth(args: Disp2DepthArgs) -> Result<(), Box<dyn std::error::Error>> {
    let paths = map_paths(&args)?;

    let settings = read_generation_settings(&args.settings)?;
    log::info!("disparity numerator: {}", settings.disparity_numerator);

    if let Some(disparity) = args.disparity {
        let depth = depth_from_settings(&settings, disparity)?;
        println!("disparity={disparity}");
        println!("depth={depth}");
    }

    if let Some((input, output)) = paths {
        convert_disparity_pfm(&settings, input, output)?;
    }

    Ok(())
}

fn run_info(args: InfoArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(args.config.as_ref(), args.grid.as_ref())?;
    let calibration = build_calibration(&config)?;

    let fovx = deduce_fovx(config.fovy(), config.image_width, config.image_height);

    println!("camera layout:\n{}", config.grid);
    println!("image size: {}x{}px", config.image_width, config.image_height);
    println!(
        "fovy: {:.6} rad ({} deg)",
        config.fovy(),
        config.fovy_degrees
    );
    println!("fovx: {:.6} rad ({:.3} deg)", fovx, fovx.to_degrees());
    println!("baseline: {}", config.baseline);
    println!("intrinsic:");
    for row in calibration.intrinsic.matrix() {
        println!("  {:>12.3} {:>12.3} {:>12.3}", row[0], row[1], row[2]);
    }
    println!(
        "disparity numerator: {}",
        calibration.settings.disparity_numerator
    );
    println!("neighbours:");
    for list in &calibration.neighbours {
        let ids = list
            .neighbours
            .iter()
            .map(|n| n.id.to_string())
            .collect::<Vec<_>>();
        println!("  {:>3}: [{}]", list.camera_id, ids.join(", "));
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();

    match args.command {
        Command::Cams(args) => run_cams(args),
        Command::Disp2Depth(args) => run_disp2depth(args),
        Command::Info(args) => run_info(args),
    }
}
