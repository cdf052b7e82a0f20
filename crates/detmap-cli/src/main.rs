use std::path::{Path, PathBuf};

use clap::Parser;
use detmap_rs::{labels, Detection, GroundTruth, MapEval, Params};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "detmap-eval")]
#[command(
    about = "Compute mean average precision for object detections against labeled ground truth"
)]
struct Cli {
    /// Path to ground truth: a JSON array or a directory of YOLO-format label files
    #[arg(long)]
    gt: PathBuf,

    /// Path to detections: a JSON array or a directory of YOLO-format label files
    #[arg(long)]
    dt: PathBuf,

    /// IoU threshold for matching
    #[arg(long, default_value_t = 0.5)]
    iou_threshold: f64,

    /// Ignore category identity when selecting candidate detections
    #[arg(long)]
    class_agnostic: bool,

    /// Image width for converting normalized label coordinates
    #[arg(long, default_value_t = 640)]
    img_width: u32,

    /// Image height for converting normalized label coordinates
    #[arg(long, default_value_t = 640)]
    img_height: u32,
}

fn load_ground_truths(path: &Path, img_size: (u32, u32)) -> detmap_rs::Result<Vec<GroundTruth>> {
    if path.is_dir() {
        labels::load_ground_truth_dir(path, img_size)
    } else {
        labels::load_ground_truths_json(path)
    }
}

fn load_detections(path: &Path, img_size: (u32, u32)) -> detmap_rs::Result<Vec<Detection>> {
    if path.is_dir() {
        labels::load_detection_dir(path, img_size)
    } else {
        labels::load_detections_json(path)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let img_size = (cli.img_width, cli.img_height);

    eprintln!("Loading ground truth from {:?}...", cli.gt);
    let ground_truths = load_ground_truths(&cli.gt, img_size)?;

    eprintln!("Loading detections from {:?}...", cli.dt);
    let detections = load_detections(&cli.dt, img_size)?;

    let mut params = Params::new();
    params.iou_threshold = cli.iou_threshold;
    params.class_agnostic = cli.class_agnostic;

    let mut map_eval = MapEval::new(detections, ground_truths, params);

    eprintln!("Evaluating...");
    map_eval.evaluate()?;

    map_eval.summarize();

    // Print a machine-readable line for parity testing
    if let Some(ref eval) = map_eval.eval {
        println!("map: {:.15}", eval.map);
    }

    Ok(())
}
