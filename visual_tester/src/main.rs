use anyhow::{Context, bail};
use chroma_vision::core_modules::colour_limits::{HsvLimits, hsv_limits};
use chroma_vision::{BoundingBox, ClusterConfig, RegionPipeline};
use clap::Parser;
use log::{info, warn};
use opencv::{
    core::{self, Mat, Point, Rect, Scalar, Vector},
    highgui, imgproc,
    prelude::*,
    videoio::{self, VideoCapture, VideoWriter},
};

const WINDOW_NAME: &str = "live_cam";
const QUIT_KEY: i32 = b'q' as i32;

/// Live colour tracker: masks one colour, boxes its contours and draws the merged regions.
#[derive(Parser, Debug)]
#[command(name = "visual_tester", long_about = None)]
struct Args {
    /// Camera index to capture from (ignored when --input is given)
    #[arg(long, default_value_t = 0)]
    camera: i32,

    /// Read frames from a video file instead of a camera
    #[arg(long)]
    input: Option<String>,

    /// Also write the annotated frames to this video file
    #[arg(long)]
    output: Option<String>,

    /// Target colour as B,G,R
    #[arg(long, value_delimiter = ',', default_value = "0,255,255")]
    colour: Vec<u8>,

    /// Minimum box area in px² (defaults to CHROMA_MIN_AREA or 100)
    #[arg(long)]
    min_area: Option<i64>,

    /// Merge gap in px (defaults to CHROMA_MERGE_GAP or 20)
    #[arg(long)]
    merge_gap: Option<i32>,

    /// Cap on boxes clustered per frame
    #[arg(long)]
    max_boxes: Option<usize>,

    /// Re-cluster each frame until no two regions are mergeable
    #[arg(long)]
    settle_regions: bool,

    /// Do not open a preview window
    #[arg(long)]
    headless: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    // --- 1. Configuration ---
    let mut config = ClusterConfig::from_env()?;
    if let Some(min_area) = args.min_area {
        config.minimum_area = min_area;
    }
    if let Some(merge_gap) = args.merge_gap {
        config.merge_gap = merge_gap;
    }
    if args.max_boxes.is_some() {
        config.max_boxes = args.max_boxes;
    }
    if args.settle_regions {
        config.settle_regions = true;
    }
    let mut pipeline = RegionPipeline::new(config)?;

    let [b, g, r] = <[u8; 3]>::try_from(args.colour.as_slice()).context("--colour takes exactly three values")?;
    let limits = hsv_limits([b, g, r]);
    info!("tracking BGR ({b}, {g}, {r}) with HSV limits {:?}..={:?}", limits.lower, limits.upper);

    // --- 2. Video I/O Initialization ---
    let mut cap = match &args.input {
        Some(path) => VideoCapture::from_file(path, videoio::CAP_ANY)?,
        None => VideoCapture::new(args.camera, videoio::CAP_ANY)?,
    };
    if !cap.is_opened()? {
        bail!("could not open video source");
    }

    let mut writer = match &args.output {
        Some(path) => {
            let width = cap.get(videoio::CAP_PROP_FRAME_WIDTH)? as i32;
            let height = cap.get(videoio::CAP_PROP_FRAME_HEIGHT)? as i32;
            let fps = cap.get(videoio::CAP_PROP_FPS)?;
            let fourcc = VideoWriter::fourcc('m', 'p', '4', 'v')?;
            let fps = if fps > 0.0 { fps } else { 30.0 };
            Some(VideoWriter::new(path, fourcc, fps, core::Size::new(width, height), true)?)
        }
        None => None,
    };

    // --- 3. Main Processing Loop ---
    let mut frame = Mat::default();
    loop {
        match cap.read(&mut frame) {
            Ok(true) if !frame.empty() => {}
            Ok(_) => break,
            Err(e) => {
                warn!("error reading frame: {e}");
                break;
            }
        }

        // --- 4. Detection: colour mask -> contours -> boxes ---
        let raw_boxes = detect_boxes(&frame, &limits)?;

        // --- 5. Region clustering ---
        let report = pipeline.process_frame(raw_boxes)?;

        // --- 6. Visualization ---
        for region in &report.regions {
            let rect = Rect::new(region.x, region.y, region.w, region.h);
            imgproc::rectangle(&mut frame, rect, Scalar::new(0.0, 255.0, 255.0, 0.0), 2, imgproc::LINE_8, 0)?;
        }

        if let Some(writer) = writer.as_mut() {
            writer.write(&frame)?;
        }

        if !args.headless {
            highgui::imshow(WINDOW_NAME, &frame)?;
            if (highgui::wait_key(1)? & 0xFF) == QUIT_KEY {
                break;
            }
        }
    }

    info!("processed {} frames", pipeline.frames_processed());
    cap.release()?;
    if !args.headless {
        highgui::destroy_all_windows()?;
    }
    Ok(())
}

/// Bounding boxes of the external contours of the colour mask, in contour order.
fn detect_boxes(frame: &Mat, limits: &HsvLimits) -> opencv::Result<Vec<BoundingBox>> {
    let mut hsv_frame = Mat::default();
    imgproc::cvt_color(frame, &mut hsv_frame, imgproc::COLOR_BGR2HSV, 0)?;

    let lower = hsv_scalar(limits.lower);
    let upper = hsv_scalar(limits.upper);
    let mut mask = Mat::default();
    core::in_range(&hsv_frame, &lower, &upper, &mut mask)?;

    let mut contours: Vector<Vector<Point>> = Vector::new();
    imgproc::find_contours(
        &mask,
        &mut contours,
        imgproc::RETR_EXTERNAL,
        imgproc::CHAIN_APPROX_SIMPLE,
        Point::new(0, 0),
    )?;

    contours
        .iter()
        .map(|contour| {
            let rect = imgproc::bounding_rect(&contour)?;
            Ok(BoundingBox {
                x: rect.x,
                y: rect.y,
                w: rect.width,
                h: rect.height,
            })
        })
        .collect()
}

fn hsv_scalar(hsv: [u8; 3]) -> Scalar {
    Scalar::new(f64::from(hsv[0]), f64::from(hsv[1]), f64::from(hsv[2]), 0.0)
}
