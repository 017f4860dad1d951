use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use asl_recog_rs::{
    DetectionDecoder, ForestClassifier, Labels, RecognizerConfig, Suppressor,
};

#[derive(Debug, Parser)]
#[command(name = "asl-recog", version, about = "ASL hand-shape detection and classification")]
struct Cli {
    /// TOML config; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the structure of a forest description.
    Inspect {
        #[arg(long)]
        forest: Option<PathBuf>,
    },
    /// Classify one landmark feature vector.
    Classify {
        #[arg(long)]
        forest: Option<PathBuf>,
        #[arg(long)]
        labels: Option<PathBuf>,
        #[arg(required = true, allow_negative_numbers = true)]
        features: Vec<f32>,
    },
    /// Decode and suppress a raw detector output (little-endian f32).
    Detect {
        #[arg(long)]
        tensor: PathBuf,
        #[arg(long)]
        width: u32,
        #[arg(long)]
        height: u32,
        #[arg(long)]
        labels: Option<PathBuf>,
        /// Overrides `detector.num_anchors`.
        #[arg(long)]
        anchors: Option<usize>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let cfg = match &cli.config {
        Some(path) => RecognizerConfig::load(path).context("load config")?,
        None => RecognizerConfig::default(),
    };

    match cli.cmd {
        Command::Inspect { forest } => inspect(&cfg, forest),
        Command::Classify {
            forest,
            labels,
            features,
        } => classify(&cfg, forest, labels, &features),
        Command::Detect {
            tensor,
            width,
            height,
            labels,
            anchors,
        } => detect(&cfg, &tensor, width, height, labels, anchors),
    }
}

fn load_forest(cfg: &RecognizerConfig, forest: Option<PathBuf>) -> Result<ForestClassifier> {
    let path = forest
        .or_else(|| cfg.classifier.forest_path.clone())
        .context("no forest given; pass --forest or set classifier.forest_path")?;
    ForestClassifier::load(&path).with_context(|| format!("load forest {}", path.display()))
}

fn inspect(cfg: &RecognizerConfig, forest: Option<PathBuf>) -> Result<()> {
    let forest = load_forest(cfg, forest)?;
    println!(
        "trees={} classes={}",
        forest.num_trees(),
        forest.num_classes()
    );
    for (i, tree) in forest.trees().iter().enumerate() {
        println!("tree {} nodes={} depth={}", i, tree.node_count(), tree.depth());
    }
    Ok(())
}

fn classify(
    cfg: &RecognizerConfig,
    forest: Option<PathBuf>,
    labels: Option<PathBuf>,
    features: &[f32],
) -> Result<()> {
    let forest = load_forest(cfg, forest)?;
    let class_index = forest.predict(features)?;
    match labels.or_else(|| cfg.classifier.labels_path.clone()) {
        Some(path) => {
            let labels = Labels::load(&path)?;
            println!("{} {}", class_index, labels.get(class_index)?);
        }
        None => println!("{}", class_index),
    }
    Ok(())
}

fn detect(
    cfg: &RecognizerConfig,
    tensor: &Path,
    width: u32,
    height: u32,
    labels: Option<PathBuf>,
    anchors: Option<usize>,
) -> Result<()> {
    let bytes = std::fs::read(tensor).with_context(|| format!("read {}", tensor.display()))?;
    anyhow::ensure!(bytes.len() % 4 == 0, "tensor file is not a whole number of f32 values");
    let raw: Vec<f32> = bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    let labels = match labels.or_else(|| cfg.labels_path.clone()) {
        Some(path) => Labels::load(&path)?,
        None => Labels::new((0..cfg.detector.num_classes).map(|i| i.to_string()).collect()),
    };
    let num_anchors = anchors.unwrap_or(cfg.detector.num_anchors);
    let decoder = DetectionDecoder::new(
        cfg.detector.num_classes,
        cfg.detector.confidence_threshold,
        labels,
    );
    let candidates = decoder.decode(&raw, num_anchors, width, height)?;
    let kept = Suppressor::new(cfg.detector.iou_threshold).apply(candidates);
    info!(kept = kept.len(), "detect: done");

    for b in kept {
        println!(
            "{} {:.3} [{:.1}, {:.1}, {:.1}, {:.1}]",
            b.class_name, b.confidence, b.x1, b.y1, b.x2, b.y2
        );
    }
    Ok(())
}
