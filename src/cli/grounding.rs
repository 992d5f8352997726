// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

use super::args::{parse_bbox, ConnectionArgs};
use crate::grounding::{center_region, quadrants, GroundingProcessor, RegionText};
use crate::layout::{BBox, Category};
use crate::vision::load_image;

/// Predefined region sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RegionPreset {
    /// Four equal quadrants
    Quadrants,
    /// Middle half of the page
    Center,
}

/// Arguments for the grounding command
#[derive(Args, Debug)]
pub struct GroundingArgs {
    pub image: PathBuf,

    /// Region x1,y1,x2,y2 (repeatable)
    #[arg(long = "bbox", value_parser = parse_bbox, allow_hyphen_values = true)]
    pub bboxes: Vec<BBox>,

    /// Use a predefined region set instead of --bbox
    #[arg(long, value_enum, conflicts_with = "bboxes")]
    pub preset: Option<RegionPreset>,

    /// Detect layout first, then read each region of these categories
    #[arg(long, conflicts_with_all = ["bboxes", "preset"])]
    pub detect: bool,

    /// Categories for --detect (default: Text, Title, Table, Formula)
    #[arg(long = "category", requires = "detect")]
    pub categories: Vec<String>,

    /// Also draw the regions onto a copy of the image
    #[arg(long)]
    pub visualize: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

pub async fn run_grounding(args: GroundingArgs) -> Result<()> {
    let processor = GroundingProcessor::new(args.connection.build_parser()?);

    let regions: Vec<RegionText> = if args.detect {
        let categories: Vec<Category> = args.categories.iter().map(|c| Category::from(c.as_str())).collect();
        let targets = (!categories.is_empty()).then_some(categories.as_slice());
        processor.detect_then_ocr(&args.image, targets).await?
    } else {
        let bboxes = match args.preset {
            Some(preset) => {
                let (image, _) = load_image(&args.image)?;
                let (w, h) = (image.width(), image.height());
                match preset {
                    RegionPreset::Quadrants => quadrants(w, h).to_vec(),
                    RegionPreset::Center => vec![center_region(w, h)],
                }
            }
            None => args.bboxes.clone(),
        };
        if bboxes.is_empty() {
            return Err(anyhow!("give at least one --bbox, a --preset, or --detect"));
        }
        processor.ocr_multiple_regions(&args.image, &bboxes).await
    };

    for (i, region) in regions.iter().enumerate() {
        println!("\n🔎 {} {:?}", region.label(i), region.bbox);
        if region.text.is_empty() {
            println!("  (no text)");
        } else {
            println!("  {}", region.text.replace('\n', "\n  "));
        }
    }

    let (json, txt) = processor.save_results(&args.image, &regions, None)?;
    println!("\n💾 Results: {} / {}", json.display(), txt.display());
    if args.visualize {
        let image = processor.visualize_regions(&args.image, &regions, None)?;
        println!("🖼️  Visualization: {}", image.display());
    }
    Ok(())
}
