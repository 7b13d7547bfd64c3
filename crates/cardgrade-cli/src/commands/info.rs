use std::path::PathBuf;

use anyhow::Result;
use cardgrade_core::config::RectifyConfig;
use cardgrade_core::io::load_rgba;
use cardgrade_core::quad::CropQuad;
use cardgrade_core::rectify::output_size;
use clap::Args;

#[derive(Args)]
pub struct InfoArgs {
    /// Input card photo
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let img = load_rgba(&args.file)?;
    let (w, h) = img.dimensions();
    let quad = CropQuad::default();
    let extent = quad.extent(w, h);

    println!("File:          {}", args.file.display());
    println!("Dimensions:    {}x{}", w, h);
    println!("Megapixels:    {:.1}", (w as f64 * h as f64) / 1.0e6);
    println!(
        "Default crop:  {:.0}x{:.0} px",
        extent.width, extent.height
    );
    match output_size(&quad, w, h, &RectifyConfig::default()) {
        Ok(size) => println!("Rectified:     {}x{}", size.width, size.height),
        Err(e) => println!("Rectified:     unavailable ({})", e.user_message()),
    }

    Ok(())
}
