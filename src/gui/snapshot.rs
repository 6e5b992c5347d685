use super::theme::ThemeColors;
use super::view::{self, DialStyle};
use crate::config::DialConfig;
use crate::dial::{DialGeometry, Size, Value};
use cairo::{Context, Format, ImageSurface};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Cairo(#[from] cairo::Error),
    #[error(transparent)]
    Png(#[from] cairo::IoError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Draws the dial offscreen at the configured size.
pub fn render(config: &DialConfig, value: Value) -> Result<ImageSurface, SnapshotError> {
    let surface = ImageSurface::create(Format::ARgb32, config.size, config.size)?;
    {
        let cr = Context::new(&surface)?;
        let side = config.size as f64;
        let geometry = DialGeometry::from_size(Size::new(side, side), config.inset);
        view::draw(
            &cr,
            &geometry,
            value,
            &DialStyle::from_config(config),
            &ThemeColors::default(),
        )?;
    }
    surface.flush();
    Ok(surface)
}

pub fn write_png(path: &Path, config: &DialConfig, value: Value) -> Result<(), SnapshotError> {
    let surface = render(config, value)?;
    let mut file = fs_err::File::create(path)?;
    surface.write_to_png(&mut file)?;
    log::info!("Wrote {}x{} snapshot to {}", config.size, config.size, path.display());
    Ok(())
}
