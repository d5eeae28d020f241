use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};
use tracing::info;

use crate::error::Result;
use crate::grid::Material;
use crate::tilemap::Tilemap;

/// Spectral colormap (matplotlib style): dark blue -> cyan -> green -> yellow -> orange -> red
fn spectral_colormap(t: f64) -> [u8; 3] {
    let colors: [[f64; 3]; 11] = [
        [0.37, 0.31, 0.64],
        [0.20, 0.53, 0.74],
        [0.40, 0.76, 0.65],
        [0.67, 0.87, 0.64],
        [0.90, 0.96, 0.60],
        [1.00, 1.00, 0.75],
        [1.00, 0.88, 0.55],
        [0.99, 0.68, 0.38],
        [0.96, 0.43, 0.26],
        [0.84, 0.24, 0.31],
        [0.62, 0.00, 0.26],
    ];

    let t_scaled = t.clamp(0.0, 1.0) * 10.0;
    let idx = (t_scaled as usize).min(9);
    let frac = t_scaled - idx as f64;

    let c1 = colors[idx];
    let c2 = colors[idx + 1];

    [
        ((c1[0] + (c2[0] - c1[0]) * frac) * 255.0) as u8,
        ((c1[1] + (c2[1] - c1[1]) * frac) * 255.0) as u8,
        ((c1[2] + (c2[2] - c1[2]) * frac) * 255.0) as u8,
    ]
}

/// Render a normalized elevation map. Values are clamped to `[0, 1]`.
pub fn render_normalized(map: &Tilemap<f64>) -> RgbImage {
    let mut img: RgbImage = ImageBuffer::new(map.width as u32, map.height as u32);
    for (x, y, &val) in map.iter() {
        img.put_pixel(x as u32, y as u32, Rgb(spectral_colormap(val)));
    }
    img
}

/// Flat two-tone rendering of a material map.
pub fn render_materials(map: &Tilemap<Material>) -> RgbImage {
    let mut img: RgbImage = ImageBuffer::new(map.width as u32, map.height as u32);
    for (x, y, material) in map.iter() {
        let color = match material {
            Material::Water => [40, 80, 160],
            Material::Land => [110, 150, 80],
            Material::Air => [220, 230, 240],
        };
        img.put_pixel(x as u32, y as u32, Rgb(color));
    }
    img
}

/// Write a normalized elevation map as a PNG (format follows the extension).
pub fn export_normalized<P: AsRef<Path>>(map: &Tilemap<f64>, path: P) -> Result<()> {
    render_normalized(map).save(path.as_ref())?;
    info!(path = %path.as_ref().display(), "exported elevation image");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colormap_endpoints() {
        assert_eq!(spectral_colormap(0.0), [94, 79, 163]);
        assert_eq!(spectral_colormap(-3.0), spectral_colormap(0.0));
        assert_eq!(spectral_colormap(1.0), spectral_colormap(2.0));
    }

    #[test]
    fn test_export_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("elevation.png");
        let map = Tilemap::from_fn(4, 3, |x, y| (x + y) as f64 / 5.0);

        export_normalized(&map, &path).unwrap();
        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (4, 3));
    }
}
