//! ASCII rendering of terrain layers
//!
//! Each cell becomes one character, each row one line.

use crate::grid::Material;
use crate::tilemap::Tilemap;

/// Low to high, for normalized elevations in `[0, 1]`.
const HEIGHT_CHARS: &[char] = &['.', '-', '=', '+', '*', '#', '%', '^', 'A', 'M'];

/// Character for a normalized elevation. Anything below zero renders as water.
pub fn height_char(normalized: f64) -> char {
    if normalized < 0.0 {
        return '~';
    }
    let idx = (normalized.min(1.0) * (HEIGHT_CHARS.len() - 1) as f64) as usize;
    HEIGHT_CHARS[idx.min(HEIGHT_CHARS.len() - 1)]
}

pub fn material_char(material: Material) -> char {
    match material {
        Material::Water => '~',
        Material::Land => '#',
        Material::Air => ' ',
    }
}

fn render_with<T: Clone>(map: &Tilemap<T>, mut to_char: impl FnMut(&T) -> char) -> String {
    let mut result = String::with_capacity((map.width + 1) * map.height);

    for y in 0..map.height {
        for x in 0..map.width {
            result.push(to_char(map.get(x, y)));
        }
        result.push('\n');
    }

    result
}

/// Render a normalized elevation map.
pub fn render_normalized(map: &Tilemap<f64>) -> String {
    render_with(map, |&v| height_char(v))
}

/// Render a material map.
pub fn render_materials(map: &Tilemap<Material>) -> String {
    render_with(map, |&m| material_char(m))
}

pub fn height_legend() -> String {
    "=== HEIGHT LEGEND ===\n\
     ~ below sea level\n\
     . - = + * # % ^ A M\n\
     (0.0)           (1.0)\n"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_chars_span_range() {
        assert_eq!(height_char(-0.2), '~');
        assert_eq!(height_char(0.0), '.');
        assert_eq!(height_char(1.0), 'M');
        assert_eq!(height_char(7.0), 'M');
    }

    #[test]
    fn test_render_layout() {
        let map = Tilemap::from_fn(3, 2, |x, _| x as f64 / 2.0);
        let text = render_normalized(&map);
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().all(|line| line.chars().count() == 3));
        assert!(text.starts_with('.'));

        let materials = Tilemap::from_fn(2, 1, |x, _| if x == 0 { Material::Water } else { Material::Land });
        assert_eq!(render_materials(&materials), "~#\n");
    }
}
