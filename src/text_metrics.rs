use crate::error::{ChartError, Result};
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

static FONT_CACHE: Lazy<Mutex<FontCache>> = Lazy::new(|| Mutex::new(FontCache::new()));

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub bold: bool,
}

impl TextStyle {
    pub fn regular(font_size: f32) -> Self {
        Self {
            font_size,
            bold: false,
        }
    }

    pub fn bold(font_size: f32) -> Self {
        Self {
            font_size,
            bold: true,
        }
    }
}

/// Rendered pixel width of a string.
pub trait TextMeasurer {
    fn measure(&self, text: &str, style: TextStyle) -> Result<f32>;
}

/// Measures with the advances of an installed system font, falling back to
/// [`EstimatedMeasurer`] when no installed face matches the family.
#[derive(Debug, Clone)]
pub struct FontMeasurer {
    font_family: String,
}

impl FontMeasurer {
    pub fn new(font_family: impl Into<String>) -> Self {
        Self {
            font_family: font_family.into(),
        }
    }
}

impl TextMeasurer for FontMeasurer {
    fn measure(&self, text: &str, style: TextStyle) -> Result<f32> {
        if text.is_empty() || style.font_size <= 0.0 {
            return Ok(0.0);
        }
        let failure = |reason: &str| ChartError::Measurement {
            text: text.to_string(),
            reason: reason.to_string(),
        };
        let mut cache = FONT_CACHE
            .lock()
            .map_err(|_| failure("font cache poisoned"))?;
        let Some(face) = cache.face(&self.font_family, style.bold) else {
            tracing::debug!(
                font_family = self.font_family.as_str(),
                text,
                "measuring with estimated widths"
            );
            return EstimatedMeasurer.measure(text, style);
        };
        face.measure_width(text, style.font_size)
            .ok_or_else(|| failure("font data unreadable"))
    }
}

/// Font-free measurement from a calibrated per-character width table.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatedMeasurer;

impl TextMeasurer for EstimatedMeasurer {
    fn measure(&self, text: &str, style: TextStyle) -> Result<f32> {
        let width: f32 = text.chars().map(char_width_factor).sum::<f32>() * style.font_size;
        Ok(if style.bold { width * 1.07 } else { width })
    }
}

/// Font-backed measurement unless `fast` asks for the width table.
pub fn measurer_for(font_family: &str, fast: bool) -> Box<dyn TextMeasurer> {
    if fast {
        Box::new(EstimatedMeasurer)
    } else {
        Box::new(FontMeasurer::new(font_family))
    }
}

pub(crate) fn char_width_factor(ch: char) -> f32 {
    match ch {
        ' ' => 0.278,
        '.' | ',' | ':' | ';' | '|' | '!' | '(' | ')' | '[' | ']' => 0.278,
        '–' => 0.556,
        'A' | 'B' | 'E' | 'K' | 'P' | 'S' | 'V' | 'X' | 'Y' => 0.667,
        'C' | 'D' | 'H' | 'N' | 'R' | 'U' => 0.722,
        'F' | 'T' | 'Z' => 0.611,
        'G' | 'O' | 'Q' => 0.778,
        'I' => 0.278,
        'J' => 0.5,
        'L' => 0.556,
        'M' => 0.833,
        'W' => 0.944,
        'f' | 't' => 0.278,
        'i' | 'j' | 'l' => 0.222,
        'm' => 0.833,
        'r' => 0.333,
        'w' => 0.722,
        'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' => 0.5,
        '0'..='9' => 0.556,
        ch if ch.is_ascii_lowercase() => 0.556,
        _ => 0.6,
    }
}

struct FontCache {
    db: Database,
    loaded_system_fonts: bool,
    faces: HashMap<(String, bool), Option<FontFace>>,
}

impl FontCache {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            faces: HashMap::new(),
        }
    }

    fn face(&mut self, font_family: &str, bold: bool) -> Option<&FontFace> {
        let key = (normalize_family_key(font_family), bold);
        if !self.faces.contains_key(&key) {
            let face = self.load_face(font_family, bold);
            if face.is_none() {
                tracing::debug!(font_family, bold, "no system font face found");
            }
            self.faces.insert(key.clone(), face);
        }
        self.faces.get(&key).and_then(Option::as_ref)
    }

    fn load_face(&mut self, font_family: &str, bold: bool) -> Option<FontFace> {
        let names: Vec<String> = font_family
            .split(',')
            .map(|part| part.trim().trim_matches('"').trim_matches('\'').to_string())
            .filter(|name| !name.is_empty())
            .collect();
        let mut families: Vec<Family<'_>> = names
            .iter()
            .map(|name| match name.to_ascii_lowercase().as_str() {
                "serif" => Family::Serif,
                "sans-serif" | "system-ui" | "-apple-system" => Family::SansSerif,
                "monospace" => Family::Monospace,
                "cursive" => Family::Cursive,
                "fantasy" => Family::Fantasy,
                _ => Family::Name(name.as_str()),
            })
            .collect();
        if families.is_empty() {
            families.push(Family::SansSerif);
        }

        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }

        let query = Query {
            families: &families,
            weight: if bold { Weight::BOLD } else { Weight::NORMAL },
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        self.db
            .with_face_data(id, |data, index| FontFace::parse(data.to_vec(), index))
            .flatten()
    }
}

struct FontFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: u16,
    ascii_advances: [u16; 128],
}

impl FontFace {
    fn parse(data: Vec<u8>, index: u32) -> Option<Self> {
        let face = Face::parse(&data, index).ok()?;
        let units_per_em = face.units_per_em().max(1);
        let mut ascii_advances = [0u16; 128];
        for byte in 0u8..=127 {
            if let Some(glyph) = face.glyph_index(byte as char) {
                ascii_advances[byte as usize] = face.glyph_hor_advance(glyph).unwrap_or(0);
            }
        }
        Some(Self {
            data,
            index,
            units_per_em,
            ascii_advances,
        })
    }

    fn measure_width(&self, text: &str, font_size: f32) -> Option<f32> {
        let scale = font_size / self.units_per_em as f32;
        let fallback = font_size * 0.56;

        if text.is_ascii() {
            let width = text
                .bytes()
                .filter(|byte| *byte != b'\n')
                .map(|byte| match self.ascii_advances[byte as usize] {
                    0 => fallback,
                    advance => advance as f32 * scale,
                })
                .sum::<f32>();
            return Some(width);
        }

        let face = Face::parse(&self.data, self.index).ok()?;
        let width = text
            .chars()
            .filter(|ch| *ch != '\n')
            .map(|ch| {
                face.glyph_index(ch)
                    .and_then(|glyph| face.glyph_hor_advance(glyph))
                    .map(|advance| advance as f32 * scale)
                    .unwrap_or(fallback)
            })
            .sum::<f32>();
        Some(width)
    }
}

fn normalize_family_key(font_family: &str) -> String {
    let trimmed = font_family.trim();
    if trimmed.is_empty() {
        "sans-serif".to_string()
    } else {
        trimmed.to_string()
    }
}
