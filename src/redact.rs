//! Redaction
//!
//! Scans recognized lines for the 16-digit grouped identifier and paints a
//! solid black rectangle over each hit.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use crate::ocr::ReadPage;

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Four groups of four digits, single-space separated, nothing else on the
/// line.
fn line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{4} ){3}\d{4}$").unwrap())
}

/// Whether a recognized line is a 16-digit grouped identifier.
pub fn is_target(text: &str) -> bool {
    line_pattern().is_match(text)
}

/// Axis-aligned region to paint over, derived from a line's bounding
/// polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RedactionRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RedactionRect {
    /// Derive the rectangle from the flattened polygon
    /// (x0,y0,x1,y1,x2,y2,x3,y3). The corner selection is asymmetric —
    /// width spans the right-edge x values against the left-edge ones,
    /// height spans the bottom-edge y values against the top-edge ones —
    /// and is kept exactly as the service's quickstarts compute it.
    pub fn from_polygon(p: &[f32; 8]) -> Self {
        let x = p[0].min(p[6]);
        let y = p[1].min(p[3]);
        let width = p[2].max(p[4]) - p[0].min(p[6]);
        let height = p[5].max(p[7]) - p[1].min(p[3]);
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Collect one redaction rectangle per matching line across all pages.
pub fn collect_redactions(pages: &[ReadPage]) -> Vec<RedactionRect> {
    let mut rects = Vec::new();
    for page in pages {
        for line in &page.lines {
            if is_target(&line.text) {
                rects.push(RedactionRect::from_polygon(&line.bounding_box));
            }
        }
    }
    rects
}

/// Paint every rectangle solid black, in order. Regions reaching outside
/// the image clip silently; degenerate rectangles paint nothing.
pub fn apply_redactions(image: &mut RgbImage, rects: &[RedactionRect]) {
    for rect in rects {
        let width = rect.width as i64;
        let height = rect.height as i64;
        if width < 1 || height < 1 {
            debug!("Skipping degenerate redaction rect {rect:?}");
            continue;
        }
        draw_filled_rect_mut(
            image,
            Rect::at(rect.x as i32, rect.y as i32).of_size(width as u32, height as u32),
            BLACK,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::ReadLine;

    #[test]
    fn test_pattern_accepts_grouped_identifier() {
        assert!(is_target("1234 5678 9012 3456"));
        assert!(is_target("0000 0000 0000 0000"));
    }

    #[test]
    fn test_pattern_rejects_deviations() {
        assert!(!is_target("1234-5678-9012-3456"));
        assert!(!is_target("1234 5678 9012 345"));
        assert!(!is_target("1234 5678 9012 34567"));
        assert!(!is_target("1234  5678 9012 3456"));
        assert!(!is_target(" 1234 5678 9012 3456"));
        assert!(!is_target("1234 5678 9012 3456 "));
        assert!(!is_target("abcd 5678 9012 3456"));
        assert!(!is_target("card 1234 5678 9012 3456"));
        assert!(!is_target(""));
    }

    #[test]
    fn test_rect_from_axis_aligned_polygon() {
        // Clockwise from top-left: (10,20) (210,20) (210,50) (10,50)
        let rect = RedactionRect::from_polygon(&[
            10.0, 20.0, 210.0, 20.0, 210.0, 50.0, 10.0, 50.0,
        ]);
        assert_eq!(rect.x, 10.0);
        assert_eq!(rect.y, 20.0);
        assert_eq!(rect.width, 200.0);
        assert_eq!(rect.height, 30.0);
    }

    #[test]
    fn test_rect_uses_asymmetric_corner_selection() {
        // Slightly skewed quad: width must be max(p2,p4)-min(p0,p6) and
        // height max(p5,p7)-min(p1,p3).
        let p = [12.0, 22.0, 208.0, 18.0, 212.0, 48.0, 8.0, 52.0];
        let rect = RedactionRect::from_polygon(&p);
        assert_eq!(rect.x, 8.0);
        assert_eq!(rect.y, 18.0);
        assert_eq!(rect.width, 212.0 - 8.0);
        assert_eq!(rect.height, 52.0 - 18.0);
        assert!(rect.width >= 0.0);
        assert!(rect.height >= 0.0);
    }

    fn page(lines: Vec<(&str, [f32; 8])>) -> ReadPage {
        ReadPage {
            lines: lines
                .into_iter()
                .map(|(text, bounding_box)| ReadLine {
                    text: text.to_string(),
                    bounding_box,
                })
                .collect(),
        }
    }

    #[test]
    fn test_collect_redactions_takes_every_matching_line() {
        let unit = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
        let pages = vec![
            page(vec![
                ("Name: Jane Doe", unit),
                ("1234 5678 9012 3456", unit),
            ]),
            page(vec![("9999 8888 7777 6666", unit)]),
        ];

        let rects = collect_redactions(&pages);
        assert_eq!(rects.len(), 2);
    }

    #[test]
    fn test_collect_redactions_empty_for_no_matches() {
        let unit = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
        let pages = vec![page(vec![("hello world", unit)])];
        assert!(collect_redactions(&pages).is_empty());
    }

    #[test]
    fn test_apply_redactions_paints_both_rects_black() {
        let mut image = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
        let rects = vec![
            RedactionRect {
                x: 10.0,
                y: 10.0,
                width: 20.0,
                height: 10.0,
            },
            RedactionRect {
                x: 50.0,
                y: 60.0,
                width: 30.0,
                height: 5.0,
            },
        ];

        apply_redactions(&mut image, &rects);

        assert_eq!(*image.get_pixel(15, 15), Rgb([0, 0, 0]));
        assert_eq!(*image.get_pixel(60, 62), Rgb([0, 0, 0]));
        // Pixels outside both rects stay untouched.
        assert_eq!(*image.get_pixel(5, 5), Rgb([255, 255, 255]));
        assert_eq!(*image.get_pixel(90, 90), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_apply_redactions_clips_outside_image() {
        let mut image = RgbImage::from_pixel(20, 20, Rgb([255, 255, 255]));
        let rects = vec![RedactionRect {
            x: 10.0,
            y: 10.0,
            width: 500.0,
            height: 500.0,
        }];

        apply_redactions(&mut image, &rects);

        assert_eq!(*image.get_pixel(19, 19), Rgb([0, 0, 0]));
        assert_eq!(*image.get_pixel(0, 0), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_apply_redactions_skips_degenerate_rect() {
        let mut image = RgbImage::from_pixel(10, 10, Rgb([255, 255, 255]));
        let rects = vec![RedactionRect {
            x: 2.0,
            y: 2.0,
            width: 0.0,
            height: 5.0,
        }];

        apply_redactions(&mut image, &rects);

        assert_eq!(*image.get_pixel(2, 2), Rgb([255, 255, 255]));
    }
}
