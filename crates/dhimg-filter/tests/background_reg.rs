//! Background isolation regression test
//!
//! Runs the full pipeline on a synthetic page with thick strokes, single
//! pixel specks and a paper gradient, and checks the ink mask, the
//! background estimate and the normalized output.
//!
//! Run with:
//! ```
//! cargo test -p dhimg-filter --test background_reg
//! ```

use dhimg_core::{Pix, PixelDepth, color};
use dhimg_filter::{
    FilterError, IsolateOptions, IsolateOutput, SauvolaOptions, background_mask,
    estimate_background, isolate_background,
};
use dhimg_test::{RegParams, synth};

const W: u32 = 96;
const H: u32 = 72;
const INK: u8 = 40;
const SPECKS: [(u32, u32); 2] = [(50, 25), (20, 45)];

/// 5-row strokes at rows 12, 32 and 52, broken into 15-column words.
fn is_stroke(x: u32, y: u32) -> bool {
    let in_rows = [12, 32, 52].iter().any(|&r| (r..r + 5).contains(&y));
    let in_cols = (10..86).contains(&x) && (x - 10) % 20 < 15;
    in_rows && in_cols
}

fn thick_page() -> Pix {
    let mut pm = Pix::new(W, H, PixelDepth::Bit8).unwrap().to_mut();
    for y in 0..H {
        for x in 0..W {
            let v = if is_stroke(x, y) || SPECKS.contains(&(x, y)) {
                INK
            } else {
                synth::page_paper_value(W, H, x, y)
            };
            pm.set_pixel_unchecked(x, y, u32::from(v));
        }
    }
    pm.into()
}

fn thick_page_rgb() -> Pix {
    let gray = thick_page();
    let mut pm = Pix::new(W, H, PixelDepth::Bit32).unwrap().to_mut();
    for y in 0..H {
        for x in 0..W {
            let v = gray.get_pixel_unchecked(x, y) as f64;
            pm.set_pixel_unchecked(
                x,
                y,
                color::compose_rgb(v as u8, (v * 0.95) as u8, (v * 0.8) as u8),
            );
        }
    }
    pm.into()
}

/// Rows with no ink within reach of the mask growth and the blur.
fn clean_rows() -> impl Iterator<Item = u32> {
    (0..4).chain(64..H)
}

fn options() -> IsolateOptions {
    IsolateOptions {
        sauvola: SauvolaOptions::new(15, 0.3),
        ..Default::default()
    }
}

#[test]
fn background_reg() {
    let mut rp = RegParams::new("background");
    let page = thick_page();
    let opts = options();

    // --- Test 1: ink mask covers strokes, drops specks ---
    let mask = background_mask(&page, &opts).expect("mask");
    let mut strokes_unmasked = 0;
    for y in 0..H {
        for x in 0..W {
            if is_stroke(x, y) && mask.get_pixel_unchecked(x, y) != 255 {
                strokes_unmasked += 1;
            }
        }
    }
    rp.compare_values(0.0, strokes_unmasked as f64, 0.0);
    for (x, y) in SPECKS {
        rp.compare_values(0.0, f64::from(mask.get_pixel_unchecked(x, y)), 0.0);
    }
    let clean_masked = clean_rows()
        .flat_map(|y| (0..W).map(move |x| (x, y)))
        .filter(|&(x, y)| mask.get_pixel_unchecked(x, y) != 0)
        .count();
    rp.compare_values(0.0, clean_masked as f64, 0.0);

    // --- Test 2: background estimate follows the paper under the ink ---
    let bg = estimate_background(&page, &opts).expect("background");
    rp.compare_values(8.0, bg.depth().bits() as f64, 0.0);
    let mut worst = 0u32;
    for y in 0..H {
        for x in 0..W {
            if is_stroke(x, y) {
                let paper = u32::from(synth::page_paper_value(W, H, x, y));
                worst = worst.max(bg.get_pixel_unchecked(x, y).abs_diff(paper));
            }
        }
    }
    eprintln!("  worst background error under strokes: {worst}");
    rp.compare_values(0.0, f64::from(worst), 10.0);

    // --- Test 3: normalized output flattens the paper ---
    let norm = isolate_background(&page, &opts).expect("normalized");
    let (mut lo, mut hi) = (255u32, 0u32);
    for y in clean_rows() {
        for x in 0..W {
            let v = norm.get_pixel_unchecked(x, y);
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    eprintln!("  normalized paper range: [{lo}, {hi}]");
    rp.compare_values(229.0, f64::from(lo), 6.0);
    rp.compare_values(229.0, f64::from(hi), 6.0);
    let mut ink_bright = 0;
    for y in 0..H {
        for x in 0..W {
            if is_stroke(x, y) && norm.get_pixel_unchecked(x, y) > 100 {
                ink_bright += 1;
            }
        }
    }
    rp.compare_values(0.0, ink_bright as f64, 0.0);

    // --- Test 4: background output mode ---
    let bg_out = isolate_background(
        &page,
        &IsolateOptions {
            output: IsolateOutput::Background,
            ..options()
        },
    )
    .expect("background output");
    rp.compare_pix(&bg, &bg_out);

    // --- Test 5: brightness adjustment spans the full range ---
    let stretched = isolate_background(
        &page,
        &IsolateOptions {
            adjust_brightness: true,
            alpha: 1.0,
            ..options()
        },
    )
    .expect("stretched");
    let (mut lo, mut hi) = (255u32, 0u32);
    for y in 0..H {
        for x in 0..W {
            let v = stretched.get_pixel_unchecked(x, y);
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    rp.compare_values(0.0, f64::from(lo), 0.0);
    rp.compare_values(255.0, f64::from(hi), 0.0);

    // --- Test 6: color pages are normalized per channel ---
    let rgb = thick_page_rgb();
    let norm_rgb = isolate_background(&rgb, &opts).expect("rgb normalized");
    rp.compare_values(32.0, norm_rgb.depth().bits() as f64, 0.0);
    let mut off = 0;
    for y in clean_rows() {
        for x in 0..W {
            let (r, g, b) = norm_rgb.get_rgb(x, y).expect("rgb");
            off += [r, g, b]
                .iter()
                .filter(|&&c| u32::from(c).abs_diff(229) > 8)
                .count();
        }
    }
    rp.compare_values(0.0, off as f64, 0.0);

    let gray_out = isolate_background(
        &rgb,
        &IsolateOptions {
            input_as_grayscale: true,
            ..options()
        },
    )
    .expect("grayscale");
    rp.compare_values(8.0, gray_out.depth().bits() as f64, 0.0);

    // --- Test 7: a page that is all ink cannot be inpainted ---
    let black = synth::uniform_gray(20, 20, 0).expect("black");
    let degenerate = matches!(
        isolate_background(&black, &options()),
        Err(FilterError::DegenerateMask)
    );
    rp.compare_values(1.0, if degenerate { 1.0 } else { 0.0 }, 0.0);

    assert!(rp.cleanup(), "background regression test failed");
}
