//! Fast inpainting regression test
//!
//! Unmasked pixels must survive bit-for-bit for every seeding mode and
//! iteration count, a fully masked image must be rejected, and filled
//! regions must stay within the range of their surroundings.
//!
//! Run with:
//! ```
//! cargo test -p dhimg-filter --test inpaint_reg
//! ```

use dhimg_core::Pix;
use dhimg_filter::{FilterError, InpaintInit, InpaintOptions, fast_inpaint};
use dhimg_test::{RegParams, synth};

fn unmasked_changes(src: &Pix, out: &Pix, mask: &Pix) -> usize {
    let mut n = 0;
    for y in 0..src.height() {
        for x in 0..src.width() {
            if mask.get_pixel_unchecked(x, y) == 0
                && src.get_pixel_unchecked(x, y) != out.get_pixel_unchecked(x, y)
            {
                n += 1;
            }
        }
    }
    n
}

#[test]
fn inpaint_reg() {
    let mut rp = RegParams::new("inpaint");

    let gray = synth::gray_page(48, 36).expect("gray page");
    let rgb = synth::rgb_page(48, 36).expect("rgb page");
    let mask = synth::random_mask(48, 36, 30, 4242).expect("mask");

    // --- Test 1: unmasked pixels are untouched ---
    for init in [InpaintInit::Mean, InpaintInit::NearestL1] {
        for iterations in [0, 1, 16, 50] {
            let opts = InpaintOptions { init, iterations };
            for src in [&gray, &rgb] {
                let out = fast_inpaint(src, &mask, &opts).expect("inpaint");
                rp.compare_values(src.depth().bits() as f64, out.depth().bits() as f64, 0.0);
                rp.compare_values(0.0, unmasked_changes(src, &out, &mask) as f64, 0.0);
            }
        }
    }

    // --- Test 2: fully masked input is degenerate ---
    let full = synth::uniform_gray(48, 36, 255).expect("full mask");
    for init in [InpaintInit::Mean, InpaintInit::NearestL1] {
        let opts = InpaintOptions::default().with_init(init);
        let degenerate = matches!(
            fast_inpaint(&gray, &full, &opts),
            Err(FilterError::DegenerateMask)
        );
        rp.compare_values(1.0, if degenerate { 1.0 } else { 0.0 }, 0.0);
    }

    // --- Test 3: empty mask returns the source ---
    let empty = synth::uniform_gray(48, 36, 0).expect("empty mask");
    let same = fast_inpaint(&rgb, &empty, &InpaintOptions::default()).expect("no-op");
    rp.compare_pix(&rgb, &same);

    // --- Test 4: a hole in a gradient fills within its boundary range ---
    let mut pm = Pix::new(32, 32, dhimg_core::PixelDepth::Bit8)
        .expect("gradient")
        .to_mut();
    for y in 0..32 {
        for x in 0..32 {
            pm.set_pixel_unchecked(x, y, 100 + 2 * x);
        }
    }
    let gradient: Pix = pm.into();
    let hole = synth::rect_mask(32, 32, 10, 10, 20, 20).expect("hole");
    for init in [InpaintInit::Mean, InpaintInit::NearestL1] {
        let opts = InpaintOptions {
            init,
            iterations: 200,
        };
        let out = fast_inpaint(&gradient, &hole, &opts).expect("fill hole");
        let mut out_of_range = 0;
        let mut worst = 0u32;
        for y in 10..20 {
            for x in 10..20 {
                let v = out.get_pixel_unchecked(x, y);
                out_of_range += usize::from(!(118..=140).contains(&v));
                // A linear ramp is harmonic, so relaxation converges to it
                worst = worst.max(v.abs_diff(100 + 2 * x));
            }
        }
        eprintln!("  {init:?}: worst deviation from ramp {worst}");
        rp.compare_values(0.0, out_of_range as f64, 0.0);
        rp.compare_values(0.0, f64::from(worst), 4.0);
    }

    assert!(rp.cleanup(), "inpaint regression test failed");
}
