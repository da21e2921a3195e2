//! Mask morphology regression test
//!
//! Closing and negation identities on random masks, exact shrink of a
//! solid block, boundary handling, and sequence strings against the
//! equivalent direct calls.
//!
//! Run with:
//! ```
//! cargo test -p dhimg-morph --test mask_reg
//! ```

use dhimg_core::Pix;
use dhimg_morph::{
    MaskOp, apply_mask_ops, border_fill, inset, inset_with_boundary, mask_sequence, negate,
    normalize_mask, outset,
};
use dhimg_region::{BoundaryCondition, DistanceMetric};
use dhimg_test::{RegParams, synth};

fn count_set(pix: &Pix) -> usize {
    let mut n = 0;
    for y in 0..pix.height() {
        for x in 0..pix.width() {
            if pix.get_pixel_unchecked(x, y) != 0 {
                n += 1;
            }
        }
    }
    n
}

/// Pixels set in `a` but not in `b`.
fn lost(a: &Pix, b: &Pix) -> usize {
    let mut n = 0;
    for y in 0..a.height() {
        for x in 0..a.width() {
            if a.get_pixel_unchecked(x, y) != 0 && b.get_pixel_unchecked(x, y) == 0 {
                n += 1;
            }
        }
    }
    n
}

fn only_binary_values(pix: &Pix) -> bool {
    (0..pix.height()).all(|y| {
        (0..pix.width()).all(|x| matches!(pix.get_pixel_unchecked(x, y), 0 | 255))
    })
}

#[test]
fn mask_reg() {
    let mut rp = RegParams::new("mask");

    // --- Test 1: outset then inset never loses foreground ---
    for (seed, percent) in [(1, 10), (2, 35), (3, 60)] {
        let mask = synth::random_mask(40, 30, percent, seed).expect("random mask");
        for metric in [DistanceMetric::L1, DistanceMetric::L2] {
            for d in [1.0, 2.5, 4.0] {
                let grown = outset(&mask, d, metric).expect("outset");
                let closed = inset(&grown, d, metric).expect("inset");
                rp.compare_values(0.0, lost(&mask, &closed) as f64, 0.0);
                rp.compare_values(1.0, if only_binary_values(&closed) { 1.0 } else { 0.0 }, 0.0);
            }
        }

        // --- Test 2: double negation ---
        let back = negate(&negate(&mask).expect("negate")).expect("negate twice");
        rp.compare_pix(&mask, &back);
    }

    // --- Test 3: 10x10 block shrinks by exactly 3 ---
    let block = synth::rect_mask(16, 16, 3, 3, 13, 13).expect("block");
    let shrunk = inset(&block, 3.0, DistanceMetric::L2).expect("inset 3");
    let core = synth::rect_mask(16, 16, 6, 6, 10, 10).expect("core");
    rp.compare_pix(&core, &shrunk);

    // The same on a bare mask when the outside counts as background
    let bare = synth::uniform_gray(10, 10, 255).expect("bare");
    let shrunk_bare =
        inset_with_boundary(&bare, 3.0, DistanceMetric::L2, BoundaryCondition::Background)
            .expect("inset with boundary");
    let core_bare = synth::rect_mask(10, 10, 3, 3, 7, 7).expect("core bare");
    rp.compare_pix(&core_bare, &shrunk_bare);

    // ...while ignoring the outside leaves it alone
    let untouched = inset(&bare, 3.0, DistanceMetric::L2).expect("inset ignoring outside");
    rp.compare_values(100.0, count_set(&untouched) as f64, 0.0);

    // --- Test 4: L1 vs L2 diamond and disk ---
    let dot = synth::rect_mask(21, 21, 10, 10, 11, 11).expect("dot");
    let diamond = outset(&dot, 3.0, DistanceMetric::L1).expect("diamond");
    let disk = outset(&dot, 3.0, DistanceMetric::L2).expect("disk");
    // |dx| + |dy| <= 3: 25 pixels; dx² + dy² <= 9: 29 pixels
    rp.compare_values(25.0, count_set(&diamond) as f64, 0.0);
    rp.compare_values(29.0, count_set(&disk) as f64, 0.0);

    // --- Test 5: negative distances swap the operation ---
    let mask = synth::random_mask(25, 25, 40, 7).expect("mask");
    let a = inset(&mask, -2.0, DistanceMetric::L2).expect("negative inset");
    let b = outset(&mask, 2.0, DistanceMetric::L2).expect("outset");
    rp.compare_pix(&a, &b);

    // --- Test 6: border fill ---
    let mut frame = synth::rect_mask(20, 20, 0, 0, 20, 2).expect("top bar").to_mut();
    for y in 8..12 {
        for x in 8..12 {
            frame.set_pixel_unchecked(x, y, 255);
        }
    }
    let frame: Pix = frame.into();
    let filled = border_fill(&frame).expect("border fill");
    let island = synth::rect_mask(20, 20, 8, 8, 12, 12).expect("island");
    rp.compare_pix(&island, &filled);

    // --- Test 7: sequences match direct calls ---
    let noisy = synth::random_gray(30, 20, 99).expect("noisy");
    let by_string = mask_sequence(&noisy, "n + i1 + n + I2 + B").expect("sequence");
    let by_ops = apply_mask_ops(
        &noisy,
        &[
            MaskOp::Negate,
            MaskOp::Inset {
                distance: 1.0,
                metric: DistanceMetric::L2,
            },
            MaskOp::Negate,
            MaskOp::Inset {
                distance: 2.0,
                metric: DistanceMetric::L1,
            },
            MaskOp::BorderFill,
        ],
    )
    .expect("ops");
    let normalized = normalize_mask(&noisy).expect("normalize");
    let step = negate(&normalized).expect("n");
    let step = inset(&step, 1.0, DistanceMetric::L2).expect("i1");
    let step = negate(&step).expect("n");
    let step = inset(&step, 2.0, DistanceMetric::L1).expect("I2");
    let direct = border_fill(&step).expect("B");
    rp.compare_pix(&by_string, &by_ops);
    rp.compare_pix(&direct, &by_ops);

    let bad = mask_sequence(&noisy, "n + q3");
    rp.compare_values(1.0, if bad.is_err() { 1.0 } else { 0.0 }, 0.0);

    assert!(rp.cleanup(), "mask regression test failed");
}
