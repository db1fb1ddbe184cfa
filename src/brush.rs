// Soft brush for painting extra seeds into a SeedMask.
// The painted mask is merged into seed initialization (>= 0.5 is a seed),
// so a dab grows the shape by roughly the stamp's half-weight radius.

use crate::types::{SeedMask, Stamp};

/// Make a circular Gaussian stamp with peak 1.0 at the center.
pub fn make_gaussian_stamp(radius: i32, sigma: f32) -> Stamp {
    let d = 2 * radius + 1;                   // kernel size (width = height)
    let mut weights = Vec::with_capacity((d * d) as usize);
    let s2 = 2.0 * sigma * sigma;             // denominator in the exponent
    let mut maxw = 0.0_f32;

    for y in -radius..=radius {
        for x in -radius..=radius {
            let r2 = (x as f32) * (x as f32) + (y as f32) * (y as f32);
            let w = (-r2 / s2).exp();         // e^{ -r^2 / (2 sigma^2) }
            if w > maxw { maxw = w; }
            weights.push(w);
        }
    }
    // Peak 1.0, not sum 1.0: a single dab must already cross the seed level.
    if maxw > 0.0 {
        for w in &mut weights { *w /= maxw; }
    }

    Stamp { radius, weights }
}

/// Add (dab) the stamp into the mask at (cx, cy), clamped to 1.0.
pub fn dab_mask(mask: &mut SeedMask, cx: i32, cy: i32, stamp: &Stamp) {
    let w = mask.width as i32;
    let h = mask.height as i32;
    let r = stamp.radius;
    let d = 2 * r + 1;

    for ky in 0..d {
        for kx in 0..d {
            let sx = cx + kx - r;
            let sy = cy + ky - r;
            if sx < 0 || sy < 0 || sx >= w || sy >= h { continue; }
            let idx = sy as usize * mask.width + sx as usize;
            let kidx = ky as usize * d as usize + kx as usize;

            let a = mask.data[idx] + stamp.weights[kidx];
            mask.data[idx] = a.min(1.0);
        }
    }
}

/// Clear the mask to 0 (no painted seeds).
pub fn clear_mask(mask: &mut SeedMask) {
    mask.data.fill(0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Grid;

    #[test]
    fn stamp_peaks_at_center() {
        let s = make_gaussian_stamp(3, 1.5);
        assert_eq!(s.weights.len(), 49);
        assert_eq!(s.weights[24], 1.0);
        assert!(s.weights[0] < 0.1);
    }

    #[test]
    fn dab_clamps_and_clips_at_edges() {
        let mut mask = Grid::try_new(4, 4, 0.0f32).unwrap();
        let stamp = make_gaussian_stamp(2, 1.0);

        dab_mask(&mut mask, 0, 0, &stamp); // partly off-image
        dab_mask(&mut mask, 0, 0, &stamp);
        assert_eq!(*mask.get(0, 0), 1.0);
        assert!(mask.data.iter().all(|a| (0.0..=1.0).contains(a)));
        assert_eq!(*mask.get(3, 3), 0.0);

        clear_mask(&mut mask);
        assert!(mask.data.iter().all(|a| *a == 0.0));
    }
}
