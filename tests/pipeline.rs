// End-to-end behavior of the whole pipeline.

use jump_flood::composite::{BLACK, WHITE};
use jump_flood::distance::max_finite;
use jump_flood::jfa::default_pass_count;
use jump_flood::{Grid, NO_SEED_DISTANCE, Pipeline, PipelineConfig, Seed, SourceImage};

fn source_with(width: usize, height: usize, on: &[(usize, usize)]) -> SourceImage {
    let mut src = Grid::try_new(width, height, [0.0f32; 4]).unwrap();
    for &(x, y) in on {
        src.set(x, y, [1.0; 4]);
    }
    src
}

fn blob(width: usize, height: usize) -> SourceImage {
    let mut on = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let in_bar = (3..6).contains(&y) && (2..20).contains(&x);
            let in_dot = (x as i32 - 15).pow(2) + (y as i32 - 14).pow(2) <= 9;
            if in_bar || in_dot {
                on.push((x, y));
            }
        }
    }
    source_with(width, height, &on)
}

fn run(config: PipelineConfig, src: &SourceImage) -> Pipeline {
    let mut p = Pipeline::new(config).unwrap();
    p.run(src, None).unwrap();
    p
}

fn with_passes(passes: u32) -> PipelineConfig {
    PipelineConfig { passes: Some(passes), ..Default::default() }
}

#[test]
fn four_by_four_corner_seed() {
    let p = run(with_passes(2), &source_with(4, 4, &[(0, 0)]));
    assert_eq!(*p.nearest().unwrap().get(3, 3), Seed::at(0, 0));
    let d = *p.distance().unwrap().get(3, 3);
    assert!((d - 18f32.sqrt()).abs() < 1e-5, "d = {d}");
}

#[test]
fn single_seed_gives_exact_distances() {
    let (w, h) = (23, 17);
    let seed = (7usize, 11usize);
    let min_passes = default_pass_count(w, h);

    for passes in min_passes..min_passes + 3 {
        let p = run(with_passes(passes), &source_with(w, h, &[seed]));
        let nearest = p.nearest().unwrap();
        let field = p.distance().unwrap();
        for y in 0..h {
            for x in 0..w {
                assert_eq!(*nearest.get(x, y), Seed::at(7, 11));
                let dx = x as f32 - seed.0 as f32;
                let dy = y as f32 - seed.1 as f32;
                let exact = (dx * dx + dy * dy).sqrt();
                assert!((field.get(x, y) - exact).abs() < 1e-4, "({x},{y}) P={passes}");
            }
        }
    }
}

#[test]
fn reruns_are_bit_identical() {
    let src = blob(24, 20);
    let config = PipelineConfig { signed: true, ..Default::default() };

    let mut p = Pipeline::new(config).unwrap();
    p.set_shape_width(2.0).unwrap();
    p.run(&src, None).unwrap();
    let seeds = p.seeds().unwrap().clone();
    let nearest = p.nearest().unwrap().clone();
    let field: Vec<u32> = p.distance().unwrap().data.iter().map(|d| d.to_bits()).collect();
    let result = p.result().unwrap().clone();

    p.run(&src, None).unwrap();
    assert_eq!(p.seeds().unwrap(), &seeds);
    assert_eq!(p.nearest().unwrap(), &nearest);
    let again: Vec<u32> = p.distance().unwrap().data.iter().map(|d| d.to_bits()).collect();
    assert_eq!(again, field);
    assert_eq!(p.result().unwrap(), &result);

    // a fresh pipeline agrees too
    let mut q = Pipeline::new(config).unwrap();
    q.set_shape_width(2.0).unwrap();
    q.run(&src, None).unwrap();
    assert_eq!(q.nearest().unwrap(), &nearest);
}

#[test]
fn extra_passes_saturate() {
    let src = blob(24, 20);
    let base = default_pass_count(24, 20);
    let reference = run(with_passes(base), &src);

    for extra in 1..4 {
        let p = run(with_passes(base + extra), &src);
        assert_eq!(p.nearest(), reference.nearest(), "P = {}", base + extra);
        assert_eq!(p.distance(), reference.distance());
    }
}

#[test]
fn parity_does_not_change_the_result() {
    // 16x16: P = 4 (five passes, corrected) and P = 5 (six passes, natural)
    let src = source_with(16, 16, &[(3, 12)]);
    let odd_total = run(with_passes(4), &src);
    let even_total = run(with_passes(5), &src);
    assert_eq!(odd_total.nearest(), even_total.nearest());
    assert_eq!(odd_total.distance(), even_total.distance());
}

#[test]
fn no_seeds_is_uniformly_outside() {
    let mut p = Pipeline::new(PipelineConfig::default()).unwrap();
    p.set_shape_width(1000.0).unwrap();
    p.run(&source_with(9, 7, &[]), None).unwrap();

    assert!(p.nearest().unwrap().data.iter().all(|s| s.is_none()));
    assert!(p.distance().unwrap().data.iter().all(|d| *d == NO_SEED_DISTANCE));
    assert!(p.result().unwrap().data.iter().all(|c| *c == BLACK));
}

#[test]
fn shape_width_thresholds() {
    let src = blob(24, 20);

    // w = 0: exactly the seed mask
    let p = run(PipelineConfig::default(), &src);
    let seeds = p.seeds().unwrap();
    for (c, s) in p.result().unwrap().data.iter().zip(&seeds.data) {
        assert_eq!(*c, if s.is_some() { WHITE } else { BLACK });
    }

    // w = d_max: everything inside
    let d_max = max_finite(p.distance().unwrap());
    let mut q = Pipeline::new(PipelineConfig::default()).unwrap();
    q.set_shape_width(d_max).unwrap();
    q.run(&src, None).unwrap();
    assert!(q.result().unwrap().data.iter().all(|c| *c == WHITE));
}

#[test]
fn zero_dimensions_are_rejected() {
    let mut p = Pipeline::new(PipelineConfig::default()).unwrap();
    let empty = SourceImage { width: 0, height: 0, data: Vec::new() };
    assert!(p.run(&empty, None).is_err());
    assert_eq!(p.dimensions(), None);
}
