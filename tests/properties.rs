use callisto_spectra::{
    AxisOrientation, CombineError, IndexSlice, NoiseReduction, Spectrum, SpectrumCombining,
    SpectrumCropping, SpectrumError, SpectrumProcessing, can_combine_frequency, combine_frequency,
    combine_time,
};
use ndarray::{Array1, Array2};
use proptest::prelude::*;

fn grid(
    n_f: usize,
    n_t: usize,
    f0: f64,
    df: f64,
    descending: bool,
    t0: f64,
    dt: f64,
) -> Spectrum<f64> {
    let data = Array2::from_shape_fn((n_f, n_t), |(f, t)| (f * 31 + t) as f64);
    let freqs = Array1::from_iter((0..n_f).map(|i| {
        let k = if descending { n_f - 1 - i } else { i };
        f0 + df * k as f64
    }));
    let time = Array1::from_iter((0..n_t).map(|i| t0 + dt * i as f64));
    Spectrum::new(data, freqs, time).unwrap()
}

fn assert_invariants(s: &Spectrum<f64>) {
    assert_eq!(s.data().dim(), (s.freqs().len(), s.time().len()));
    let freqs = s.freqs();
    let ascending = freqs.windows(2).into_iter().all(|w| w[0] < w[1]);
    let descending = freqs.windows(2).into_iter().all(|w| w[0] > w[1]);
    assert!(ascending || descending, "freqs not strictly monotonic");
    assert!(s.time().windows(2).into_iter().all(|w| w[0] < w[1]));
}

/// Cut positions splitting `0..n` into three runs of at least two rows each.
fn cuts(n: usize, c1: f64, c2: f64) -> (usize, usize) {
    let i = (2 + ((n - 5) as f64 * c1) as usize).min(n - 4);
    let j = (i + 2 + ((n - 3 - i) as f64 * c2) as usize).min(n - 2);
    (i, j)
}

prop_compose! {
    fn arb_spectrum()(
        n_f in 1usize..8,
        n_t in 1usize..10,
        f0 in 10.0f64..500.0,
        df in 0.5f64..20.0,
        descending in any::<bool>(),
        t0 in 0.0f64..1000.0,
        dt in 0.1f64..2.0,
    ) -> Spectrum<f64> {
        grid(n_f, n_t, f0, df, descending, t0, dt)
    }
}

proptest! {
    #[test]
    fn crop_frequency_keeps_exactly_the_channels_in_range(
        s in arb_spectrum(),
        u1 in 0.0f64..1.0,
        u2 in 0.0f64..1.0,
    ) {
        let (f_lo, f_hi) = s.freq_bounds();
        let span = f_hi - f_lo + 10.0;
        let a = f_lo - 5.0 + u1 * span;
        let b = a + u2 * span;
        let expected: Vec<f64> = s.freqs().iter().copied().filter(|f| (a..=b).contains(f)).collect();

        match s.crop_frequency(a, b) {
            Ok(out) => {
                assert_invariants(&out);
                prop_assert_eq!(out.freqs().to_vec(), expected);
                prop_assert_eq!(out.time().to_vec(), s.time().to_vec());
                if out.n_freqs() > 1 {
                    prop_assert_eq!(out.freq_orientation(), s.freq_orientation());
                }
            }
            Err(e) => {
                prop_assert!(expected.is_empty());
                let is_range = matches!(e, SpectrumError::Range { .. });
                prop_assert!(is_range, "unexpected error: {}", e);
            }
        }
    }

    #[test]
    fn crop_to_full_range_is_identity(s in arb_spectrum()) {
        let (f_lo, f_hi) = s.freq_bounds();
        let (t_lo, t_hi) = s.time_bounds();
        prop_assert!(s.crop_frequency(f_lo, f_hi).unwrap().same_samples(&s));
        prop_assert!(s.crop_time(t_lo, t_hi).unwrap().same_samples(&s));
        prop_assert!(s.crop(Some((f_lo, f_hi)), Some((t_lo, t_hi))).unwrap().same_samples(&s));
    }

    #[test]
    fn recropping_same_bounds_is_noop(s in arb_spectrum(), u1 in 0.0f64..1.0, u2 in 0.0f64..1.0) {
        let (f_lo, f_hi) = s.freq_bounds();
        let a = f_lo + u1 * (f_hi - f_lo);
        let b = a + u2 * (f_hi - a);
        if let Ok(once) = s.crop_frequency(a, b) {
            let twice = once.crop_frequency(a, b).unwrap();
            prop_assert!(twice.same_samples(&once));
        }

        let (t_lo, t_hi) = s.time_bounds();
        let ta = t_lo + u2 * (t_hi - t_lo);
        if let Ok(once) = s.crop_time(ta, t_hi) {
            prop_assert!(once.crop_time(ta, t_hi).unwrap().same_samples(&once));
        }
    }

    #[test]
    fn combining_a_single_spectrum_is_identity(s in arb_spectrum()) {
        let single = std::slice::from_ref(&s);
        prop_assert_eq!(&Spectrum::combine_frequency(single, 1e-6).unwrap(), &s);
        prop_assert_eq!(&Spectrum::combine_time(single, 1e-6).unwrap(), &s);
    }

    #[test]
    fn frequency_coverage_is_associative(
        n_f in 6usize..14,
        n_t in 1usize..6,
        descending in any::<bool>(),
        shared_boundary in any::<bool>(),
        c1 in 0.0f64..1.0,
        c2 in 0.0f64..1.0,
    ) {
        let full = grid(n_f, n_t, 45.0, 2.5, descending, 0.0, 0.25);
        let (i, j) = cuts(n_f, c1, c2);
        let ov = usize::from(shared_boundary);
        let piece = |start: usize, stop: usize| {
            full.slice_by_index(Some(IndexSlice::from(start..stop)), None).unwrap()
        };
        let (p1, p2, p3) = (piece(0, i + ov), piece(i, j + ov), piece(j, n_f));

        let nested = combine_frequency(
            &[combine_frequency(&[p1.clone(), p2.clone()], 1e-6).unwrap(), p3.clone()],
            1e-6,
        )
        .unwrap();
        let flat = combine_frequency(&[p3, p1, p2], 1e-6).unwrap();

        assert_invariants(&flat);
        prop_assert!(nested.same_samples(&flat));
        prop_assert!(flat.same_samples(&full));
    }

    #[test]
    fn time_pieces_recombine_to_the_whole(
        n_t in 4usize..12,
        c in 0.0f64..1.0,
        overlap in 0usize..3,
        dt in 0.1f64..2.0,
    ) {
        let full = grid(3, n_t, 100.0, 10.0, true, 5.0, dt);
        let i = (2 + ((n_t - 3) as f64 * c) as usize).min(n_t - 1);
        let head = full.slice_by_index(None, Some(IndexSlice::from(0..(i + overlap).min(n_t)))).unwrap();
        let tail = full.slice_by_index(None, Some(IndexSlice::from(i..n_t))).unwrap();

        let combined = combine_time(&[tail, head], dt * 0.1).unwrap();
        assert_invariants(&combined);
        prop_assert!(combined.same_samples(&full));
    }

    #[test]
    fn different_time_axes_never_combine_in_frequency(n_t in 1usize..50, f0 in 100.0f64..200.0) {
        let a = grid(2, n_t, 45.0, 10.0, false, 0.0, 0.25);
        let b = grid(2, n_t + 1, f0, 10.0, false, 0.0, 0.25);
        let pair = [a, b];
        prop_assert!(!can_combine_frequency(&pair, 1e-6));
        let err = combine_frequency(&pair, 1e-6).unwrap_err();
        let incompatible = matches!(
            err,
            SpectrumError::Combine(CombineError::Incompatible { first: 0, second: 1, .. })
        );
        prop_assert!(incompatible, "unexpected error: {}", err);
    }

    #[test]
    fn noise_reduction_respects_clip_bounds(
        s in arb_spectrum(),
        low in -20.0f64..0.0,
        high in 0.0f64..20.0,
    ) {
        let params = NoiseReduction { clip_low: low, clip_high: high, scale: Some(2.0) };
        let out = s.noise_reduce_mean_clip(params).unwrap();
        assert_invariants(&out);
        prop_assert!(out.data().iter().all(|&v| v >= 2.0 * low && v <= 2.0 * high));
        prop_assert!(out.freqs() == s.freqs() && out.time() == s.time());
    }
}

#[test]
fn scenario_disjoint_frequency_combine() {
    // 45..=100 MHz in 5 MHz steps, 100..=200 MHz in 10 MHz steps
    let low = grid(12, 10, 45.0, 5.0, false, 0.0, 0.25);
    let high = grid(11, 10, 100.0, 10.0, false, 0.0, 0.25);

    let combined = combine_frequency(&[high, low], 1e-6).unwrap();
    assert_eq!(combined.n_freqs(), 12 + 11 - 1);
    assert_eq!(combined.freq_bounds(), (45.0, 200.0));
    assert_eq!(combined.freq_orientation(), AxisOrientation::Ascending);
    assert_eq!(combined.n_times(), 10);
    assert_invariants(&combined);
}

#[test]
fn scenario_overlapping_time_combine() {
    let early = grid(3, 10, 100.0, 10.0, false, 0.0, 1.0);
    let late = grid(3, 12, 100.0, 10.0, false, 8.0, 1.0);

    let combined = combine_time(&[early, late], 0.01).unwrap();
    let expected: Vec<f64> = (0..20).map(f64::from).collect();
    assert_eq!(combined.time().to_vec(), expected);
    assert_invariants(&combined);
}

#[test]
fn scenario_gap_failure() {
    let early = grid(3, 10, 100.0, 10.0, false, 0.0, 1.0);
    let late = grid(3, 5, 100.0, 10.0, false, 15.0, 1.0);

    let err = combine_time(&[early, late], 0.01).unwrap_err();
    match &err {
        SpectrumError::Combine(CombineError::Gap { gap_seconds, .. }) => {
            assert!((gap_seconds - 5.0).abs() < 1e-9);
        }
        other => panic!("expected a gap error, got {other}"),
    }
    assert!(err.to_string().contains("5.000"));
}
