// ─────────────────────────────────────────────────────────────────────
// NumLab — Discrete Fourier transform
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Discrete Fourier transform.
//!
//! Convention matches numpy:
//! - Forward transform: unnormalized, `X_k = Σ x_n e^(−2πikn/N)`
//! - Inverse transform: normalized by 1/N
//!
//! [`dft`] / [`idft`] evaluate the sums directly in O(N²); [`fft`] / [`ifft`]
//! produce the same values through `rustfft`.

use std::f64::consts::PI;

use num_complex::Complex64;
use rustfft::FftPlanner;

fn direct_sum(input: &[Complex64], sign: f64) -> Vec<Complex64> {
    let n = input.len();
    (0..n)
        .map(|k| {
            input
                .iter()
                .enumerate()
                .map(|(j, &x)| {
                    // reduce k·j mod n first so the angle stays small for large n
                    let angle = sign * 2.0 * PI * ((k * j) % n) as f64 / n as f64;
                    x * Complex64::from_polar(1.0, angle)
                })
                .sum()
        })
        .collect()
}

/// Forward DFT by direct summation.
pub fn dft(input: &[Complex64]) -> Vec<Complex64> {
    direct_sum(input, -1.0)
}

/// Forward DFT of a real signal.
pub fn dft_real(input: &[f64]) -> Vec<Complex64> {
    let data: Vec<Complex64> = input.iter().map(|&v| Complex64::new(v, 0.0)).collect();
    dft(&data)
}

/// Inverse DFT by direct summation, normalized by 1/N.
pub fn idft(spectrum: &[Complex64]) -> Vec<Complex64> {
    let norm = 1.0 / spectrum.len().max(1) as f64;
    direct_sum(spectrum, 1.0)
        .into_iter()
        .map(|v| v * norm)
        .collect()
}

/// Forward FFT. Matches `numpy.fft.fft()`.
pub fn fft(input: &[Complex64]) -> Vec<Complex64> {
    let mut data = input.to_vec();
    if data.is_empty() {
        return data;
    }
    let mut planner = FftPlanner::new();
    planner.plan_fft_forward(data.len()).process(&mut data);
    data
}

/// Inverse FFT. Matches `numpy.fft.ifft()`, including the 1/N factor.
pub fn ifft(spectrum: &[Complex64]) -> Vec<Complex64> {
    let mut data = spectrum.to_vec();
    if data.is_empty() {
        return data;
    }
    let norm = 1.0 / data.len() as f64;
    let mut planner = FftPlanner::new();
    planner.plan_fft_inverse(data.len()).process(&mut data);
    for v in data.iter_mut() {
        *v *= norm;
    }
    data
}

/// Largest deviation between `signal` and `Re(idft(dft(signal)))`.
pub fn max_roundtrip_error(signal: &[f64]) -> f64 {
    let recovered = idft(&dft_real(signal));
    signal
        .iter()
        .zip(recovered.iter())
        .map(|(&x, z)| (x - z.re).abs())
        .fold(0.0_f64, f64::max)
}
