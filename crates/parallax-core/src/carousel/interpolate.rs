/// Piecewise-linear interpolation, clamped at both ends.
///
/// `input` must be non-decreasing. Values left of `input[0]` map to
/// `output[0]`, values right of the last breakpoint map to the last output.
/// A zero-width segment resolves to its right-hand output.
#[inline]
pub fn interpolate<const N: usize>(value: f64, input: &[f64; N], output: &[f64; N]) -> f64 {
    if N == 0 {
        return 0.0;
    }
    if value <= input[0] {
        return output[0];
    }
    if value >= input[N - 1] {
        return output[N - 1];
    }

    for seg in 1..N {
        let (x0, x1) = (input[seg - 1], input[seg]);
        if value <= x1 {
            let span = x1 - x0;
            if span <= 0.0 {
                return output[seg];
            }
            let t = (value - x0) / span;
            return output[seg - 1] + (output[seg] - output[seg - 1]) * t;
        }
    }

    output[N - 1]
}
