use ndarray::Array1;

///
/// Unnormalized gaussian smoothing kernel.
///
/// Covers offsets `[-W, W)`; the weight at offset 0 is exactly 1, so a single read with a
/// count of one produces a signal height of 1 at its own position.
///
#[derive(Debug, Clone)]
pub struct Kernel {
    sigma: f64,
    half_width: usize,
    weights: Array1<f64>,
}

impl Kernel {
    pub fn new(sigma: u32, half_width: usize) -> Self {
        let sigma = sigma as f64;
        let sigma2 = sigma * sigma;
        let w = half_width as i64;
        let weights = (-w..w)
            .map(|x| {
                let x = x as f64;
                (-x * x / (2.0 * sigma2)).exp()
            })
            .collect::<Array1<f64>>();

        Kernel {
            sigma,
            half_width,
            weights,
        }
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn half_width(&self) -> usize {
        self.half_width
    }

    /// Weights for offsets `-W..W`, in order.
    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    /// Weight at `offset` from the centre; zero outside the kernel's support.
    pub fn weight(&self, offset: i64) -> f64 {
        let idx = offset + self.half_width as i64;
        if idx < 0 || idx >= self.weights.len() as i64 {
            return 0.0;
        }
        self.weights[idx as usize]
    }
}
