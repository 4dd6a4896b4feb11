/// Running means and centered sums for an ordinary least-squares line
/// `y = slope·x + intercept`, updated one point at a time (Welford).
#[derive(Clone, Copy, Default, Debug)]
pub struct LinearAccumulator {
    x_mean: f64,
    y_mean: f64,
    xx_centered: f64,
    yy_centered: f64,
    xy_centered: f64,
    n: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearRegression {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl LinearAccumulator {
    pub fn push(&mut self, x: f64, y: f64) {
        self.n += 1;
        let n = self.n as f64;
        let dx = x - self.x_mean;
        let dy = y - self.y_mean;
        self.x_mean += dx / n;
        self.y_mean += dy / n;
        self.xx_centered += dx * (x - self.x_mean);
        self.yy_centered += dy * (y - self.y_mean);
        self.xy_centered += dx * (y - self.y_mean);
    }

    /// `None` with fewer than two points or when either variable is constant.
    pub fn estimate(&self) -> Option<LinearRegression> {
        if self.n < 2 || self.xx_centered <= 0.0 || self.yy_centered <= 0.0 {
            return None;
        }

        let slope = self.xy_centered / self.xx_centered;
        let intercept = self.y_mean - slope * self.x_mean;
        let r_squared = (self.xy_centered * self.xy_centered
            / (self.xx_centered * self.yy_centered))
            .clamp(0.0, 1.0);
        Some(LinearRegression {
            slope,
            intercept,
            r_squared,
        })
    }
}


/// Regresses `y` on `x` pairwise; extra elements of the longer slice are ignored.
pub fn regress(x: &[f64], y: &[f64]) -> Option<LinearRegression> {
    let mut accumulator = LinearAccumulator::default();
    for (&xi, &yi) in x.iter().zip(y) {
        accumulator.push(xi, yi);
    }
    accumulator.estimate()
}
