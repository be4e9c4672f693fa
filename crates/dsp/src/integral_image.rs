/// Integral image over a sliding window of feature rows.
///
/// Rows are appended over time; only the most recent `max_rows` rows are
/// retained, stored in a ring and addressed by their absolute row index
/// modulo capacity. Each stored row holds cumulative sums over both axes,
/// so any rectangle within the retained window is a four-lookup query.
///
/// Row indices passed to [`RollingIntegralImage::area`] are absolute (they
/// keep counting up as rows are appended); asking for a row that has been
/// evicted is a programmer error and aborts.
pub struct RollingIntegralImage {
    columns: usize,
    max_rows: usize,
    data: Vec<f64>,
    rows: usize,
}

impl RollingIntegralImage {
    pub fn new(columns: usize, max_rows: usize) -> Self {
        assert!(columns > 0 && max_rows > 0);
        Self {
            columns,
            max_rows,
            data: vec![0.0; columns * max_rows],
            rows: 0,
        }
    }

    /// Total number of rows appended so far (not the retained count).
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn add_row(&mut self, row: &[f64]) {
        assert_eq!(row.len(), self.columns, "row width mismatch");
        let base = (self.rows % self.max_rows) * self.columns;
        let mut sum = 0.0;
        for (i, &value) in row.iter().enumerate() {
            sum += value;
            self.data[base + i] = sum;
        }
        if self.rows > 0 {
            let prev = ((self.rows - 1) % self.max_rows) * self.columns;
            for i in 0..self.columns {
                let carried = self.data[prev + i];
                self.data[base + i] += carried;
            }
        }
        self.rows += 1;
    }

    /// Inclusive rectangle sum over rows `r1..=r2` and columns `c1..=c2`.
    pub fn area(&self, r1: usize, c1: usize, r2: usize, c2: usize) -> f64 {
        if r2 < r1 || c2 < c1 {
            return 0.0;
        }
        assert!(r2 < self.rows, "row {r2} has not been appended yet");
        let oldest = self.rows.saturating_sub(self.max_rows);
        assert!(
            r1 == 0 || r1 - 1 >= oldest,
            "row {r1} fell out of the rolling window"
        );

        let mut area = self.cell(r2, c2);
        if r1 > 0 {
            area -= self.cell(r1 - 1, c2);
        }
        if c1 > 0 {
            area -= self.cell(r2, c1 - 1);
            if r1 > 0 {
                area += self.cell(r1 - 1, c1 - 1);
            }
        }
        area
    }

    pub fn reset(&mut self) {
        self.data.fill(0.0);
        self.rows = 0;
    }

    fn cell(&self, row: usize, column: usize) -> f64 {
        self.data[(row % self.max_rows) * self.columns + column]
    }
}
