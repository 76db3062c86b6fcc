/// Bands handed out per worker, so a slow band does not stall the pass.
const BANDS_PER_THREAD: usize = 4;

/// Splits a pass's output buffer into disjoint bands of whole rows and
/// fills them on scoped worker threads.
///
/// Each band is written by exactly one worker and every worker reads only
/// the pass's immutable input, so the result is independent of the thread
/// count. Bands are distributed through a shared work queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowBands {
    threads: usize,
}

impl RowBands {
    pub fn new(threads: usize) -> Self {
        Self {
            threads: threads.max(1),
        }
    }

    /// Runs every band on the calling thread.
    pub fn sequential() -> Self {
        Self::new(1)
    }

    /// One worker per available CPU.
    pub fn available() -> Self {
        Self::new(num_cpus())
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Calls `f(first_row, band)` for bands of `row_len`-element rows that
    /// together cover `output` exactly once.
    pub fn run<T, F>(&self, output: &mut [T], row_len: usize, f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync,
    {
        if output.is_empty() || row_len == 0 {
            return;
        }
        debug_assert_eq!(output.len() % row_len, 0, "output must hold whole rows");
        let rows = output.len() / row_len;
        let workers = self.threads.min(rows);
        if workers <= 1 {
            f(0, output);
            return;
        }

        let rows_per_band = rows.div_ceil(workers * BANDS_PER_THREAD).max(1);
        let (band_tx, band_rx) = crossbeam_channel::unbounded::<(usize, &mut [T])>();
        for (i, band) in output.chunks_mut(rows_per_band * row_len).enumerate() {
            band_tx
                .send((i * rows_per_band, band))
                .expect("band queue receiver is alive");
        }
        drop(band_tx);

        let f = &f;
        std::thread::scope(|scope| {
            for _ in 0..workers {
                let band_rx = band_rx.clone();
                scope.spawn(move || {
                    for (first_row, band) in band_rx.iter() {
                        f(first_row, band);
                    }
                });
            }
        });
    }
}

impl Default for RowBands {
    fn default() -> Self {
        Self::sequential()
    }
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
