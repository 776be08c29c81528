//! Randomized batch loader over an index subset
//!
//! Each loader owns one side of an [`crate::data::IndexSplit`] and yields
//! flat `rows * sample_dim` tensors. Every epoch re-shuffles the loader's own
//! indices with its private RNG (sampling without replacement), then serves
//! contiguous chunks of `batch_size` rows, trailing partial chunk included.
//!
//! With `num_workers > 0`, collation runs on a fixed pool of threads feeding
//! a bounded channel. Batches are reassembled by sequence number, so the
//! worker path yields exactly the same stream as the inline path — the worker
//! count is a throughput knob, never a semantics knob.

use log::trace;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::{HashMap, VecDeque};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use super::dataset::Dataset;
use crate::Tensor;

/// Batch loader that samples its index set in random order each epoch.
#[derive(Debug)]
pub struct DataLoader<D> {
    dataset: Arc<D>,
    indices: Vec<usize>,
    batch_size: usize,
    num_workers: usize,
    rng: StdRng,
}

impl<D: Dataset + Send + Sync + 'static> DataLoader<D> {
    pub(crate) fn new(
        dataset: Arc<D>,
        indices: Vec<usize>,
        batch_size: usize,
        num_workers: usize,
        seed: u64,
    ) -> Self {
        Self {
            dataset,
            indices,
            batch_size,
            num_workers,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Number of samples this loader draws from.
    pub fn sample_count(&self) -> usize {
        self.indices.len()
    }

    /// Batch size of the yielded tensors (in rows).
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of batches one epoch yields (trailing partial batch included).
    pub fn batches_per_epoch(&self) -> usize {
        self.indices.len().div_ceil(self.batch_size)
    }

    /// The loader's index set, in partition order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Start a new epoch: reshuffle the index set and iterate its batches.
    pub fn iter_epoch(&mut self) -> BatchIter<D> {
        let mut order = self.indices.clone();
        order.shuffle(&mut self.rng);
        trace!(
            "epoch over {} samples in {} batches ({} workers)",
            order.len(),
            self.batches_per_epoch(),
            self.num_workers
        );

        let chunks: Vec<Vec<usize>> =
            order.chunks(self.batch_size).map(<[usize]>::to_vec).collect();

        let inner = if self.num_workers == 0 {
            IterInner::Inline {
                dataset: Arc::clone(&self.dataset),
                chunks: chunks.into_iter(),
            }
        } else {
            IterInner::pooled(Arc::clone(&self.dataset), chunks, self.num_workers)
        };
        BatchIter { inner }
    }
}

/// Collate a chunk of rows into one flat buffer.
fn collate<D: Dataset>(dataset: &D, chunk: &[usize]) -> Vec<f32> {
    let mut buf = Vec::with_capacity(chunk.len() * dataset.sample_dim());
    for &index in chunk {
        buf.extend(dataset.get(index));
    }
    buf
}

/// Iterator over one epoch's batches.
pub struct BatchIter<D> {
    inner: IterInner<D>,
}

enum IterInner<D> {
    Inline {
        dataset: Arc<D>,
        chunks: std::vec::IntoIter<Vec<usize>>,
    },
    Pooled {
        rx: Receiver<(usize, Vec<f32>)>,
        pending: HashMap<usize, Vec<f32>>,
        next_seq: usize,
        total: usize,
        workers: Vec<JoinHandle<()>>,
    },
    Drained,
}

impl<D> IterInner<D>
where
    D: Dataset + Send + Sync + 'static,
{
    fn pooled(dataset: Arc<D>, chunks: Vec<Vec<usize>>, num_workers: usize) -> Self {
        let total = chunks.len();
        let queue: Arc<Mutex<VecDeque<(usize, Vec<usize>)>>> =
            Arc::new(Mutex::new(chunks.into_iter().enumerate().collect()));
        let (tx, rx) = mpsc::sync_channel(num_workers * 2);

        let workers = (0..num_workers)
            .map(|_| {
                let queue = Arc::clone(&queue);
                let dataset = Arc::clone(&dataset);
                let tx = tx.clone();
                thread::spawn(move || loop {
                    let job = queue.lock().unwrap_or_else(PoisonError::into_inner).pop_front();
                    let Some((seq, chunk)) = job else { break };
                    let buf = collate(dataset.as_ref(), &chunk);
                    // The consumer hanging up is a normal early exit.
                    if tx.send((seq, buf)).is_err() {
                        break;
                    }
                })
            })
            .collect();

        IterInner::Pooled { rx, pending: HashMap::new(), next_seq: 0, total, workers }
    }
}

impl<D: Dataset> Iterator for BatchIter<D> {
    type Item = Tensor;

    fn next(&mut self) -> Option<Tensor> {
        match &mut self.inner {
            IterInner::Inline { dataset, chunks } => chunks
                .next()
                .map(|chunk| Tensor::from_vec(collate(dataset.as_ref(), &chunk), false)),
            IterInner::Pooled { rx, pending, next_seq, total, .. } => {
                if *next_seq >= *total {
                    return None;
                }
                // Emit strictly in sequence order, buffering out-of-order arrivals.
                loop {
                    if let Some(buf) = pending.remove(next_seq) {
                        *next_seq += 1;
                        return Some(Tensor::from_vec(buf, false));
                    }
                    match rx.recv() {
                        Ok((seq, buf)) => {
                            pending.insert(seq, buf);
                        }
                        Err(_) => return None,
                    }
                }
            }
            IterInner::Drained => None,
        }
    }
}

impl<D> Drop for BatchIter<D> {
    fn drop(&mut self) {
        if matches!(self.inner, IterInner::Pooled { .. }) {
            let inner = std::mem::replace(&mut self.inner, IterInner::Drained);
            if let IterInner::Pooled { rx, workers, .. } = inner {
                // Hang up first so blocked senders error out, then reap the pool.
                drop(rx);
                for handle in workers {
                    let _ = handle.join();
                }
            }
        }
    }
}
