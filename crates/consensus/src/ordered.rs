//! Bounded worker pool that runs indexed tasks concurrently and yields their results in index
//! order.
use std::{num::NonZeroUsize, sync::Arc, thread};

use crossbeam_channel::{Receiver, Sender, bounded, select};

/// Handle to a running [`run_ordered`] batch.
///
/// Results arrive on [`OrderedResults::results`] in input order. Dropping the handle does not
/// abort the batch; the remaining results are buffered and discarded.
#[derive(Debug)]
pub struct OrderedResults<R> {
    /// Abort signal observed by the coordinator.
    abort: Sender<()>,
    /// Results in input order.
    results: Receiver<R>,
}

impl<R> OrderedResults<R> {
    /// Stops dispatching new tasks. In-flight tasks complete but their results are dropped.
    pub fn abort(&self) {
        let _ = self.abort.try_send(());
    }

    /// The channel delivering results in input order.
    pub fn results(&self) -> &Receiver<R> {
        &self.results
    }

    /// Splits the handle into its abort sender and result receiver.
    pub fn into_parts(self) -> (Sender<()>, Receiver<R>) {
        (self.abort, self.results)
    }
}

/// Number of workers to use for a batch of `len` tasks.
pub fn default_workers(len: usize) -> usize {
    thread::available_parallelism().map(NonZeroUsize::get).unwrap_or(1).min(len)
}

/// Runs `task(0..len)` on `workers` threads and streams the results in index order.
///
/// A coordinator thread hands out indices, collects completions in whatever order they finish
/// and forwards the longest completed prefix. The result channel holds `len` items, so the
/// coordinator never blocks on a consumer that stopped reading.
pub fn run_ordered<R, F>(len: usize, workers: usize, task: F) -> OrderedResults<R>
where
    R: Send + 'static,
    F: Fn(usize) -> R + Send + Sync + 'static,
{
    let (abort_tx, abort_rx) = bounded::<()>(1);
    let (results_tx, results_rx) = bounded::<R>(len);
    let handle = OrderedResults { abort: abort_tx.clone(), results: results_rx };
    if len == 0 {
        return handle;
    }

    let workers = workers.clamp(1, len);
    let (inputs_tx, inputs_rx) = bounded::<usize>(0);
    let (done_tx, done_rx) = bounded::<(usize, R)>(workers);

    let task = Arc::new(task);
    for _ in 0..workers {
        let inputs = inputs_rx.clone();
        let done = done_tx.clone();
        let task = Arc::clone(&task);
        thread::spawn(move || {
            for index in inputs.iter() {
                if done.send((index, task(index))).is_err() {
                    break;
                }
            }
        });
    }
    drop(done_tx);

    thread::spawn(move || {
        // Held so that dropping the handle is not mistaken for an abort.
        let _abort_tx = abort_tx;
        let mut buffer: Vec<Option<R>> = (0..len).map(|_| None).collect();
        let (mut next, mut out) = (0, 0);

        let mut complete = |(index, result): (usize, R)| -> bool {
            buffer[index] = Some(result);
            while let Some(result) = buffer.get_mut(out).and_then(Option::take) {
                let _ = results_tx.send(result);
                out += 1;
            }
            out == len
        };

        loop {
            if next < len {
                select! {
                    send(inputs_tx, next) -> sent => {
                        if sent.is_err() {
                            return;
                        }
                        next += 1;
                    }
                    recv(done_rx) -> done => match done {
                        Ok(done) => {
                            if complete(done) {
                                return;
                            }
                        }
                        Err(_) => return,
                    },
                    recv(abort_rx) -> _ => return,
                }
            } else {
                select! {
                    recv(done_rx) -> done => match done {
                        Ok(done) => {
                            if complete(done) {
                                return;
                            }
                        }
                        Err(_) => return,
                    },
                    recv(abort_rx) -> _ => return,
                }
            }
        }
    });

    handle
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    #[test]
    fn test_results_follow_input_order() {
        // Later indices finish first.
        let handle = run_ordered(8, 4, |index| {
            thread::sleep(Duration::from_millis((8 - index as u64) * 5));
            index * 10
        });

        let results: Vec<_> = handle.results().iter().take(8).collect();
        assert_eq!(results, vec![0, 10, 20, 30, 40, 50, 60, 70]);
    }

    #[test]
    fn test_empty_batch_closes_results() {
        let handle = run_ordered(0, 4, |index| index);
        assert!(handle.results().recv().is_err());
    }

    #[test]
    fn test_abort_stops_dispatch() {
        let started = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&started);
        let handle = run_ordered(1_000, 1, move |index| {
            counter.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(1));
            index
        });

        assert_eq!(handle.results().recv().unwrap(), 0);
        handle.abort();

        // The coordinator exits and closes the result channel.
        let remaining = handle.results().iter().count();
        assert!(remaining < 999);
        assert!(started.load(Ordering::SeqCst) < 1_000);
    }

    #[test]
    fn test_abandoned_consumer_does_not_block() {
        let finished = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&finished);
        drop(run_ordered(16, 2, move |index| {
            counter.fetch_add(1, Ordering::SeqCst);
            index
        }));

        for _ in 0..200 {
            if finished.load(Ordering::SeqCst) == 16 {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("workers did not drain the batch");
    }
}
