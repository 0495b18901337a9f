//! Sheet pipeline: decode declared sheets on a fixed worker pool
//!
//! Workers pull sheet indices from a shared cursor and push `(index, result)`
//! pairs into a bounded queue sized to the sheet count, so a send never
//! blocks. The collector places successes at their declared index and
//! returns the first failure it receives; once a failure is observed no
//! worker starts another sheet.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::thread;

use crate::error::{XlsxError, XlsxResult};

/// One declared sheet to decode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetJob {
    /// Sheet name from the workbook
    pub name: String,
    /// Archive member holding the worksheet
    pub path: String,
}

/// Lifecycle of a sheet inside the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetState {
    Pending,
    Decoding,
    Done,
    Failed,
}

/// Worker count used when the caller does not pick one
pub fn default_workers() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Decode every job, returning results in job order.
///
/// At most `workers` threads run, never more than there are jobs; `0` is
/// treated as `1`. A panic inside `decode` becomes [`XlsxError::SheetPanic`].
pub fn run<T, F>(jobs: &[SheetJob], workers: usize, decode: F) -> XlsxResult<Vec<T>>
where
    T: Send,
    F: Fn(&SheetJob) -> XlsxResult<T> + Sync,
{
    if jobs.is_empty() {
        return Ok(Vec::new());
    }
    let workers = workers.clamp(1, jobs.len());
    for job in jobs {
        log::debug!("sheet '{}': {:?}", job.name, SheetState::Pending);
    }

    let (tx, rx) = mpsc::sync_channel(jobs.len());
    let cursor = AtomicUsize::new(0);
    let failed = AtomicBool::new(false);

    thread::scope(|scope| {
        for _ in 0..workers {
            let tx = tx.clone();
            let (cursor, failed, decode) = (&cursor, &failed, &decode);
            scope.spawn(move || {
                while !failed.load(Ordering::Acquire) {
                    let index = cursor.fetch_add(1, Ordering::Relaxed);
                    let Some(job) = jobs.get(index) else {
                        break;
                    };
                    log::debug!("sheet '{}': {:?}", job.name, SheetState::Decoding);

                    let result = guarded(job, decode);
                    if result.is_err() {
                        failed.store(true, Ordering::Release);
                    }
                    // collector gone: it already has its answer
                    if tx.send((index, result)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx);

        collect(rx, jobs)
    })
}

/// Run one decode, turning a panic into an error
fn guarded<T, F>(job: &SheetJob, decode: &F) -> XlsxResult<T>
where
    F: Fn(&SheetJob) -> XlsxResult<T>,
{
    panic::catch_unwind(AssertUnwindSafe(|| decode(job))).unwrap_or_else(|payload| {
        Err(XlsxError::SheetPanic {
            sheet: job.name.clone(),
            message: panic_message(payload.as_ref()),
        })
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn collect<T>(rx: Receiver<(usize, XlsxResult<T>)>, jobs: &[SheetJob]) -> XlsxResult<Vec<T>> {
    let mut slots: Vec<Option<T>> = jobs.iter().map(|_| None).collect();

    for _ in 0..jobs.len() {
        let (index, result) = rx.recv().map_err(|_| {
            XlsxError::Pipeline("sheet workers exited before reporting every sheet".into())
        })?;
        let name = &jobs[index].name;
        match result {
            Ok(value) => {
                log::debug!("sheet '{}': {:?}", name, SheetState::Done);
                slots[index] = Some(value);
            }
            Err(e) => {
                log::debug!("sheet '{}': {:?} ({})", name, SheetState::Failed, e);
                return Err(e);
            }
        }
    }

    slots
        .into_iter()
        .zip(jobs)
        .map(|(slot, job)| {
            slot.ok_or_else(|| XlsxError::Pipeline(format!("no result for sheet '{}'", job.name)))
        })
        .collect()
}
