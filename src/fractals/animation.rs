//! Concurrent frame pipeline for Julia set animations.
//!
//! Every frame is an independent job. Jobs are queued up front, a fixed number of scoped
//! worker threads render them, and a single collector places each finished raster into its
//! slot by frame index. The order of the final sequence never depends on completion order.

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

use crossbeam::channel::{self, Receiver, Sender};
use num::complex::Complex64;

use crate::{
    core::{error::RenderError, image_utils::Raster, stopwatch::Stopwatch},
    fractals::{
        julia::{render_julia_frame, JuliaParams},
        parameter_path::ParameterPath,
    },
};

/// One frame to render: its position in the animation and its constant term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameJob {
    pub index: usize,
    pub parameter: Complex64,
}

/// The outcome of one job. A panic inside the renderer is captured as `Err(message)`.
pub struct FrameResult {
    pub index: usize,
    pub outcome: Result<Raster, String>,
}

/// Complete, ordered animation. Only the collector constructs one, after every slot is filled.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationSequence {
    frames: Vec<Raster>,
}

impl AnimationSequence {
    pub fn frames(&self) -> &[Raster] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn into_frames(self) -> Vec<Raster> {
        self.frames
    }
}

pub fn validate_counts(n_frames: usize, n_workers: usize) -> Result<(), RenderError> {
    if n_frames == 0 {
        return Err(RenderError::InvalidFrameCount(n_frames));
    }
    if n_workers == 0 {
        return Err(RenderError::InvalidWorkerCount(n_workers));
    }
    Ok(())
}

pub fn build_frame_jobs(path: ParameterPath, n_frames: usize) -> Vec<FrameJob> {
    (0..n_frames)
        .map(|index| FrameJob {
            index,
            parameter: path.parameter(index, n_frames),
        })
        .collect()
}

/**
 * Renders one frame per index of `path` using exactly `n_workers` worker threads and
 * returns the frames in index order.
 *
 * A panic while rendering a frame is contained to that frame's job: the remaining jobs
 * still run, and the whole call then fails with `RenderPanic` for the lowest failed index.
 */
pub fn run_frame_pipeline<F>(
    path: ParameterPath,
    n_frames: usize,
    n_workers: usize,
    render_frame: F,
) -> Result<AnimationSequence, RenderError>
where
    F: Fn(&FrameJob) -> Raster + Sync,
{
    validate_counts(n_frames, n_workers)?;

    let (job_sender, job_receiver) = channel::bounded::<FrameJob>(n_frames);
    let (result_sender, result_receiver) = channel::bounded::<FrameResult>(n_frames);

    for job in build_frame_jobs(path, n_frames) {
        job_sender
            .send(job)
            .map_err(|_| RenderError::JobQueueClosed(n_frames))?;
    }
    // Closing the queue lets idle workers exit once it is drained.
    drop(job_sender);

    let render_frame = &render_frame;
    crossbeam::scope(|scope| {
        for worker_id in 0..n_workers {
            let jobs = job_receiver.clone();
            let results = result_sender.clone();
            scope.spawn(move |_| frame_worker(worker_id, jobs, results, render_frame));
        }
        // The collector must not hold a sender, or a lost result would block it forever.
        drop(result_sender);
        collect_frames(&result_receiver, n_frames)
    })
    .map_err(|_| RenderError::WorkerPanic)?
}

fn frame_worker<F>(
    worker_id: usize,
    jobs: Receiver<FrameJob>,
    results: Sender<FrameResult>,
    render_frame: &F,
) where
    F: Fn(&FrameJob) -> Raster + Sync,
{
    for job in jobs.iter() {
        let outcome =
            panic::catch_unwind(AssertUnwindSafe(|| render_frame(&job))).map_err(panic_message);
        match &outcome {
            Ok(_) => log::debug!("Worker {} finished frame number {}", worker_id, job.index),
            Err(message) => log::error!(
                "Worker {} failed frame number {}: {}",
                worker_id,
                job.index,
                message
            ),
        }
        let result = FrameResult {
            index: job.index,
            outcome,
        };
        if results.send(result).is_err() {
            break;
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}

fn collect_frames(
    results: &Receiver<FrameResult>,
    n_frames: usize,
) -> Result<AnimationSequence, RenderError> {
    let mut slots: Vec<Option<Raster>> = (0..n_frames).map(|_| None).collect();
    let mut first_failure: Option<(usize, String)> = None;

    for received in 0..n_frames {
        let result = results
            .recv()
            .map_err(|_| RenderError::ResultChannelClosed {
                received,
                expected: n_frames,
            })?;
        match result.outcome {
            Ok(raster) => slots[result.index] = Some(raster),
            Err(message) => {
                if first_failure
                    .as_ref()
                    .map_or(true, |(index, _)| result.index < *index)
                {
                    first_failure = Some((result.index, message));
                }
            }
        }
    }

    if let Some((index, message)) = first_failure {
        return Err(RenderError::RenderPanic { index, message });
    }

    let frames = slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| slot.ok_or(RenderError::MissingFrame(index)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(AnimationSequence { frames })
}

/**
 * Renders an animated sequence of Julia sets, one frame per point along the named
 * parameter path, with `n_workers` frames in flight at a time.
 */
pub fn render_julia_animation(
    n_frames: usize,
    n_workers: usize,
    path_name: &str,
    params: &JuliaParams,
) -> Result<AnimationSequence, RenderError> {
    let path: ParameterPath = path_name.parse()?;
    validate_counts(n_frames, n_workers)?;

    log::info!(
        "Starting job with n_frames = {} n_workers = {} parameter_path = {}",
        n_frames,
        n_workers,
        path
    );
    let stopwatch = Stopwatch::new(format!("Julia animation ({})", path));
    let sequence = run_frame_pipeline(path, n_frames, n_workers, |job| {
        render_julia_frame(params, job.parameter)
    })?;
    stopwatch.log_summary();
    Ok(sequence)
}
