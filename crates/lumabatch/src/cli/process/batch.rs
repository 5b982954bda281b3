//! Batch processing: progress bar, summary and optional report.

use std::time::{Duration, Instant};

use lumabatch_core::{write_report, BatchCoordinator, BatchOptions, BatchResult};
use tokio::sync::mpsc;

use super::{ProcessArgs, ProcessContext};

/// Progress forwarded from the coordinator thread to the UI task.
#[derive(Debug)]
struct ProgressEvent {
    completed: usize,
    total: usize,
    file_name: String,
}

/// Process a directory of images with a progress bar.
///
/// The coordinator runs on a blocking thread; progress is sent over a channel
/// so only this task touches the progress bar.
pub async fn process_batch(ctx: ProcessContext, args: &ProcessArgs) -> anyhow::Result<()> {
    let options = BatchOptions::new(&args.input, &args.output)
        .with_transform(ctx.transform)
        .with_workers(ctx.workers);
    let coordinator = BatchCoordinator::new(options);

    let (tx, mut rx) = mpsc::unbounded_channel::<ProgressEvent>();
    let start_time = Instant::now();
    let handle = tokio::task::spawn_blocking(move || {
        coordinator.run(|p| {
            // A closed receiver only means nobody is watching progress.
            let _ = tx.send(ProgressEvent {
                completed: p.completed,
                total: p.total,
                file_name: p.file_name.to_string(),
            });
        })
    });

    let progress = create_progress_bar();
    while let Some(event) = rx.recv().await {
        progress.set_length(event.total as u64);
        progress.set_position(event.completed as u64);
        progress.set_message(event.file_name);
    }

    let result = match handle.await? {
        Ok(result) => result,
        Err(e) => {
            progress.finish_and_clear();
            eprintln!("\nBatch processing failed");
            return Err(e.into());
        }
    };
    progress.finish_and_clear();

    if let Some(report_path) = &args.report {
        write_report(report_path, &result)?;
        tracing::info!("Report written to {:?}", report_path);
    }

    print_summary(&result, start_time.elapsed());
    eprintln!("\nBatch processing completed successfully");
    Ok(())
}

/// Create a progress bar; its length is set from the first event.
fn create_progress_bar() -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )
            .unwrap()
            .progress_chars("##-"),
    );
    pb.set_message("starting...");
    pb
}

/// Print a formatted summary table after batch processing.
fn print_summary(result: &BatchResult, elapsed: Duration) {
    let rate = if elapsed.as_secs_f64() > 0.0 {
        result.completed as f64 / elapsed.as_secs_f64()
    } else {
        0.0
    };

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Succeeded:    {:>8}", result.succeeded());
    if result.failed() > 0 {
        eprintln!("    Failed:       {:>8}", result.failed());
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", result.total);
    eprintln!("    Duration:     {:>7.1}s", elapsed.as_secs_f64());
    eprintln!("    Rate:         {:>7.1} img/sec", rate);
    eprintln!("  ====================================");
}
