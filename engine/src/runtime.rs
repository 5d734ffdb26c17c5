//! Frame loop: polls the landmark source on a calloop timer, feeds the
//! assembler and ticks the interaction session.
//!
//! One synchronous `detect` per timer firing keeps at most one request
//! outstanding.  Detector faults skip that frame; readiness stays set.
//! SIGINT/SIGTERM, source exhaustion or the exit timer end the loop, after
//! which the timer is removed and the session torn down.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use calloop::timer::{TimeoutAction, Timer};
use calloop::EventLoop;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::interaction::{GalleryItem, InteractionSession};
use crate::source::LandmarkSource;
use crate::tracking::{FrameAssembler, GestureClassifier};

/// Set by SIGTERM/SIGINT handlers.
static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Loop settings from the command line.
#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    /// Interval between detection requests.
    pub frame_interval_ms: u64,
    /// Stop after this many seconds.
    pub exit_after: Option<u64>,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            frame_interval_ms: 33,
            exit_after: None,
        }
    }
}

/// Everything the timer callback touches.
pub struct EngineState {
    pub running: bool,
    pub assembler: FrameAssembler,
    pub session: InteractionSession,
    source: Box<dyn LandmarkSource>,
    emit_snapshots: bool,
    /// Detection requests made.
    pub frames: u64,
    /// Detector faults swallowed.
    pub faults: u64,
}

impl EngineState {
    /// Build the pipeline around an opened source.  Opening the source
    /// is what makes the pipeline ready.
    pub fn new(
        config: &EngineConfig,
        source: Box<dyn LandmarkSource>,
        items: Vec<GalleryItem>,
        emit_snapshots: bool,
    ) -> Self {
        let classifier = GestureClassifier::new(config.gesture.clone());
        let mut assembler = FrameAssembler::new(config.assembler.clone(), classifier);
        assembler.set_ready(true);
        let mut session = InteractionSession::new(config);
        session.set_collection(items);
        Self {
            running: true,
            assembler,
            session,
            source,
            emit_snapshots,
            frames: 0,
            faults: 0,
        }
    }

    /// One timer firing.  Returns the s-expression lines to write.
    pub fn on_frame(&mut self, now_ms: f64) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.running {
            return lines;
        }
        self.frames += 1;

        let events = match self.source.detect() {
            Ok(Some(detections)) => match self.assembler.process(&detections, now_ms) {
                Some(snapshot) => {
                    if self.emit_snapshots {
                        lines.push(snapshot.to_sexp());
                    }
                    self.session.tick(snapshot, now_ms)
                }
                None => self.session.poll(now_ms),
            },
            Ok(None) => {
                info!("Landmark source {} exhausted", self.source.name());
                self.running = false;
                return lines;
            }
            Err(e) => {
                self.faults += 1;
                warn!("Detector error, skipping frame: {:#}", e);
                self.session.poll(now_ms)
            }
        };

        for event in &events {
            debug!("Interaction event: {}", event.name());
        }
        lines.extend(events.iter().map(|e| e.to_sexp()));
        lines
    }

    /// Stop the session so nothing fires after the loop ends.
    pub fn shutdown(&mut self) {
        self.running = false;
        self.session.teardown();
        info!(
            "Engine stopped ({} frames, {} faults) assembler {}",
            self.frames,
            self.faults,
            self.assembler.status_sexp()
        );
    }
}

/// Install signal handlers for graceful shutdown (SIGTERM, SIGINT).
fn install_signal_handlers() {
    unsafe {
        libc::signal(libc::SIGTERM, signal_handler as libc::sighandler_t);
        libc::signal(libc::SIGINT, signal_handler as libc::sighandler_t);
    }
}

extern "C" fn signal_handler(_sig: libc::c_int) {
    SHUTDOWN_REQUESTED.store(true, Ordering::SeqCst);
}

/// Run the frame loop until shutdown.
pub fn run(mut state: EngineState, options: RuntimeOptions) -> anyhow::Result<()> {
    let mut event_loop = EventLoop::<EngineState>::try_new()?;
    install_signal_handlers();

    let interval = Duration::from_millis(options.frame_interval_ms.max(1));
    let start_time = Instant::now();
    let timer = event_loop
        .handle()
        .insert_source(Timer::from_duration(interval), move |_, _, state| {
            let now_ms = start_time.elapsed().as_secs_f64() * 1000.0;
            let lines = state.on_frame(now_ms);
            let mut stdout = std::io::stdout().lock();
            for line in lines {
                if let Err(e) = writeln!(stdout, "{}", line) {
                    warn!("Failed to write event, stopping: {}", e);
                    state.running = false;
                    break;
                }
            }
            if let Err(e) = stdout.flush() {
                debug!("stdout flush failed: {}", e);
            }
            if state.running {
                TimeoutAction::ToDuration(interval)
            } else {
                TimeoutAction::Drop
            }
        })
        .map_err(|e| anyhow::anyhow!("failed to insert frame timer: {}", e.error))?;

    let exit_duration = options.exit_after.map(Duration::from_secs);
    info!(
        "Frame loop started (interval {}ms, source ready: {})",
        options.frame_interval_ms,
        state.assembler.is_ready()
    );

    while state.running {
        if SHUTDOWN_REQUESTED.load(Ordering::SeqCst) {
            info!("Shutdown signal received, exiting");
            break;
        }
        if let Some(dur) = exit_duration {
            if start_time.elapsed() >= dur {
                info!("Exit timer fired after {}s", dur.as_secs());
                break;
            }
        }
        event_loop.dispatch(Some(interval), &mut state)?;
    }

    event_loop.handle().remove(timer);
    state.shutdown();
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────
