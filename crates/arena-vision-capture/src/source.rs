use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::sync_channel;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use arena_vision_core::ColorFrame;
use parking_lot::RwLock;

use crate::{CaptureConfig, CaptureDevice, CaptureError};

/// Name of the background capture thread.
pub const CAPTURE_THREAD_NAME: &str = "frame-capture";

// granularity of cancellable waits
const CANCEL_POLL: Duration = Duration::from_millis(5);

/// One published frame. Cloning is a reference-count bump.
#[derive(Clone, Debug)]
pub struct FrameSnapshot {
    /// 1 for the first published frame, then strictly increasing.
    pub sequence: u64,
    pub frame: Arc<ColorFrame>,
}

struct Shared {
    latest: RwLock<Option<FrameSnapshot>>,
    cancel: AtomicBool,
    running: AtomicBool,
    published: AtomicU64,
}

impl Shared {
    fn publish(&self, frame: ColorFrame) -> u64 {
        let sequence = self.published.fetch_add(1, Ordering::AcqRel) + 1;
        let snapshot = FrameSnapshot {
            sequence,
            frame: Arc::new(frame),
        };
        *self.latest.write() = Some(snapshot);
        sequence
    }

    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }
}

/// Owns a capture device running on its own thread and exposes the most
/// recent frame it produced.
pub struct FrameSource {
    shared: Arc<Shared>,
    config: CaptureConfig,
    join_handle: Option<JoinHandle<()>>,
}

impl FrameSource {
    /// Spawn the capture thread and open `device` on it.
    ///
    /// Returns once the device is open; an open failure is reported as
    /// [`CaptureError::DeviceUnavailable`] and leaves no thread behind.
    pub fn start<D>(mut device: D, config: CaptureConfig) -> Result<Self, CaptureError>
    where
        D: CaptureDevice + 'static,
    {
        let shared = Arc::new(Shared {
            latest: RwLock::new(None),
            cancel: AtomicBool::new(false),
            running: AtomicBool::new(true),
            published: AtomicU64::new(0),
        });

        let (init_tx, init_rx) = sync_channel::<Result<(), CaptureError>>(1);
        let worker_shared = Arc::clone(&shared);
        let worker_config = config.clone();
        let join_handle = std::thread::Builder::new()
            .name(CAPTURE_THREAD_NAME.to_string())
            .spawn(move || {
                let shared = worker_shared;
                if let Err(e) = device.open(&worker_config) {
                    shared.running.store(false, Ordering::Release);
                    let _ = init_tx.send(Err(e));
                    return;
                }
                let _ = init_tx.send(Ok(()));
                log::info!(
                    "capture started at {}x{}",
                    worker_config.width,
                    worker_config.height
                );

                run_capture_loop(&mut device, &worker_config, &shared);

                device.close();
                shared.running.store(false, Ordering::Release);
                log::info!(
                    "capture stopped after {} frames",
                    shared.published.load(Ordering::Acquire)
                );
            })
            .map_err(|e| CaptureError::Spawn(e.to_string()))?;

        let init = init_rx.recv();
        match init {
            Ok(Ok(())) => Ok(Self {
                shared,
                config,
                join_handle: Some(join_handle),
            }),
            Ok(Err(e)) => {
                let _ = join_handle.join();
                log::error!("failed to open capture device: {e}");
                Err(match e {
                    CaptureError::DeviceUnavailable(msg) => CaptureError::DeviceUnavailable(msg),
                    other => CaptureError::DeviceUnavailable(other.to_string()),
                })
            }
            Err(_) => {
                let _ = join_handle.join();
                Err(CaptureError::DeviceUnavailable(
                    "capture thread exited during open".to_string(),
                ))
            }
        }
    }

    /// Latest published frame, or `None` before the first capture.
    ///
    /// Never waits for a new frame; the lock is held only for the `Arc` clone.
    pub fn current_frame(&self) -> Option<FrameSnapshot> {
        self.shared.latest.read().clone()
    }

    /// Number of frames published so far.
    pub fn frames_captured(&self) -> u64 {
        self.shared.published.load(Ordering::Acquire)
    }

    /// `false` once the capture thread has exited.
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Stop capturing and join the capture thread.
    ///
    /// The in-flight capture is allowed to finish; the device is closed on
    /// the capture thread before this returns. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        let Some(handle) = self.join_handle.take() else {
            return;
        };
        self.shared.cancel.store(true, Ordering::Release);
        if handle.join().is_err() {
            log::error!("capture thread panicked");
            self.shared.running.store(false, Ordering::Release);
        }
    }
}

impl Drop for FrameSource {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for FrameSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameSource")
            .field("config", &self.config)
            .field("running", &self.is_running())
            .field("frames_captured", &self.frames_captured())
            .finish()
    }
}

fn run_capture_loop<D: CaptureDevice>(device: &mut D, config: &CaptureConfig, shared: &Shared) {
    while !shared.cancelled() {
        // keep pumping frames until capturing fails
        while !shared.cancelled() {
            match device.blocking_capture() {
                Ok(frame) => {
                    if !config.matches(frame.width, frame.height) {
                        let err = CaptureError::FrameSize {
                            width: config.width,
                            height: config.height,
                            got_width: frame.width,
                            got_height: frame.height,
                        };
                        log::warn!("dropping frame: {err}");
                        continue;
                    }
                    let sequence = shared.publish(frame);
                    log::trace!("published frame {sequence}");
                }
                Err(e) => {
                    log::error!("capture failed: {e}");
                    break;
                }
            }
        }

        // close, wait, and reopen the device
        while !shared.cancelled() {
            log::info!("reconnecting capture device");
            device.close();
            if !wait_unless_cancelled(shared, config.reconnect_delay()) {
                break;
            }
            match device.open(config) {
                Ok(()) => break,
                Err(e) => log::warn!("reopen failed: {e}"),
            }
        }
    }
}

/// Sleep for `delay`, waking early on cancellation. Returns `false` if
/// cancelled.
fn wait_unless_cancelled(shared: &Shared, delay: Duration) -> bool {
    let deadline = Instant::now() + delay;
    loop {
        if shared.cancelled() {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        std::thread::sleep(CANCEL_POLL.min(deadline - now));
    }
}
