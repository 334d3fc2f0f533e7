//! Detection loop: camera frames → landmark detection → gesture slot
//!
//! Camera acquisition and landmark detection are external collaborators,
//! modelled by the [`Camera`] and [`HandDetector`] traits. The loop runs on
//! its own thread at whatever rate the camera delivers frames and publishes
//! each classification into a [`SignalPublisher`]. The render loop never
//! waits on it.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use tracing::{debug, error, info, warn};

use super::classifier::GestureClassifier;
use super::landmark::LandmarkSample;
use super::slot::SignalPublisher;

/// One captured camera image
#[derive(Debug, Clone)]
pub struct CameraFrame {
    /// Monotonic frame counter
    pub index: u64,
    /// When the frame was captured
    pub captured_at: Instant,
    pub width: u32,
    pub height: u32,
    /// Raw pixel data, format defined by the camera implementation
    pub pixels: Vec<u8>,
}

/// Output of one detection call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detection {
    /// Zero or more hands, in detector order
    pub hands: Vec<LandmarkSample>,
}

impl Detection {
    /// No hands found
    pub fn none() -> Self {
        Self::default()
    }

    /// A single hand
    pub fn single(hand: LandmarkSample) -> Self {
        Self { hands: vec![hand] }
    }

    /// Only the first hand is ever used
    pub fn first_hand(&self) -> Option<&LandmarkSample> {
        self.hands.first()
    }
}

/// Camera acquisition errors
#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    #[error("Camera permission denied")]
    PermissionDenied,

    #[error("Camera unavailable: {0}")]
    Unavailable(String),
}

/// Landmark detector errors
#[derive(Debug, thiserror::Error)]
pub enum DetectorError {
    #[error("Detector initialization failed: {0}")]
    Init(String),
}

/// Errors starting the detection loop
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error(transparent)]
    Camera(#[from] CameraError),

    #[error(transparent)]
    Detector(#[from] DetectorError),

    #[error("Failed to spawn detection thread: {0}")]
    Spawn(#[source] io::Error),
}

/// A camera that yields frames until released
pub trait Camera: Send + 'static {
    /// Acquire the device
    fn open(&mut self) -> Result<(), CameraError>;

    /// Block until the next frame. `None` means the stream has ended.
    fn next_frame(&mut self) -> Option<CameraFrame>;

    /// Release the device. Must be safe to call more than once.
    fn release(&mut self);
}

/// The landmark-detection service, used as a black box
pub trait HandDetector: Send + 'static {
    /// One-time setup (model loading and the like)
    fn initialize(&mut self) -> Result<(), DetectorError>;

    /// Detect hands in one frame
    fn detect(&mut self, frame: &CameraFrame) -> Detection;
}

impl<C: Camera + ?Sized> Camera for Box<C> {
    fn open(&mut self) -> Result<(), CameraError> {
        (**self).open()
    }

    fn next_frame(&mut self) -> Option<CameraFrame> {
        (**self).next_frame()
    }

    fn release(&mut self) {
        (**self).release()
    }
}

impl<D: HandDetector + ?Sized> HandDetector for Box<D> {
    fn initialize(&mut self) -> Result<(), DetectorError> {
        (**self).initialize()
    }

    fn detect(&mut self, frame: &CameraFrame) -> Detection {
        (**self).detect(frame)
    }
}

/// Holds an opened camera and releases it when dropped
pub struct CameraGuard<C: Camera> {
    camera: C,
}

impl<C: Camera> CameraGuard<C> {
    /// Open `camera`. On failure the camera is released before returning.
    pub fn acquire(mut camera: C) -> Result<Self, CameraError> {
        if let Err(e) = camera.open() {
            camera.release();
            return Err(e);
        }
        Ok(Self { camera })
    }

    pub fn next_frame(&mut self) -> Option<CameraFrame> {
        self.camera.next_frame()
    }
}

impl<C: Camera> Drop for CameraGuard<C> {
    fn drop(&mut self) {
        self.camera.release();
        debug!("Camera released");
    }
}

/// Starts detection loops
pub struct DetectionLoop;

impl DetectionLoop {
    /// Open the camera, initialize the detector and spawn the loop.
    ///
    /// If any step fails the camera is released, the failure is logged once
    /// and returned, and no thread is started. The caller keeps running on
    /// whatever the slot last held (normally "no hand").
    pub fn start<C, D>(
        camera: C,
        mut detector: D,
        classifier: GestureClassifier,
        publisher: SignalPublisher,
    ) -> Result<DetectionHandle, DetectionError>
    where
        C: Camera,
        D: HandDetector,
    {
        let mut guard = CameraGuard::acquire(camera).map_err(|e| {
            error!("Detection disabled: {}", e);
            DetectionError::from(e)
        })?;

        if let Err(e) = detector.initialize() {
            error!("Detection disabled: {}", e);
            // guard drops here and releases the camera
            return Err(e.into());
        }

        let stop = Arc::new(AtomicBool::new(false));
        let frames = Arc::new(AtomicU64::new(0));

        let thread = {
            let stop = Arc::clone(&stop);
            let frames = Arc::clone(&frames);
            thread::Builder::new()
                .name("arbor-detection".to_string())
                .spawn(move || {
                    info!("Detection loop started");
                    let mut last_posture = None;

                    while !stop.load(Ordering::Acquire) {
                        let Some(frame) = guard.next_frame() else {
                            warn!("Camera stream ended");
                            break;
                        };

                        let detection = detector.detect(&frame);
                        let signal = classifier.classify(detection.first_hand());

                        let posture = signal.map(|s| (s.posture(), s.is_pinching));
                        if posture != last_posture {
                            debug!(frame = frame.index, ?posture, "Gesture changed");
                            last_posture = posture;
                        }

                        publisher.publish(signal);
                        frames.fetch_add(1, Ordering::Relaxed);
                    }

                    publisher.publish(None);
                    drop(guard);
                    info!("Detection loop stopped");
                })
                .map_err(DetectionError::Spawn)?
        };

        Ok(DetectionHandle {
            stop,
            frames,
            thread: Some(thread),
        })
    }
}

/// Handle to a running detection loop. Dropping it stops the loop.
pub struct DetectionHandle {
    stop: Arc<AtomicBool>,
    frames: Arc<AtomicU64>,
    thread: Option<JoinHandle<()>>,
}

impl DetectionHandle {
    /// Frames processed so far
    pub fn frames_processed(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    /// Whether the loop thread is still running
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the loop and wait for the camera to be released.
    ///
    /// Returns the number of frames processed.
    pub fn stop(mut self) -> u64 {
        self.shutdown();
        self.frames_processed()
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("Detection thread panicked");
            }
        }
    }
}

impl Drop for DetectionHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::landmark::{LandmarkSample, LANDMARK_COUNT};
    use crate::input::slot::signal_slot;
    use crate::spatial::Point3D;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct CameraLog {
        opened: bool,
        releases: u32,
    }

    struct FakeCamera {
        log: Arc<Mutex<CameraLog>>,
        fail_open: bool,
        remaining: Option<u64>,
        index: u64,
    }

    impl FakeCamera {
        fn new(log: Arc<Mutex<CameraLog>>) -> Self {
            Self {
                log,
                fail_open: false,
                remaining: None,
                index: 0,
            }
        }
    }

    impl Camera for FakeCamera {
        fn open(&mut self) -> Result<(), CameraError> {
            if self.fail_open {
                return Err(CameraError::PermissionDenied);
            }
            self.log.lock().unwrap().opened = true;
            Ok(())
        }

        fn next_frame(&mut self) -> Option<CameraFrame> {
            if let Some(remaining) = self.remaining.as_mut() {
                if *remaining == 0 {
                    return None;
                }
                *remaining -= 1;
            }
            thread::sleep(Duration::from_millis(1));
            self.index += 1;
            Some(CameraFrame {
                index: self.index,
                captured_at: Instant::now(),
                width: 0,
                height: 0,
                pixels: Vec::new(),
            })
        }

        fn release(&mut self) {
            self.log.lock().unwrap().releases += 1;
        }
    }

    /// Always sees one open hand
    struct OpenHandDetector {
        fail_init: bool,
    }

    impl HandDetector for OpenHandDetector {
        fn initialize(&mut self) -> Result<(), DetectorError> {
            if self.fail_init {
                Err(DetectorError::Init("model missing".to_string()))
            } else {
                Ok(())
            }
        }

        fn detect(&mut self, _frame: &CameraFrame) -> Detection {
            let mut points = [Point3D::new(0.5, 0.9, 0.0); LANDMARK_COUNT];
            for tip in crate::input::landmark::FINGERTIPS {
                points[tip] = Point3D::new(0.5, 0.4, 0.0);
            }
            Detection::single(LandmarkSample::new(points))
        }
    }

    fn wait_for<F: Fn() -> bool>(condition: F) {
        for _ in 0..500 {
            if condition() {
                return;
            }
            thread::sleep(Duration::from_millis(2));
        }
        panic!("condition not met in time");
    }

    #[test]
    fn test_publishes_and_releases_on_stop() {
        let log = Arc::new(Mutex::new(CameraLog::default()));
        let (publisher, reader) = signal_slot();

        let handle = DetectionLoop::start(
            FakeCamera::new(Arc::clone(&log)),
            OpenHandDetector { fail_init: false },
            GestureClassifier::default(),
            publisher,
        )
        .unwrap();

        wait_for(|| reader.latest().is_some());
        assert!(reader.latest().unwrap().is_open);

        let frames = handle.stop();
        assert!(frames >= 1);
        assert_eq!(reader.latest(), None);

        let log = log.lock().unwrap();
        assert!(log.opened);
        assert_eq!(log.releases, 1);
    }

    #[test]
    fn test_detector_init_failure_releases_camera() {
        let log = Arc::new(Mutex::new(CameraLog::default()));
        let (publisher, reader) = signal_slot();

        let result = DetectionLoop::start(
            FakeCamera::new(Arc::clone(&log)),
            OpenHandDetector { fail_init: true },
            GestureClassifier::default(),
            publisher,
        );

        assert!(matches!(result, Err(DetectionError::Detector(_))));
        assert_eq!(log.lock().unwrap().releases, 1);
        assert_eq!(reader.latest(), None);
        assert_eq!(reader.sequence(), 0);
    }

    #[test]
    fn test_camera_open_failure() {
        let log = Arc::new(Mutex::new(CameraLog::default()));
        let mut camera = FakeCamera::new(Arc::clone(&log));
        camera.fail_open = true;
        let (publisher, _reader) = signal_slot();

        let result = DetectionLoop::start(
            camera,
            OpenHandDetector { fail_init: false },
            GestureClassifier::default(),
            publisher,
        );

        assert!(matches!(result, Err(DetectionError::Camera(CameraError::PermissionDenied))));
        let log = log.lock().unwrap();
        assert!(!log.opened);
        assert_eq!(log.releases, 1);
    }

    #[test]
    fn test_stream_end_stops_loop() {
        let log = Arc::new(Mutex::new(CameraLog::default()));
        let mut camera = FakeCamera::new(Arc::clone(&log));
        camera.remaining = Some(3);
        let (publisher, reader) = signal_slot();

        let handle = DetectionLoop::start(
            camera,
            Box::new(OpenHandDetector { fail_init: false }) as Box<dyn HandDetector>,
            GestureClassifier::default(),
            publisher,
        )
        .unwrap();

        wait_for(|| !handle.is_running());
        assert_eq!(handle.frames_processed(), 3);
        // Last publish after the stream ends is "no hand"
        assert_eq!(reader.latest(), None);
        assert_eq!(reader.sequence(), 4);
        assert_eq!(log.lock().unwrap().releases, 1);

        drop(handle);
        assert_eq!(log.lock().unwrap().releases, 1);
    }
}
