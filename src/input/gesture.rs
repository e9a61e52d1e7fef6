//! Hand-gesture producer
//!
//! A [`HandTracker`] yields hand landmarks per video frame. The producer
//! classifies each frame as fingers-extended or not and publishes one
//! [`SourceEvent::HandFrame`] per frame; debouncing happens on the consumer
//! side.

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;
use tracing::{debug, info};

use super::collector::SourceSender;
use super::events::{SourceEvent, SourceKind};
use super::source::{SourceHandle, report_unavailable};

/// Normalized landmark position (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// The 21 landmarks of one tracked hand
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    points: [Landmark; HandLandmarks::COUNT],
}

impl HandLandmarks {
    pub const COUNT: usize = 21;

    /// Fingertips of the index, middle, ring and little fingers
    pub const FINGER_TIPS: [usize; 4] = [8, 12, 16, 20];
    /// Middle (PIP) joints paired with [`Self::FINGER_TIPS`]
    pub const FINGER_JOINTS: [usize; 4] = [6, 10, 14, 18];

    pub fn new(points: [Landmark; Self::COUNT]) -> Self {
        Self { points }
    }

    /// Builds from a tracker's landmark list; `None` unless exactly 21 points
    pub fn from_slice(points: &[Landmark]) -> Option<Self> {
        let points: [Landmark; Self::COUNT] = points.try_into().ok()?;
        Some(Self { points })
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    /// Synthetic hand with all four fingers extended upward
    pub fn open_palm() -> Self {
        Self::synthetic(0.2)
    }

    /// Synthetic hand with all four fingers curled below their joints
    pub fn fist() -> Self {
        Self::synthetic(0.6)
    }

    fn synthetic(tip_y: f32) -> Self {
        let mut points = [Landmark::default(); Self::COUNT];
        for (i, point) in points.iter_mut().enumerate() {
            *point = Landmark::new(0.3 + i as f32 * 0.02, 0.7, 0.0);
        }
        for (&tip, &joint) in Self::FINGER_TIPS.iter().zip(Self::FINGER_JOINTS.iter()) {
            points[joint].y = 0.4;
            points[tip].y = tip_y;
        }
        Self { points }
    }
}

/// Classifies an open palm: every fingertip above its middle joint
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenPalmClassifier;

impl OpenPalmClassifier {
    pub fn fingers_extended(&self, hand: Option<&HandLandmarks>) -> bool {
        let Some(hand) = hand else {
            return false;
        };

        HandLandmarks::FINGER_TIPS
            .iter()
            .zip(HandLandmarks::FINGER_JOINTS.iter())
            .all(|(&tip, &joint)| hand.points[tip].y < hand.points[joint].y)
    }
}

/// One result from the tracker
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerFrame {
    Hand(HandLandmarks),
    NoHand,
    /// The camera or model stopped producing frames
    Closed,
}

/// Hand-landmark engine fed by a camera
pub trait HandTracker: Send {
    fn name(&self) -> &str;

    /// Waits for the next processed video frame
    fn next_frame(&mut self) -> BoxFuture<'_, TrackerFrame>;

    /// Releases the camera and the landmark model
    fn close(&mut self) -> BoxFuture<'_, ()>;
}

/// Tracker fed through a channel; `None` frames mean no hand was seen
pub struct ChannelHandTracker {
    frames: UnboundedReceiver<Option<HandLandmarks>>,
}

impl ChannelHandTracker {
    pub fn new() -> (Self, UnboundedSender<Option<HandLandmarks>>) {
        let (sender, frames) = mpsc::unbounded_channel();
        (Self { frames }, sender)
    }
}

impl HandTracker for ChannelHandTracker {
    fn name(&self) -> &str {
        "channel"
    }

    fn next_frame(&mut self) -> BoxFuture<'_, TrackerFrame> {
        async move {
            match self.frames.recv().await {
                Some(Some(hand)) => TrackerFrame::Hand(hand),
                Some(None) => TrackerFrame::NoHand,
                None => TrackerFrame::Closed,
            }
        }
        .boxed()
    }

    fn close(&mut self) -> BoxFuture<'_, ()> {
        self.frames.close();
        async {}.boxed()
    }
}

/// Runs a tracker on the runtime, publishing one hand frame per video frame
pub fn spawn_gesture_source(
    mut tracker: Box<dyn HandTracker>,
    events: SourceSender,
    runtime: &Handle,
) -> SourceHandle {
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    let task = runtime.spawn(async move {
        let classifier = OpenPalmClassifier;
        info!(tracker = tracker.name(), "Gesture source started");
        let _ = events.send(SourceEvent::Available(SourceKind::Gesture));

        loop {
            let frame = tokio::select! {
                _ = &mut shutdown_rx => break,
                frame = tracker.next_frame() => frame,
            };

            let fingers_extended = match frame {
                TrackerFrame::Hand(hand) => classifier.fingers_extended(Some(&hand)),
                TrackerFrame::NoHand => classifier.fingers_extended(None),
                TrackerFrame::Closed => {
                    report_unavailable(&events, SourceKind::Gesture, "hand tracker closed");
                    break;
                }
            };

            if events
                .send(SourceEvent::HandFrame { fingers_extended })
                .is_err()
            {
                debug!("Source channel closed");
                break;
            }
        }

        tracker.close().await;
        info!(tracker = tracker.name(), "Gesture source released");
    });

    SourceHandle::new(SourceKind::Gesture, shutdown_tx, task)
}
