//! Scripted gestures
//!
//! A gesture script is a TOML file listing timestamped input events:
//!
//! ```toml
//! content = [320, 2000]
//! viewport = [320, 480]
//!
//! [[events]]
//! kind = "down"
//! at_ms = 0
//! x = 160
//! y = 400
//!
//! [[events]]
//! kind = "up"
//! at_ms = 120
//! x = 160
//! y = 250
//! ```

use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use flick_core::{Axis, Point};

/// Smallest replay frame interval
pub const MIN_FRAME_MS: f64 = 1.0;

/// Upper bound on scripted events
pub const MAX_EVENTS: usize = 100_000;

/// Move samples in a synthesized drag; longer drags get sparser samples
const MAX_DRAG_SAMPLES: u32 = 10_000;

/// One scripted input event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GestureEvent {
    Down {
        at_ms: f64,
        x: f32,
        y: f32,
    },
    Move {
        at_ms: f64,
        x: f32,
        y: f32,
    },
    Up {
        at_ms: f64,
        x: f32,
        y: f32,
    },
    /// Wheel delta in offset space
    Wheel {
        at_ms: f64,
        #[serde(default)]
        dx: i32,
        #[serde(default)]
        dy: i32,
    },
    Resize {
        at_ms: f64,
        content: [i32; 2],
        viewport: [i32; 2],
    },
}

impl GestureEvent {
    pub fn at_ms(&self) -> f64 {
        match *self {
            GestureEvent::Down { at_ms, .. }
            | GestureEvent::Move { at_ms, .. }
            | GestureEvent::Up { at_ms, .. }
            | GestureEvent::Wheel { at_ms, .. }
            | GestureEvent::Resize { at_ms, .. } => at_ms,
        }
    }
}

/// A full gesture script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureScript {
    /// Content size as `[width, height]`
    #[serde(default = "default_content")]
    pub content: [i32; 2],
    /// Viewport size as `[width, height]`
    #[serde(default = "default_viewport")]
    pub viewport: [i32; 2],
    /// Frame interval of the replay clock
    #[serde(default)]
    pub frame_ms: Option<f64>,
    #[serde(default)]
    pub events: Vec<GestureEvent>,
}

fn default_content() -> [i32; 2] {
    [320, 2000]
}

fn default_viewport() -> [i32; 2] {
    [320, 480]
}

/// Drag direction for synthesized gestures
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DragAxis {
    Horizontal,
    Vertical,
}

impl From<DragAxis> for Axis {
    fn from(axis: DragAxis) -> Axis {
        match axis {
            DragAxis::Horizontal => Axis::Horizontal,
            DragAxis::Vertical => Axis::Vertical,
        }
    }
}

/// Parameters of a synthesized straight drag
#[derive(Debug, Clone, Copy)]
pub struct StraightDrag {
    pub content: [i32; 2],
    pub viewport: [i32; 2],
    pub axis: DragAxis,
    /// Content travel in pixels; positive scrolls forward (pointer moves up/left)
    pub distance: f32,
    pub duration_ms: f64,
    /// Rest before lifting the pointer
    pub pause_ms: f64,
    /// Interval between move samples
    pub sample_ms: f64,
}

impl GestureScript {
    /// Parse and check a script
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let script: GestureScript =
            toml::from_str(content).context("Failed to parse gesture script")?;
        script.validate()?;
        Ok(script)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read gesture script {}", path.display()))?;
        let script = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid gesture script {}", path.display()))?;
        tracing::debug!(
            "Loaded {} events from {}",
            script.events.len(),
            path.display()
        );
        Ok(script)
    }

    fn validate(&self) -> Result<()> {
        if let Some(frame_ms) = self.frame_ms {
            check_frame_ms(frame_ms)?;
        }
        ensure!(
            self.events.len() <= MAX_EVENTS,
            "script has {} events, at most {} are supported",
            self.events.len(),
            MAX_EVENTS
        );
        for (i, event) in self.events.iter().enumerate() {
            let at = event.at_ms();
            ensure!(
                at.is_finite() && at >= 0.0,
                "event {} has invalid timestamp {}",
                i,
                at
            );
        }
        Ok(())
    }

    /// Events in delivery order (stable by timestamp)
    pub fn sorted_events(&self) -> Vec<GestureEvent> {
        let mut events = self.events.clone();
        events.sort_by(|a, b| a.at_ms().total_cmp(&b.at_ms()));
        events
    }

    /// Synthesize a constant-speed drag starting at the viewport center
    pub fn straight_drag(drag: &StraightDrag) -> Result<Self> {
        ensure!(
            drag.distance.is_finite(),
            "drag distance must be finite, got {}",
            drag.distance
        );
        ensure!(
            drag.duration_ms.is_finite() && drag.pause_ms.is_finite(),
            "drag duration and pause must be finite"
        );

        let start = Point::new(drag.viewport[0] as f32 / 2.0, drag.viewport[1] as f32 / 2.0);
        // Content moves opposite to the pointer
        let travel = -drag.distance;
        let at = |fraction: f32| match drag.axis {
            DragAxis::Horizontal => Point::new(start.x + travel * fraction, start.y),
            DragAxis::Vertical => Point::new(start.x, start.y + travel * fraction),
        };

        let duration = drag.duration_ms.max(0.0);
        let sample_ms = if drag.sample_ms > 0.0 { drag.sample_ms } else { 8.0 };
        let steps = (duration / sample_ms).ceil().clamp(1.0, MAX_DRAG_SAMPLES as f64) as u32;

        let mut events = vec![GestureEvent::Down {
            at_ms: 0.0,
            x: start.x,
            y: start.y,
        }];
        for i in 1..=steps {
            let fraction = i as f32 / steps as f32;
            let p = at(fraction);
            events.push(GestureEvent::Move {
                at_ms: duration * fraction as f64,
                x: p.x,
                y: p.y,
            });
        }
        let end = at(1.0);
        events.push(GestureEvent::Up {
            at_ms: duration + drag.pause_ms.max(0.0),
            x: end.x,
            y: end.y,
        });

        let script = Self {
            content: drag.content,
            viewport: drag.viewport,
            frame_ms: None,
            events,
        };
        script.validate()?;
        Ok(script)
    }
}

/// Reject frame intervals the replay clock cannot step with
pub fn check_frame_ms(frame_ms: f64) -> Result<()> {
    ensure!(
        frame_ms.is_finite() && frame_ms >= MIN_FRAME_MS,
        "frame_ms must be at least {}, got {}",
        MIN_FRAME_MS,
        frame_ms
    );
    Ok(())
}

/// Parse a `--frame-ms` argument
pub fn parse_frame_ms(s: &str) -> std::result::Result<f64, String> {
    let frame_ms = s.trim().parse::<f64>().map_err(|e| e.to_string())?;
    check_frame_ms(frame_ms).map_err(|e| e.to_string())?;
    Ok(frame_ms)
}

/// Parse `WIDTHxHEIGHT`
pub fn parse_size(s: &str) -> std::result::Result<[i32; 2], String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{}`", s))?;
    let w = w.trim().parse::<i32>().map_err(|e| format!("width: {}", e))?;
    let h = h.trim().parse::<i32>().map_err(|e| format!("height: {}", e))?;
    Ok([w, h])
}
