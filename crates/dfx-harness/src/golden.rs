#![forbid(unsafe_code)]

//! Golden output harness for deterministic effect runs.
//!
//! This module provides infrastructure for:
//! - Scripted frame runs mixing fixed-rate frames and resizes
//! - Stable FNV-1a checksums of rasterised frames and draw lists
//! - JSONL logging with a stable schema for CI/debugging
//! - Checked-in golden checksum files with a bless workflow
//!
//! # JSONL Schema
//!
//! ```json
//! {"event":"start","run_id":"...","case":"copper/resize_320x200_to_640x480","seed":0}
//! {"event":"frame","run_id":"...","frame_id":0,"width":320,"height":200,"commands":15,"checksum":"fnv1a64:..."}
//! {"event":"resize","run_id":"...","from":"320x200","to":"640x480"}
//! {"event":"complete","run_id":"...","outcome":"pass","checksums":["fnv1a64:..."],"total_ms":3}
//! ```
//!
//! # Determinism
//!
//! Frames are driven by [`FrameTick::at_frame`], never the wall clock.
//! Randomised effects take their seed from `GOLDEN_SEED` (default 0):
//!
//! ```sh
//! GOLDEN_SEED=42 cargo test -p dfx-harness golden_
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use dfx_core::clock::FrameTick;
use dfx_core::geometry::{Point, Rect, Viewport};
use dfx_fx::{Effect, FxRunner};
use dfx_render::draw::{DrawCmd, DrawList, Fill};
use dfx_render::pixel::PixelSurface;
use serde::Serialize;

/// Checksum prefix naming the hash in logs and golden files.
pub const CHECKSUM_PREFIX: &str = "fnv1a64:";

const FNV64_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV64_PRIME: u64 = 0x0000_0100_0000_01B3;

/// Frame rate scripted runs are sampled at.
pub const GOLDEN_FPS: f64 = 60.0;

// ============================================================================
// Checksum Computation
// ============================================================================

#[must_use]
fn fnv1a64_extend(mut hash: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(FNV64_PRIME);
    }
    hash
}

#[must_use]
fn hash_f64(hash: u64, v: f64) -> u64 {
    fnv1a64_extend(hash, &v.to_bits().to_le_bytes())
}

#[must_use]
fn hash_point(hash: u64, p: Point) -> u64 {
    hash_f64(hash_f64(hash, p.x), p.y)
}

#[must_use]
fn hash_rect(hash: u64, r: Rect) -> u64 {
    let hash = hash_f64(hash_f64(hash, r.x), r.y);
    hash_f64(hash_f64(hash, r.width), r.height)
}

fn format_checksum(hash: u64) -> String {
    format!("{CHECKSUM_PREFIX}{hash:016x}")
}

/// Checksum of a rasterised frame: dimensions plus every pixel.
pub fn surface_checksum(surface: &PixelSurface) -> String {
    let mut hash = FNV64_OFFSET_BASIS;
    hash = fnv1a64_extend(hash, &surface.width().to_le_bytes());
    hash = fnv1a64_extend(hash, &surface.height().to_le_bytes());
    for px in surface.pixels() {
        hash = fnv1a64_extend(hash, &px.0.to_le_bytes());
    }
    format_checksum(hash)
}

/// Checksum of a recorded command stream.
///
/// Independent of any rasteriser, so it pins exactly what an effect asked
/// the host to draw.
pub fn draw_list_checksum(list: &DrawList) -> String {
    let mut hash = FNV64_OFFSET_BASIS;
    for cmd in list {
        hash = fnv1a64_extend(hash, cmd.kind().as_bytes());
        hash = match cmd {
            DrawCmd::Clear { rect, color } => {
                fnv1a64_extend(hash_rect(hash, *rect), &color.0.to_le_bytes())
            }
            DrawCmd::FillRect { rect, fill } => {
                let hash = hash_rect(hash, *rect);
                match fill {
                    Fill::Solid(color) => fnv1a64_extend(hash, &color.0.to_le_bytes()),
                    Fill::Linear(g) => {
                        let mut hash = hash_point(hash_point(hash, g.from), g.to);
                        for stop in g.stops() {
                            hash = hash_f64(hash, stop.offset);
                            hash = fnv1a64_extend(hash, &stop.color.0.to_le_bytes());
                        }
                        hash
                    }
                }
            }
            DrawCmd::Line {
                from,
                to,
                color,
                width,
            } => {
                let hash = hash_f64(hash_point(hash_point(hash, *from), *to), *width);
                fnv1a64_extend(hash, &color.0.to_le_bytes())
            }
            DrawCmd::Circle {
                center,
                radius,
                color,
            } => {
                let hash = hash_f64(hash_point(hash, *center), *radius);
                fnv1a64_extend(hash, &color.0.to_le_bytes())
            }
            DrawCmd::Ellipse {
                center,
                radius_x,
                radius_y,
                color,
            } => {
                let hash = hash_f64(hash_f64(hash_point(hash, *center), *radius_x), *radius_y);
                fnv1a64_extend(hash, &color.0.to_le_bytes())
            }
            DrawCmd::Point { at, size, color } => {
                let hash = hash_f64(hash_point(hash, *at), *size);
                fnv1a64_extend(hash, &color.0.to_le_bytes())
            }
            DrawCmd::Glyph {
                at,
                ch,
                size,
                color,
            } => {
                let hash = hash_f64(hash_point(hash, *at), *size);
                let hash = fnv1a64_extend(hash, &u32::from(*ch).to_le_bytes());
                fnv1a64_extend(hash, &color.0.to_le_bytes())
            }
        };
    }
    format_checksum(hash)
}

// ============================================================================
// Frame Scripts
// ============================================================================

/// One step of a scripted run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptStep {
    /// Render this many frames at the current size.
    Frames(u32),
    /// Host resize notification.
    Resize(Viewport),
}

/// A deterministic sequence of frames and resizes.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameScript {
    /// Scenario name (e.g., "resize_320x200_to_640x480").
    pub name: String,
    pub initial: Viewport,
    pub steps: Vec<ScriptStep>,
}

impl FrameScript {
    /// `frames` frames at one size.
    pub fn fixed(name: &str, width: u32, height: u32, frames: u32) -> Self {
        Self {
            name: name.to_string(),
            initial: Viewport::new(width, height),
            steps: vec![ScriptStep::Frames(frames)],
        }
    }

    /// `frames` frames before and after a single resize.
    pub fn resize(name: &str, from: (u32, u32), to: (u32, u32), frames: u32) -> Self {
        Self {
            name: name.to_string(),
            initial: Viewport::new(from.0, from.1),
            steps: vec![
                ScriptStep::Frames(frames),
                ScriptStep::Resize(Viewport::new(to.0, to.1)),
                ScriptStep::Frames(frames),
            ],
        }
    }

    /// Builder: append a step.
    #[must_use]
    pub fn then(mut self, step: ScriptStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Total frames rendered by the script.
    pub fn frame_count(&self) -> u64 {
        self.steps
            .iter()
            .map(|s| match s {
                ScriptStep::Frames(n) => u64::from(*n),
                ScriptStep::Resize(_) => 0,
            })
            .sum()
    }
}

/// Standard scripts every effect is run through.
pub fn standard_scripts() -> Vec<FrameScript> {
    vec![
        // Fixed sizes
        FrameScript::fixed("fixed_320x200", 320, 200, 12),
        FrameScript::fixed("fixed_64x48", 64, 48, 12),
        FrameScript::fixed("fixed_1x1", 1, 1, 4),
        // Resize transitions
        FrameScript::resize("resize_320x200_to_640x480", (320, 200), (640, 480), 6),
        FrameScript::resize("resize_640x480_to_160x100", (640, 480), (160, 100), 6),
        FrameScript::resize("resize_320x200_to_0x0", (320, 200), (0, 0), 3)
            .then(ScriptStep::Resize(Viewport::new(200, 150)))
            .then(ScriptStep::Frames(3)),
    ]
}

/// Result of running a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRun {
    /// One pixel checksum per frame.
    pub frames: Vec<String>,
    /// One command-stream checksum per frame.
    pub lists: Vec<String>,
}

/// Drive `effect` through `script`, checksumming every frame.
pub fn run_script<E: Effect>(
    effect: E,
    script: &FrameScript,
    logger: &mut GoldenLogger,
) -> ScriptRun {
    let mut runner = FxRunner::new(effect, script.initial);
    let mut surface = PixelSurface::new(script.initial);
    let mut run = ScriptRun {
        frames: Vec::with_capacity(script.frame_count() as usize),
        lists: Vec::with_capacity(script.frame_count() as usize),
    };
    let mut frame = 0u64;

    for step in &script.steps {
        match *step {
            ScriptStep::Frames(n) => {
                for _ in 0..n {
                    let stats = runner.step(FrameTick::at_frame(frame, GOLDEN_FPS), &mut surface);
                    let pixels = surface_checksum(&surface);
                    logger.log_frame(frame, runner.viewport(), stats.commands, &pixels);
                    run.lists.push(draw_list_checksum(runner.last_frame()));
                    run.frames.push(pixels);
                    frame += 1;
                }
            }
            ScriptStep::Resize(to) => {
                logger.log_resize(runner.viewport(), to);
                runner.resize(to);
            }
        }
    }
    run
}

// ============================================================================
// JSONL Logger
// ============================================================================

/// One JSONL record.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum GoldenEvent<'a> {
    Start {
        run_id: &'a str,
        case: &'a str,
        seed: u64,
    },
    Frame {
        run_id: &'a str,
        frame_id: u64,
        width: u32,
        height: u32,
        commands: usize,
        checksum: &'a str,
    },
    Resize {
        run_id: &'a str,
        from: String,
        to: String,
    },
    Complete {
        run_id: &'a str,
        outcome: GoldenOutcome,
        checksums: &'a [String],
        total_ms: u64,
    },
    Error {
        run_id: &'a str,
        message: &'a str,
    },
}

/// JSONL event logger for golden tests.
pub struct GoldenLogger {
    writer: Option<BufWriter<File>>,
    run_id: String,
    start_time: Instant,
    checksums: Vec<String>,
}

impl GoldenLogger {
    /// Create a new logger appending to `path`.
    pub fn new(path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(file)),
            run_id: generate_run_id(),
            start_time: Instant::now(),
            checksums: Vec::new(),
        })
    }

    /// Logger that only collects checksums.
    pub fn noop() -> Self {
        Self {
            writer: None,
            run_id: generate_run_id(),
            start_time: Instant::now(),
            checksums: Vec::new(),
        }
    }

    /// Logger for `GOLDEN_LOG`, or a no-op one when it is unset.
    pub fn from_env() -> Self {
        std::env::var_os("GOLDEN_LOG")
            .and_then(|path| Self::new(Path::new(&path)).ok())
            .unwrap_or_else(Self::noop)
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn log_start(&mut self, case: &str, seed: u64) {
        let event = GoldenEvent::Start {
            run_id: &self.run_id,
            case,
            seed,
        };
        let line = serde_json::to_string(&event);
        self.write_line(line);
    }

    /// Log a rendered frame and remember its checksum.
    pub fn log_frame(
        &mut self,
        frame_id: u64,
        viewport: Viewport,
        commands: usize,
        checksum: &str,
    ) {
        self.checksums.push(checksum.to_string());
        let event = GoldenEvent::Frame {
            run_id: &self.run_id,
            frame_id,
            width: viewport.width,
            height: viewport.height,
            commands,
            checksum,
        };
        let line = serde_json::to_string(&event);
        self.write_line(line);
    }

    pub fn log_resize(&mut self, from: Viewport, to: Viewport) {
        let event = GoldenEvent::Resize {
            run_id: &self.run_id,
            from: format!("{}x{}", from.width, from.height),
            to: format!("{}x{}", to.width, to.height),
        };
        let line = serde_json::to_string(&event);
        self.write_line(line);
    }

    pub fn log_complete(&mut self, outcome: GoldenOutcome) {
        let event = GoldenEvent::Complete {
            run_id: &self.run_id,
            outcome,
            checksums: &self.checksums,
            total_ms: self.start_time.elapsed().as_millis() as u64,
        };
        let line = serde_json::to_string(&event);
        self.write_line(line);
    }

    pub fn log_error(&mut self, message: &str) {
        let event = GoldenEvent::Error {
            run_id: &self.run_id,
            message,
        };
        let line = serde_json::to_string(&event);
        self.write_line(line);
    }

    /// Checksums of every frame logged so far.
    pub fn checksums(&self) -> &[String] {
        &self.checksums
    }

    fn write_line(&mut self, line: serde_json::Result<String>) {
        let (Some(writer), Ok(line)) = (self.writer.as_mut(), line) else {
            return;
        };
        let _ = writeln!(writer, "{line}");
        let _ = writer.flush();
    }
}

/// Test outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GoldenOutcome {
    Pass,
    Fail,
    Skip,
    /// No blessed checksums exist for the case.
    Missing,
}

fn generate_run_id() -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("{timestamp:x}")
}

/// Seed for randomised effects, from `GOLDEN_SEED` (default 0).
pub fn golden_seed() -> u64 {
    std::env::var("GOLDEN_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}

// ============================================================================
// Golden File Management
// ============================================================================

/// Path to the golden checksums file for a case.
pub fn golden_checksum_path(base_dir: &Path, case: &str) -> PathBuf {
    base_dir
        .join("tests")
        .join("golden")
        .join(format!("{}.checksums", case.replace('/', "__")))
}

/// Load expected checksums. A missing file yields an empty list.
pub fn load_golden_checksums(path: &Path) -> std::io::Result<Vec<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(str::to_string)
            .collect()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

/// Save checksums to a golden file.
pub fn save_golden_checksums(path: &Path, checksums: &[String]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = format!(
        "# Golden checksums - do not edit manually\n{}\n",
        checksums.join("\n")
    );
    fs::write(path, content)
}

/// Check if golden files should be rewritten (`BLESS=1`).
pub fn is_bless_mode() -> bool {
    std::env::var("BLESS").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Compare checksums against expected values.
///
/// No expected checksums is `Missing`: the case has not been blessed yet and
/// must not count as a pass.
pub fn verify_checksums(actual: &[String], expected: &[String]) -> (GoldenOutcome, Option<usize>) {
    if expected.is_empty() {
        return (GoldenOutcome::Missing, None);
    }
    if let Some(i) = actual.iter().zip(expected).position(|(a, e)| a != e) {
        return (GoldenOutcome::Fail, Some(i));
    }
    if actual.len() != expected.len() {
        return (GoldenOutcome::Fail, None);
    }
    (GoldenOutcome::Pass, None)
}

// ============================================================================
// Tests
// ============================================================================
