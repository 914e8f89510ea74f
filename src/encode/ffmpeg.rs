use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use anyhow::Context;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{DrawonError, DrawonResult};
use crate::foundation::math::mul_div255_u16;
use crate::render::backend::FrameRGBA;
use crate::style::color::Rgba8;

/// Options for [`FfmpegSink`] output.
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Final output file path.
    pub out_path: PathBuf,
    /// Overwrite `out_path` if it already exists.
    pub overwrite: bool,
    /// Background used to flatten alpha before encoding.
    pub background: Rgba8,
    /// Encoder binary, looked up on `PATH` when relative.
    pub program: PathBuf,
    pub codec: String,
    /// Constant rate factor; `None` leaves the codec default.
    pub crf: Option<u8>,
    pub pixel_format: String,
}

impl FfmpegSinkOpts {
    /// H.264 / CRF 23 / yuv420p into `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            background: Rgba8::WHITE,
            program: PathBuf::from("ffmpeg"),
            codec: "libx264".to_owned(),
            crf: Some(23),
            pixel_format: "yuv420p".to_owned(),
        }
    }

    pub fn with_background(mut self, background: Rgba8) -> Self {
        self.background = background;
        self
    }

    /// Sibling of `out_path` the encoder writes to until it exits successfully.
    ///
    /// The extension is kept so ffmpeg still infers the container from it.
    pub fn temp_path(&self) -> PathBuf {
        let stem = self
            .out_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "out".to_owned());
        let name = match self.out_path.extension() {
            Some(ext) => format!(
                ".{stem}.{}.partial.{}",
                std::process::id(),
                ext.to_string_lossy()
            ),
            None => format!(".{stem}.{}.partial", std::process::id()),
        };
        self.out_path.with_file_name(name)
    }

    fn command(&self, cfg: SinkConfig, target: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        // The temp file is ours, so it is always overwritten.
        cmd.args([
            "-y",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &cfg.fps.to_string(),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            &self.codec,
        ]);
        if let Some(crf) = self.crf {
            cmd.args(["-crf", &crf.to_string()]);
        }
        cmd.args(["-pix_fmt", &self.pixel_format, "-movflags", "+faststart"])
            .arg(target);
        cmd
    }
}

/// Sink that spawns `ffmpeg` and streams flattened RGBA frames to its stdin.
///
/// Output is written to [`FfmpegSinkOpts::temp_path`] and renamed to `out_path` only after the
/// encoder exits successfully. Abort, failure, or drop kill the child and delete the temp file.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    temp: TempFileGuard,

    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            temp: TempFileGuard(None),
            scratch: Vec::new(),
            cfg: None,
            last_idx: None,
        }
    }

    pub fn opts(&self) -> &FfmpegSinkOpts {
        &self.opts
    }

    /// Close stdin, wait for the child, and collect its stderr.
    fn reap(&mut self) -> DrawonResult<(std::process::ExitStatus, String)> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| DrawonError::render("ffmpeg sink not started"))?;
        let status = child
            .wait()
            .context("failed to wait for ffmpeg to finish")?;
        let stderr = match self.stderr_drain.take() {
            Some(handle) => match handle.join() {
                Ok(Ok(bytes)) => String::from_utf8_lossy(&bytes).trim().to_owned(),
                Ok(Err(e)) => format!("<stderr unreadable: {e}>"),
                Err(_) => "<stderr drain thread panicked>".to_owned(),
            },
            None => String::new(),
        };
        Ok((status, stderr))
    }

    /// Turn a broken stdin pipe into an encoder failure carrying ffmpeg's own diagnostics.
    fn fail_on_write(&mut self, err: std::io::Error) -> DrawonError {
        if let Some(child) = self.child.as_mut() {
            let _ = child.kill();
        }
        let failure = match self.reap() {
            Ok((status, stderr)) => DrawonError::EncoderFailed {
                status: status.to_string(),
                stderr: if stderr.is_empty() {
                    format!("failed to write frame to ffmpeg stdin: {err}")
                } else {
                    stderr
                },
            },
            Err(e) => e,
        };
        self.temp.remove();
        self.cfg = None;
        failure
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> DrawonResult<()> {
        if self.child.is_some() {
            return Err(DrawonError::render("ffmpeg sink already started"));
        }
        if cfg.fps == 0 {
            return Err(DrawonError::config("fps must be non-zero"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(DrawonError::config(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(DrawonError::config(format!(
                "video size {}x{} must be even (required for yuv420p output)",
                cfg.width, cfg.height
            )));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(DrawonError::config(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        let temp = self.opts.temp_path();
        let mut cmd = self.opts.command(cfg, &temp);
        tracing::debug!(command = ?cmd, "spawning encoder");

        let mut child = cmd.spawn().map_err(|e| {
            DrawonError::encoder_unavailable(format!(
                "failed to spawn '{}' (is it installed and on PATH?): {e}",
                self.opts.program.display()
            ))
        })?;
        self.temp = TempFileGuard(Some(temp));

        let (Some(stdin), Some(mut stderr)) = (child.stdin.take(), child.stderr.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            self.temp.remove();
            return Err(DrawonError::encoder_unavailable(
                "failed to open ffmpeg stdio pipes",
            ));
        };
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });

        self.scratch = vec![0u8; cfg.width as usize * cfg.height as usize * 4];
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> DrawonResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| DrawonError::render("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx <= last
        {
            return Err(DrawonError::render(format!(
                "ffmpeg sink received frame {} after frame {}",
                idx.0, last.0
            )));
        }
        self.last_idx = Some(idx);

        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(DrawonError::render(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }

        flatten_to_opaque_rgba8(
            &mut self.scratch,
            &frame.data,
            frame.premultiplied,
            self.opts.background.to_array(),
        )?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(DrawonError::render("ffmpeg sink is already finalized"));
        };
        if let Err(e) = stdin.write_all(&self.scratch) {
            return Err(self.fail_on_write(e));
        }
        Ok(())
    }

    fn end(&mut self) -> DrawonResult<()> {
        let (status, stderr) = self.reap()?;
        self.cfg = None;
        if !status.success() {
            self.temp.remove();
            return Err(DrawonError::EncoderFailed {
                status: status.to_string(),
                stderr,
            });
        }

        let out = self.opts.out_path.clone();
        self.temp.persist(&out)?;
        tracing::debug!(out = %out.display(), "encoder output finalized");
        Ok(())
    }

    fn abort(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        if let Some(handle) = self.stderr_drain.take() {
            let _ = handle.join();
        }
        self.temp.remove();
        self.cfg = None;
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        if self.child.is_some() {
            self.abort();
        }
    }
}

struct TempFileGuard(Option<PathBuf>);

impl TempFileGuard {
    fn remove(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }

    fn persist(&mut self, dest: &Path) -> DrawonResult<()> {
        let Some(path) = self.0.take() else {
            return Err(DrawonError::render("encoder produced no output file"));
        };
        if let Err(e) = std::fs::rename(&path, dest) {
            let _ = std::fs::remove_file(&path);
            return Err(anyhow::Error::new(e)
                .context(format!(
                    "failed to move '{}' to '{}'",
                    path.display(),
                    dest.display()
                ))
                .into());
        }
        Ok(())
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        self.remove();
    }
}

/// Composite RGBA8 pixels over `bg_rgba`, writing fully opaque pixels into `dst`.
pub(crate) fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    bg_rgba: [u8; 4],
) -> DrawonResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(DrawonError::render(format!(
            "cannot flatten {} bytes into a {} byte rgba8 buffer",
            src.len(),
            dst.len()
        )));
    }

    let bg = [
        u16::from(bg_rgba[0]),
        u16::from(bg_rgba[1]),
        u16::from(bg_rgba[2]),
    ];

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255 - a;
        for c in 0..3 {
            let fg = if src_is_premul {
                u16::from(s[c])
            } else {
                mul_div255_u16(u16::from(s[c]), a)
            };
            d[c] = (fg + mul_div255_u16(bg[c], inv)).min(255) as u8;
        }
        d[3] = 255;
    }

    Ok(())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> DrawonResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// `true` when `program -version` runs successfully.
pub fn is_encoder_available(program: &Path) -> bool {
    Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    is_encoder_available(Path::new("ffmpeg"))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
