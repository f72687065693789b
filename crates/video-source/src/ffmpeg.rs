//! Sequential RGB frame decoding through an `ffmpeg` child process.

use std::io::{BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread::JoinHandle;

use image::RgbImage;
use scoretrack_common::error::{ScoretrackError, ScoretrackResult};
use scoretrack_common::tools::command_exists;
use scoretrack_processing_core::FrameSource;

use crate::probe::{probe_video, VideoInfo};

/// Decodes every frame of a video file in presentation order.
///
/// `ffmpeg` writes raw RGB24 frames to a pipe; each read takes exactly one
/// frame's worth of bytes. The stream ends at end of file or on the first
/// read error, whichever comes first.
///
/// Frames come out in display orientation: `ffmpeg` applies the stream's
/// rotation, so a portrait phone recording yields portrait frames.
pub struct FfmpegSource {
    path: PathBuf,
    info: VideoInfo,
    child: Child,
    stdout: Option<BufReader<ChildStdout>>,
    stderr_task: Option<JoinHandle<String>>,
    frames_read: u64,
}

impl FfmpegSource {
    /// Open `path` for decoding.
    ///
    /// Fails with [`ScoretrackError::SourceUnavailable`] when the file is
    /// missing, the tools are not installed, or the container has no video
    /// stream.
    pub fn open(path: impl AsRef<Path>) -> ScoretrackResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(ScoretrackError::source_unavailable(format!(
                "{} does not exist",
                path.display()
            )));
        }

        for binary in ["ffprobe", "ffmpeg"] {
            if !command_exists(binary) {
                return Err(ScoretrackError::source_unavailable(format!(
                    "{binary} is not installed or not on PATH"
                )));
            }
        }

        let info = probe_video(&path)?;

        let mut child = Command::new("ffmpeg")
            .args(["-v", "error", "-nostdin", "-i"])
            .arg(&path)
            .args(["-map", "0:v:0", "-f", "rawvideo", "-pix_fmt", "rgb24", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ScoretrackError::source_unavailable(format!("Failed to start ffmpeg: {e}"))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ScoretrackError::decode("Failed to capture ffmpeg stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| ScoretrackError::decode("Failed to capture ffmpeg stderr"))?;

        // Drain stderr so a chatty decoder never blocks on a full pipe.
        let stderr_task = std::thread::spawn(move || -> String {
            let mut reader = BufReader::new(stderr);
            let mut output = String::new();
            match reader.read_to_string(&mut output) {
                Ok(_) => output,
                Err(err) => format!("<failed to read ffmpeg stderr: {err}>"),
            }
        });

        tracing::info!(
            path = %path.display(),
            pid = child.id(),
            width = info.frame_width(),
            height = info.frame_height(),
            rotation = info.rotation,
            fps = ?info.frame_rate,
            frames = ?info.frame_count,
            "Opened video"
        );

        Ok(Self {
            path,
            info,
            child,
            stdout: Some(BufReader::new(stdout)),
            stderr_task: Some(stderr_task),
            frames_read: 0,
        })
    }

    pub fn info(&self) -> &VideoInfo {
        &self.info
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Frames decoded so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    fn read_frame(&mut self) -> Option<RgbImage> {
        let stdout = self.stdout.as_mut()?;
        let mut buf = vec![0u8; self.info.rgb_frame_len()];

        match stdout.read_exact(&mut buf) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                self.finish();
                return None;
            }
            Err(e) => {
                tracing::warn!(
                    frame = self.frames_read,
                    error = %e,
                    "Frame read failed; ending stream"
                );
                self.finish();
                return None;
            }
        }

        self.frames_read += 1;
        RgbImage::from_raw(self.info.frame_width(), self.info.frame_height(), buf)
    }

    /// Close the pipe and reap the decoder.
    fn finish(&mut self) {
        if self.stdout.take().is_none() {
            return;
        }

        let status = match self.child.wait() {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to wait on ffmpeg");
                return;
            }
        };

        let stderr_output = self
            .stderr_task
            .take()
            .and_then(|task| task.join().ok())
            .unwrap_or_default();

        if status.success() {
            tracing::debug!(frames = self.frames_read, "ffmpeg finished");
        } else {
            tracing::warn!(
                frames = self.frames_read,
                status = %status,
                stderr = stderr_output.trim(),
                "ffmpeg exited early; treating as end of stream"
            );
        }
    }
}

impl FrameSource for FfmpegSource {
    type Frame = RgbImage;

    fn frame_rate(&self) -> Option<f64> {
        self.info.frame_rate
    }

    fn frame_count(&self) -> Option<u64> {
        self.info.frame_count
    }

    fn next_frame(&mut self) -> Option<RgbImage> {
        self.read_frame()
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        if self.stdout.take().is_some() {
            let _ = self.child.kill();
            let _ = self.child.wait();
            tracing::debug!(frames = self.frames_read, "Stopped ffmpeg before end of stream");
        }
    }
}

impl std::fmt::Debug for FfmpegSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfmpegSource")
            .field("path", &self.path)
            .field("info", &self.info)
            .field("frames_read", &self.frames_read)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_unavailable() {
        let err = FfmpegSource::open("/nonexistent/match.mp4").unwrap_err();
        assert!(matches!(err, ScoretrackError::SourceUnavailable { .. }));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_decodes_generated_clip() {
        if !command_exists("ffmpeg") || !command_exists("ffprobe") {
            eprintln!("skipping: ffmpeg not available");
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        let clip = dir.path().join("clip.mp4");
        let status = Command::new("ffmpeg")
            .args([
                "-v",
                "error",
                "-f",
                "lavfi",
                "-i",
                "testsrc=size=64x48:rate=10:duration=1",
                "-c:v",
                "mpeg4",
                "-pix_fmt",
                "yuv420p",
            ])
            .arg(&clip)
            .status()
            .unwrap();
        assert!(status.success());

        let mut source = FfmpegSource::open(&clip).unwrap();
        assert_eq!(source.info().width, 64);
        assert_eq!(source.info().height, 48);
        assert_eq!(source.frame_rate(), Some(10.0));

        let frames: Vec<RgbImage> = std::iter::from_fn(|| source.next_frame()).collect();
        assert_eq!(frames.len(), 10);
        assert_eq!(frames[0].dimensions(), (64, 48));
        assert_eq!(source.frames_read(), 10);
        assert!(source.next_frame().is_none());
    }
}
