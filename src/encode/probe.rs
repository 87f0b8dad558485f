use std::process::{Command, Stdio};

use crate::encode::ffmpeg::EncoderProfile;
use crate::foundation::error::{PromoError, PromoResult};

/// Query for hardware H.264 encoding support.
pub trait AccelProbe {
    /// `Err` means the query itself failed, not that hardware is absent.
    fn probe(&self) -> PromoResult<bool>;
}

/// NVENC is usable when ffmpeg lists `h264_nvenc` and `nvidia-smi -L` succeeds.
#[derive(Clone, Copy, Debug, Default)]
pub struct NvencProbe;

impl AccelProbe for NvencProbe {
    fn probe(&self) -> PromoResult<bool> {
        let out = Command::new("ffmpeg")
            .args(["-hide_banner", "-encoders"])
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|e| PromoError::render(format!("failed to run ffmpeg -encoders: {e}")))?;
        if !out.status.success() {
            return Err(PromoError::render(format!(
                "ffmpeg -encoders exited with status {}",
                out.status
            )));
        }
        if !String::from_utf8_lossy(&out.stdout).contains("h264_nvenc") {
            return Ok(false);
        }

        // ffmpeg builds often list nvenc without a GPU present.
        let gpu = Command::new("nvidia-smi")
            .arg("-L")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false);
        Ok(gpu)
    }
}

/// Fixed answer, for tests and for forcing a profile from configuration.
#[derive(Clone, Copy, Debug)]
pub struct StaticProbe(pub bool);

impl AccelProbe for StaticProbe {
    fn probe(&self) -> PromoResult<bool> {
        Ok(self.0)
    }
}

/// Run the probe; a failing probe counts as "no hardware".
pub fn hardware_available(probe: &dyn AccelProbe) -> bool {
    match probe.probe() {
        Ok(available) => available,
        Err(err) => {
            tracing::warn!(%err, "hardware encoder probe failed; using CPU encoder");
            false
        }
    }
}

pub fn select_profile(probe: &dyn AccelProbe) -> EncoderProfile {
    if hardware_available(probe) {
        EncoderProfile::Gpu
    } else {
        EncoderProfile::Cpu
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/probe.rs"]
mod tests;
