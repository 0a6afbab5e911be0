/// Engine configuration
///
/// Frame and window dimensions, the frame-rate target used by `FrameClock`,
/// the texture-slot cap used by `RenderContext` and the engine log level.

use crate::log::LogSeverity;

/// Engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Application name (used in log output and window titles)
    pub app_name: String,
    /// Internal frame (render target / backbuffer) width
    pub frame_width: u32,
    /// Internal frame height
    pub frame_height: u32,
    /// On-screen window width
    pub window_width: u32,
    /// On-screen window height
    pub window_height: u32,
    /// Target frames per second for the frame clock
    pub target_framerate: u32,
    /// Upper bound on texture slots handed out per program activation.
    /// The effective cap is the minimum of this and the device's limit.
    pub max_texture_slots: u32,
    /// Have the backend check and log its own errors after each call
    pub enable_validation: bool,
    /// Least severe message forwarded to the logger once initialized
    pub log_level: LogSeverity,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "Ember3D Application".to_string(),
            frame_width: 1920,
            frame_height: 1080,
            window_width: 1280,
            window_height: 720,
            target_framerate: 60,
            max_texture_slots: 16,
            enable_validation: cfg!(debug_assertions),
            log_level: if cfg!(debug_assertions) { LogSeverity::Debug } else { LogSeverity::Info },
        }
    }
}

impl Config {
    /// Set the internal frame size
    pub fn with_frame(mut self, width: u32, height: u32) -> Self {
        self.frame_width = width;
        self.frame_height = height;
        self
    }

    /// Set the on-screen window size
    pub fn with_window(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    /// Set the target frame rate (clamped to at least 1 fps)
    pub fn with_framerate(mut self, framerate: u32) -> Self {
        self.target_framerate = framerate.max(1);
        self
    }

    /// Set the texture-slot cap
    pub fn with_max_texture_slots(mut self, slots: u32) -> Self {
        self.max_texture_slots = slots;
        self
    }

    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.enable_validation = enabled;
        self
    }

    pub fn with_log_level(mut self, level: LogSeverity) -> Self {
        self.log_level = level;
        self
    }

    /// Target frame interval in seconds
    pub fn frame_interval(&self) -> f32 {
        1.0 / self.target_framerate.max(1) as f32
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
