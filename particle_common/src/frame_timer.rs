use std::time::{Duration, Instant};

/// Keeps track of frame timings of the render loop.
/// `timer` is a value in `[0, 1]` that advances with `timer_speed` per second and can be used to animate things.
pub struct FrameTimer {
    pub frame_counter: u32,
    /// Duration of the last frame in seconds
    pub frame_time: f32,
    pub timer: f32,
    pub timer_speed: f32,
    pub paused: bool,
    pub last_fps: u32,
    fps_timer_ms: f32,
    frame_start: Instant,
}

impl FrameTimer {
    const FPS_REFRESH_MS: f32 = 1000.0;

    pub fn new() -> Self {
        Self {
            frame_counter: 0,
            frame_time: 1.0,
            timer: 0.0,
            timer_speed: 0.25,
            paused: false,
            last_fps: 0,
            fps_timer_ms: 0.0,
            frame_start: Instant::now(),
        }
    }

    /// Called once per frame. The frame lasts from the previous call until now,
    /// so event handling and presentation count towards it.
    /// Returns true when `last_fps` got refreshed.
    pub fn next_frame(&mut self) -> bool {
        let now = Instant::now();
        let frame_duration = now.duration_since(self.frame_start);
        self.frame_start = now;
        self.tick(frame_duration)
    }

    /// Advances the timers by one frame that took `frame_duration`.
    /// Returns true when `last_fps` got refreshed.
    pub fn tick(&mut self, frame_duration: Duration) -> bool {
        self.frame_counter += 1;
        let frame_ms = frame_duration.as_secs_f32() * 1000.0;
        self.frame_time = frame_ms / 1000.0;

        if !self.paused {
            self.timer += self.timer_speed * self.frame_time;
            if self.timer > 1.0 {
                self.timer -= 1.0;
            }
        }

        self.fps_timer_ms += frame_ms;
        if self.fps_timer_ms > Self::FPS_REFRESH_MS {
            self.last_fps = if self.frame_time > 0.0 {
                (1.0 / self.frame_time) as u32
            } else {
                0
            };
            self.fps_timer_ms = 0.0;
            self.frame_counter = 0;
            return true;
        }
        false
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_advances_and_wraps() {
        let mut frame_timer = FrameTimer::new();
        // 0.25 * 2s = 0.5
        frame_timer.tick(Duration::from_millis(2000));
        assert!((frame_timer.timer - 0.5).abs() < 1e-5);
        frame_timer.tick(Duration::from_millis(2400));
        // 0.5 + 0.6 = 1.1 -> wraps to 0.1
        assert!((frame_timer.timer - 0.1).abs() < 1e-5);
    }

    #[test]
    fn paused_timer_does_not_advance() {
        let mut frame_timer = FrameTimer::new();
        frame_timer.toggle_pause();
        frame_timer.tick(Duration::from_millis(500));
        assert_eq!(frame_timer.timer, 0.0);
        assert!((frame_timer.frame_time - 0.5).abs() < 1e-5);
        frame_timer.toggle_pause();
        assert!(!frame_timer.paused);
    }

    #[test]
    fn fps_refreshes_after_a_second() {
        let mut frame_timer = FrameTimer::new();
        let mut refreshed = false;
        for _ in 0..60 {
            refreshed = frame_timer.tick(Duration::from_millis(16));
        }
        // 60 * 16ms = 960ms, still below the refresh interval
        assert!(!refreshed);
        assert_eq!(frame_timer.frame_counter, 60);

        let refreshed = frame_timer.tick(Duration::from_millis(125));
        assert!(refreshed);
        assert_eq!(frame_timer.last_fps, 8);
        assert_eq!(frame_timer.frame_counter, 0);
    }

    #[test]
    fn fps_is_truncated() {
        let mut frame_timer = FrameTimer::new();
        // 1 / 1.1s is 0.9 fps
        assert!(frame_timer.tick(Duration::from_millis(1100)));
        assert_eq!(frame_timer.last_fps, 0);

        frame_timer.tick(Duration::from_millis(400));
        // 1 / 0.7s is 1.43 fps
        assert!(frame_timer.tick(Duration::from_millis(700)));
        assert_eq!(frame_timer.last_fps, 1);
    }

    #[test]
    fn frame_time_spans_the_time_between_frames() {
        let mut frame_timer = FrameTimer::new();
        let mut refreshed = false;
        for _ in 0..20 {
            std::thread::sleep(Duration::from_millis(60));
            refreshed |= frame_timer.next_frame();
        }
        assert!(refreshed);
        assert!(frame_timer.frame_time >= 0.059);
        assert!(frame_timer.last_fps <= 16);
        assert!(frame_timer.last_fps > 0);
    }
}
