use crate::{
    input::{InputAction, InputState},
    result::{ParticleError, Result},
    winit_window,
};
use glm::Vec2;
use log::{debug, error, info};
use particle_common::{config::Settings, frame_timer::FrameTimer, view::ViewState};
use particle_vulkan_backend::backend::particle_renderer::ParticleRenderer;
use winit::{
    event::{Event, KeyEvent, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    window::Window,
};

/// This struct represent the renderer main loop.
/// It sets up a window and runs the renderer within that window until it is closed.
pub struct MainLoop;

impl MainLoop {
    pub fn run(settings: Settings) -> Result<()> {
        let event_loop = EventLoop::new()?;
        let winit_window = winit_window::create_window(&settings, &event_loop)?;

        let window_surface = winit_window::get_window_surface_from_winit(&winit_window)?;
        let window_size = winit_window::get_window_size_from_winit(&winit_window);

        let mut renderer = ParticleRenderer::new(&settings, &window_surface, &window_size)?;

        let base_title = format!("{} - {}", settings.title, renderer.device_name());
        winit_window.set_title(&base_title);

        let mut frame_timer = FrameTimer::new();
        let mut view_state = ViewState::new();
        let mut input_state = InputState::new();
        let mut loop_error: Option<ParticleError> = None;

        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run(|event, elwt| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    Self::exit(elwt);
                }
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key, state, ..
                        },
                    ..
                } => match input_state.on_key(&logical_key, state) {
                    InputAction::Exit => Self::exit(elwt),
                    InputAction::TogglePause => frame_timer.toggle_pause(),
                    InputAction::None => {}
                },
                WindowEvent::MouseInput { button, state, .. } => {
                    input_state.on_mouse_button(button, state, &mut view_state);
                }
                WindowEvent::CursorMoved { position, .. } => {
                    let position = Vec2::new(position.x as f32, position.y as f32);
                    input_state.on_cursor_moved(position, &mut view_state);
                }
                WindowEvent::MouseWheel { delta, .. } => {
                    input_state.on_mouse_wheel(delta, &mut view_state);
                }
                WindowEvent::Resized(winit::dpi::PhysicalSize { width, height }) => {
                    info!("Window was resized to {}x{}", width, height);
                    renderer.window_resized = true;
                    if width == 0 || height == 0 {
                        info!("Window was minimized");
                        renderer.window_minimized = true;
                    } else {
                        renderer.window_minimized = false;
                    }
                }
                WindowEvent::RedrawRequested => {
                    if view_state.take_view_updated() {
                        renderer.view_changed();
                    }
                    let window_size = winit_window::get_window_size_from_winit(&winit_window);
                    if let Err(err) = renderer.draw_frame(&window_size, &view_state) {
                        error!("Failed to draw frame: {}", err);
                        loop_error = Some(err.into());
                        Self::exit(elwt);
                        return;
                    }
                    if frame_timer.next_frame() {
                        Self::update_title(&winit_window, &base_title, frame_timer.last_fps);
                        debug!(
                            "Frame time {:.2} ms, timer at {:.3}{}",
                            frame_timer.frame_time * 1000.0,
                            frame_timer.timer,
                            if frame_timer.paused { " (paused)" } else { "" }
                        );
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                winit_window.request_redraw();
            }
            Event::LoopExiting => {
                info!("In exit main loop");
                if let Err(err) = renderer.wait_until_device_idle() {
                    error!("Failed while waiting until device idle: {}", err);
                }
            }
            _ => {}
        })?;

        loop_error.map_or(Ok(()), Err)
    }

    fn update_title(winit_window: &Window, base_title: &str, fps: u32) {
        winit_window.set_title(&format!("{} - {} fps", base_title, fps));
    }

    fn exit(elwt: &EventLoopWindowTarget<()>) {
        elwt.exit();
    }
}
