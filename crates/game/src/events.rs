//! Window event handling for GameState.
//! Extracted from main.rs to keep the event loop and input handling in one place.

use engine_core::Vec3;
use winit::event::WindowEvent;
use winit::keyboard::KeyCode;

impl crate::GameState {
    /// Handle a window event. Returns true if the app should exit.
    pub(crate) fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                self.running = false;
                true
            }
            WindowEvent::Resized(size) => {
                self.renderer.resize(size);
                self.camera.set_size(size.width, size.height);
                false
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let winit::keyboard::PhysicalKey::Code(key) = event.physical_key {
                    self.input.process_keyboard(key, event.state);

                    if event.state.is_pressed() {
                        match key {
                            KeyCode::Escape => {
                                self.running = false;
                                return true;
                            }
                            // camera modes: fixed on the origin, free
                            // orbit, or tracking the helicopter
                            KeyCode::Digit0 => {
                                self.camera_follow = false;
                                self.camera.follow(Vec3::ZERO);
                            }
                            KeyCode::Digit1 => {
                                self.camera_follow = false;
                            }
                            KeyCode::Digit2 => {
                                self.camera_follow = true;
                            }
                            KeyCode::KeyM => {
                                self.lights.is_day = !self.lights.is_day;
                                log::info!(
                                    "Time of day: {}",
                                    if self.lights.is_day { "day" } else { "night" }
                                );
                            }
                            KeyCode::KeyN => {
                                self.lights.white_lights_on = !self.lights.white_lights_on;
                            }
                            KeyCode::KeyP => {
                                self.screenshot_requested = true;
                            }
                            _ => {}
                        }
                    }
                }
                false
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.input.process_mouse_button(button, state);
                false
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(delta) = self.input.process_cursor_position((position.x, position.y)) {
                    self.camera.orbit(delta, 0.0);
                }
                false
            }
            WindowEvent::MouseWheel { delta, .. } => {
                match delta {
                    winit::event::MouseScrollDelta::LineDelta(_, y) => {
                        self.input.process_scroll(y);
                    }
                    winit::event::MouseScrollDelta::PixelDelta(pos) => {
                        // pixel deltas come in much larger units than lines
                        self.input.process_scroll(pos.y as f32 / 20.0);
                    }
                }
                false
            }
            WindowEvent::RedrawRequested => {
                self.update();
                if let Err(e) = self.render() {
                    log::error!("Render error: {}", e);
                }
                self.renderer.window.request_redraw();
                false
            }
            _ => false,
        }
    }
}
