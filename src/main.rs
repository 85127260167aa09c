mod agent;
mod apple;
mod astar;
mod config;
mod cycle;
mod draw;
mod error;
mod game;
mod grid;
mod pos;
mod snake;

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use pixels::{Pixels, SurfaceTexture};
use tracing::info;
use tracing_subscriber::EnvFilter;
use winit::dpi::LogicalSize;
use winit::event::{Event, VirtualKeyCode};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;
use winit_input_helper::WinitInputHelper;

use crate::config::Config;
use crate::draw::Renderer;
use crate::game::SnakeGame;
use crate::pos::Dir;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load(Path::new("serpentris.json"));
    info!(
        width = config.grid_width,
        height = config.grid_height,
        autopilot = config.autopilot,
        "starting"
    );

    let renderer = Renderer::new(config.grid_width, config.grid_height);
    let (surface_w, surface_h) = renderer.surface_size();

    let event_loop = EventLoop::new();
    let mut input = WinitInputHelper::new();

    let window = WindowBuilder::new()
        .with_title("Serpentris")
        .with_inner_size(LogicalSize::new(surface_w, surface_h))
        .with_resizable(false)
        .build(&event_loop)?;

    let mut pixels = {
        let window_size = window.inner_size();
        let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
        Pixels::new(surface_w, surface_h, surface_texture)?
    };

    let mut game = SnakeGame::new(&config);
    let mut show_cycle = config.cycle_overlay;
    let tick_duration = Duration::from_millis(config.tick_ms);
    let mut last_update = Instant::now();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        if let Event::RedrawRequested(_) = event {
            renderer.draw(&game, pixels.frame_mut(), show_cycle);
            if pixels.render().is_err() {
                *control_flow = ControlFlow::Exit;
            }
        }

        if input.update(&event) {
            if input.key_pressed(VirtualKeyCode::Escape) || input.close_requested() || input.destroyed() {
                *control_flow = ControlFlow::Exit;
                return;
            }

            if input.key_pressed(VirtualKeyCode::R) && game.game_over() {
                game.reset();
            }

            if input.key_pressed(VirtualKeyCode::P) {
                game.paused = !game.paused;
            }

            if input.key_pressed(VirtualKeyCode::Space) {
                game.toggle_autopilot();
            }

            if input.key_pressed(VirtualKeyCode::H) {
                show_cycle = !show_cycle;
            }

            // Manual steering; ignored while the autopilot drives.
            if input.key_pressed(VirtualKeyCode::Up) || input.key_pressed(VirtualKeyCode::W) {
                game.queue_direction(Dir::Up);
            }
            if input.key_pressed(VirtualKeyCode::Down) || input.key_pressed(VirtualKeyCode::S) {
                game.queue_direction(Dir::Down);
            }
            if input.key_pressed(VirtualKeyCode::Left) || input.key_pressed(VirtualKeyCode::A) {
                game.queue_direction(Dir::Left);
            }
            if input.key_pressed(VirtualKeyCode::Right) || input.key_pressed(VirtualKeyCode::D) {
                game.queue_direction(Dir::Right);
            }

            if last_update.elapsed() >= tick_duration {
                game.tick();
                last_update = Instant::now();
            }

            window.request_redraw();
        }
    });
}
