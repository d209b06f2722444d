mod app;
mod config;
mod gfx;
mod session;
mod style;
mod wayland;
mod widgets;

use anyhow::{anyhow, Result};
use app::App;
use config::Config;
use gfx::canvas::DrawList;
use gfx::draw::DrawContext;
use gfx::gl::{load_shader_program, ShaderSources};
use log::{debug, info, warn};
use rand::Rng;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use wayland::egl::EglContext;
use wayland::WaylandState;
use wayland_client::backend::WaylandError;
use wayland_client::{Connection, Proxy};
use wayland_protocols_wlr::layer_shell::v1::client::zwlr_layer_shell_v1;

fn main() -> Result<()> {
    env_logger::init();

    let config = load_config();
    let state_path = session::state_path()
        .map_err(|e| warn!("Session state disabled: {:#}", e))
        .ok();
    let saved = state_path.as_deref().and_then(|path| {
        session::load(path)
            .map_err(|e| warn!("Ignoring unreadable session {}: {:#}", path.display(), e))
            .ok()
            .flatten()
    });

    let mut app = App::new(config, rand::thread_rng());
    app.start(saved);

    if std::env::args().skip(1).any(|arg| arg == "--dump-frame") {
        dump_frame(&mut app);
        return Ok(());
    }

    let result = run(&mut app);
    save_session(&app, state_path.as_ref());
    result
}

fn load_config() -> Config {
    match Config::path() {
        Ok(path) if !path.exists() => {
            let config = Config::default();
            match config.save() {
                Ok(()) => info!("Wrote default config to {}", path.display()),
                Err(e) => warn!("Could not write default config: {:#}", e),
            }
            config
        }
        _ => Config::load().unwrap_or_else(|e| {
            warn!("Failed to load config, using defaults: {:#}", e);
            Config::default()
        }),
    }
}

fn save_session<R: Rng>(app: &App<R>, path: Option<&PathBuf>) {
    if let Some(path) = path {
        if let Err(e) = session::save(path, &app.capture_state()) {
            warn!("Failed to save session: {:#}", e);
        }
    }
}

/// Prints the draw calls of the settled bar at the configured window size.
fn dump_frame<R: Rng>(app: &mut App<R>) {
    let size = app.layout();
    // one frame past the animation length settles any pending run
    app.update(0.0);
    app.update(1.0);

    let mut list = DrawList::new();
    app.render(&mut list);
    println!(
        "{}x{} progress={} goal={}",
        size.width,
        size.height,
        app.bar.progress(),
        app.bar.goal()
    );
    for op in &list.ops {
        println!("{}", op);
    }
}

fn run<R: Rng>(app: &mut App<R>) -> Result<()> {
    info!("Connecting to Wayland...");
    let conn = Connection::connect_to_env()?;
    let display = conn.display();

    let mut event_queue = conn.new_event_queue();
    let qh = event_queue.handle();
    let _registry = display.get_registry(&qh, ());

    let mut state = WaylandState::new();
    event_queue.roundtrip(&mut state)?;
    if let Some([w, h]) = state.output_size {
        debug!("Output mode {}x{}", w, h);
    }

    let compositor = state
        .compositor
        .clone()
        .ok_or_else(|| anyhow!("Compositor does not offer wl_compositor"))?;
    let layer_shell = state
        .layer_shell
        .clone()
        .ok_or_else(|| anyhow!("Compositor does not support zwlr_layer_shell_v1"))?;

    let size = app.layout();
    let window = &app.config.window;

    let surface = compositor.create_surface(&qh, ());
    let layer_surface = layer_shell.get_layer_surface(
        &surface,
        state.output.as_ref(),
        zwlr_layer_shell_v1::Layer::Overlay,
        "goalbar".to_string(),
        &qh,
        (),
    );
    layer_surface.set_anchor(wayland::layer_anchor(window.anchor));
    layer_surface.set_margin(
        window.margins.top,
        window.margins.right,
        window.margins.bottom,
        window.margins.left,
    );
    layer_surface.set_exclusive_zone(0);
    layer_surface.set_size(size.width, size.height);
    surface.commit();

    debug!("Waiting for surface configuration...");
    while !state.configured {
        event_queue.blocking_dispatch(&mut state)?;
    }

    app.offered_size = state.configured_size;
    let mut size = app.layout();

    let display_ptr = display.id().as_ptr() as *mut _;
    let mut egl = EglContext::new(display_ptr)?;
    egl.create_surface(&surface, size.width as i32, size.height as i32)?;

    let gl = unsafe { glow::Context::from_loader_function(|s| egl.get_proc_address(s)) };
    let program = load_shader_program(&gl, &ShaderSources::load())?;
    let mut draw = DrawContext::new(gl, program)?;

    let frame_interval = Duration::from_millis(app.config.frame_interval_ms());
    let mut last_frame = Instant::now();
    let mut force_redraw = true;

    info!("Starting main loop...");
    while state.running {
        conn.flush()?;
        if let Some(guard) = event_queue.prepare_read() {
            match guard.read() {
                Ok(_) => {}
                Err(WaylandError::Io(e)) if e.kind() == ErrorKind::WouldBlock => {}
                Err(e) => return Err(e.into()),
            }
        }
        event_queue.dispatch_pending(&mut state)?;

        for ev in state.pending_events.drain(..) {
            app.handle_event(ev);
        }

        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;
        app.update(dt);

        if state.configured_size != app.offered_size {
            app.offered_size = state.configured_size;
            let measured = app.layout();
            if measured != size {
                size = measured;
                egl.resize(size.width as i32, size.height as i32);
                layer_surface.set_size(size.width, size.height);
                surface.commit();
            }
            force_redraw = true;
        }

        if app.needs_redraw() || force_redraw {
            force_redraw = false;
            egl.make_current()?;
            draw.begin([size.width as f32, size.height as f32], app.background);
            app.render(&mut draw);
            draw.flush();
            egl.swap_buffers()?;
        }

        std::thread::sleep(frame_interval);
    }

    info!("Layer surface closed, shutting down");
    drop(draw);
    drop(egl);
    layer_surface.destroy();
    surface.destroy();
    Ok(())
}
