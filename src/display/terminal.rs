use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::cell::RefCell;
use std::f64::consts::TAU;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::Config;
use crate::plot::{fit_circle, PlotConfig, PlotError, Point, PolarPlot, RenderStats};
use crate::renderer::{Canvas, RenderStyle, Scene};

/// Center nudge per arrow key, in pixels.
const PAN_STEP: f64 = 2.0;
const ROTATE_STEP: f64 = TAU / 36.0;
const ZOOM_STEP: f64 = 1.25;

pub fn run(config: Config, config_path: Option<PathBuf>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, config, config_path);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Everything the terminal view owns between frames.
struct Viewer {
    plot: PolarPlot,
    scene: Scene,
    canvas: Canvas,
    style: RenderStyle,
    config: Config,
    config_path: Option<PathBuf>,
    /// Plot area of the previous frame, to detect resizes.
    plot_area: Rect,
    pointer: Option<(f64, f64)>,
    activated: Rc<RefCell<Option<String>>>,
    last_stats: RenderStats,
}

impl Viewer {
    fn new(config: Config, config_path: Option<PathBuf>) -> Result<Self> {
        let mut plot = PolarPlot::new(config.plot)?;
        plot.set_show_grid(config.display.show_grid);
        plot.set_blips(config.blips.iter().cloned());

        let activated = Rc::new(RefCell::new(None));
        let sink = activated.clone();
        plot.on_blip_activated(move |hit| {
            *sink.borrow_mut() = Some(format!(
                "{} r={:.1} a={:.1} p={:.1}",
                hit.blip.tag, hit.blip.range, hit.blip.angle, hit.blip.power
            ));
        });

        Ok(Self {
            plot,
            scene: Scene::new(),
            canvas: Canvas::new(0, 0),
            style: RenderStyle {
                color_scheme: config.display.color_scheme,
                opacity: config.display.opacity,
            },
            config,
            config_path,
            plot_area: Rect::default(),
            pointer: None,
            activated,
            last_stats: RenderStats::default(),
        })
    }

    /// Resize the canvas to `area` (one cell is two pixels tall) and refit
    /// the plot when configured to.
    fn layout(&mut self, area: Rect) {
        if area == self.plot_area {
            return;
        }
        self.plot_area = area;
        let (w, h) = (area.width as usize, area.height as usize * 2);
        self.canvas.resize(w, h);

        if self.config.display.fit_to_area && w > 0 && h > 0 {
            let (center, radius) = fit_circle(w, h);
            let fitted = PlotConfig {
                center,
                radius: radius.max(1.0),
                ..*self.plot.config()
            };
            if let Err(e) = self.plot.reconfigure(fitted) {
                warn!("Could not fit plot to {}x{}: {}", w, h, e);
            }
        }
    }

    /// Pixel position of the middle of a terminal cell.
    fn cell_to_point(&self, column: u16, row: u16) -> Option<Point> {
        let area = self.plot_area;
        if column < area.x
            || row < area.y
            || column >= area.x + area.width
            || row >= area.y + area.height
        {
            return None;
        }
        Some(Point::new(
            (column - area.x) as f64,
            (row - area.y) as f64 * 2.0 + 0.5,
        ))
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let Some(point) = self.cell_to_point(mouse.column, mouse.row) else {
            return;
        };
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                let polar = self.plot.pointer_moved(point);
                self.pointer = Some(polar);
                self.plot.draw_crosshair(&mut self.scene, polar);
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if self.plot.activate_at(point).is_none() {
                    *self.activated.borrow_mut() = None;
                }
            }
            _ => {}
        }
    }

    fn pan(&mut self, config: &PlotConfig, dx: f64, dy: f64) -> Result<(), PlotError> {
        let center = Point::new(config.center.x + dx, config.center.y + dy);
        self.plot.set_center(center)
    }

    /// Returns false when the viewer should exit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let config = *self.plot.config();
        let result = match key {
            KeyEvent {
                code: KeyCode::Char('q'),
                ..
            }
            | KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => return false,
            KeyEvent {
                code: KeyCode::Char('c'),
                ..
            } => {
                self.style.color_scheme = self.style.color_scheme.next();
                Ok(())
            }
            KeyEvent { code, .. } => match code {
                KeyCode::Left => self.pan(&config, -PAN_STEP, 0.0),
                KeyCode::Right => self.pan(&config, PAN_STEP, 0.0),
                KeyCode::Up => self.pan(&config, 0.0, -PAN_STEP),
                KeyCode::Down => self.pan(&config, 0.0, PAN_STEP),
                KeyCode::Char('[') => self.plot.set_rotation(config.rotation_offset - ROTATE_STEP),
                KeyCode::Char(']') => self.plot.set_rotation(config.rotation_offset + ROTATE_STEP),
                KeyCode::Char('+') | KeyCode::Char('=') => {
                    self.plot.set_max_range(config.max_range / ZOOM_STEP)
                }
                KeyCode::Char('-') => self.plot.set_max_range(config.max_range * ZOOM_STEP),
                KeyCode::Char('g') => {
                    self.plot.set_show_grid(!self.plot.show_grid());
                    Ok(())
                }
                KeyCode::Char('x') => {
                    self.plot.clear_blips();
                    *self.activated.borrow_mut() = None;
                    Ok(())
                }
                KeyCode::Char('r') => {
                    self.reload_blips();
                    Ok(())
                }
                _ => Ok(()),
            },
        };
        if let Err(e) = result {
            warn!("Ignoring key {:?}: {}", key.code, e);
        }
        true
    }

    fn reload_blips(&mut self) {
        let reloaded = match &self.config_path {
            Some(path) => match Config::load(path) {
                Ok(config) => Some(config),
                Err(e) => {
                    warn!("Reload failed: {:#}", e);
                    None
                }
            },
            None => Config::load_from_default_path(),
        };
        let blips = match reloaded {
            Some(config) => config.blips,
            None => self.config.blips.clone(),
        };
        info!("Reloaded {} blips", blips.len());
        self.plot.set_blips(blips);
    }

    fn render(&mut self) {
        self.last_stats = self.plot.render(&mut self.scene);
        self.scene.rasterize(&mut self.canvas, &self.style);
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: Config,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let frame_time = Duration::from_secs_f64(1.0 / config.display.fps.max(1) as f64);
    let mut viewer = Viewer::new(config, config_path)?;

    loop {
        let size = terminal.size()?;
        let area = Rect::new(0, 1, size.width, size.height.saturating_sub(1));
        viewer.layout(area);
        viewer.render();

        terminal.draw(|frame| {
            let full = frame.area();
            let block = ratatui::widgets::Block::default().style(Style::default().bg(Color::Reset));
            frame.render_widget(block, full);

            draw_canvas(frame, viewer.plot_area, &viewer.canvas);
            render_status(frame, full, &viewer);
        })?;

        // Drain input until the frame budget is spent
        if event::poll(frame_time)? {
            match event::read()? {
                Event::Key(key) => {
                    if !viewer.handle_key(key) {
                        break;
                    }
                }
                Event::Mouse(mouse) => viewer.handle_mouse(mouse),
                _ => {}
            }
        }
    }

    Ok(())
}

/// Copy the canvas into the frame with half-block cells: the upper pixel
/// becomes the foreground of '▀', the lower pixel the background.
fn draw_canvas(frame: &mut Frame, area: Rect, canvas: &Canvas) {
    let buf = frame.buffer_mut();
    for cy in 0..area.height {
        for cx in 0..area.width {
            let top = canvas.get_pixel(cx as usize, cy as usize * 2);
            let bottom = canvas.get_pixel(cx as usize, cy as usize * 2 + 1);
            let Some(cell) = buf.cell_mut((area.x + cx, area.y + cy)) else {
                continue;
            };
            match (top.3 > 0, bottom.3 > 0) {
                (false, false) => {}
                (true, false) => {
                    cell.set_char('▀');
                    cell.set_fg(Color::Rgb(top.0, top.1, top.2));
                }
                (false, true) => {
                    cell.set_char('▄');
                    cell.set_fg(Color::Rgb(bottom.0, bottom.1, bottom.2));
                }
                (true, true) => {
                    cell.set_char('▀');
                    cell.set_fg(Color::Rgb(top.0, top.1, top.2));
                    cell.set_bg(Color::Rgb(bottom.0, bottom.1, bottom.2));
                }
            }
        }
    }
}

fn render_status(frame: &mut Frame, area: Rect, viewer: &Viewer) {
    let pointer = match viewer.pointer {
        Some((angle, range)) => format!("a={:.1} r={:.1}", angle, range),
        None => "a=- r=-".to_string(),
    };
    let mut status = format!(
        " blips: {} | {} | render {} | [c]olor: {} [g]rid [x]clear [r]eload [ ]rotate +/-zoom [q]uit ",
        viewer.plot.blip_count(),
        pointer,
        viewer.last_stats,
        viewer.style.color_scheme.name(),
    );
    if let Some(ref hit) = *viewer.activated.borrow() {
        status = format!(" > {} |{}", hit, status);
    }

    for (i, ch) in status.chars().enumerate() {
        if i < area.width as usize {
            let cell = frame.buffer_mut().cell_mut((area.x + i as u16, area.y));
            if let Some(cell) = cell {
                cell.set_char(ch);
                cell.set_fg(Color::DarkGray);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_maps_into_plot_area() {
        let mut viewer = Viewer::new(Config::default(), None).unwrap();
        viewer.layout(Rect::new(0, 1, 80, 24));
        assert_eq!(viewer.canvas.width, 80);
        assert_eq!(viewer.canvas.height, 48);
        assert_eq!(viewer.cell_to_point(0, 0), None);
        assert_eq!(viewer.cell_to_point(10, 1), Some(Point::new(10.0, 0.5)));
        assert_eq!(viewer.cell_to_point(80, 5), None);
    }

    #[test]
    fn test_layout_fits_plot() {
        let mut viewer = Viewer::new(Config::default(), None).unwrap();
        viewer.layout(Rect::new(0, 1, 100, 20));
        let config = viewer.plot.config();
        assert_eq!(config.center, Point::new(50.0, 20.0));
        assert!((config.radius - 19.0).abs() < 1e-9);
    }

    #[test]
    fn test_keys_adjust_plot() {
        let mut viewer = Viewer::new(Config::default(), None).unwrap();
        let before = *viewer.plot.config();
        assert!(viewer.handle_key(KeyEvent::from(KeyCode::Right)));
        assert!(viewer.handle_key(KeyEvent::from(KeyCode::Char('+'))));
        let after = viewer.plot.config();
        assert_eq!(after.center.x, before.center.x + PAN_STEP);
        assert!(after.max_range < before.max_range);
        assert!(!viewer.handle_key(KeyEvent::from(KeyCode::Char('q'))));
    }
}
