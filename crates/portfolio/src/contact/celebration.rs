//! Confetti overlay played once per successful submission.
//!
//! `trigger()` only spawns particles; the app advances them on every tick and
//! draws the overlay last, on top of pages and the modal. Particles expire
//! after the configured duration and are dropped, so an idle celebration holds
//! no state at all.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

use crate::config::CelebrationConfig;

const GRAVITY: f32 = 0.9;
const DRAG: f32 = 0.6;
/// Burst origin in normalized frame coordinates.
const ORIGIN: (f32, f32) = (0.5, 0.6);

const GLYPHS: [char; 6] = ['•', '*', '✦', '▪', '◆', '~'];
const COLORS: [Color; 6] = [
    Color::Rgb(38, 204, 255),
    Color::Rgb(160, 93, 232),
    Color::Rgb(253, 255, 0),
    Color::Rgb(255, 124, 80),
    Color::Rgb(16, 185, 129),
    Color::Rgb(239, 68, 68),
];

#[derive(Debug, Clone)]
struct Particle {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    born: Instant,
    ttl: Duration,
    glyph: char,
    color: Color,
}

impl Particle {
    fn alive(&self, now: Instant) -> bool {
        now.duration_since(self.born) < self.ttl && self.y < 1.2
    }
}

pub struct Celebration {
    config: CelebrationConfig,
    particles: Vec<Particle>,
    last_step: Option<Instant>,
    rng: StdRng,
}

impl Celebration {
    pub fn new(config: CelebrationConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_rng(config: CelebrationConfig, rng: StdRng) -> Self {
        Self {
            config,
            particles: Vec::new(),
            last_step: None,
            rng,
        }
    }

    pub fn trigger(&mut self) {
        self.trigger_at(Instant::now());
    }

    /// Spawn one burst. Disabled celebrations are a no-op.
    pub fn trigger_at(&mut self, now: Instant) {
        if !self.config.enabled {
            return;
        }
        let spread = self.config.spread_degrees.to_radians();
        let base_ttl = Duration::from_millis(self.config.duration_ms);

        self.particles.reserve(self.config.particles);
        for _ in 0..self.config.particles {
            // straight up is -90°; fan out by half the spread on both sides
            let angle = -std::f32::consts::FRAC_PI_2 + self.rng.gen_range(-0.5f32..=0.5) * spread;
            let speed: f32 = self.rng.gen_range(0.6..1.3);
            let ttl = base_ttl.mul_f32(self.rng.gen_range(0.6..=1.0));
            self.particles.push(Particle {
                x: ORIGIN.0,
                y: ORIGIN.1,
                vx: angle.cos() * speed * 0.6,
                vy: angle.sin() * speed,
                born: now,
                ttl,
                glyph: GLYPHS[self.rng.gen_range(0..GLYPHS.len())],
                color: COLORS[self.rng.gen_range(0..COLORS.len())],
            });
        }
        self.last_step = Some(now);
        tracing::debug!("celebration triggered with {} particles", self.config.particles);
    }

    pub fn advance(&mut self) {
        self.advance_to(Instant::now());
    }

    /// Integrate particle motion up to `now` and drop expired particles.
    pub fn advance_to(&mut self, now: Instant) {
        if self.particles.is_empty() {
            self.last_step = None;
            return;
        }
        let dt = self
            .last_step
            .map(|last| now.saturating_duration_since(last).as_secs_f32())
            .unwrap_or(0.0);
        self.last_step = Some(now);

        let damping = (1.0 - DRAG * dt).max(0.0);
        for p in &mut self.particles {
            p.vy += GRAVITY * dt;
            p.vx *= damping;
            p.x += p.vx * dt;
            p.y += p.vy * dt;
        }
        self.particles.retain(|p| p.alive(now));
        if self.particles.is_empty() {
            self.last_step = None;
        }
    }

    pub fn is_active(&self) -> bool {
        !self.particles.is_empty()
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }
}

impl Widget for &Celebration {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        for p in &self.particles {
            if !(0.0..1.0).contains(&p.x) || !(0.0..1.0).contains(&p.y) {
                continue;
            }
            let col = area.x + (p.x * f32::from(area.width)) as u16;
            let row = area.y + (p.y * f32::from(area.height)) as u16;
            if let Some(cell) = buf.cell_mut((col, row)) {
                cell.set_char(p.glyph).set_fg(p.color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(particles: usize) -> CelebrationConfig {
        CelebrationConfig {
            enabled: true,
            particles,
            duration_ms: 1000,
            spread_degrees: 70.0,
        }
    }

    fn seeded(particles: usize) -> Celebration {
        Celebration::with_rng(config(particles), StdRng::seed_from_u64(7))
    }

    #[test]
    fn trigger_spawns_configured_particles() {
        let mut c = seeded(40);
        assert!(!c.is_active());
        c.trigger_at(Instant::now());
        assert_eq!(c.particle_count(), 40);
    }

    #[test]
    fn particles_expire_and_release_state() {
        let mut c = seeded(25);
        let start = Instant::now();
        c.trigger_at(start);
        c.advance_to(start + Duration::from_millis(100));
        assert!(c.is_active());

        c.advance_to(start + Duration::from_millis(1100));
        assert!(!c.is_active());
        assert!(c.last_step.is_none());
    }

    #[test]
    fn burst_moves_upwards_first() {
        let mut c = seeded(10);
        let start = Instant::now();
        c.trigger_at(start);
        c.advance_to(start + Duration::from_millis(50));
        assert!(c.particles.iter().all(|p| p.y < ORIGIN.1));
    }

    #[test]
    fn disabled_celebration_does_nothing() {
        let mut c = Celebration::with_rng(
            CelebrationConfig {
                enabled: false,
                ..config(10)
            },
            StdRng::seed_from_u64(1),
        );
        c.trigger_at(Instant::now());
        assert!(!c.is_active());
    }

    #[test]
    fn render_paints_within_area() {
        let mut c = seeded(30);
        c.trigger_at(Instant::now());
        let area = Rect::new(0, 0, 40, 20);
        let mut buf = Buffer::empty(area);
        (&c).render(area, &mut buf);
        let painted = buf.content().iter().filter(|cell| cell.symbol() != " ").count();
        assert!(painted > 0);
    }
}
