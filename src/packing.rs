//! Packing animator (mode `opt`).
//!
//! Seven pieces are laid out once into two rows (four over three) inside an
//! inset content area. Every few seconds the set of target slots is permuted
//! among the pieces, and each piece continuously follows its current slot.

use glam::DVec2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::AnimConfig;
use crate::easing::{approach_factor, smoothstep};
use crate::scene::{uniform, Scene};
use crate::surface::{Rect, Rgba, Surface};

pub const PIECE_COUNT: usize = 7;
/// Pieces in the top row; the rest go in the bottom row.
pub const FIRST_ROW_LEN: usize = 4;
/// Inset of the content area from every canvas edge.
pub const MARGIN: f64 = 16.0;
/// Gap between neighbouring pieces and between the two rows.
pub const PAD: f64 = 5.0;

/// Width/height of each piece as a fraction of the content area.
const BASE_FRACTIONS: [(f64, f64); PIECE_COUNT] = [
    (0.32, 0.35),
    (0.20, 0.35),
    (0.28, 0.25),
    (0.18, 0.25),
    (0.22, 0.30),
    (0.24, 0.30),
    (0.16, 0.30),
];
const WIDTH_JITTER: (f64, f64) = (0.92, 1.08);
const HEIGHT_JITTER: (f64, f64) = (0.90, 1.07);

const PALETTE: [Rgba; 2] = [Rgba::rgb(0xcf, 0xd8, 0xdc), Rgba::rgb(0xb0, 0xbe, 0xc5)];

const ENTER_DELAY_MAX: f64 = 350.0;
const ENTER_DURATION: f64 = 650.0;
const MIN_SCALE: f64 = 0.05;
const PULSE_PERIOD: f64 = 600.0;
const BORDER_INSET: f64 = 6.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pos: DVec2,
    target: DVec2,
    size: DVec2,
    color: Rgba,
    enter_delay: f64,
}

impl Piece {
    /// Current (animated) centre.
    pub fn pos(&self) -> DVec2 {
        self.pos
    }

    /// Centre of the slot this piece is heading for.
    pub fn target(&self) -> DVec2 {
        self.target
    }

    pub fn size(&self) -> DVec2 {
        self.size
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn enter_delay(&self) -> f64 {
        self.enter_delay
    }

    /// Box of the slot this piece is heading for.
    pub fn target_rect(&self) -> Rect {
        Rect::from_center(self.target, self.size)
    }

    /// Entrance scale in `[MIN_SCALE, 1]` at time `elapsed`.
    fn entrance_scale(&self, elapsed: f64) -> f64 {
        let t = (elapsed - self.enter_delay) / ENTER_DURATION;
        MIN_SCALE + smoothstep(t) * (1.0 - MIN_SCALE)
    }
}

/// The content area pieces are packed into.
pub fn content_rect(width: f64, height: f64) -> Rect {
    Rect::new(MARGIN, MARGIN, width - MARGIN * 2.0, height - MARGIN * 2.0)
}

/// Lay out the seven pieces. Each piece starts at a random point on the
/// canvas with its slot centre as target.
pub fn layout_pieces<R: Rng + ?Sized>(width: f64, height: f64, rng: &mut R) -> Vec<Piece> {
    let area = content_rect(width, height);
    let mut sizes: Vec<DVec2> = BASE_FRACTIONS
        .iter()
        .map(|&(fw, fh)| {
            DVec2::new(
                area.w * fw * uniform(rng, WIDTH_JITTER.0, WIDTH_JITTER.1),
                area.h * fh * uniform(rng, HEIGHT_JITTER.0, HEIGHT_JITTER.1),
            )
        })
        .collect();

    let (top, bottom) = sizes.split_at_mut(FIRST_ROW_LEN);
    fit_row(top, area.w);
    fit_row(bottom, area.w);
    fit_rows(top, bottom, area.h);

    let mut pieces = Vec::with_capacity(PIECE_COUNT);
    let mut y = area.y;
    for row in [&*top, &*bottom] {
        let row_h = row_height(row);
        let mut x = area.x;
        for size in row {
            let color = PALETTE[pieces.len() % PALETTE.len()];
            pieces.push(Piece {
                pos: DVec2::new(uniform(rng, 0.0, width), uniform(rng, 0.0, height)),
                target: DVec2::new(x + size.x / 2.0, y + row_h / 2.0),
                size: *size,
                color,
                enter_delay: uniform(rng, 0.0, ENTER_DELAY_MAX),
            });
            x += size.x + PAD;
        }
        y += row_h + PAD;
    }
    pieces
}

fn row_height(row: &[DVec2]) -> f64 {
    row.iter().map(|s| s.y).fold(0.0, f64::max)
}

/// Shrink a row's widths uniformly so the row plus its gaps spans at most
/// `available`. The nominal fractions of the top row already leave almost no
/// room, so the width jitter alone can push it past the content edge.
fn fit_row(row: &mut [DVec2], available: f64) {
    let gaps = PAD * row.len().saturating_sub(1) as f64;
    let total: f64 = row.iter().map(|s| s.x).sum();
    if total + gaps > available && total > 0.0 {
        let k = ((available - gaps) / total).max(0.0);
        row.iter_mut().for_each(|s| s.x *= k);
    }
}

fn fit_rows(top: &mut [DVec2], bottom: &mut [DVec2], available: f64) {
    let total = row_height(top) + row_height(bottom);
    if total + PAD > available && total > 0.0 {
        let k = ((available - PAD) / total).max(0.0);
        top.iter_mut().chain(bottom.iter_mut()).for_each(|s| s.y *= k);
    }
}

pub struct PackingScene {
    pieces: Vec<Piece>,
    rng: StdRng,
    elapsed: f64,
    shuffle_timer: f64,
    shuffle_interval: f64,
    follow_tau: f64,
}

impl PackingScene {
    pub fn new(width: f64, height: f64, config: &AnimConfig, mut rng: StdRng) -> Self {
        let pieces = layout_pieces(width, height, &mut rng);
        Self {
            pieces,
            rng,
            elapsed: 0.0,
            shuffle_timer: 0.0,
            shuffle_interval: config.shuffle_interval_ms,
            follow_tau: config.follow_tau_ms,
        }
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Permute the target slots among the pieces. The set of slots is
    /// unchanged; only which piece heads for which slot moves.
    pub fn reshuffle(&mut self) {
        let mut order: Vec<usize> = (0..self.pieces.len()).collect();
        order.shuffle(&mut self.rng);
        let slots: Vec<DVec2> = order.iter().map(|&i| self.pieces[i].target).collect();
        for (piece, slot) in self.pieces.iter_mut().zip(slots) {
            piece.target = slot;
        }
        log::trace!("reshuffled packing slots: {order:?}");
    }

    fn pulse(&self) -> f64 {
        ((self.elapsed / PULSE_PERIOD).sin() + 1.0) / 2.0
    }
}

impl Scene for PackingScene {
    fn update(&mut self, dt: f64) {
        self.elapsed += dt;
        self.shuffle_timer += dt;
        if self.shuffle_timer > self.shuffle_interval {
            self.reshuffle();
            self.shuffle_timer = 0.0;
        }

        let k = approach_factor(dt, self.follow_tau);
        for piece in &mut self.pieces {
            piece.pos += (piece.target - piece.pos) * k;
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        let (width, height) = surface.size();
        let pulse = self.pulse();
        surface.stroke_rect(
            Rect::new(
                BORDER_INSET,
                BORDER_INSET,
                width - BORDER_INSET * 2.0,
                height - BORDER_INSET * 2.0,
            ),
            Rgba::WHITE.with_alpha(0.40 + pulse * 0.25),
            2.0,
        );

        for piece in &self.pieces {
            let scale = piece.entrance_scale(self.elapsed);
            let body = Rect::from_center(DVec2::ZERO, piece.size);
            surface.save();
            surface.translate(piece.pos.x, piece.pos.y);
            surface.scale(scale, scale);
            surface.set_alpha(0.85 + pulse * 0.10);
            surface.fill_rect(body, piece.color);
            surface.stroke_rect(body, Rgba::WHITE.with_alpha(0.55), 1.1);
            surface.restore();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawOp, RecordingSurface};
    use rand::SeedableRng;

    fn scene(seed: u64) -> PackingScene {
        PackingScene::new(320.0, 220.0, &AnimConfig::default(), StdRng::seed_from_u64(seed))
    }

    fn sorted_slots(scene: &PackingScene) -> Vec<(f64, f64)> {
        let mut slots: Vec<(f64, f64)> = scene.pieces().iter().map(|p| (p.target().x, p.target().y)).collect();
        slots.sort_by(|a, b| a.partial_cmp(b).unwrap());
        slots
    }

    #[test]
    fn seven_pieces_four_over_three() {
        for seed in 0..50 {
            let s = scene(seed);
            assert_eq!(s.pieces().len(), PIECE_COUNT);
            let top_y = s.pieces()[0].target().y;
            let bottom_y = s.pieces()[FIRST_ROW_LEN].target().y;
            assert!(top_y < bottom_y);
            assert!(s.pieces()[..FIRST_ROW_LEN].iter().all(|p| p.target().y == top_y));
            assert!(s.pieces()[FIRST_ROW_LEN..].iter().all(|p| p.target().y == bottom_y));
        }
    }

    #[test]
    fn palette_alternates_and_entry_delays_stay_in_range() {
        for seed in 0..20 {
            let s = scene(seed);
            for (i, piece) in s.pieces().iter().enumerate() {
                assert_eq!(piece.color(), PALETTE[i % 2]);
                assert!((0.0..ENTER_DELAY_MAX).contains(&piece.enter_delay()));
            }
        }
    }

    #[test]
    fn zero_follow_constant_keeps_easing_gradual() {
        let config = AnimConfig {
            follow_tau_ms: 0.0,
            shuffle_interval_ms: f64::INFINITY,
            ..AnimConfig::default()
        }
        .validated();
        let mut s = PackingScene::new(320.0, 220.0, &config, StdRng::seed_from_u64(14));
        let before: Vec<f64> = s.pieces().iter().map(|p| p.pos().distance(p.target())).collect();
        s.update(16.0);
        for (piece, d0) in s.pieces().iter().zip(before) {
            let d1 = piece.pos().distance(piece.target());
            assert!(d1 < d0 && d1 > 0.0, "d0={d0} d1={d1}");
        }
    }

    #[test]
    fn slots_stay_inside_content_area() {
        let area = content_rect(320.0, 220.0);
        for seed in 0..200 {
            for piece in scene(seed).pieces() {
                let r = piece.target_rect();
                assert!(r.x >= area.x - 1e-9 && r.right() <= area.right() + 1e-9, "seed {seed}: {r:?}");
                assert!(r.y >= area.y - 1e-9 && r.bottom() <= area.bottom() + 1e-9, "seed {seed}: {r:?}");
            }
        }
    }

    #[test]
    fn slots_in_a_row_do_not_overlap() {
        let s = scene(3);
        let rects: Vec<Rect> = s.pieces().iter().map(Piece::target_rect).collect();
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn reshuffle_permutes_slots() {
        let mut s = scene(11);
        let before = sorted_slots(&s);
        let sizes: Vec<DVec2> = s.pieces().iter().map(Piece::size).collect();
        let mut identity = 0;
        for _ in 0..200 {
            let assigned: Vec<DVec2> = s.pieces().iter().map(Piece::target).collect();
            s.reshuffle();
            assert_eq!(sorted_slots(&s), before);
            if s.pieces().iter().map(Piece::target).eq(assigned) {
                identity += 1;
            }
        }
        assert!(identity < 10, "identity permutation {identity}/200 times");
        assert!(s.pieces().iter().map(Piece::size).eq(sizes));
    }

    #[test]
    fn follow_strictly_approaches_target() {
        let config = AnimConfig {
            shuffle_interval_ms: f64::INFINITY,
            ..AnimConfig::default()
        };
        let mut s = PackingScene::new(320.0, 220.0, &config, StdRng::seed_from_u64(5));
        for _ in 0..60 {
            let before: Vec<f64> = s.pieces().iter().map(|p| p.pos().distance(p.target())).collect();
            s.update(16.0);
            for (piece, d0) in s.pieces().iter().zip(before) {
                if d0 > 0.0 {
                    assert!(piece.pos().distance(piece.target()) < d0);
                }
            }
        }
        for _ in 0..90 {
            s.update(16.0);
        }
        assert!(s.pieces().iter().all(|p| p.pos().distance(p.target()) < 1e-3));
    }

    #[test]
    fn shuffle_fires_after_interval() {
        let mut s = scene(21);
        let initial: Vec<DVec2> = s.pieces().iter().map(Piece::target).collect();
        s.update(1600.0);
        assert!(s.pieces().iter().map(Piece::target).eq(initial.iter().copied()));
        let mut moved = false;
        for _ in 0..20 {
            s.update(1601.0);
            if !s.pieces().iter().map(Piece::target).eq(initial.iter().copied()) {
                moved = true;
                break;
            }
        }
        assert!(moved);
    }

    #[test]
    fn render_grows_pieces_in() {
        let s = scene(8);
        let mut surface = RecordingSurface::new(320.0, 220.0);
        s.render(&mut surface);
        assert_eq!(surface.fills().count(), PIECE_COUNT);
        let scales: Vec<f64> = surface
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Scale(sx, _) => Some(*sx),
                _ => None,
            })
            .collect();
        assert!(scales.iter().all(|&k| (k - MIN_SCALE).abs() < 1e-12));
        assert!(matches!(surface.ops()[0], DrawOp::StrokeRect(_, _, w) if w == 2.0));

        let mut grown = scene(8);
        grown.update(ENTER_DELAY_MAX + ENTER_DURATION);
        let mut surface = RecordingSurface::new(320.0, 220.0);
        grown.render(&mut surface);
        assert!(surface
            .ops()
            .iter()
            .any(|op| matches!(op, DrawOp::Scale(k, _) if (k - 1.0).abs() < 1e-12)));
    }
}
