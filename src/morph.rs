//! Morph animator (mode `pdf`).
//!
//! Scattered pieces are row-packed into a block, then stretched into a single
//! page rectangle that finally gets a "PDF" label. Each phase interpolates
//! from the piece's recorded anchor for that phase (scatter origin, packed
//! slot), never from where the previous phase happened to leave it.

use glam::DVec2;
use rand::rngs::StdRng;
use rand::Rng;

use crate::easing::lerp;
use crate::scene::{uniform, Scene};
use crate::surface::{Rect, Rgba, Surface};

pub const PIECE_COUNT: usize = 28;
const WIDTH_RANGE: (f64, f64) = (24.0, 70.0);
const HEIGHT_RANGE: (f64, f64) = (22.0, 60.0);
/// Scatter region as fractions of the canvas.
const SCATTER_X: (f64, f64) = (0.1, 0.9);
const SCATTER_Y: (f64, f64) = (0.2, 0.8);

pub const PACK_PAD: f64 = 3.0;
/// Packed rows wrap once they would exceed this fraction of the canvas width.
pub const MAX_ROW_FRACTION: f64 = 0.65;
/// Top-left of the packed block as fractions of the canvas.
const PACK_ORIGIN: (f64, f64) = (0.18, 0.15);

const PAGE_WIDTH_FRACTION: f64 = 0.55;
const PAGE_MARGIN: f64 = 40.0;

/// Phase progress is `elapsed / ramp`, uncapped; the ramps are a little
/// shorter than the phases so pieces settle before the next phase starts.
const PACK_RAMP: f64 = 1100.0;
const MORPH_RAMP: f64 = 650.0;

const FILL: Rgba = Rgba::WHITE.with_alpha(0.25);
const FILL_ALPHA: f64 = 0.8;
const ICON_LABEL: &str = "PDF";
const ICON_FONT: &str = "bold 30px system-ui";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Scatter,
    Pack,
    Morph,
    /// Terminal; never left once entered.
    Icon,
}

impl Phase {
    /// How long the phase lasts; `None` for the terminal phase.
    pub fn duration(self) -> Option<f64> {
        match self {
            Self::Scatter => Some(1200.0),
            Self::Pack => Some(1200.0),
            Self::Morph => Some(700.0),
            Self::Icon => None,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Scatter => Self::Pack,
            Self::Pack => Self::Morph,
            Self::Morph | Self::Icon => Self::Icon,
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    origin: DVec2,
    size: DVec2,
    packed: Rect,
}

impl Piece {
    /// Centre of the piece in the scatter phase.
    pub fn origin(&self) -> DVec2 {
        self.origin
    }

    pub fn size(&self) -> DVec2 {
        self.size
    }

    /// Slot assigned by the row packer.
    pub fn packed(&self) -> Rect {
        self.packed
    }
}

/// Output of [`pack_rows`].
#[derive(Debug, Clone, PartialEq)]
pub struct PackedLayout {
    pub slots: Vec<Rect>,
    /// Height of the packed block from its top edge to the bottom of the last row.
    pub total_height: f64,
}

/// Greedy row fill: place boxes left to right starting at `origin`, wrapping
/// to a new row whenever the next box would push the row past `max_row_width`.
pub fn pack_rows(sizes: &[DVec2], origin: DVec2, max_row_width: f64) -> PackedLayout {
    let mut slots = Vec::with_capacity(sizes.len());
    let (mut cx, mut cy, mut row_h) = (0.0_f64, 0.0_f64, 0.0_f64);
    for size in sizes {
        if cx + size.x > max_row_width {
            cx = 0.0;
            cy += row_h + PACK_PAD;
            row_h = 0.0;
        }
        slots.push(Rect::new(origin.x + cx, origin.y + cy, size.x, size.y));
        cx += size.x + PACK_PAD;
        row_h = row_h.max(size.y);
    }
    PackedLayout {
        slots,
        total_height: cy + row_h,
    }
}

/// Random sizes and scatter positions for every piece.
pub fn scatter_pieces<R: Rng + ?Sized>(width: f64, height: f64, rng: &mut R) -> Vec<(DVec2, DVec2)> {
    (0..PIECE_COUNT)
        .map(|_| {
            let size = DVec2::new(
                uniform(rng, WIDTH_RANGE.0, WIDTH_RANGE.1),
                uniform(rng, HEIGHT_RANGE.0, HEIGHT_RANGE.1),
            );
            let origin = DVec2::new(
                uniform(rng, width * SCATTER_X.0, width * SCATTER_X.1),
                uniform(rng, height * SCATTER_Y.0, height * SCATTER_Y.1),
            );
            (origin, size)
        })
        .collect()
}

pub struct MorphScene {
    pieces: Vec<Piece>,
    width: f64,
    height: f64,
    total_packed_height: f64,
    phase: Phase,
    phase_elapsed: f64,
}

impl MorphScene {
    pub fn new(width: f64, height: f64, mut rng: StdRng) -> Self {
        let scattered = scatter_pieces(width, height, &mut rng);
        let sizes: Vec<DVec2> = scattered.iter().map(|&(_, size)| size).collect();
        let layout = pack_rows(
            &sizes,
            DVec2::new(width * PACK_ORIGIN.0, height * PACK_ORIGIN.1),
            width * MAX_ROW_FRACTION,
        );
        let pieces = scattered
            .into_iter()
            .zip(layout.slots)
            .map(|((origin, size), packed)| Piece { origin, size, packed })
            .collect();
        Self {
            pieces,
            width,
            height,
            total_packed_height: layout.total_height,
            phase: Phase::Scatter,
            phase_elapsed: 0.0,
        }
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn phase_elapsed(&self) -> f64 {
        self.phase_elapsed
    }

    pub fn total_packed_height(&self) -> f64 {
        self.total_packed_height
    }

    /// The page the pieces morph into, centred on the canvas.
    pub fn page_rect(&self) -> Rect {
        Rect::from_center(
            DVec2::new(self.width * 0.5, self.height * 0.5),
            DVec2::new(self.width * PAGE_WIDTH_FRACTION, self.total_packed_height + PAGE_MARGIN),
        )
    }

    /// Where `piece` is drawn at the current phase and time.
    pub fn piece_rect(&self, piece: &Piece) -> Rect {
        match self.phase {
            Phase::Scatter => Rect::from_center(piece.origin, piece.size),
            Phase::Pack => {
                let t = self.phase_elapsed / PACK_RAMP;
                Rect::from_center(piece.origin.lerp(piece.packed.center(), t), piece.size)
            }
            Phase::Morph => {
                let t = self.phase_elapsed / MORPH_RAMP;
                let page = self.page_rect();
                Rect::from_center(
                    piece.packed.center().lerp(page.center(), t),
                    DVec2::new(lerp(piece.size.x, page.w, t), lerp(piece.size.y, page.h, t)),
                )
            }
            Phase::Icon => self.page_rect(),
        }
    }
}

impl Scene for MorphScene {
    fn update(&mut self, dt: f64) {
        self.phase_elapsed += dt;
        if let Some(duration) = self.phase.duration() {
            if self.phase_elapsed > duration {
                let next = self.phase.next();
                log::debug!("morph phase {:?} -> {:?}", self.phase, next);
                self.phase = next;
                self.phase_elapsed = 0.0;
            }
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        for piece in &self.pieces {
            let rect = self.piece_rect(piece);
            let center = rect.center();
            surface.save();
            surface.translate(center.x, center.y);
            surface.set_alpha(FILL_ALPHA);
            surface.fill_rect(Rect::from_center(DVec2::ZERO, DVec2::new(rect.w, rect.h)), FILL);
            surface.restore();
        }

        if self.phase == Phase::Icon {
            let page = self.page_rect();
            let center = page.center();
            surface.save();
            surface.translate(center.x, center.y);
            surface.stroke_rect(
                Rect::from_center(DVec2::ZERO, DVec2::new(page.w, page.h)),
                Rgba::WHITE.with_alpha(0.8),
                3.0,
            );
            surface.fill_text_centered(ICON_LABEL, 0.0, 0.0, ICON_FONT, Rgba::WHITE.with_alpha(0.85));
            surface.restore();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use rand::SeedableRng;

    fn scene(seed: u64) -> MorphScene {
        MorphScene::new(320.0, 220.0, StdRng::seed_from_u64(seed))
    }

    #[test]
    fn builds_28_pieces_in_scatter_region() {
        let s = scene(1);
        assert_eq!(s.pieces().len(), PIECE_COUNT);
        for p in s.pieces() {
            assert!((24.0..70.0).contains(&p.size().x));
            assert!((22.0..60.0).contains(&p.size().y));
            assert!((32.0..288.0).contains(&p.origin().x));
            assert!((44.0..176.0).contains(&p.origin().y));
        }
    }

    #[test]
    fn pack_rows_wraps_at_max_width() {
        let sizes = [DVec2::new(100.0, 10.0), DVec2::new(100.0, 20.0), DVec2::new(100.0, 5.0)];
        let layout = pack_rows(&sizes, DVec2::new(10.0, 10.0), 250.0);
        assert_eq!(layout.slots[0], Rect::new(10.0, 10.0, 100.0, 10.0));
        assert_eq!(layout.slots[1], Rect::new(113.0, 10.0, 100.0, 20.0));
        assert_eq!(layout.slots[2], Rect::new(10.0, 33.0, 100.0, 5.0));
        assert_eq!(layout.total_height, 28.0);
    }

    #[test]
    fn packed_slots_never_overlap_or_overflow_rows() {
        for seed in 0..100 {
            let s = scene(seed);
            let origin_x = 320.0 * PACK_ORIGIN.0;
            let max_w = 320.0 * MAX_ROW_FRACTION;
            let slots: Vec<Rect> = s.pieces().iter().map(Piece::packed).collect();
            for (i, a) in slots.iter().enumerate() {
                assert!(a.right() - origin_x <= max_w + 1e-9, "seed {seed}: {a:?}");
                for b in &slots[i + 1..] {
                    assert!(!a.overlaps(b), "seed {seed}: {a:?} overlaps {b:?}");
                }
            }
            let bottom = slots.iter().map(Rect::bottom).fold(0.0, f64::max);
            assert!((s.total_packed_height() - (bottom - 220.0 * PACK_ORIGIN.1)).abs() < 1e-9);
        }
    }

    #[test]
    fn phases_advance_in_order_and_stick() {
        let mut s = scene(2);
        s.update(1201.0);
        assert_eq!(s.phase(), Phase::Pack);
        assert_eq!(s.phase_elapsed(), 0.0);
        s.update(1201.0);
        assert_eq!(s.phase(), Phase::Morph);
        s.update(701.0);
        assert_eq!(s.phase(), Phase::Icon);
        for _ in 0..100 {
            s.update(1000.0);
            assert_eq!(s.phase(), Phase::Icon);
        }
        assert_eq!(s.phase_elapsed(), 100_000.0);
    }

    #[test]
    fn one_transition_per_frame() {
        let mut s = scene(2);
        s.update(10_000.0);
        assert_eq!(s.phase(), Phase::Pack);
    }

    #[test]
    fn pack_starts_at_origin_and_reaches_slot() {
        let mut s = scene(4);
        s.update(1201.0);
        let p = s.pieces()[0].clone();
        assert!(s.piece_rect(&p).center().distance(p.origin()) < 1e-9);
        s.update(1100.0);
        assert!(s.piece_rect(&p).center().distance(p.packed().center()) < 1e-9);
    }

    #[test]
    fn morph_converges_on_page() {
        let mut s = scene(6);
        s.update(1201.0);
        s.update(1201.0);
        assert_eq!(s.phase(), Phase::Morph);
        let p = s.pieces()[3].clone();
        assert!(s.piece_rect(&p).center().distance(p.packed().center()) < 1e-9);
        s.update(650.0);
        let r = s.piece_rect(&p);
        let page = s.page_rect();
        assert!((r.w - page.w).abs() < 1e-9 && (r.h - page.h).abs() < 1e-9);
        assert!(r.center().distance(page.center()) < 1e-9);
    }

    #[test]
    fn icon_draws_label_only_in_terminal_phase() {
        let mut s = scene(9);
        let mut surface = RecordingSurface::new(320.0, 220.0);
        s.render(&mut surface);
        assert_eq!(surface.fills().count(), PIECE_COUNT);
        assert_eq!(surface.texts().count(), 0);

        s.update(1201.0);
        s.update(1201.0);
        s.update(701.0);
        let mut surface = RecordingSurface::new(320.0, 220.0);
        s.render(&mut surface);
        assert_eq!(surface.texts().collect::<Vec<_>>(), vec!["PDF"]);
        let page = s.page_rect();
        assert!(surface
            .fills()
            .all(|(r, _)| (r.w - page.w).abs() < 1e-9 && (r.h - page.h).abs() < 1e-9));
        assert!((page.w - 320.0 * 0.55).abs() < 1e-9);
        assert!((page.h - (s.total_packed_height() + 40.0)).abs() < 1e-9);
    }
}
