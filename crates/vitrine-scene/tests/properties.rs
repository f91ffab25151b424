use glam::Vec2;
use vitrine_engine::coords::{Camera, Viewport};
use vitrine_scene::breakpoint::{Breakpoint, MOBILE_MAX_WIDTH, TABLET_MAX_WIDTH};
use vitrine_scene::gallery::{SELECTED_FILL, Selection, base_scale, fit_within};
use vitrine_scene::nav::label_offsets;
use vitrine_scene::title::{Title, opacity};
use vitrine_scene::{FrameInput, scroll::ScrollState};

// ── breakpoints ───────────────────────────────────────────────────────────

#[test]
fn breakpoint_is_a_function_of_width() {
    let mut w = 0.0;
    while w <= 2560.0 {
        let bp = Breakpoint::from_width(w);
        assert_eq!(bp, Breakpoint::from_width(w));
        let expected = if w <= MOBILE_MAX_WIDTH {
            Breakpoint::Mobile
        } else if w <= TABLET_MAX_WIDTH {
            Breakpoint::Tablet
        } else {
            Breakpoint::Desktop
        };
        assert_eq!(bp, expected, "width {w}");
        w += 0.5;
    }
}

// ── selection ─────────────────────────────────────────────────────────────

#[derive(Copy, Clone)]
enum Event {
    Image(usize),
    Background,
    Escape,
}

#[test]
fn at_most_one_image_is_selected() {
    use Event::*;
    let script = [
        Image(0), Image(3), Image(3), Image(1), Background, Image(2), Escape,
        Image(4), Image(4), Image(4), Image(0), Background, Background, Image(1),
    ];

    let mut selection = Selection::default();
    let mut model: Option<usize> = None;
    for ev in script {
        match ev {
            Image(i) => {
                selection.toggle(i);
                model = if model == Some(i) { None } else { Some(i) };
            }
            Background | Escape => {
                selection.clear();
                model = None;
            }
        }
        assert_eq!(selection.get(), model);
        let selected = (0..5).filter(|&i| selection.is_selected(i)).count();
        assert!(selected <= 1);
    }
}

#[test]
fn reclicking_selected_image_deselects() {
    for i in 0..8 {
        let mut s = Selection::default();
        s.toggle(i);
        assert_eq!(s.get(), Some(i));
        s.toggle(i);
        assert_eq!(s.get(), None);
    }
}

// ── nav labels ────────────────────────────────────────────────────────────

#[test]
fn label_offsets_are_centered() {
    for n in 1..=12 {
        for spacing in [0.2, 0.24, 0.3, 1.0] {
            let xs = label_offsets(n, spacing);
            assert_eq!(xs.len(), n);
            let sum: f32 = xs.iter().sum();
            assert!(sum.abs() < 1e-4, "n={n} spacing={spacing} sum={sum}");
            for pair in xs.windows(2) {
                assert!((pair[1] - pair[0] - spacing).abs() < 1e-5);
            }
        }
    }
}

// ── image scale ───────────────────────────────────────────────────────────

#[test]
fn base_scale_never_exceeds_viewport() {
    let viewports = [Viewport::new(9.36, 5.27), Viewport::new(2.9, 5.27), Viewport::new(0.5, 0.3)];
    let sizes = [None, Some(0.1), Some(1.0), Some(3.0), Some(40.0)];
    for v in viewports {
        for aspect in [0.2, 9.0 / 16.0, 1.0, 16.0 / 9.0, 5.0] {
            for w in sizes {
                for h in sizes {
                    let s = base_scale(aspect, w, h, v);
                    assert!(s.x <= v.width + 1e-4 && s.y <= v.height + 1e-4, "{s:?} in {v:?}");
                    assert!((s.x / s.y - aspect).abs() < 1e-3 * aspect.max(1.0));
                }
            }
        }
    }
}

#[test]
fn selected_clamp_preserves_aspect() {
    let camera = Camera::default();
    let v = camera.viewport_at(11.0, 16.0 / 9.0);
    let max = Vec2::new(v.width, v.height) * SELECTED_FILL;
    for aspect in [16.0 / 9.0, 1.0, 9.0 / 16.0] {
        let big = Vec2::new(20.0 * aspect, 20.0);
        let fitted = fit_within(big, max);
        assert!((fitted.x / fitted.y - aspect).abs() < 1e-4, "aspect {aspect}");
        assert!(fitted.x <= max.x + 1e-4 && fitted.y <= max.y + 1e-4);
        assert!((fitted.x - max.x).abs() < 1e-4 || (fitted.y - max.y).abs() < 1e-4);
    }
}

// ── title ─────────────────────────────────────────────────────────────────

#[test]
fn title_fades_over_first_quarter() {
    assert_eq!(opacity(0.0), 1.0);
    assert_eq!(opacity(0.25), 0.0);

    let title = Title::new("Vitrine");
    for offset in [0.26, 0.5, 0.75, 1.0] {
        assert_eq!(opacity(offset), 0.0);
        let input = FrameInput::new(
            0.016,
            0.0,
            Vec2::ZERO,
            ScrollState::new(offset, 3.0),
            Camera::default(),
            Vec2::new(1280.0, 720.0),
        );
        assert!(!title.state(&input, false).visible);
    }

    let mut prev = opacity(0.0);
    for step in 1..=100 {
        let o = opacity(step as f32 / 100.0);
        assert!(o <= prev);
        prev = o;
    }
}
