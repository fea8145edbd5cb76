//! Text overlays: the in-game top bar, the difficulty menu, and the end
//! screen. All layout is done in canvas coordinates (800x600) and scaled to
//! the physical surface so text stays put under any DPI factor.

use wgpu_text::glyph_brush::{HorizontalAlign, Layout, OwnedSection, Section, Text, VerticalAlign};

use crate::consts::{HEIGHT, LIVES, WIDTH};
use crate::session::SessionStats;

const LABEL_SIZE: f32 = 28.0;
const HEADING_SIZE: f32 = 64.0;
const PROMPT_SIZE: f32 = 32.0;

const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const CYAN: [f32; 4] = [0.0, 1.0, 1.0, 1.0];

/// Formats elapsed seconds as `MM:SS.D`. The seconds field is rounded to the
/// nearest tenth before truncation, so 59.96s displays as `:60` — same as
/// the original game.
pub fn format_time(secs: f32) -> String {
    let secs = secs as f64;
    let minutes = (secs / 60.0).floor() as u32;
    let seconds = ((secs % 60.0) * 10.0).round() as u32 / 10;
    let tenths = ((secs * 1000.0) as u64 % 1000) / 100;
    format!("{:02}:{:02}.{}", minutes, seconds, tenths)
}

/// Hits per second, rounded to one decimal. Zero before any time has passed.
pub fn speed(hits: u32, elapsed: f32) -> f32 {
    if elapsed > 0.0 {
        (hits as f32 / elapsed * 10.0).round() / 10.0
    } else {
        0.0
    }
}

/// Hit percentage over total clicks, rounded to one decimal. Zero when
/// nothing was clicked.
pub fn accuracy(hits: u32, clicks: u32) -> f32 {
    if clicks > 0 {
        (hits as f32 / clicks as f32 * 1000.0).round() / 10.0
    } else {
        0.0
    }
}

fn label(
    text: &str,
    size: f32,
    color: [f32; 4],
    (x, y): (f32, f32),
    h_align: HorizontalAlign,
    scale: f32,
) -> OwnedSection {
    Section::default()
        .add_text(Text::new(text).with_scale(size * scale).with_color(color))
        .with_bounds([WIDTH as f32 * scale, HEIGHT as f32 * scale])
        .with_layout(
            Layout::default()
                .v_align(VerticalAlign::Top)
                .h_align(h_align),
        )
        .with_screen_position((x * scale, y * scale))
        .to_owned()
}

fn centered(text: &str, size: f32, color: [f32; 4], y: f32, scale: f32) -> OwnedSection {
    label(
        text,
        size,
        color,
        (WIDTH as f32 / 2.0, y),
        HorizontalAlign::Center,
        scale,
    )
}

/// Labels for the in-game top bar: time, speed, hits, remaining lives.
pub fn top_bar_sections(elapsed: f32, hits: u32, misses: u32, scale: f32) -> Vec<OwnedSection> {
    let lives = LIVES.saturating_sub(misses);
    vec![
        label(
            &format!("Time : {}", format_time(elapsed)),
            LABEL_SIZE,
            BLACK,
            (5.0, 10.0),
            HorizontalAlign::Left,
            scale,
        ),
        label(
            &format!("Speed: {} t/s", speed(hits, elapsed)),
            LABEL_SIZE,
            BLACK,
            (250.0, 10.0),
            HorizontalAlign::Left,
            scale,
        ),
        label(
            &format!("Hits: {}", hits),
            LABEL_SIZE,
            BLACK,
            (500.0, 10.0),
            HorizontalAlign::Left,
            scale,
        ),
        label(
            &format!("Lives: {}", lives),
            LABEL_SIZE,
            BLACK,
            (700.0, 10.0),
            HorizontalAlign::Left,
            scale,
        ),
    ]
}

/// The difficulty menu.
pub fn menu_sections(scale: f32) -> Vec<OwnedSection> {
    vec![
        centered("Aim Trainer", HEADING_SIZE, CYAN, 150.0, scale),
        centered(
            "Press [E] for Easy, [M] for Medium, [H] for Hard",
            LABEL_SIZE,
            WHITE,
            300.0,
            scale,
        ),
    ]
}

/// The post-session summary.
pub fn end_sections(stats: &SessionStats, scale: f32) -> Vec<OwnedSection> {
    vec![
        centered(
            &format!("Time: {}", format_time(stats.elapsed)),
            LABEL_SIZE,
            WHITE,
            100.0,
            scale,
        ),
        centered(
            &format!("Speed: {} t/s", speed(stats.hits, stats.elapsed)),
            LABEL_SIZE,
            WHITE,
            175.0,
            scale,
        ),
        centered(
            &format!("Hits: {}", stats.hits),
            LABEL_SIZE,
            WHITE,
            250.0,
            scale,
        ),
        centered(
            &format!("Accuracy: {}%", accuracy(stats.hits, stats.clicks)),
            LABEL_SIZE,
            WHITE,
            325.0,
            scale,
        ),
        centered(
            "Press R to Restart or Press Q to Quit",
            PROMPT_SIZE,
            WHITE,
            500.0,
            scale,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_seconds_and_tenths() {
        assert_eq!(format_time(125.34), "02:05.3");
    }

    #[test]
    fn formats_zero() {
        assert_eq!(format_time(0.0), "00:00.0");
    }

    #[test]
    fn keeps_the_sixty_second_display_edge() {
        // 59.96 rounds up to 60.0 seconds in the seconds field.
        assert_eq!(format_time(59.96), "00:60.9");
    }

    #[test]
    fn speed_is_hits_per_second_to_one_decimal() {
        assert_eq!(speed(7, 10.0), 0.7);
        assert_eq!(speed(10, 3.0), 3.3);
    }

    #[test]
    fn speed_guards_division_by_zero() {
        assert_eq!(speed(5, 0.0), 0.0);
    }

    #[test]
    fn accuracy_is_hit_ratio_percentage() {
        assert_eq!(accuracy(5, 8), 62.5);
        assert_eq!(accuracy(1, 3), 33.3);
    }

    #[test]
    fn accuracy_guards_division_by_zero() {
        assert_eq!(accuracy(0, 0), 0.0);
    }

    #[test]
    fn lives_label_never_underflows() {
        // Two targets can decay on the same tick, pushing misses past the
        // life limit before the transition is observed.
        let sections = top_bar_sections(1.0, 0, LIVES + 1, 1.0);
        assert_eq!(sections.len(), 4);
    }
}
