use ratatui::style::Color;
use ratatui::symbols::Marker;
use ratatui::text::Line as TextLine;
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line, Points, Rectangle};
use ratatui::widgets::{Block, Borders};

use crate::model::Location;
use crate::spatial::{PassVector, ShotPoint};

pub const PITCH_LENGTH: f64 = 120.0;
pub const PITCH_WIDTH: f64 = 80.0;

pub const PLAYER1_COLOR: Color = Color::Blue;
pub const PLAYER2_COLOR: Color = Color::Rgb(255, 165, 0);
pub const GOAL_COLOR: Color = Color::Green;
pub const MISS_COLOR: Color = Color::Red;
const LINE_COLOR: Color = Color::Gray;
const ARROW_HEAD_LEN: f64 = 2.0;
const ARROW_HEAD_SPREAD: f64 = 0.45;

pub struct PassLayer {
    pub vectors: Vec<PassVector>,
    pub color: Color,
}

/// StatsBomb y grows downwards, canvas y grows upwards.
pub fn to_canvas(loc: Location) -> (f64, f64) {
    (loc.x, PITCH_WIDTH - loc.y)
}

/// The two short strokes of an arrow head at `to`, in canvas space.
pub fn arrow_head(from: (f64, f64), to: (f64, f64)) -> [(f64, f64); 2] {
    let angle = (to.1 - from.1).atan2(to.0 - from.0);
    [angle + ARROW_HEAD_SPREAD, angle - ARROW_HEAD_SPREAD].map(|a| {
        (
            to.0 - ARROW_HEAD_LEN * a.cos(),
            to.1 - ARROW_HEAD_LEN * a.sin(),
        )
    })
}

pub fn draw_pitch(ctx: &mut Context<'_>) {
    let rect = |ctx: &mut Context<'_>, x: f64, y: f64, width: f64, height: f64| {
        ctx.draw(&Rectangle {
            x,
            y,
            width,
            height,
            color: LINE_COLOR,
        });
    };
    rect(ctx, 0.0, 0.0, PITCH_LENGTH, PITCH_WIDTH);
    // Penalty areas and six-yard boxes.
    rect(ctx, 0.0, 18.0, 18.0, 44.0);
    rect(ctx, PITCH_LENGTH - 18.0, 18.0, 18.0, 44.0);
    rect(ctx, 0.0, 30.0, 6.0, 20.0);
    rect(ctx, PITCH_LENGTH - 6.0, 30.0, 6.0, 20.0);

    let half = PITCH_LENGTH / 2.0;
    ctx.draw(&Line {
        x1: half,
        y1: 0.0,
        x2: half,
        y2: PITCH_WIDTH,
        color: LINE_COLOR,
    });
    ctx.draw(&Circle {
        x: half,
        y: PITCH_WIDTH / 2.0,
        radius: 10.0,
        color: LINE_COLOR,
    });
    ctx.draw(&Points {
        coords: &[(12.0, PITCH_WIDTH / 2.0), (PITCH_LENGTH - 12.0, PITCH_WIDTH / 2.0)],
        color: LINE_COLOR,
    });
}

pub fn draw_passes(ctx: &mut Context<'_>, vectors: &[PassVector], color: Color) {
    for v in vectors {
        let from = to_canvas(v.from);
        let to = to_canvas(v.to);
        ctx.draw(&Line {
            x1: from.0,
            y1: from.1,
            x2: to.0,
            y2: to.1,
            color,
        });
        for tip in arrow_head(from, to) {
            ctx.draw(&Line {
                x1: to.0,
                y1: to.1,
                x2: tip.0,
                y2: tip.1,
                color,
            });
        }
    }
}

pub fn draw_shots(ctx: &mut Context<'_>, points: &[ShotPoint]) {
    let (goals, misses): (Vec<_>, Vec<_>) = points
        .iter()
        .map(|p| (p.scored, to_canvas(p.at)))
        .partition(|(scored, _)| *scored);
    let misses: Vec<(f64, f64)> = misses.into_iter().map(|(_, c)| c).collect();
    let goals: Vec<(f64, f64)> = goals.into_iter().map(|(_, c)| c).collect();
    // Goals last so they stay visible on top of misses.
    ctx.draw(&Points {
        coords: &misses,
        color: MISS_COLOR,
    });
    for (x, y) in &goals {
        ctx.draw(&Circle {
            x: *x,
            y: *y,
            radius: 1.2,
            color: GOAL_COLOR,
        });
    }
    ctx.draw(&Points {
        coords: &goals,
        color: GOAL_COLOR,
    });
}

fn pitch_canvas<'a, F>(title: TextLine<'a>, paint: F) -> Canvas<'a, F>
where
    F: Fn(&mut Context<'_>),
{
    Canvas::default()
        .block(Block::default().title(title).borders(Borders::ALL))
        .marker(Marker::Braille)
        .x_bounds([0.0, PITCH_LENGTH])
        .y_bounds([0.0, PITCH_WIDTH])
        .paint(paint)
}

pub fn pass_map<'a>(
    title: TextLine<'a>,
    layers: &'a [PassLayer],
) -> Canvas<'a, impl Fn(&mut Context<'_>) + 'a> {
    pitch_canvas(title, move |ctx| {
        draw_pitch(ctx);
        ctx.layer();
        for layer in layers {
            draw_passes(ctx, &layer.vectors, layer.color);
        }
    })
}

pub fn shot_map<'a>(
    title: TextLine<'a>,
    points: &'a [ShotPoint],
) -> Canvas<'a, impl Fn(&mut Context<'_>) + 'a> {
    pitch_canvas(title, move |ctx| {
        draw_pitch(ctx);
        ctx.layer();
        draw_shots(ctx, points);
    })
}
