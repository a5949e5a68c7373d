use std::f64::consts::FRAC_PI_2;

use kurbo::{Point, Vec2};

/// The 16 pen colors, as `0xRRGGBBAA`.
pub const PALETTE: [u32; 16] = [
    0x000000ff, // black
    0x0000ffff, // blue
    0x00ffffff, // cyan
    0x00ff00ff, // green
    0xff0000ff, // red
    0xff00ffff, // magenta
    0xffff00ff, // yellow
    0xffffffff, // white
    0xa52a2aff, // brown
    0xd2b48cff, // tan
    0x228b22ff, // forest
    0x7fffd4ff, // aqua
    0xfa8072ff, // salmon
    0x800080ff, // purple
    0xffa500ff, // orange
    0x808080ff, // grey
];

pub const DEFAULT_COLOR: usize = 7;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MoveCmd {
    PenUp,
    PenDown,
    Forward,
    Back,
    Left,
    Right,
    Turn,
    SetHeading,
    SetX,
    SetY,
}

impl MoveCmd {
    pub fn name(&self) -> &'static str {
        match self {
            MoveCmd::PenUp => "penup",
            MoveCmd::PenDown => "pendown",
            MoveCmd::Forward => "forward",
            MoveCmd::Back => "back",
            MoveCmd::Left => "left",
            MoveCmd::Right => "right",
            MoveCmd::Turn => "turn",
            MoveCmd::SetHeading => "setheading",
            MoveCmd::SetX => "setx",
            MoveCmd::SetY => "sety",
        }
    }

    /// Does this command need an amount?
    pub fn takes_amount(&self) -> bool {
        !matches!(self, MoveCmd::PenUp | MoveCmd::PenDown)
    }
}

/// Receives the lines drawn by the turtle.
pub trait Canvas {
    fn draw_segment(&mut self, start: (f32, f32), end: (f32, f32), color: u32);
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    pub start: (f32, f32),
    pub end: (f32, f32),
    pub color: u32,
}

impl Canvas for Vec<Segment> {
    fn draw_segment(&mut self, start: (f32, f32), end: (f32, f32), color: u32) {
        self.push(Segment { start, end, color });
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PenState {
    pub pos: Point,
    /// In degrees. Never normalized, so `turn 720` leaves 720 here.
    pub heading: f64,
    pub down: bool,
    /// Index into [`PALETTE`].
    pub color: usize,
}

impl Default for PenState {
    fn default() -> PenState {
        PenState {
            pos: Point::new(1.0, 0.0),
            heading: 0.0,
            down: false,
            color: DEFAULT_COLOR,
        }
    }
}

fn to_f32(p: Point) -> (f32, f32) {
    (p.x as f32, p.y as f32)
}

impl PenState {
    pub fn rgba(&self) -> u32 {
        PALETTE[self.color]
    }

    /// The offset that moving by `amount` in the direction of `cmd` would produce.
    ///
    /// `left` and `right` move sideways (a quarter turn from the heading) without changing the
    /// heading. Commands that don't move the turtle give a zero offset.
    pub fn displacement(&self, cmd: MoveCmd, amount: f64) -> Vec2 {
        let angle = self.heading.to_radians();
        let dir = match cmd {
            MoveCmd::Forward => Vec2::from_angle(angle),
            MoveCmd::Back => -Vec2::from_angle(angle),
            MoveCmd::Left => Vec2::from_angle(angle + FRAC_PI_2),
            MoveCmd::Right => Vec2::from_angle(angle - FRAC_PI_2),
            _ => Vec2::ZERO,
        };
        dir * amount
    }

    /// Apply a movement command, drawing onto `canvas` if the pen is down.
    ///
    /// `amount` is ignored by `penup` and `pendown`. Returns the segment that was drawn, if any.
    pub fn apply(
        &mut self,
        cmd: MoveCmd,
        amount: f64,
        canvas: &mut dyn Canvas,
    ) -> Option<Segment> {
        match cmd {
            MoveCmd::PenUp => self.down = false,
            MoveCmd::PenDown => self.down = true,
            MoveCmd::Forward | MoveCmd::Back | MoveCmd::Left | MoveCmd::Right => {
                let new_pos = self.pos + self.displacement(cmd, amount);
                let drawn = self.down.then(|| Segment {
                    start: to_f32(self.pos),
                    end: to_f32(new_pos),
                    color: self.rgba(),
                });
                if let Some(seg) = drawn {
                    log::debug!("drawing {:?} -> {:?}", seg.start, seg.end);
                    canvas.draw_segment(seg.start, seg.end, seg.color);
                }
                self.pos = new_pos;
                return drawn;
            }
            MoveCmd::Turn => self.heading += amount,
            MoveCmd::SetHeading => self.heading = amount,
            MoveCmd::SetX => self.pos.x = amount,
            MoveCmd::SetY => self.pos.y = amount,
        }
        None
    }
}

/// Convert a requested pen color into a palette index.
pub fn palette_index(x: f64) -> Option<usize> {
    if x.trunc() == x && (0.0..PALETTE.len() as f64).contains(&x) {
        Some(x as usize)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(p: Point, x: f64, y: f64) {
        assert!((p.x - x).abs() < 1e-9 && (p.y - y).abs() < 1e-9, "{p:?} != ({x}, {y})");
    }

    #[test]
    fn forward_and_back_cancel() {
        let mut pen = PenState::default();
        let mut out = Vec::new();
        pen.apply(MoveCmd::Forward, 10.0, &mut out);
        pen.apply(MoveCmd::Back, 10.0, &mut out);
        assert_approx(pen.pos, 1.0, 0.0);
        assert!(out.is_empty());
    }

    #[test]
    fn pen_down_draws_once() {
        let mut pen = PenState::default();
        let mut out = Vec::new();
        pen.apply(MoveCmd::PenDown, 0.0, &mut out);
        assert!(out.is_empty());
        let seg = pen.apply(MoveCmd::Forward, 5.0, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(seg, Some(out[0]));
        assert_eq!(out[0].start, (1.0, 0.0));
        assert_eq!(out[0].end, (6.0, 0.0));
        assert_eq!(out[0].color, PALETTE[DEFAULT_COLOR]);

        pen.apply(MoveCmd::PenUp, 0.0, &mut out);
        assert_eq!(pen.apply(MoveCmd::Forward, 5.0, &mut out), None);
        assert_eq!(out.len(), 1);
        assert_approx(pen.pos, 11.0, 0.0);
    }

    #[test]
    fn sideways_is_a_quarter_turn() {
        let mut pen = PenState::default();
        let mut out = Vec::new();
        pen.apply(MoveCmd::Left, 1.0, &mut out);
        assert_approx(pen.pos, 1.0, 1.0);
        pen.apply(MoveCmd::Right, 2.0, &mut out);
        assert_approx(pen.pos, 1.0, -1.0);
        assert_eq!(pen.heading, 0.0);

        pen.heading = 90.0;
        pen.apply(MoveCmd::Left, 1.0, &mut out);
        assert_approx(pen.pos, 0.0, -1.0);
    }

    #[test]
    fn turn_is_not_normalized() {
        let mut pen = PenState::default();
        let mut out = Vec::new();
        pen.apply(MoveCmd::Turn, 270.0, &mut out);
        pen.apply(MoveCmd::Turn, 180.0, &mut out);
        assert_eq!(pen.heading, 450.0);
        pen.apply(MoveCmd::Forward, 2.0, &mut out);
        assert_approx(pen.pos, 1.0, 2.0);

        pen.apply(MoveCmd::SetHeading, -90.0, &mut out);
        pen.apply(MoveCmd::SetX, 3.0, &mut out);
        pen.apply(MoveCmd::SetY, 4.0, &mut out);
        assert_eq!(pen.heading, -90.0);
        assert_eq!(pen.pos, Point::new(3.0, 4.0));
        assert!(out.is_empty());
    }

    #[test]
    fn palette_indices() {
        assert_eq!(palette_index(0.0), Some(0));
        assert_eq!(palette_index(15.0), Some(15));
        assert_eq!(palette_index(16.0), None);
        assert_eq!(palette_index(-1.0), None);
        assert_eq!(palette_index(2.5), None);
        assert_eq!(palette_index(f64::NAN), None);
    }
}
