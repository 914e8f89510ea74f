//! SVG path data grammar: command letters, argument groups, and normalization to absolute
//! [`PathSegment`]s.

use std::fmt::Write as _;

use crate::foundation::core::{Point, Vec2};
use crate::foundation::error::{DrawonError, DrawonResult};
use crate::path::lexer::Scanner;
use crate::path::segment::{ArcParameterization, ArcSegment, PathSegment};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CommandKind {
    MoveTo,
    LineTo,
    Horizontal,
    Vertical,
    Cubic,
    SmoothCubic,
    Quadratic,
    SmoothQuadratic,
    Arc,
    Close,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Command {
    pub(crate) kind: CommandKind,
    pub(crate) relative: bool,
}

impl Command {
    pub(crate) fn from_letter(letter: char) -> Option<Self> {
        let kind = match letter.to_ascii_uppercase() {
            'M' => CommandKind::MoveTo,
            'L' => CommandKind::LineTo,
            'H' => CommandKind::Horizontal,
            'V' => CommandKind::Vertical,
            'C' => CommandKind::Cubic,
            'S' => CommandKind::SmoothCubic,
            'Q' => CommandKind::Quadratic,
            'T' => CommandKind::SmoothQuadratic,
            'A' => CommandKind::Arc,
            'Z' => CommandKind::Close,
            _ => return None,
        };
        Some(Self {
            kind,
            relative: letter.is_ascii_lowercase(),
        })
    }

    /// The command an argument group without a letter stands for, given the previous command.
    ///
    /// Moveto repeats as lineto with the same relativity. Closepath takes no arguments, so a
    /// bare number after it has nothing to repeat.
    pub(crate) fn repeated(self) -> Option<Self> {
        match self.kind {
            CommandKind::Close => None,
            CommandKind::MoveTo => Some(Self {
                kind: CommandKind::LineTo,
                relative: self.relative,
            }),
            _ => Some(self),
        }
    }
}

/// Control point remembered for the smooth (`S`/`T`) reflection rule.
#[derive(Clone, Copy, Debug, PartialEq)]
enum LastControl {
    None,
    Cubic(Point),
    Quad(Point),
}

/// Accumulates absolute segments while tracking the current point and subpath start.
pub(crate) struct PathBuilder {
    segments: Vec<PathSegment>,
    current: Point,
    subpath_start: Point,
    last_control: LastControl,
    closed: bool,
}

impl PathBuilder {
    pub(crate) fn new() -> Self {
        Self {
            segments: Vec::new(),
            current: Point::ZERO,
            subpath_start: Point::ZERO,
            last_control: LastControl::None,
            closed: false,
        }
    }

    pub(crate) fn move_to(&mut self, to: Point) {
        self.segments.push(PathSegment::MoveTo { to });
        self.current = to;
        self.subpath_start = to;
        self.last_control = LastControl::None;
        self.closed = false;
    }

    /// A drawing command right after `Z` continues from the closed subpath's start.
    fn reopen(&mut self) {
        if self.closed {
            self.move_to(self.subpath_start);
        }
    }

    pub(crate) fn line_to(&mut self, to: Point) {
        self.reopen();
        self.segments.push(PathSegment::LineTo {
            from: self.current,
            to,
        });
        self.current = to;
        self.last_control = LastControl::None;
    }

    pub(crate) fn cubic_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) {
        self.reopen();
        self.segments.push(PathSegment::CubicCurve {
            from: self.current,
            ctrl1,
            ctrl2,
            to,
        });
        self.current = to;
        self.last_control = LastControl::Cubic(ctrl2);
    }

    pub(crate) fn quad_to(&mut self, ctrl: Point, to: Point) {
        self.reopen();
        self.segments.push(PathSegment::QuadraticCurve {
            from: self.current,
            ctrl,
            to,
        });
        self.current = to;
        self.last_control = LastControl::Quad(ctrl);
    }

    pub(crate) fn arc_to(
        &mut self,
        radii: Vec2,
        x_rotation_deg: f64,
        large_arc: bool,
        sweep: bool,
        to: Point,
    ) {
        self.reopen();
        let from = self.current;
        match ArcSegment::from_endpoints(from, to, radii, x_rotation_deg, large_arc, sweep) {
            ArcParameterization::Center(arc) => {
                self.segments.push(PathSegment::ArcTo(arc));
                self.current = to;
                self.last_control = LastControl::None;
            }
            ArcParameterization::LineTo => self.line_to(to),
            ArcParameterization::Omit => {
                self.last_control = LastControl::None;
            }
        }
    }

    /// First control point of a smooth curve: the reflection of the previous curve's last
    /// control point when it was of the same kind, else the current point.
    fn reflected(&self, cubic: bool) -> Point {
        match (self.last_control, cubic) {
            (LastControl::Cubic(c), true) | (LastControl::Quad(c), false) => {
                self.current + (self.current - c)
            }
            _ => self.current,
        }
    }

    /// Close the current subpath: a line back to its start when needed, then a `Close` marker.
    /// A second `Z` in a row is a no-op.
    pub(crate) fn close_subpath(&mut self) {
        if self.closed {
            return;
        }
        let start = self.subpath_start;
        if self.current != start {
            self.line_to(start);
        }
        self.segments.push(PathSegment::Close { to: start });
        self.current = start;
        self.last_control = LastControl::None;
        self.closed = true;
    }

    pub(crate) fn finish(self) -> Vec<PathSegment> {
        self.segments
    }

    fn point(&self, s: &mut Scanner<'_>, relative: bool) -> DrawonResult<Point> {
        let x = s.number()?;
        s.skip_comma_ws();
        let y = s.number()?;
        s.skip_comma_ws();
        Ok(if relative {
            Point::new(self.current.x + x, self.current.y + y)
        } else {
            Point::new(x, y)
        })
    }

    /// Consume one argument group for `cmd` and append the resulting segment(s).
    fn apply(&mut self, cmd: Command, s: &mut Scanner<'_>) -> DrawonResult<()> {
        let rel = cmd.relative;
        match cmd.kind {
            CommandKind::MoveTo => {
                let to = self.point(s, rel)?;
                self.move_to(to);
            }
            CommandKind::LineTo => {
                let to = self.point(s, rel)?;
                self.line_to(to);
            }
            CommandKind::Horizontal => {
                let x = s.number()?;
                s.skip_comma_ws();
                let x = if rel { self.current.x + x } else { x };
                self.line_to(Point::new(x, self.current.y));
            }
            CommandKind::Vertical => {
                let y = s.number()?;
                s.skip_comma_ws();
                let y = if rel { self.current.y + y } else { y };
                self.line_to(Point::new(self.current.x, y));
            }
            CommandKind::Cubic => {
                let c1 = self.point(s, rel)?;
                let c2 = self.point(s, rel)?;
                let to = self.point(s, rel)?;
                self.cubic_to(c1, c2, to);
            }
            CommandKind::SmoothCubic => {
                let c2 = self.point(s, rel)?;
                let to = self.point(s, rel)?;
                let c1 = self.reflected(true);
                self.cubic_to(c1, c2, to);
            }
            CommandKind::Quadratic => {
                let c = self.point(s, rel)?;
                let to = self.point(s, rel)?;
                self.quad_to(c, to);
            }
            CommandKind::SmoothQuadratic => {
                let to = self.point(s, rel)?;
                let c = self.reflected(false);
                self.quad_to(c, to);
            }
            CommandKind::Arc => {
                let rx = s.number()?;
                s.skip_comma_ws();
                let ry = s.number()?;
                s.skip_comma_ws();
                let rotation = s.number()?;
                s.skip_comma_ws();
                let large_arc = s.flag()?;
                s.skip_comma_ws();
                let sweep = s.flag()?;
                s.skip_comma_ws();
                let to = self.point(s, rel)?;
                self.arc_to(Vec2::new(rx, ry), rotation, large_arc, sweep, to);
            }
            CommandKind::Close => self.close_subpath(),
        }
        Ok(())
    }
}

/// Parse SVG path data into absolute segments.
///
/// The first segment is always a `MoveTo`. Errors carry the byte offset of the offending
/// token; callers that know the path id attach it with [`DrawonError::with_path_id`].
pub fn parse_path_data(d: &str) -> DrawonResult<Vec<PathSegment>> {
    let mut s = Scanner::new(d);
    if s.at_end() {
        return Err(DrawonError::malformed(0, "path data is empty"));
    }

    let mut builder = PathBuilder::new();
    let mut prev: Option<Command> = None;

    while !s.at_end() {
        let at = s.offset();
        let cmd = match s.letter() {
            Some((letter, at)) => Command::from_letter(letter).ok_or_else(|| {
                DrawonError::malformed(at, format!("unknown path command '{letter}'"))
            })?,
            None => match prev {
                Some(p) => p.repeated().ok_or_else(|| {
                    DrawonError::malformed(at, "expected a command letter after closepath")
                })?,
                None => {
                    return Err(DrawonError::malformed(
                        at,
                        "path data must begin with a moveto command",
                    ));
                }
            },
        };

        if prev.is_none() && cmd.kind != CommandKind::MoveTo {
            return Err(DrawonError::malformed(
                at,
                "path data must begin with a moveto command",
            ));
        }

        builder.apply(cmd, &mut s)?;
        s.skip_comma_ws();
        prev = Some(cmd);
    }

    Ok(builder.finish())
}

/// Serialize segments as absolute `M/L/C/Q/A/Z` path data.
///
/// Parsing the output yields the same absolute points.
pub fn segments_to_svg_d(segments: &[PathSegment]) -> String {
    let mut out = String::new();
    for seg in segments {
        if !out.is_empty() {
            out.push(' ');
        }
        // Writing into a String cannot fail.
        let _ = match seg {
            PathSegment::MoveTo { to } => write!(out, "M{} {}", to.x, to.y),
            PathSegment::LineTo { to, .. } => write!(out, "L{} {}", to.x, to.y),
            PathSegment::CubicCurve {
                ctrl1, ctrl2, to, ..
            } => write!(
                out,
                "C{} {} {} {} {} {}",
                ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y
            ),
            PathSegment::QuadraticCurve { ctrl, to, .. } => {
                write!(out, "Q{} {} {} {}", ctrl.x, ctrl.y, to.x, to.y)
            }
            PathSegment::ArcTo(arc) => write!(
                out,
                "A{} {} {} {} {} {} {}",
                arc.radii.x,
                arc.radii.y,
                arc.x_rotation_deg,
                u8::from(arc.large_arc),
                u8::from(arc.sweep),
                arc.to.x,
                arc.to.y
            ),
            PathSegment::Close { .. } => write!(out, "Z"),
        };
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/path/parser.rs"]
mod tests;
