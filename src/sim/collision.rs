//! Collision detection and response for axis-aligned rectangles
//!
//! Detection is a strict AABB overlap plus a face classification that says
//! which side(s) of a platform the moving body ran into. Response works in
//! two passes: every overlapping platform is first collected as a contact
//! resolved along its shallowest reported face, then contacts are applied
//! vertical-first in platform declaration order. Applying contacts one at a
//! time in list order (and snapping on whichever face happened to be tested
//! first) made stacked or adjacent platforms order-dependent.

use glam::Vec2;

use super::rect::{Bounds, Rect, Size};

/// Faces of an obstacle struck by a moving body (several may be set at once)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Faces {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Faces {
    pub const ALL: Faces = Faces {
        top: true,
        bottom: true,
        left: true,
        right: true,
    };

    pub fn any(&self) -> bool {
        self.top || self.bottom || self.left || self.right
    }

    fn contains(&self, face: Face) -> bool {
        match face {
            Face::Top => self.top,
            Face::Bottom => self.bottom,
            Face::Left => self.left,
            Face::Right => self.right,
        }
    }
}

/// A single face of an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Top,
    Bottom,
    Left,
    Right,
}

impl Face {
    /// Tie-break order: vertical before horizontal
    const PRIORITY: [Face; 4] = [Face::Top, Face::Bottom, Face::Left, Face::Right];

    #[inline]
    pub fn is_vertical(self) -> bool {
        matches!(self, Face::Top | Face::Bottom)
    }

    /// How far `body` would have to move to clear this face of `obstacle`
    fn depth(self, body: &Rect, obstacle: &Rect) -> f32 {
        match self {
            Face::Top => body.bottom() - obstacle.top(),
            Face::Bottom => obstacle.bottom() - body.top(),
            Face::Left => body.right() - obstacle.left(),
            Face::Right => obstacle.right() - body.left(),
        }
    }
}

/// Strict AABB overlap: touching edges with zero-width overlap don't collide
#[inline]
pub fn overlap(a: &Rect, b: &Rect) -> bool {
    a.overlaps_x(b) && a.overlaps_y(b)
}

/// Classify which faces of `b` the moving rectangle `a` struck.
///
/// Only meaningful when [`overlap`] is true. Compares each leading edge of
/// `a` with the matching edge of `b` without any tolerance.
pub fn classify(a: &Rect, b: &Rect) -> Faces {
    Faces {
        top: a.bottom() >= b.top() && a.top() < b.top(),
        bottom: a.top() <= b.bottom() && a.bottom() > b.bottom(),
        left: a.right() >= b.left() && a.left() < b.left(),
        right: a.left() <= b.right() && a.right() > b.right(),
    }
}

/// True if `entity` rests on top of `platform`: its bottom edge is within
/// `tolerance` of the platform top and the horizontal intervals overlap.
///
/// This is a proximity test, unlike [`overlap`]; it absorbs the one-tick gap
/// gravity opens between a resting body and its platform.
pub fn is_on_ground(entity: &Rect, platform: &Rect, tolerance: f32) -> bool {
    (entity.bottom() - platform.top()).abs() < tolerance && entity.overlaps_x(platform)
}

/// Shallowest face separating `body` from `obstacle`, among the faces
/// [`classify`] reports (all four when it reports none, i.e. the body is
/// buried inside the obstacle). Returns `None` when they don't overlap.
pub fn separating_face(body: &Rect, obstacle: &Rect) -> Option<(Face, f32)> {
    if !overlap(body, obstacle) {
        return None;
    }

    let faces = classify(body, obstacle);
    let faces = if faces.any() { faces } else { Faces::ALL };

    let mut best: Option<(Face, f32)> = None;
    for face in Face::PRIORITY {
        if !faces.contains(face) {
            continue;
        }
        let depth = face.depth(body, obstacle);
        // Strict comparison keeps the earlier (vertical) face on ties
        if best.is_none_or(|(_, d)| depth < d) {
            best = Some((face, depth));
        }
    }
    best
}

/// One body/obstacle contact found during the collection pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Index of the obstacle in declaration order
    pub index: usize,
    pub face: Face,
    pub depth: f32,
}

/// Collect every contact between `body` and `obstacles`, ordered for
/// resolution: vertical faces first, then declaration order.
pub fn collect_contacts<B: Bounds>(body: &Rect, obstacles: &[B]) -> Vec<Contact> {
    let mut contacts: Vec<Contact> = obstacles
        .iter()
        .enumerate()
        .filter_map(|(index, obstacle)| {
            separating_face(body, &obstacle.bounds()).map(|(face, depth)| Contact {
                index,
                face,
                depth,
            })
        })
        .collect();

    // Stable sort keeps declaration order within each group
    contacts.sort_by_key(|c| !c.face.is_vertical());
    contacts
}

/// Outcome of a resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactReport {
    /// Came to rest on top of something
    pub landed: bool,
    /// Hit the underside of something
    pub bumped_head: bool,
    /// Pushed out of a side
    pub blocked_left: bool,
    pub blocked_right: bool,
}

/// Push a body of `size` at `pos` out of every overlapping obstacle,
/// zeroing the velocity component along each resolved face.
pub fn resolve_contacts<B: Bounds>(
    pos: &mut Vec2,
    vel: &mut Vec2,
    size: Size,
    obstacles: &[B],
) -> ContactReport {
    let mut report = ContactReport::default();
    let contacts = collect_contacts(&Rect::from_pos_size(*pos, size), obstacles);

    for contact in contacts {
        let obstacle = obstacles[contact.index].bounds();
        // An earlier correction may already have cleared this obstacle
        if !overlap(&Rect::from_pos_size(*pos, size), &obstacle) {
            continue;
        }

        match contact.face {
            Face::Top => {
                pos.y = obstacle.top() - size.height;
                vel.y = 0.0;
                report.landed = true;
            }
            Face::Bottom => {
                pos.y = obstacle.bottom();
                vel.y = 0.0;
                report.bumped_head = true;
            }
            Face::Left => {
                pos.x = obstacle.left() - size.width;
                vel.x = 0.0;
                report.blocked_right = true;
            }
            Face::Right => {
                pos.x = obstacle.right();
                vel.x = 0.0;
                report.blocked_left = true;
            }
        }
    }

    report
}
