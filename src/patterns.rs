//! Line pattern classification for five-in-a-row move generation.
//!
//! From every cell of the padded array, and in each of the four line
//! directions, the classifier walks outward building a marker string and looks
//! every prefix up in a fixed template table. Markers are read from the point
//! of view of the color being classified:
//!
//! - `x`: own stone
//! - `o`: opponent stone
//! - `.`: empty point
//! - `B`: border (padding)
//!
//! A template lists offsets counted back from the last marker of the string
//! (offset 0 is the last marker). Each offset names an empty point that
//! completes or blocks the shape.
//!
//! Templates are compiled once into a lookup table keyed by the packed marker
//! string, so a prefix lookup is a single hash probe.

use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use crate::board::{Board, Cell, Color, Point};
use crate::constants::{DIRECTIONS, PATTERN_MAX_LEN};

/// Move priority tiers, highest first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Win,
    BlockWin,
    MakeOpenFour,
    BlockOpenFour,
    MakeOpenThree,
    BlockOpenThree,
    ProximityFiller,
    AnyEmpty,
}

impl Tier {
    pub const ALL: [Tier; 8] = [
        Tier::Win,
        Tier::BlockWin,
        Tier::MakeOpenFour,
        Tier::BlockOpenFour,
        Tier::MakeOpenThree,
        Tier::BlockOpenThree,
        Tier::ProximityFiller,
        Tier::AnyEmpty,
    ];

    /// Name used by the `policy_moves` command.
    pub fn label(self) -> &'static str {
        match self {
            Tier::Win => "Win",
            Tier::BlockWin => "BlockWin",
            Tier::MakeOpenFour => "OpenFour",
            Tier::BlockOpenFour => "BlockOpenFour",
            Tier::MakeOpenThree => "OpenThree",
            Tier::BlockOpenThree => "BlockOpenThree",
            Tier::ProximityFiller => "Proximity",
            Tier::AnyEmpty => "Random",
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Template source, in tier priority order. Each entry is a marker string and
/// the offsets (from the last marker) of the points that realise the tier.
pub const PATTERN_TABLE: &[(Tier, &[(&str, &[usize])])] = &[
    (
        Tier::Win,
        &[
            ("xxxx.", &[0]),
            ("xxx.x", &[1]),
            ("xx.xx", &[2]),
            ("x.xxx", &[3]),
            (".xxxx", &[4]),
        ],
    ),
    (
        Tier::BlockWin,
        &[
            ("oooo.", &[0]),
            ("ooo.o", &[1]),
            ("oo.oo", &[2]),
            ("o.ooo", &[3]),
            (".oooo", &[4]),
        ],
    ),
    (
        Tier::MakeOpenFour,
        &[
            (".xxx..", &[1]),
            ("..xxx.", &[4]),
            (".xx.x.", &[2]),
            (".x.xx.", &[3]),
        ],
    ),
    (
        Tier::BlockOpenFour,
        &[
            (".ooo..", &[1, 5]),
            ("..ooo.", &[0, 4]),
            (".oo.o.", &[0, 2, 5]),
            (".o.oo.", &[0, 3, 5]),
            ("B.ooo..", &[0]),
            ("..ooo.B", &[6]),
            ("x.ooo..", &[0]),
            ("..ooo.x", &[6]),
        ],
    ),
    (
        Tier::MakeOpenThree,
        &[
            ("..xx..", &[1, 4]),
            (".x.x.", &[2]),
            (".xx...", &[2]),
            ("...xx.", &[3]),
        ],
    ),
    (
        Tier::BlockOpenThree,
        &[
            ("..oo..", &[1, 4]),
            (".o.o.", &[2]),
            (".oo...", &[2]),
            ("...oo.", &[3]),
        ],
    ),
];

/// A cell as seen from the color being classified.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
enum Marker {
    Empty = 0,
    Own = 1,
    Opp = 2,
    Border = 3,
}

impl Marker {
    fn from_cell(cell: Cell, color: Color) -> Marker {
        match cell {
            Cell::Empty => Marker::Empty,
            Cell::Stone(c) if c == color => Marker::Own,
            Cell::Stone(_) => Marker::Opp,
            Cell::Border => Marker::Border,
        }
    }

    fn from_char(ch: char) -> Marker {
        match ch {
            '.' => Marker::Empty,
            'x' => Marker::Own,
            'o' => Marker::Opp,
            'B' => Marker::Border,
            _ => panic!("invalid template marker {ch:?}"),
        }
    }
}

/// A marker string packed two bits per marker, plus its length.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
struct LineKey {
    bits: u32,
    len: u32,
}

impl LineKey {
    #[inline]
    fn push(&mut self, marker: Marker) {
        self.bits |= (marker as u32) << (2 * self.len);
        self.len += 1;
    }

    fn from_template(src: &str) -> LineKey {
        let mut key = LineKey::default();
        for ch in src.chars() {
            key.push(Marker::from_char(ch));
        }
        key
    }
}

type TemplateSet = HashMap<LineKey, (Tier, &'static [usize])>;

static TEMPLATES: OnceLock<TemplateSet> = OnceLock::new();

fn make_templates() -> TemplateSet {
    let mut set = TemplateSet::new();
    for &(tier, templates) in PATTERN_TABLE {
        for &(src, offsets) in templates {
            debug_assert!(src.len() <= PATTERN_MAX_LEN);
            // The first tier registering a string keeps it
            set.entry(LineKey::from_template(src))
                .or_insert((tier, offsets));
        }
    }
    set
}

/// Candidate moves grouped by tier.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TierMoves {
    tiers: [BTreeSet<Point>; 8],
}

impl TierMoves {
    /// Points in `tier`, ascending.
    pub fn get(&self, tier: Tier) -> &BTreeSet<Point> {
        &self.tiers[tier.index()]
    }

    pub fn contains(&self, tier: Tier, point: Point) -> bool {
        self.tiers[tier.index()].contains(&point)
    }

    /// The tier `point` ended up in, if it is an empty point.
    pub fn tier_of(&self, point: Point) -> Option<Tier> {
        Tier::ALL.into_iter().find(|&t| self.contains(t, point))
    }

    /// The highest non-empty tier among `tiers`.
    pub fn best_of(&self, tiers: &[Tier]) -> Option<(Tier, Vec<Point>)> {
        tiers
            .iter()
            .find(|&&t| !self.get(t).is_empty())
            .map(|&t| (t, self.get(t).iter().copied().collect()))
    }

    fn insert(&mut self, tier: Tier, point: Point) {
        self.tiers[tier.index()].insert(point);
    }

    /// Keep each point only in the highest tier it qualifies for.
    fn dedup_downward(&mut self) {
        let mut seen = BTreeSet::new();
        for set in &mut self.tiers {
            set.retain(|p| !seen.contains(p));
            seen.extend(set.iter().copied());
        }
    }
}

/// Classify every empty point of `board` from `color`'s point of view.
///
/// Own shapes land in the `Make*`/`Win` tiers and opponent shapes in the
/// `Block*` tiers. Points matching no template are split into
/// `ProximityFiller` (next to any stone) and `AnyEmpty`.
pub fn classify(board: &Board, color: Color) -> TierMoves {
    let templates = TEMPLATES.get_or_init(make_templates);
    let mut moves = TierMoves::default();
    let ns = board.stride() as isize;

    for anchor in 0..board.len() {
        for &(dx, dy) in &DIRECTIONS {
            // Every direction moves forward through the array
            let step = (dx + dy * ns) as usize;
            scan_line(board, color, anchor, step, templates, &mut moves);
        }
    }
    moves.dedup_downward();

    for pt in board.empty_points() {
        if moves.tier_of(pt).is_some() {
            continue;
        }
        let near_stone = board
            .adjacent_points(pt)
            .any(|nb| matches!(board.get_color(nb), Cell::Stone(_)));
        let tier = if near_stone {
            Tier::ProximityFiller
        } else {
            Tier::AnyEmpty
        };
        moves.insert(tier, pt);
    }
    moves
}

/// Walk one line from `anchor`, matching every prefix against the templates.
fn scan_line(
    board: &Board,
    color: Color,
    anchor: Point,
    step: usize,
    templates: &TemplateSet,
    moves: &mut TierMoves,
) {
    let mut key = LineKey::default();
    let mut pt = anchor;
    loop {
        if let Some(&(tier, offsets)) = templates.get(&key) {
            for &off in offsets {
                moves.insert(tier, pt - step * (off + 1));
            }
        }
        if pt >= board.len() || key.len as usize == PATTERN_MAX_LEN {
            break;
        }
        key.push(Marker::from_cell(board.get_color(pt), color));
        pt += step;
    }
}

/// Rule-based move list for the side to move: the first non-empty tier among
/// win, block-win, open-four, and block-open-four, or every empty point.
pub fn policy_moves(board: &Board) -> (Tier, Vec<Point>) {
    let moves = classify(board, board.current_player());
    moves
        .best_of(&[
            Tier::Win,
            Tier::BlockWin,
            Tier::MakeOpenFour,
            Tier::BlockOpenFour,
        ])
        .unwrap_or_else(|| (Tier::AnyEmpty, board.empty_points()))
}
