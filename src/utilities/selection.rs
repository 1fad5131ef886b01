/// ----- CARRIER SELECTION -----
/// Stateless ranking of the carriers eligible for one request. Every
/// candidate gets a key (tier, score, roster order); the smallest key wins.
///
/// 1. Idle carriers with nobody aboard, nearest to the start floor first.
/// 2. Carriers already heading the passenger's way with room to spare and
///    not yet past the destination, first in roster order.
/// 3. Everyone else, most remaining capacity first.

use std::fmt;

use shared_resources::direction::Direction;
use shared_resources::request::Request;

/// What the scheduler knows about one eligible carrier for this decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub carrier_id: &'a str,
    pub floor: i32,
    pub direction: Direction,
    pub occupants: u32,
    pub remaining_capacity: u32,
}

impl Candidate<'_> {
    pub fn is_idle_empty(&self) -> bool {
        self.direction == Direction::Idle && self.occupants == 0
    }

    pub fn distance_to(&self, floor: i32) -> u32 {
        self.floor.abs_diff(floor)
    }

    /// Moving the passenger's way, has room, and has not passed the end floor.
    pub fn is_heading_towards(&self, request: &Request) -> bool {
        let wanted = request.direction();
        if self.remaining_capacity == 0 || self.direction != wanted {
            return false;
        }
        match wanted {
            Direction::Ascending => self.floor < request.end_floor,
            Direction::Descending => self.floor > request.end_floor,
            Direction::Idle => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    NearestIdle,
    SameDirection,
    MostCapacity,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::NearestIdle => f.write_str("nearest idle carrier"),
            Tier::SameDirection => f.write_str("carrier already heading that way"),
            Tier::MostCapacity => f.write_str("carrier with most free places"),
        }
    }
}

/// Ordering key: lower is better. `order` is the candidate's position in
/// roster order and breaks every remaining tie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RankKey {
    pub tier: Tier,
    pub score: i64,
    pub order: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranked<'c, 'a> {
    pub candidate: &'c Candidate<'a>,
    pub key: RankKey,
}

pub fn rank_key(request: &Request, candidate: &Candidate, order: usize) -> RankKey {
    let (tier, score) = if candidate.is_idle_empty() {
        (Tier::NearestIdle, i64::from(candidate.distance_to(request.start_floor)))
    } else if candidate.is_heading_towards(request) {
        (Tier::SameDirection, 0)
    } else {
        (Tier::MostCapacity, -i64::from(candidate.remaining_capacity))
    };
    RankKey { tier, score, order }
}

fn keyed<'r, 'c, 'a>(
    request: &'r Request,
    candidates: &'c [Candidate<'a>],
) -> impl Iterator<Item = Ranked<'c, 'a>> + 'r
where
    'c: 'r,
    'a: 'r,
{
    candidates
        .iter()
        .enumerate()
        .map(move |(order, candidate)| Ranked {
            candidate,
            key: rank_key(request, candidate, order),
        })
}

/// All candidates, best first. `candidates` must be in roster order.
pub fn rank<'c, 'a>(request: &Request, candidates: &'c [Candidate<'a>]) -> Vec<Ranked<'c, 'a>> {
    let mut ranked: Vec<Ranked> = keyed(request, candidates).collect();
    ranked.sort_by_key(|r| r.key);
    ranked
}

/// The winning candidate, or `None` if there are no candidates.
pub fn select<'c, 'a>(
    request: &Request,
    candidates: &'c [Candidate<'a>],
) -> Option<Ranked<'c, 'a>> {
    keyed(request, candidates).min_by_key(|r| r.key)
}
