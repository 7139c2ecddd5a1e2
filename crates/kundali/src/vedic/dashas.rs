//! Vimshottari dasha timeline.
//!
//! Dashas are time periods ruled by planets, anchored on the Moon's nakshatra
//! at birth. The 120-year cycle is split among nine lords; every period splits
//! again into nine in the same proportions, starting from its own lord.
//!
//! The tree is never built eagerly. `subdivide` produces one level on demand and
//! queries walk down by repeated scanning. Boundaries are integer milliseconds,
//! so children tile their parent exactly.

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::chart::data::Chart;
use crate::ephemeris::Body;
use crate::error::{KundaliError, Result};
use crate::vedic::nakshatra::{elapsed_fraction, nakshatra_pada};

pub const VIMSHOTTARI_TOTAL_YEARS: i64 = 120;
pub const VIMSHOTTARI_YEAR_DAYS: f64 = 365.25;
/// 365.25 days
pub const MILLIS_PER_YEAR: i64 = 31_557_600_000;
pub const CYCLE_MILLIS: i64 = VIMSHOTTARI_TOTAL_YEARS * MILLIS_PER_YEAR;
/// Deepest level a query may ask for.
pub const MAX_DEPTH: u8 = 4;

pub const VIMSHOTTARI_SEQUENCE: [(Body, i64); 9] = [
    (Body::Ketu, 7),
    (Body::Venus, 20),
    (Body::Sun, 6),
    (Body::Moon, 10),
    (Body::Mars, 7),
    (Body::Rahu, 18),
    (Body::Jupiter, 16),
    (Body::Saturn, 19),
    (Body::Mercury, 17),
];

// Position of each body (in `Body::ALL` order) inside the sequence.
const SEQUENCE_POSITION: [usize; 9] = [2, 3, 4, 8, 6, 1, 7, 5, 0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DashaLevel {
    Mahadasha,
    Antardasha,
    Paryantardasha,
    Sookshma,
    Prana,
}

const DEPTH_LEVELS: [DashaLevel; 5] = [
    DashaLevel::Mahadasha,
    DashaLevel::Antardasha,
    DashaLevel::Paryantardasha,
    DashaLevel::Sookshma,
    DashaLevel::Prana,
];

impl DashaLevel {
    pub fn from_depth(depth: u8) -> DashaLevel {
        DEPTH_LEVELS[(depth as usize).min(DEPTH_LEVELS.len() - 1)]
    }
}

pub fn lord_years(lord: Body) -> i64 {
    VIMSHOTTARI_SEQUENCE[SEQUENCE_POSITION[lord.index()]].1
}

/// One node of the period tree, covering `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodNode {
    pub lord: Body,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub depth: u8,
    pub level: DashaLevel,
}

impl PeriodNode {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_years(&self) -> f64 {
        self.duration().num_milliseconds() as f64 / MILLIS_PER_YEAR as f64
    }
}

/// Nine contiguous children of `[start, end)`, beginning with `first`.
fn tile(start: DateTime<Utc>, end: DateTime<Utc>, first: Body, depth: u8) -> Vec<PeriodNode> {
    let span = (end - start).num_milliseconds() as i128;
    let first_position = SEQUENCE_POSITION[first.index()];
    let mut children = Vec::with_capacity(VIMSHOTTARI_SEQUENCE.len());
    let mut cumulative: i128 = 0;
    let mut child_start = start;

    for offset in 0..VIMSHOTTARI_SEQUENCE.len() {
        let (lord, years) = VIMSHOTTARI_SEQUENCE[(first_position + offset) % VIMSHOTTARI_SEQUENCE.len()];
        cumulative += years as i128;
        let child_end = if offset + 1 == VIMSHOTTARI_SEQUENCE.len() {
            end
        } else {
            let elapsed = span * cumulative / VIMSHOTTARI_TOTAL_YEARS as i128;
            start + Duration::milliseconds(elapsed as i64)
        };
        children.push(PeriodNode {
            lord,
            start: child_start,
            end: child_end,
            depth,
            level: DashaLevel::from_depth(depth),
        });
        child_start = child_end;
    }
    children
}

/// Children of `node`, one level deeper, in sequence order from the node's lord.
pub fn subdivide(node: &PeriodNode) -> Vec<PeriodNode> {
    tile(node.start, node.end, node.lord, node.depth + 1)
}

/// Fails when `children` do not exactly tile `[start, end)`.
pub fn verify_tiling(start: DateTime<Utc>, end: DateTime<Utc>, children: &[PeriodNode]) -> Result<()> {
    let (Some(first), Some(last)) = (children.first(), children.last()) else {
        return Err(KundaliError::invariant("period has no children"));
    };
    if first.start != start || last.end != end {
        return Err(KundaliError::invariant(format!(
            "children span {}..{} but parent spans {}..{}",
            first.start, last.end, start, end
        )));
    }
    for pair in children.windows(2) {
        if pair[0].end != pair[1].start || pair[0].start > pair[0].end {
            return Err(KundaliError::invariant(format!(
                "gap or overlap between {} and {} at {}",
                pair[0].lord, pair[1].lord, pair[0].end
            )));
        }
    }
    Ok(())
}

/// Position of the Moon in its nakshatra at birth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashaBalance {
    pub lord: Body,
    pub nakshatra: usize,
    #[serde(rename = "elapsedFraction")]
    pub elapsed_fraction: f64,
    /// Years of the first mahadasha still to run at birth
    #[serde(rename = "remainingYears")]
    pub remaining_years: f64,
}

/// Materialized subtree, for serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashaPeriod {
    pub planet: Body,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(rename = "durationDays")]
    pub duration_days: f64,
    pub level: DashaLevel,
    pub children: Vec<DashaPeriod>,
}

/// A depth-1 period clipped to an observation window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodWindow {
    pub mahadasha: Body,
    pub antardasha: Body,
    /// Unclipped period
    pub period: PeriodNode,
    pub from: DateTime<Utc>,
    pub until: DateTime<Utc>,
    /// The period runs past the window end
    pub truncated: bool,
}

/// Timeline anchored on one birth.
#[derive(Debug, Clone, PartialEq)]
pub struct DashaTimeline {
    birth: DateTime<Utc>,
    cycle_start: DateTime<Utc>,
    balance: DashaBalance,
}

impl DashaTimeline {
    pub fn from_moon(birth: DateTime<Utc>, moon_longitude: f64) -> Self {
        let nakshatra = nakshatra_pada(moon_longitude).nakshatra;
        let (lord, years) = VIMSHOTTARI_SEQUENCE[nakshatra % VIMSHOTTARI_SEQUENCE.len()];
        let fraction = elapsed_fraction(moon_longitude);
        let elapsed_ms = (fraction * (years * MILLIS_PER_YEAR) as f64).round() as i64;

        Self {
            birth,
            cycle_start: birth - Duration::milliseconds(elapsed_ms),
            balance: DashaBalance {
                lord,
                nakshatra,
                elapsed_fraction: fraction,
                remaining_years: years as f64 * (1.0 - fraction),
            },
        }
    }

    pub fn from_chart(chart: &Chart) -> Self {
        Self::from_moon(chart.instant, chart.body(Body::Moon).longitude)
    }

    pub fn birth(&self) -> DateTime<Utc> {
        self.birth
    }

    /// Start of the first mahadasha; precedes birth by the elapsed balance.
    pub fn cycle_start(&self) -> DateTime<Utc> {
        self.cycle_start
    }

    pub fn balance(&self) -> &DashaBalance {
        &self.balance
    }

    /// Mahadashas of the `cycle`-th repetition of the 120-year cycle.
    pub fn mahadashas_of_cycle(&self, cycle: i64) -> Result<Vec<PeriodNode>> {
        let overflow = || {
            KundaliError::invalid("instant", format!("cycle {cycle} runs past the last representable instant"))
        };
        let start = self
            .cycle_start
            .checked_add_signed(Duration::milliseconds(cycle * CYCLE_MILLIS))
            .ok_or_else(overflow)?;
        let end = start
            .checked_add_signed(Duration::milliseconds(CYCLE_MILLIS))
            .ok_or_else(overflow)?;
        let periods = tile(start, end, self.balance.lord, 0);
        verify_tiling(start, end, &periods)?;
        Ok(periods)
    }

    /// The nine mahadashas of the birth cycle.
    pub fn mahadashas(&self) -> Result<Vec<PeriodNode>> {
        self.mahadashas_of_cycle(0)
    }

    fn cycle_of(&self, instant: DateTime<Utc>) -> Result<i64> {
        if instant < self.cycle_start {
            return Err(KundaliError::invalid(
                "instant",
                format!("{} precedes the timeline start {}", instant, self.cycle_start),
            ));
        }
        Ok((instant - self.cycle_start).num_milliseconds() / CYCLE_MILLIS)
    }

    /// Nodes containing `instant` from depth 0 down to `depth`.
    pub fn current_path(&self, instant: DateTime<Utc>, depth: u8) -> Result<Vec<PeriodNode>> {
        if depth > MAX_DEPTH {
            return Err(KundaliError::invalid(
                "depth",
                format!("{depth} exceeds the deepest supported level {MAX_DEPTH}"),
            ));
        }
        let mut children = self.mahadashas_of_cycle(self.cycle_of(instant)?)?;
        let mut path = Vec::with_capacity(depth as usize + 1);
        loop {
            let node = find_containing(&children, instant)?;
            path.push(node);
            if node.depth == depth {
                return Ok(path);
            }
            children = subdivide(&node);
            verify_tiling(node.start, node.end, &children)?;
        }
    }

    /// Node containing `instant` at `depth`.
    pub fn current(&self, instant: DateTime<Utc>, depth: u8) -> Result<PeriodNode> {
        let path = self.current_path(instant, depth)?;
        path.last()
            .copied()
            .ok_or_else(|| KundaliError::invariant("empty period path"))
    }

    /// The node at the same depth that follows `node`, crossing parent boundaries.
    pub fn next_after(&self, node: &PeriodNode) -> Result<PeriodNode> {
        self.current(node.end, node.depth)
    }

    /// Antardasha windows inside `[now, now + months)`.
    ///
    /// The current antardasha is always reported; the following one only if it
    /// starts strictly before the window closes. Both are clipped to the window.
    pub fn upcoming_windows(&self, now: DateTime<Utc>, months: u32) -> Result<Vec<PeriodWindow>> {
        let window_end = now
            .checked_add_months(Months::new(months))
            .ok_or_else(|| KundaliError::invalid("months", format!("{months} months overflows")))?;

        let path = self.current_path(now, 1)?;
        let (mahadasha, current) = match path.as_slice() {
            [md, ad] => (*md, *ad),
            _ => return Err(KundaliError::invariant("expected a two-level period path")),
        };

        let mut windows = vec![PeriodWindow {
            mahadasha: mahadasha.lord,
            antardasha: current.lord,
            period: current,
            from: now,
            until: current.end.min(window_end),
            truncated: current.end > window_end,
        }];

        let next_path = self.current_path(current.end, 1)?;
        if let [next_md, next] = next_path.as_slice() {
            if next.start < window_end {
                windows.push(PeriodWindow {
                    mahadasha: next_md.lord,
                    antardasha: next.lord,
                    period: *next,
                    from: next.start,
                    until: next.end.min(window_end),
                    truncated: next.end > window_end,
                });
            }
        }
        Ok(windows)
    }
}

fn find_containing(children: &[PeriodNode], instant: DateTime<Utc>) -> Result<PeriodNode> {
    children
        .iter()
        .find(|child| child.contains(instant))
        .copied()
        .ok_or_else(|| KundaliError::invariant(format!("no period contains {instant}")))
}

/// Materialize `node` and its descendants down to `depth`.
pub fn expand(node: &PeriodNode, depth: u8) -> DashaPeriod {
    let children = if node.depth < depth.min(MAX_DEPTH) {
        subdivide(node).iter().map(|child| expand(child, depth)).collect()
    } else {
        Vec::new()
    };
    DashaPeriod {
        planet: node.lord,
        start: node.start,
        end: node.end,
        duration_days: node.duration().num_milliseconds() as f64 / 86_400_000.0,
        level: node.level,
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn birth() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(1990, 4, 12, 3, 0, 0).unwrap()
    }

    #[test]
    fn test_sequence_positions_match_table() {
        for (position, (lord, _)) in VIMSHOTTARI_SEQUENCE.iter().enumerate() {
            assert_eq!(SEQUENCE_POSITION[lord.index()], position);
        }
        let total: i64 = VIMSHOTTARI_SEQUENCE.iter().map(|(_, y)| y).sum();
        assert_eq!(total, VIMSHOTTARI_TOTAL_YEARS);
        assert_eq!(MILLIS_PER_YEAR as f64, VIMSHOTTARI_YEAR_DAYS * 86_400_000.0);
    }

    #[test]
    fn test_moon_at_start_of_ashwini_begins_with_ketu() {
        let timeline = DashaTimeline::from_moon(birth(), 0.0);
        let periods = timeline.mahadashas().unwrap();
        assert_eq!(periods.len(), 9);
        assert_eq!(periods[0].lord, Body::Ketu);
        assert_eq!(periods[0].start, birth());
        assert_eq!(periods[1].lord, Body::Venus);
        assert_eq!(periods[8].lord, Body::Mercury);
    }

    #[test]
    fn test_subdivision_starts_from_parent_lord() {
        let timeline = DashaTimeline::from_moon(birth(), 100.0);
        let md = timeline.mahadashas().unwrap()[0];
        let children = subdivide(&md);
        assert_eq!(children[0].lord, md.lord);
        assert_eq!(children[0].depth, 1);
        assert_eq!(children[0].level, DashaLevel::Antardasha);
        verify_tiling(md.start, md.end, &children).unwrap();
    }

    #[test]
    fn test_current_path_descends_to_depth() {
        let timeline = DashaTimeline::from_moon(birth(), 200.0);
        let now = birth() + Duration::days(4000);
        let path = timeline.current_path(now, 2).unwrap();
        assert_eq!(path.len(), 3);
        for (depth, node) in path.iter().enumerate() {
            assert_eq!(node.depth as usize, depth);
            assert!(node.contains(now));
        }
    }

    #[test]
    fn test_before_cycle_start_is_invalid() {
        let timeline = DashaTimeline::from_moon(birth(), 14.0);
        let early = timeline.cycle_start() - Duration::seconds(1);
        assert!(matches!(
            timeline.current(early, 0),
            Err(KundaliError::InvalidInput { field: "instant", .. })
        ));
    }

    #[test]
    fn test_cycle_repeats_after_120_years() {
        let timeline = DashaTimeline::from_moon(birth(), 0.0);
        let later = birth() + Duration::milliseconds(CYCLE_MILLIS) + Duration::days(1);
        let node = timeline.current(later, 0).unwrap();
        assert_eq!(node.lord, Body::Ketu);
    }

    #[test]
    fn test_too_deep_is_rejected() {
        let timeline = DashaTimeline::from_moon(birth(), 0.0);
        assert!(timeline.current(birth(), MAX_DEPTH + 1).is_err());
    }

    #[test]
    fn test_expand_materializes_requested_depth() {
        let timeline = DashaTimeline::from_moon(birth(), 0.0);
        let md = timeline.mahadashas().unwrap()[1];
        let tree = expand(&md, 1);
        assert_eq!(tree.children.len(), 9);
        assert!(tree.children.iter().all(|c| c.children.is_empty()));
        assert!((tree.duration_days - 20.0 * VIMSHOTTARI_YEAR_DAYS).abs() < 1e-6);
    }
}
