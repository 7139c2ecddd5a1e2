//! The chart query pipeline.
//!
//! `ChartEngine` resolves a birth to UT, samples the ephemeris once and runs
//! every derivation stage over that sample. A query adds the transit, the
//! periods running at the query instant and the upcoming windows. Nothing here
//! caches or mutates; two calls with the same input give the same report.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::aspects::{AspectCalculator, AspectSet};
use crate::birth::BirthMoment;
use crate::chart::data::Chart;
use crate::chart::radix::build_chart;
use crate::ephemeris::{EphemerisProvider, EphemerisSample};
use crate::error::{KundaliError, Result};
use crate::sensitivity::{self, SensitivityReport};
use crate::settings::EngineSettings;
use crate::vedic::ashtakavarga::{ashtakavarga, AshtakavargaTable};
use crate::vedic::dashas::{DashaBalance, DashaTimeline, PeriodNode, PeriodWindow};
use crate::vedic::dignities::{compare_navamsa, evaluate_dignities, DignityTable, VargaComparison};
use crate::vedic::panchanga::{panchanga, Panchanga};
use crate::vedic::strength::{bhava_bala, summarize, BhavaBalaScore, StrengthSummary};
use crate::vedic::transits::{transit_snapshot, TransitSnapshot};
use crate::vedic::vargas::{build_navamsa, HarmonicChart};
use crate::vedic::yogas::{identify_yogas, ChartBundle, YogaResult};

/// Stages that depend on one ephemeris sample only.
#[derive(Debug, Clone)]
pub struct ChartCore {
    pub chart: Chart,
    pub navamsa: HarmonicChart,
    pub dignities: DignityTable,
    pub aspects: AspectSet,
    pub bhava_bala: Vec<BhavaBalaScore>,
    pub timeline: DashaTimeline,
}

impl ChartCore {
    pub fn derive(sample: &EphemerisSample) -> Result<Self> {
        let chart = build_chart(sample)?;
        let navamsa = build_navamsa(&chart);
        let dignities = evaluate_dignities(&chart);
        let aspects = AspectCalculator::new().compute(&chart);
        let bhava_bala = bhava_bala(&chart, &dignities, &aspects);
        let timeline = DashaTimeline::from_chart(&chart);
        log::debug!(
            "derived chart at {}: {} aspect edges, dasha lord {}",
            chart.instant,
            aspects.edges.len(),
            timeline.balance().lord
        );
        Ok(Self {
            chart,
            navamsa,
            dignities,
            aspects,
            bhava_bala,
            timeline,
        })
    }

    pub fn bundle(&self) -> ChartBundle<'_> {
        ChartBundle {
            chart: &self.chart,
            dignities: &self.dignities,
            aspects: &self.aspects,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NatalReport {
    pub birth: BirthMoment,
    pub chart: Chart,
    pub harmonic: HarmonicChart,
    #[serde(rename = "navamsaComparison")]
    pub navamsa_comparison: Vec<VargaComparison>,
    pub dignities: DignityTable,
    pub aspects: AspectSet,
    pub ashtakavarga: AshtakavargaTable,
    #[serde(rename = "bhavaBala")]
    pub bhava_bala: Vec<BhavaBalaScore>,
    #[serde(rename = "strengthSummary")]
    pub strength_summary: StrengthSummary,
    pub yogas: Vec<YogaResult>,
    pub panchanga: Panchanga,
    #[serde(rename = "dashaBalance")]
    pub dasha_balance: DashaBalance,
    pub mahadashas: Vec<PeriodNode>,
    /// Present only for a non-zero uncertainty when both perturbed runs succeed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensitivity: Option<SensitivityReport>,
}

impl NatalReport {
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartReport {
    pub natal: NatalReport,
    #[serde(rename = "queryInstant")]
    pub query_instant: DateTime<Utc>,
    pub transit: TransitSnapshot,
    /// Mahadasha first, down to the configured depth
    #[serde(rename = "currentPeriods")]
    pub current_periods: Vec<PeriodNode>,
    #[serde(rename = "upcomingWindows")]
    pub upcoming_windows: Vec<PeriodWindow>,
}

impl ChartReport {
    pub fn sensitivity(&self) -> Option<&SensitivityReport> {
        self.natal.sensitivity.as_ref()
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

pub struct ChartEngine<P> {
    provider: P,
    settings: EngineSettings,
}

impl<P: EphemerisProvider> ChartEngine<P> {
    pub fn new(provider: P) -> Self {
        Self::with_settings(provider, EngineSettings::default())
    }

    pub fn with_settings(provider: P, settings: EngineSettings) -> Self {
        Self { provider, settings }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Validate `birth` and resolve its civil time to UT.
    pub fn birth_instant(&self, birth: &BirthMoment) -> Result<DateTime<Utc>> {
        birth.validate(&self.settings)?;
        Ok(self.provider.to_universal(birth.civil, &birth.timezone)?)
    }

    fn core_at(&self, birth: &BirthMoment, instant: DateTime<Utc>) -> Result<ChartCore> {
        let sample = self.provider.sample(instant, &birth.location(), birth.ayanamsa)?;
        ChartCore::derive(&sample)
    }

    pub fn natal(&self, birth: &BirthMoment) -> Result<NatalReport> {
        let instant = self.birth_instant(birth)?;
        let core = self.core_at(birth, instant)?;
        let report = self.assemble(birth, &core, instant)?;
        log::info!(
            "natal report for {} ({}): ascendant {}, moon {}",
            birth.civil,
            birth.timezone,
            core.chart.ascendant.sign,
            core.chart.moon_sign()
        );
        Ok(report)
    }

    /// Natal report plus everything that depends on `at`.
    pub fn query(&self, birth: &BirthMoment, at: DateTime<Utc>) -> Result<ChartReport> {
        let instant = self.birth_instant(birth)?;
        if at < instant {
            return Err(KundaliError::invalid(
                "at",
                format!("query instant {at} precedes the birth instant {instant}"),
            ));
        }
        let core = self.core_at(birth, instant)?;
        let natal = self.assemble(birth, &core, at)?;

        let transit_sample = self.provider.sample(at, &birth.location(), birth.ayanamsa)?;
        let transit = transit_snapshot(&core.chart, &transit_sample)?;
        let current_periods = core.timeline.current_path(at, self.settings.dasha_depth)?;
        let upcoming_windows = core.timeline.upcoming_windows(at, self.settings.window_months)?;

        log::info!(
            "chart report at {}: {} periods, {} upcoming windows, saturn phase {:?}",
            at,
            current_periods.len(),
            upcoming_windows.len(),
            transit.phase
        );

        Ok(ChartReport {
            natal,
            query_instant: at,
            transit,
            current_periods,
            upcoming_windows,
        })
    }

    fn assemble(&self, birth: &BirthMoment, core: &ChartCore, reference: DateTime<Utc>) -> Result<NatalReport> {
        let bundle = core.bundle();
        Ok(NatalReport {
            birth: birth.clone(),
            chart: core.chart.clone(),
            harmonic: core.navamsa.clone(),
            navamsa_comparison: compare_navamsa(&core.dignities, &core.navamsa),
            dignities: core.dignities.clone(),
            aspects: core.aspects.clone(),
            ashtakavarga: ashtakavarga(&core.chart),
            bhava_bala: core.bhava_bala.clone(),
            strength_summary: summarize(&core.bhava_bala),
            yogas: identify_yogas(&bundle),
            panchanga: panchanga(&core.chart, birth.civil.date()),
            dasha_balance: core.timeline.balance().clone(),
            mahadashas: core.timeline.mahadashas()?,
            sensitivity: self.sensitivity(birth, core, reference)?,
        })
    }

    /// All-or-nothing: a perturbed run without ephemeris data drops the whole report.
    fn sensitivity(
        &self,
        birth: &BirthMoment,
        baseline: &ChartCore,
        reference: DateTime<Utc>,
    ) -> Result<Option<SensitivityReport>> {
        if birth.uncertainty_minutes == 0 {
            return Ok(None);
        }
        let delta = Duration::minutes(i64::from(birth.uncertainty_minutes));
        let instant = baseline.chart.instant;
        let analysis = self.core_at(birth, instant - delta).and_then(|minus| {
            let plus = self.core_at(birth, instant + delta)?;
            sensitivity::analyze(baseline, &minus, &plus, reference, birth.uncertainty_minutes)
        });
        sensitivity::omit_unavailable(analysis)
    }
}
