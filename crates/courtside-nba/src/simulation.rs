// Trade impact simulation.
//
// Six categorical trade factors are resolved to fixed multipliers, blended
// into an overall multiplier and four per-metric multipliers, and applied to
// a player's baseline per-game stats. The adjusted stats are compared with
// the baseline to flag areas that will need development support.
//
// Also home to the destination recommendations and the quick slider
// simulation used by the player detail view.

use serde::{Deserialize, Serialize};

use crate::stats::{percentage_change, round1, StatSnapshot};

/// Field-goal percentage bounds applied after adjustment (0-100 scale).
pub const FG_PCT_FLOOR: f64 = 30.0;
pub const FG_PCT_CEILING: f64 = 65.0;

// ---------------------------------------------------------------------------
// Factor tables
// ---------------------------------------------------------------------------

/// One dimension of a hypothetical trade, with a fixed multiplier per entry.
pub trait Factor: Copy + PartialEq + Sized + 'static {
    /// Every entry, best to worst.
    const ALL: &'static [Self];
    /// Entry used for unknown or absent selections (multiplier 1.0).
    const NEUTRAL: Self;

    fn multiplier(self) -> f64;

    /// Upper-case key used in configuration and serialized output.
    fn key(self) -> &'static str;

    /// Resolve a key, falling back to the neutral entry.
    fn from_key(key: &str) -> Self {
        let key = key.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.key() == key)
            .unwrap_or(Self::NEUTRAL)
    }
}

/// `Default` and lenient string conversion for a factor enum.
macro_rules! factor_conversions {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Default for $ty {
                fn default() -> Self {
                    <$ty as Factor>::NEUTRAL
                }
            }

            impl From<String> for $ty {
                fn from(key: String) -> Self {
                    <$ty as Factor>::from_key(&key)
                }
            }

            impl From<&str> for $ty {
                fn from(key: &str) -> Self {
                    <$ty as Factor>::from_key(key)
                }
            }
        )*
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum SystemFit {
    Excellent,
    Good,
    Neutral,
    Poor,
    Bad,
}

impl Factor for SystemFit {
    const ALL: &'static [Self] = &[
        SystemFit::Excellent,
        SystemFit::Good,
        SystemFit::Neutral,
        SystemFit::Poor,
        SystemFit::Bad,
    ];
    const NEUTRAL: Self = SystemFit::Neutral;

    fn multiplier(self) -> f64 {
        match self {
            SystemFit::Excellent => 1.1,
            SystemFit::Good => 1.05,
            SystemFit::Neutral => 1.0,
            SystemFit::Poor => 0.95,
            SystemFit::Bad => 0.9,
        }
    }

    fn key(self) -> &'static str {
        match self {
            SystemFit::Excellent => "EXCELLENT",
            SystemFit::Good => "GOOD",
            SystemFit::Neutral => "NEUTRAL",
            SystemFit::Poor => "POOR",
            SystemFit::Bad => "BAD",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum RoleChange {
    PrimaryOption,
    SecondaryOption,
    SameRole,
    ReducedRole,
    BenchRole,
}

impl Factor for RoleChange {
    const ALL: &'static [Self] = &[
        RoleChange::PrimaryOption,
        RoleChange::SecondaryOption,
        RoleChange::SameRole,
        RoleChange::ReducedRole,
        RoleChange::BenchRole,
    ];
    const NEUTRAL: Self = RoleChange::SameRole;

    fn multiplier(self) -> f64 {
        match self {
            RoleChange::PrimaryOption => 1.15,
            RoleChange::SecondaryOption => 1.05,
            RoleChange::SameRole => 1.0,
            RoleChange::ReducedRole => 0.9,
            RoleChange::BenchRole => 0.8,
        }
    }

    fn key(self) -> &'static str {
        match self {
            RoleChange::PrimaryOption => "PRIMARY_OPTION",
            RoleChange::SecondaryOption => "SECONDARY_OPTION",
            RoleChange::SameRole => "SAME_ROLE",
            RoleChange::ReducedRole => "REDUCED_ROLE",
            RoleChange::BenchRole => "BENCH_ROLE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum MinutesChange {
    SignificantIncrease,
    ModerateIncrease,
    SameMinutes,
    ModerateDecrease,
    SignificantDecrease,
}

impl Factor for MinutesChange {
    const ALL: &'static [Self] = &[
        MinutesChange::SignificantIncrease,
        MinutesChange::ModerateIncrease,
        MinutesChange::SameMinutes,
        MinutesChange::ModerateDecrease,
        MinutesChange::SignificantDecrease,
    ];
    const NEUTRAL: Self = MinutesChange::SameMinutes;

    fn multiplier(self) -> f64 {
        match self {
            MinutesChange::SignificantIncrease => 1.2,
            MinutesChange::ModerateIncrease => 1.1,
            MinutesChange::SameMinutes => 1.0,
            MinutesChange::ModerateDecrease => 0.9,
            MinutesChange::SignificantDecrease => 0.8,
        }
    }

    fn key(self) -> &'static str {
        match self {
            MinutesChange::SignificantIncrease => "SIGNIFICANT_INCREASE",
            MinutesChange::ModerateIncrease => "MODERATE_INCREASE",
            MinutesChange::SameMinutes => "SAME_MINUTES",
            MinutesChange::ModerateDecrease => "MODERATE_DECREASE",
            MinutesChange::SignificantDecrease => "SIGNIFICANT_DECREASE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum TeamQuality {
    ChampionshipContender,
    PlayoffTeam,
    SameLevel,
    LotteryTeam,
    RebuildingTeam,
}

impl Factor for TeamQuality {
    const ALL: &'static [Self] = &[
        TeamQuality::ChampionshipContender,
        TeamQuality::PlayoffTeam,
        TeamQuality::SameLevel,
        TeamQuality::LotteryTeam,
        TeamQuality::RebuildingTeam,
    ];
    const NEUTRAL: Self = TeamQuality::SameLevel;

    fn multiplier(self) -> f64 {
        match self {
            TeamQuality::ChampionshipContender => 1.05,
            TeamQuality::PlayoffTeam => 1.02,
            TeamQuality::SameLevel => 1.0,
            TeamQuality::LotteryTeam => 0.98,
            TeamQuality::RebuildingTeam => 0.95,
        }
    }

    fn key(self) -> &'static str {
        match self {
            TeamQuality::ChampionshipContender => "CHAMPIONSHIP_CONTENDER",
            TeamQuality::PlayoffTeam => "PLAYOFF_TEAM",
            TeamQuality::SameLevel => "SAME_LEVEL",
            TeamQuality::LotteryTeam => "LOTTERY_TEAM",
            TeamQuality::RebuildingTeam => "REBUILDING_TEAM",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum Coaching {
    EliteCoach,
    GoodCoach,
    AverageCoach,
    BelowAverageCoach,
    PoorCoach,
}

impl Factor for Coaching {
    const ALL: &'static [Self] = &[
        Coaching::EliteCoach,
        Coaching::GoodCoach,
        Coaching::AverageCoach,
        Coaching::BelowAverageCoach,
        Coaching::PoorCoach,
    ];
    const NEUTRAL: Self = Coaching::AverageCoach;

    fn multiplier(self) -> f64 {
        match self {
            Coaching::EliteCoach => 1.08,
            Coaching::GoodCoach => 1.04,
            Coaching::AverageCoach => 1.0,
            Coaching::BelowAverageCoach => 0.96,
            Coaching::PoorCoach => 0.92,
        }
    }

    fn key(self) -> &'static str {
        match self {
            Coaching::EliteCoach => "ELITE_COACH",
            Coaching::GoodCoach => "GOOD_COACH",
            Coaching::AverageCoach => "AVERAGE_COACH",
            Coaching::BelowAverageCoach => "BELOW_AVERAGE_COACH",
            Coaching::PoorCoach => "POOR_COACH",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum UsageRate {
    StarUsage,
    HighUsage,
    AverageUsage,
    LowUsage,
    MinimalUsage,
}

impl Factor for UsageRate {
    const ALL: &'static [Self] = &[
        UsageRate::StarUsage,
        UsageRate::HighUsage,
        UsageRate::AverageUsage,
        UsageRate::LowUsage,
        UsageRate::MinimalUsage,
    ];
    const NEUTRAL: Self = UsageRate::AverageUsage;

    fn multiplier(self) -> f64 {
        match self {
            UsageRate::StarUsage => 1.15,
            UsageRate::HighUsage => 1.08,
            UsageRate::AverageUsage => 1.0,
            UsageRate::LowUsage => 0.92,
            UsageRate::MinimalUsage => 0.85,
        }
    }

    fn key(self) -> &'static str {
        match self {
            UsageRate::StarUsage => "STAR_USAGE",
            UsageRate::HighUsage => "HIGH_USAGE",
            UsageRate::AverageUsage => "AVERAGE_USAGE",
            UsageRate::LowUsage => "LOW_USAGE",
            UsageRate::MinimalUsage => "MINIMAL_USAGE",
        }
    }
}

factor_conversions!(
    SystemFit,
    RoleChange,
    MinutesChange,
    TeamQuality,
    Coaching,
    UsageRate,
);

/// A full set of trade factor selections. Missing fields deserialize to the
/// neutral entry of their dimension.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeFactors {
    #[serde(alias = "systemFit")]
    pub system_fit: SystemFit,
    #[serde(alias = "roleChange")]
    pub role_change: RoleChange,
    #[serde(alias = "minutesChange")]
    pub minutes_change: MinutesChange,
    #[serde(alias = "teamQuality")]
    pub team_quality: TeamQuality,
    pub coaching: Coaching,
    #[serde(alias = "usageRate")]
    pub usage_rate: UsageRate,
}

// ---------------------------------------------------------------------------
// Impact result types
// ---------------------------------------------------------------------------

/// Multipliers applied to the baseline stats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricMultipliers {
    pub overall: f64,
    pub scoring: f64,
    pub rebounding: f64,
    pub assists: f64,
    pub efficiency: f64,
}

impl MetricMultipliers {
    /// Weighted blend of the six factor multipliers.
    pub fn from_factors(factors: &TradeFactors) -> Self {
        let system_fit = factors.system_fit.multiplier();
        let role_change = factors.role_change.multiplier();
        let minutes_change = factors.minutes_change.multiplier();
        let team_quality = factors.team_quality.multiplier();
        let coaching = factors.coaching.multiplier();
        let usage_rate = factors.usage_rate.multiplier();

        let overall = system_fit * 0.2
            + role_change * 0.25
            + minutes_change * 0.2
            + team_quality * 0.1
            + coaching * 0.1
            + usage_rate * 0.15;

        MetricMultipliers {
            overall,
            scoring: overall * (usage_rate * 0.7 + role_change * 0.3),
            rebounding: overall * (minutes_change * 0.6 + system_fit * 0.4),
            assists: overall * (system_fit * 0.5 + role_change * 0.5),
            efficiency: overall * (coaching * 0.4 + team_quality * 0.4 + system_fit * 0.2),
        }
    }
}

/// Percentage change of each stat, plus the change in average production
/// (mean of points, rebounds and assists).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImpactChanges {
    pub ppg: f64,
    pub rpg: f64,
    pub apg: f64,
    pub fg_pct: f64,
    pub minutes_per_game: f64,
    pub overall: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DevelopmentArea {
    Scoring,
    Rebounding,
    Playmaking,
    Efficiency,
}

impl DevelopmentArea {
    pub fn label(&self) -> &'static str {
        match self {
            DevelopmentArea::Scoring => "Scoring",
            DevelopmentArea::Rebounding => "Rebounding",
            DevelopmentArea::Playmaking => "Playmaking",
            DevelopmentArea::Efficiency => "Efficiency",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            DevelopmentArea::Scoring => "Work with shooting coach to develop scoring options",
            DevelopmentArea::Rebounding => "Focus on positioning and boxing out techniques",
            DevelopmentArea::Playmaking => "Develop court vision and passing skills in new offense",
            DevelopmentArea::Efficiency => "Work on shot selection and finishing",
        }
    }

    /// (flag below, critical below) thresholds, in percent.
    fn thresholds(&self) -> (f64, f64) {
        match self {
            DevelopmentArea::Scoring => (-5.0, -15.0),
            DevelopmentArea::Rebounding => (-8.0, -20.0),
            DevelopmentArea::Playmaking => (-10.0, -25.0),
            DevelopmentArea::Efficiency => (-5.0, -10.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Moderate,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DevelopmentNeed {
    pub area: DevelopmentArea,
    pub severity: Severity,
    pub recommendation: String,
}

/// Qualitative outlook derived from the overall change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Thrive,
    ModestImprovement,
    NeedsAdjustment,
    NeedsSignificantSupport,
}

impl Verdict {
    pub fn from_overall_change(change: f64) -> Self {
        if change > 10.0 {
            Verdict::Thrive
        } else if change > 0.0 {
            Verdict::ModestImprovement
        } else if change > -10.0 {
            Verdict::NeedsAdjustment
        } else {
            Verdict::NeedsSignificantSupport
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Verdict::Thrive => "Player is projected to thrive in the new environment",
            Verdict::ModestImprovement => "Player is projected to see modest improvement",
            Verdict::NeedsAdjustment => "Player may need time to adjust to new role",
            Verdict::NeedsSignificantSupport => {
                "Player may require significant support to maintain performance"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DevelopmentAssessment {
    /// True when the overall change is below -5%.
    pub needs_support: bool,
    pub needs: Vec<DevelopmentNeed>,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactResult {
    pub adjusted: StatSnapshot,
    pub multipliers: MetricMultipliers,
    pub changes: ImpactChanges,
    pub development: DevelopmentAssessment,
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Project a player's per-game stats under a set of trade factors.
///
/// Baseline values that are not finite count as 0. Points, rebounds, assists
/// and minutes never go negative; field-goal percentage (0-100 scale) is
/// clamped to [`FG_PCT_FLOOR`, `FG_PCT_CEILING`]. Games played is carried
/// over unchanged.
pub fn evaluate(baseline: &StatSnapshot, factors: &TradeFactors) -> ImpactResult {
    let base = baseline.sanitized();
    let multipliers = MetricMultipliers::from_factors(factors);
    let minutes_change = factors.minutes_change.multiplier();

    let adjusted = StatSnapshot {
        ppg: (base.ppg * multipliers.scoring).max(0.0),
        rpg: (base.rpg * multipliers.rebounding).max(0.0),
        apg: (base.apg * multipliers.assists).max(0.0),
        fg_pct: (base.fg_pct * multipliers.efficiency).clamp(FG_PCT_FLOOR, FG_PCT_CEILING),
        minutes_per_game: (base.minutes_per_game * minutes_change).max(0.0),
        games_played: base.games_played,
    };

    let changes = ImpactChanges {
        ppg: percentage_change(base.ppg, adjusted.ppg),
        rpg: percentage_change(base.rpg, adjusted.rpg),
        apg: percentage_change(base.apg, adjusted.apg),
        fg_pct: percentage_change(base.fg_pct, adjusted.fg_pct),
        minutes_per_game: percentage_change(base.minutes_per_game, adjusted.minutes_per_game),
        overall: percentage_change(base.production_average(), adjusted.production_average()),
    };

    ImpactResult {
        adjusted,
        multipliers,
        changes,
        development: assess_development(&changes),
    }
}

/// Flag areas whose projected decline crosses their threshold.
pub fn assess_development(changes: &ImpactChanges) -> DevelopmentAssessment {
    let checks = [
        (DevelopmentArea::Scoring, changes.ppg),
        (DevelopmentArea::Rebounding, changes.rpg),
        (DevelopmentArea::Playmaking, changes.apg),
        (DevelopmentArea::Efficiency, changes.fg_pct),
    ];

    let needs = checks
        .into_iter()
        .filter_map(|(area, change)| {
            let (flag_below, critical_below) = area.thresholds();
            if change >= flag_below {
                return None;
            }
            let severity = if change < critical_below {
                Severity::Critical
            } else {
                Severity::Moderate
            };
            Some(DevelopmentNeed {
                area,
                severity,
                recommendation: area.recommendation().to_string(),
            })
        })
        .collect();

    DevelopmentAssessment {
        needs_support: changes.overall < -5.0,
        needs,
        verdict: Verdict::from_overall_change(changes.overall),
    }
}

// ---------------------------------------------------------------------------
// Destination recommendations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Fit {
    Excellent,
    Good,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub team: String,
    pub fit: Fit,
    pub reason: String,
    pub projected_change: String,
}

impl Recommendation {
    fn new(team: &str, fit: Fit, reason: &str, projected_change: &str) -> Self {
        Recommendation {
            team: team.to_string(),
            fit,
            reason: reason.to_string(),
            projected_change: projected_change.to_string(),
        }
    }
}

/// Suggested destinations for a player. Each rule is checked independently
/// and matches come out in rule order; a player matching none gets a single
/// development-focused fallback.
pub fn recommend(stats: &StatSnapshot) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if stats.ppg >= 20.0 {
        recommendations.push(Recommendation::new(
            "New York Knicks",
            Fit::Excellent,
            "High-profile market for a scoring talent",
            "+7%",
        ));
    }

    if stats.fg_pct >= 50.0 {
        recommendations.push(Recommendation::new(
            "Boston Celtics",
            Fit::Good,
            "System emphasizes efficient scoring",
            "+5%",
        ));
    }

    if stats.apg >= 7.0 {
        recommendations.push(Recommendation::new(
            "Denver Nuggets",
            Fit::Excellent,
            "Offense built around skilled passers",
            "+8%",
        ));
    }

    if recommendations.is_empty() {
        recommendations.push(Recommendation::new(
            "San Antonio Spurs",
            Fit::Good,
            "Development-focused organization",
            "+3%",
        ));
    }

    recommendations
}

// ---------------------------------------------------------------------------
// Slider simulation
// ---------------------------------------------------------------------------

/// Integer slider positions from the player detail view. Only the scoring
/// slider moves the projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderAdjustments {
    pub scoring: i32,
    pub rebounding: i32,
    pub assists: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SliderChanges {
    pub ppg: f64,
    pub rpg: f64,
    pub apg: f64,
    /// Change in the ppg + rpg + apg total.
    pub overall: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SliderOutcome {
    pub stats: StatSnapshot,
    pub changes: SliderChanges,
}

/// Additive what-if: half the scoring slider is added to points, with 60% of
/// that added to rebounds and 40% to assists. Stats and changes are rounded
/// to one decimal.
pub fn simulate_adjustments(baseline: &StatSnapshot, sliders: &SliderAdjustments) -> SliderOutcome {
    let base = baseline.sanitized();
    let impact = f64::from(sliders.scoring) * 0.5;

    let stats = StatSnapshot {
        ppg: round1(base.ppg + impact).max(0.0),
        rpg: round1(base.rpg + impact * 0.6).max(0.0),
        apg: round1(base.apg + impact * 0.4).max(0.0),
        ..base
    };

    let total_before = base.ppg + base.rpg + base.apg;
    let total_after = stats.ppg + stats.rpg + stats.apg;

    SliderOutcome {
        stats,
        changes: SliderChanges {
            ppg: round1(percentage_change(base.ppg, stats.ppg)),
            rpg: round1(percentage_change(base.rpg, stats.rpg)),
            apg: round1(percentage_change(base.apg, stats.apg)),
            overall: round1(percentage_change(total_before, total_after)),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn baseline() -> StatSnapshot {
        StatSnapshot {
            ppg: 20.0,
            rpg: 5.0,
            apg: 5.0,
            fg_pct: 45.0,
            minutes_per_game: 30.0,
            games_played: 70,
        }
    }

    fn extreme_up() -> TradeFactors {
        TradeFactors {
            system_fit: SystemFit::Excellent,
            role_change: RoleChange::PrimaryOption,
            minutes_change: MinutesChange::SignificantIncrease,
            team_quality: TeamQuality::ChampionshipContender,
            coaching: Coaching::EliteCoach,
            usage_rate: UsageRate::StarUsage,
        }
    }

    fn extreme_down() -> TradeFactors {
        TradeFactors {
            system_fit: SystemFit::Bad,
            role_change: RoleChange::BenchRole,
            minutes_change: MinutesChange::SignificantDecrease,
            team_quality: TeamQuality::RebuildingTeam,
            coaching: Coaching::PoorCoach,
            usage_rate: UsageRate::MinimalUsage,
        }
    }

    // -- Factor tables --

    #[test]
    fn neutral_entries_are_one() {
        assert_eq!(SystemFit::NEUTRAL.multiplier(), 1.0);
        assert_eq!(RoleChange::NEUTRAL.multiplier(), 1.0);
        assert_eq!(MinutesChange::NEUTRAL.multiplier(), 1.0);
        assert_eq!(TeamQuality::NEUTRAL.multiplier(), 1.0);
        assert_eq!(Coaching::NEUTRAL.multiplier(), 1.0);
        assert_eq!(UsageRate::NEUTRAL.multiplier(), 1.0);
    }

    #[test]
    fn keys_resolve_and_unknown_falls_back() {
        assert_eq!(SystemFit::from_key("EXCELLENT"), SystemFit::Excellent);
        assert_eq!(RoleChange::from_key(" BENCH_ROLE "), RoleChange::BenchRole);
        assert_eq!(Coaching::from_key("BELOW_AVERAGE_COACH"), Coaching::BelowAverageCoach);
        assert_eq!(UsageRate::from_key("MEGA_USAGE"), UsageRate::AverageUsage);
        assert_eq!(TeamQuality::from_key(""), TeamQuality::SameLevel);
        assert_eq!(MinutesChange::from("excellent"), MinutesChange::SameMinutes);
    }

    #[test]
    fn every_key_round_trips() {
        for f in SystemFit::ALL {
            assert_eq!(SystemFit::from_key(f.key()), *f);
        }
        for f in RoleChange::ALL {
            assert_eq!(RoleChange::from_key(f.key()), *f);
        }
        for f in MinutesChange::ALL {
            assert_eq!(MinutesChange::from_key(f.key()), *f);
        }
        for f in TeamQuality::ALL {
            assert_eq!(TeamQuality::from_key(f.key()), *f);
        }
        for f in Coaching::ALL {
            assert_eq!(Coaching::from_key(f.key()), *f);
        }
        for f in UsageRate::ALL {
            assert_eq!(UsageRate::from_key(f.key()), *f);
        }
    }

    #[test]
    fn factors_deserialize_leniently() {
        let json = r#"{"systemFit":"GOOD","role_change":"NOT_A_ROLE","usageRate":"STAR_USAGE"}"#;
        let factors: TradeFactors = serde_json::from_str(json).unwrap();
        assert_eq!(factors.system_fit, SystemFit::Good);
        assert_eq!(factors.role_change, RoleChange::SameRole);
        assert_eq!(factors.minutes_change, MinutesChange::SameMinutes);
        assert_eq!(factors.usage_rate, UsageRate::StarUsage);
    }

    #[test]
    fn factors_serialize_to_keys() {
        let json = serde_json::to_value(extreme_up()).unwrap();
        assert_eq!(json["system_fit"], "EXCELLENT");
        assert_eq!(json["team_quality"], "CHAMPIONSHIP_CONTENDER");
        assert_eq!(json["coaching"], "ELITE_COACH");
    }

    // -- Multipliers --

    #[test]
    fn neutral_multipliers_are_one() {
        let m = MetricMultipliers::from_factors(&TradeFactors::default());
        assert!((m.overall - 1.0).abs() < EPS);
        assert!((m.scoring - 1.0).abs() < EPS);
        assert!((m.rebounding - 1.0).abs() < EPS);
        assert!((m.assists - 1.0).abs() < EPS);
        assert!((m.efficiency - 1.0).abs() < EPS);
    }

    #[test]
    fn weighted_overall_multiplier() {
        let factors = TradeFactors {
            role_change: RoleChange::PrimaryOption,
            usage_rate: UsageRate::StarUsage,
            ..TradeFactors::default()
        };
        let m = MetricMultipliers::from_factors(&factors);
        // 0.2 + 1.15*0.25 + 0.2 + 0.1 + 0.1 + 1.15*0.15
        assert!((m.overall - 1.06).abs() < EPS);
        assert!((m.scoring - 1.06 * 1.15).abs() < EPS);
        assert!((m.assists - 1.06 * 1.075).abs() < EPS);
        assert!((m.rebounding - 1.06).abs() < EPS);
    }

    // -- evaluate --

    #[test]
    fn neutral_factors_leave_stats_unchanged() {
        let result = evaluate(&baseline(), &TradeFactors::default());

        assert!((result.multipliers.overall - 1.0).abs() < EPS);
        assert!((result.adjusted.ppg - 20.0).abs() < EPS);
        assert!((result.adjusted.rpg - 5.0).abs() < EPS);
        assert!((result.adjusted.apg - 5.0).abs() < EPS);
        assert!((result.adjusted.fg_pct - 45.0).abs() < EPS);
        assert!((result.adjusted.minutes_per_game - 30.0).abs() < EPS);
        assert_eq!(result.adjusted.games_played, 70);

        assert!(result.changes.ppg.abs() < EPS);
        assert!(result.changes.overall.abs() < EPS);
        assert!(!result.development.needs_support);
        assert!(result.development.needs.is_empty());
        assert_eq!(result.development.verdict, Verdict::NeedsAdjustment);
    }

    #[test]
    fn zero_baseline_ppg_change_is_bounded() {
        let base = StatSnapshot {
            ppg: 0.0,
            ..baseline()
        };
        for factors in [TradeFactors::default(), extreme_up(), extreme_down()] {
            let result = evaluate(&base, &factors);
            assert_eq!(result.adjusted.ppg, 0.0);
            assert_eq!(result.changes.ppg, 0.0);
            assert!(result.changes.overall.is_finite());
        }
    }

    #[test]
    fn fg_pct_always_clamped() {
        for fg in [0.0, 10.0, 29.9, 45.0, 64.0, 80.0, 100.0, 1e9] {
            let base = StatSnapshot {
                fg_pct: fg,
                ..baseline()
            };
            for factors in [TradeFactors::default(), extreme_up(), extreme_down()] {
                let adjusted = evaluate(&base, &factors).adjusted.fg_pct;
                assert!(
                    (FG_PCT_FLOOR..=FG_PCT_CEILING).contains(&adjusted),
                    "fg {fg} -> {adjusted}"
                );
            }
        }
    }

    #[test]
    fn malformed_baseline_treated_as_zero() {
        let base = StatSnapshot {
            ppg: f64::NAN,
            rpg: f64::INFINITY,
            apg: -3.0,
            fg_pct: f64::NAN,
            minutes_per_game: 30.0,
            games_played: 0,
        };
        let result = evaluate(&base, &extreme_up());
        assert_eq!(result.adjusted.ppg, 0.0);
        assert_eq!(result.adjusted.rpg, 0.0);
        assert_eq!(result.adjusted.apg, 0.0);
        assert_eq!(result.adjusted.fg_pct, FG_PCT_FLOOR);
        assert!(result.changes.overall.is_finite());
    }

    #[test]
    fn extreme_decline_flags_everything_critical() {
        let result = evaluate(&baseline(), &extreme_down());
        let areas: Vec<DevelopmentArea> =
            result.development.needs.iter().map(|n| n.area).collect();
        assert_eq!(
            areas,
            vec![
                DevelopmentArea::Scoring,
                DevelopmentArea::Rebounding,
                DevelopmentArea::Playmaking,
                DevelopmentArea::Efficiency,
            ]
        );
        assert!(result
            .development
            .needs
            .iter()
            .all(|n| n.severity == Severity::Critical));
        assert!(result.development.needs_support);
        assert_eq!(result.development.verdict, Verdict::NeedsSignificantSupport);
        assert!(result.adjusted.minutes_per_game < 30.0);
    }

    #[test]
    fn extreme_boost_thrives() {
        let result = evaluate(&baseline(), &extreme_up());
        assert!(result.changes.overall > 10.0);
        assert!(result.development.needs.is_empty());
        assert!(!result.development.needs_support);
        assert_eq!(result.development.verdict, Verdict::Thrive);
        assert!((result.adjusted.minutes_per_game - 36.0).abs() < EPS);
    }

    // -- Development thresholds --

    fn changes_with(ppg: f64, rpg: f64, apg: f64, fg_pct: f64, overall: f64) -> ImpactChanges {
        ImpactChanges {
            ppg,
            rpg,
            apg,
            fg_pct,
            minutes_per_game: 0.0,
            overall,
        }
    }

    #[test]
    fn thresholds_are_strict() {
        let at_edges = assess_development(&changes_with(-5.0, -8.0, -10.0, -5.0, -5.0));
        assert!(at_edges.needs.is_empty());
        assert!(!at_edges.needs_support);

        let past_edges = assess_development(&changes_with(-5.1, -8.1, -10.1, -5.1, -5.1));
        assert_eq!(past_edges.needs.len(), 4);
        assert!(past_edges
            .needs
            .iter()
            .all(|n| n.severity == Severity::Moderate));
        assert!(past_edges.needs_support);
    }

    #[test]
    fn critical_thresholds() {
        let a = assess_development(&changes_with(-15.0, -20.0, -25.0, -10.0, 0.0));
        assert!(a.needs.iter().all(|n| n.severity == Severity::Moderate));

        let b = assess_development(&changes_with(-15.1, -20.1, -25.1, -10.1, 0.0));
        assert!(b.needs.iter().all(|n| n.severity == Severity::Critical));
        assert_eq!(
            b.needs[0].recommendation,
            "Work with shooting coach to develop scoring options"
        );
    }

    #[test]
    fn verdict_thresholds() {
        assert_eq!(Verdict::from_overall_change(10.1), Verdict::Thrive);
        assert_eq!(Verdict::from_overall_change(10.0), Verdict::ModestImprovement);
        assert_eq!(Verdict::from_overall_change(0.1), Verdict::ModestImprovement);
        assert_eq!(Verdict::from_overall_change(0.0), Verdict::NeedsAdjustment);
        assert_eq!(Verdict::from_overall_change(-10.0), Verdict::NeedsSignificantSupport);
        assert_eq!(
            Verdict::NeedsAdjustment.text(),
            "Player may need time to adjust to new role"
        );
    }

    // -- recommend --

    fn stats(ppg: f64, fg_pct: f64, apg: f64) -> StatSnapshot {
        StatSnapshot {
            ppg,
            fg_pct,
            apg,
            ..StatSnapshot::default()
        }
    }

    #[test]
    fn scorer_gets_single_recommendation() {
        let recs = recommend(&stats(25.0, 40.0, 3.0));
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].team, "New York Knicks");
        assert_eq!(recs[0].fit, Fit::Excellent);
        assert_eq!(recs[0].projected_change, "+7%");
    }

    #[test]
    fn rules_stack_in_declaration_order() {
        let recs = recommend(&stats(27.0, 50.6, 7.3));
        let teams: Vec<&str> = recs.iter().map(|r| r.team.as_str()).collect();
        assert_eq!(teams, vec!["New York Knicks", "Boston Celtics", "Denver Nuggets"]);
    }

    #[test]
    fn fallback_when_nothing_matches() {
        let recs = recommend(&stats(12.0, 44.0, 2.0));
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].team, "San Antonio Spurs");
        assert_eq!(recs[0].fit, Fit::Good);
    }

    #[test]
    fn rule_boundaries_inclusive() {
        assert_eq!(recommend(&stats(20.0, 0.0, 0.0))[0].team, "New York Knicks");
        assert_eq!(recommend(&stats(0.0, 50.0, 0.0))[0].team, "Boston Celtics");
        assert_eq!(recommend(&stats(0.0, 0.0, 7.0))[0].team, "Denver Nuggets");
    }

    // -- Sliders --

    #[test]
    fn sliders_at_zero_change_nothing() {
        let outcome = simulate_adjustments(&baseline(), &SliderAdjustments::default());
        assert_eq!(outcome.stats.ppg, 20.0);
        assert_eq!(outcome.changes.ppg, 0.0);
        assert_eq!(outcome.changes.overall, 0.0);
    }

    #[test]
    fn scoring_slider_spreads_impact() {
        let sliders = SliderAdjustments {
            scoring: 4,
            ..SliderAdjustments::default()
        };
        let outcome = simulate_adjustments(&baseline(), &sliders);
        assert!((outcome.stats.ppg - 22.0).abs() < EPS);
        assert!((outcome.stats.rpg - 6.2).abs() < EPS);
        assert!((outcome.stats.apg - 5.8).abs() < EPS);
        assert!((outcome.changes.ppg - 10.0).abs() < EPS);
        assert!((outcome.changes.rpg - 24.0).abs() < EPS);
        assert!((outcome.changes.overall - 13.3).abs() < EPS);
        assert_eq!(outcome.stats.minutes_per_game, 30.0);
        assert_eq!(outcome.stats.games_played, 70);
    }

    #[test]
    fn negative_slider_floors_at_zero() {
        let sliders = SliderAdjustments {
            scoring: -100,
            rebounding: 5,
            assists: 5,
        };
        let outcome = simulate_adjustments(&baseline(), &sliders);
        assert_eq!(outcome.stats.ppg, 0.0);
        assert_eq!(outcome.stats.rpg, 0.0);
        assert_eq!(outcome.stats.apg, 0.0);
        assert!((outcome.changes.ppg + 100.0).abs() < EPS);
    }

    #[test]
    fn slider_zero_baseline_uses_zero_rule() {
        let base = StatSnapshot {
            apg: 0.0,
            ..baseline()
        };
        let sliders = SliderAdjustments {
            scoring: 2,
            ..SliderAdjustments::default()
        };
        let outcome = simulate_adjustments(&base, &sliders);
        assert_eq!(outcome.changes.apg, 100.0);
    }
}
