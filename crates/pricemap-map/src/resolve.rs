//! Ambiguity resolver: at most one column per role.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use pricemap_model::{ColumnProfile, Role};
use pricemap_standards::Thresholds;

use crate::error::{MapError, Result};
use crate::stats;

/// How competing price columns are settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PricePolicy {
    /// Exactly one claimant with a price header wins; otherwise ambiguous.
    #[default]
    HeaderEvidence,
    /// Any competition for price is reported as ambiguous.
    Surface,
    /// Prefer a plausible median, then header evidence, then confidence.
    PlausibleMedian,
}

impl PricePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HeaderEvidence => "header-evidence",
            Self::Surface => "surface",
            Self::PlausibleMedian => "plausible-median",
        }
    }
}

impl fmt::Display for PricePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PricePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "header-evidence" | "header" => Ok(Self::HeaderEvidence),
            "surface" => Ok(Self::Surface),
            "plausible-median" | "median" => Ok(Self::PlausibleMedian),
            other => Err(format!("unknown price policy: {other}")),
        }
    }
}

/// A column's top role before resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Claim {
    pub index: usize,
    pub role: Role,
    pub confidence: f64,
}

pub struct Resolver<'a> {
    policy: PricePolicy,
    thresholds: &'a Thresholds,
}

impl<'a> Resolver<'a> {
    pub fn new(policy: PricePolicy, thresholds: &'a Thresholds) -> Self {
        Self { policy, thresholds }
    }

    /// Assigns each claimed role to a single column.
    ///
    /// `profiles[i].index()` must equal `i`. Pinned columns keep their role
    /// and beat every claimant for it. Losers stay `Undefined`.
    pub fn resolve(&self, profiles: &mut [ColumnProfile], claims: &[Claim]) -> Result<()> {
        let mut by_role: BTreeMap<Role, Vec<Claim>> = BTreeMap::new();
        for claim in claims {
            if claim.role.is_defined() && !profiles[claim.index].is_pinned() {
                by_role.entry(claim.role).or_default().push(*claim);
            }
        }

        for (role, claimants) in by_role {
            if let Some(pinned) = profiles
                .iter()
                .find(|p| p.is_pinned() && p.assigned_role() == role)
            {
                tracing::debug!(
                    %role,
                    pinned = pinned.index(),
                    losers = claimants.len(),
                    "role is pinned, claimants demoted"
                );
                continue;
            }
            let winner = match claimants.as_slice() {
                [single] => *single,
                _ => self.pick(role, &claimants, profiles)?,
            };
            if claimants.len() > 1 {
                let losers: Vec<usize> = claimants
                    .iter()
                    .map(|c| c.index)
                    .filter(|index| *index != winner.index)
                    .collect();
                tracing::warn!(%role, winner = winner.index, ?losers, "resolved competing columns");
            }
            profiles[winner.index].assign(role, winner.confidence);
        }
        Ok(())
    }

    fn pick(&self, role: Role, claimants: &[Claim], profiles: &[ColumnProfile]) -> Result<Claim> {
        let profile = |claim: &Claim| &profiles[claim.index];
        let winner = match role {
            Role::Article | Role::Brand => min_by_key_f64(claimants, |c| profile(c).average_length()),
            Role::Quantity => {
                let with_one: Vec<Claim> = claimants
                    .iter()
                    .filter(|c| profile(c).contains_one())
                    .copied()
                    .collect();
                let pool = if with_one.is_empty() {
                    claimants
                } else {
                    with_one.as_slice()
                };
                max_by_key_f64(pool, |c| {
                    profile(c).average_value().unwrap_or(f64::NEG_INFINITY)
                })
            }
            Role::Price => return self.pick_price(claimants, profiles),
            _ => max_by_key_f64(claimants, |c| c.confidence),
        };
        winner.ok_or_else(|| ambiguous(role, claimants))
    }

    fn pick_price(&self, claimants: &[Claim], profiles: &[ColumnProfile]) -> Result<Claim> {
        let header_hit = |claim: &Claim| profiles[claim.index].header_role == Some(Role::Price);
        match self.policy {
            PricePolicy::Surface => Err(ambiguous(Role::Price, claimants)),
            PricePolicy::HeaderEvidence => {
                let hits: Vec<&Claim> = claimants.iter().filter(|c| header_hit(c)).collect();
                match hits.as_slice() {
                    [single] => Ok(**single),
                    _ => Err(ambiguous(Role::Price, claimants)),
                }
            }
            PricePolicy::PlausibleMedian => {
                let mut ranked = claimants.to_vec();
                ranked.sort_by(|a, b| {
                    let plausible = |claim: &Claim| {
                        stats::sample_median(&profiles[claim.index].sampled_values)
                            .is_some_and(|m| stats::in_price_band(m, self.thresholds))
                    };
                    plausible(b)
                        .cmp(&plausible(a))
                        .then_with(|| header_hit(b).cmp(&header_hit(a)))
                        .then_with(|| b.confidence.total_cmp(&a.confidence))
                        .then_with(|| a.index.cmp(&b.index))
                });
                ranked
                    .first()
                    .copied()
                    .ok_or_else(|| ambiguous(Role::Price, claimants))
            }
        }
    }
}

fn ambiguous(role: Role, claimants: &[Claim]) -> MapError {
    MapError::AmbiguousRole {
        role,
        columns: claimants.iter().map(|c| c.index).collect(),
    }
}

/// Smallest key, ties to the lower column index.
fn min_by_key_f64(claims: &[Claim], key: impl Fn(&Claim) -> f64) -> Option<Claim> {
    claims
        .iter()
        .min_by(|a, b| key(a).total_cmp(&key(b)).then_with(|| a.index.cmp(&b.index)))
        .copied()
}

/// Largest key, ties to the lower column index.
fn max_by_key_f64(claims: &[Claim], key: impl Fn(&Claim) -> f64) -> Option<Claim> {
    claims
        .iter()
        .max_by(|a, b| key(a).total_cmp(&key(b)).then_with(|| b.index.cmp(&a.index)))
        .copied()
}
