//! Player labels such as `hybrid_s_h_b20`.
//!
//! A label is a policy name followed by underscore-separated tags. Each tag
//! switches on or tunes one search option on top of the configured base.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, bail, Result};
use engine_config::SearchSettings;
use mcts::{PolicyKind, SearchConfig};

/// A parsed player label.
#[derive(Debug, Clone)]
pub struct PlayerSpec {
    pub label: String,
    pub policy: PolicyKind,
    pub config: SearchConfig,
}

impl fmt::Display for PlayerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Search configuration from the config file's `[search]` section, with
/// `limit` as the per-move time limit (or simulation count).
pub fn base_config(settings: &SearchSettings, limit: u64) -> SearchConfig {
    SearchConfig {
        exploration: settings.exploration,
        limit,
        fixed_simulations: settings.fixed_simulations,
        heuristics: settings.heuristics,
        early_termination: settings.early_termination,
        termination_depth: settings.termination_depth,
        termination_threshold: settings.termination_threshold,
        early_term_win_value: settings.early_term_win_value,
        solver: settings.solver,
        node_priors: settings.node_priors,
        prior_visits: settings.prior_visits,
        implicit_minimax: settings.implicit_minimax,
        im_alpha: settings.im_alpha,
        shot_threshold: settings.shot_threshold,
        table_bits: settings.table_bits,
        calibration_simulations: settings.calibration_simulations,
        pack_offset: settings.pack_offset,
        debug: settings.debug,
    }
}

fn number<T: FromStr>(tag: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| anyhow!("bad value '{value}' in tag '{tag}'"))
}

fn apply_tag(config: &mut SearchConfig, tag: &str) -> Result<()> {
    match tag {
        "s" => config.solver = true,
        "h" => config.heuristics = true,
        "f" => config.fixed_simulations = true,
        "d" => config.debug = true,
        "np" => config.node_priors = true,
        "im" => config.implicit_minimax = true,
        _ => {
            if let Some(v) = tag.strip_prefix("ert") {
                config.early_termination = true;
                config.termination_threshold = number(tag, v)?;
            } else if let Some(v) = tag.strip_prefix("et") {
                config.early_termination = true;
                config.termination_depth = number(tag, v)?;
            } else if let Some(v) = tag.strip_prefix("np") {
                config.node_priors = true;
                config.prior_visits = number(tag, v)?;
            } else if let Some(v) = tag.strip_prefix("im") {
                config.implicit_minimax = true;
                config.im_alpha = number(tag, v)?;
            } else if let Some(v) = tag.strip_prefix('c') {
                config.exploration = number(tag, v)?;
            } else if let Some(v) = tag.strip_prefix('b') {
                config.shot_threshold = number(tag, v)?;
            } else {
                bail!("unrecognized tag '{tag}'");
            }
        }
    }
    Ok(())
}

/// Parse `label` on top of `base`.
pub fn parse_label(label: &str, base: &SearchConfig) -> Result<PlayerSpec> {
    let mut parts = label.split('_');
    let policy = parts
        .next()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| anyhow!("empty player label"))?;
    let policy: PolicyKind = policy
        .parse()
        .map_err(|_| anyhow!("unrecognized player '{label}'"))?;

    let mut config = base.clone();
    for tag in parts {
        apply_tag(&mut config, tag)?;
    }
    config
        .validate()
        .map_err(|e| anyhow!("player '{label}': {e}"))?;

    Ok(PlayerSpec {
        label: label.to_string(),
        policy,
        config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> SearchConfig {
        base_config(&SearchSettings::default(), 1000)
    }

    #[test]
    fn test_plain_policies() {
        assert_eq!(parse_label("uct", &base()).unwrap().policy, PolicyKind::Uct);
        assert_eq!(parse_label("shot", &base()).unwrap().policy, PolicyKind::Shot);
        assert_eq!(parse_label("hybrid", &base()).unwrap().policy, PolicyKind::Hybrid);
    }

    #[test]
    fn test_base_config_carries_settings() {
        let config = base();
        assert_eq!(config.limit, 1000);
        assert!((config.exploration - 0.4).abs() < f64::EPSILON);
        assert_eq!(config.shot_threshold, 20);
        assert!(!config.solver);
    }

    #[test]
    fn test_flag_tags() {
        let spec = parse_label("hybrid_s_h_f_d", &base()).unwrap();
        assert!(spec.config.solver);
        assert!(spec.config.heuristics);
        assert!(spec.config.fixed_simulations);
        assert!(spec.config.debug);
        assert_eq!(spec.to_string(), "hybrid_s_h_f_d");
    }

    #[test]
    fn test_valued_tags() {
        let spec = parse_label("uct_et6_ert30_c0.8_b35", &base()).unwrap();
        assert!(spec.config.early_termination);
        assert_eq!(spec.config.termination_depth, 6);
        assert_eq!(spec.config.termination_threshold, 30);
        assert!((spec.config.exploration - 0.8).abs() < f64::EPSILON);
        assert_eq!(spec.config.shot_threshold, 35);
    }

    #[test]
    fn test_prior_and_minimax_tags() {
        let spec = parse_label("uct_np_im", &base()).unwrap();
        assert!(spec.config.node_priors);
        assert_eq!(spec.config.prior_visits, 100);
        assert!(spec.config.implicit_minimax);

        let spec = parse_label("uct_np50_im0.25", &base()).unwrap();
        assert_eq!(spec.config.prior_visits, 50);
        assert!((spec.config.im_alpha - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_bad_labels() {
        assert!(parse_label("", &base()).is_err());
        assert!(parse_label("alphabeta_s", &base()).is_err());
        assert!(parse_label("uct_q", &base()).is_err());
        assert!(parse_label("uct_etx", &base()).is_err());
        // alpha out of range fails validation
        assert!(parse_label("uct_im2", &base()).is_err());
    }
}
