//! Progress signals consumed by daily tasks, achievements and quests

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{ItemCategory, MinigameCategory};
use crate::engine::Action;

/// Something the player did that counts towards goals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Metric {
    Action(Action),
    UseItem(ItemCategory),
    ShopBuy,
    Minigame(MinigameCategory),
    EventPoints,
}

/// Metric family, without the detail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Action,
    UseItem,
    ShopBuy,
    Minigame,
    EventPoints,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Action => "action",
            Self::UseItem => "use_item",
            Self::ShopBuy => "shop_buy",
            Self::Minigame => "minigame",
            Self::EventPoints => "event_points",
        }
    }
}

impl Metric {
    pub fn kind(&self) -> MetricKind {
        match self {
            Self::Action(_) => MetricKind::Action,
            Self::UseItem(_) => MetricKind::UseItem,
            Self::ShopBuy => MetricKind::ShopBuy,
            Self::Minigame(_) => MetricKind::Minigame,
            Self::EventPoints => MetricKind::EventPoints,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind().as_str();
        match self {
            Self::Action(a) => write!(f, "{kind}:{}", a.as_str()),
            Self::UseItem(c) => write!(f, "{kind}:{}", c.as_str()),
            Self::Minigame(c) => write!(f, "{kind}:{}", c.as_str()),
            Self::ShopBuy | Self::EventPoints => f.write_str(kind),
        }
    }
}

/// What a goal listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "match", content = "metric", rename_all = "snake_case")]
pub enum MetricPattern {
    Exact(Metric),
    /// Any metric of the family
    AnyOf(MetricKind),
}

impl MetricPattern {
    pub fn matches(&self, metric: &Metric) -> bool {
        match self {
            Self::Exact(expected) => expected == metric,
            Self::AnyOf(kind) => metric.kind() == *kind,
        }
    }
}

impl fmt::Display for MetricPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(metric) => metric.fmt(f),
            Self::AnyOf(kind) => write!(f, "{}:any", kind.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_wildcard_matching() {
        let feed = Metric::Action(Action::Feed);
        let wash = Metric::Action(Action::Wash);
        assert!(MetricPattern::Exact(feed).matches(&feed));
        assert!(!MetricPattern::Exact(feed).matches(&wash));
        assert!(MetricPattern::AnyOf(MetricKind::Action).matches(&wash));
        assert!(!MetricPattern::AnyOf(MetricKind::Minigame).matches(&wash));
        assert!(
            MetricPattern::AnyOf(MetricKind::Minigame)
                .matches(&Metric::Minigame(MinigameCategory::Scene3d))
        );
    }

    #[test]
    fn test_display_tags() {
        assert_eq!(Metric::Action(Action::Feed).to_string(), "action:feed");
        assert_eq!(Metric::ShopBuy.to_string(), "shop_buy");
        assert_eq!(MetricPattern::AnyOf(MetricKind::UseItem).to_string(), "use_item:any");
    }
}
