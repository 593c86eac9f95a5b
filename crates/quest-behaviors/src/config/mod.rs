//! EscortGroup configuration.
//!
//! A [`BehaviorElement`] is the declarative form handed over by the profile
//! loader: string attributes plus an optional list of search-path hotspots.
//! [`EscortConfig::from_element`] turns it into a typed, validated
//! configuration, collecting every problem before giving up.
//!
//! # Attributes
//!
//! | Attribute | Domain | Default |
//! |---|---|---|
//! | `StartNpcIdN` | mob id ≥ 1 | none |
//! | `StartEscortGossipOptions` | 1..=10, comma list | interact only |
//! | `EscortNpcIdN` | mob id ≥ 1, at least one | required |
//! | `EscortCountMax` | 1..=100 | 100 |
//! | `EscortCompleteWhen` | [`EscortCompleteWhen`] | `QuestComplete` |
//! | `EscortCompleteX/Y/Z` | non-zero point | none |
//! | `EscortCompleteMaxRange` | 1.0..=100.0 | 10.0 |
//! | `CombatMaxEngagementRangeDistance` | 1.0..=40.0 | 23.0 |
//! | `DebugReportUnitsOutOfRange` | bool | false |
//! | `EscortMaxFightDistance` | 5.0..=100.0 | 27.0 |
//! | `EscortMaxFollowDistance` | 3.0..=100.0 | 15.0 |
//! | `PriorityTargetIdN` | mob id ≥ 1 | none |
//! | `SearchForNpcsRadius` | 1.0..=100.0 | 75.0 |
//! | `NonCompeteDistance` | 0.0..=50.0 | 20.0 |
//! | `QuestId` | quest id ≥ 1 | none |
//! | `QuestObjectiveIndex` | 1..=5 | none |
//! | `QuestCompleteRequirement` | [`QuestCompleteRequirement`] | `NotComplete` |
//! | `QuestInLogRequirement` | [`QuestInLogRequirement`] | `InLog` |

mod attributes;

use std::collections::BTreeMap;

use bot_core::{NpcId, QuestId, QuestLog, Vec3};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::warn;

use crate::error::{ConfigError, ConfigIssue};
use crate::path::parse_hotspots;
use attributes::AttributeReader;

/// Declarative behavior element as produced by the profile loader.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BehaviorElement {
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Hotspot elements, each with `X`, `Y` and `Z` attributes.
    #[serde(default)]
    pub search_path: Vec<BTreeMap<String, String>>,
}

impl BehaviorElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.insert(name.into(), value.to_string());
        self
    }

    pub fn with_hotspot(mut self, x: f32, y: f32, z: f32) -> Self {
        let hotspot = [("X", x), ("Y", y), ("Z", z)]
            .into_iter()
            .map(|(axis, value)| (axis.to_owned(), value.to_string()))
            .collect();
        self.search_path.push(hotspot);
        self
    }
}

/// When the escort counts as done.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum EscortCompleteWhen {
    DestinationReached,
    QuestComplete,
    /// Quest complete, or the escort failed; failure ends the behavior.
    QuestCompleteOrFails,
    QuestObjectiveComplete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum QuestCompleteRequirement {
    NotComplete,
    Complete,
    Any,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum QuestInLogRequirement {
    InLog,
    NotInLog,
    Any,
}

/// The quest a behavior is bound to, and when the behavior should run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuestBinding {
    pub quest_id: Option<QuestId>,
    /// 1-based objective index.
    pub objective_index: Option<u8>,
    pub complete_requirement: QuestCompleteRequirement,
    pub in_log_requirement: QuestInLogRequirement,
}

impl Default for QuestBinding {
    fn default() -> Self {
        Self {
            quest_id: None,
            objective_index: None,
            complete_requirement: QuestCompleteRequirement::NotComplete,
            in_log_requirement: QuestInLogRequirement::InLog,
        }
    }
}

impl QuestBinding {
    /// True when the quest log satisfies the run requirements.
    ///
    /// Behaviors without a quest always run.
    pub fn requirements_met<Q: QuestLog + ?Sized>(&self, quests: &Q) -> bool {
        let Some(id) = self.quest_id else {
            return true;
        };
        let quest = quests.quest(id);

        let in_log_ok = match self.in_log_requirement {
            QuestInLogRequirement::InLog => quest.is_some(),
            QuestInLogRequirement::NotInLog => quest.is_none(),
            QuestInLogRequirement::Any => true,
        };
        let completion_ok = quest.as_ref().is_none_or(|q| match self.complete_requirement {
            QuestCompleteRequirement::NotComplete => !q.completed,
            QuestCompleteRequirement::Complete => q.completed,
            QuestCompleteRequirement::Any => true,
        });
        in_log_ok && completion_ok
    }
}

/// Typed EscortGroup configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct EscortConfig {
    pub start_npc_ids: Vec<NpcId>,
    /// Zero-based dialog options, in selection order. Empty means the start
    /// NPC only needs to be interacted with.
    pub start_gossip_options: Vec<usize>,
    pub escort_npc_ids: Vec<NpcId>,
    pub escort_count_max: usize,
    pub complete_when: EscortCompleteWhen,
    /// Destination for [`EscortCompleteWhen::DestinationReached`]; zero when unset.
    pub complete_location: Vec3,
    pub complete_max_range: f32,
    pub combat_max_engagement_range: f32,
    pub debug_report_units_out_of_range: bool,
    pub max_fight_distance: f32,
    pub max_follow_distance: f32,
    pub priority_target_ids: Vec<NpcId>,
    pub search_radius: f32,
    pub non_compete_distance: f32,
    pub quest: QuestBinding,
    /// Parsed hotspots; empty means "search from where the behavior started".
    pub search_path: Vec<Vec3>,
}

impl EscortConfig {
    pub const DEFAULT_COUNT_MAX: usize = 100;
    pub const DEFAULT_COMPLETE_MAX_RANGE: f32 = 10.0;
    pub const DEFAULT_ENGAGEMENT_RANGE: f32 = 23.0;
    pub const DEFAULT_FIGHT_DISTANCE: f32 = 27.0;
    pub const DEFAULT_FOLLOW_DISTANCE: f32 = 15.0;
    pub const DEFAULT_SEARCH_RADIUS: f32 = 75.0;
    pub const DEFAULT_NON_COMPETE_DISTANCE: f32 = 20.0;

    /// Defaults for everything but the escorted NPCs.
    pub fn new(escort_npc_ids: Vec<NpcId>) -> Self {
        Self {
            start_npc_ids: Vec::new(),
            start_gossip_options: Vec::new(),
            escort_npc_ids,
            escort_count_max: Self::DEFAULT_COUNT_MAX,
            complete_when: EscortCompleteWhen::QuestComplete,
            complete_location: Vec3::ZERO,
            complete_max_range: Self::DEFAULT_COMPLETE_MAX_RANGE,
            combat_max_engagement_range: Self::DEFAULT_ENGAGEMENT_RANGE,
            debug_report_units_out_of_range: false,
            max_fight_distance: Self::DEFAULT_FIGHT_DISTANCE,
            max_follow_distance: Self::DEFAULT_FOLLOW_DISTANCE,
            priority_target_ids: Vec::new(),
            search_radius: Self::DEFAULT_SEARCH_RADIUS,
            non_compete_distance: Self::DEFAULT_NON_COMPETE_DISTANCE,
            quest: QuestBinding::default(),
            search_path: Vec::new(),
        }
    }

    /// Parses and validates a behavior element.
    ///
    /// Unrecognized attributes are logged and otherwise ignored.
    pub fn from_element(element: &BehaviorElement) -> Result<Self, ConfigError> {
        let mut reader = AttributeReader::new(&element.attributes);
        let mob_id = 1..=u32::MAX;

        let start_npc_ids = reader.numbered("StartNpcId", 0, mob_id.clone());
        let start_gossip_options = reader
            .list::<usize>("StartEscortGossipOptions", 1..=10)
            .into_iter()
            .map(|option| option - 1)
            .collect();
        let escort_npc_ids = reader.numbered("EscortNpcId", 1, mob_id.clone());
        let priority_target_ids = reader.numbered("PriorityTargetId", 0, mob_id);

        let mut config = Self::new(escort_npc_ids.into_iter().map(NpcId).collect());
        config.start_npc_ids = start_npc_ids.into_iter().map(NpcId).collect();
        config.start_gossip_options = start_gossip_options;
        config.priority_target_ids = priority_target_ids.into_iter().map(NpcId).collect();

        config.escort_count_max = reader
            .ranged("EscortCountMax", 1..=100)
            .unwrap_or(Self::DEFAULT_COUNT_MAX);
        config.complete_when = reader.choice("EscortCompleteWhen", config.complete_when);
        config.complete_location = reader.vector("EscortComplete").unwrap_or(Vec3::ZERO);
        config.complete_max_range = reader
            .ranged("EscortCompleteMaxRange", 1.0..=100.0)
            .unwrap_or(Self::DEFAULT_COMPLETE_MAX_RANGE);
        config.combat_max_engagement_range = reader
            .ranged("CombatMaxEngagementRangeDistance", 1.0..=40.0)
            .unwrap_or(Self::DEFAULT_ENGAGEMENT_RANGE);
        config.debug_report_units_out_of_range = reader.flag("DebugReportUnitsOutOfRange", false);
        config.max_fight_distance = reader
            .ranged("EscortMaxFightDistance", 5.0..=100.0)
            .unwrap_or(Self::DEFAULT_FIGHT_DISTANCE);
        config.max_follow_distance = reader
            .ranged("EscortMaxFollowDistance", 3.0..=100.0)
            .unwrap_or(Self::DEFAULT_FOLLOW_DISTANCE);
        config.search_radius = reader
            .ranged("SearchForNpcsRadius", 1.0..=100.0)
            .unwrap_or(Self::DEFAULT_SEARCH_RADIUS);
        config.non_compete_distance = reader
            .ranged("NonCompeteDistance", 0.0..=50.0)
            .unwrap_or(Self::DEFAULT_NON_COMPETE_DISTANCE);

        config.quest = QuestBinding {
            quest_id: reader.ranged("QuestId", 1..=u32::MAX).map(QuestId),
            objective_index: reader.ranged("QuestObjectiveIndex", 1..=5),
            complete_requirement: reader
                .choice("QuestCompleteRequirement", QuestCompleteRequirement::NotComplete),
            in_log_requirement: reader.choice("QuestInLogRequirement", QuestInLogRequirement::InLog),
        };

        for name in reader.unrecognized() {
            warn!(attribute = name, "unrecognized EscortGroup attribute ignored");
        }

        let (search_path, waypoint_issues) = parse_hotspots(&element.search_path);
        config.search_path = search_path;

        let mut issues = reader.into_issues();
        issues.extend(waypoint_issues);
        issues.extend(config.coherency_issues());
        ConfigError::check(issues)?;
        Ok(config)
    }

    /// Checks that the settings make sense together.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check(self.coherency_issues())
    }

    fn coherency_issues(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        let mut incoherent = |message: String| issues.push(ConfigIssue::Incoherent(message));
        let quest_id = self.quest.quest_id;

        if self.escort_npc_ids.is_empty() {
            incoherent("at least one EscortNpcIdN must be specified".into());
        }
        if !self.start_gossip_options.is_empty() && self.start_npc_ids.is_empty() {
            incoherent(
                "If StartEscortGossipOptions are specified, you must also specify one or more StartNpcIdN"
                    .into(),
            );
        }
        if self.max_fight_distance < self.max_follow_distance {
            incoherent(format!(
                "EscortMaxFightDistance({}) must be greater than or equal to EscortMaxFollowDistance({})",
                self.max_fight_distance, self.max_follow_distance
            ));
        }
        if self.complete_when == EscortCompleteWhen::DestinationReached
            && self.complete_location.is_zero()
        {
            incoherent(
                "With a EscortCompleteWhen argument of DestinationReached, you must specify EscortCompleteX/EscortCompleteY/EscortCompleteZ arguments"
                    .into(),
            );
        }
        if self.complete_when == EscortCompleteWhen::QuestComplete && quest_id.is_none() {
            incoherent(
                "With a EscortCompleteWhen argument of QuestComplete, you must specify a QuestId argument"
                    .into(),
            );
        }
        if quest_id.is_none() && self.complete_when != EscortCompleteWhen::DestinationReached {
            incoherent("When no QuestId is specified, EscortCompleteWhen must be DestinationReached".into());
        }
        if self.complete_when == EscortCompleteWhen::QuestObjectiveComplete
            && (quest_id.is_none() || self.quest.objective_index.is_none())
        {
            incoherent(
                "With an EscortCompleteWhen argument of QuestObjectiveComplete, you must specify both QuestId and QuestObjectiveIndex arguments"
                    .into(),
            );
        }
        if self.quest.objective_index.is_some()
            && self.complete_when != EscortCompleteWhen::QuestObjectiveComplete
        {
            incoherent(
                "The QuestObjectiveIndex argument should not be specified unless EscortCompleteWhen is QuestObjectiveComplete"
                    .into(),
            );
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escort_element() -> BehaviorElement {
        BehaviorElement::new()
            .with("EscortNpcId", 200)
            .with("QuestId", 31091)
    }

    #[test]
    fn defaults_apply_when_absent() {
        let config = EscortConfig::from_element(&escort_element()).unwrap();
        assert_eq!(config.escort_npc_ids, vec![NpcId(200)]);
        assert_eq!(config.escort_count_max, 100);
        assert_eq!(config.complete_when, EscortCompleteWhen::QuestComplete);
        assert_eq!(config.max_fight_distance, 27.0);
        assert_eq!(config.max_follow_distance, 15.0);
        assert_eq!(config.search_radius, 75.0);
        assert!(config.start_gossip_options.is_empty());
        assert!(config.search_path.is_empty());
    }

    #[test]
    fn gossip_options_become_zero_based() {
        let element = escort_element()
            .with("StartNpcId", 100)
            .with("StartEscortGossipOptions", "1,2");
        let config = EscortConfig::from_element(&element).unwrap();
        assert_eq!(config.start_npc_ids, vec![NpcId(100)]);
        assert_eq!(config.start_gossip_options, vec![0, 1]);
    }

    #[test]
    fn fight_closer_than_follow_is_rejected() {
        let element = escort_element()
            .with("EscortMaxFightDistance", 10)
            .with("EscortMaxFollowDistance", 20);
        let err = EscortConfig::from_element(&element).unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert!(err.to_string().contains("EscortMaxFightDistance(10)"));
    }

    #[test]
    fn every_problem_is_collected() {
        let element = BehaviorElement::new()
            .with("EscortCountMax", 0)
            .with("EscortCompleteWhen", "Sometime")
            .with("StartEscortGossipOptions", "1")
            .with_hotspot(1.0, 2.0, 3.0);
        let mut element = element;
        element
            .search_path
            .push([("X".to_owned(), "a".to_owned())].into_iter().collect());

        let err = EscortConfig::from_element(&element).unwrap_err();
        let issues = &err.issues;
        assert!(issues.contains(&ConfigIssue::Missing {
            name: "EscortNpcId1".into()
        }));
        assert!(issues.iter().any(|i| matches!(i, ConfigIssue::OutOfRange { name, .. } if name == "EscortCountMax")));
        assert!(issues.iter().any(|i| matches!(i, ConfigIssue::Unparsable { name, .. } if name == "EscortCompleteWhen")));
        assert!(issues.iter().any(|i| matches!(i, ConfigIssue::Waypoint { index: 1, .. })));
        assert!(issues.iter().any(|i| matches!(i, ConfigIssue::Incoherent(m) if m.contains("StartNpcIdN"))));
        assert!(issues.iter().any(|i| matches!(i, ConfigIssue::Incoherent(m) if m.contains("no QuestId"))));
    }

    #[test]
    fn destination_reached_needs_location() {
        let element = BehaviorElement::new()
            .with("EscortNpcId", 200)
            .with("EscortCompleteWhen", "destinationreached");
        let err = EscortConfig::from_element(&element).unwrap_err();
        assert_eq!(err.issues.len(), 1);

        let element = element
            .with("EscortCompleteX", 100.5)
            .with("EscortCompleteY", -20)
            .with("EscortCompleteZ", 3);
        let config = EscortConfig::from_element(&element).unwrap();
        assert_eq!(config.complete_location, Vec3::new(100.5, -20.0, 3.0));
    }

    #[test]
    fn objective_index_requires_objective_criterion() {
        let element = escort_element().with("QuestObjectiveIndex", 1);
        let err = EscortConfig::from_element(&element).unwrap_err();
        assert_eq!(err.issues.len(), 1);

        let element = element.with("EscortCompleteWhen", "QuestObjectiveComplete");
        let config = EscortConfig::from_element(&element).unwrap();
        assert_eq!(config.quest.objective_index, Some(1));
    }

    #[test]
    fn element_reads_from_ron() {
        let text = r#"(
            attributes: {
                "EscortNpcId": "200",
                "QuestId": "31091",
                "SearchForNpcsRadius": "40",
            },
            search_path: [
                { "X": "1", "Y": "2", "Z": "3" },
            ],
        )"#;
        let element: BehaviorElement = ron::from_str(text).unwrap();
        let config = EscortConfig::from_element(&element).unwrap();
        assert_eq!(config.search_radius, 40.0);
        assert_eq!(config.search_path, vec![Vec3::new(1.0, 2.0, 3.0)]);
    }

    #[test]
    fn requirements_gate_on_quest_log() {
        use bot_core::QuestRecord;

        struct Log(Option<QuestRecord>);
        impl QuestLog for Log {
            fn quest(&self, _id: QuestId) -> Option<QuestRecord> {
                self.0.clone()
            }
        }

        let binding = QuestBinding {
            quest_id: Some(QuestId(7)),
            ..QuestBinding::default()
        };
        let mut record = QuestRecord::new(QuestId(7), "Escort", 1);
        assert!(binding.requirements_met(&Log(Some(record.clone()))));
        assert!(!binding.requirements_met(&Log(None)));

        record.completed = true;
        assert!(!binding.requirements_met(&Log(Some(record))));
        assert!(QuestBinding::default().requirements_met(&Log(None)));
    }
}
