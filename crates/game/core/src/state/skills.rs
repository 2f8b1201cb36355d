//! Skill levels and experience.

use std::collections::BTreeMap;

use crate::config::GameConfig;
use crate::fixed::FixedPoint;
use crate::ids::SkillId;

/// XP needed to advance from each level to the next.
///
/// `xp_for_next(level) = floor(xp_base * (1 + growth%)^(level - 1))`, built
/// once with FixedPoint compounding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XpTable {
    requirements: Vec<FixedPoint>,
}

impl XpTable {
    pub fn from_config(config: &GameConfig) -> Self {
        let max_level = config.max_level.max(1);
        let growth = FixedPoint::ONE + config.xp_growth_percent.div_int(100);
        let mut requirements = Vec::with_capacity(max_level as usize);
        let mut current = config.xp_base;
        for _ in 1..max_level {
            requirements.push(current.floor_whole().max(FixedPoint::ONE));
            current = current.mul(growth);
        }
        Self { requirements }
    }

    pub fn max_level(&self) -> u32 {
        self.requirements.len() as u32 + 1
    }

    /// `None` at or above the max level.
    pub fn xp_for_next(&self, level: u32) -> Option<FixedPoint> {
        let index = level.checked_sub(1)? as usize;
        self.requirements.get(index).copied()
    }
}

impl Default for XpTable {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillProgress {
    pub level: u32,
    /// XP earned toward the next level.
    pub xp: FixedPoint,
}

impl Default for SkillProgress {
    fn default() -> Self {
        Self {
            level: 1,
            xp: FixedPoint::ZERO,
        }
    }
}

/// Read-only view of one skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SkillSnapshot {
    pub level: u32,
    pub xp: FixedPoint,
    /// `None` at max level.
    pub remaining_xp_for_upgrade: Option<FixedPoint>,
}

/// Levels and XP for every skill that has earned any.
///
/// Skills never touched are level 1 with no XP.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SkillBook {
    table: XpTable,
    skills: BTreeMap<SkillId, SkillProgress>,
}

impl SkillBook {
    pub fn new(table: XpTable) -> Self {
        Self {
            table,
            skills: BTreeMap::new(),
        }
    }

    pub fn table(&self) -> &XpTable {
        &self.table
    }

    pub fn get_skill_level(&self, skill_id: &SkillId) -> u32 {
        self.progress(skill_id).level
    }

    pub fn get_skill(&self, skill_id: &SkillId) -> SkillSnapshot {
        let progress = self.progress(skill_id);
        SkillSnapshot {
            level: progress.level,
            xp: progress.xp,
            remaining_xp_for_upgrade: self
                .table
                .xp_for_next(progress.level)
                .map(|need| need.saturating_sub(progress.xp).max(FixedPoint::ZERO)),
        }
    }

    /// Adds XP and returns the number of levels gained.
    ///
    /// Non-positive amounts are ignored. XP past the max level keeps
    /// accumulating without further level-ups.
    pub fn add_skill_xp(&mut self, skill_id: &SkillId, xp: FixedPoint) -> u32 {
        if !xp.is_positive() {
            return 0;
        }
        let progress = self.skills.entry(skill_id.clone()).or_default();
        progress.xp = progress.xp.saturating_add(xp);

        let mut gained = 0;
        while let Some(need) = self.table.xp_for_next(progress.level) {
            if progress.xp < need {
                break;
            }
            progress.xp -= need;
            progress.level += 1;
            gained += 1;
        }
        gained
    }

    /// Adds XP given as a raw, already-scaled FixedPoint value.
    pub fn add_skill_xp_raw(&mut self, skill_id: &SkillId, raw: i64) -> u32 {
        self.add_skill_xp(skill_id, FixedPoint::from_raw(raw))
    }

    /// Overwrites a skill's progress; used when restoring a snapshot.
    pub fn set_progress(&mut self, skill_id: &SkillId, progress: SkillProgress) {
        let level = progress.level.clamp(1, self.table.max_level());
        self.skills.insert(
            skill_id.clone(),
            SkillProgress {
                level,
                xp: progress.xp,
            },
        );
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SkillId, SkillSnapshot)> {
        self.skills.keys().map(|id| (id, self.get_skill(id)))
    }

    fn progress(&self, skill_id: &SkillId) -> SkillProgress {
        self.skills.get(skill_id).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> SkillBook {
        SkillBook::new(XpTable::default())
    }

    #[test]
    fn table_compounds_and_floors() {
        let table = XpTable::default();
        assert_eq!(table.xp_for_next(1), Some(FixedPoint::from_int(100)));
        assert_eq!(table.xp_for_next(2), Some(FixedPoint::from_int(110)));
        assert_eq!(table.xp_for_next(3), Some(FixedPoint::from_int(121)));
        // 133.1 floors to 133
        assert_eq!(table.xp_for_next(4), Some(FixedPoint::from_int(133)));
        assert_eq!(table.max_level(), 99);
        assert_eq!(table.xp_for_next(99), None);
        assert_eq!(table.xp_for_next(0), None);
    }

    #[test]
    fn xp_carries_over_levels() {
        let mut book = book();
        let skill = SkillId::new("mining");
        assert_eq!(book.add_skill_xp(&skill, FixedPoint::from_int(215)), 2);
        let snap = book.get_skill(&skill);
        assert_eq!(snap.level, 3);
        assert_eq!(snap.xp, FixedPoint::from_int(5));
        assert_eq!(snap.remaining_xp_for_upgrade, Some(FixedPoint::from_int(116)));
    }

    #[test]
    fn raw_xp_is_not_rescaled() {
        let mut book = book();
        let skill = SkillId::new("mining");
        book.add_skill_xp_raw(&skill, 1500);
        assert_eq!(book.get_skill(&skill).xp, FixedPoint::from_raw(1500));
    }

    #[test]
    fn max_level_has_no_remaining() {
        let config = GameConfig {
            max_level: 2,
            ..GameConfig::default()
        };
        let mut book = SkillBook::new(XpTable::from_config(&config));
        let skill = SkillId::new("mining");
        assert_eq!(book.add_skill_xp(&skill, FixedPoint::from_int(1000)), 1);
        assert_eq!(book.get_skill(&skill).remaining_xp_for_upgrade, None);
    }

    #[test]
    fn unknown_skill_is_level_one() {
        let book = book();
        assert_eq!(book.get_skill_level(&SkillId::new("x")), 1);
    }
}
