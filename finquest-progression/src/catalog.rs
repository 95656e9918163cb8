use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Achievement grouping. Serialized with the keys stored by the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AchievementCategory {
    #[serde(rename = "economia")]
    Savings,
    #[serde(rename = "investimento")]
    Investment,
    #[serde(rename = "pagamentos")]
    Payments,
    #[serde(rename = "metas")]
    Goals,
}

impl AchievementCategory {
    pub const ALL: [AchievementCategory; 4] = [
        AchievementCategory::Savings,
        AchievementCategory::Investment,
        AchievementCategory::Payments,
        AchievementCategory::Goals,
    ];

    pub fn key(self) -> &'static str {
        match self {
            AchievementCategory::Savings => "economia",
            AchievementCategory::Investment => "investimento",
            AchievementCategory::Payments => "pagamentos",
            AchievementCategory::Goals => "metas",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AchievementCategory::Savings => "Economia",
            AchievementCategory::Investment => "Investimentos",
            AchievementCategory::Payments => "Pagamentos",
            AchievementCategory::Goals => "Metas",
        }
    }

    pub fn badge(self) -> CategoryBadge {
        match self {
            AchievementCategory::Savings => CategoryBadge::Medal,
            AchievementCategory::Investment => CategoryBadge::Trophy,
            AchievementCategory::Payments => CategoryBadge::Star,
            AchievementCategory::Goals => CategoryBadge::Award,
        }
    }

    /// Accepts the stored key or the English variant name, case-insensitive.
    pub fn parse(raw: &str) -> Option<Self> {
        let wanted = raw.trim().to_ascii_lowercase();
        match wanted.as_str() {
            "economia" | "savings" => Some(AchievementCategory::Savings),
            "investimento" | "investment" => Some(AchievementCategory::Investment),
            "pagamentos" | "payments" => Some(AchievementCategory::Payments),
            "metas" | "goals" => Some(AchievementCategory::Goals),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryBadge {
    Medal,
    Trophy,
    Star,
    Award,
}

impl CategoryBadge {
    pub fn name(self) -> &'static str {
        match self {
            CategoryBadge::Medal => "Medalha",
            CategoryBadge::Trophy => "Troféu",
            CategoryBadge::Star => "Estrela",
            CategoryBadge::Award => "Prêmio",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementIcon {
    PiggyBank,
    Wallet,
    Coins,
    Target,
}

impl AchievementIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            AchievementIcon::PiggyBank => "🐷",
            AchievementIcon::Wallet => "👛",
            AchievementIcon::Coins => "🪙",
            AchievementIcon::Target => "🎯",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AchievementDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: AchievementCategory,
    pub icon: AchievementIcon,
    pub max_progress: u32,
    pub xp_reward: u64,
}

pub const ACHIEVEMENTS: &[AchievementDefinition] = &[
    AchievementDefinition {
        id: "primeiro_investimento",
        title: "Primeiro Investimento",
        description: "Faça seu primeiro investimento",
        category: AchievementCategory::Investment,
        icon: AchievementIcon::PiggyBank,
        max_progress: 1,
        xp_reward: 500,
    },
    AchievementDefinition {
        id: "economizador_iniciante",
        title: "Economizador Iniciante",
        description: "Economize 10% do seu salário por 3 meses consecutivos",
        category: AchievementCategory::Savings,
        icon: AchievementIcon::Wallet,
        max_progress: 3,
        xp_reward: 1_000,
    },
    AchievementDefinition {
        id: "pagador_pontual",
        title: "Pagador Pontual",
        description: "Pague 5 contas antes do vencimento",
        category: AchievementCategory::Payments,
        icon: AchievementIcon::Coins,
        max_progress: 5,
        xp_reward: 300,
    },
    AchievementDefinition {
        id: "meta_alcancada",
        title: "Primeira Meta Alcançada",
        description: "Alcance sua primeira meta financeira",
        category: AchievementCategory::Goals,
        icon: AchievementIcon::Target,
        max_progress: 1,
        xp_reward: 800,
    },
    AchievementDefinition {
        id: "investidor_diversificado",
        title: "Investidor Diversificado",
        description: "Tenha investimentos em 3 categorias diferentes",
        category: AchievementCategory::Investment,
        icon: AchievementIcon::PiggyBank,
        max_progress: 3,
        xp_reward: 1_200,
    },
];

/// Read-only view over a static set of achievement definitions.
#[derive(Clone, Copy, Debug)]
pub struct Catalog {
    definitions: &'static [AchievementDefinition],
}

impl Catalog {
    pub const fn new(definitions: &'static [AchievementDefinition]) -> Self {
        Self { definitions }
    }

    pub const fn builtin() -> Self {
        Self::new(ACHIEVEMENTS)
    }

    pub fn get(&self, id: &str) -> Option<&'static AchievementDefinition> {
        self.definitions.iter().find(|definition| definition.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'static, AchievementDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Completion state of every definition given a profile's unlocked ids.
    pub fn progress_for(&self, unlocked: &BTreeSet<String>) -> Vec<AchievementProgress> {
        self.filtered_progress(unlocked, CategoryFilter::All)
    }

    pub fn filtered_progress(
        &self,
        unlocked: &BTreeSet<String>,
        filter: CategoryFilter,
    ) -> Vec<AchievementProgress> {
        self.iter()
            .filter(|definition| filter.matches(definition.category))
            .map(|definition| {
                AchievementProgress::new(definition, unlocked.contains(definition.id))
            })
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AchievementProgress {
    pub definition: &'static AchievementDefinition,
    pub progress: u32,
    pub is_completed: bool,
}

impl AchievementProgress {
    /// Unlocked definitions report full progress, all others report zero.
    pub fn new(definition: &'static AchievementDefinition, unlocked: bool) -> Self {
        let progress = if unlocked { definition.max_progress } else { 0 };
        Self {
            definition,
            progress,
            is_completed: progress == definition.max_progress,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(AchievementCategory),
}

impl CategoryFilter {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" | "todas" => Some(CategoryFilter::All),
            other => AchievementCategory::parse(other).map(CategoryFilter::Only),
        }
    }

    pub fn matches(self, category: AchievementCategory) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

/// Count completed achievements per category. Categories with no completed
/// entries are absent.
pub fn completed_by_category(
    progress: &[AchievementProgress],
) -> BTreeMap<AchievementCategory, usize> {
    let mut counts = BTreeMap::new();
    for entry in progress.iter().filter(|entry| entry.is_completed) {
        *counts.entry(entry.definition.category).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashSet};

    use super::{
        AchievementCategory, Catalog, CategoryBadge, CategoryFilter, completed_by_category,
    };

    fn unlocked(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|id| (*id).to_owned()).collect()
    }

    #[test]
    fn builtin_catalog_is_well_formed() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 5);

        let ids: HashSet<&str> = catalog.iter().map(|definition| definition.id).collect();
        assert_eq!(ids.len(), catalog.len(), "duplicate achievement ids");
        assert!(catalog.iter().all(|definition| definition.max_progress > 0));
    }

    #[test]
    fn looks_up_definitions_by_id() {
        let catalog = Catalog::builtin();
        let definition = catalog.get("pagador_pontual").expect("known id");
        assert_eq!(definition.category, AchievementCategory::Payments);
        assert_eq!(definition.max_progress, 5);
        assert_eq!(definition.xp_reward, 300);
        assert!(catalog.get("nao_existe").is_none());
    }

    #[test]
    fn completion_follows_membership() {
        let catalog = Catalog::builtin();
        let progress = catalog.progress_for(&unlocked(&["economizador_iniciante"]));

        for entry in &progress {
            if entry.definition.id == "economizador_iniciante" {
                assert!(entry.is_completed);
                assert_eq!(entry.progress, 3);
            } else {
                assert!(!entry.is_completed);
                assert_eq!(entry.progress, 0);
            }
        }
    }

    #[test]
    fn counts_completed_per_category() {
        let catalog = Catalog::builtin();
        let progress = catalog.progress_for(&unlocked(&[
            "primeiro_investimento",
            "investidor_diversificado",
            "economizador_iniciante",
        ]));

        let counts = completed_by_category(&progress);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.get(&AchievementCategory::Investment), Some(&2));
        assert_eq!(counts.get(&AchievementCategory::Savings), Some(&1));

        let json = serde_json::to_value(&counts).expect("serialize counts");
        assert_eq!(json, serde_json::json!({ "investimento": 2, "economia": 1 }));
    }

    #[test]
    fn filters_by_category() {
        let catalog = Catalog::builtin();
        let none = BTreeSet::new();

        let investments = catalog.filtered_progress(
            &none,
            CategoryFilter::Only(AchievementCategory::Investment),
        );
        assert_eq!(investments.len(), 2);
        assert_eq!(catalog.filtered_progress(&none, CategoryFilter::All).len(), 5);
    }

    #[test]
    fn parses_category_filters() {
        assert_eq!(CategoryFilter::parse("todas"), Some(CategoryFilter::All));
        assert_eq!(CategoryFilter::parse("ALL"), Some(CategoryFilter::All));
        assert_eq!(
            CategoryFilter::parse("metas"),
            Some(CategoryFilter::Only(AchievementCategory::Goals))
        );
        assert_eq!(
            CategoryFilter::parse(" Savings "),
            Some(CategoryFilter::Only(AchievementCategory::Savings))
        );
        assert_eq!(CategoryFilter::parse("bogus"), None);
    }

    #[test]
    fn every_category_has_a_badge() {
        assert_eq!(AchievementCategory::Investment.badge(), CategoryBadge::Trophy);
        assert_eq!(AchievementCategory::Savings.badge(), CategoryBadge::Medal);
        for category in AchievementCategory::ALL {
            assert!(!category.label().is_empty());
            assert_eq!(AchievementCategory::parse(category.key()), Some(category));
        }
    }
}
