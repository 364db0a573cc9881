/// Content preference filter.

use serde::{Deserialize, Serialize};

use crate::schema::event::{ContentWarning, Event, EventCategory, MaturityLevel};

/// One user-facing content toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceKey {
    SubstanceAbuse,
    SexualContent,
    CriminalActivity,
    PsychologicalThemes,
    Violence,
    ExplicitLanguage,
}

impl PreferenceKey {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SubstanceAbuse => "substance_abuse",
            Self::SexualContent => "sexual_content",
            Self::CriminalActivity => "criminal_activity",
            Self::PsychologicalThemes => "psychological_themes",
            Self::Violence => "violence",
            Self::ExplicitLanguage => "explicit_language",
        }
    }

    pub fn for_category(category: EventCategory) -> Option<PreferenceKey> {
        match category {
            EventCategory::SubstanceAbuse => Some(Self::SubstanceAbuse),
            EventCategory::Corruption | EventCategory::Criminal => Some(Self::CriminalActivity),
            EventCategory::PsychologicalHorror | EventCategory::MentalHealth => {
                Some(Self::PsychologicalThemes)
            }
            EventCategory::Violence => Some(Self::Violence),
            EventCategory::Sexual => Some(Self::SexualContent),
            EventCategory::General | EventCategory::Industry => None,
        }
    }

    pub fn for_warning(warning: ContentWarning) -> PreferenceKey {
        match warning {
            ContentWarning::DrugUse
            | ContentWarning::AlcoholAbuse
            | ContentWarning::Addiction
            | ContentWarning::Overdose => Self::SubstanceAbuse,
            ContentWarning::Violence => Self::Violence,
            ContentWarning::CriminalActivity => Self::CriminalActivity,
            ContentWarning::SexualContent => Self::SexualContent,
            ContentWarning::SelfHarm | ContentWarning::MentalHealth => Self::PsychologicalThemes,
            ContentWarning::StrongLanguage => Self::ExplicitLanguage,
        }
    }
}

/// Toggles the user has switched on. Anything left out of a config file is off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPreferences {
    #[serde(default)]
    pub substance_abuse: bool,
    #[serde(default)]
    pub sexual_content: bool,
    #[serde(default)]
    pub criminal_activity: bool,
    #[serde(default)]
    pub psychological_themes: bool,
    #[serde(default)]
    pub violence: bool,
    #[serde(default)]
    pub explicit_language: bool,
}

impl ContentPreferences {
    /// Everything enabled.
    pub fn all() -> Self {
        Self {
            substance_abuse: true,
            sexual_content: true,
            criminal_activity: true,
            psychological_themes: true,
            violence: true,
            explicit_language: true,
        }
    }

    pub fn allows(&self, key: PreferenceKey) -> bool {
        match key {
            PreferenceKey::SubstanceAbuse => self.substance_abuse,
            PreferenceKey::SexualContent => self.sexual_content,
            PreferenceKey::CriminalActivity => self.criminal_activity,
            PreferenceKey::PsychologicalThemes => self.psychological_themes,
            PreferenceKey::Violence => self.violence,
            PreferenceKey::ExplicitLanguage => self.explicit_language,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_maturity")]
    pub maturity: MaturityLevel,
    #[serde(default)]
    pub preferences: ContentPreferences,
}

fn default_maturity() -> MaturityLevel {
    MaturityLevel::Teen
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            maturity: default_maturity(),
            preferences: ContentPreferences::default(),
        }
    }
}

/// Why an event was held back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    Maturity,
    Category(PreferenceKey),
    Warning(ContentWarning, PreferenceKey),
}

/// First rule that blocks `event`, or `None` if it may be shown.
pub fn block_reason(event: &Event, settings: &ContentSettings) -> Option<BlockReason> {
    if !settings.enabled {
        return None;
    }

    // Psychological themes are less graphic, so they skip the maturity gate only.
    if event.maturity == MaturityLevel::Mature
        && settings.maturity == MaturityLevel::Teen
        && !event.category.is_psychological()
    {
        return Some(BlockReason::Maturity);
    }

    if let Some(key) = PreferenceKey::for_category(event.category) {
        if !settings.preferences.allows(key) {
            return Some(BlockReason::Category(key));
        }
    }

    event.content_warnings.iter().find_map(|w| {
        let key = PreferenceKey::for_warning(*w);
        (!settings.preferences.allows(key)).then_some(BlockReason::Warning(*w, key))
    })
}

pub fn should_show_event(event: &Event, settings: &ContentSettings) -> bool {
    block_reason(event, settings).is_none()
}
