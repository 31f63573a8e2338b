//! Questionnaire options, the answer set, and the profile document payload.

use serde::{Deserialize, Serialize};

/// One selectable option of a questionnaire step.
pub trait Choice: Copy + Eq + Sized + 'static {
    /// Every option, in display order.
    const ALL: &'static [Self];

    /// Stable tag stored in the profile document.
    fn tag(&self) -> &'static str;

    /// Card title.
    fn label(&self) -> &'static str;

    /// Card subtitle.
    fn description(&self) -> &'static str;

    fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.tag() == tag)
    }
}

/// Step 0 — which role describes the user best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtistRole {
    #[serde(rename = "artista-formador")]
    Trainer,
    #[serde(rename = "artista-quintaesencia")]
    Resident,
    #[serde(rename = "artista-colaborador")]
    Collaborator,
    #[serde(rename = "combinacion-roles")]
    Combined,
    #[serde(rename = "explorador-apreciador")]
    Explorer,
    /// Free-text role; requires `AnswerSet::custom_role_text`.
    #[serde(rename = "otro-rol")]
    Other,
}

impl ArtistRole {
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Other)
    }

    /// Headline used on the summary step.
    pub fn summary_label(&self) -> &'static str {
        match self {
            Self::Trainer => "Artista Formador",
            Self::Resident => "Artista Quintaesencia",
            Self::Collaborator => "Artista Colaborador",
            Self::Combined => "Artista con combinación de roles",
            Self::Explorer => "Apreciador y explorador de arte",
            Self::Other => "Artista con rol personalizado",
        }
    }
}

impl Choice for ArtistRole {
    const ALL: &'static [Self] = &[
        Self::Trainer,
        Self::Resident,
        Self::Collaborator,
        Self::Combined,
        Self::Explorer,
        Self::Other,
    ];

    fn tag(&self) -> &'static str {
        match self {
            Self::Trainer => "artista-formador",
            Self::Resident => "artista-quintaesencia",
            Self::Collaborator => "artista-colaborador",
            Self::Combined => "combinacion-roles",
            Self::Explorer => "explorador-apreciador",
            Self::Other => "otro-rol",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Trainer => "Artista Formador",
            Self::Resident => "Artista Quintaesencia",
            Self::Collaborator => "Artista Colaborador",
            Self::Combined => "Combinación de roles",
            Self::Explorer => "Apreciador / Explorador",
            Self::Other => "Otro rol",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::Trainer => "Quiero impartir talleres.",
            Self::Resident => "Parte activa de la galería.",
            Self::Collaborator => "Eventos puntuales.",
            Self::Combined => "Formador, colaborador...",
            Self::Explorer => "Solo exploro.",
            Self::Other => "Mentor, coleccionista...",
        }
    }
}

/// Step 1 — how the user wants to contribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Contribution {
    #[serde(rename = "formador-talleres-mentorias")]
    WorkshopsAndMentoring,
    #[serde(rename = "quintaesencia-exhibir-vender")]
    ExhibitAndSell,
    #[serde(rename = "colaborador-proyectos-especificos")]
    SpecificProjects,
    #[serde(rename = "formador-cursos-extensos")]
    LongCourses,
    #[serde(rename = "quintaesencia-exposiciones-mensuales")]
    MonthlyExhibitions,
    #[serde(rename = "colaborador-contenido-puntual")]
    OneOffContent,
}

impl Choice for Contribution {
    const ALL: &'static [Self] = &[
        Self::WorkshopsAndMentoring,
        Self::ExhibitAndSell,
        Self::SpecificProjects,
        Self::LongCourses,
        Self::MonthlyExhibitions,
        Self::OneOffContent,
    ];

    fn tag(&self) -> &'static str {
        match self {
            Self::WorkshopsAndMentoring => "formador-talleres-mentorias",
            Self::ExhibitAndSell => "quintaesencia-exhibir-vender",
            Self::SpecificProjects => "colaborador-proyectos-especificos",
            Self::LongCourses => "formador-cursos-extensos",
            Self::MonthlyExhibitions => "quintaesencia-exposiciones-mensuales",
            Self::OneOffContent => "colaborador-contenido-puntual",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::WorkshopsAndMentoring => "Compartir",
            Self::ExhibitAndSell => "Exhibir",
            Self::SpecificProjects => "Colaborar",
            Self::LongCourses => "Formar",
            Self::MonthlyExhibitions => "Vender",
            Self::OneOffContent => "Crear",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::WorkshopsAndMentoring => "Talleres y mentorías.",
            Self::ExhibitAndSell => "Galería virtual.",
            Self::SpecificProjects => "Proyectos específicos.",
            Self::LongCourses => "Cursos extensos.",
            Self::MonthlyExhibitions => "Exposiciones mensuales.",
            Self::OneOffContent => "Redes o eventos.",
        }
    }
}

/// Step 2 — preferred kind of agreement with the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Agreement {
    #[serde(rename = "convenio-taller-mentoria")]
    WorkshopMentoring,
    #[serde(rename = "convenio-exhibicion-venta")]
    ExhibitionSale,
    #[serde(rename = "convenio-colaboracion-puntual")]
    OneOffCollaboration,
    #[serde(rename = "convenio-mixto-mentoria-exposicion")]
    Mixed,
    #[serde(rename = "convenio-solo-eventos")]
    EventsOnly,
    #[serde(rename = "sin-convenio-suscripcion")]
    NoAgreement,
}

impl Choice for Agreement {
    const ALL: &'static [Self] = &[
        Self::WorkshopMentoring,
        Self::ExhibitionSale,
        Self::OneOffCollaboration,
        Self::Mixed,
        Self::EventsOnly,
        Self::NoAgreement,
    ];

    fn tag(&self) -> &'static str {
        match self {
            Self::WorkshopMentoring => "convenio-taller-mentoria",
            Self::ExhibitionSale => "convenio-exhibicion-venta",
            Self::OneOffCollaboration => "convenio-colaboracion-puntual",
            Self::Mixed => "convenio-mixto-mentoria-exposicion",
            Self::EventsOnly => "convenio-solo-eventos",
            Self::NoAgreement => "sin-convenio-suscripcion",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::WorkshopMentoring => "Taller / Mentoría",
            Self::ExhibitionSale => "Exhibición / Venta",
            Self::OneOffCollaboration => "Colaboración",
            Self::Mixed => "Mixto",
            Self::EventsOnly => "Solo Eventos",
            Self::NoAgreement => "Sin convenio",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::WorkshopMentoring => "Ideal para formadores.",
            Self::ExhibitionSale => "Obras físicas/digitales.",
            Self::OneOffCollaboration => "Proyectos puntuales.",
            Self::Mixed => "Formación + Galería.",
            Self::EventsOnly => "Presenciales/virtuales.",
            Self::NoAgreement => "Solo explorar.",
        }
    }
}

/// Step 3 — activities the user sees themselves in (multi-select).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Activity {
    #[serde(rename = "actividad-clases-talleres")]
    Classes,
    #[serde(rename = "actividad-galeria-exposiciones")]
    Exhibitions,
    #[serde(rename = "actividad-colaboraciones-contenido")]
    ContentCollaborations,
    #[serde(rename = "actividad-mentorías-personalizadas")]
    Mentoring,
    #[serde(rename = "actividad-ventas-largo-plazo")]
    LongTermSales,
    #[serde(rename = "actividad-proyectos-puntuales")]
    OneOffProjects,
}

impl Choice for Activity {
    const ALL: &'static [Self] = &[
        Self::Classes,
        Self::Exhibitions,
        Self::ContentCollaborations,
        Self::Mentoring,
        Self::LongTermSales,
        Self::OneOffProjects,
    ];

    fn tag(&self) -> &'static str {
        match self {
            Self::Classes => "actividad-clases-talleres",
            Self::Exhibitions => "actividad-galeria-exposiciones",
            Self::ContentCollaborations => "actividad-colaboraciones-contenido",
            Self::Mentoring => "actividad-mentorías-personalizadas",
            Self::LongTermSales => "actividad-ventas-largo-plazo",
            Self::OneOffProjects => "actividad-proyectos-puntuales",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Classes => "Impartir clases",
            Self::Exhibitions => "Exposiciones",
            Self::ContentCollaborations => "Colaboraciones",
            Self::Mentoring => "Mentorías",
            Self::LongTermSales => "Ventas",
            Self::OneOffProjects => "Proyectos",
        }
    }

    fn description(&self) -> &'static str {
        ""
    }
}

/// Step 4 — benefits the user is looking for (multi-select).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Benefit {
    #[serde(rename = "beneficio-compartir-expertise")]
    ShareExpertise,
    #[serde(rename = "beneficio-visibilidad-ventas")]
    Visibility,
    #[serde(rename = "beneficio-colaboraciones-esporadicas")]
    OccasionalCollaborations,
    #[serde(rename = "beneficio-difusion-cursos")]
    CoursePromotion,
    #[serde(rename = "beneficio-exposicion-comunidad")]
    CommunityExposure,
    #[serde(rename = "beneficio-flexibilidad-proyectos")]
    Flexibility,
}

impl Benefit {
    /// Tag without its `beneficio-` prefix, dashes turned into spaces.
    pub fn short_text(&self) -> String {
        let tag = self.tag();
        tag.strip_prefix("beneficio-").unwrap_or(tag).replace('-', " ")
    }
}

impl Choice for Benefit {
    const ALL: &'static [Self] = &[
        Self::ShareExpertise,
        Self::Visibility,
        Self::OccasionalCollaborations,
        Self::CoursePromotion,
        Self::CommunityExposure,
        Self::Flexibility,
    ];

    fn tag(&self) -> &'static str {
        match self {
            Self::ShareExpertise => "beneficio-compartir-expertise",
            Self::Visibility => "beneficio-visibilidad-ventas",
            Self::OccasionalCollaborations => "beneficio-colaboraciones-esporadicas",
            Self::CoursePromotion => "beneficio-difusion-cursos",
            Self::CommunityExposure => "beneficio-exposicion-comunidad",
            Self::Flexibility => "beneficio-flexibilidad-proyectos",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::ShareExpertise => "Expertise",
            Self::Visibility => "Visibilidad",
            Self::OccasionalCollaborations => "Colaborar",
            Self::CoursePromotion => "Difusión",
            Self::CommunityExposure => "Exposición",
            Self::Flexibility => "Flexibilidad",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::ShareExpertise => "Enseñar a otros.",
            Self::Visibility => "Llegar a más.",
            Self::OccasionalCollaborations => "Proyectos.",
            Self::CoursePromotion => "Promocionar.",
            Self::CommunityExposure => "Networking.",
            Self::Flexibility => "A medida.",
        }
    }
}

/// Step 5 — artistic focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtisticFocus {
    #[serde(rename = "enfoque-educacion-conocimiento")]
    Education,
    #[serde(rename = "enfoque-creacion-exhibicion")]
    CreationAndExhibition,
    #[serde(rename = "enfoque-colaboraciones-temporales")]
    TemporaryCollaborations,
    #[serde(rename = "enfoque-combinado-ensenanza-exposicion")]
    TeachingAndExhibition,
    #[serde(rename = "enfoque-ventas-galerias")]
    GallerySales,
    #[serde(rename = "enfoque-flexible-eventos")]
    FlexibleEvents,
}

impl ArtisticFocus {
    /// Phrase completing "Tu enfoque se centra en ..." on the summary step.
    pub fn summary_label(&self) -> &'static str {
        match self {
            Self::Education => "educación y transmisión de conocimiento",
            Self::CreationAndExhibition => "creación y exhibición permanente",
            Self::TemporaryCollaborations => "colaboraciones temporales y específicas",
            Self::TeachingAndExhibition => "enseñanza combinada con exposición",
            Self::GallerySales => "ventas y presencia en galerías virtuales",
            Self::FlexibleEvents => "flexibilidad para eventos y contenidos ad hoc",
        }
    }
}

impl Choice for ArtisticFocus {
    const ALL: &'static [Self] = &[
        Self::Education,
        Self::CreationAndExhibition,
        Self::TemporaryCollaborations,
        Self::TeachingAndExhibition,
        Self::GallerySales,
        Self::FlexibleEvents,
    ];

    fn tag(&self) -> &'static str {
        match self {
            Self::Education => "enfoque-educacion-conocimiento",
            Self::CreationAndExhibition => "enfoque-creacion-exhibicion",
            Self::TemporaryCollaborations => "enfoque-colaboraciones-temporales",
            Self::TeachingAndExhibition => "enfoque-combinado-ensenanza-exposicion",
            Self::GallerySales => "enfoque-ventas-galerias",
            Self::FlexibleEvents => "enfoque-flexible-eventos",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Education => "Educación",
            Self::CreationAndExhibition => "Creación",
            Self::TemporaryCollaborations => "Colaboración",
            Self::TeachingAndExhibition => "Mixto",
            Self::GallerySales => "Ventas",
            Self::FlexibleEvents => "Flexible",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::Education => "Dominio técnico.",
            Self::CreationAndExhibition => "Exploración nuevas ideas.",
            Self::TemporaryCollaborations => "Arte para el cambio.",
            Self::TeachingAndExhibition => "Ventas y tendencias.",
            Self::GallerySales => "Enseñanza y transmisión.",
            Self::FlexibleEvents => "Adaptable a todo.",
        }
    }
}

macro_rules! impl_display_as_tag {
    ($($ty:ty),*) => {
        $(impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.tag())
            }
        })*
    };
}

impl_display_as_tag!(ArtistRole, Contribution, Agreement, Activity, Benefit, ArtisticFocus);

/// Fallback headline when no role is selected.
pub const DEFAULT_ROLE_LABEL: &str = "Artista de la comunidad";
/// Fallback phrase when no focus is selected.
pub const DEFAULT_FOCUS_LABEL: &str = "la creatividad";

/// A single user edit to the answer set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Role(ArtistRole),
    CustomRoleText(String),
    Contribution(Contribution),
    Agreement(Agreement),
    ToggleActivity(Activity),
    ToggleBenefit(Benefit),
    ArtisticFocus(ArtisticFocus),
}

/// Everything collected during one onboarding session.
///
/// Multi-select fields keep first-selection order and never hold duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSet {
    pub role: Option<ArtistRole>,
    /// Only meaningful when `role` is `ArtistRole::Other`.
    pub custom_role_text: String,
    pub primary_contribution: Option<Contribution>,
    pub agreement_preference: Option<Agreement>,
    pub activities: Vec<Activity>,
    pub benefits: Vec<Benefit>,
    pub artistic_focus: Option<ArtisticFocus>,
}

impl AnswerSet {
    /// Apply one edit. Single-select fields are overwritten; multi-select
    /// fields toggle membership.
    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Role(role) => self.role = Some(role),
            FieldUpdate::CustomRoleText(text) => self.custom_role_text = text,
            FieldUpdate::Contribution(c) => self.primary_contribution = Some(c),
            FieldUpdate::Agreement(a) => self.agreement_preference = Some(a),
            FieldUpdate::ToggleActivity(a) => toggle(&mut self.activities, a),
            FieldUpdate::ToggleBenefit(b) => toggle(&mut self.benefits, b),
            FieldUpdate::ArtisticFocus(f) => self.artistic_focus = Some(f),
        }
    }

    /// Custom role text as it will be stored: trimmed, and only for the custom role.
    pub fn stored_custom_role(&self) -> Option<String> {
        match self.role {
            Some(role) if role.is_custom() => {
                let trimmed = self.custom_role_text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            _ => None,
        }
    }

    pub fn role_label(&self) -> &'static str {
        self.role
            .map(|r| r.summary_label())
            .unwrap_or(DEFAULT_ROLE_LABEL)
    }

    pub fn artistic_focus_label(&self) -> &'static str {
        self.artistic_focus
            .map(|f| f.summary_label())
            .unwrap_or(DEFAULT_FOCUS_LABEL)
    }

    /// Build the merge-write payload for the profile store.
    pub fn to_document(&self) -> ProfileDocument {
        ProfileDocument {
            artist_role: self.role,
            artist_role_other: self.stored_custom_role(),
            primary_contribution: self.primary_contribution,
            agreement_preference: self.agreement_preference,
            active_activities: self.activities.clone(),
            desired_benefits: self.benefits.clone(),
            artistic_focus: self.artistic_focus,
            onboarding_completed: true,
        }
    }
}

fn toggle<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if let Some(pos) = items.iter().position(|x| *x == item) {
        items.remove(pos);
    } else {
        items.push(item);
    }
}

/// The profile document written on commit.
///
/// `None` fields serialize as explicit `null` so a merge-write clears any
/// stale value from an earlier submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDocument {
    pub artist_role: Option<ArtistRole>,
    pub artist_role_other: Option<String>,
    pub primary_contribution: Option<Contribution>,
    pub agreement_preference: Option<Agreement>,
    pub active_activities: Vec<Activity>,
    pub desired_benefits: Vec<Benefit>,
    pub artistic_focus: Option<ArtisticFocus>,
    pub onboarding_completed: bool,
}

/// Texts shown on the summary step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardSummary {
    pub role_label: &'static str,
    /// "Tu enfoque se centra en ...".
    pub focus_sentence: String,
    /// Contribution tag with dashes as spaces, or "N/A".
    pub contribution: String,
    /// First benefit, or "N/A".
    pub first_benefit: String,
    /// Number of benefits beyond the first ("y N más").
    pub more_benefits: usize,
}

impl WizardSummary {
    pub fn from_answers(answers: &AnswerSet) -> Self {
        Self {
            role_label: answers.role_label(),
            focus_sentence: format!(
                "Tu enfoque se centra en {}.",
                answers.artistic_focus_label()
            ),
            contribution: answers
                .primary_contribution
                .map(|c| c.tag().replace('-', " "))
                .unwrap_or_else(|| "N/A".to_string()),
            first_benefit: answers
                .benefits
                .first()
                .map(|b| b.short_text())
                .unwrap_or_else(|| "N/A".to_string()),
            more_benefits: answers.benefits.len().saturating_sub(1),
        }
    }
}
