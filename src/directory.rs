//! Artist directory — the community roster and its category filter.

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

/// Message shown when a filter matches nobody.
pub const EMPTY_STATE: &str = "No hay artistas en esta categoría.";

/// Artistic disciplines an artist can be listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Pintura")]
    Painting,
    #[serde(rename = "Dibujo")]
    Drawing,
    #[serde(rename = "Fotografía")]
    Photography,
    #[serde(rename = "Artesanía")]
    Craft,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Painting => "Pintura",
            Self::Drawing => "Dibujo",
            Self::Photography => "Fotografía",
            Self::Craft => "Artesanía",
        }
    }
}

/// A directory filter: everyone, or one discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

/// Filter tabs, in display order.
pub const CATEGORIES: [CategoryFilter; 5] = [
    CategoryFilter::All,
    CategoryFilter::Only(Category::Painting),
    CategoryFilter::Only(Category::Drawing),
    CategoryFilter::Only(Category::Photography),
    CategoryFilter::Only(Category::Craft),
];

impl CategoryFilter {
    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "Todos",
            Self::Only(category) => category.label(),
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        CATEGORIES.into_iter().find(|f| f.label() == label)
    }

    pub fn matches(&self, artist: &Artist) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => artist.roles.contains(category),
        }
    }
}

/// A listed community artist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artist {
    pub id: u32,
    pub name: &'static str,
    pub pseudonym: &'static str,
    /// First entry is the primary discipline.
    pub roles: &'static [Category],
    pub bio: &'static str,
    pub initials: &'static str,
}

impl Artist {
    pub fn primary_category(&self) -> Option<Category> {
        self.roles.first().copied()
    }
}

use Category::{Craft, Drawing, Painting, Photography};

static ROSTER: [Artist; 13] = [
    Artist {
        id: 1,
        name: "Elena Martinez",
        pseudonym: "Elemart",
        roles: &[Painting, Drawing],
        bio: "Explorando la intersección entre la naturaleza y la geometría sagrada a través del óleo.",
        initials: "EM",
    },
    Artist {
        id: 2,
        name: "Carlos Ruiz",
        pseudonym: "WoodMaster",
        roles: &[Craft],
        bio: "Creando formas imposibles en madera tallada, desafiando la gravedad y la materia.",
        initials: "CR",
    },
    Artist {
        id: 3,
        name: "Sofia Lopez",
        pseudonym: "SofiLuz",
        roles: &[Photography, Drawing],
        bio: "Capturando la esencia del movimiento y la luz en entornos urbanos olvidados.",
        initials: "SL",
    },
    Artist {
        id: 4,
        name: "Miguel Angel",
        pseudonym: "MikelArt",
        roles: &[Drawing, Painting],
        bio: "Narrativas visuales que mezclan el folclore tradicional con estéticas futuristas.",
        initials: "MA",
    },
    Artist {
        id: 5,
        name: "Ana Vega",
        pseudonym: "Avega",
        roles: &[Painting],
        bio: "Transformando espacios grises en lienzos vivos que cuentan historias de comunidad.",
        initials: "AV",
    },
    Artist {
        id: 6,
        name: "David Klein",
        pseudonym: "PixelDK",
        roles: &[Photography],
        bio: "Fotografía experimental que traduce datos ambientales en experiencias visuales.",
        initials: "DK",
    },
    Artist {
        id: 7,
        name: "Lucia Perez",
        pseudonym: "LuPe",
        roles: &[Craft, Painting],
        bio: "Diálogo táctil con la tierra, creando piezas de cerámica funcionales con alma escultórica.",
        initials: "LP",
    },
    Artist {
        id: 8,
        name: "Javier Ortiz",
        pseudonym: "Javo",
        roles: &[Drawing],
        bio: "Experimentación con dibujo digital y técnicas tradicionales de bocetado.",
        initials: "JO",
    },
    Artist {
        id: 9,
        name: "Roberto Gomez",
        pseudonym: "RobGo",
        roles: &[Painting],
        bio: "Abstracción lírica que busca representar las emociones humanas a través del color puro.",
        initials: "RG",
    },
    Artist {
        id: 10,
        name: "Marina Silva",
        pseudonym: "MarSea",
        roles: &[Photography, Craft],
        bio: "Documentación visual de la vida marina y costera con un enfoque conservacionista.",
        initials: "MS",
    },
    Artist {
        id: 11,
        name: "Tomas Eduardo",
        pseudonym: "TomEd",
        roles: &[Drawing],
        bio: "Ilustración botánica detallada con un toque surrealista y fantástico.",
        initials: "TE",
    },
    Artist {
        id: 12,
        name: "Valentina Paz",
        pseudonym: "ValP",
        roles: &[Craft],
        bio: "Tejidos ancestrales reinterpretados con materiales contemporáneos y sostenibles.",
        initials: "VP",
    },
    Artist {
        id: 13,
        name: "Gabriel Torres",
        pseudonym: "GaboT",
        roles: &[Painting, Photography],
        bio: "Muralismo urbano que transforma espacios públicos en galerías abiertas.",
        initials: "GT",
    },
];

/// The fixed community roster.
pub fn roster() -> &'static [Artist] {
    &ROSTER
}

/// Artists matching `filter`, in roster order.
pub fn filter_by_category(artists: &[Artist], filter: CategoryFilter) -> Vec<&Artist> {
    artists.iter().filter(|a| filter.matches(a)).collect()
}

#[derive(Debug, Deserialize)]
struct DirectoryQuery {
    category: Option<String>,
}

/// Body of `GET /api/artists`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryListing {
    pub category: &'static str,
    pub artists: Vec<&'static Artist>,
    /// Set when the filter matches nobody.
    pub empty_message: Option<&'static str>,
}

/// GET /api/artists?category=Pintura
async fn list_artists(Query(query): Query<DirectoryQuery>) -> impl IntoResponse {
    let filter = match query.category.as_deref() {
        None => CategoryFilter::All,
        Some(label) => match CategoryFilter::from_label(label) {
            Some(filter) => filter,
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({"error": format!("Unknown category: {label}")})),
                )
                    .into_response();
            }
        },
    };

    let artists = filter_by_category(roster(), filter);
    Json(DirectoryListing {
        category: filter.label(),
        empty_message: artists.is_empty().then_some(EMPTY_STATE),
        artists,
    })
    .into_response()
}

/// Build the directory REST routes.
pub fn directory_routes() -> Router {
    Router::new().route("/api/artists", get(list_artists))
}
